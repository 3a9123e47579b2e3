//! 桥接层线上格式

use crate::event::{InstanceId, WindowId};
use crate::renderer::RenderOutput;
use crate::runtime::WindowConfig;
use serde::{Deserialize, Serialize};

/// 发往原生宿主的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// 某实例的一次渲染结果
    #[serde(rename_all = "camelCase")]
    Render {
        window_id: WindowId,
        instance_id: InstanceId,
        sequence_number: u64,
        markup: String,
    },
    /// 根组件挂载时的完整页面文档
    #[serde(rename_all = "camelCase")]
    Page {
        window_id: WindowId,
        instance_id: InstanceId,
        title: String,
        document: String,
    },
    #[serde(rename_all = "camelCase")]
    WindowOpened {
        window_id: WindowId,
        config: WindowConfig,
    },
    #[serde(rename_all = "camelCase")]
    WindowClosed { window_id: WindowId },
}

impl OutboundMessage {
    pub fn window_id(&self) -> WindowId {
        match self {
            OutboundMessage::Render { window_id, .. }
            | OutboundMessage::Page { window_id, .. }
            | OutboundMessage::WindowOpened { window_id, .. }
            | OutboundMessage::WindowClosed { window_id } => *window_id,
        }
    }
}

impl From<RenderOutput> for OutboundMessage {
    fn from(output: RenderOutput) -> Self {
        OutboundMessage::Render {
            window_id: output.window_id,
            instance_id: output.instance_id,
            sequence_number: output.sequence,
            markup: output.markup,
        }
    }
}
