//! 事件系统 - 来自 webview 的 UI 事件

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// 窗口 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 组件实例 ID，挂载时分配，进程内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// UI 事件：某窗口中某实例上触发的动作
///
/// 同时也是入站的线上格式：
/// `{"windowId": 1, "instanceId": 3, "actionName": "OnDrop", "payload": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEvent {
    pub window_id: WindowId,
    pub instance_id: InstanceId,
    pub action_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,
}

impl UiEvent {
    pub fn new(window_id: WindowId, instance_id: InstanceId, action_name: impl Into<String>) -> Self {
        Self {
            window_id,
            instance_id,
            action_name: action_name.into(),
            payload: None,
        }
    }

    /// 附加结构化载荷
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> serde_json::Result<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }
}

/// 拖放事件
///
/// 宿主可能附带额外字段，原样保存在 `extra` 中，序列化时展开回去。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DragAndDropEvent {
    /// 被拖动元素的描述
    pub source: String,
    /// 放置目标的描述
    pub target: String,
    /// `data-drag` 携带的数据
    pub data: String,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}
