//! 渲染管线：实例快照 → 模板 → 带序号的渲染输出 → 传输层

use crate::bridge::Transport;
use crate::component::Instance;
use crate::error::Result;
use crate::event::{InstanceId, WindowId};
use crate::parser::TemplateEngine;
use std::collections::HashMap;
use std::sync::Arc;

/// 一次渲染的结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub window_id: WindowId,
    pub instance_id: InstanceId,
    pub sequence: u64,
    pub markup: String,
}

pub struct RenderPipeline {
    window_id: WindowId,
    transport: Arc<dyn Transport>,
    sequences: HashMap<InstanceId, u64>,
}

impl RenderPipeline {
    pub fn new(window_id: WindowId, transport: Arc<dyn Transport>) -> Self {
        Self {
            window_id,
            transport,
            sequences: HashMap::new(),
        }
    }

    /// 渲染并交给传输层
    pub fn render(&mut self, instance: &mut dyn Instance) -> Result<RenderOutput> {
        let output = self.produce(instance)?;
        self.ship(output.clone())?;
        Ok(output)
    }

    /// 渲染实例当前状态并分配下一个序号，失败时不消耗序号
    pub fn produce(&mut self, instance: &mut dyn Instance) -> Result<RenderOutput> {
        let template = instance.template()?;
        let snapshot = instance.snapshot()?;
        let markup = TemplateEngine::render(instance.descriptor(), &template, &snapshot)?;

        let sequence = self.sequences.entry(instance.id()).or_insert(0);
        *sequence += 1;
        Ok(RenderOutput {
            window_id: self.window_id,
            instance_id: instance.id(),
            sequence: *sequence,
            markup,
        })
    }

    pub fn ship(&self, output: RenderOutput) -> Result<()> {
        tracing::trace!(
            "ship render {} of instance {} ({} bytes)",
            output.sequence,
            output.instance_id,
            output.markup.len()
        );
        self.transport.send(output.into())
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// 实例被驱逐后清理其序号
    pub fn forget(&mut self, instance_id: InstanceId) {
        self.sequences.remove(&instance_id);
    }

    pub fn last_sequence(&self, instance_id: InstanceId) -> Option<u64> {
        self.sequences.get(&instance_id).copied()
    }
}
