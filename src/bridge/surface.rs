//! 宿主侧渲染面
//!
//! 按实例记录已应用的最大序号。序号更小的渲染输出是过期的，直接丢弃，
//! 这不是错误，也不记录失败日志。

use super::{decode_outbound, OutboundMessage};
use crate::error::Result;
use crate::event::{InstanceId, WindowId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
struct AppliedRender {
    window_id: WindowId,
    sequence: u64,
    markup: String,
}

#[derive(Debug, Default)]
pub struct Surface {
    renders: HashMap<InstanceId, AppliedRender>,
    documents: HashMap<WindowId, String>,
    titles: HashMap<WindowId, String>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: OutboundMessage) -> ApplyOutcome {
        match message {
            OutboundMessage::Render {
                window_id,
                instance_id,
                sequence_number,
                markup,
            } => {
                if let Some(applied) = self.renders.get(&instance_id) {
                    if sequence_number < applied.sequence {
                        tracing::trace!(
                            "drop stale render {} for instance {} (applied {})",
                            sequence_number,
                            instance_id,
                            applied.sequence
                        );
                        return ApplyOutcome::Stale;
                    }
                }
                self.renders.insert(
                    instance_id,
                    AppliedRender {
                        window_id,
                        sequence: sequence_number,
                        markup,
                    },
                );
                ApplyOutcome::Applied
            }
            OutboundMessage::Page {
                window_id,
                title,
                document,
                ..
            } => {
                self.documents.insert(window_id, document);
                self.titles.insert(window_id, title);
                ApplyOutcome::Applied
            }
            OutboundMessage::WindowOpened { .. } => ApplyOutcome::Applied,
            OutboundMessage::WindowClosed { window_id } => {
                self.documents.remove(&window_id);
                self.titles.remove(&window_id);
                self.renders.retain(|_, r| r.window_id != window_id);
                ApplyOutcome::Applied
            }
        }
    }

    /// 解码一行线上消息并应用
    pub fn apply_wire(&mut self, line: &str) -> Result<ApplyOutcome> {
        Ok(self.apply(decode_outbound(line)?))
    }

    pub fn markup(&self, instance_id: InstanceId) -> Option<&str> {
        self.renders.get(&instance_id).map(|r| r.markup.as_str())
    }

    pub fn sequence(&self, instance_id: InstanceId) -> Option<u64> {
        self.renders.get(&instance_id).map(|r| r.sequence)
    }

    pub fn document(&self, window_id: WindowId) -> Option<&str> {
        self.documents.get(&window_id).map(|d| d.as_str())
    }

    pub fn title(&self, window_id: WindowId) -> Option<&str> {
        self.titles.get(&window_id).map(|t| t.as_str())
    }
}
