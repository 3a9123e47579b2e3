//! 错误上报
//!
//! 单个事件或单次渲染中的错误只上报，不向上传播。

use crate::error::Error;
use crate::event::WindowId;

pub trait Reporter: Send + Sync {
    fn report(&self, window_id: WindowId, error: &Error);
}

/// 写入 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, window_id: WindowId, error: &Error) {
        match error {
            // 标记里引用了未实现的动作：元素仍可点击，只是什么都不做
            Error::ActionNotFound { .. } => tracing::warn!("window {}: {}", window_id, error),
            _ => tracing::error!("window {}: {}", window_id, error),
        }
    }
}
