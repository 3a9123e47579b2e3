//! Native 与 webview 之间的桥接层
//!
//! 出站：渲染结果、页面文档、窗口开关，编码为带 `type` 标签的 JSON。
//! 入站：UI 事件，解码为 [`UiEvent`]。

pub mod message;
pub mod surface;
pub mod transport;

pub use message::OutboundMessage;
pub use surface::{ApplyOutcome, Surface};
pub use transport::{ChannelTransport, JsonLinesTransport, Transport};

use crate::error::Result;
use crate::event::UiEvent;

pub fn encode_outbound(message: &OutboundMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode_outbound(line: &str) -> Result<OutboundMessage> {
    Ok(serde_json::from_str(line)?)
}

pub fn encode_inbound(event: &UiEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_inbound(line: &str) -> Result<UiEvent> {
    Ok(serde_json::from_str(line)?)
}
