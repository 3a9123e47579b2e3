//! 出站传输

use super::{encode_outbound, OutboundMessage};
use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, Sender};
use std::io::Write;
use std::sync::Mutex;

/// 把出站消息送过边界。投递可以是异步的，顺序由接收端的
/// [`Surface`](super::Surface) 按序号保证。
pub trait Transport: Send + Sync {
    fn send(&self, message: OutboundMessage) -> Result<()>;
}

/// 每条消息一行 JSON，写入任意 `Write`（如子进程 stdin 或 stdout）
pub struct JsonLinesTransport<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Transport for JsonLinesTransport<W> {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        let line = encode_outbound(&message)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::Bridge("transport writer poisoned".to_string()))?;
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::Bridge(e.to_string()))
    }
}

/// 编码后投递到通道，由宿主线程异步消费
pub struct ChannelTransport {
    sender: Sender<String>,
}

impl ChannelTransport {
    pub fn new() -> (Self, Receiver<String>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        let line = encode_outbound(&message)?;
        self.sender
            .send(line)
            .map_err(|_| Error::Bridge("host side of the channel is gone".to_string()))
    }
}
