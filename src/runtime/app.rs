//! 应用运行时
//!
//! 持有冻结后的注册表和全部窗口。每个窗口有自己的串行任务队列：
//! UI 事件和原生能力的回调都先入队，再由 [`App::pump`] 逐个执行，
//! 一个处理函数跑完才开始下一个。

use super::window::{Window, WindowConfig};
use crate::bridge::{decode_inbound, OutboundMessage, Transport};
use crate::component::Registry;
use crate::config::{AppConfig, PageDefaults};
use crate::error::{Error, Result};
use crate::event::{InstanceId, UiEvent, WindowId};
use crate::native::{LogHost, NativeHost};
use crate::report::{LogReporter, Reporter};
use crossbeam_channel::{Receiver, Sender};
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 窗口队列中的任务
#[derive(Debug, Clone)]
pub enum Task {
    Event(UiEvent),
}

/// 窗口间共享的只读服务
#[derive(Clone)]
pub(crate) struct Shared {
    pub registry: Arc<Registry>,
    pub transport: Arc<dyn Transport>,
    pub native: Arc<dyn NativeHost>,
    pub reporter: Arc<dyn Reporter>,
    pub page: PageDefaults,
    instance_ids: Arc<AtomicU64>,
}

impl Shared {
    pub fn next_instance_id(&self) -> InstanceId {
        InstanceId(self.instance_ids.fetch_add(1, Ordering::Relaxed))
    }
}

struct WindowSlot {
    window: Window,
    sender: Sender<Task>,
    inbox: Receiver<Task>,
}

pub struct App {
    shared: Shared,
    config: AppConfig,
    windows: BTreeMap<WindowId, WindowSlot>,
    next_window: u64,
}

impl App {
    /// 注册表在这里冻结，之后只读
    pub fn new(registry: Registry, transport: Arc<dyn Transport>) -> Self {
        Self {
            shared: Shared {
                registry: Arc::new(registry),
                transport,
                native: Arc::new(LogHost),
                reporter: Arc::new(LogReporter),
                page: PageDefaults::default(),
                instance_ids: Arc::new(AtomicU64::new(1)),
            },
            config: AppConfig::default(),
            windows: BTreeMap::new(),
            next_window: 1,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.shared.page = config.page.clone();
        self.config = config;
        self
    }

    pub fn with_native_host(mut self, native: Arc<dyn NativeHost>) -> Self {
        self.shared.native = native;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.shared.reporter = reporter;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 按应用配置打开窗口
    pub fn open_default_window(&mut self) -> Result<WindowId> {
        let config = self.config.window_config();
        self.open_window(config)
    }

    /// 打开窗口。配置了 `default_url` 时立即加载，加载失败只上报。
    pub fn open_window(&mut self, config: WindowConfig) -> Result<WindowId> {
        let id = WindowId(self.next_window);
        self.next_window += 1;

        let (sender, inbox) = crossbeam_channel::unbounded();
        let default_url = config.default_url.clone();
        self.shared.transport.send(OutboundMessage::WindowOpened {
            window_id: id,
            config: config.clone(),
        })?;
        let window = Window::new(id, config, self.shared.clone(), sender.clone());
        self.windows.insert(id, WindowSlot { window, sender, inbox });
        tracing::info!("window {} opened", id);

        if let Some(url) = default_url {
            if let Err(e) = self.load(id, &url) {
                self.shared.reporter.report(id, &e);
            }
        }
        Ok(id)
    }

    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let mut slot = self.windows.remove(&id).ok_or(Error::UnknownWindow(id))?;
        slot.window.close();
        tracing::info!("window {} closed", id);
        self.shared.transport.send(OutboundMessage::WindowClosed { window_id: id })
    }

    pub fn window(&self, id: WindowId) -> Result<&Window> {
        self.windows.get(&id).map(|s| &s.window).ok_or(Error::UnknownWindow(id))
    }

    pub fn window_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        self.windows
            .get_mut(&id)
            .map(|s| &mut s.window)
            .ok_or(Error::UnknownWindow(id))
    }

    pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    pub fn load(&mut self, id: WindowId, url: &str) -> Result<()> {
        self.window_mut(id)?.load(url)
    }

    /// 把 UI 事件放进目标窗口的队列
    pub fn post(&self, event: UiEvent) -> Result<()> {
        let slot = self
            .windows
            .get(&event.window_id)
            .ok_or(Error::UnknownWindow(event.window_id))?;
        let window_id = event.window_id;
        slot.sender
            .send(Task::Event(event))
            .map_err(|_| Error::UnknownWindow(window_id))
    }

    /// 解码一行入站消息并入队
    pub fn handle_inbound(&self, line: &str) -> Result<()> {
        self.post(decode_inbound(line)?)
    }

    /// 依次执行窗口队列中的全部任务，包括执行过程中新入队的。
    /// 单个任务的错误只上报，不会中断队列。
    pub fn pump(&mut self, id: WindowId) -> Result<usize> {
        let reporter = self.shared.reporter.clone();
        let slot = self.windows.get_mut(&id).ok_or(Error::UnknownWindow(id))?;
        let mut handled = 0;
        while let Ok(task) = slot.inbox.try_recv() {
            handled += 1;
            let result = match task {
                Task::Event(event) => slot.window.dispatch(event),
            };
            if let Err(e) = result {
                reporter.report(id, &e);
            }
        }
        Ok(handled)
    }

    pub fn pump_all(&mut self) -> usize {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        ids.into_iter().filter_map(|id| self.pump(id).ok()).sum()
    }

    /// 逐行读取入站消息并分发，直到输入结束，返回执行的任务数。
    /// 无法解码的行（包括非 UTF-8 的字节）只记录日志，不会中断读取。
    pub fn serve<R: BufRead>(&mut self, mut reader: R) -> io::Result<usize> {
        let mut buf = Vec::new();
        let mut handled = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(handled);
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    tracing::warn!("ignore inbound message: {}", e);
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            if let Err(e) = self.handle_inbound(line) {
                tracing::warn!("ignore inbound message: {}", e);
                continue;
            }
            handled += self.pump_all();
        }
    }
}
