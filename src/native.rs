//! 原生能力接口
//!
//! 菜单、文件面板、通知、分享等由平台外壳实现。异步结果通过
//! [`Continuation`] 回到发起窗口的串行队列，作为一次普通的 UI 事件分发。

use crate::error::{Error, Result};
use crate::event::{InstanceId, UiEvent, WindowId};
use crate::runtime::Task;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use url::Url;

/// 上下文菜单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MenuConfig {
    /// 菜单内容对应的组件 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_url: Option<String>,
}

/// 选择要打开的文件或目录的面板
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilePanelConfig {
    pub multiple_selection: bool,
    pub ignore_directories: bool,
    pub ignore_files: bool,
    pub show_hidden_files: bool,
    /// 扩展名（jpg）或 UTI（public.jpeg），为空表示不限
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
}

/// 选择保存位置的面板
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SaveFilePanelConfig {
    pub show_hidden_files: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NotificationConfig {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image_name: String,
    pub sound: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShareContent {
    Text(String),
    Url(Url),
}

/// 异步结果的投递目标：窗口、实例、动作
#[derive(Debug, Clone)]
pub struct Continuation {
    window_id: WindowId,
    instance_id: InstanceId,
    action: String,
    queue: Sender<Task>,
}

impl Continuation {
    pub(crate) fn new(window_id: WindowId, instance_id: InstanceId, action: &str, queue: Sender<Task>) -> Self {
        Self {
            window_id,
            instance_id,
            action: action.to_string(),
            queue,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// 投递结果。可以在任意线程调用，处理发生在窗口下一次 pump 时。
    /// 用户取消时直接丢弃 continuation 即可。
    pub fn resume<T: Serialize>(self, value: &T) -> Result<()> {
        let event = UiEvent::new(self.window_id, self.instance_id, self.action).with_payload(value)?;
        self.queue
            .send(Task::Event(event))
            .map_err(|_| Error::UnknownWindow(self.window_id))
    }

    /// 投递一个不带载荷的事件，用于菜单关闭这类只需通知的回调
    pub fn complete(self) -> Result<()> {
        let event = UiEvent::new(self.window_id, self.instance_id, self.action);
        self.queue
            .send(Task::Event(event))
            .map_err(|_| Error::UnknownWindow(self.window_id))
    }
}

/// 平台外壳实现的原生能力
pub trait NativeHost: Send + Sync {
    fn open_context_menu(&self, config: MenuConfig, on_close: Option<Continuation>) -> Result<()>;

    fn open_file_panel(&self, config: FilePanelConfig, on_select: Continuation) -> Result<()>;

    fn open_save_file_panel(&self, config: SaveFilePanelConfig, on_select: Continuation) -> Result<()>;

    fn show_notification(&self, config: NotificationConfig, on_reply: Option<Continuation>) -> Result<()>;

    fn share(&self, content: ShareContent) -> Result<()>;

    /// 在系统浏览器中打开外部链接
    fn open_url(&self, url: &Url) -> Result<()>;
}

/// 只记录请求的宿主，面板一律视为取消，菜单立即关闭
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHost;

impl NativeHost for LogHost {
    fn open_context_menu(&self, config: MenuConfig, on_close: Option<Continuation>) -> Result<()> {
        tracing::info!("context menu requested: {:?}", config);
        match on_close {
            Some(on_close) => on_close.complete(),
            None => Ok(()),
        }
    }

    fn open_file_panel(&self, config: FilePanelConfig, on_select: Continuation) -> Result<()> {
        tracing::info!("file panel requested for {}: {:?}", on_select.action(), config);
        Ok(())
    }

    fn open_save_file_panel(&self, config: SaveFilePanelConfig, on_select: Continuation) -> Result<()> {
        tracing::info!("save panel requested for {}: {:?}", on_select.action(), config);
        Ok(())
    }

    fn show_notification(&self, config: NotificationConfig, _on_reply: Option<Continuation>) -> Result<()> {
        tracing::info!("notification: {} - {}", config.title, config.text);
        Ok(())
    }

    fn share(&self, content: ShareContent) -> Result<()> {
        tracing::info!("share: {:?}", content);
        Ok(())
    }

    fn open_url(&self, url: &Url) -> Result<()> {
        tracing::info!("open external url: {}", url);
        Ok(())
    }
}
