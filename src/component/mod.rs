//! 组件模型：组件 trait、动作分发表、注册表和调用上下文

pub mod descriptor;
pub mod registry;

pub use descriptor::{ActionInfo, ActionTable, Descriptor, HandlerRef, PayloadShape};
pub use registry::{Instance, Registry};

use crate::error::{Error, Result};
use crate::event::{InstanceId, WindowId};
use crate::native::{
    Continuation, FilePanelConfig, MenuConfig, NativeHost, NotificationConfig, SaveFilePanelConfig,
    ShareContent,
};
use crate::page::PageConfig;
use crate::runtime::{Route, Task};
use crossbeam_channel::Sender;
use serde::Serialize;

/// 组件：一组可序列化的字段（状态）加上具名的处理函数
///
/// 公开字段通过 `Serialize` 进入模板；内部字段用 `#[serde(skip)]` 排除。
pub trait Component: Serialize + Default + 'static {
    /// 组件模板文本
    fn template(&self) -> &str;

    /// 声明可被 UI 调用的动作
    fn actions(table: &mut ActionTable<Self>);

    /// 组件被导航到（挂载或重新挂载）时调用
    fn on_navigate(&mut self, _ctx: &mut Context<'_>, _route: &Route) {}

    /// 组件被卸下时调用
    fn on_dismount(&mut self) {}

    /// 作为根组件挂载时的页面信息
    fn page_config(&self) -> Option<PageConfig> {
        None
    }
}

/// 处理函数请求的副作用，在处理函数返回后由窗口依次执行
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Render,
    Navigate(Navigation),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Navigation {
    Load(String),
    Previous,
    Next,
    Reload,
}

/// 处理函数的调用上下文，作用域限定在所属窗口
pub struct Context<'a> {
    window_id: WindowId,
    instance_id: InstanceId,
    can_previous: bool,
    can_next: bool,
    native: &'a dyn NativeHost,
    queue: &'a Sender<Task>,
    effects: Vec<Effect>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        window_id: WindowId,
        instance_id: InstanceId,
        can_previous: bool,
        can_next: bool,
        native: &'a dyn NativeHost,
        queue: &'a Sender<Task>,
    ) -> Self {
        Self {
            window_id,
            instance_id,
            can_previous,
            can_next,
            native,
            queue,
            effects: Vec::new(),
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn can_previous(&self) -> bool {
        self.can_previous
    }

    pub fn can_next(&self) -> bool {
        self.can_next
    }

    /// 请求重新渲染当前实例
    pub fn render(&mut self) {
        self.effects.push(Effect::Render);
    }

    /// 请求在所属窗口中加载 URL
    pub fn load(&mut self, url: impl Into<String>) {
        self.effects.push(Effect::Navigate(Navigation::Load(url.into())));
    }

    pub fn previous(&mut self) {
        self.effects.push(Effect::Navigate(Navigation::Previous));
    }

    pub fn next(&mut self) {
        self.effects.push(Effect::Navigate(Navigation::Next));
    }

    pub fn reload(&mut self) {
        self.effects.push(Effect::Navigate(Navigation::Reload));
    }

    pub fn native(&self) -> &dyn NativeHost {
        self.native
    }

    /// 把原生能力的异步结果投递回本窗口队列，作为 `action` 动作的载荷
    pub fn continuation(&self, action: &str) -> Continuation {
        Continuation::new(self.window_id, self.instance_id, action, self.queue.clone())
    }

    /// 打开上下文菜单，菜单关闭时调用 `on_close`（无载荷）
    pub fn open_context_menu(&self, config: MenuConfig, on_close: Option<&str>) -> Result<()> {
        let close = on_close.map(|action| self.continuation(action));
        self.native.open_context_menu(config, close)
    }

    /// 打开文件面板，选择结果以 `Vec<String>` 投递给 `on_select`
    pub fn open_file_panel(&self, config: FilePanelConfig, on_select: &str) -> Result<()> {
        if config.ignore_files && config.ignore_directories {
            return Err(Error::Native {
                capability: "file panel",
                reason: "both files and directories are ignored".to_string(),
            });
        }
        self.native.open_file_panel(config, self.continuation(on_select))
    }

    /// 打开保存面板，选择结果以 `String` 投递给 `on_select`
    pub fn open_save_file_panel(&self, config: SaveFilePanelConfig, on_select: &str) -> Result<()> {
        self.native.open_save_file_panel(config, self.continuation(on_select))
    }

    pub fn show_notification(&self, config: NotificationConfig, on_reply: Option<&str>) -> Result<()> {
        let reply = on_reply.map(|action| self.continuation(action));
        self.native.show_notification(config, reply)
    }

    pub fn share(&self, content: ShareContent) -> Result<()> {
        self.native.share(content)
    }

    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}
