//! 单元测试模块
//! 覆盖注册表、模板、动作分发、渲染管线、导航历史和桥接层

pub mod bridge_tests;
pub mod config_tests;

use crate::bridge::{OutboundMessage, Transport};
use crate::component::{ActionTable, Component, Context, Registry};
use crate::error::{Error, Result};
use crate::event::{DragAndDropEvent, InstanceId, WindowId};
use crate::native::{
    Continuation, FilePanelConfig, MenuConfig, NativeHost, NotificationConfig, SaveFilePanelConfig,
    ShareContent,
};
use crate::page::PageConfig;
use crate::report::Reporter;
use crate::runtime::{App, Route, WindowConfig};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use url::Url;

/// 测试用组件，对应示例应用里的 webview 页面
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Webview {
    pub page: i64,
    pub square_color: String,
    pub number: i64,
    pub can_previous: bool,
    pub can_next: bool,
    #[serde(skip)]
    pub navigations: usize,
    #[serde(skip)]
    pub dismounts: usize,
    #[serde(skip)]
    pub dropped: Vec<DragAndDropEvent>,
    #[serde(skip)]
    pub selected: Vec<String>,
    #[serde(skip)]
    pub menus_closed: usize,
}

pub const WEBVIEW_TEMPLATE: &str = r#"<div class="root">
    <div class="square {{.SquareColor}}"></div>
    <div>{{.Number}}</div>
    <a href="unknown?page=42">Unknown component</a>
    <button onclick="NotMapped">Not mapped</button>
    <button {{if not .CanPrevious}}disabled{{end}} onclick="OnPrevious">Previous</button>
    <button {{if not .CanNext}}disabled{{end}} onclick="OnNext">Next</button>
    <p>Page: {{.Page}}</p>
</div>"#;

impl Component for Webview {
    fn template(&self) -> &str {
        WEBVIEW_TEMPLATE
    }

    fn actions(table: &mut ActionTable<Self>) {
        table
            .on("OnChangeSquareColor", Self::on_change_square_color)
            .on("OnIncrement", Self::on_increment)
            .on("OnNextPage", Self::on_next_page)
            .on("OnPrevious", |_, ctx| ctx.previous())
            .on("OnNext", |_, ctx| ctx.next())
            .on("OnReload", |_, ctx| ctx.reload())
            .on("OnFilePanel", Self::on_file_panel)
            .on_event("OnFilesSelected", Self::on_files_selected)
            .on_event("OnDrop", Self::on_drop)
            .on("OnContextMenu", Self::on_context_menu)
            .on("OnMenuClosed", |c, _| c.menus_closed += 1);
    }

    fn on_navigate(&mut self, ctx: &mut Context<'_>, route: &Route) {
        self.navigations += 1;
        if let Some(page) = route.query("page").and_then(|p| p.parse().ok()) {
            self.page = page;
        }
        if self.page == 0 {
            self.page = 1;
        }
        self.can_previous = ctx.can_previous();
        self.can_next = ctx.can_next();
        ctx.render();
    }

    fn on_dismount(&mut self) {
        self.dismounts += 1;
    }

    fn page_config(&self) -> Option<PageConfig> {
        Some(PageConfig::with_title(format!("Test component {}", self.page)))
    }
}

impl Webview {
    fn on_change_square_color(&mut self, ctx: &mut Context<'_>) {
        self.square_color = match self.square_color.as_str() {
            "blue" => "pink".to_string(),
            "pink" => String::new(),
            _ => "blue".to_string(),
        };
        ctx.render();
    }

    fn on_increment(&mut self, ctx: &mut Context<'_>) {
        self.number += 1;
        ctx.render();
    }

    fn on_next_page(&mut self, ctx: &mut Context<'_>) {
        ctx.load(format!("/webview?page={}", self.page.saturating_add(1)));
    }

    fn on_file_panel(&mut self, ctx: &mut Context<'_>) {
        let config = FilePanelConfig {
            ignore_directories: true,
            multiple_selection: true,
            ..Default::default()
        };
        if let Err(e) = ctx.open_file_panel(config, "OnFilesSelected") {
            tracing::error!("{}", e);
        }
    }

    fn on_context_menu(&mut self, ctx: &mut Context<'_>) {
        let config = MenuConfig {
            default_url: Some("menu".to_string()),
        };
        if let Err(e) = ctx.open_context_menu(config, Some("OnMenuClosed")) {
            tracing::error!("{}", e);
        }
    }

    fn on_files_selected(&mut self, ctx: &mut Context<'_>, filenames: Vec<String>) {
        self.selected = filenames;
        ctx.render();
    }

    fn on_drop(&mut self, _ctx: &mut Context<'_>, event: DragAndDropEvent) {
        self.dropped.push(event);
    }
}

/// 记录全部出站消息
#[derive(Default)]
pub struct RecordingTransport {
    messages: Mutex<Vec<OutboundMessage>>,
}

impl Transport for RecordingTransport {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

impl RecordingTransport {
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// 某实例的 (序号, 标记)
    pub fn renders(&self, instance: InstanceId) -> Vec<(u64, String)> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                OutboundMessage::Render {
                    instance_id,
                    sequence_number,
                    markup,
                    ..
                } if instance_id == instance => Some((sequence_number, markup)),
                _ => None,
            })
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                OutboundMessage::Page { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }
}

/// 记录原生能力调用，面板和菜单的 continuation 留给测试手动完成
#[derive(Default)]
pub struct RecordingHost {
    pub panels: Mutex<Vec<Continuation>>,
    pub menus: Mutex<Vec<Option<Continuation>>>,
    pub opened_urls: Mutex<Vec<String>>,
}

impl NativeHost for RecordingHost {
    fn open_context_menu(&self, _config: MenuConfig, on_close: Option<Continuation>) -> Result<()> {
        self.menus.lock().unwrap().push(on_close);
        Ok(())
    }

    fn open_file_panel(&self, _config: FilePanelConfig, on_select: Continuation) -> Result<()> {
        self.panels.lock().unwrap().push(on_select);
        Ok(())
    }

    fn open_save_file_panel(&self, _config: SaveFilePanelConfig, on_select: Continuation) -> Result<()> {
        self.panels.lock().unwrap().push(on_select);
        Ok(())
    }

    fn show_notification(&self, _config: NotificationConfig, _on_reply: Option<Continuation>) -> Result<()> {
        Ok(())
    }

    fn share(&self, _content: ShareContent) -> Result<()> {
        Ok(())
    }

    fn open_url(&self, url: &Url) -> Result<()> {
        self.opened_urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<Error>>,
}

impl Reporter for CollectingReporter {
    fn report(&self, _window_id: WindowId, error: &Error) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

impl CollectingReporter {
    pub fn errors(&self) -> Vec<Error> {
        self.errors.lock().unwrap().clone()
    }
}

pub struct Harness {
    pub app: App,
    pub window: WindowId,
    pub transport: Arc<RecordingTransport>,
    pub host: Arc<RecordingHost>,
    pub reporter: Arc<CollectingReporter>,
}

impl Harness {
    /// 注册表只有 `webview`，打开一个空窗口
    pub fn new() -> Self {
        let mut registry = Registry::new();
        registry.register::<Webview>("webview").unwrap();
        Self::with_registry(registry)
    }

    pub fn with_registry(registry: Registry) -> Self {
        let transport = Arc::new(RecordingTransport::default());
        let host = Arc::new(RecordingHost::default());
        let reporter = Arc::new(CollectingReporter::default());
        let mut app = App::new(registry, transport.clone())
            .with_native_host(host.clone())
            .with_reporter(reporter.clone());
        let window = app.open_window(WindowConfig::default()).unwrap();
        Self {
            app,
            window,
            transport,
            host,
            reporter,
        }
    }

    pub fn load(&mut self, url: &str) -> Result<()> {
        self.app.load(self.window, url)
    }

    pub fn window(&self) -> &crate::runtime::Window {
        self.app.window(self.window).unwrap()
    }

    pub fn window_mut(&mut self) -> &mut crate::runtime::Window {
        self.app.window_mut(self.window).unwrap()
    }

    pub fn current(&self) -> InstanceId {
        self.window().current().unwrap()
    }

    pub fn webview(&self) -> &Webview {
        self.window().component::<Webview>(self.current()).unwrap()
    }

    /// 当前实例上的一次点击，走完整的入队与 pump
    pub fn click(&mut self, action: &str) {
        let event = crate::event::UiEvent::new(self.window, self.current(), action);
        self.app.post(event).unwrap();
        self.app.pump(self.window).unwrap();
    }
}
