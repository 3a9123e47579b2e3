//! 测试 webview 元素的组件

use mini_webview::native::{
    FilePanelConfig, MenuConfig, NotificationConfig, SaveFilePanelConfig, ShareContent,
};
use mini_webview::{ActionTable, Component, Context, DragAndDropEvent, PageConfig, Route};
use rand::Rng;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Webview {
    title: String,
    page: i64,
    square_color: String,
    number: u32,
    can_previous: bool,
    can_next: bool,
    /// 等待回复的通知
    #[serde(skip)]
    pending_reply: Option<String>,
}

const TEMPLATE: &str = r#"
<div class="root" oncontextmenu="OnContextMenu">
    <h1>Test Window</h1>
    <ul>
        <li><a href="webview?page=42">To page 42</a></li>
        <li><a href="unknown?page=42">Unknown component</a></li>
        <li><a href="http://theverge.com">External hyperlink</a></li>
        <li><button onclick="OnNextPage">Next Page</button></li>
        <li><button onclick="OnLink">External link</button></li>
        <li><button onclick="NotMapped">Not mapped</button></li>
        <li>
            <button onclick="OnChangeSquareColor">Render Attributes: change square color</button>
            <div class="square {{.SquareColor}}"></div>
        </li>
        <li>
            <button onclick="OnChangeNumber">Render: change number</button>
            <div>{{.Number}}</div>
        </li>
        <li>
            <button onclick="OnShare">Share</button>
            <button onclick="OnShareURL">Share URL</button>
        </li>
        <li>
            <button onclick="OnDirPanel">Dir panel</button>
            <button onclick="OnFilePanel">File panel</button>
            <button onclick="OnMultipleFilePanel">Multiple file panel</button>
            <button onclick="OnSavePanel">Save panel</button>
        </li>
        <li>
            <button onclick="OnNotification">Notification</button>
            <button onclick="OnNotificationWithReply">Notification with reply</button>
        </li>
        <li>
            <button {{if not .CanPrevious}}disabled{{end}} onclick="OnPrevious">Previous</button>
            <button onclick="OnReload">Reload</button>
            <button {{if not .CanNext}}disabled{{end}} onclick="OnNext">Next</button>
        </li>
        <li>
            <div class="square dragdrop blue" draggable="true"
                 data-drag="the blue square on the left" ondragstart="OnDragStart">
                Drag me
            </div>
            <div class="square dragdrop" ondrop="OnDrop" ondragover="js:event.preventDefault()">
                Drop something here
            </div>
        </li>
    </ul>
    <p>Page: {{.Page}}</p>
</div>
"#;

impl Component for Webview {
    fn template(&self) -> &str {
        TEMPLATE
    }

    fn actions(table: &mut ActionTable<Self>) {
        table
            .on("OnContextMenu", Self::on_context_menu)
            .on("OnContextMenuClosed", |_, _| tracing::info!("context menu is closed"))
            .on("OnNextPage", Self::on_next_page)
            .on("OnLink", |_, ctx| ctx.load("http://www.github.com"))
            .on("OnChangeSquareColor", Self::on_change_square_color)
            .on("OnChangeNumber", Self::on_change_number)
            .on("OnShare", Self::on_share)
            .on("OnShareURL", Self::on_share_url)
            .on("OnDirPanel", Self::on_dir_panel)
            .on("OnFilePanel", Self::on_file_panel)
            .on("OnMultipleFilePanel", Self::on_multiple_file_panel)
            .on("OnSavePanel", Self::on_save_panel)
            .on_event("OnFilesSelected", Self::on_files_selected)
            .on_event("OnFileSaved", Self::on_file_saved)
            .on("OnNotification", Self::on_notification)
            .on("OnNotificationWithReply", Self::on_notification_with_reply)
            .on_event("OnNotificationReply", Self::on_notification_reply)
            .on("OnPrevious", |_, ctx| ctx.previous())
            .on("OnReload", |_, ctx| ctx.reload())
            .on("OnNext", |_, ctx| ctx.next())
            .on_event("OnDragStart", |_, _, e: DragAndDropEvent| log_drag("drag", &e))
            .on_event("OnDrop", |_, _, e: DragAndDropEvent| log_drag("drop", &e));
    }

    fn on_navigate(&mut self, ctx: &mut Context<'_>, route: &Route) {
        if let Some(page) = route.query("page") {
            self.page = page.parse().unwrap_or(0);
        }
        if self.page == 0 {
            self.page = 1;
        }
        self.can_previous = ctx.can_previous();
        self.can_next = ctx.can_next();
        ctx.render();
    }

    fn page_config(&self) -> Option<PageConfig> {
        Some(PageConfig::with_title(format!("Test component {}", self.page)))
    }
}

impl Webview {
    fn on_context_menu(&mut self, ctx: &mut Context<'_>) {
        let config = MenuConfig {
            default_url: Some("menu".to_string()),
        };
        if let Err(e) = ctx.open_context_menu(config, Some("OnContextMenuClosed")) {
            tracing::error!("{}", e);
        }
    }

    fn on_next_page(&mut self, ctx: &mut Context<'_>) {
        ctx.load(format!("/webview?page={}", self.page.saturating_add(1)));
    }

    fn on_change_square_color(&mut self, ctx: &mut Context<'_>) {
        self.square_color = match self.square_color.as_str() {
            "blue" => "pink",
            "pink" => "",
            _ => "blue",
        }
        .to_string();
        ctx.render();
    }

    fn on_change_number(&mut self, ctx: &mut Context<'_>) {
        self.number = rand::thread_rng().gen();
        ctx.render();
    }

    fn on_share(&mut self, ctx: &mut Context<'_>) {
        if let Err(e) = ctx.share(ShareContent::Text("Hello world".to_string())) {
            tracing::error!("{}", e);
        }
    }

    fn on_share_url(&mut self, ctx: &mut Context<'_>) {
        let url = match Url::parse("https://github.com/murlokswarm/app") {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("{}", e);
                return;
            }
        };
        if let Err(e) = ctx.share(ShareContent::Url(url)) {
            tracing::error!("{}", e);
        }
    }

    fn on_dir_panel(&mut self, ctx: &mut Context<'_>) {
        open_file_panel(
            ctx,
            FilePanelConfig {
                ignore_files: true,
                ..Default::default()
            },
        );
    }

    fn on_file_panel(&mut self, ctx: &mut Context<'_>) {
        open_file_panel(
            ctx,
            FilePanelConfig {
                ignore_directories: true,
                show_hidden_files: true,
                file_types: vec!["public.jpeg".to_string(), "gif".to_string()],
                ..Default::default()
            },
        );
    }

    fn on_multiple_file_panel(&mut self, ctx: &mut Context<'_>) {
        open_file_panel(
            ctx,
            FilePanelConfig {
                ignore_directories: true,
                multiple_selection: true,
                ..Default::default()
            },
        );
    }

    fn on_save_panel(&mut self, ctx: &mut Context<'_>) {
        if let Err(e) = ctx.open_save_file_panel(SaveFilePanelConfig::default(), "OnFileSaved") {
            tracing::error!("{}", e);
        }
    }

    fn on_files_selected(&mut self, _ctx: &mut Context<'_>, filenames: Vec<String>) {
        tracing::info!("selected: {:?}", filenames);
    }

    fn on_file_saved(&mut self, _ctx: &mut Context<'_>, filename: String) {
        tracing::info!("save to: {}", filename);
    }

    fn on_notification(&mut self, ctx: &mut Context<'_>) {
        let config = NotificationConfig {
            title: "hello".to_string(),
            subtitle: "world".to_string(),
            text: Uuid::new_v4().to_string(),
            image_name: "logo.png".to_string(),
            sound: true,
        };
        if let Err(e) = ctx.show_notification(config, None) {
            tracing::error!("{}", e);
        }
    }

    fn on_notification_with_reply(&mut self, ctx: &mut Context<'_>) {
        let id = Uuid::new_v4().to_string();
        let config = NotificationConfig {
            title: "hello".to_string(),
            subtitle: "world".to_string(),
            text: id.clone(),
            image_name: "logo.png".to_string(),
            sound: true,
        };
        match ctx.show_notification(config, Some("OnNotificationReply")) {
            Ok(()) => self.pending_reply = Some(id),
            Err(e) => tracing::error!("{}", e),
        }
    }

    fn on_notification_reply(&mut self, ctx: &mut Context<'_>, reply: String) {
        let config = NotificationConfig {
            title: "reply to".to_string(),
            subtitle: self.pending_reply.take().unwrap_or_default(),
            text: reply,
            sound: true,
            ..Default::default()
        };
        if let Err(e) = ctx.show_notification(config, None) {
            tracing::error!("{}", e);
        }
    }
}

fn open_file_panel(ctx: &mut Context<'_>, config: FilePanelConfig) {
    if let Err(e) = ctx.open_file_panel(config, "OnFilesSelected") {
        tracing::error!("{}", e);
    }
}

fn log_drag(kind: &str, event: &DragAndDropEvent) {
    match serde_json::to_string_pretty(event) {
        Ok(data) => tracing::info!("{}: {}", kind, data),
        Err(e) => tracing::error!("{}", e),
    }
}
