//! 上下文菜单的内容组件

use mini_webview::{ActionTable, Component, Context};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Menu {
    last_choice: String,
}

impl Component for Menu {
    fn template(&self) -> &str {
        r#"<div class="menu">
    <div class="menu-item" onclick="OnCopy">Copy</div>
    <div class="menu-item" onclick="OnPaste">Paste</div>
    {{if .LastChoice}}<div class="menu-footer">Last: {{.LastChoice}}</div>{{end}}
</div>"#
    }

    fn actions(table: &mut ActionTable<Self>) {
        table
            .on("OnCopy", |menu, ctx| menu.choose(ctx, "copy"))
            .on("OnPaste", |menu, ctx| menu.choose(ctx, "paste"));
    }
}

impl Menu {
    fn choose(&mut self, ctx: &mut Context<'_>, choice: &str) {
        tracing::info!("menu: {}", choice);
        self.last_choice = choice.to_string();
        ctx.render();
    }
}
