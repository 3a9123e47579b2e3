//! 页面文档
//!
//! 根组件挂载时可以提供标题、meta、样式表和脚本，外层 HTML 文档
//! 只在挂载时生成一次。

use crate::config::PageDefaults;
use crate::error::TemplateError;
use crate::parser::Template;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
{{range .Metas}}    <meta{{if .Name}} name="{{.Name}}"{{end}}{{if .HTTPEquiv}} http-equiv="{{.HTTPEquiv}}"{{end}}{{if .Content}} content="{{.Content}}"{{end}}>
{{end}}    <title>{{.Title}}</title>
{{if not .DisableAppStyle}}    <style media="all" type="text/css">
        html, body { height: 100%; width: 100%; margin: 0; }
    </style>
{{end}}{{range .CSS}}    <link type="text/css" rel="stylesheet" href="{{.}}">
{{end}}</head>
<body oncontextmenu="event.preventDefault()">
<div data-mini-root>{{raw .Root}}</div>
{{if .AppJS}}<script>{{raw .AppJS}}</script>
{{end}}{{range .Javascripts}}<script src="{{.}}"></script>
{{end}}</body>
</html>
"#;

static DOCUMENT: Lazy<Result<Template, TemplateError>> = Lazy::new(|| Template::parse(DOCUMENT_TEMPLATE));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Meta {
    pub name: String,
    #[serde(rename = "HTTPEquiv")]
    pub http_equiv: String,
    pub content: String,
}

/// 根组件的页面信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub title: String,
    pub metas: Vec<Meta>,
    pub css: Vec<String>,
    pub javascripts: Vec<String>,
    pub disable_app_style: bool,
    pub app_js: String,
}

impl PageConfig {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// 叠加应用级默认值：默认样式表和脚本排在组件自己的前面
    pub fn merged_with(mut self, defaults: &PageDefaults) -> Self {
        self.css = defaults.css.iter().cloned().chain(self.css).collect();
        self.javascripts = defaults.javascripts.iter().cloned().chain(self.javascripts).collect();
        self.disable_app_style |= defaults.disable_app_style;
        if self.app_js.is_empty() {
            self.app_js = defaults.app_js.clone();
        }
        self
    }

    /// 生成包裹根组件标记的完整 HTML 文档
    pub fn document(&self, root_markup: &str) -> Result<String, TemplateError> {
        let template = DOCUMENT.as_ref().map_err(Clone::clone)?;
        template.render(&json!({
            "Title": self.title,
            "Metas": self.metas,
            "CSS": self.css,
            "Javascripts": self.javascripts,
            "DisableAppStyle": self.disable_app_style,
            "AppJS": self.app_js,
            "Root": root_markup,
        }))
    }
}
