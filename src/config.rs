//! 应用配置（app.json）
//!
//! ```json
//! {
//!   "defaultUrl": "webview",
//!   "window": { "title": "Test", "width": 1024, "height": 768 },
//!   "page": { "css": ["app.css"], "javascripts": [] }
//! }
//! ```

use crate::error::{Error, Result};
use crate::runtime::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// 新窗口没有指定 URL 时加载的地址
    pub default_url: Option<String>,
    pub window: WindowConfig,
    pub page: PageDefaults,
}

/// 所有根组件页面共享的默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDefaults {
    pub disable_app_style: bool,
    pub css: Vec<String>,
    pub javascripts: Vec<String>,
    pub app_js: String,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(format!("Failed to parse app config: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// 窗口配置，缺省 URL 时回落到应用级 `defaultUrl`
    pub fn window_config(&self) -> WindowConfig {
        let mut window = self.window.clone();
        if window.default_url.is_none() {
            window.default_url = self.default_url.clone();
        }
        window
    }
}
