//! 示例宿主注册的组件

mod menu;
mod webview;

use mini_webview::{Registry, Result};

pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register::<webview::Webview>("webview")?;
    registry.register::<menu::Menu>("menu")?;
    Ok(registry)
}
