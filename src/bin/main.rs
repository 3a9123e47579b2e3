//! Mini Webview 宿主进程
//!
//! stdin 每行一个入站 UI 事件，stdout 每行一条出站消息，日志写 stderr。
//! 用法：`mini-webview-host [app.json]`

mod host;

use mini_webview::bridge::JsonLinesTransport;
use mini_webview::native::LogHost;
use mini_webview::{App, AppConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig {
            default_url: Some("webview".to_string()),
            ..Default::default()
        },
    };
    tracing::info!("starting with default url {:?}", config.default_url);

    let transport = Arc::new(JsonLinesTransport::new(io::stdout()));
    let mut app = App::new(host::registry()?, transport)
        .with_config(config)
        .with_native_host(Arc::new(LogHost));
    app.open_default_window()?;

    let handled = app.serve(io::stdin().lock())?;

    tracing::info!("stdin closed after {} tasks, shutting down", handled);
    let windows: Vec<_> = app.window_ids().collect();
    for id in windows {
        app.close_window(id)?;
    }
    Ok(())
}
