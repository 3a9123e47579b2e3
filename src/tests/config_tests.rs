//! 配置与页面文档单元测试

use crate::config::{AppConfig, PageDefaults};
use crate::error::Error;
use crate::page::{Meta, PageConfig};
use pretty_assertions::assert_eq;

/// 测试解析 app.json
#[test]
fn test_app_config_from_json() {
    let config = AppConfig::from_json(
        r#"{
            "defaultUrl": "webview",
            "window": { "title": "Test", "width": 800 },
            "page": { "css": ["app.css"], "appJs": "console.log(1)" }
        }"#,
    )
    .unwrap();

    assert_eq!(config.default_url.as_deref(), Some("webview"));
    assert_eq!(config.window.title, "Test");
    assert_eq!(config.window.width, 800);
    // 未给出的字段取默认值
    assert_eq!(config.window.height, 768);
    assert!(config.window.resizable);
    assert_eq!(config.page.css, vec!["app.css"]);
    assert_eq!(config.page.app_js, "console.log(1)");
}

/// 测试窗口 URL 回落到应用级默认值
#[test]
fn test_window_config_fallback() {
    let config = AppConfig::from_json(r#"{ "defaultUrl": "webview" }"#).unwrap();
    assert_eq!(config.window_config().default_url.as_deref(), Some("webview"));

    let config =
        AppConfig::from_json(r#"{ "defaultUrl": "webview", "window": { "defaultUrl": "menu" } }"#).unwrap();
    assert_eq!(config.window_config().default_url.as_deref(), Some("menu"));

    assert_eq!(AppConfig::default().window_config().default_url, None);
}

/// 测试错误的配置
#[test]
fn test_invalid_config() {
    assert!(matches!(AppConfig::from_json("{ nope"), Err(Error::Config(_))));
    assert!(matches!(
        AppConfig::from_json(r#"{ "window": { "width": "wide" } }"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        AppConfig::load("/definitely/not/here/app.json"),
        Err(Error::Config(_))
    ));
}

/// 测试页面文档
#[test]
fn test_page_document() {
    let page = PageConfig {
        title: "Hello <World>".to_string(),
        metas: vec![Meta {
            name: "viewport".to_string(),
            content: "width=device-width".to_string(),
            ..Default::default()
        }],
        css: vec!["page.css".to_string()],
        javascripts: vec!["page.js".to_string()],
        ..Default::default()
    };
    let document = page.document("<p>root</p>").unwrap();

    assert!(document.starts_with("<!DOCTYPE html>"));
    assert!(document.contains("<title>Hello &lt;World&gt;</title>"));
    assert!(document.contains(r#"<meta name="viewport" content="width=device-width">"#));
    assert!(document.contains(r#"<link type="text/css" rel="stylesheet" href="page.css">"#));
    assert!(document.contains(r#"<script src="page.js"></script>"#));
    assert!(document.contains("<div data-mini-root><p>root</p></div>"));
    assert!(document.contains("html, body"));
    assert!(!document.contains("<script>"));
}

/// 测试应用级默认值的叠加
#[test]
fn test_page_defaults_merge() {
    let defaults = PageDefaults {
        disable_app_style: true,
        css: vec!["app.css".to_string()],
        javascripts: vec!["app.js".to_string()],
        app_js: "boot()".to_string(),
    };
    let page = PageConfig {
        css: vec!["page.css".to_string()],
        ..PageConfig::with_title("Page")
    }
    .merged_with(&defaults);

    assert_eq!(page.css, vec!["app.css", "page.css"]);
    assert_eq!(page.javascripts, vec!["app.js"]);
    assert!(page.disable_app_style);

    let document = page.document("").unwrap();
    assert!(!document.contains("html, body"));
    assert!(document.contains("<script>boot()</script>"));
    assert!(document.find("app.css").unwrap() < document.find("page.css").unwrap());
}
