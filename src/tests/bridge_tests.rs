//! 桥接层单元测试

use super::{Harness, Webview};
use crate::bridge::{
    decode_inbound, decode_outbound, encode_inbound, encode_outbound, ApplyOutcome, ChannelTransport,
    JsonLinesTransport, OutboundMessage, Surface, Transport,
};
use crate::component::Registry;
use crate::error::Error;
use crate::event::{InstanceId, UiEvent, WindowId};
use crate::runtime::{App, WindowConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

/// 测试入站事件的线上格式
#[test]
fn test_decode_inbound() {
    let event = decode_inbound(
        r#"{"windowId":1,"instanceId":3,"actionName":"OnDrop","payload":{"source":"a","x":1}}"#,
    )
    .unwrap();
    assert_eq!(event.window_id, WindowId(1));
    assert_eq!(event.instance_id, InstanceId(3));
    assert_eq!(event.action_name, "OnDrop");
    assert_eq!(event.payload, Some(json!({ "source": "a", "x": 1 })));

    let event = decode_inbound(r#"{"windowId":1,"instanceId":3,"actionName":"OnNextPage"}"#).unwrap();
    assert_eq!(event.payload, None);
    assert_eq!(
        encode_inbound(&event).unwrap(),
        r#"{"windowId":1,"instanceId":3,"actionName":"OnNextPage"}"#
    );

    assert!(matches!(decode_inbound(r#"{"windowId":1}"#), Err(Error::Bridge(_))));
}

/// 测试出站消息带 type 标签、字段为驼峰
#[test]
fn test_encode_outbound() {
    let render = OutboundMessage::Render {
        window_id: WindowId(1),
        instance_id: InstanceId(3),
        sequence_number: 2,
        markup: "<p></p>".to_string(),
    };
    let value: serde_json::Value = serde_json::from_str(&encode_outbound(&render).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "render",
            "windowId": 1,
            "instanceId": 3,
            "sequenceNumber": 2,
            "markup": "<p></p>",
        })
    );

    let opened = OutboundMessage::WindowOpened {
        window_id: WindowId(2),
        config: WindowConfig::default(),
    };
    let value = serde_json::to_value(&opened).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "window-opened",
            "windowId": 2,
            "config": { "title": "Mini App", "width": 1024, "height": 768, "resizable": true },
        })
    );
    assert_eq!(opened.window_id(), WindowId(2));

    let closed = decode_outbound(r#"{"type":"window-closed","windowId":2}"#).unwrap();
    assert_eq!(closed, OutboundMessage::WindowClosed { window_id: WindowId(2) });
}

/// 测试每条消息写成一行
#[test]
fn test_json_lines_transport() {
    let transport = JsonLinesTransport::new(Vec::new());
    transport.send(OutboundMessage::WindowClosed { window_id: WindowId(1) }).unwrap();
    transport.send(OutboundMessage::WindowClosed { window_id: WindowId(2) }).unwrap();

    let output = String::from_utf8(transport.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"type":"window-closed","windowId":1}"#,
            r#"{"type":"window-closed","windowId":2}"#,
        ]
    );
}

/// 测试入站一行 JSON 经队列分发到处理函数
#[test]
fn test_handle_inbound() {
    let mut h = Harness::new();
    h.load("webview").unwrap();

    let line = format!(
        r#"{{"windowId":{},"instanceId":{},"actionName":"OnChangeSquareColor"}}"#,
        h.window.0,
        h.current().0
    );
    h.app.handle_inbound(&line).unwrap();
    assert_eq!(h.app.pump_all(), 1);
    assert_eq!(h.webview().square_color, "blue");

    assert!(matches!(h.app.handle_inbound("not json"), Err(Error::Bridge(_))));
}

/// 测试读取循环跳过非 UTF-8 字节和坏行，直到输入结束
#[test]
fn test_serve_skips_bad_lines() {
    let mut h = Harness::new();
    h.load("webview").unwrap();

    let mut input = b"\xff\xfe\n".to_vec();
    input.extend_from_slice(
        format!(
            r#"{{"windowId":{},"instanceId":{},"actionName":"OnChangeSquareColor"}}"#,
            h.window.0,
            h.current().0
        )
        .as_bytes(),
    );
    input.extend_from_slice(b"\nnot json\n\n\xc3");

    assert_eq!(h.app.serve(&input[..]).unwrap(), 1);
    assert_eq!(h.webview().square_color, "blue");
    assert!(h.reporter.errors().is_empty());
}

/// 测试从运行时到宿主渲染面的完整链路
#[test]
fn test_channel_transport_to_surface() {
    let mut registry = Registry::new();
    registry.register::<Webview>("webview").unwrap();
    let (transport, receiver) = ChannelTransport::new();
    let mut app = App::new(registry, Arc::new(transport));

    let window = app
        .open_window(WindowConfig {
            default_url: Some("webview?page=3".to_string()),
            ..Default::default()
        })
        .unwrap();
    let id = app.window(window).unwrap().current().unwrap();
    app.post(UiEvent::new(window, id, "OnChangeSquareColor")).unwrap();
    app.pump(window).unwrap();

    let mut surface = Surface::new();
    let lines: Vec<String> = receiver.try_iter().collect();
    // window-opened、page、两次 render
    assert_eq!(lines.len(), 4);
    for line in lines.iter().rev() {
        surface.apply_wire(line).unwrap();
    }

    assert_eq!(surface.sequence(id), Some(2));
    assert!(surface.markup(id).unwrap().contains(r#"class="square blue""#));
    assert_eq!(surface.title(window), Some("Test component 3"));
    let document = surface.document(window).unwrap();
    assert!(document.contains("<title>Test component 3</title>"));
    assert!(document.contains("<div data-mini-root><div class=\"root\">"));

    // 首次渲染晚到
    let first = lines.iter().find(|l| l.contains(r#""sequenceNumber":1"#)).unwrap();
    assert_eq!(surface.apply_wire(first).unwrap(), ApplyOutcome::Stale);
}
