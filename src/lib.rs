//! Mini Webview - 基于 webview 的桌面应用框架核心
//! 组件注册与动作分发、模板渲染、带序号的渲染管线、窗口导航历史、桥接层

pub mod error;
pub use error::{Error, Result, TemplateError};

// 事件系统
pub mod event;
pub use event::{DragAndDropEvent, InstanceId, UiEvent, WindowId};

// 组件模型
pub mod component;
pub use component::{ActionTable, Component, Context, Descriptor, PayloadShape, Registry};

// 模板解析器
pub mod parser;

// 渲染管线
pub mod renderer;

// Native 桥接
pub mod bridge;

// 原生能力接口
pub mod native;

// 页面文档
pub mod page;
pub use page::{Meta, PageConfig};

// 应用配置
pub mod config;
pub use config::AppConfig;

// 错误上报
pub mod report;

// 应用运行时
pub mod runtime;
pub use runtime::{App, Route, Window, WindowConfig};

// 单元测试
#[cfg(test)]
mod tests;
