//! 错误类型

use crate::component::PayloadShape;
use crate::event::WindowId;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    #[error("Component name is empty")]
    EmptyName,

    #[error("Component '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("Action '{action}' is not defined on component '{component}'")]
    ActionNotFound { component: String, action: String },

    #[error("Action '{action}' of component '{component}' expects {expected}: {reason}")]
    SignatureMismatch {
        component: String,
        action: String,
        expected: PayloadShape,
        reason: String,
    },

    #[error("Render of component '{component}' failed: {source}")]
    Template {
        component: String,
        #[source]
        source: TemplateError,
    },

    #[error("No {direction} history entry")]
    NoHistory { direction: Direction },

    #[error("Unknown window {0}")]
    UnknownWindow(WindowId),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Snapshot of component '{component}' failed: {reason}")]
    Snapshot { component: String, reason: String },

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("Native capability '{capability}' failed: {reason}")]
    Native {
        capability: &'static str,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Bridge(e.to_string())
    }
}

/// 模板语法或求值错误，只影响本次渲染
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct TemplateError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl TemplateError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// 历史导航方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
    Current,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Previous => write!(f, "previous"),
            Direction::Next => write!(f, "next"),
            Direction::Current => write!(f, "current"),
        }
    }
}
