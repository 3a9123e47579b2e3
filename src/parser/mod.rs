//! 模板解析器

pub mod template;

pub use template::{Template, TemplateEngine};
