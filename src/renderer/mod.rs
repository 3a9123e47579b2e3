//! 渲染器

pub mod pipeline;

pub use pipeline::{RenderOutput, RenderPipeline};
