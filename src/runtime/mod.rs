//! 应用运行时：窗口、导航和任务队列

pub mod app;
pub mod navigation;
pub mod window;

pub use app::{App, Task};
pub use navigation::{parse_url, NavEntry, Route, Target};
pub use window::{Window, WindowConfig};
