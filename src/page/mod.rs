//! 页面模块：页面上下文抽象与快照实现
pub mod context;
pub mod snapshot;

pub use self::context::PageContext;
pub use self::snapshot::{PageSnapshot, PageSnapshotBuilder};
