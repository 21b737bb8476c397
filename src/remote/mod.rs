//! 远程拉取模块（remote-fetch 特性）
pub mod fetcher;

pub use self::fetcher::{FetchedPage, RemotePageFetcher};
