//! 配置模块
pub mod detector;

pub use self::detector::{
    CustomConfigBuilder, DetectorConfig, RemoteOptions, RetryPolicy, DEFAULT_MAX_HTML_LEN,
    DEFAULT_META_NAME, DEFAULT_SCRIPT_PREVIEW_LIMIT,
};
