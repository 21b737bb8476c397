//! 全局错误类型定义
//! 两层错误：
//! - RuleError：单条检测规则内部失败，只在引擎内部被捕获和记录，永不越过引擎边界
//! - SiteProbeError：引擎之外的一切（页面构建、消息、网络、IO）
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;
use url::ParseError as UrlParseError;

/// 单条规则谓词的失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 规则内正则无法编译
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// 谓词依赖的页面信号缺失
    #[error("Missing page signal: {0}")]
    MissingSignal(String),

    /// 谓词主动报告的失败
    #[error("Predicate failed: {0}")]
    Failed(String),

    /// 谓词 panic（由引擎的失败边界转换而来）
    #[error("Predicate panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum SiteProbeError {
    // 检测器相关错误
    #[error("Detector initialization failed: {0}")]
    DetectorInitError(String),

    // 页面相关错误
    #[error("Page capture failed: {0}")]
    PageCaptureError(String),

    // 网络相关错误
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Header value to string failed: {0}")]
    HeaderToStrError(#[from] http::header::ToStrError),

    // 序列化/反序列化错误
    #[error("JSON error: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("URL parse error: {0}")]
    UrlError(#[from] UrlParseError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),
}

// 全局Result类型
pub type ProbeResult<T> = Result<T, SiteProbeError>;

/// 规则谓词的返回类型
pub type RuleOutcome = Result<bool, RuleError>;
