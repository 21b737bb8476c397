//! siteprobe - 基于规则表的网页技术栈检测库
//! 对显式注入的页面上下文（脚本地址、样式地址、meta、全局标识、原始 HTML）
//! 逐条执行相互独立的检测规则，单条规则失败不影响整体扫描

pub mod config;
pub mod detector;
pub mod error;
pub mod message;
pub mod page;
#[cfg(feature = "remote-fetch")]
pub mod remote;
pub mod rule;
pub mod utils;

// 导出全局错误类型
pub use self::error::{ProbeResult, RuleError, RuleOutcome, SiteProbeError};

// 导出配置模块核心结构体与构建器
pub use crate::config::{CustomConfigBuilder, DetectorConfig, RemoteOptions, RetryPolicy};

// 导出页面上下文
pub use crate::page::{PageContext, PageSnapshot, PageSnapshotBuilder};

// 导出规则模块核心接口与数据结构
pub use crate::rule::{builtin_rules, Condition, DetectionResult, DetectionRule, Matcher, RuleTable};

// 导出检测模块核心接口
pub use crate::detector::{
    global_engine, init_global_engine, run_detectors, DetectorEngine, RuleFailure, ScanReport,
};

// 导出消息边界
pub use crate::message::{
    dispatch_json, ContentHandler, DetectorReport, ErrorReply, HeaderReport, MessageHandler,
    PageSource, Request, Response,
};

// 导出通用工具
pub use crate::utils::{HeaderConverter, HtmlExtractor, VersionExtractor};

#[cfg(feature = "remote-fetch")]
pub use crate::remote::{FetchedPage, RemotePageFetcher};
