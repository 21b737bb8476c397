//! 消息协议：请求按 `type` 字段区分，响应为无标签 JSON 对象
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;
use crate::detector::DetectorEngine;
use crate::page::PageContext;
use crate::rule::core::DetectionResult;

/// 入站请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// {"type":"runDetector"}
    RunDetector,
    /// {"type":"fetchHeaders","url":"..."}
    FetchHeaders { url: String },
}

/// 出站响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Detector(DetectorReport),
    Headers(HeaderReport),
    Error(ErrorReply),
}

/// runDetector 的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorReport {
    pub url: String,
    pub title: Option<String>,
    /// 配置的 meta 名称（默认 generator）对应的 content
    pub generator: Option<String>,
    /// 前 N 个脚本地址（预览，不是全集）
    pub scripts: Vec<String>,
    pub results: Vec<DetectionResult>,
}

impl DetectorReport {
    /// 对当前页面上下文执行一次完整扫描并组装响应
    pub fn build(engine: &DetectorEngine, ctx: &dyn PageContext, config: &DetectorConfig) -> Self {
        Self {
            url: ctx.location().to_string(),
            title: ctx.title().map(str::to_string),
            generator: ctx.meta_content(&config.meta_name).map(str::to_string),
            scripts: ctx
                .script_srcs()
                .iter()
                .take(config.script_preview_limit)
                .cloned()
                .collect(),
            results: engine.run(ctx),
        }
    }
}

/// fetchHeaders 的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HeaderReport {
    pub fn success(status: u16, headers: FxHashMap<String, String>) -> Self {
        Self {
            ok: true,
            status: Some(status),
            headers: Some(headers.into_iter().collect()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            headers: None,
            error: Some(error.into()),
        }
    }
}

/// 无法处理请求时的统一回复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub ok: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorReply {
    fn new(reason: &str, error: Option<String>) -> Self {
        Self {
            ok: false,
            reason: reason.to_string(),
            error,
        }
    }

    /// 未知消息类型或无法解析的消息
    pub fn unknown() -> Self {
        Self::new("unknown", None)
    }

    /// 当前处理器不支持该请求
    pub fn unsupported() -> Self {
        Self::new("unsupported", None)
    }

    /// 页面上下文无法获取
    pub fn page_unavailable(error: impl Into<String>) -> Self {
        Self::new("pageUnavailable", Some(error.into()))
    }
}
