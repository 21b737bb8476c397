//! 检测器配置管理

use std::time::Duration;

/// 消息响应中默认返回的 meta 名称
pub const DEFAULT_META_NAME: &str = "generator";
/// 消息响应中脚本地址预览的默认上限
pub const DEFAULT_SCRIPT_PREVIEW_LIMIT: usize = 50;
/// 默认最大 HTML 长度（2MB）
pub const DEFAULT_MAX_HTML_LEN: usize = 2 * 1024 * 1024;

/// 检测器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    /// runDetector 响应里回传内容的 meta 名称（精确匹配）
    pub meta_name: String,
    /// runDetector 响应里最多回传的脚本地址数量
    pub script_preview_limit: usize,
    /// 从原始 HTML 构建快照时保留的最大字节数
    pub max_html_len: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            meta_name: DEFAULT_META_NAME.to_string(),
            script_preview_limit: DEFAULT_SCRIPT_PREVIEW_LIMIT,
            max_html_len: DEFAULT_MAX_HTML_LEN,
        }
    }
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

impl RetryPolicy {
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => *n as usize,
        }
    }
}

/// 网络拉取相关选项
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    pub timeout: Duration,  // HTTP 超时
    pub retry: RetryPolicy, // 重试策略
    pub user_agent: String,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            retry: RetryPolicy::Times(1),
            user_agent: format!("siteprobe/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: DetectorConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta_name(mut self, name: impl Into<String>) -> Self {
        self.config.meta_name = name.into();
        self
    }

    pub fn script_preview_limit(mut self, limit: usize) -> Self {
        self.config.script_preview_limit = limit;
        self
    }

    /// 为 0 时回退到默认值
    pub fn max_html_len(mut self, len: usize) -> Self {
        self.config.max_html_len = if len == 0 { DEFAULT_MAX_HTML_LEN } else { len };
        self
    }

    pub fn build(self) -> DetectorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.meta_name, "generator");
        assert_eq!(config.script_preview_limit, 50);
        assert_eq!(config.max_html_len, 2 * 1024 * 1024);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CustomConfigBuilder::new()
            .meta_name("framework")
            .script_preview_limit(5)
            .max_html_len(0)
            .build();
        assert_eq!(config.meta_name, "framework");
        assert_eq!(config.script_preview_limit, 5);
        assert_eq!(config.max_html_len, DEFAULT_MAX_HTML_LEN);
    }

    #[test]
    fn test_retry_policy() {
        assert_eq!(RetryPolicy::Never.max_retries(), 0);
        assert_eq!(RetryPolicy::Times(3).max_retries(), 3);
    }
}
