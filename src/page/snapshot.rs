//! 页面快照：PageContext 的自有数据实现
//! 可手动构建（builder），也可从原始 HTML 提取构建
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use url::Url;

use super::context::PageContext;
use crate::config::DetectorConfig;
use crate::error::ProbeResult;
use crate::utils::extractor::{HtmlExtractor, HtmlInputGuard};

/// 页面快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub location: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub script_srcs: Vec<String>,
    #[serde(default)]
    pub link_hrefs: Vec<String>,
    /// (name, content)，文档顺序
    #[serde(default)]
    pub meta_tags: Vec<(String, String)>,
    #[serde(default)]
    pub globals: FxHashSet<String>,
    #[serde(default)]
    pub html: String,
}

impl PageSnapshot {
    pub fn builder() -> PageSnapshotBuilder {
        PageSnapshotBuilder::default()
    }

    /// 从原始 HTML 构建快照（默认配置）
    pub fn from_html(html: &str, location: Option<&str>) -> ProbeResult<Self> {
        Self::from_html_with_config(html, location, &DetectorConfig::default())
    }

    /// 从原始 HTML 构建快照
    /// - location 存在时必须是合法 URL，脚本/样式地址会基于它解析为绝对地址
    /// - 全局标识无法从 HTML 推断，需要调用方通过 `globals` 补充
    pub fn from_html_with_config(
        html: &str,
        location: Option<&str>,
        config: &DetectorConfig,
    ) -> ProbeResult<Self> {
        let base = location.map(Url::parse).transpose()?;
        let html = HtmlInputGuard::truncate(html, config.max_html_len);

        let mut snapshot = PageSnapshot {
            location: base.as_ref().map(|u| u.to_string()).unwrap_or_default(),
            html: html.to_string(),
            ..Self::default()
        };

        if !HtmlInputGuard::has_content(html) {
            log::debug!("Empty HTML input, snapshot carries no extracted signals");
            return Ok(snapshot);
        }

        let extracted = HtmlExtractor::extract(html);
        snapshot.script_srcs = resolve_all(base.as_ref(), extracted.script_srcs);
        snapshot.link_hrefs = resolve_all(base.as_ref(), extracted.link_hrefs);
        snapshot.meta_tags = extracted.meta_tags;
        snapshot.title = extracted.title;

        Ok(snapshot)
    }

    /// 追加全局标识（链式）
    pub fn with_globals<I, S>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globals.extend(globals.into_iter().map(Into::into));
        self
    }
}

/// 与 HTMLScriptElement.src 一致：能解析则给出绝对地址，否则保留原值
fn resolve_all(base: Option<&Url>, values: Vec<String>) -> Vec<String> {
    match base {
        None => values,
        Some(base) => values
            .into_iter()
            .map(|v| match base.join(&v) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => v,
            })
            .collect(),
    }
}

impl PageContext for PageSnapshot {
    fn script_srcs(&self) -> &[String] {
        &self.script_srcs
    }

    fn link_hrefs(&self) -> &[String] {
        &self.link_hrefs
    }

    fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta_tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    fn has_global(&self, marker: &str) -> bool {
        self.globals.contains(marker)
    }

    fn html(&self) -> &str {
        &self.html
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// 快照构建器
#[derive(Debug, Clone, Default)]
pub struct PageSnapshotBuilder {
    snapshot: PageSnapshot,
}

impl PageSnapshotBuilder {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.snapshot.location = location.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.snapshot.title = Some(title.into());
        self
    }

    pub fn script(mut self, src: impl Into<String>) -> Self {
        self.snapshot.script_srcs.push(src.into());
        self
    }

    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.snapshot.link_hrefs.push(href.into());
        self
    }

    pub fn meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.snapshot.meta_tags.push((name.into(), content.into()));
        self
    }

    pub fn global(mut self, marker: impl Into<String>) -> Self {
        self.snapshot.globals.insert(marker.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.snapshot.html = html.into();
        self
    }

    pub fn build(self) -> PageSnapshot {
        self.snapshot
    }
}
