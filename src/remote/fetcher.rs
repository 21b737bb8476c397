//! Remote page fetcher module
//! 远程页面拉取工具
//! 核心特性：
//! 1. 纯异步设计（基于tokio异步运行时）
//! 2. 可配置重试策略（Never/Times(n)），两次尝试间固定间隔1秒
//! 3. 仅在引擎边界之外使用：拉取得到的 HTML 与 Header 交给快照构建与报告
use std::future::Future;
use std::time::Duration;

use http::header::HeaderMap;
use reqwest::Client;

use crate::config::RemoteOptions;
use crate::error::{ProbeResult, SiteProbeError};
use crate::message::HeaderReport;
use crate::utils::HeaderConverter;

const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// 拉取结果
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 跟随重定向后的最终地址
    pub final_url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// 远程页面拉取器
#[derive(Debug, Clone)]
pub struct RemotePageFetcher {
    client: Client,
    options: RemoteOptions,
}

impl RemotePageFetcher {
    pub fn new(options: RemoteOptions) -> ProbeResult<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| SiteProbeError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, options })
    }

    /// 通用异步重试逻辑，保留最后一次错误
    async fn simple_retry<F, Fut, T>(&self, mut func: F) -> ProbeResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeResult<T>>,
    {
        let max_retries = self.options.retry.max_retries();
        let mut last_err: Option<SiteProbeError> = None;

        for attempt in 0..=max_retries {
            match func().await {
                Ok(res) => return Ok(res),
                Err(e) => {
                    if attempt < max_retries {
                        log::warn!(
                            "Request failed: {}, retrying (attempt {}/{})",
                            e,
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(RETRY_PAUSE).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            SiteProbeError::NetworkError("All retry attempts exhausted".to_string())
        }))
    }

    /// GET 拉取页面（Header + Body）
    pub async fn fetch(&self, url: &str) -> ProbeResult<FetchedPage> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SiteProbeError::InvalidInput(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        self.simple_retry(|| {
            let client = self.client.clone();
            let url = parsed.clone();
            async move {
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| SiteProbeError::NetworkError(format!("Request to {} failed: {}", url, e)))?;

                let final_url = response.url().to_string();
                let status = response.status().as_u16();
                let headers = response.headers().clone();
                let body = response
                    .text()
                    .await
                    .map_err(|e| SiteProbeError::NetworkError(format!("Failed to read body of {}: {}", url, e)))?;

                log::debug!(
                    "Fetched {} | status: {} | headers: {} | body bytes: {}",
                    final_url,
                    status,
                    headers.len(),
                    body.len()
                );

                Ok(FetchedPage {
                    final_url,
                    status,
                    headers,
                    body,
                })
            }
        })
        .await
    }

    /// fetchHeaders 消息的实现：失败转换为 ok=false 报告，不返回错误
    pub async fn fetch_headers(&self, url: &str) -> HeaderReport {
        match self.fetch(url).await {
            Ok(page) => HeaderReport::success(
                page.status,
                HeaderConverter::to_single_value(&page.headers),
            ),
            Err(e) => {
                log::warn!("fetchHeaders for {} failed: {}", url, e);
                HeaderReport::failure(e.to_string())
            }
        }
    }
}
