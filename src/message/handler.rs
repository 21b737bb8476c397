//! 消息处理边界
//! 每次请求都通过 PageSource 重新获取页面上下文，再同步执行一次完整扫描；
//! 响应以 future 的形式异步交付
use async_trait::async_trait;

use super::protocol::{DetectorReport, ErrorReply, Request, Response};
use crate::config::DetectorConfig;
use crate::detector::DetectorEngine;
use crate::error::ProbeResult;
use crate::page::PageSnapshot;
use crate::utils::text::preview_compact;
#[cfg(feature = "remote-fetch")]
use crate::remote::RemotePageFetcher;

/// 页面上下文来源
pub trait PageSource: Send + Sync {
    fn capture(&self) -> ProbeResult<PageSnapshot>;
}

/// 固定快照
impl PageSource for PageSnapshot {
    fn capture(&self) -> ProbeResult<PageSnapshot> {
        Ok(self.clone())
    }
}

/// 闭包来源（例如读取最新的 DOM 导出）
impl<F> PageSource for F
where
    F: Fn() -> ProbeResult<PageSnapshot> + Send + Sync,
{
    fn capture(&self) -> ProbeResult<PageSnapshot> {
        self()
    }
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Response;
}

/// 内容侧处理器：响应 runDetector，可选响应 fetchHeaders
pub struct ContentHandler<S> {
    engine: DetectorEngine,
    source: S,
    config: DetectorConfig,
    #[cfg(feature = "remote-fetch")]
    fetcher: Option<RemotePageFetcher>,
}

impl<S: PageSource> ContentHandler<S> {
    pub fn new(engine: DetectorEngine, source: S) -> Self {
        Self {
            engine,
            source,
            config: DetectorConfig::default(),
            #[cfg(feature = "remote-fetch")]
            fetcher: None,
        }
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    #[cfg(feature = "remote-fetch")]
    pub fn with_fetcher(mut self, fetcher: RemotePageFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// 获取最新页面并生成 runDetector 响应体
    pub fn detector_report(&self) -> ProbeResult<DetectorReport> {
        let snapshot = self.source.capture()?;
        Ok(DetectorReport::build(&self.engine, &snapshot, &self.config))
    }

    #[cfg(feature = "remote-fetch")]
    async fn fetch_headers(&self, url: &str) -> Response {
        match &self.fetcher {
            Some(fetcher) => Response::Headers(fetcher.fetch_headers(url).await),
            None => Response::Error(ErrorReply::unsupported()),
        }
    }

    #[cfg(not(feature = "remote-fetch"))]
    async fn fetch_headers(&self, url: &str) -> Response {
        log::debug!("fetchHeaders for {} ignored: remote-fetch feature disabled", url);
        Response::Error(ErrorReply::unsupported())
    }
}

#[async_trait]
impl<S: PageSource> MessageHandler for ContentHandler<S> {
    async fn handle(&self, request: Request) -> Response {
        match request {
            Request::RunDetector => match self.detector_report() {
                Ok(report) => Response::Detector(report),
                Err(e) => {
                    log::warn!("runDetector could not capture page: {}", e);
                    Response::Error(ErrorReply::page_unavailable(e.to_string()))
                }
            },
            Request::FetchHeaders { url } => self.fetch_headers(&url).await,
        }
    }
}

/// 解析原始 JSON 消息、处理并序列化响应；无法识别的消息回复 unknown
pub async fn dispatch_json<H>(handler: &H, raw: &str) -> ProbeResult<String>
where
    H: MessageHandler + ?Sized,
{
    let response = match serde_json::from_str::<Request>(raw) {
        Ok(request) => handler.handle(request).await,
        Err(e) => {
            log::debug!("Unrecognized message {}: {}", preview_compact(raw, 80), e);
            Response::Error(ErrorReply::unknown())
        }
    };
    Ok(serde_json::to_string(&response)?)
}
