//! 日志桥接
//! 库内部统一通过 `log` 门面输出；开启 `tracing` 特性后可将 log 记录转发到 tracing 订阅者

/// 将 `log` 记录桥接到 `tracing`，重复调用返回错误
#[cfg(feature = "tracing")]
pub fn bridge_log_to_tracing() -> crate::ProbeResult<()> {
    tracing_log::LogTracer::init().map_err(|e| {
        crate::SiteProbeError::DetectorInitError(format!("Failed to install LogTracer: {}", e))
    })
}
