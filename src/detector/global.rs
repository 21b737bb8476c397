//! 全局检测引擎单例管理
//! 核心职责：
//! 1. 维护进程生命周期内唯一的 DetectorEngine 实例
//! 2. 未显式初始化时，首次使用以内置规则表懒加载
//! 3. 支持在首次使用前注入自定义规则表

use once_cell::sync::OnceCell;

use super::detector::DetectorEngine;
use crate::error::{ProbeResult, SiteProbeError};
use crate::page::PageContext;
use crate::rule::core::DetectionResult;
use crate::rule::RuleTable;

static GLOBAL_ENGINE: OnceCell<DetectorEngine> = OnceCell::new();

/// 使用自定义规则表初始化全局引擎
/// 幂等：已初始化则直接返回 Ok(())，新规则表被忽略
pub fn init_global_engine(rules: RuleTable) -> ProbeResult<()> {
    if GLOBAL_ENGINE.get().is_some() {
        log::debug!("Global detector engine already initialized, skip reinitialization");
        return Ok(());
    }

    let rule_count = rules.len();
    match GLOBAL_ENGINE.set(DetectorEngine::new(rules)) {
        Ok(()) => {
            log::info!("Global detector engine initialized with {} rules", rule_count);
            Ok(())
        }
        // 并发初始化时另一线程先完成，同样视为幂等成功
        Err(_) if GLOBAL_ENGINE.get().is_some() => {
            log::debug!("Global detector engine initialized concurrently by another thread");
            Ok(())
        }
        Err(_) => Err(SiteProbeError::DetectorInitError(
            "Global detector engine could not be stored".to_string(),
        )),
    }
}

/// 获取全局引擎（未初始化时以内置规则懒加载）
pub fn global_engine() -> &'static DetectorEngine {
    GLOBAL_ENGINE.get_or_init(|| {
        let engine = DetectorEngine::with_builtin_rules();
        log::info!(
            "Global detector engine lazily initialized with {} built-in rules",
            engine.rules().len()
        );
        engine
    })
}

/// 使用全局引擎执行所有检测规则
pub fn run_detectors(ctx: &dyn PageContext) -> Vec<DetectionResult> {
    global_engine().run(ctx)
}
