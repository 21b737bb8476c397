//! Detector engine core module
//! 检测引擎核心
//! 核心职责：
//! 1. 持有只读的有序规则表（Arc 共享，可跨线程并发使用）
//! 2. 按表顺序逐条评估规则，每条规则独立失败边界（错误返回 + panic 捕获）
//! 3. 失败规则仅记录 warn 日志并从结果中剔除，永不向调用方传播错误
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{RuleError, RuleOutcome};
use crate::page::PageContext;
use crate::rule::builtin::builtin_rules;
use crate::rule::core::{DetectionResult, DetectionRule};
use crate::rule::RuleTable;
use crate::utils::text::preview_compact;

/// 单条规则失败记录（诊断用，不进入消息响应）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub rule: String,
    pub error: String,
}

/// 带失败明细的扫描报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub results: Vec<DetectionResult>,
    pub failures: Vec<RuleFailure>,
}

/// 检测引擎
#[derive(Debug, Clone)]
pub struct DetectorEngine {
    rules: Arc<RuleTable>,
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}

impl DetectorEngine {
    /// 使用自定义规则表创建引擎
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// 使用内置规则表创建引擎
    pub fn with_builtin_rules() -> Self {
        Self::new(builtin_rules())
    }

    /// 只读访问规则表
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// 执行全部规则，返回命中结果（表顺序）
    /// 规则失败与未命中在结果中不可区分
    pub fn run(&self, ctx: &dyn PageContext) -> Vec<DetectionResult> {
        self.scan(ctx, None)
    }

    /// 执行全部规则，同时收集失败规则明细
    pub fn run_with_report(&self, ctx: &dyn PageContext) -> ScanReport {
        let mut failures = Vec::new();
        let results = self.scan(ctx, Some(&mut failures));
        ScanReport { results, failures }
    }

    fn scan(
        &self,
        ctx: &dyn PageContext,
        mut failures: Option<&mut Vec<RuleFailure>>,
    ) -> Vec<DetectionResult> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("run_detectors", rules = self.rules.len()).entered();

        let mut results = Vec::new();

        for rule in self.rules.iter() {
            match evaluate(rule, ctx) {
                Ok(true) => {
                    log::debug!(
                        "Rule matched | tech: {} | page: {}",
                        rule.name(),
                        preview_compact(ctx.location(), 120)
                    );
                    results.push(DetectionResult {
                        name: rule.name().to_string(),
                        reason: rule.reason().to_string(),
                        version: probe_version(rule, ctx),
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Detector rule '{}' failed and was skipped: {}", rule.name(), e);
                    if let Some(failures) = failures.as_deref_mut() {
                        failures.push(RuleFailure {
                            rule: rule.name().to_string(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        results
    }
}

/// 单条规则的失败边界：谓词返回的错误和 panic 都转换为 RuleError
fn evaluate(rule: &DetectionRule, ctx: &dyn PageContext) -> RuleOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.test(ctx))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(RuleError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// 版本探针同样隔离：panic 时丢弃版本但保留命中
fn probe_version(rule: &DetectionRule, ctx: &dyn PageContext) -> Option<String> {
    if !rule.has_version_probe() {
        return None;
    }
    panic::catch_unwind(AssertUnwindSafe(|| rule.probe_version(ctx))).unwrap_or_else(|payload| {
        log::warn!(
            "Version probe of rule '{}' panicked: {}",
            rule.name(),
            panic_message(payload.as_ref())
        );
        None
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageSnapshot;
    use crate::rule::core::Condition;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn jquery_page() -> PageSnapshot {
        PageSnapshot::builder()
            .location("https://shop.example.com/")
            .script("https://cdn.example.com/jquery-3.6.0.min.js")
            .global("jQuery")
            .html(r#"<html><head><script src="https://cdn.example.com/jquery-3.6.0.min.js"></script></head><body></body></html>"#)
            .build()
    }

    fn names(results: &[DetectionResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_one_result_per_matching_rule_in_table_order() {
        let table = RuleTable::new()
            .with(DetectionRule::new("C", "third", |_| Ok(true)))
            .with(DetectionRule::new("A", "first", |_| Ok(false)))
            .with(DetectionRule::new("B", "second", |_| Ok(true)));
        let engine = DetectorEngine::new(table);

        let results = engine.run(&PageSnapshot::default());
        assert_eq!(names(&results), vec!["C", "B"]);
        assert_eq!(results[0].reason, "third");
        assert_eq!(results[0].version, None);
    }

    #[test]
    fn test_idempotent() {
        let engine = DetectorEngine::with_builtin_rules();
        let page = jquery_page();
        assert_eq!(engine.run(&page), engine.run(&page));
    }

    #[test]
    fn test_failing_and_panicking_rules_are_isolated() {
        init_logger();
        let table = RuleTable::new()
            .with(DetectionRule::new("Before", "ok", |_| Ok(true)))
            .with(DetectionRule::new("Errors", "returns error", |_| {
                Err(RuleError::MissingSignal("document.body".into()))
            }))
            .with(DetectionRule::new("Panics", "panics", |ctx| {
                let first = &ctx.script_srcs()[0];
                Ok(first.is_empty())
            }))
            .with(DetectionRule::any_of("BadRegex", "bad pattern", vec![Condition::html_regex("(")]))
            .with(DetectionRule::new("After", "ok", |_| Ok(true)));
        let engine = DetectorEngine::new(table);
        let page = PageSnapshot::default();

        assert_eq!(names(&engine.run(&page)), vec!["Before", "After"]);

        let report = engine.run_with_report(&page);
        assert_eq!(names(&report.results), vec!["Before", "After"]);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(failed, vec!["Errors", "Panics", "BadRegex"]);
        assert!(report.failures[1].error.contains("panicked"));
    }

    #[test]
    fn test_empty_table_yields_empty_results() {
        let engine = DetectorEngine::new(RuleTable::new());
        assert!(engine.run(&jquery_page()).is_empty());
        assert_eq!(engine.run_with_report(&jquery_page()), ScanReport::default());
    }

    #[test]
    fn test_jquery_scenario() {
        let results = DetectorEngine::with_builtin_rules().run(&jquery_page());
        assert_eq!(
            results,
            vec![DetectionResult::new(
                "jQuery",
                "window.jQuery defined or jquery script loaded"
            )]
        );
    }

    #[test]
    fn test_empty_page_scenario() {
        let page = PageSnapshot::from_html("<html><head></head><body></body></html>", None).unwrap();
        assert!(DetectorEngine::with_builtin_rules().run(&page).is_empty());
    }

    #[test]
    fn test_wordpress_generator_scenario() {
        let html = r#"<html><head><meta name="generator" content="WordPress 6.2"><title>Blog</title></head><body></body></html>"#;
        let page = PageSnapshot::from_html(html, Some("https://blog.example.com/")).unwrap();
        let results = DetectorEngine::with_builtin_rules().run(&page);
        assert_eq!(names(&results), vec!["WordPress"]);
        assert_eq!(results[0].reason, "generator meta or wp-content/wp-includes assets");
    }

    #[test]
    fn test_case_insensitive_script_match() {
        let engine = DetectorEngine::with_builtin_rules();
        let upper = PageSnapshot::builder().script("https://cdn.example.com/REACT.min.js").build();
        let lower = PageSnapshot::builder().script("https://cdn.example.com/react.min.js").build();
        assert_eq!(names(&engine.run(&upper)), vec!["React"]);
        assert_eq!(engine.run(&upper), engine.run(&lower));
    }

    #[test]
    fn test_version_probe_and_panicking_probe() {
        init_logger();
        let table = RuleTable::new()
            .with(
                DetectionRule::any_of("jQuery", "script", vec![Condition::script_contains("jquery")])
                    .with_script_version(r"jquery[.-]([\d.]+)(?:\.min)?\.js", "\\1"),
            )
            .with(
                DetectionRule::new("Fragile", "probe panics", |_| Ok(true))
                    .with_version(|_| panic!("probe exploded")),
            );
        let results = DetectorEngine::new(table).run(&jquery_page());
        assert_eq!(results[0].version.as_deref(), Some("3.6.0"));
        assert_eq!(results[1].name, "Fragile");
        assert_eq!(results[1].version, None);
    }

    #[test]
    fn test_parallel_runs_are_independent() {
        let engine = DetectorEngine::with_builtin_rules();
        let page = jquery_page();
        let expected = engine.run(&page);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let engine = engine.clone();
                    let page = page.clone();
                    s.spawn(move || engine.run(&page))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
