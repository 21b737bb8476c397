//! 全局引擎注入测试
//! 独立测试进程，保证全局 OnceCell 在首次使用前为空；本文件只保留一个测试函数
use siteprobe::{
    global_engine, init_global_engine, run_detectors, DetectionResult, DetectionRule, PageSnapshot,
    RuleTable,
};

#[test]
fn test_custom_table_injected_before_first_use_wins() {
    let _ = env_logger::builder().is_test(true).try_init();

    let custom = RuleTable::new().with(DetectionRule::new(
        "Custom Stack",
        "x-custom marker declared",
        |ctx| Ok(ctx.has_global("__CUSTOM__")),
    ));
    assert!(init_global_engine(custom).is_ok());
    assert_eq!(global_engine().rules().names(), vec!["Custom Stack"]);

    // 内置规则会命中 jQuery，自定义表不会
    let page = PageSnapshot::builder()
        .global("jQuery")
        .global("__CUSTOM__")
        .build();
    let expected = vec![DetectionResult::new("Custom Stack", "x-custom marker declared")];
    assert_eq!(run_detectors(&page), expected);

    // 再次初始化为幂等空操作，不替换已注入的规则表
    assert!(init_global_engine(siteprobe::builtin_rules()).is_ok());
    assert_eq!(global_engine().rules().len(), 1);
    assert_eq!(run_detectors(&page), expected);
}
