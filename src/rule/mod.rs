//! 规则模块：规则模型、规则表与内置规则
pub mod builtin;
pub mod core;
pub mod table;

pub use self::builtin::builtin_rules;
pub use self::core::{Condition, DetectionResult, DetectionRule, Matcher};
pub use self::table::RuleTable;
