//! 规则核心结构：规则、条件、匹配器、检测结果
pub mod condition;
pub mod detect_result;
pub mod matcher;
pub mod rule;

pub use self::condition::Condition;
pub use self::detect_result::DetectionResult;
pub use self::matcher::Matcher;
pub use self::rule::{DetectionRule, Predicate, VersionProbe};
