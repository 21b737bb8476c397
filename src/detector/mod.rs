//! 检测模块：规则引擎与全局单例
pub mod detector;
pub mod global;

pub use self::detector::{DetectorEngine, RuleFailure, ScanReport};
pub use self::global::{global_engine, init_global_engine, run_detectors};
