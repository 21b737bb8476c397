//! 检测结果结构

use serde::{Deserialize, Serialize};

/// 单条命中规则的检测结果
/// version 为空时序列化为 null（保留字段，内置规则不提取版本）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub name: String,
    pub reason: String,
    pub version: Option<String>,
}

impl DetectionResult {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            version: None,
        }
    }
}

impl std::fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.reason)?;
        match &self.version {
            Some(v) if !v.is_empty() => write!(f, " (v{})", v),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_serializes_as_null() {
        let result = DetectionResult::new("jQuery", "window.jQuery defined");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "jQuery", "reason": "window.jQuery defined", "version": null})
        );
    }

    #[test]
    fn test_display() {
        let mut result = DetectionResult::new("React", "react script loaded");
        assert_eq!(result.to_string(), "React - react script loaded");
        result.version = Some("18.2.0".into());
        assert_eq!(result.to_string(), "React - react script loaded (v18.2.0)");
    }
}
