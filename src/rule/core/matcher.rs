//! 运行时匹配器
//! 文本类启发式一律大小写不敏感：
//! - Contains：needle 预先做 Unicode 小写折叠，纯 ASCII 时按字节忽略大小写比较
//! - Regex：首次匹配时以 case_insensitive 编译，进程级缓存复用
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;

use crate::error::{RuleError, RuleOutcome};
use crate::utils::text::contains_ignore_case;
use crate::utils::VersionExtractor;

/// 全局正则缓存（pattern → 编译结果），编译失败不入缓存
pub static REGEX_CACHE: Lazy<RwLock<FxHashMap<Arc<str>, Arc<Regex>>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// 子串匹配（needle 已 Unicode 小写）
    Contains(Arc<str>),
    /// 懒加载正则匹配
    Regex(Arc<str>),
}

impl Matcher {
    pub fn contains(needle: &str) -> Self {
        Matcher::Contains(Arc::from(needle.to_lowercase()))
    }

    pub fn regex(pattern: &str) -> Self {
        Matcher::Regex(Arc::from(pattern))
    }

    /// 判断文本是否命中；正则无法编译时返回 RuleError::InvalidPattern
    #[inline]
    pub fn is_match(&self, haystack: &str) -> RuleOutcome {
        match self {
            Matcher::Contains(needle) => Ok(contains_ignore_case(haystack, needle)),
            Matcher::Regex(pattern) => Ok(compiled(pattern)?.is_match(haystack)),
        }
    }

    /// 命中时按模板提取版本号；Contains 无捕获分组，始终为 None
    pub fn version(&self, haystack: &str, template: &str) -> Result<Option<String>, RuleError> {
        match self {
            Matcher::Contains(_) => Ok(None),
            Matcher::Regex(pattern) => {
                let re = compiled(pattern)?;
                Ok(re
                    .captures(haystack)
                    .and_then(|caps| VersionExtractor::extract(template, &caps)))
            }
        }
    }

    /// 描述匹配器（日志用）
    pub fn describe(&self) -> String {
        match self {
            Matcher::Contains(needle) => format!("contains({})", needle),
            Matcher::Regex(pattern) => format!("regex(?i:{})", pattern),
        }
    }
}

/// 读缓存命中直接返回，否则写锁编译插入
fn compiled(pattern: &Arc<str>) -> Result<Arc<Regex>, RuleError> {
    {
        let cache_read = REGEX_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(re) = cache_read.get(pattern) {
            return Ok(re.clone());
        }
    }

    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Arc::new)
        .map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

    let mut cache_write = REGEX_CACHE.write().unwrap_or_else(|e| e.into_inner());
    Ok(cache_write.entry(pattern.clone()).or_insert(re).clone())
}
