//! 版本提取工具模块
//! 负责从正则捕获结果中，根据版本模板提取合法的技术版本号
//! 支持 \1/\2 或 $1/$2 两种分组引用格式，自动过滤无效版本

use regex::Captures;

/// 版本提取工具类
pub struct VersionExtractor;

impl VersionExtractor {
    /// 从正则捕获结果中提取有效版本号
    ///
    /// - `Some(String)`: 至少替换了一个分组且结果非空、无残留占位符
    /// - `None`: 模板为空、未替换或结果异常
    pub fn extract(version_template: &str, captures: &Captures) -> Option<String> {
        if version_template.trim().is_empty() {
            return None;
        }

        let mut version = version_template.to_string();
        let mut replaced = false;

        // 0 是整体匹配，不参与版本提取
        for group_index in 1..captures.len() {
            let placeholder_backslash = format!("\\{}", group_index);
            let placeholder_dollar = format!("${}", group_index);

            let matched_str = match captures.get(group_index) {
                Some(matched) => {
                    replaced = true;
                    matched.as_str().trim()
                }
                None => "",
            };
            version = version.replace(&placeholder_backslash, matched_str);
            version = version.replace(&placeholder_dollar, matched_str);
        }

        let final_version = version.trim().to_string();
        let is_valid_version = replaced
            && !final_version.is_empty()
            && !final_version.contains('\\')
            && !final_version.contains('$');

        is_valid_version.then_some(final_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_extract_with_backslash_placeholder() {
        let regex = Regex::new(r#"jquery[.-]([\d.]+)(?:\.min)?\.js"#).unwrap();
        let captures = regex.captures("/js/jquery-3.6.0.min.js").unwrap();
        assert_eq!(VersionExtractor::extract("\\1", &captures), Some("3.6.0".to_string()));
    }

    #[test]
    fn test_extract_with_dollar_placeholder() {
        let regex = Regex::new(r#"WordPress ([\d.]+)"#).unwrap();
        let captures = regex.captures("WordPress 6.2").unwrap();
        assert_eq!(VersionExtractor::extract("$1", &captures), Some("6.2".to_string()));
    }

    #[test]
    fn test_extract_missing_group() {
        let regex = Regex::new(r#"nginx(?:/([\d.]+))?"#).unwrap();
        let captures = regex.captures("nginx").unwrap();
        assert_eq!(VersionExtractor::extract("\\1", &captures), None);
    }

    #[test]
    fn test_extract_unknown_placeholder() {
        let regex = Regex::new(r#"nginx(?:/([\d.]+))?"#).unwrap();
        let captures = regex.captures("nginx/1.21.6").unwrap();
        assert_eq!(VersionExtractor::extract("\\2", &captures), None);
    }

    #[test]
    fn test_extract_blank_template() {
        let regex = Regex::new(r#"nginx/([\d.]+)"#).unwrap();
        let captures = regex.captures("nginx/1.21.6").unwrap();
        assert_eq!(VersionExtractor::extract("   ", &captures), None);
    }
}
