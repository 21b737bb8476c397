use std::fmt::{self, Write};

/// 空白字符折叠 + 截断，用于日志预览，不产生堆分配
#[inline(always)]
pub fn preview_compact<'a>(s: &'a str, max_len: usize) -> impl fmt::Display + 'a {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl<'a> fmt::Display for CompactView<'a> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut char_count = 0;
            let mut last_was_whitespace = false;

            for ch in self.source.chars() {
                if char_count >= self.max_length {
                    f.write_str("...")?;
                    break;
                }

                if ch.is_whitespace() {
                    if !last_was_whitespace {
                        f.write_char(' ')?;
                        char_count += 1;
                        last_was_whitespace = true;
                    }
                } else {
                    f.write_char(ch)?;
                    char_count += 1;
                    last_was_whitespace = false;
                }
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}

/// 大小写不敏感的子串判断，needle 需已经过 `to_lowercase`
/// 纯 ASCII 输入走逐字节比较，否则对 haystack 做 Unicode 小写折叠
#[inline]
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle_lower.is_ascii() {
        if haystack.len() < needle_lower.len() {
            return false;
        }
        return haystack
            .as_bytes()
            .windows(needle_lower.len())
            .any(|w| w.eq_ignore_ascii_case(needle_lower.as_bytes()));
    }
    haystack.to_lowercase().contains(needle_lower)
}
