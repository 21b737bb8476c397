/// HTML 输入守卫：在进入提取与规则匹配之前
/// 保证输入不会拖垮引擎（超长截断），并识别不值得解析的空白文档
pub struct HtmlInputGuard;

impl HtmlInputGuard {
    /// 按字节上限截断（UTF-8 边界安全，零拷贝）
    #[inline(always)]
    pub fn truncate(html: &str, max_len: usize) -> &str {
        if html.len() <= max_len {
            return html;
        }

        let mut cut = max_len;
        while !html.is_char_boundary(cut) {
            cut -= 1;
        }
        log::debug!(
            "HTML input truncated from {} to {} bytes",
            html.len(),
            cut
        );
        &html[..cut]
    }

    /// 是否存在可解析内容（非空白、非控制字符）
    #[inline(always)]
    pub fn has_content(html: &str) -> bool {
        html.bytes()
            .any(|b| !b.is_ascii_whitespace() && !b.is_ascii_control())
    }
}
