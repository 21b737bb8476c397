//! HTML 标签提取器
//! 负责从 HTML 中提取 <script src>、<link href>、<meta name content> 与首个 <title> 文本
use std::cell::RefCell;

use html_escape::decode_html_entities;
use lol_html::{element, text, HtmlRewriter, Settings};

/// 属性值长度上限，超长视为垃圾数据
const MAX_ATTR_URL_LEN: usize = 2048;
const MAX_META_CONTENT_LEN: usize = 4096;

/// 提取结果结构体
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractResult {
    pub script_srcs: Vec<String>,
    pub link_hrefs: Vec<String>,
    pub meta_tags: Vec<(String, String)>,
    pub title: Option<String>,
    title_seen: usize,
    title_buf: String,
}

impl ExtractResult {
    /// 内部初始化，预分配内存，减少扩容开销
    fn new() -> Self {
        Self {
            script_srcs: Vec::with_capacity(16),
            link_hrefs: Vec::with_capacity(8),
            meta_tags: Vec::with_capacity(8),
            ..Self::default()
        }
    }

    fn push_script_src(&mut self, raw: &str) {
        let src = decode_html_entities(raw.trim());
        if is_plausible_url(&src) {
            self.script_srcs.push(src.into_owned());
        }
    }

    fn push_link_href(&mut self, raw: &str) {
        let href = decode_html_entities(raw.trim());
        if is_plausible_url(&href) {
            self.link_hrefs.push(href.into_owned());
        }
    }

    fn push_meta_tag(&mut self, name: &str, raw_content: &str) {
        let content = decode_html_entities(raw_content);
        if content.len() <= MAX_META_CONTENT_LEN {
            self.meta_tags
                .push((decode_html_entities(name).into_owned(), content.into_owned()));
        }
    }

    /// 与 document.title 一致：解码实体、折叠空白并去除首尾空白
    /// 实体可能跨文本块，因此在收集完整后统一解码
    fn finish(mut self) -> Self {
        if self.title_seen > 0 {
            let decoded = decode_html_entities(&self.title_buf);
            let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
            self.title = Some(collapsed);
        }
        self.title_buf = String::new();
        self
    }
}

/// 过滤空值、超长值以及夹带标签/换行的畸形属性
fn is_plausible_url(value: &str) -> bool {
    !(value.is_empty()
        || value.len() > MAX_ATTR_URL_LEN
        || value.contains('<')
        || value.contains('>')
        || value.contains('\n')
        || value.contains('\r'))
}

/// 对外暴露的HTML提取器
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 流式解析HTML，只提取不改写
    pub fn extract(html: &str) -> ExtractResult {
        let result = RefCell::new(ExtractResult::new());

        {
            let settings = Settings {
                strict: false, // 兼容畸形HTML/大小写标签/残缺标签
                element_content_handlers: vec![
                    element!("script[src]", |el| {
                        if let Some(src) = el.get_attribute("src") {
                            result.borrow_mut().push_script_src(&src);
                        }
                        Ok(())
                    }),
                    element!("link[href]", |el| {
                        if let Some(href) = el.get_attribute("href") {
                            result.borrow_mut().push_link_href(&href);
                        }
                        Ok(())
                    }),
                    element!("meta[name]", |el| {
                        let name = el.get_attribute("name");
                        let content = el.get_attribute("content");
                        if let (Some(n), Some(c)) = (name, content) {
                            result.borrow_mut().push_meta_tag(&n, &c);
                        }
                        Ok(())
                    }),
                    element!("title", |_el| {
                        result.borrow_mut().title_seen += 1;
                        Ok(())
                    }),
                    // 仅收集第一个 <title> 的文本
                    text!("title", |chunk| {
                        let mut res = result.borrow_mut();
                        if res.title_seen == 1 {
                            res.title_buf.push_str(chunk.as_str());
                        }
                        Ok(())
                    }),
                ],
                ..Settings::default()
            };

            let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
            if let Err(e) = rewriter.write(html.as_bytes()) {
                log::warn!("HTML extraction stopped early: {}", e);
            } else if let Err(e) = rewriter.end() {
                log::warn!("HTML extraction could not finish: {}", e);
            }
        }

        result.into_inner().finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_extractor() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>  Example
                    Shop </title>
                <script src="/jquery.min.js"></script>
                <meta name="author" content="test_user">
                <meta name="generator" content="WordPress 6.0" />
                <link rel="stylesheet" href="/css/bootstrap.min.css">
                <script src="/vue.global.js"></script>
                <script>console.log('inline')</script>
            </head>
            </html>
        "#;

        let result = HtmlExtractor::extract(html);

        assert_eq!(result.script_srcs, vec!["/jquery.min.js", "/vue.global.js"]);
        assert_eq!(result.link_hrefs, vec!["/css/bootstrap.min.css"]);
        assert_eq!(
            result.meta_tags,
            vec![
                ("author".into(), "test_user".into()),
                ("generator".into(), "WordPress 6.0".into())
            ]
        );
        assert_eq!(result.title.as_deref(), Some("Example Shop"));
    }

    #[test]
    fn test_broken_html() {
        let html = r#"<html><head><SCRIPT SRC="/react.js"></SCRIPT><meta NAME="generator" CONTENT="PHP 8.2"><script src="invalid<>src.js"></script></head>"#;
        let result = HtmlExtractor::extract(html);
        assert_eq!(result.script_srcs, vec!["/react.js"]);
        assert_eq!(result.meta_tags, vec![("generator".into(), "PHP 8.2".into())]);
        assert_eq!(result.title, None);
    }

    #[test]
    fn test_only_first_title() {
        let html = "<title>First</title><svg><title>Second</title></svg>";
        let result = HtmlExtractor::extract(html);
        assert_eq!(result.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = r#"<title>A &amp; B</title>
            <meta name="generator" content="Hugo &amp; Friends">
            <script src="/js/app.js?a=1&amp;b=2"></script>
            <link rel="stylesheet" href="/css/site.css?ver=6.2&amp;x=1">"#;
        let result = HtmlExtractor::extract(html);
        assert_eq!(result.title.as_deref(), Some("A & B"));
        assert_eq!(
            result.meta_tags,
            vec![("generator".into(), "Hugo & Friends".into())]
        );
        assert_eq!(result.script_srcs, vec!["/js/app.js?a=1&b=2"]);
        assert_eq!(result.link_hrefs, vec!["/css/site.css?ver=6.2&x=1"]);
    }

    #[test]
    fn test_encoded_markup_in_src_is_rejected_after_decoding() {
        let result = HtmlExtractor::extract(r#"<script src="/a.js&lt;b&gt;"></script>"#);
        assert!(result.script_srcs.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let result = HtmlExtractor::extract("");
        assert!(result.script_srcs.is_empty());
        assert!(result.link_hrefs.is_empty());
        assert!(result.meta_tags.is_empty());
        assert_eq!(result.title, None);
    }
}
