//! 内置检测规则表
//! 顺序即输出顺序；新增技术只需在表尾追加一条记录
use super::core::{Condition, DetectionRule};
use super::table::RuleTable;
use crate::config::DEFAULT_META_NAME;

/// 构建内置规则表
pub fn builtin_rules() -> RuleTable {
    RuleTable::from_iter([
        // ===================== JavaScript 库 / 框架 =====================
        DetectionRule::any_of(
            "jQuery",
            "window.jQuery defined or jquery script loaded",
            vec![
                Condition::global("jQuery"),
                Condition::script_regex(r"(?:^|/)jquery(?:[.-]\d[\w.]*)?(?:\.slim)?(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "jQuery UI",
            "jquery-ui script or stylesheet loaded",
            vec![
                Condition::script_contains("jquery-ui"),
                Condition::link_contains("jquery-ui"),
            ],
        ),
        DetectionRule::any_of(
            "React",
            "window.React defined, react script loaded or data-reactroot markup",
            vec![
                Condition::global("React"),
                Condition::script_regex(r"(?:^|/)react(?:-dom)?[\w.-]*\.js"),
                Condition::html_contains("data-reactroot"),
            ],
        ),
        DetectionRule::any_of(
            "Vue.js",
            "window.Vue defined, vue script loaded or Vue app markup",
            vec![
                Condition::global("Vue"),
                Condition::global("__VUE__"),
                Condition::script_regex(r"(?:^|/)vue(?:\.runtime)?(?:\.global|\.esm-browser)?(?:\.prod)?(?:\.min)?\.js"),
                Condition::html_regex(r"\sdata-v-app\b|\sdata-server-rendered="),
            ],
        ),
        DetectionRule::any_of(
            "Angular",
            "ng-version attribute or Angular debug global present",
            vec![
                Condition::global("getAllAngularRootElements"),
                Condition::html_regex(r#"\sng-version=["']?\d"#),
            ],
        ),
        DetectionRule::any_of(
            "AngularJS",
            "window.angular defined or angular.js script loaded",
            vec![
                Condition::global("angular"),
                Condition::script_regex(r"(?:^|/)angular(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "Next.js",
            "__NEXT_DATA__ global, /_next/ assets or #__next root",
            vec![
                Condition::global("__NEXT_DATA__"),
                Condition::script_contains("/_next/static/"),
                Condition::html_contains(r#"id="__next""#),
            ],
        ),
        DetectionRule::any_of(
            "Nuxt.js",
            "__NUXT__ global or /_nuxt/ assets",
            vec![
                Condition::global("__NUXT__"),
                Condition::script_contains("/_nuxt/"),
            ],
        ),
        DetectionRule::any_of(
            "Svelte",
            "svelte-* scoped class names in markup",
            vec![Condition::html_regex(r#"class="[^"]*\bsvelte-[a-z0-9]{4,}"#)],
        ),
        DetectionRule::any_of(
            "Ember.js",
            "window.Ember defined or ember script loaded",
            vec![
                Condition::global("Ember"),
                Condition::script_regex(r"(?:^|/)ember(?:\.prod|\.debug)?(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "Backbone.js",
            "window.Backbone defined or backbone script loaded",
            vec![
                Condition::global("Backbone"),
                Condition::script_regex(r"(?:^|/)backbone(?:-min|\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "Lodash",
            "lodash script loaded",
            vec![Condition::script_regex(r"(?:^|/)lodash(?:\.core)?(?:\.min)?\.js")],
        ),
        DetectionRule::any_of(
            "Moment.js",
            "window.moment defined or moment script loaded",
            vec![
                Condition::global("moment"),
                Condition::script_regex(r"(?:^|/)moment(?:-with-locales)?(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "D3.js",
            "window.d3 defined or d3 script loaded",
            vec![
                Condition::global("d3"),
                Condition::script_regex(r"(?:^|/)d3(?:\.v\d+)?(?:\.min)?\.js"),
            ],
        ),
        // ===================== UI / CSS =====================
        DetectionRule::any_of(
            "Bootstrap",
            "bootstrap stylesheet or script loaded",
            vec![
                Condition::link_regex(r"bootstrap(?:\.min)?\.css"),
                Condition::script_regex(r"bootstrap(?:\.bundle)?(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "Tailwind CSS",
            "tailwind stylesheet or Play CDN script loaded",
            vec![
                Condition::link_contains("tailwind"),
                Condition::script_contains("cdn.tailwindcss.com"),
            ],
        ),
        DetectionRule::any_of(
            "Font Awesome",
            "font-awesome stylesheet or kit script loaded",
            vec![
                Condition::link_regex(r"font-?awesome"),
                Condition::script_regex(r"kit\.fontawesome\.com|font-?awesome"),
            ],
        ),
        // ===================== 统计 / 第三方服务 =====================
        DetectionRule::any_of(
            "Google Analytics",
            "ga/gtag global or analytics.js/gtag.js loaded",
            vec![
                Condition::global("ga"),
                Condition::global("gtag"),
                Condition::script_regex(r"google-analytics\.com/(?:analytics|ga)\.js|googletagmanager\.com/gtag/js"),
            ],
        ),
        DetectionRule::any_of(
            "Google Tag Manager",
            "google_tag_manager global or gtm.js loaded",
            vec![
                Condition::global("google_tag_manager"),
                Condition::script_contains("googletagmanager.com/gtm.js"),
            ],
        ),
        DetectionRule::any_of(
            "reCAPTCHA",
            "grecaptcha global or recaptcha api script loaded",
            vec![
                Condition::global("grecaptcha"),
                Condition::script_regex(r"(?:google\.com|recaptcha\.net)/recaptcha/"),
            ],
        ),
        DetectionRule::any_of(
            "Stripe",
            "window.Stripe defined or js.stripe.com loaded",
            vec![
                Condition::global("Stripe"),
                Condition::script_contains("js.stripe.com"),
            ],
        ),
        // ===================== CMS / 站点生成器 =====================
        DetectionRule::any_of(
            "WordPress",
            "generator meta or wp-content/wp-includes assets",
            vec![
                Condition::meta_regex(DEFAULT_META_NAME, r"\bwordpress\b"),
                Condition::script_regex(r"/wp-(?:content|includes)/"),
                Condition::link_regex(r"/wp-(?:content|includes)/"),
            ],
        ),
        DetectionRule::any_of(
            "Drupal",
            "generator meta, window.Drupal or drupal.js",
            vec![
                Condition::meta_regex(DEFAULT_META_NAME, r"\bdrupal\b"),
                Condition::global("Drupal"),
                Condition::script_regex(r"(?:^|/)drupal(?:\.min)?\.js"),
            ],
        ),
        DetectionRule::any_of(
            "Joomla",
            "generator meta mentions Joomla",
            vec![Condition::meta_regex(DEFAULT_META_NAME, r"\bjoomla\b")],
        ),
        DetectionRule::any_of(
            "Ghost",
            "generator meta mentions Ghost",
            vec![Condition::meta_regex(DEFAULT_META_NAME, r"^ghost\b")],
        ),
        DetectionRule::any_of(
            "Hugo",
            "generator meta mentions Hugo",
            vec![Condition::meta_regex(DEFAULT_META_NAME, r"^hugo\b")],
        ),
        DetectionRule::any_of(
            "Shopify",
            "window.Shopify defined or cdn.shopify.com assets",
            vec![
                Condition::global("Shopify"),
                Condition::script_contains("cdn.shopify.com"),
                Condition::link_contains("cdn.shopify.com"),
            ],
        ),
        DetectionRule::any_of(
            "Wix",
            "generator meta or parastorage assets",
            vec![
                Condition::meta_regex(DEFAULT_META_NAME, r"\bwix\.com\b"),
                Condition::script_contains("static.parastorage.com"),
            ],
        ),
        // ===================== CDN / 服务器（粗粒度内容提示） =====================
        DetectionRule::any_of(
            "Cloudflare",
            "cdnjs or /cdn-cgi/ resources referenced",
            vec![
                Condition::script_regex(r"cdnjs\.cloudflare\.com|/cdn-cgi/"),
                Condition::link_contains("cdnjs.cloudflare.com"),
                Condition::html_contains("/cdn-cgi/"),
            ],
        ),
        DetectionRule::any_of(
            "Nginx",
            "nginx mentioned in page markup",
            vec![Condition::html_regex(r"<(?:center|hr|address)[^>]*>\s*nginx\b|<title>[^<]*\bnginx\b")],
        ),
        DetectionRule::any_of(
            "Apache",
            "Apache server signature in page markup",
            vec![Condition::html_regex(r"\bapache(?:/[\d.]+)?(?: \([^)]*\))? server at\b")],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleOutcome;
    use crate::page::PageSnapshot;

    fn matches(name: &str, ctx: &PageSnapshot) -> RuleOutcome {
        let table = builtin_rules();
        let rule = table.get(name).expect("rule exists");
        rule.test(ctx)
    }

    #[test]
    fn test_rule_names_unique() {
        let table = builtin_rules();
        let mut names = table.names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_all_patterns_compile() {
        // 任何规则都不应在空页面或富页面上因正则错误失败
        let rich = PageSnapshot::builder()
            .script("https://example.com/a.js")
            .link("https://example.com/a.css")
            .meta("generator", "Something 1.0")
            .html("<html><body>hello</body></html>")
            .build();
        for rule in &builtin_rules() {
            assert!(rule.test(&PageSnapshot::default()).is_ok(), "{}", rule.name());
            assert!(rule.test(&rich).is_ok(), "{}", rule.name());
        }
    }

    #[test]
    fn test_react_script_case_insensitive() {
        let upper = PageSnapshot::builder().script("https://cdn.example.com/REACT.min.js").build();
        let lower = PageSnapshot::builder().script("https://cdn.example.com/react.min.js").build();
        assert_eq!(matches("React", &upper), Ok(true));
        assert_eq!(matches("React", &lower), Ok(true));
    }

    #[test]
    fn test_jquery_ui_does_not_need_global() {
        let ctx = PageSnapshot::builder()
            .script("/assets/jquery-ui.min.js")
            .build();
        assert_eq!(matches("jQuery UI", &ctx), Ok(true));
        assert_eq!(matches("jQuery", &ctx), Ok(false));
    }

    #[test]
    fn test_nginx_default_page() {
        let ctx = PageSnapshot::builder()
            .html("<html><head><title>404 Not Found</title></head><body><center><h1>404 Not Found</h1></center><hr><center>nginx/1.25.3</center></body></html>")
            .build();
        assert_eq!(matches("Nginx", &ctx), Ok(true));
        assert_eq!(matches("Apache", &ctx), Ok(false));
    }

    #[test]
    fn test_apache_signature() {
        let ctx = PageSnapshot::builder()
            .html("<address>Apache/2.4.57 (Debian) Server at example.com Port 80</address>")
            .build();
        assert_eq!(matches("Apache", &ctx), Ok(true));
    }

    #[test]
    fn test_next_js_markers() {
        let by_global = PageSnapshot::builder().global("__NEXT_DATA__").build();
        let by_asset = PageSnapshot::builder()
            .script("https://shop.example.com/_next/static/chunks/main-abc.js")
            .build();
        assert_eq!(matches("Next.js", &by_global), Ok(true));
        assert_eq!(matches("Next.js", &by_asset), Ok(true));
        assert_eq!(matches("React", &by_asset), Ok(false));
    }

    #[test]
    fn test_generator_meta_rules() {
        let hugo = PageSnapshot::builder().meta("generator", "Hugo 0.120.4").build();
        let joomla = PageSnapshot::builder()
            .meta("generator", "Joomla! - Open Source Content Management")
            .build();
        assert_eq!(matches("Hugo", &hugo), Ok(true));
        assert_eq!(matches("Joomla", &joomla), Ok(true));
        assert_eq!(matches("WordPress", &hugo), Ok(false));
    }
}
