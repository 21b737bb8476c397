//! 页面上下文抽象
//! 检测规则唯一能看到的页面信号集合，显式注入到每条规则的谓词中

/// 页面上下文能力对象
pub trait PageContext {
    /// 所有 script 元素的 src，按文档顺序
    fn script_srcs(&self) -> &[String];

    /// 所有 link 元素的 href，按文档顺序
    fn link_hrefs(&self) -> &[String];

    /// 第一个 name 精确等于 `name` 的 meta 标签的 content
    fn meta_content(&self, name: &str) -> Option<&str>;

    /// 全局作用域中是否存在该标识（大小写敏感的存在性判断）
    fn has_global(&self, marker: &str) -> bool;

    /// 文档根节点序列化后的原始 HTML
    fn html(&self) -> &str;

    /// 当前页面地址
    fn location(&self) -> &str {
        ""
    }

    /// 页面标题
    fn title(&self) -> Option<&str> {
        None
    }
}
