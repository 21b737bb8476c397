//! 声明式检测条件
//! 一条规则由若干 OR 条件组成，任一条件成立即命中
use std::borrow::Cow;

use super::matcher::Matcher;
use crate::error::RuleOutcome;
use crate::page::PageContext;

/// 单个 OR 分支
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// 全局作用域存在该标识（大小写敏感）
    Global(Cow<'static, str>),
    /// 任一 script src 命中
    ScriptSrc(Matcher),
    /// 任一 link href 命中
    LinkHref(Matcher),
    /// 指定名称 meta 的 content 命中
    Meta {
        name: Cow<'static, str>,
        matcher: Matcher,
    },
    /// 原始 HTML 命中
    Html(Matcher),
}

impl Condition {
    pub fn global(marker: impl Into<Cow<'static, str>>) -> Self {
        Condition::Global(marker.into())
    }

    pub fn script_regex(pattern: &str) -> Self {
        Condition::ScriptSrc(Matcher::regex(pattern))
    }

    pub fn script_contains(needle: &str) -> Self {
        Condition::ScriptSrc(Matcher::contains(needle))
    }

    pub fn link_contains(needle: &str) -> Self {
        Condition::LinkHref(Matcher::contains(needle))
    }

    pub fn link_regex(pattern: &str) -> Self {
        Condition::LinkHref(Matcher::regex(pattern))
    }

    pub fn meta_regex(name: impl Into<Cow<'static, str>>, pattern: &str) -> Self {
        Condition::Meta {
            name: name.into(),
            matcher: Matcher::regex(pattern),
        }
    }

    pub fn html_contains(needle: &str) -> Self {
        Condition::Html(Matcher::contains(needle))
    }

    pub fn html_regex(pattern: &str) -> Self {
        Condition::Html(Matcher::regex(pattern))
    }

    /// 评估条件；正则错误原样上抛，由引擎的失败边界处理
    pub fn holds(&self, ctx: &dyn PageContext) -> RuleOutcome {
        match self {
            Condition::Global(marker) => Ok(ctx.has_global(marker)),
            Condition::ScriptSrc(matcher) => any_match(matcher, ctx.script_srcs()),
            Condition::LinkHref(matcher) => any_match(matcher, ctx.link_hrefs()),
            Condition::Meta { name, matcher } => match ctx.meta_content(name) {
                Some(content) => matcher.is_match(content),
                None => Ok(false),
            },
            Condition::Html(matcher) => matcher.is_match(ctx.html()),
        }
    }
}

fn any_match(matcher: &Matcher, values: &[String]) -> RuleOutcome {
    for value in values {
        if matcher.is_match(value)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 按顺序评估 OR 条件，遇到成立条件立即返回
pub fn any_holds(conditions: &[Condition], ctx: &dyn PageContext) -> RuleOutcome {
    for condition in conditions {
        if condition.holds(ctx)? {
            return Ok(true);
        }
    }
    Ok(false)
}
