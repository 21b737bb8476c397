//! 检测规则
//! 规则 = 名称 + 说明 + 自包含谓词（可选版本探针）
//! 规则之间互不依赖，谓词只读取注入的 PageContext
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::condition::{any_holds, Condition};
use super::matcher::Matcher;
use crate::error::RuleOutcome;
use crate::page::PageContext;

/// 谓词：纯函数，输入页面上下文，输出是否命中
pub type Predicate = Arc<dyn Fn(&dyn PageContext) -> RuleOutcome + Send + Sync>;
/// 版本探针：仅在谓词命中后调用
pub type VersionProbe = Arc<dyn Fn(&dyn PageContext) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct DetectionRule {
    name: Cow<'static, str>,
    reason: Cow<'static, str>,
    predicate: Predicate,
    version_probe: Option<VersionProbe>,
}

impl DetectionRule {
    /// 自由形式谓词
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&dyn PageContext) -> RuleOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reason: reason.into(),
            predicate: Arc::new(predicate),
            version_probe: None,
        }
    }

    /// 声明式规则：任一条件成立即命中
    pub fn any_of(
        name: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
        conditions: Vec<Condition>,
    ) -> Self {
        Self::new(name, reason, move |ctx| any_holds(&conditions, ctx))
    }

    /// 挂载自定义版本探针
    pub fn with_version<F>(mut self, probe: F) -> Self
    where
        F: Fn(&dyn PageContext) -> Option<String> + Send + Sync + 'static,
    {
        self.version_probe = Some(Arc::new(probe));
        self
    }

    /// 从首个命中的 script src 中按模板（\1 / $1）提取版本
    pub fn with_script_version(self, pattern: &str, template: &str) -> Self {
        let matcher = Matcher::regex(pattern);
        let template = template.to_string();
        let rule_name = self.name.clone();
        self.with_version(move |ctx| {
            ctx.script_srcs().iter().find_map(|src| {
                matcher.version(src, &template).unwrap_or_else(|e| {
                    log::warn!("Version probe of rule '{}' failed: {}", rule_name, e);
                    None
                })
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn has_version_probe(&self) -> bool {
        self.version_probe.is_some()
    }

    /// 直接执行谓词（不带失败边界，引擎负责隔离）
    #[inline]
    pub fn test(&self, ctx: &dyn PageContext) -> RuleOutcome {
        (self.predicate)(ctx)
    }

    #[inline]
    pub fn probe_version(&self, ctx: &dyn PageContext) -> Option<String> {
        self.version_probe.as_ref().and_then(|probe| probe(ctx))
    }
}

impl fmt::Debug for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionRule")
            .field("name", &self.name)
            .field("reason", &self.reason)
            .field("version_probe", &self.version_probe.is_some())
            .finish()
    }
}
