//! 规则表：有序、构建期追加、交给引擎后只读
use crate::rule::core::DetectionRule;

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<DetectionRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条规则，排在已有规则之后
    pub fn push(&mut self, rule: DetectionRule) {
        self.rules.push(rule);
    }

    /// 链式追加
    pub fn with(mut self, rule: DetectionRule) -> Self {
        self.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRule> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(DetectionRule::name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&DetectionRule> {
        self.rules.iter().find(|r| r.name() == name)
    }
}

impl FromIterator<DetectionRule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = DetectionRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<DetectionRule> for RuleTable {
    fn extend<I: IntoIterator<Item = DetectionRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a DetectionRule;
    type IntoIter = std::slice::Iter<'a, DetectionRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
