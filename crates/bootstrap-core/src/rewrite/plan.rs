//! Ordered rename plans
//!
//! A plan is a fixed sequence of (literal pattern, replacement) rules. The
//! order matters: the package-name rule also drives the manifest rename, so
//! it always comes first. The whole plan is validated before any file is
//! touched.

use crate::product::TemplateConfig;
use thiserror::Error;

/// Resolved values the wizard collected for a rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameValues {
    pub package: String,
    pub author: String,
    pub email: String,
}

/// A single literal substitution
#[derive(Debug, Clone)]
pub struct RenameRule {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("rule {index} has an empty pattern")]
    EmptyPattern { index: usize },
    #[error(
        "rule {index} replacement '{replacement}' contains the pattern of earlier rule {earlier}"
    )]
    ReplacementCollision {
        index: usize,
        earlier: usize,
        replacement: String,
    },
}

/// Ordered, validated-before-use substitution plan
#[derive(Debug, Clone)]
pub struct RenamePlan {
    rules: Vec<RenameRule>,
}

impl RenamePlan {
    pub fn new(rules: Vec<RenameRule>) -> Self {
        Self { rules }
    }

    /// Fixed substitution order for a template: package name, author, email
    pub fn for_template<C: TemplateConfig>(config: &C, values: &RenameValues) -> Self {
        Self::new(vec![
            RenameRule {
                pattern: config.name().to_string(),
                replacement: values.package.clone(),
            },
            RenameRule {
                pattern: config.author().to_string(),
                replacement: values.author.clone(),
            },
            RenameRule {
                pattern: config.email().to_string(),
                replacement: values.email.clone(),
            },
        ])
    }

    /// Validate the whole plan before the first write: no empty patterns, and
    /// no replacement that reintroduces the pattern of an earlier rule (the
    /// earlier substitution would never see it again).
    pub fn validate(&self) -> Result<(), PlanError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(PlanError::EmptyPattern { index });
            }
            for (earlier, prior) in self.rules[..index].iter().enumerate() {
                if rule.replacement.contains(&prior.pattern) {
                    return Err(PlanError::ReplacementCollision {
                        index,
                        earlier,
                        replacement: rule.replacement.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply every rule, in order, in a single pass over the text
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| {
                acc.replace(&rule.pattern, &rule.replacement)
            })
    }

    pub fn rules(&self) -> &[RenameRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTemplate;

    fn values() -> RenameValues {
        RenameValues {
            package: "demo".to_string(),
            author: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
        }
    }

    #[test]
    fn test_template_plan_order_is_package_author_email() {
        let plan = RenamePlan::for_template(&TestTemplate, &values());
        let patterns: Vec<&str> = plan.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["starter", "Template Author", "template@example.com"]
        );
    }

    #[test]
    fn test_apply_replaces_in_rule_order() {
        let plan = RenamePlan::for_template(&TestTemplate, &values());
        let rewritten = plan.apply("starter by Template Author <template@example.com>");
        assert_eq!(rewritten, "demo by Jane Doe <jane@x.com>");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let plan = RenamePlan::new(vec![RenameRule {
            pattern: String::new(),
            replacement: "x".to_string(),
        }]);
        assert_eq!(plan.validate(), Err(PlanError::EmptyPattern { index: 0 }));
    }

    #[test]
    fn test_replacement_reintroducing_earlier_pattern_rejected() {
        let plan = RenamePlan::new(vec![
            RenameRule {
                pattern: "starter".to_string(),
                replacement: "demo".to_string(),
            },
            RenameRule {
                pattern: "Template Author".to_string(),
                replacement: "starter fan".to_string(),
            },
        ]);
        assert!(matches!(
            plan.validate(),
            Err(PlanError::ReplacementCollision {
                index: 1,
                earlier: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_replacement_containing_own_pattern_is_legal() {
        // Substitution is a single pass, so demo -> demo-app cannot loop
        let plan = RenamePlan::new(vec![RenameRule {
            pattern: "demo".to_string(),
            replacement: "demo-app".to_string(),
        }]);
        assert_eq!(plan.validate(), Ok(()));
        assert_eq!(plan.apply("demo"), "demo-app");
    }
}
