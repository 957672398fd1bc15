use crate::model::exclude::{ExcludePattern, ExcludeRule, WILDCARD};

/// Turns declared exclusion patterns into canonical [`ExcludeRule`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeRuleConverter;

impl ExcludeRuleConverter {
    pub fn new() -> Self {
        ExcludeRuleConverter
    }

    pub fn convert(&self, pattern: &ExcludePattern) -> ExcludeRule {
        ExcludeRule {
            group: literal(pattern.group.as_deref()),
            module_name: literal(pattern.module_name.as_deref()),
        }
    }

    /// Converts a list of patterns, dropping structural duplicates and keeping
    /// the first occurrence.
    pub fn convert_all<'a, I>(&self, patterns: I) -> Vec<ExcludeRule>
    where
        I: IntoIterator<Item = &'a ExcludePattern>,
    {
        let mut rules: Vec<ExcludeRule> = Vec::new();
        for pattern in patterns {
            let rule = self.convert(pattern);
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        rules
    }
}

fn literal(value: Option<&str>) -> Option<String> {
    match value {
        None | Some("") | Some(WILDCARD) => None,
        Some(value) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::ModuleIdentifierInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn wildcards_become_none() {
        let converter = ExcludeRuleConverter::new();
        for pattern in [
            ExcludePattern::new(None, None),
            ExcludePattern::new(Some("*"), Some("")),
        ] {
            let rule = converter.convert(&pattern);
            assert!(rule.matches_everything());
            assert_eq!(rule.to_string(), "*:*");
        }
    }

    #[test]
    fn literal_fields_are_kept() {
        let rule = ExcludeRuleConverter::new().convert(&ExcludePattern::for_module(
            "commons-logging",
            "commons-logging",
        ));
        assert_eq!(
            rule,
            ExcludeRule {
                group: Some("commons-logging".to_string()),
                module_name: Some("commons-logging".to_string()),
            }
        );
    }

    #[test]
    fn matching() {
        let interner = ModuleIdentifierInterner::new();
        let converter = ExcludeRuleConverter::new();
        let by_group = converter.convert(&ExcludePattern::for_group("org.slf4j"));
        let by_name = converter.convert(&ExcludePattern::new(None, Some("guava")));

        assert!(by_group.matches(&interner.intern("org.slf4j", "slf4j-api")));
        assert!(!by_group.matches(&interner.intern("org.slf4j.ext", "slf4j-api")));
        assert!(by_name.matches(&interner.intern("com.google.guava", "guava")));
        assert!(!by_name.matches(&interner.intern("com.google.guava", "failureaccess")));
    }

    #[test]
    fn convert_all_collapses_duplicates() {
        let patterns = [
            ExcludePattern::for_group("a"),
            ExcludePattern::new(Some("a"), Some("*")),
            ExcludePattern::for_module("b", "c"),
        ];
        let rules = ExcludeRuleConverter::new().convert_all(&patterns);
        assert_eq!(
            rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a:*", "b:c"]
        );
    }
}
