//! A single configuration item

use crate::validation::{Rule, RuleError};
use std::collections::BTreeMap;
use std::fmt;
use types::EnvSnapshot;

/// One named configuration item: its default, documentation and rules.
///
/// The resolved value stays empty until the owning
/// [`AppConfig`](crate::AppConfig) runs its setup.
#[derive(Default)]
pub struct Variable {
    value: String,
    default_value: String,
    description: String,
    rules: BTreeMap<String, Box<dyn Rule>>,
}

impl Variable {
    /// Create a variable with the given default value
    pub fn new(default_value: impl Into<String>) -> Self {
        Self {
            default_value: default_value.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a named rule. A later rule with the same name replaces the earlier one.
    pub fn with_rule(mut self, name: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.rules.insert(name.into(), Box::new(rule));
        self
    }

    /// Resolved value, empty before resolution.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rule names in lexicographic order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rule names joined with `", "`.
    pub fn constraints(&self) -> String {
        self.rule_names().collect::<Vec<_>>().join(", ")
    }

    /// Set the value to the default, then to the environment value when it is non-empty.
    pub(crate) fn resolve(&mut self, name: &str, env: &EnvSnapshot) {
        self.value = env
            .get_non_empty(name)
            .unwrap_or(&self.default_value)
            .to_string();
    }

    /// Apply every rule to the resolved value, returning the failures by rule name.
    pub fn failures(&self) -> Vec<(&str, RuleError)> {
        self.rules
            .iter()
            .filter_map(|(name, rule)| {
                rule.validate(&self.value)
                    .err()
                    .map(|err| (name.as_str(), err))
            })
            .collect()
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &self.value)
            .field("default_value", &self.default_value)
            .field("description", &self.description)
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}
