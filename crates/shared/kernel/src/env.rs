//! Variable spaces and placeholder substitution.
//!
//! Connection settings coming from older tooling may reference variables either as
//! `${NAME}` or as `%%NAME%%`. A [`VariableSpace`] resolves those placeholders; names it
//! does not know are left in place untouched.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}|%%([^%]+)%%").expect("placeholder pattern is valid")
});

/// Returns `true` when the value references at least one variable.
#[must_use]
pub fn contains_variables(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}

/// A source of variable values.
pub trait VariableSpace: Send + Sync {
    /// Looks up a single variable.
    fn get(&self, name: &str) -> Option<String>;

    /// Replaces every resolvable placeholder in `value`.
    fn environment_substitute(&self, value: &str) -> String {
        PLACEHOLDER
            .replace_all(value, |caps: &Captures<'_>| {
                let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                self.get(name).unwrap_or_else(|| caps[0].to_owned())
            })
            .into_owned()
    }

    /// Optional-aware variant of [`VariableSpace::environment_substitute`].
    fn substitute_opt(&self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.environment_substitute(v))
    }
}

/// Resolves variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl VariableSpace for SystemEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Explicit variables with an optional fallback space.
#[derive(Clone, Default)]
pub struct Variables {
    values: BTreeMap<String, String>,
    parent: Option<Arc<dyn VariableSpace>>,
}

impl Variables {
    /// Variables that fall back to the process environment.
    #[must_use]
    pub fn with_system_parent() -> Self {
        Self { values: BTreeMap::new(), parent: Some(Arc::new(SystemEnvironment)) }
    }

    #[must_use]
    pub fn parent(mut self, parent: Arc<dyn VariableSpace>) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl VariableSpace for Variables {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned().or_else(|| self.parent.as_ref().and_then(|p| p.get(name)))
    }
}

impl fmt::Debug for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variables")
            .field("values", &self.values)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            parent: None,
        }
    }
}
