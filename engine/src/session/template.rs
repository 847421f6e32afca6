//! Prompt templates and variable bindings
//!
//! Prompts are stored in history as raw templates containing
//! `${name}`-style placeholders. Expansion against the session's
//! bindings happens at send time inside the loop engine, so a variable
//! bound after the prompt was attached still resolves. Placeholders
//! with no matching binding are left verbatim rather than dropped,
//! which keeps a typo visible in the transcript.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid placeholder pattern")
    })
}

/// Name → value mapping used for prompt expansion
///
/// Keys are unique; setting an existing key overwrites its value. There
/// is no deletion operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBindings {
    vars: BTreeMap<String, String>,
}

impl VariableBindings {
    /// Create an empty set of bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Return new bindings with `name` set to `value` (overwrite semantics)
    #[must_use]
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut vars = self.vars.clone();
        vars.insert(name.into(), value.into());
        Self { vars }
    }

    /// Look up a binding
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Expand every `${name}` placeholder in `template` against `bindings`
///
/// Pure function. Unbound placeholders are left as-is.
pub fn expand(template: &str, bindings: &VariableBindings) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match bindings.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
