//! Ordered pattern tables shared by every extraction pass.
//!
//! A [`RuleSet`] is tried top to bottom and the first rule whose regex
//! matches anywhere in the text decides the field. Later rules are never
//! consulted, even if they would match earlier in the text.

use regex::{Captures, Regex};

/// Ambient inputs a normalizer may need.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub current_year: i32,
}

/// Turns the captures of a winning rule into the field value.
pub type Normalizer = fn(&Captures<'_>, &Context) -> String;

pub struct Rule {
    pub name: &'static str,
    regex: Regex,
    normalize: Normalizer,
}

impl Rule {
    /// Compile a case-insensitive rule. Patterns are static tables, so an
    /// invalid one is a bug and panics on first use.
    pub fn new(name: &'static str, pattern: &str, normalize: Normalizer) -> Self {
        let regex = Regex::new(&format!("(?i){}", pattern))
            .unwrap_or_else(|e| panic!("invalid pattern for rule {}: {}", name, e));
        Self {
            name,
            regex,
            normalize,
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Evaluate this rule alone, ignoring precedence.
    pub fn apply(&self, text: &str, ctx: &Context) -> Option<String> {
        self.regex
            .captures(text)
            .map(|caps| (self.normalize)(&caps, ctx))
    }
}

pub struct RuleSet {
    field: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(field: &'static str, rules: Vec<Rule>) -> Self {
        Self { field, rules }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// First rule in table order that matches, with its captures.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<(&Rule, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.regex.captures(text).map(|caps| (rule, caps)))
    }

    /// Normalized value of the winning rule, or an empty string.
    pub fn apply(&self, text: &str, ctx: &Context) -> String {
        match self.first_match(text) {
            Some((rule, caps)) => {
                let value = (rule.normalize)(&caps, ctx);
                tracing::debug!(field = self.field, rule = rule.name, value = %value, "Rule matched");
                value
            }
            None => String::new(),
        }
    }
}

/// Number of capture groups, not counting the whole match.
pub fn group_count(caps: &Captures<'_>) -> usize {
    caps.len() - 1
}

pub fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Left-pad with `0` to two characters. Longer input is returned unchanged.
pub fn pad2(value: &str) -> String {
    if value.chars().count() < 2 {
        format!("{:0>2}", value)
    } else {
        value.to_string()
    }
}

/// First capture trimmed, or the whole match trimmed for rules that
/// capture nothing.
pub fn capture_or_whole(caps: &Captures<'_>, _ctx: &Context) -> String {
    let index = if group_count(caps) > 0 { 1 } else { 0 };
    group(caps, index).trim().to_string()
}
