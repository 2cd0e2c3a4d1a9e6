//! The URI template value type.

use crate::expr::expressions;
use crate::matcher::{Pattern, PatternError};
use crate::value::Values;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An RFC 6570 URI template.
///
/// Any string is accepted verbatim; malformed expressions are handled
/// best-effort rather than rejected. Equality and hashing follow the raw
/// template text. A `Template` never mutates after construction, so it can
/// be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    raw: String,
}

impl Template {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    /// The variable names referenced across all expressions, in source
    /// order, duplicates preserved.
    pub fn variables(&self) -> Vec<String> {
        expressions(&self.raw)
            .into_iter()
            .flat_map(|expr| expr.varspecs.into_iter().map(|var| var.name))
            .collect()
    }

    /// Expands every expression against `vars` and returns the resulting
    /// URI text. Total: absent variables simply contribute no output.
    ///
    /// The output is rebuilt from the immutable raw text, span by span;
    /// literal text outside expressions is copied verbatim.
    pub fn expand(&self, vars: &Values) -> String {
        let mut expanded = String::with_capacity(self.raw.len());
        let mut last_end = 0;

        for expr in expressions(&self.raw) {
            expanded.push_str(&self.raw[last_end..expr.start]);

            let pieces: Vec<String> = expr
                .varspecs
                .iter()
                .filter_map(|var| {
                    expr.operator
                        .expand(&var.name, vars.get(&var.name), var.modifier)
                })
                .collect();
            if !pieces.is_empty() {
                expanded.push_str(expr.operator.prefix());
                expanded.push_str(&pieces.join(expr.operator.joiner()));
            }
            last_end = expr.end;
        }
        expanded.push_str(&self.raw[last_end..]);
        expanded
    }

    /// Compiles the anchored matching pattern for this template.
    pub fn pattern(&self) -> Result<Pattern, PatternError> {
        Pattern::compile(self)
    }

    /// Matches `uri` against this template and extracts its variables.
    /// `None` when the URI does not fit the template's structure.
    pub fn extract(&self, uri: &str) -> Option<HashMap<String, String>> {
        self.pattern().ok()?.extract(uri)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Template {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Template::new(raw))
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Template::new(raw)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Self {
        Template::new(raw)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Template {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Template {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Template::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::collections::HashSet;

    fn values(pairs: &[(&str, &str)]) -> Values {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_variables_in_order_with_duplicates() {
        assert_eq!(Template::new("{/var,x}/here").variables(), ["var", "x"]);
        assert_eq!(
            Template::new("{a}/{b}{?a,c}").variables(),
            ["a", "b", "a", "c"]
        );
        assert!(Template::new("/plain/text").variables().is_empty());
    }

    #[test]
    fn test_expand_simple_level() {
        let vars = values(&[("var", "value"), ("hello", "Hello World!")]);
        assert_eq!(Template::new("{var}").expand(&vars), "value");
        assert_eq!(Template::new("{hello}").expand(&vars), "Hello%20World%21");
        assert_eq!(Template::new("O{undef}X").expand(&vars), "OX");
    }

    #[test]
    fn test_expand_reserved_vs_simple() {
        let mut vars = Values::new();
        vars.set("path", "/foo/bar");
        assert_eq!(Template::new("{+path}/here").expand(&vars), "/foo/bar/here");
        assert_eq!(Template::new("{path}/here").expand(&vars), "%2Ffoo%2Fbar/here");
    }

    #[test]
    fn test_expand_multiple_variables() {
        let vars = values(&[("x", "1024"), ("y", "768"), ("empty", "")]);
        assert_eq!(Template::new("{x,y}").expand(&vars), "1024,768");
        assert_eq!(Template::new("{/x,y}").expand(&vars), "/1024/768");
        assert_eq!(
            Template::new("{;x,y,empty}").expand(&vars),
            ";x=1024;y=768;empty"
        );
        assert_eq!(
            Template::new("{?x,y,empty}").expand(&vars),
            "?x=1024&y=768&empty="
        );
        assert_eq!(Template::new("{&x,y}").expand(&vars), "&x=1024&y=768");
        assert_eq!(Template::new("{#x,y}").expand(&vars), "#1024,768");
    }

    #[test]
    fn test_expand_list_values() {
        let mut vars = Values::new();
        vars.set("count", vec!["one", "two", "three"]);
        assert_eq!(Template::new("{count}").expand(&vars), "one,two,three");
        assert_eq!(Template::new("{/count*}").expand(&vars), "/one/two/three");
        assert_eq!(
            Template::new("{?count*}").expand(&vars),
            "?count=one&count=two&count=three"
        );
    }

    #[test]
    fn test_expand_absent_variable_suppresses_prefix() {
        let vars = Values::new();
        assert_eq!(Template::new("{?missing}").expand(&vars), "");
        assert_eq!(Template::new("x{.missing}y").expand(&vars), "xy");
    }

    #[test]
    fn test_expand_empty_list_emits_nothing() {
        let mut vars = Values::new();
        vars.set("list", Value::List(Vec::new()));
        assert_eq!(Template::new("{.list}").expand(&vars), "");
        assert_eq!(Template::new("{/list*}").expand(&vars), "");
        assert_eq!(Template::new("{?list}").expand(&vars), "");
    }

    #[test]
    fn test_expand_mixed_presence_keeps_joiner_count() {
        let vars = values(&[("x", "1024"), ("y", "768")]);
        // An absent varspec contributes nothing, not even a separator.
        assert_eq!(Template::new("{?x,gone,y}").expand(&vars), "?x=1024&y=768");
    }

    #[test]
    fn test_expand_prefix_boundary() {
        let mut vars = Values::new();
        vars.set("var", "value");
        assert_eq!(Template::new("{var:5}").expand(&vars), "value");
        assert_eq!(Template::new("{var:30}").expand(&vars), "value");
        assert_eq!(Template::new("{var:3}").expand(&vars), "val");
    }

    #[test]
    fn test_expand_literal_only_and_unmatched_braces() {
        let vars = Values::new();
        assert_eq!(Template::new("/a/b/c").expand(&vars), "/a/b/c");
        assert_eq!(Template::new("/a/{unclosed").expand(&vars), "/a/{unclosed");
    }

    #[test]
    fn test_expand_is_pure() {
        let template = Template::new("/users/{user}{?q}");
        let vars = values(&[("user", "alice"), ("q", "rust")]);
        let first = template.expand(&vars);
        let second = template.expand(&vars);
        assert_eq!(first, second);
        assert_eq!(template.as_str(), "/users/{user}{?q}");
    }

    #[test]
    fn test_round_trip_single_variable_expressions() {
        let template = Template::new("/repos/{owner}/issues{?page}");
        let vars = values(&[("owner", "octocat"), ("page", "3")]);
        let uri = template.expand(&vars);
        assert_eq!(uri, "/repos/octocat/issues?page=3");

        let bound = template.extract(&uri).unwrap();
        assert_eq!(bound["owner"], "octocat");
        assert_eq!(bound["page"], "3");
    }

    #[test]
    fn test_extract_mismatch_is_none() {
        let template = Template::new("/repos/{owner}");
        assert!(template.extract("/users/octocat").is_none());
    }

    #[test]
    fn test_equality_and_hash_by_raw_text() {
        let a = Template::new("/users/{user}");
        let b = Template::new("/users/{user}");
        let c = Template::new("/users/{name}");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    #[test]
    fn test_display_and_parse_round_trip() {
        let template: Template = "/users/{user}".parse().unwrap();
        assert_eq!(template.to_string(), "/users/{user}");
        assert_eq!(Template::from("/users/{user}"), template);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let template = Template::new("/users/{user}");
        let json = serde_json::to_string(&template).unwrap();
        assert_eq!(json, "\"/users/{user}\"");
        let back: Template = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}
