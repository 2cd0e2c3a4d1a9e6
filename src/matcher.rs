//! Anchored matching patterns that invert a template for extraction.

use crate::expr::{expressions, Expression};
use crate::operator::Operator;
use crate::template::Template;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Matches one simple-expansion value. The restricted class keeps
/// extraction unambiguous between comma-joined variables.
const SIMPLE_VALUE: &str = "[A-Za-z0-9%_-]+";

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("failed to build matching regex: {0}")]
    RegexBuild(#[from] regex::Error),
}

/// A compiled, anchored matcher for one template, with one capture group
/// per variable.
///
/// Compiling is pure, so a `Pattern` can be built once and shared across
/// threads for repeated extraction.
///
/// # Example
///
/// ```
/// use urimatch::{Pattern, Template};
///
/// let template = Template::new("/users/{user}/posts/{post}");
/// let pattern = Pattern::compile(&template).unwrap();
///
/// let bound = pattern.extract("/users/alice/posts/42").unwrap();
/// assert_eq!(bound["user"], "alice");
/// assert_eq!(bound["post"], "42");
/// assert!(pattern.extract("/users/alice").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    names: Vec<String>,
}

impl Pattern {
    pub fn compile(template: &Template) -> Result<Self, PatternError> {
        let raw = template.as_str();
        let mut regex_str = String::from("^");
        let mut names = Vec::new();
        let mut last_end = 0;

        for expr in expressions(raw) {
            regex_str.push_str(&regex::escape(&raw[last_end..expr.start]));
            push_expression(&mut regex_str, &expr, &mut names);
            last_end = expr.end;
        }
        regex_str.push_str(&regex::escape(&raw[last_end..]));
        regex_str.push('$');

        Ok(Self {
            regex: Regex::new(&regex_str)?,
            names,
        })
    }

    /// The flattened variable names, in template order; capture group `n`
    /// (1-based) pairs with name `n - 1`.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Matches the whole URI and percent-decodes each captured variable.
    /// `None` on structural mismatch. Variables whose optional span did
    /// not participate in the match are omitted from the map.
    pub fn extract(&self, uri: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(uri)?;

        let mut bound = HashMap::new();
        for (i, name) in self.names.iter().enumerate() {
            if let Some(group) = caps.get(i + 1) {
                bound.insert(name.clone(), decode(group.as_str()));
            }
        }
        Some(bound)
    }
}

fn push_expression(out: &mut String, expr: &Expression, names: &mut Vec<String>) {
    match expr.operator {
        Operator::Simple => {
            for (i, var) in expr.varspecs.iter().enumerate() {
                if i == 0 {
                    out.push('(');
                    out.push_str(SIMPLE_VALUE);
                    out.push(')');
                } else {
                    out.push_str("(?:,(");
                    out.push_str(SIMPLE_VALUE);
                    out.push_str("))?");
                }
                names.push(var.name.clone());
            }
        }
        op => {
            // The whole span is optional: the expansion disappears when
            // every variable is absent.
            out.push_str("(?:");
            out.push_str(&regex::escape(op.prefix()));
            for (i, var) in expr.varspecs.iter().enumerate() {
                if i > 0 {
                    out.push_str("(?:");
                    out.push_str(&regex::escape(op.joiner()));
                }
                if op.is_named() {
                    out.push_str(&regex::escape(&var.name));
                    if op == Operator::PathStyle {
                        // Path-style emits a bare name for empty values.
                        out.push_str("=?");
                    } else {
                        out.push('=');
                    }
                }
                out.push_str("(.*?)");
                if i > 0 {
                    out.push_str(")?");
                }
                names.push(var.name.clone());
            }
            out.push_str(")?");
        }
    }
}

fn decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| text.to_string())
}
