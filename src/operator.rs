//! The RFC 6570 operator table.
//!
//! Each operator is a data record of output prefix, joiner, named-style
//! flag, empty-value form and encode set, consulted once per varspec during
//! expansion. The set is closed, so every dispatch is an exhaustive match.

use crate::expr::Modifier;
use crate::value::Value;

/// Reserved characters passed through unescaped by `+` and `#` expansion:
/// RFC 3986 gen-delims and sub-delims.
const RESERVED: &[u8] = b":/?#[]@!$&'()*+,;=";

/// The expansion mode selected by an expression's leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    /// No trigger character, e.g. `{var}`.
    Simple,
    /// `+`
    Reserved,
    /// `#`
    Fragment,
    /// `.`
    Label,
    /// `/`
    PathSegment,
    /// `;`
    PathStyle,
    /// `?`
    Query,
    /// `&`
    QueryContinuation,
}

impl Operator {
    /// Text prepended to an expression's expansion when at least one
    /// varspec produced output.
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathStyle => ";",
            Operator::Query => "?",
            Operator::QueryContinuation => "&",
        }
    }

    /// Separator between the outputs of an expression's varspecs.
    pub(crate) fn joiner(&self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathStyle => ";",
            Operator::Query | Operator::QueryContinuation => "&",
        }
    }

    /// Named operators render each varspec as `name=value`.
    pub(crate) fn is_named(&self) -> bool {
        matches!(
            self,
            Operator::PathStyle | Operator::Query | Operator::QueryContinuation
        )
    }

    /// Suffix after the name when a named varspec's value is empty:
    /// `;` emits the bare name, `?` and `&` keep a trailing `=`.
    fn ifemp(&self) -> &'static str {
        match self {
            Operator::Query | Operator::QueryContinuation => "=",
            _ => "",
        }
    }

    fn allows_reserved(&self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }

    fn encode(&self, text: &str) -> String {
        if self.allows_reserved() {
            encode_reserved(text)
        } else {
            urlencoding::encode(text).into_owned()
        }
    }

    /// Expands a single varspec, or `None` when the value contributes no
    /// output at all (undefined, or a list/assoc with zero members).
    pub(crate) fn expand(&self, name: &str, value: &Value, modifier: Modifier) -> Option<String> {
        match value {
            Value::Undefined => None,
            Value::List(items) if items.is_empty() => None,
            Value::Assoc(pairs) if pairs.is_empty() => None,
            Value::Scalar(text) => {
                let text = match modifier {
                    Modifier::Prefix(limit) => truncate(text, limit),
                    _ => text,
                };
                Some(self.labeled(name, &self.encode(text)))
            }
            Value::List(items) => Some(match modifier {
                Modifier::Explode => {
                    let parts: Vec<String> = items
                        .iter()
                        .map(|item| self.labeled(name, &self.encode(item)))
                        .collect();
                    parts.join(self.joiner())
                }
                _ => {
                    let joined = items
                        .iter()
                        .map(|item| self.encode(item))
                        .collect::<Vec<_>>()
                        .join(",");
                    self.labeled(name, &joined)
                }
            }),
            Value::Assoc(pairs) => Some(match modifier {
                Modifier::Explode => {
                    let parts: Vec<String> = pairs
                        .iter()
                        .map(|(key, val)| self.pair(&self.encode(key), &self.encode(val)))
                        .collect();
                    parts.join(self.joiner())
                }
                _ => {
                    let joined = pairs
                        .iter()
                        .flat_map(|(key, val)| [self.encode(key), self.encode(val)])
                        .collect::<Vec<_>>()
                        .join(",");
                    self.labeled(name, &joined)
                }
            }),
        }
    }

    /// `name=value` under a named operator, the value alone otherwise.
    fn labeled(&self, name: &str, value: &str) -> String {
        if self.is_named() {
            self.pair(name, value)
        } else {
            value.to_string()
        }
    }

    /// `label=value`, with the operator's empty-value form when the value
    /// is empty under a named operator.
    fn pair(&self, label: &str, value: &str) -> String {
        if self.is_named() && value.is_empty() {
            format!("{}{}", label, self.ifemp())
        } else {
            format!("{}={}", label, value)
        }
    }
}

/// First `limit` characters of `text`; shorter values pass untouched.
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}

/// Reserved expansion: unreserved and reserved characters stay literal,
/// well-formed `%XX` triplets pass through un-re-encoded, everything else
/// (including a bare `%`) is percent-encoded.
fn encode_reserved(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let passthrough = if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            3
        } else if RESERVED.contains(&bytes[i]) {
            1
        } else {
            i += 1;
            continue;
        };

        // Reserved and '%' are ASCII, so these are char boundaries.
        out.push_str(&urlencoding::encode(&text[start..i]));
        out.push_str(&text[i..i + passthrough]);
        i += passthrough;
        start = i;
    }
    out.push_str(&urlencoding::encode(&text[start..]));
    out
}
