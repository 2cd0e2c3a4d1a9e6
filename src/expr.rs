//! Template expression scanning and variable parsing.
//!
//! An expression is a `{...}` span inside a template: an optional operator
//! trigger character followed by a comma-separated list of variable specs,
//! each with an optional `:n` prefix-length or `*` explode modifier.

use crate::operator::Operator;
use regex::Regex;
use std::fmt;
use winnow::combinator::{alt, opt, separated};
use winnow::prelude::*;
use winnow::token::take_till;

/// A variable modifier inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modifier {
    None,
    /// `:n` - truncate a scalar to its first `n` characters.
    Prefix(usize),
    /// `*` - expand list/assoc members as separate joined elements.
    Explode,
}

/// One variable reference inside an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VarSpec {
    pub name: String,
    pub modifier: Modifier,
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Modifier::None => write!(f, "{}", self.name),
            Modifier::Prefix(limit) => write!(f, "{}:{}", self.name, limit),
            Modifier::Explode => write!(f, "{}*", self.name),
        }
    }
}

/// A single `{...}` span, with byte offsets into the raw template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expression {
    pub start: usize,
    pub end: usize,
    pub operator: Operator,
    pub varspecs: Vec<VarSpec>,
}

/// Scans the raw template for expressions, in appearance order.
///
/// Brace characters never occur inside an expression, so an unterminated
/// `{` finds no span and stays literal text.
pub(crate) fn expressions(raw: &str) -> Vec<Expression> {
    let pattern = Regex::new(r"\{([^{}]*)\}").unwrap();
    pattern
        .captures_iter(raw)
        .map(|cap| {
            let span = cap.get(0).unwrap();
            let (operator, varspecs) = parse_body(cap.get(1).unwrap().as_str());
            Expression {
                start: span.start(),
                end: span.end(),
                operator,
                varspecs,
            }
        })
        .collect()
}

// ============ Winnow Parsers ============

fn parse_body(inner: &str) -> (Operator, Vec<VarSpec>) {
    // The grammar accepts any inner text, so the fallback is unreachable.
    expression_body
        .parse(inner)
        .unwrap_or((Operator::Simple, Vec::new()))
}

fn expression_body(input: &mut &str) -> ModalResult<(Operator, Vec<VarSpec>)> {
    let op = opt(operator).parse_next(input)?.unwrap_or(Operator::Simple);
    let varspecs: Vec<VarSpec> = separated(0.., varspec, ',').parse_next(input)?;
    Ok((op, varspecs))
}

fn operator(input: &mut &str) -> ModalResult<Operator> {
    alt((
        '+'.value(Operator::Reserved),
        '#'.value(Operator::Fragment),
        '.'.value(Operator::Label),
        '/'.value(Operator::PathSegment),
        ';'.value(Operator::PathStyle),
        '?'.value(Operator::Query),
        '&'.value(Operator::QueryContinuation),
    ))
    .parse_next(input)
}

fn varspec(input: &mut &str) -> ModalResult<VarSpec> {
    let spec: &str = take_till(0.., ',').parse_next(input)?;
    Ok(parse_varspec(spec))
}

/// Parses one comma-separated component like `name`, `name:3` or `name*`.
/// Malformed prefix digits degrade to no modifier rather than an error.
fn parse_varspec(spec: &str) -> VarSpec {
    if let Some((name, digits)) = spec.split_once(':') {
        let modifier = digits
            .parse()
            .map(Modifier::Prefix)
            .unwrap_or(Modifier::None);
        VarSpec {
            name: name.to_string(),
            modifier,
        }
    } else if let Some(name) = spec.strip_suffix('*') {
        VarSpec {
            name: name.to_string(),
            modifier: Modifier::Explode,
        }
    } else {
        VarSpec {
            name: spec.to_string(),
            modifier: Modifier::None,
        }
    }
}
