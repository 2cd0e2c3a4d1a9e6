//! Variable values and the named binding set used for expansion.

use std::collections::HashMap;

static UNDEFINED: Value = Value::Undefined;

/// The value bound to a template variable.
///
/// `Undefined` is equivalent to the name missing from the binding set
/// entirely: the variable contributes no output, which is never an error.
/// A list or associative value with zero members is treated the same way
/// during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Undefined,
    Scalar(String),
    List(Vec<String>),
    Assoc(Vec<(String, String)>),
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Value::Assoc(pairs)
    }
}

impl From<Vec<(&str, &str)>> for Value {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Value::Assoc(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }
}

/// A set of named variable bindings for [`Template::expand`].
///
/// [`Template::expand`]: crate::Template::expand
#[derive(Debug, Default, Clone)]
pub struct Values {
    vars: HashMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Looks up a binding; a missing name is `Undefined`.
    pub fn get(&self, name: &str) -> &Value {
        self.vars.get(name).unwrap_or(&UNDEFINED)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (name, value) in iter {
            values.set(name, value);
        }
        values
    }
}
