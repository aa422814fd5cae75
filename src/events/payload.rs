use serde_json::Value;

use crate::error::Result;

/// Decoded event value.
///
/// Game client messages are positional JSON arrays mixing strings and nested
/// arrays. Everything that is not a string, number or array collapses to
/// `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Str(String),
    Num(f64),
    List(Vec<Payload>),
    Other,
}

impl Payload {
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Payload]> {
        match self {
            Payload::List(items) => Some(items),
            _ => None,
        }
    }

    /// Element `idx` of a list; `None` for out-of-range or non-list values.
    pub fn get(&self, idx: usize) -> Option<&Payload> {
        self.as_list().and_then(|items| items.get(idx))
    }

    /// Follow a chain of list indices, e.g. `&[2, 0]` for `value[2][0]`.
    pub fn at(&self, path: &[usize]) -> Option<&Payload> {
        path.iter().try_fold(self, |node, idx| node.get(*idx))
    }

    pub fn str_at(&self, path: &[usize]) -> Option<&str> {
        self.at(path).and_then(Payload::as_str)
    }

    pub fn list_at(&self, path: &[usize]) -> Option<&[Payload]> {
        self.at(path).and_then(Payload::as_list)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Payload::Str(s),
            Value::Number(n) => Payload::Num(n.as_f64().unwrap_or_default()),
            Value::Array(items) => Payload::List(items.into_iter().map(Payload::from).collect()),
            Value::Null | Value::Bool(_) | Value::Object(_) => Payload::Other,
        }
    }
}

/// Render a positional path as `[2][0]` for error messages.
pub fn describe_path(path: &[usize]) -> String {
    path.iter().map(|idx| format!("[{}]", idx)).collect()
}

/// Iterate over the string items of a list, skipping anything else.
pub fn strings(items: &[Payload]) -> impl Iterator<Item = &str> {
    items.iter().filter_map(Payload::as_str)
}
