//! Structured replies returned by the command façade.

use std::collections::BTreeMap;

use serde::Serialize;

/// Nested map built from dotted `key=value` lines
pub type Record = BTreeMap<String, Value>;

/// A leaf or a nested level of a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Map(Record),
}

impl Value {
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Record> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Follow `path` through nested maps.
///
/// ```
/// use unbound_control::response::{Value, get_path};
/// # let record = unbound_control::parser::parse_record("total.num.queries=42").unwrap();
/// assert_eq!(
///     get_path(&record, &["total", "num", "queries"]),
///     Some(&Value::Number(42.0))
/// );
/// ```
#[must_use]
pub fn get_path<'a>(record: &'a Record, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = record;
    for key in parents {
        current = current.get(*key)?.as_map()?;
    }
    current.get(*last)
}

/// Parsed `status` reply.
///
/// Fields stay `None` when the daemon did not report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
    /// Uptime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Textual state, e.g. `running`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Structured form of a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseData {
    /// Statistics-style `key=value` output
    Record(Record),
    /// Daemon status
    Status(Status),
    /// The daemon acknowledged the command with `ok`
    Ok,
    /// One entry per non-blank line, for list-style commands
    Lines(Vec<String>),
    /// No structured shape; see the raw text
    Text,
}

/// A command reply: the raw text and its structured form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub raw: String,
    pub data: ResponseData,
}

impl Response {
    #[must_use]
    pub const fn new(raw: String, data: ResponseData) -> Self {
        Self { raw, data }
    }

    #[must_use]
    pub const fn record(&self) -> Option<&Record> {
        match &self.data {
            ResponseData::Record(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        match &self.data {
            ResponseData::Status(status) => Some(status),
            _ => None,
        }
    }

    #[must_use]
    pub fn lines(&self) -> Option<&[String]> {
        match &self.data {
            ResponseData::Lines(lines) => Some(lines.as_slice()),
            _ => None,
        }
    }

    /// Returns `true` if the daemon answered `ok`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.data, ResponseData::Ok)
    }
}
