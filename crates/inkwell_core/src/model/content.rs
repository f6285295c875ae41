//! Block content variants and word counting.
//!
//! # Responsibility
//! - Define the `text` and `todo` content shapes.
//! - Normalize raw JSON payloads into typed content (lenient on create,
//!   strict on update).
//! - Measure content size in whitespace-delimited words.
//!
//! # Invariants
//! - A `BlockContent` value always matches exactly one `BlockKind`.
//! - Word counting is total: it never fails and never goes negative.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Block type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain string payload.
    #[default]
    Text,
    /// Checklist item payload `{checked, text}`.
    Todo,
}

impl BlockKind {
    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Todo => "todo",
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ContentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "todo" => Ok(Self::Todo),
            other => Err(ContentError::UnknownKind(other.to_string())),
        }
    }
}

/// Checklist item payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub checked: bool,
    pub text: String,
}

/// Typed block payload. Serializes as a bare string or a `{checked, text}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Text(String),
    Todo(TodoItem),
}

/// Raised when a payload does not fit the shape required by its block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Type tag is not one of the supported block kinds.
    UnknownKind(String),
    /// `text` block payload must be a JSON string.
    ExpectedString,
    /// `todo` block payload must be a JSON object.
    ExpectedTodoRecord,
    /// `todo` record lacks a required field.
    MissingTodoField(&'static str),
    /// `todo` record field has the wrong JSON type.
    InvalidTodoField(&'static str),
    /// Persisted payload is not valid JSON.
    MalformedJson(String),
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "unknown block type `{kind}`"),
            Self::ExpectedString => write!(f, "text block content must be a string"),
            Self::ExpectedTodoRecord => {
                write!(f, "todo block content must be an object with `checked` and `text`")
            }
            Self::MissingTodoField(field) => write!(f, "todo block content requires `{field}`"),
            Self::InvalidTodoField(field) => {
                write!(f, "todo block content has invalid `{field}` value")
            }
            Self::MalformedJson(details) => write!(f, "malformed block content: {details}"),
        }
    }
}

impl Error for ContentError {}

impl BlockContent {
    /// Empty payload for the given kind.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::Text(String::new()),
            BlockKind::Todo => Self::Todo(TodoItem::default()),
        }
    }

    /// Block kind this payload belongs to.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Text(_) => BlockKind::Text,
            Self::Todo(_) => BlockKind::Todo,
        }
    }

    /// Text measured by word counting.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Todo(item) => &item.text,
        }
    }

    /// Number of whitespace-delimited words in this payload.
    pub fn word_count(&self) -> u64 {
        count_words(self.text())
    }

    /// Lenient normalization used when a block is created.
    ///
    /// - `todo`: a non-object becomes `{checked: false, text: ""}`; missing or
    ///   mistyped fields fall back to their defaults, present fields are kept.
    /// - `text`: a non-string becomes `""`.
    pub fn normalize(kind: BlockKind, raw: &Value) -> Self {
        match kind {
            BlockKind::Text => Self::Text(raw.as_str().unwrap_or_default().to_string()),
            BlockKind::Todo => match raw.as_object() {
                Some(record) => Self::Todo(TodoItem {
                    checked: record
                        .get("checked")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    text: record
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                }),
                None => Self::Todo(TodoItem::default()),
            },
        }
    }

    /// Strict parsing used when a block is updated and when rows are loaded.
    ///
    /// # Errors
    /// - `ExpectedString` for a non-string `text` payload.
    /// - `ExpectedTodoRecord`, `MissingTodoField` or `InvalidTodoField` for a
    ///   `todo` payload that is not a complete `{checked: bool, text: string}`.
    pub fn parse_strict(kind: BlockKind, raw: &Value) -> Result<Self, ContentError> {
        match kind {
            BlockKind::Text => raw
                .as_str()
                .map(|text| Self::Text(text.to_string()))
                .ok_or(ContentError::ExpectedString),
            BlockKind::Todo => {
                let record = raw.as_object().ok_or(ContentError::ExpectedTodoRecord)?;
                let checked = required_field(record, "checked")?
                    .as_bool()
                    .ok_or(ContentError::InvalidTodoField("checked"))?;
                let text = required_field(record, "text")?
                    .as_str()
                    .ok_or(ContentError::InvalidTodoField("text"))?;
                Ok(Self::Todo(TodoItem {
                    checked,
                    text: text.to_string(),
                }))
            }
        }
    }

    /// Decodes a persisted JSON payload for a block of `kind`.
    pub fn from_stored(kind: BlockKind, stored: &str) -> Result<Self, ContentError> {
        let raw: Value = serde_json::from_str(stored)
            .map_err(|err| ContentError::MalformedJson(err.to_string()))?;
        Self::parse_strict(kind, &raw)
    }

    /// Encodes this payload for persistence.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Text(text) => Value::String(text.clone()).to_string(),
            Self::Todo(item) => serde_json::json!({
                "checked": item.checked,
                "text": item.text,
            })
            .to_string(),
        }
    }
}

fn required_field<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ContentError> {
    match record.get(field) {
        Some(Value::Null) | None => Err(ContentError::MissingTodoField(field)),
        Some(value) => Ok(value),
    }
}

/// Counts whitespace-delimited words in `text`.
///
/// Whitespace runs collapse to one separator and the ends are trimmed, so
/// `"  a \n\t b "` counts as 2 and blank input counts as 0.
pub fn count_words(text: &str) -> u64 {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.split(' ').count() as u64
}

/// Counts words in a raw, possibly absent payload.
///
/// Accepts a string, a record carrying a `text` string, or nothing. Any other
/// shape counts as 0.
pub fn word_count(content: Option<&Value>) -> u64 {
    match content {
        Some(Value::String(text)) => count_words(text),
        Some(Value::Object(record)) => record
            .get("text")
            .and_then(Value::as_str)
            .map_or(0, count_words),
        _ => 0,
    }
}
