//! Attribute values and the ordered attribute store.
//!
//! A [`Value`] knows how to render itself as a DOT token: bare where the
//! lexical rules allow it, quoted otherwise, and verbatim for HTML-like
//! labels. The [`AttributeStore`] preserves first-insertion order even when
//! a key is overwritten, which keeps serialization byte-stable.

use indexmap::IndexMap;

/// A single attribute value with explicit rendering rules per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text, quoted on output only when the lexical rules require it.
    Str(String),
    /// HTML-like label, stored with its surrounding angle brackets and
    /// emitted verbatim (never quoted, never escaped).
    Html(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Renders the value as a DOT token.
    pub fn to_dot(&self) -> String {
        match self {
            Value::Str(s) => dot_id(s),
            Value::Html(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            // A whole-valued float keeps its decimal point so it reads
            // back as a float rather than an integer.
            Value::Float(n) if n.fract() == 0.0 && n.is_finite() => format!("{n:.1}"),
            Value::Float(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
        }
    }

    /// The text of a `Str` or `Html` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Html(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        if looks_html(value) {
            Value::Html(value.to_string())
        } else {
            Value::Str(value.to_string())
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        if looks_html(&value) {
            Value::Html(value)
        } else {
            Value::Str(value)
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// A value is HTML-like iff its trimmed form is wrapped in angle brackets.
pub(crate) fn looks_html(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 2 && t.starts_with('<') && t.ends_with('>')
}

/// Whether `s` spells a DOT numeral: an optional minus sign, then digits
/// with at most one decimal point.
pub(crate) fn looks_number(s: &str) -> bool {
    let t = s.strip_prefix('-').unwrap_or(s);
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match t.split_once('.') {
        None => digits(t),
        Some((int, frac)) => {
            (int.is_empty() || int.bytes().all(|b| b.is_ascii_digit()))
                && (frac.is_empty() || frac.bytes().all(|b| b.is_ascii_digit()))
                && !(int.is_empty() && frac.is_empty())
        }
    }
}

/// Characters that force a string into quoted form.
pub(crate) fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars().any(|c| {
            c.is_whitespace()
                || matches!(c, '#' | '"' | ':' | ';' | '=' | '-' | '\'' | '/' | '\\')
        })
}

/// Whether `s` lexes back as the same single bare-identifier token.
fn lexes_bare(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(crate::parser::is_ident_char)
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && !crate::parser::is_keyword(s)
}

/// Renders an identifier-position string: bare when possible, quoted
/// otherwise. Strings that would not read back as the same string kind
/// when left bare (HTML-like labels, numerals, booleans, keywords, and
/// anything that is not a single identifier token) are quoted too.
pub(crate) fn dot_id(s: &str) -> String {
    if needs_quoting(s)
        || looks_html(s)
        || looks_number(s)
        || s == "true"
        || s == "false"
        || !lexes_bare(s)
    {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Wraps `s` in double quotes, escaping quotes and newlines. Backslashes
/// pass through as written so DOT escape sequences survive.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Ordered key/value attribute map with an optional free-text comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    entries: IndexMap<String, Value>,
    comment: Option<String>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`. Overwriting an existing key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes `key`, shifting later entries up to keep their order.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn apply<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (k, v) in pairs {
            self.set(k, v);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }
}
