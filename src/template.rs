//! Placeholder substitution for catalog message templates.
//!
//! A template is a string with zero or more `{name}` tokens. Values come from
//! a [`TemplateValues`] map; each entry is one of:
//!
//! - `Scalar`: replaces every occurrence of its token
//! - `Lazy`: a zero-argument closure, invoked at most once per format call and
//!   only if its token occurs
//! - `Structured`: an object or array payload, skipped
//!
//! Tokens without a value are left verbatim. Substituted text is never
//! rescanned, so a value that itself contains `{name}` stays literal.
//!
//! # Referential Transparency
//!
//! Templates are borrowed and never written to. Formatting the same catalog
//! entry twice with different values yields two independent results.
//!
//! ```rust
//! use scalamed_errors::{catalog, format_template, template_values};
//!
//! let template = catalog::OPERATION_FAILED.message();
//! let first = format_template(template, &template_values! { "operation" => "create" });
//! let second = format_template(template, &template_values! { "operation" => "sync" });
//!
//! assert_eq!(first.as_str(), "Unable to perform create operation");
//! assert_eq!(second.as_str(), "Unable to perform sync operation");
//! assert_eq!(template, "Unable to perform {operation} operation");
//! ```

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Values
// ============================================================================

/// Closure type behind `TemplateValue::Lazy`.
pub type LazyValue = Arc<dyn Fn() -> String + Send + Sync>;

/// A single placeholder value.
#[derive(Clone)]
pub enum TemplateValue {
    /// Literal text.
    Scalar(String),
    /// Deferred text, computed on first use within a format call.
    Lazy(LazyValue),
    /// Object or array payload. Never substituted.
    Structured(serde_json::Value),
}

impl TemplateValue {
    /// Wrap a closure as a lazily computed value.
    #[inline]
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Lazy(Arc::new(f))
    }

    /// Whether this value can take part in substitution.
    #[inline]
    pub const fn is_substitutable(&self) -> bool {
        !matches!(self, Self::Structured(_))
    }
}

impl fmt::Debug for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Self::Lazy(_) => f.write_str("Lazy(<fn>)"),
            Self::Structured(v) => f.debug_tuple("Structured").field(v).finish(),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for TemplateValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for TemplateValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )+
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

impl From<serde_json::Value> for TemplateValue {
    /// Strings, numbers and booleans become scalars; `null`, objects and
    /// arrays are structured and therefore skipped during substitution.
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            other => Self::Structured(other),
        }
    }
}

/// Ordered map from placeholder name to value.
///
/// Insertion order is kept; inserting an existing key replaces its value in
/// place.
#[derive(Clone, Debug, Default)]
pub struct TemplateValues {
    entries: SmallVec<[(Cow<'static, str>, TemplateValue); 4]>,
}

impl TemplateValues {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<TemplateValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<TemplateValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Either an opaque string or a values map.
///
/// An opaque input is a single value with no name to bind to; formatting with
/// it returns the template unmodified.
#[derive(Clone, Debug)]
pub enum TemplateInput {
    Opaque(String),
    Values(TemplateValues),
}

impl From<&str> for TemplateInput {
    fn from(value: &str) -> Self {
        Self::Opaque(value.to_owned())
    }
}

impl From<String> for TemplateInput {
    fn from(value: String) -> Self {
        Self::Opaque(value)
    }
}

impl From<TemplateValues> for TemplateInput {
    fn from(values: TemplateValues) -> Self {
        Self::Values(values)
    }
}

impl Default for TemplateInput {
    fn default() -> Self {
        Self::Values(TemplateValues::new())
    }
}

// ============================================================================
// Output
// ============================================================================

/// Result of formatting a template.
///
/// Always available as one joined string. When a lazy value was substituted
/// the message is also kept as its ordered parts (template text and values
/// alternating), for consumers that render parts individually.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedMessage {
    joined: String,
    parts: SmallVec<[String; 4]>,
    split: bool,
}

impl FormattedMessage {
    /// A message that went through no substitution.
    pub fn verbatim(text: impl Into<String>) -> Self {
        let joined = text.into();
        let mut parts = SmallVec::new();
        if !joined.is_empty() {
            parts.push(joined.clone());
        }
        Self {
            joined,
            parts,
            split: false,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.joined
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.joined
    }

    /// Ordered, non-empty parts of the message.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    /// Whether a lazy value was substituted.
    #[inline]
    pub const fn is_split(&self) -> bool {
        self.split
    }

    /// Placeholders still present in the message.
    pub fn residual_placeholders(&self) -> impl Iterator<Item = &str> {
        placeholders(&self.joined)
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined)
    }
}

impl AsRef<str> for FormattedMessage {
    fn as_ref(&self) -> &str {
        &self.joined
    }
}

// ============================================================================
// Formatting
// ============================================================================

enum Segment {
    Template(String),
    Value(String),
}

impl Segment {
    fn as_str(&self) -> &str {
        match self {
            Self::Template(s) | Self::Value(s) => s,
        }
    }
}

/// Format a template against either input form.
pub fn format_input(template: &str, input: &TemplateInput) -> FormattedMessage {
    match input {
        TemplateInput::Opaque(_) => FormattedMessage::verbatim(template),
        TemplateInput::Values(values) => format_template(template, values),
    }
}

/// Substitute `values` into `template`.
///
/// Each key is applied in insertion order to the template text that is still
/// unsubstituted. See the module docs for value semantics.
pub fn format_template(template: &str, values: &TemplateValues) -> FormattedMessage {
    let mut segments: SmallVec<[Segment; 8]> = SmallVec::new();
    segments.push(Segment::Template(template.to_owned()));
    let mut split = false;

    for (key, value) in values.iter() {
        if !value.is_substitutable() {
            continue;
        }

        let token = format!("{{{}}}", key);
        if !segments
            .iter()
            .any(|s| matches!(s, Segment::Template(t) if t.contains(&token)))
        {
            continue;
        }

        let resolved = match value {
            TemplateValue::Scalar(s) => s.clone(),
            TemplateValue::Lazy(f) => {
                split = true;
                f()
            }
            TemplateValue::Structured(_) => continue,
        };

        let mut next: SmallVec<[Segment; 8]> = SmallVec::with_capacity(segments.len() + 2);
        for segment in segments.drain(..) {
            match segment {
                Segment::Template(text) if text.contains(&token) => {
                    let mut pieces = text.split(token.as_str());
                    if let Some(first) = pieces.next() {
                        next.push(Segment::Template(first.to_owned()));
                    }
                    for piece in pieces {
                        next.push(Segment::Value(resolved.clone()));
                        next.push(Segment::Template(piece.to_owned()));
                    }
                }
                other => next.push(other),
            }
        }
        segments = next;
    }

    let joined: String = segments.iter().map(Segment::as_str).collect();
    let parts = segments
        .into_iter()
        .filter_map(|s| match s {
            Segment::Template(t) | Segment::Value(t) if !t.is_empty() => Some(t),
            _ => None,
        })
        .collect();

    FormattedMessage {
        joined,
        parts,
        split,
    }
}

/// Iterate over the `{name}` placeholder names in `template`.
///
/// Names are ASCII alphanumerics and underscores; other brace pairs are not
/// placeholders.
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    let bytes = template.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() {
            if bytes[pos] == b'{' {
                let start = pos + 1;
                let mut end = start;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                if end > start && end < bytes.len() && bytes[end] == b'}' {
                    pos = end + 1;
                    return Some(&template[start..end]);
                }
            }
            pos += 1;
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_values;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn scalar_replaces_every_occurrence() {
        let out = format_template("{a} and {a}", &template_values! { "a" => "x" });
        assert_eq!(out.as_str(), "x and x");
        assert!(!out.is_split());
    }

    #[test]
    fn operation_placeholder() {
        let out = format_template(
            "Unable to perform {operation} operation",
            &template_values! { "operation" => "create" },
        );
        assert_eq!(out.as_str(), "Unable to perform create operation");
        assert_eq!(out.residual_placeholders().count(), 0);
    }

    #[test]
    fn unknown_tokens_stay_verbatim() {
        let out = format_template(
            "{context} record does not exist",
            &template_values! { "operation" => "Patient" },
        );
        assert_eq!(out.as_str(), "{context} record does not exist");
        assert_eq!(out.residual_placeholders().collect::<Vec<_>>(), ["context"]);
    }

    #[test]
    fn opaque_input_returns_template_unmodified() {
        let out = format_input("Hello {name}", &TemplateInput::from("ignored"));
        assert_eq!(out.as_str(), "Hello {name}");
    }

    #[test]
    fn structured_values_are_skipped() {
        let values = template_values! {
            "obj" => serde_json::json!({ "a": 1 }),
            "arr" => serde_json::json!([1, 2]),
            "n" => serde_json::json!(7),
        };
        let out = format_template("{obj} {arr} {n}", &values);
        assert_eq!(out.as_str(), "{obj} {arr} 7");
    }

    #[test]
    fn lazy_value_is_called_once_per_format() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let values = template_values! {
            "id" => TemplateValue::lazy(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                "42".to_string()
            }),
        };

        let out = format_template("[{id}] item {id}.", &values);
        assert_eq!(out.as_str(), "[42] item 42.");
        assert!(out.is_split());
        assert_eq!(out.parts().collect::<Vec<_>>(), ["[", "42", "] item ", "42", "."]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _ = format_template("[{id}]", &values);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn lazy_value_not_called_without_token() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let values = template_values! {
            "id" => TemplateValue::lazy(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                String::new()
            }),
        };
        let out = format_template("no tokens", &values);
        assert_eq!(out.as_str(), "no tokens");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let values = template_values! {
            "a" => "{b}",
            "b" => "oops",
        };
        let out = format_template("{a}", &values);
        assert_eq!(out.as_str(), "{b}");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut values = template_values! { "a" => "1", "b" => "2" };
        values.insert("a", "3");
        assert_eq!(values.len(), 2);
        assert_eq!(values.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert!(matches!(values.get("a"), Some(TemplateValue::Scalar(s)) if s == "3"));
    }

    #[test]
    fn placeholder_scan() {
        let found: Vec<_> = placeholders("{a} {b_2} { c} {} {d").collect();
        assert_eq!(found, ["a", "b_2"]);
    }

    #[test]
    fn debug_hides_closure() {
        let value = TemplateValue::lazy(|| "secret".into());
        assert_eq!(format!("{:?}", value), "Lazy(<fn>)");
    }
}
