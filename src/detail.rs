//! Payloads attached to an error and how they flatten to text.
//!
//! # Rendering Rules
//!
//! | Variant     | Rendering                                         |
//! |-------------|---------------------------------------------------|
//! | `Empty`     | empty string                                      |
//! | `Scalar`    | the string itself                                 |
//! | `Sequence`  | element renderings joined by `" & "`              |
//! | `Map`       | `"key: value"` pairs joined by `", "`             |
//! | `Exception` | the message, then the backtrace on its own lines  |
//! | `Error`     | the nested error's own rendering (recursive)      |
//!
//! The match in [`Detail::write_to`] is exhaustive: adding a variant without a
//! rendering rule does not compile.
//!
//! # Debug Info
//!
//! [`DebugInfo`] wraps a `Detail` that may hold sensitive diagnostics. Its
//! strings are zeroized when it drops and its `Debug` output is redacted.

use crate::{AppError, RenderOptions};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use zeroize::Zeroize;

/// Separator between rendered sequence elements.
pub const SEQUENCE_SEPARATOR: &str = " & ";

/// Separator between rendered map entries.
pub const MAP_SEPARATOR: &str = ", ";

/// A payload describing why an error happened.
#[derive(Debug)]
pub enum Detail {
    Empty,
    Scalar(String),
    Sequence(Vec<Detail>),
    Map(Vec<(String, Detail)>),
    /// A foreign error, reduced to its message and optional backtrace.
    Exception {
        message: String,
        backtrace: Option<String>,
    },
    /// A nested error from this taxonomy.
    Error(Box<AppError>),
}

impl Detail {
    /// Reduce any `std::error::Error` to an `Exception`.
    ///
    /// The source chain is folded into the message as `outer: inner: ...`.
    pub fn exception(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::Exception {
            message,
            backtrace: None,
        }
    }

    /// An `Exception` with a backtrace from the standard library.
    ///
    /// Backtraces that were not captured (disabled by `RUST_BACKTRACE` or
    /// unsupported) are dropped so rendering falls back to the message.
    pub fn exception_with_backtrace(message: impl Into<String>, backtrace: &Backtrace) -> Self {
        let backtrace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self::Exception {
            message: message.into(),
            backtrace,
        }
    }

    /// Build a `Map` from key-value pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Detail>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this detail renders to nothing regardless of options.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Scalar(s) => s.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Exception { .. } | Self::Error(_) => false,
        }
    }

    /// The nested error, if this detail is one.
    pub fn as_error(&self) -> Option<&AppError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Render to a `String`.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_to(&mut out, options);
        out
    }

    /// Render into any `fmt::Write` sink.
    pub fn write_to(&self, f: &mut impl fmt::Write, options: &RenderOptions) -> fmt::Result {
        self.write_dyn(f, options)
    }

    // Nested errors recurse through here; a trait object keeps the recursion
    // from instantiating a new writer type per level.
    pub(crate) fn write_dyn(&self, f: &mut dyn fmt::Write, options: &RenderOptions) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Scalar(s) => f.write_str(s),
            Self::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(SEQUENCE_SEPARATOR)?;
                    }
                    item.write_dyn(f, options)?;
                }
                Ok(())
            }
            Self::Map(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(MAP_SEPARATOR)?;
                    }
                    write!(f, "{}: ", key)?;
                    value.write_dyn(f, options)?;
                }
                Ok(())
            }
            Self::Exception { message, backtrace } => {
                f.write_str(message)?;
                if let Some(trace) = backtrace.as_deref().filter(|t| !t.is_empty()) {
                    if !message.is_empty() {
                        f.write_str("\n")?;
                    }
                    f.write_str(trace)?;
                }
                Ok(())
            }
            Self::Error(err) => err.write_rendered_dyn(f, options),
        }
    }
}

impl Zeroize for Detail {
    fn zeroize(&mut self) {
        match self {
            Self::Empty => {}
            Self::Scalar(s) => s.zeroize(),
            Self::Sequence(items) => {
                for item in items.iter_mut() {
                    item.zeroize();
                }
                items.clear();
            }
            Self::Map(entries) => {
                for (key, value) in entries.iter_mut() {
                    key.zeroize();
                    value.zeroize();
                }
                entries.clear();
            }
            Self::Exception { message, backtrace } => {
                message.zeroize();
                if let Some(trace) = backtrace {
                    trace.zeroize();
                }
            }
            Self::Error(err) => err.zeroize_payloads(),
        }
    }
}

impl From<&str> for Detail {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for Detail {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<AppError> for Detail {
    fn from(err: AppError) -> Self {
        Self::Error(Box::new(err))
    }
}

impl From<std::io::Error> for Detail {
    fn from(err: std::io::Error) -> Self {
        Self::exception(&err)
    }
}

impl<T: Into<Detail>> From<Vec<T>> for Detail {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Detail>> From<Option<T>> for Detail {
    /// `None` collapses to `Empty`.
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

// Falsy scalars (`false`, zero, NaN) carry no information and collapse to
// `Empty`, matching how `null` and missing payloads render.
macro_rules! detail_from_integer {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Detail {
                fn from(value: $ty) -> Self {
                    if value == 0 {
                        Self::Empty
                    } else {
                        Self::Scalar(value.to_string())
                    }
                }
            }
        )+
    };
}

detail_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Detail {
    fn from(value: f64) -> Self {
        if value == 0.0 || value.is_nan() {
            Self::Empty
        } else {
            Self::Scalar(value.to_string())
        }
    }
}

impl From<bool> for Detail {
    fn from(value: bool) -> Self {
        if value {
            Self::Scalar(String::from("true"))
        } else {
            Self::Empty
        }
    }
}

impl From<char> for Detail {
    fn from(value: char) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<serde_json::Value> for Detail {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::Bool(true) => Self::Scalar(String::from("true")),
            Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0) => Self::Empty,
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::String(s) => Self::Scalar(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

// ============================================================================
// Debug Info
// ============================================================================

/// Diagnostic payload that must not leak.
///
/// Rendered only when `RenderOptions::include_debug_info` is set. Owned
/// strings are zeroized on drop.
pub struct DebugInfo(Detail);

impl DebugInfo {
    #[inline]
    pub fn new(detail: impl Into<Detail>) -> Self {
        Self(detail.into())
    }

    /// The wrapped payload.
    #[inline]
    pub fn detail(&self) -> &Detail {
        &self.0
    }
}

impl Zeroize for DebugInfo {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for DebugInfo {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DebugInfo([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use serde_json::json;

    fn plain() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn sequence_joins_with_ampersand() {
        let detail = Detail::from(vec!["a", "b", "c"]);
        assert_eq!(detail.render(&plain()), "a & b & c");
    }

    #[test]
    fn map_renders_key_value_pairs() {
        let detail = Detail::map([("id", "42"), ("status", "held")]);
        assert_eq!(detail.render(&plain()), "id: 42, status: held");
    }

    #[test]
    fn json_payload_flattens() {
        let detail = Detail::from(json!({ "ids": [1, 2], "note": null }));
        assert_eq!(detail.render(&plain()), "ids: 1 & 2, note: ");
    }

    #[test]
    fn exception_renders_message_then_backtrace() {
        let with_trace = Detail::Exception {
            message: "boom".into(),
            backtrace: Some("at main.rs:1".into()),
        };
        let without = Detail::Exception {
            message: "boom".into(),
            backtrace: None,
        };
        let trace_only = Detail::Exception {
            message: String::new(),
            backtrace: Some("at main.rs:1".into()),
        };
        assert_eq!(with_trace.render(&plain()), "boom\nat main.rs:1");
        assert_eq!(without.render(&plain()), "boom");
        assert_eq!(trace_only.render(&plain()), "at main.rs:1");
    }

    #[test]
    fn captured_backtrace_keeps_message() {
        let err = AppError::api_call("pharmacy-gateway", "POST /orders").with_details(
            Detail::exception_with_backtrace("upstream returned 500", &Backtrace::force_capture()),
        );
        let rendered = err.to_string();
        assert!(rendered.starts_with("API call to pharmacy-gateway POST /orders failed: upstream returned 500"));
    }

    #[test]
    fn falsy_scalars_collapse_to_empty() {
        assert!(Detail::from(false).is_empty());
        assert!(Detail::from(0).is_empty());
        assert!(Detail::from(0.0).is_empty());
        assert!(Detail::from(f64::NAN).is_empty());
        assert!(Detail::from(json!(false)).is_empty());
        assert!(Detail::from(json!(0)).is_empty());
        assert!(Detail::from(json!("")).is_empty());

        assert_eq!(Detail::from(true).render(&plain()), "true");
        assert_eq!(Detail::from(-3).render(&plain()), "-3");
        assert_eq!(Detail::from(json!(2.5)).render(&plain()), "2.5");

        let err = AppError::operation("Sync", "push").with_details(false);
        assert_eq!(err.to_string(), "Sync: push operation failed");
    }

    #[test]
    fn disabled_backtrace_falls_back_to_message() {
        let detail = Detail::exception_with_backtrace("boom", &Backtrace::disabled());
        assert_eq!(detail.render(&plain()), "boom");
    }

    #[test]
    fn exception_folds_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let detail = Detail::from(io);
        assert_eq!(detail.render(&plain()), "disk full");
    }

    #[test]
    fn nested_error_recurses() {
        let inner = AppError::operation("PatientStore", "save");
        let headline = inner.headline().into_owned();
        let detail = Detail::from(inner);
        assert!(detail.render(&plain()).contains(&headline));
        assert!(detail.as_error().is_some());
    }

    #[test]
    fn none_and_null_are_empty() {
        assert!(Detail::from(None::<String>).is_empty());
        assert!(Detail::from(json!(null)).is_empty());
        assert_eq!(Detail::Empty.render(&plain()), "");
    }

    #[test]
    fn zeroize_clears_strings() {
        let mut detail = Detail::map([("password", "hunter2")]);
        detail.zeroize();
        assert!(detail.is_empty());

        let mut scalar = Detail::from("token");
        scalar.zeroize();
        assert_eq!(scalar.render(&plain()), "");
    }

    #[test]
    fn debug_info_is_redacted() {
        let info = DebugInfo::new("secret");
        assert_eq!(format!("{:?}", info), "DebugInfo([REDACTED])");
        assert_eq!(info.detail().render(&plain()), "secret");
    }
}
