//! Structured log record for an error.
//!
//! An [`ErrorLog`] borrows the error it describes and cannot outlive it.
//! Build it, hand it to the logger, drop it. Debug info is only included
//! when the `RenderOptions` it was created with ask for it, the same gate
//! that applies to rendering.
//!
//! ```rust
//! use scalamed_errors::{AppError, RenderOptions};
//!
//! let err = AppError::api_call("pharmacy-gateway", "POST /orders")
//!     .with_debug_info("api_key=sk_live_123");
//!
//! err.with_log(&RenderOptions::default(), |log| {
//!     let mut line = String::new();
//!     log.write_to(&mut line).unwrap();
//!     assert!(line.contains("kind=ApiCallError"));
//!     assert!(!line.contains("sk_live_123"));
//! });
//! ```

use crate::{AppError, Audience, ErrorKind, ReferenceCode, RenderOptions};
use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroizing;

/// Tracing target used by [`ErrorLog::emit`].
pub const LOG_TARGET: &str = "scalamed_errors";

/// Maximum length for any individual field in formatted output.
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to truncated fields.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Log view of an error, tied to the error's lifetime.
#[derive(Debug)]
pub struct ErrorLog<'a> {
    error: &'a AppError,
    options: RenderOptions,
}

impl<'a> ErrorLog<'a> {
    pub(crate) fn new(error: &'a AppError, options: &RenderOptions) -> Self {
        Self {
            error,
            options: *options,
        }
    }

    #[inline]
    pub const fn reference(&self) -> &'a ReferenceCode {
        self.error.reference()
    }

    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.error.type_name()
    }

    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.error.http_status()
    }

    #[inline]
    pub const fn code(&self) -> Option<u32> {
        self.error.code()
    }

    #[inline]
    pub fn headline(&self) -> Cow<'a, str> {
        self.error.headline()
    }

    /// Rendered details, when present, non-empty and enabled.
    pub fn details(&self) -> Option<String> {
        if !self.options.include_details {
            return None;
        }
        let details = self.error.details()?;
        let rendered = details.render(&self.plain());
        (!rendered.is_empty()).then_some(rendered)
    }

    /// Rendered debug info. `None` unless the options opted in.
    ///
    /// The rendered copy is zeroized when dropped.
    pub fn debug_info(&self) -> Option<Zeroizing<String>> {
        if !self.options.include_debug_info {
            return None;
        }
        let info = self.error.debug_info()?;
        let rendered = Zeroizing::new(info.render(&self.plain()));
        (!rendered.is_empty()).then_some(rendered)
    }

    // Log sinks get no ANSI sequences.
    fn plain(&self) -> RenderOptions {
        RenderOptions {
            colorize: false,
            ..self.options
        }
    }

    /// Write a single `key=value` line. Fields are truncated.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] kind={} status={}",
            self.reference(),
            self.type_name(),
            self.http_status()
        )?;

        if let Some(code) = self.code() {
            write!(f, " code={}", code)?;
        }

        write!(f, " headline='{}'", truncate_with_indicator(&self.headline()))?;

        if let Some(details) = self.details() {
            write!(f, " details='{}'", truncate_with_indicator(&details))?;
        }

        if let Some(info) = self.debug_info() {
            write!(f, " debug='{}'", truncate_with_indicator(&info))?;
        }

        Ok(())
    }

    /// Emit through `tracing`.
    ///
    /// User-facing errors are expected and log at `WARN`; everything else
    /// logs at `ERROR`.
    pub fn emit(&self) {
        let headline = self.headline();
        let headline = truncate_with_indicator(&headline);
        let details = self.details();
        let details = details.as_deref().map(truncate_with_indicator);
        // `debug` is a field name; the macros import `tracing::field::debug`.
        let debug_info = self.debug_info();
        let debug_info = debug_info.as_deref().map(|s| truncate_with_indicator(s));

        match self.kind().audience() {
            Audience::UserFacing => tracing::warn!(
                target: LOG_TARGET,
                reference = %self.reference(),
                kind = self.type_name(),
                status = self.http_status(),
                code = self.code(),
                details = details.as_deref(),
                debug = debug_info.as_deref(),
                "{}",
                headline
            ),
            Audience::Internal | Audience::ExternalDependency | Audience::ProcessLevel => {
                tracing::error!(
                    target: LOG_TARGET,
                    reference = %self.reference(),
                    kind = self.type_name(),
                    status = self.http_status(),
                    code = self.code(),
                    details = details.as_deref(),
                    debug = debug_info.as_deref(),
                    "{}",
                    headline
                )
            }
        }
    }
}

impl fmt::Display for ErrorLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a field so one oversized payload cannot flood the log.
///
/// Cuts on a UTF-8 boundary and appends a visible indicator. Returns the
/// input borrowed when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionType, UserErrorCategory, catalog, template_values};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn truncate_ascii() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN + 10);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn no_truncate_when_under_limit() {
        let s = "short string";
        let truncated = truncate_with_indicator(s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated, s);
    }

    #[test]
    fn truncate_utf8_boundary() {
        // Two bytes per char.
        let s = "й".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn truncate_emoji() {
        let s = "🔥".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(std::str::from_utf8(truncated.as_bytes()).is_ok());
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert!(!truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn line_contains_structured_fields() {
        let err = AppError::service(&catalog::RX_CANCEL_FAILED, template_values! { "details" => "RX-9" })
            .with_details("pharmacy rejected");
        let line = err.log(&RenderOptions::default()).to_string();

        assert!(line.starts_with(&format!("[{}]", err.reference())));
        assert!(line.contains("kind=ServiceError"));
        assert!(line.contains("status=500"));
        assert!(line.contains("code=616002"));
        assert!(line.contains("details='pharmacy rejected'"));
    }

    #[test]
    fn debug_info_gated_by_options() {
        let err = AppError::connection(ConnectionType::Database, "primary")
            .with_debug_info("password=hunter2");

        let hidden = err.log(&RenderOptions::default());
        assert!(hidden.debug_info().is_none());
        assert!(!hidden.to_string().contains("hunter2"));

        let shown = err.log(&RenderOptions::default().with_debug_info());
        assert_eq!(
            shown.debug_info().as_deref().map(String::as_str),
            Some("password=hunter2")
        );
    }

    #[test]
    fn log_fields_have_no_color() {
        let err = AppError::operation("Ledger", "post").with_details("cause");
        let log = err.log(&RenderOptions::default().with_colors());
        assert_eq!(log.details().as_deref(), Some("cause"));
    }

    #[test]
    fn long_details_are_truncated() {
        let err = AppError::operation("Import", "parse").with_details("x".repeat(5000));
        let line = err.log(&RenderOptions::default()).to_string();
        assert!(line.contains(TRUNCATION_INDICATOR));
    }

    /// Collects formatted events from a scoped `tracing` subscriber.
    fn capture_events(f: impl FnOnce()) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || CaptureWriter(Arc::clone(&sink)))
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8(bytes).unwrap()
    }

    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn user_facing_errors_emit_warn() {
        let err = AppError::user(UserErrorCategory::NotFound, "No such patient");
        let out = capture_events(|| err.with_log(&RenderOptions::default(), |log| log.emit()));

        assert!(out.contains("WARN"), "{}", out);
        assert!(!out.contains("ERROR"), "{}", out);
        assert!(out.contains(LOG_TARGET));
        assert!(out.contains("No such patient"));
        assert!(out.contains(&format!("reference={}", err.reference())));
        assert!(out.contains("status=404"));
    }

    #[test]
    fn service_errors_emit_warn_with_code() {
        let err = AppError::service(&catalog::INVALID_LOGIN, template_values! {});
        let out = capture_events(|| err.log(&RenderOptions::default()).emit());

        assert!(out.contains("WARN"), "{}", out);
        assert!(out.contains("code=623001"));
        assert!(out.contains("status=401"));
    }

    #[test]
    fn internal_and_process_errors_emit_error() {
        let internal = AppError::operation("Ledger", "post").with_details("constraint violated");
        let out = capture_events(|| internal.log(&RenderOptions::default()).emit());
        assert!(out.contains("ERROR"), "{}", out);
        assert!(!out.contains("WARN"), "{}", out);
        assert!(out.contains("constraint violated"));

        let process = AppError::uncaught_exception("main");
        let out = capture_events(|| process.log(&RenderOptions::default()).emit());
        assert!(out.contains("ERROR"), "{}", out);

        let external = AppError::connection(ConnectionType::Cache, "redis-1");
        let out = capture_events(|| external.log(&RenderOptions::default()).emit());
        assert!(out.contains("ERROR"), "{}", out);
        assert!(out.contains("status=503"));
    }

    #[test]
    fn emitted_debug_info_needs_opt_in() {
        let err = AppError::connection(ConnectionType::Database, "primary")
            .with_debug_info("password=hunter2");

        let hidden = capture_events(|| err.log(&RenderOptions::default()).emit());
        assert!(!hidden.contains("hunter2"), "{}", hidden);
        assert!(!hidden.contains("debug="), "{}", hidden);

        let shown = capture_events(|| err.log(&RenderOptions::default().with_debug_info()).emit());
        assert!(shown.contains("password=hunter2"), "{}", shown);
    }
}
