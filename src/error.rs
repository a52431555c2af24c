//! The error type: one variant per failure shape, one struct carrying it.
//!
//! `ErrorVariant` holds the kind-specific identifying fields. `AppError`
//! wraps a variant together with a support reference, an optional `details`
//! payload and optional `debug_info`.
//!
//! # Example
//!
//! ```rust
//! use scalamed_errors::{AppError, ConnectionType, ErrorKind, RenderOptions};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
//! let err = AppError::connection(ConnectionType::Database, "orders-primary")
//!     .with_details(io)
//!     .with_debug_info("dsn=postgres://orders-primary:5432");
//!
//! assert_eq!(err.kind(), ErrorKind::ConnectionError);
//! assert_eq!(
//!     err.to_string(),
//!     "database connection to orders-primary failed: connect timed out"
//! );
//! assert!(err
//!     .render(&RenderOptions::default().with_debug_info())
//!     .ends_with("[debug: dsn=postgres://orders-primary:5432]"));
//! ```

use crate::render::compose;
use crate::{
    Audience, CatalogError, ConnectionType, DebugInfo, Detail, DeviceOpErrorCategory, ErrorCategory,
    ErrorConfig, ErrorKind, ErrorLog, FormattedMessage, ReferenceCode, RenderOptions,
    SecurityErrorCategory, TemplateInput, UserErrorCategory, WorkflowErrorCategory, catalog,
    format_input,
};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Service Failure (Catalog Driven)
// ============================================================================

/// A catalog entry together with its formatted message.
///
/// The message is formatted once, at construction, from a per-call copy of
/// the template; the catalog entry itself is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    config: &'static ErrorConfig,
    message: FormattedMessage,
}

impl ServiceFailure {
    /// Format `config`'s template with `input`.
    ///
    /// `{operation}`, `{details}`, `{context}` and any other placeholders are
    /// all resolved from the same input in a single pass.
    pub fn new(config: &'static ErrorConfig, input: impl Into<TemplateInput>) -> Self {
        let message = format_input(config.message(), &input.into());
        Self { config, message }
    }

    /// Resolve `key` in the catalog, then format.
    pub fn from_key(key: &str, input: impl Into<TemplateInput>) -> Result<Self, CatalogError> {
        let config = catalog::lookup(key)?;
        Ok(Self::new(config, input))
    }

    #[inline]
    pub const fn config(&self) -> &'static ErrorConfig {
        self.config
    }

    #[inline]
    pub fn message(&self) -> &FormattedMessage {
        &self.message
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        self.config.code()
    }

    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.config.http_status()
    }

    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.config.category()
    }
}

// ============================================================================
// Error Variant
// ============================================================================

/// Kind-specific identifying fields of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorVariant {
    OperationError {
        component: Cow<'static, str>,
        operation: Cow<'static, str>,
    },
    NoOp {
        component: Cow<'static, str>,
        operation: Cow<'static, str>,
    },
    NotImplemented {
        feature: Cow<'static, str>,
    },
    RuleViolation {
        rule: Cow<'static, str>,
        category: WorkflowErrorCategory,
    },
    SecurityRuleViolation {
        rule: Cow<'static, str>,
        category: SecurityErrorCategory,
    },
    SecurityViolation {
        category: SecurityErrorCategory,
        subject: Cow<'static, str>,
    },
    ApiCallError {
        service: Cow<'static, str>,
        endpoint: Cow<'static, str>,
    },
    ConnectionError {
        connection: ConnectionType,
        target: Cow<'static, str>,
    },
    UserError {
        category: UserErrorCategory,
        message: Cow<'static, str>,
    },
    DeviceOpError {
        device: Cow<'static, str>,
        operation: Cow<'static, str>,
        category: DeviceOpErrorCategory,
    },
    ServiceError(ServiceFailure),
    UnhandledRejection {
        reason: Cow<'static, str>,
    },
    UncaughtException {
        origin: Cow<'static, str>,
    },
}

impl ErrorVariant {
    /// Coarse kind tag.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OperationError { .. } | Self::NotImplemented { .. } => ErrorKind::OperationError,
            Self::NoOp { .. } => ErrorKind::NoOp,
            Self::RuleViolation { .. } => ErrorKind::RuleViolation,
            Self::SecurityRuleViolation { .. } | Self::SecurityViolation { .. } => {
                ErrorKind::SecurityViolation
            }
            Self::ApiCallError { .. } => ErrorKind::ApiCallError,
            Self::ConnectionError { .. } => ErrorKind::ConnectionError,
            Self::UserError { .. } => ErrorKind::UserError,
            Self::DeviceOpError { .. } => ErrorKind::DeviceOpError,
            Self::ServiceError(_) => ErrorKind::ServiceError,
            Self::UnhandledRejection { .. } => ErrorKind::UnhandledRejection,
            Self::UncaughtException { .. } => ErrorKind::UncaughtException,
        }
    }

    /// Fine-grained type name (distinguishes variants sharing a kind).
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::NotImplemented { .. } => "NotImplementedError",
            Self::SecurityRuleViolation { .. } => "SecurityRuleViolation",
            other => other.kind().as_str(),
        }
    }

    /// One-line summary. Pure; recomputed on every call.
    pub fn headline(&self) -> Cow<'_, str> {
        match self {
            Self::OperationError {
                component,
                operation,
            } => format!("{}: {} operation failed", component, operation).into(),
            Self::NoOp {
                component,
                operation,
            } => format!("{}: {} operation had no effect", component, operation).into(),
            Self::NotImplemented { feature } => format!("{} is not implemented", feature).into(),
            Self::RuleViolation { rule, category } => {
                format!("Rule violation [{}]: {}", category.as_str(), rule).into()
            }
            Self::SecurityRuleViolation { rule, category } => {
                format!("Security rule violation [{}]: {}", category.as_str(), rule).into()
            }
            Self::SecurityViolation { category, subject } => {
                format!("Security violation [{}] by {}", category.as_str(), subject).into()
            }
            Self::ApiCallError { service, endpoint } => {
                format!("API call to {} {} failed", service, endpoint).into()
            }
            Self::ConnectionError { connection, target } => {
                format!("{} connection to {} failed", connection.display_name(), target).into()
            }
            Self::UserError { category, message } => {
                if message.is_empty() {
                    format!("User error [{}]", category.as_str()).into()
                } else {
                    Cow::Borrowed(message.as_ref())
                }
            }
            Self::DeviceOpError {
                device,
                operation,
                category,
            } => format!(
                "Device {}: {} failed [{}]",
                device,
                operation,
                category.as_str()
            )
            .into(),
            Self::ServiceError(failure) => Cow::Borrowed(failure.message().as_str()),
            Self::UnhandledRejection { reason } => format!("Unhandled rejection: {}", reason).into(),
            Self::UncaughtException { origin } => format!("Uncaught exception in {}", origin).into(),
        }
    }

    /// HTTP status an HTTP layer should answer with.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::ServiceError(failure) => failure.http_status(),
            Self::UserError { category, .. } => category.http_status(),
            Self::SecurityRuleViolation { .. } | Self::SecurityViolation { .. } => 403,
            Self::RuleViolation { .. } => 422,
            Self::NotImplemented { .. } => 501,
            Self::ApiCallError { .. } => 502,
            Self::ConnectionError { connection, .. } => {
                if connection.is_internal_store() {
                    503
                } else {
                    502
                }
            }
            Self::DeviceOpError { category, .. } => match category {
                DeviceOpErrorCategory::Timeout => 504,
                _ => 502,
            },
            Self::OperationError { .. }
            | Self::NoOp { .. }
            | Self::UnhandledRejection { .. }
            | Self::UncaughtException { .. } => 500,
        }
    }
}

// ============================================================================
// AppError
// ============================================================================

/// An error instance.
///
/// Immutable once built: the `with_*` builders consume and return `self`.
/// `Display` renders with `RenderOptions::default()`, so debug info never
/// appears in `to_string()`.
#[must_use = "errors should be handled or logged"]
pub struct AppError {
    variant: ErrorVariant,
    reference: ReferenceCode,
    details: Option<Detail>,
    debug_info: Option<DebugInfo>,
}

impl AppError {
    /// Wrap a variant, drawing a fresh reference code.
    pub fn new(variant: ErrorVariant) -> Self {
        Self {
            variant,
            reference: ReferenceCode::generate(),
            details: None,
            debug_info: None,
        }
    }

    // Convenience constructors, one per variant.

    pub fn operation(
        component: impl Into<Cow<'static, str>>,
        operation: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorVariant::OperationError {
            component: component.into(),
            operation: operation.into(),
        })
    }

    pub fn no_op(
        component: impl Into<Cow<'static, str>>,
        operation: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorVariant::NoOp {
            component: component.into(),
            operation: operation.into(),
        })
    }

    pub fn not_implemented(feature: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorVariant::NotImplemented {
            feature: feature.into(),
        })
    }

    pub fn rule_violation(rule: impl Into<Cow<'static, str>>, category: WorkflowErrorCategory) -> Self {
        Self::new(ErrorVariant::RuleViolation {
            rule: rule.into(),
            category,
        })
    }

    pub fn security_rule_violation(
        rule: impl Into<Cow<'static, str>>,
        category: SecurityErrorCategory,
    ) -> Self {
        Self::new(ErrorVariant::SecurityRuleViolation {
            rule: rule.into(),
            category,
        })
    }

    pub fn security_violation(
        category: SecurityErrorCategory,
        subject: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorVariant::SecurityViolation {
            category,
            subject: subject.into(),
        })
    }

    pub fn api_call(
        service: impl Into<Cow<'static, str>>,
        endpoint: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorVariant::ApiCallError {
            service: service.into(),
            endpoint: endpoint.into(),
        })
    }

    pub fn connection(connection: ConnectionType, target: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorVariant::ConnectionError {
            connection,
            target: target.into(),
        })
    }

    pub fn user(category: UserErrorCategory, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorVariant::UserError {
            category,
            message: message.into(),
        })
    }

    pub fn device_op(
        device: impl Into<Cow<'static, str>>,
        operation: impl Into<Cow<'static, str>>,
        category: DeviceOpErrorCategory,
    ) -> Self {
        Self::new(ErrorVariant::DeviceOpError {
            device: device.into(),
            operation: operation.into(),
            category,
        })
    }

    /// Catalog-driven error.
    ///
    /// ```rust
    /// use scalamed_errors::{AppError, catalog, template_values};
    ///
    /// let err = AppError::service(
    ///     &catalog::RX_CANCEL_FAILED,
    ///     template_values! { "details" => "RX-1001" },
    /// );
    /// assert_eq!(err.http_status(), 500);
    /// assert_eq!(err.code(), Some(616_002));
    /// assert!(err.headline().starts_with("Unable to cancel prescription RX-1001."));
    /// ```
    pub fn service(config: &'static ErrorConfig, input: impl Into<TemplateInput>) -> Self {
        Self::new(ErrorVariant::ServiceError(ServiceFailure::new(config, input)))
    }

    /// Catalog-driven error looked up by key.
    pub fn service_by_key(key: &str, input: impl Into<TemplateInput>) -> Result<Self, CatalogError> {
        Ok(Self::new(ErrorVariant::ServiceError(ServiceFailure::from_key(
            key, input,
        )?)))
    }

    pub fn unhandled_rejection(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorVariant::UnhandledRejection {
            reason: reason.into(),
        })
    }

    pub fn uncaught_exception(origin: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorVariant::UncaughtException {
            origin: origin.into(),
        })
    }

    /// Convert a `catch_unwind` payload into an `UncaughtException`.
    ///
    /// The panic message, when it is a string, becomes the details.
    ///
    /// ```rust
    /// use scalamed_errors::{AppError, ErrorKind};
    ///
    /// let payload = std::panic::catch_unwind(|| -> u32 { panic!("worker died") }).unwrap_err();
    /// let err = AppError::uncaught_exception_from_panic("worker", &*payload);
    /// assert_eq!(err.kind(), ErrorKind::UncaughtException);
    /// assert!(err.to_string().ends_with("worker died"));
    /// ```
    pub fn uncaught_exception_from_panic(
        origin: impl Into<Cow<'static, str>>,
        payload: &(dyn Any + Send),
    ) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("non-string panic payload")
        };

        Self::uncaught_exception(origin).with_details(Detail::Exception {
            message,
            backtrace: None,
        })
    }

    // Builders.

    /// Attach the causing payload.
    #[inline]
    pub fn with_details(mut self, details: impl Into<Detail>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach diagnostics that are only rendered on explicit opt-in.
    #[inline]
    pub fn with_debug_info(mut self, debug_info: impl Into<Detail>) -> Self {
        self.debug_info = Some(DebugInfo::new(debug_info));
        self
    }

    /// Replace the generated reference, e.g. to propagate one across a boundary.
    #[inline]
    pub fn with_reference(mut self, reference: ReferenceCode) -> Self {
        self.reference = reference;
        self
    }

    // Accessors.

    #[inline]
    pub fn variant(&self) -> &ErrorVariant {
        &self.variant
    }

    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.variant.kind()
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.variant.type_name()
    }

    #[inline]
    pub const fn audience(&self) -> Audience {
        self.variant.kind().audience()
    }

    #[inline]
    pub const fn reference(&self) -> &ReferenceCode {
        &self.reference
    }

    #[inline]
    pub fn details(&self) -> Option<&Detail> {
        self.details.as_ref()
    }

    #[inline]
    pub fn debug_info(&self) -> Option<&Detail> {
        self.debug_info.as_ref().map(DebugInfo::detail)
    }

    /// One-line summary. Recomputed on every call.
    #[inline]
    pub fn headline(&self) -> Cow<'_, str> {
        self.variant.headline()
    }

    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.variant.http_status()
    }

    /// Catalog code, for service errors.
    pub const fn code(&self) -> Option<u32> {
        match &self.variant {
            ErrorVariant::ServiceError(failure) => Some(failure.code()),
            _ => None,
        }
    }

    /// The catalog failure, for service errors.
    pub const fn service_failure(&self) -> Option<&ServiceFailure> {
        match &self.variant {
            ErrorVariant::ServiceError(failure) => Some(failure),
            _ => None,
        }
    }

    /// Render with explicit options.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_rendered(&mut out, options);
        out
    }

    /// Render into any `fmt::Write` sink.
    pub fn write_rendered(&self, f: &mut impl fmt::Write, options: &RenderOptions) -> fmt::Result {
        self.write_rendered_dyn(f, options)
    }

    pub(crate) fn write_rendered_dyn(
        &self,
        f: &mut dyn fmt::Write,
        options: &RenderOptions,
    ) -> fmt::Result {
        compose(
            f,
            self.type_name(),
            &self.headline(),
            self.details(),
            self.debug_info(),
            options,
        )
    }

    /// Structured log record borrowing from this error.
    ///
    /// The record cannot outlive the error; consume it immediately.
    #[inline]
    pub fn log<'a>(&'a self, options: &RenderOptions) -> ErrorLog<'a> {
        ErrorLog::new(self, options)
    }

    /// Callback form of [`log`](Self::log).
    #[inline]
    pub fn with_log<F, R>(&self, options: &RenderOptions, f: F) -> R
    where
        F: FnOnce(&ErrorLog<'_>) -> R,
    {
        let log = self.log(options);
        f(&log)
    }

    pub(crate) fn zeroize_payloads(&mut self) {
        use zeroize::Zeroize;
        if let Some(details) = self.details.as_mut() {
            details.zeroize();
        }
        if let Some(debug) = self.debug_info.as_mut() {
            debug.zeroize();
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind())
            .field("reference", &self.reference)
            .field("variant", &self.variant)
            .field("details", &self.details)
            .field("debug_info", &self.debug_info)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rendered(f, &RenderOptions::default())
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.details
            .as_ref()
            .and_then(Detail::as_error)
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<CatalogError> for AppError {
    /// A failed catalog lookup is an internal operation error.
    fn from(err: CatalogError) -> Self {
        AppError::operation("ErrorCatalog", "lookup").with_details(Detail::exception(&err))
    }
}
