//! Catalog record identity - numeric codes, namespaces and the `ErrorConfig` type.
//!
//! Catalog codes are six-digit integers partitioned by business category.
//! A client that has seen code `616004` once can match on it forever, so the
//! partitioning is enforced by the type system rather than by review:
//!
//! - **GENERIC** (600000-609999): CRUD and generic operation failures
//! - **RX** (616000-616999): prescription workflow
//! - **USER** (623000-623999): accounts and sessions
//! - **API_SERVICE** (700000-700999): the API service layer itself
//!
//! # Governance
//!
//! `CodeNamespace` has a private field and only the const instances in
//! [`namespaces`] exist. `ErrorConfig::const_new` asserts the code against
//! its namespace range, so an out-of-range entry in a `const` item fails the
//! build instead of shipping.
//!
//! # Example
//!
//! ```rust
//! use scalamed_errors::{ErrorConfig, namespaces};
//!
//! const RECORD_LOCKED: ErrorConfig = ErrorConfig::const_new(
//!     "recordLocked",
//!     &namespaces::GENERIC,
//!     600090,
//!     423,
//!     "{context} record is locked by another user",
//! );
//!
//! assert_eq!(RECORD_LOCKED.code(), 600090);
//! assert_eq!(RECORD_LOCKED.to_string(), "GENERIC-600090");
//! ```

use crate::ErrorCategory;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

// ============================================================================
// Code Namespace (Frozen Identity)
// ============================================================================

/// Numeric code range owned by one `ErrorCategory`.
///
/// Cannot be constructed outside this module; use the instances in
/// [`namespaces`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CodeNamespace {
    category: ErrorCategory,
    start: u32,
    end: u32,
    _private: (),
}

impl CodeNamespace {
    const fn new(category: ErrorCategory, start: u32, end: u32) -> Self {
        Self {
            category,
            start,
            end,
            _private: (),
        }
    }

    /// Category that owns this range.
    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    /// First code of the range (inclusive).
    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last code of the range (inclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Whether `code` falls inside this namespace.
    #[inline]
    pub const fn contains(&self, code: u32) -> bool {
        code >= self.start && code <= self.end
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.category.as_str()
    }
}

/// Canonical namespace instances.
pub mod namespaces {
    use super::CodeNamespace;
    use crate::ErrorCategory;

    /// Generic operation failures.
    pub const GENERIC: CodeNamespace = CodeNamespace::new(ErrorCategory::Generic, 600_000, 609_999);

    /// Prescription workflow.
    pub const RX: CodeNamespace = CodeNamespace::new(ErrorCategory::Rx, 616_000, 616_999);

    /// Accounts and sessions.
    pub const USER: CodeNamespace = CodeNamespace::new(ErrorCategory::User, 623_000, 623_999);

    /// API service layer.
    pub const API_SERVICE: CodeNamespace =
        CodeNamespace::new(ErrorCategory::ApiService, 700_000, 700_999);

    /// All namespaces, in ascending code order.
    pub const ALL: [&CodeNamespace; 4] = [&GENERIC, &RX, &USER, &API_SERVICE];
}

// ============================================================================
// Violation Type
// ============================================================================

/// Reasons a runtime-constructed `ErrorConfig` is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigViolation {
    /// Code lies outside the namespace range.
    CodeOutOfRange {
        code: u32,
        namespace: &'static str,
    },
    /// HTTP status is not a 4xx or 5xx status.
    InvalidHttpStatus { status: u16 },
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeOutOfRange { code, namespace } => {
                write!(f, "Error code {} is outside the {} range", code, namespace)
            }
            Self::InvalidHttpStatus { status } => {
                write!(f, "HTTP status {} is not an error status (400-599)", status)
            }
        }
    }
}

impl std::error::Error for ConfigViolation {}

// ============================================================================
// Error Config (Catalog Record)
// ============================================================================

/// One catalog record: stable code, HTTP status, category and message template.
///
/// The message is a `&'static str` template that may contain `{name}`
/// placeholders. It is never mutated; formatting always works on a per-call
/// copy (see [`crate::template`]).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorConfig {
    key: &'static str,
    namespace: &'static CodeNamespace,
    code: u32,
    http_status: u16,
    message: &'static str,
}

impl ErrorConfig {
    /// Create a catalog record with compile-time validation.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in const contexts) if the code is outside the
    /// namespace range or the status is not 400-599.
    #[inline]
    pub const fn const_new(
        key: &'static str,
        namespace: &'static CodeNamespace,
        code: u32,
        http_status: u16,
        message: &'static str,
    ) -> Self {
        assert!(namespace.contains(code), "Error code outside namespace range");
        assert!(
            http_status >= 400 && http_status <= 599,
            "HTTP status must be 400-599"
        );

        Self {
            key,
            namespace,
            code,
            http_status,
            message,
        }
    }

    /// Create a catalog record with runtime validation.
    ///
    /// For records loaded from outside the binary (plugin catalogs, tests).
    pub fn checked_new(
        key: &'static str,
        namespace: &'static CodeNamespace,
        code: u32,
        http_status: u16,
        message: &'static str,
    ) -> Result<Self, ConfigViolation> {
        if !namespace.contains(code) {
            return Err(ConfigViolation::CodeOutOfRange {
                code,
                namespace: namespace.as_str(),
            });
        }

        if !(400..=599).contains(&http_status) {
            return Err(ConfigViolation::InvalidHttpStatus {
                status: http_status,
            });
        }

        Ok(Self {
            key,
            namespace,
            code,
            http_status,
            message,
        })
    }

    /// Catalog key (camelCase).
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub const fn namespace(&self) -> &'static CodeNamespace {
        self.namespace
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        self.code
    }

    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.namespace.category()
    }

    /// The raw, unformatted message template.
    #[inline]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for ErrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.namespace.as_str(), self.code)
    }
}

impl Serialize for ErrorConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorConfig", 4)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("httpResponseCode", &self.http_status)?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", self.message)?;
        state.end()
    }
}
