//! Classification tags attached to error instances.
//!
//! Everything here is pure metadata: small `Copy` enums with stable wire
//! names. Clients match on these names, so renaming a variant's `as_str()`
//! value (or its serde name) is a breaking change.
//!
//! # Tags
//!
//! - `ErrorKind`: which variant of the taxonomy produced the error
//! - `Audience`: who an error of that kind is meant for
//! - Category enums: business-domain classification carried by a variant

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Error Kind
// ============================================================================

/// Closed set of error kinds.
///
/// Several variants of `ErrorVariant` can share one kind (a security rule
/// violation is still a `SecurityViolation`), so the kind is the coarse tag
/// consumers should branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// An internal operation failed.
    OperationError,
    /// A business or workflow rule was broken.
    RuleViolation,
    /// A call to an external API failed.
    ApiCallError,
    /// A security policy was violated.
    SecurityViolation,
    /// A connection could not be established or was lost.
    ConnectionError,
    /// An error caused by, and reported to, the end user.
    UserError,
    /// A device operation failed.
    DeviceOpError,
    /// A catalog-driven service error.
    ServiceError,
    /// A rejected asynchronous task nobody handled.
    UnhandledRejection,
    /// A fault that escaped every handler.
    UncaughtException,
    /// An operation that was expected to do work did nothing.
    NoOp,
}

impl ErrorKind {
    /// Stable type name for display and log indexing.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OperationError => "OperationError",
            Self::RuleViolation => "RuleViolation",
            Self::ApiCallError => "ApiCallError",
            Self::SecurityViolation => "SecurityViolation",
            Self::ConnectionError => "ConnectionError",
            Self::UserError => "UserError",
            Self::DeviceOpError => "DeviceOpError",
            Self::ServiceError => "ServiceError",
            Self::UnhandledRejection => "UnhandledRejection",
            Self::UncaughtException => "UncaughtException",
            Self::NoOp => "NoOp",
        }
    }

    /// The audience errors of this kind are intended for.
    #[inline]
    pub const fn audience(&self) -> Audience {
        match self {
            Self::OperationError | Self::RuleViolation | Self::SecurityViolation | Self::NoOp => {
                Audience::Internal
            }
            Self::UserError | Self::ServiceError => Audience::UserFacing,
            Self::ApiCallError | Self::ConnectionError | Self::DeviceOpError => {
                Audience::ExternalDependency
            }
            Self::UnhandledRejection | Self::UncaughtException => Audience::ProcessLevel,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an error is meant for.
///
/// - `Internal`: programmer and operation faults, logged in full, never shown
///   verbatim to end users
/// - `UserFacing`: carries a status and a message intended for direct display
/// - `ExternalDependency`: wraps a failure of something we call
/// - `ProcessLevel`: terminal signals preceding process exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Internal,
    UserFacing,
    ExternalDependency,
    ProcessLevel,
}

impl Audience {
    /// Whether the error message may be shown to an end user as-is.
    #[inline]
    pub const fn is_displayable(&self) -> bool {
        matches!(self, Self::UserFacing)
    }
}

// ============================================================================
// Category Enums
// ============================================================================

/// Categories for errors reported to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserErrorCategory {
    InvalidInput,
    MissingField,
    NotFound,
    AlreadyExists,
    NotAuthenticated,
    NotAuthorized,
    SessionExpired,
    AccountLocked,
    PreconditionFailed,
    RateLimited,
}

impl UserErrorCategory {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingField => "MISSING_FIELD",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::RateLimited => "RATE_LIMITED",
        }
    }

    /// HTTP status an HTTP layer should answer with.
    #[inline]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingField => 400,
            Self::NotAuthenticated | Self::SessionExpired => 401,
            Self::NotAuthorized | Self::AccountLocked => 403,
            Self::NotFound => 404,
            Self::AlreadyExists => 409,
            Self::PreconditionFailed => 412,
            Self::RateLimited => 429,
        }
    }
}

/// Categories of security violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityErrorCategory {
    Authentication,
    Authorization,
    TokenInvalid,
    TokenExpired,
    CrossTenantAccess,
    TamperDetected,
    SuspiciousActivity,
}

impl SecurityErrorCategory {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::CrossTenantAccess => "CROSS_TENANT_ACCESS",
            Self::TamperDetected => "TAMPER_DETECTED",
            Self::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
        }
    }
}

/// Categories of workflow rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowErrorCategory {
    InvalidState,
    InvalidTransition,
    DuplicateSubmission,
    Expired,
    LimitExceeded,
    DependencyMissing,
}

impl WorkflowErrorCategory {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidState => "INVALID_STATE",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            Self::Expired => "EXPIRED",
            Self::LimitExceeded => "LIMIT_EXCEEDED",
            Self::DependencyMissing => "DEPENDENCY_MISSING",
        }
    }
}

/// Categories of device operation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceOpErrorCategory {
    NotRegistered,
    Unreachable,
    Busy,
    Rejected,
    Timeout,
    FirmwareMismatch,
}

impl DeviceOpErrorCategory {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotRegistered => "NOT_REGISTERED",
            Self::Unreachable => "UNREACHABLE",
            Self::Busy => "BUSY",
            Self::Rejected => "REJECTED",
            Self::Timeout => "TIMEOUT",
            Self::FirmwareMismatch => "FIRMWARE_MISMATCH",
        }
    }
}

/// Kinds of connections a `ConnectionError` can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Database,
    Cache,
    MessageQueue,
    Http,
    Smtp,
    Sms,
    PushNotification,
}

impl ConnectionType {
    /// Human-readable name used in headlines.
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Cache => "cache",
            Self::MessageQueue => "message queue",
            Self::Http => "HTTP",
            Self::Smtp => "SMTP",
            Self::Sms => "SMS gateway",
            Self::PushNotification => "push notification service",
        }
    }

    /// Whether the failure is a backing store we host (503) rather than a
    /// remote gateway (502).
    #[inline]
    pub const fn is_internal_store(&self) -> bool {
        matches!(self, Self::Database | Self::Cache | Self::MessageQueue)
    }
}

/// Business-domain category of a catalog entry.
///
/// Each category owns a numeric code namespace (see `codes::namespaces`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Generic CRUD and operation failures.
    Generic,
    /// Prescription (Rx) workflow failures.
    Rx,
    /// User account and session failures.
    User,
    /// Failures of the API service layer itself.
    ApiService,
}

impl ErrorCategory {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "GENERIC",
            Self::Rx => "RX",
            Self::User => "USER",
            Self::ApiService => "API_SERVICE",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
