//! The error catalog: every `ErrorConfig` the service can raise.
//!
//! # Taxonomy & Governance
//!
//! Entries are grouped by namespace and declared with
//! [`define_error_configs!`](crate::define_error_configs), which routes every
//! record through `ErrorConfig::const_new`. An entry whose code falls outside
//! its namespace range does not compile.
//!
//! Codes are allocated sequentially inside each block and never reused. A
//! retired entry keeps its code reserved; add new entries at the end of the
//! block.
//!
//! # Templates
//!
//! Messages may contain `{name}` placeholders. The conventional names are
//! `operation`, `details` and `context`; callers supply values through a
//! single [`TemplateValues`](crate::TemplateValues) map when building a
//! [`ServiceFailure`](crate::ServiceFailure).

use crate::{define_error_configs, namespaces, ErrorConfig};
use std::fmt;

/// Contact line appended to messages the user cannot resolve alone.
macro_rules! support {
    ($msg:literal) => {
        concat!($msg, " Contact Support (support@scalamed.com) for help")
    };
}

/// Numeric boundaries mirrored from `namespaces`, checked in `tests`.
pub mod ranges {
    pub const GENERIC_START: u32 = 600_000;     pub const GENERIC_END: u32 = 609_999;
    pub const RX_START: u32 = 616_000;          pub const RX_END: u32 = 616_999;
    pub const USER_START: u32 = 623_000;        pub const USER_END: u32 = 623_999;
    pub const API_SERVICE_START: u32 = 700_000; pub const API_SERVICE_END: u32 = 700_999;
}

// -----------------------------------------------------------------------------
// GENERIC (600000-609999) - CRUD & Operations
// -----------------------------------------------------------------------------
define_error_configs! {
    &namespaces::GENERIC => {
        OPERATION_FAILED        = ("operationFailed", 600_001, 500, "Unable to perform {operation} operation"),
        CREATE_FAILED           = ("createFailed", 600_002, 500, support!("Unable to create {context} record.")),
        READ_FAILED             = ("readFailed", 600_003, 500, support!("Unable to read {context} record.")),
        UPDATE_FAILED           = ("updateFailed", 600_004, 500, support!("Unable to update {context} record.")),
        DELETE_FAILED           = ("deleteFailed", 600_005, 500, support!("Unable to delete {context} record.")),
        RECORD_DOES_NOT_EXIST   = ("recordDoesNotExist", 600_006, 404, support!("{context} record does not exist.")),
        RECORD_ALREADY_EXISTS   = ("recordAlreadyExists", 600_007, 409, "{context} record already exists"),
        INVALID_PARAMETERS      = ("invalidParameters", 600_008, 400, "Invalid parameters: {details}"),
        MISSING_PARAMETERS      = ("missingParameters", 600_009, 400, "Missing required parameters: {details}"),
        VALIDATION_FAILED       = ("validationFailed", 600_010, 422, "Validation failed for {context}: {details}"),
        SEARCH_FAILED           = ("searchFailed", 600_011, 500, "Unable to search {context} records"),
        LIST_FAILED             = ("listFailed", 600_012, 500, "Unable to list {context} records"),
        SYNC_FAILED             = ("syncFailed", 600_013, 502, support!("Unable to sync {context} records.")),
        EXPORT_FAILED           = ("exportFailed", 600_014, 500, "Unable to export {context} records"),
        IMPORT_FAILED           = ("importFailed", 600_015, 422, "Unable to import {context} records: {details}"),
        UPLOAD_FAILED           = ("uploadFailed", 600_016, 500, "Unable to upload {context}"),
        DOWNLOAD_FAILED         = ("downloadFailed", 600_017, 500, "Unable to download {context}"),
        CONFLICT_DETECTED       = ("conflictDetected", 600_018, 409, "{context} was modified by another request"),
        OPERATION_NOT_PERMITTED = ("operationNotPermitted", 600_019, 403, "The {operation} operation is not permitted"),
        OPERATION_TIMED_OUT     = ("operationTimedOut", 600_020, 504, "The {operation} operation timed out"),
    }
}

// -----------------------------------------------------------------------------
// RX (616000-616999) - Prescription Workflow
// -----------------------------------------------------------------------------
define_error_configs! {
    &namespaces::RX => {
        RX_CREATE_FAILED        = ("rxCreateFailed", 616_001, 500, support!("Unable to create prescription.")),
        RX_CANCEL_FAILED        = ("rxCancelFailed", 616_002, 500, support!("Unable to cancel prescription {details}.")),
        RX_NOT_FOUND            = ("rxNotFound", 616_003, 404, "Prescription {details} could not be found"),
        RX_ALREADY_DISPENSED    = ("rxAlreadyDispensed", 616_004, 409, "Prescription {details} has already been dispensed"),
        RX_ALREADY_CANCELLED    = ("rxAlreadyCancelled", 616_005, 409, "Prescription {details} has already been cancelled"),
        RX_EXPIRED              = ("rxExpired", 616_006, 410, "Prescription {details} has expired"),
        RX_INVALID_STATE        = ("rxInvalidState", 616_007, 409, "Prescription cannot be {operation} in its current state"),
        RX_REPEATS_EXHAUSTED    = ("rxRepeatsExhausted", 616_008, 409, "No repeats remain on prescription {details}"),
        RX_DISPENSE_FAILED      = ("rxDispenseFailed", 616_009, 500, support!("Unable to dispense prescription.")),
        RX_TRANSFER_FAILED      = ("rxTransferFailed", 616_010, 500, "Unable to transfer prescription to {context}"),
        RX_SIGNATURE_INVALID    = ("rxSignatureInvalid", 616_011, 422, "Prescriber signature is invalid"),
        RX_PRESCRIBER_MISMATCH  = ("rxPrescriberMismatch", 616_012, 403, "Prescription was not issued by this prescriber"),
        RX_PATIENT_MISMATCH     = ("rxPatientMismatch", 616_013, 403, "Prescription does not belong to this patient"),
        RX_TOKEN_INVALID        = ("rxTokenInvalid", 616_014, 400, "Prescription token is invalid"),
        RX_TOKEN_EXPIRED        = ("rxTokenExpired", 616_015, 410, "Prescription token has expired"),
        RX_DRUG_NOT_FOUND       = ("rxDrugNotFound", 616_016, 404, "Medication {details} could not be found"),
        RX_CONTROLLED_SUBSTANCE = ("rxControlledSubstance", 616_017, 403, "Controlled substances require additional authorisation"),
        RX_PHARMACY_REJECTED    = ("rxPharmacyRejected", 616_018, 409, "Pharmacy {context} rejected the prescription"),
        RX_SEND_FAILED          = ("rxSendFailed", 616_019, 502, "Unable to send prescription via {context}"),
        RX_HISTORY_UNAVAILABLE  = ("rxHistoryUnavailable", 616_020, 503, "Prescription history is temporarily unavailable"),
    }
}

// -----------------------------------------------------------------------------
// USER (623000-623999) - Accounts & Sessions
// -----------------------------------------------------------------------------
define_error_configs! {
    &namespaces::USER => {
        INVALID_LOGIN           = ("invalidLogin", 623_001, 401, "Invalid username or password"),
        ACCOUNT_LOCKED          = ("accountLocked", 623_002, 403, support!("Your account has been locked.")),
        ACCOUNT_DISABLED        = ("accountDisabled", 623_003, 403, support!("Your account has been disabled.")),
        ACCOUNT_NOT_VERIFIED    = ("accountNotVerified", 623_004, 403, "Please verify your account before signing in"),
        SESSION_EXPIRED         = ("sessionExpired", 623_005, 401, "Your session has expired. Please sign in again"),
        SESSION_INVALID         = ("sessionInvalid", 623_006, 401, "Your session is invalid. Please sign in again"),
        PASSWORD_TOO_WEAK       = ("passwordTooWeak", 623_007, 400, "Password does not meet requirements: {details}"),
        PASSWORD_REUSED         = ("passwordReused", 623_008, 400, "Password has been used recently"),
        PASSWORD_RESET_FAILED   = ("passwordResetFailed", 623_009, 500, support!("Unable to reset password.")),
        RESET_TOKEN_INVALID     = ("resetTokenInvalid", 623_010, 400, "Password reset link is invalid or has expired"),
        EMAIL_ALREADY_IN_USE    = ("emailAlreadyInUse", 623_011, 409, "Email address {details} is already in use"),
        MOBILE_ALREADY_IN_USE   = ("mobileAlreadyInUse", 623_012, 409, "Mobile number is already in use"),
        VERIFICATION_CODE_INVALID = ("verificationCodeInvalid", 623_013, 400, "Verification code is invalid"),
        VERIFICATION_CODE_EXPIRED = ("verificationCodeExpired", 623_014, 400, "Verification code has expired"),
        TOO_MANY_ATTEMPTS       = ("tooManyAttempts", 623_015, 429, "Too many attempts. Please try again later"),
        USER_NOT_FOUND          = ("userNotFound", 623_016, 404, "User could not be found"),
        ROLE_NOT_PERMITTED      = ("roleNotPermitted", 623_017, 403, "Your role does not permit the {operation} operation"),
        PROFILE_INCOMPLETE      = ("profileIncomplete", 623_018, 412, "Please complete your profile: {details}"),
    }
}

// -----------------------------------------------------------------------------
// API_SERVICE (700000-700999) - Service Layer
// -----------------------------------------------------------------------------
define_error_configs! {
    &namespaces::API_SERVICE => {
        API_INTERNAL_ERROR      = ("apiInternalError", 700_001, 500, support!("An unexpected error occurred.")),
        API_UNAVAILABLE         = ("apiUnavailable", 700_002, 503, "Service is temporarily unavailable"),
        API_TIMEOUT             = ("apiTimeout", 700_003, 504, "The {operation} request timed out"),
        API_RATE_LIMITED        = ("apiRateLimited", 700_004, 429, "Too many requests. Please slow down"),
        API_BAD_REQUEST         = ("apiBadRequest", 700_005, 400, "Malformed request: {details}"),
        API_UNSUPPORTED_VERSION = ("apiUnsupportedVersion", 700_006, 400, "API version {details} is not supported"),
        API_NOT_IMPLEMENTED     = ("apiNotImplemented", 700_007, 501, "The {operation} endpoint is not implemented"),
        API_PAYLOAD_TOO_LARGE   = ("apiPayloadTooLarge", 700_008, 413, "Request payload is too large"),
        API_UPSTREAM_FAILED     = ("apiUpstreamFailed", 700_009, 502, "Upstream service {context} failed"),
        API_MAINTENANCE         = ("apiMaintenance", 700_010, 503, "Service is undergoing maintenance"),
    }
}

/// Every catalog entry, in declaration order.
pub const ALL: &[&ErrorConfig] = &[
    &OPERATION_FAILED, &CREATE_FAILED, &READ_FAILED, &UPDATE_FAILED, &DELETE_FAILED,
    &RECORD_DOES_NOT_EXIST, &RECORD_ALREADY_EXISTS, &INVALID_PARAMETERS, &MISSING_PARAMETERS,
    &VALIDATION_FAILED, &SEARCH_FAILED, &LIST_FAILED, &SYNC_FAILED, &EXPORT_FAILED,
    &IMPORT_FAILED, &UPLOAD_FAILED, &DOWNLOAD_FAILED, &CONFLICT_DETECTED,
    &OPERATION_NOT_PERMITTED, &OPERATION_TIMED_OUT,
    &RX_CREATE_FAILED, &RX_CANCEL_FAILED, &RX_NOT_FOUND, &RX_ALREADY_DISPENSED,
    &RX_ALREADY_CANCELLED, &RX_EXPIRED, &RX_INVALID_STATE, &RX_REPEATS_EXHAUSTED,
    &RX_DISPENSE_FAILED, &RX_TRANSFER_FAILED, &RX_SIGNATURE_INVALID, &RX_PRESCRIBER_MISMATCH,
    &RX_PATIENT_MISMATCH, &RX_TOKEN_INVALID, &RX_TOKEN_EXPIRED, &RX_DRUG_NOT_FOUND,
    &RX_CONTROLLED_SUBSTANCE, &RX_PHARMACY_REJECTED, &RX_SEND_FAILED, &RX_HISTORY_UNAVAILABLE,
    &INVALID_LOGIN, &ACCOUNT_LOCKED, &ACCOUNT_DISABLED, &ACCOUNT_NOT_VERIFIED, &SESSION_EXPIRED,
    &SESSION_INVALID, &PASSWORD_TOO_WEAK, &PASSWORD_REUSED, &PASSWORD_RESET_FAILED,
    &RESET_TOKEN_INVALID, &EMAIL_ALREADY_IN_USE, &MOBILE_ALREADY_IN_USE,
    &VERIFICATION_CODE_INVALID, &VERIFICATION_CODE_EXPIRED, &TOO_MANY_ATTEMPTS,
    &USER_NOT_FOUND, &ROLE_NOT_PERMITTED, &PROFILE_INCOMPLETE,
    &API_INTERNAL_ERROR, &API_UNAVAILABLE, &API_TIMEOUT, &API_RATE_LIMITED, &API_BAD_REQUEST,
    &API_UNSUPPORTED_VERSION, &API_NOT_IMPLEMENTED, &API_PAYLOAD_TOO_LARGE,
    &API_UPSTREAM_FAILED, &API_MAINTENANCE,
];

/// Failure to resolve a catalog key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry is registered under this key.
    UnknownKey { key: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key } => write!(f, "No error catalog entry named '{}'", key),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Look up a catalog entry by its camelCase key.
///
/// # Errors
///
/// Returns `CatalogError::UnknownKey` when no entry matches. A missing key is
/// a programming error in the caller; it is reported, never papered over.
///
/// ```rust
/// use scalamed_errors::catalog;
///
/// let entry = catalog::lookup("rxCancelFailed").unwrap();
/// assert_eq!(entry.code(), 616_002);
/// assert!(catalog::lookup("noSuchKey").is_err());
/// ```
pub fn lookup(key: &str) -> Result<&'static ErrorConfig, CatalogError> {
    ALL.iter()
        .copied()
        .find(|entry| entry.key() == key)
        .ok_or_else(|| CatalogError::UnknownKey {
            key: key.to_owned(),
        })
}

/// Look up a catalog entry by its numeric code.
pub fn by_code(code: u32) -> Option<&'static ErrorConfig> {
    ALL.iter().copied().find(|entry| entry.code() == code)
}

/// Iterate over every catalog entry.
pub fn all() -> impl Iterator<Item = &'static ErrorConfig> {
    ALL.iter().copied()
}
