//! # ScalaMed Errors
//!
//! The error taxonomy shared by ScalaMed services.
//!
//! ## Design Philosophy
//!
//! 1. **Every error has a kind** drawn from a closed taxonomy
//! 2. **Every error carries a reference code** a user can quote to support
//! 3. **Catalog errors are data**: stable code, HTTP status and message template
//! 4. **Debug info is opt-in** and never appears in `Display` output
//! 5. **Rendering is explicit**: options are passed in, never read from globals
//!
//! ## Error Shape
//!
//! An [`AppError`] is an [`ErrorVariant`] (the kind-specific fields), a
//! [`ReferenceCode`], an optional [`Detail`] payload and optional debug info.
//! The headline is computed from the variant on every call; nothing is cached.
//!
//! ## Quick Start
//!
//! ```rust
//! use scalamed_errors::{AppError, Result, catalog, template_values};
//!
//! fn cancel_prescription(id: &str, dispensed: bool) -> Result<()> {
//!     if dispensed {
//!         return Err(AppError::service(
//!             &catalog::RX_CANCEL_FAILED,
//!             template_values! { "details" => id.to_owned() },
//!         )
//!         .with_details("prescription already dispensed"));
//!     }
//!     Ok(())
//! }
//!
//! let err = cancel_prescription("RX-1001", true).unwrap_err();
//! assert_eq!(err.http_status(), 500);
//! assert_eq!(err.code(), Some(616_002));
//! assert!(err.to_string().ends_with(": prescription already dispensed"));
//! ```
//!
//! ## Nested Errors
//!
//! ```rust
//! use scalamed_errors::{AppError, ConnectionType};
//! use std::error::Error;
//!
//! let cause = AppError::connection(ConnectionType::Cache, "redis-1");
//! let err = AppError::operation("SessionStore", "refresh").with_details(cause);
//!
//! assert_eq!(
//!     err.to_string(),
//!     "SessionStore: refresh operation failed: cache connection to redis-1 failed"
//! );
//! assert!(err.source().is_some());
//! ```
//!
//! ## Debug Info
//!
//! ```rust
//! use scalamed_errors::{AppError, RenderOptions};
//!
//! let err = AppError::operation("Billing", "charge").with_debug_info("card=4111");
//!
//! assert!(!err.to_string().contains("4111"));
//! assert!(err.render(&RenderOptions::default().with_debug_info()).contains("4111"));
//! ```
//!
//! ## Feature Flags
//!
//! - `trusted_debug`: enables `RenderOptions::trusted()` in builds with debug
//!   assertions.

#![warn(clippy::all)]

use std::result;

pub mod catalog;
pub mod codes;
pub mod convenience;
pub mod detail;
pub mod error;
pub mod logging;
pub mod reference;
pub mod render;
pub mod taxonomy;
pub mod template;

pub use catalog::CatalogError;
pub use codes::*;
pub use detail::*;
pub use error::*;
pub use logging::*;
pub use reference::*;
pub use render::RenderOptions;
pub use taxonomy::*;
pub use template::*;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, AppError>;
