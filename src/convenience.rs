//! Declarative helpers for catalog entries and template values.
//!
//! # Usage
//!
//! ```rust
//! use scalamed_errors::{catalog, template_values, ServiceFailure};
//!
//! let failure = ServiceFailure::new(
//!     &catalog::OPERATION_FAILED,
//!     template_values! { "operation" => "sync" },
//! );
//! assert_eq!(failure.message().as_str(), "Unable to perform sync operation");
//! ```

/// Define a single catalog entry as a `pub const`.
///
/// # Example
///
/// ```rust
/// # use scalamed_errors::{define_error_config, namespaces};
/// define_error_config!(
///     RECORD_ARCHIVED,
///     &namespaces::GENERIC,
///     "recordArchived",
///     600_500,
///     410,
///     "{context} record has been archived"
/// );
/// assert_eq!(RECORD_ARCHIVED.http_status(), 410);
/// ```
#[macro_export]
macro_rules! define_error_config {
    ($name:ident, $namespace:expr, $key:expr, $code:expr, $status:expr, $message:expr) => {
        pub const $name: $crate::ErrorConfig =
            $crate::ErrorConfig::const_new($key, $namespace, $code, $status, $message);
    };
}

/// Define multiple catalog entries within the same namespace.
///
/// # Example
///
/// ```rust
/// # use scalamed_errors::{define_error_configs, namespaces};
/// define_error_configs! {
///     &namespaces::RX => {
///         RX_ON_HOLD = ("rxOnHold", 616_800, 409, "Prescription is on hold"),
///         RX_RECALLED = ("rxRecalled", 616_801, 410, "Medication {details} was recalled"),
///     }
/// }
/// assert_eq!(RX_RECALLED.code(), 616_801);
/// ```
#[macro_export]
macro_rules! define_error_configs {
    ($namespace:expr => { $( $name:ident = ($key:expr, $code:expr, $status:expr, $message:expr) ),+ $(,)? }) => {
        $(
            $crate::define_error_config!($name, $namespace, $key, $code, $status, $message);
        )+
    };
}

/// Build a [`TemplateValues`](crate::TemplateValues) map.
///
/// Values go through `TemplateValue::from`, so string slices, `String`s,
/// integers, booleans, `serde_json::Value`s and `TemplateValue::lazy(..)` all
/// work. Keys keep their declaration order.
///
/// ```rust
/// # use scalamed_errors::{template_values, TemplateValue, format_template};
/// let values = template_values! {
///     "context" => "Patient",
///     "details" => TemplateValue::lazy(|| "id 42".to_string()),
/// };
/// assert_eq!(
///     format_template("{context} {details}", &values).as_str(),
///     "Patient id 42"
/// );
/// ```
#[macro_export]
macro_rules! template_values {
    () => {
        $crate::TemplateValues::new()
    };
    ($( $key:expr => $value:expr ),+ $(,)?) => {{
        let mut values = $crate::TemplateValues::new();
        $(
            values.insert($key, $value);
        )+
        values
    }};
}

#[cfg(test)]
mod tests {
    use crate::{namespaces, ErrorCategory, TemplateValue};

    #[test]
    fn single_definition() {
        define_error_config!(
            SAMPLE,
            &namespaces::USER,
            "sample",
            623_700,
            400,
            "Sample {details}"
        );
        assert_eq!(SAMPLE.key(), "sample");
        assert_eq!(SAMPLE.category(), ErrorCategory::User);
    }

    #[test]
    fn empty_values_macro() {
        let values = template_values! {};
        assert!(values.is_empty());
    }

    #[test]
    fn values_macro_keeps_order_and_types() {
        let values = template_values! {
            "operation" => "create",
            "count" => 3,
            "lazy" => TemplateValue::lazy(|| "x".into()),
        };
        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, ["operation", "count", "lazy"]);
        assert!(matches!(values.get("count"), Some(TemplateValue::Scalar(s)) if s == "3"));
    }
}
