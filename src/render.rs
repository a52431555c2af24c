//! Rendering configuration and the headline/details/debug composition.
//!
//! There is no ambient rendering state. Every rendering call receives a
//! `RenderOptions` value; `Display` on an error uses the default options,
//! which never include debug info.
//!
//! # Output Layout
//!
//! ```text
//! <headline>: <details> [debug: <debug info>]
//! ```
//!
//! A section that renders empty contributes nothing, separator included. When
//! all three are empty the error's type name is used instead.

use crate::Detail;
use std::fmt;

/// ANSI sequence used for the details section.
pub const DETAILS_COLOR: &str = "\x1b[33m";

/// ANSI sequence used for the debug section.
pub const DEBUG_COLOR: &str = "\x1b[90m";

/// ANSI reset.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Switches controlling how an error is rendered.
///
/// # Defaults
///
/// - details: included
/// - debug info: excluded
/// - colors: off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    pub include_details: bool,
    pub include_debug_info: bool,
    pub colorize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_details: true,
            include_debug_info: false,
            colorize: false,
        }
    }
}

impl RenderOptions {
    /// Headline only.
    pub const fn headline_only() -> Self {
        Self {
            include_details: false,
            include_debug_info: false,
            colorize: false,
        }
    }

    /// Options for trusted local debugging: details and debug info included.
    ///
    /// Only available with the `trusted_debug` feature in builds with debug
    /// assertions, so release binaries cannot opt into debug output this way.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub const fn trusted() -> Self {
        Self {
            include_details: true,
            include_debug_info: true,
            colorize: false,
        }
    }

    #[inline]
    pub const fn with_debug_info(mut self) -> Self {
        self.include_debug_info = true;
        self
    }

    #[inline]
    pub const fn with_colors(mut self) -> Self {
        self.colorize = true;
        self
    }

    #[inline]
    pub const fn without_details(mut self) -> Self {
        self.include_details = false;
        self
    }
}

/// Forwards writes to `inner`, emitting the section opening (prefix and
/// color) just before the first non-empty write.
struct SectionWriter<'w> {
    inner: &'w mut dyn fmt::Write,
    prefix: &'w str,
    color: Option<&'w str>,
    started: bool,
}

impl fmt::Write for SectionWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        if !self.started {
            self.started = true;
            self.inner.write_str(self.prefix)?;
            if let Some(color) = self.color {
                self.inner.write_str(color)?;
            }
        }
        self.inner.write_str(s)
    }
}

/// Write one optional section straight into `f`, colored when enabled.
///
/// Returns whether anything was written.
fn write_section(
    f: &mut dyn fmt::Write,
    detail: &Detail,
    options: &RenderOptions,
    color: &str,
    prefix: &str,
    suffix: &str,
) -> Result<bool, fmt::Error> {
    let mut section = SectionWriter {
        inner: &mut *f,
        prefix,
        color: options.colorize.then_some(color),
        started: false,
    };
    detail.write_dyn(&mut section, options)?;
    let started = section.started;

    if started {
        if options.colorize {
            f.write_str(COLOR_RESET)?;
        }
        f.write_str(suffix)?;
    }
    Ok(started)
}

/// Compose the final rendering of an error.
pub(crate) fn compose(
    f: &mut dyn fmt::Write,
    type_name: &str,
    headline: &str,
    details: Option<&Detail>,
    debug_info: Option<&Detail>,
    options: &RenderOptions,
) -> fmt::Result {
    f.write_str(headline)?;
    let mut wrote_any = !headline.is_empty();

    if options.include_details {
        if let Some(details) = details {
            let prefix = if wrote_any { ": " } else { "" };
            wrote_any |= write_section(f, details, options, DETAILS_COLOR, prefix, "")?;
        }
    }

    if options.include_debug_info {
        if let Some(debug) = debug_info {
            let prefix = if wrote_any { " [debug: " } else { "[debug: " };
            wrote_any |= write_section(f, debug, options, DEBUG_COLOR, prefix, "]")?;
        }
    }

    if !wrote_any {
        f.write_str(type_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose_string(
        headline: &str,
        details: Option<&Detail>,
        debug: Option<&Detail>,
        options: &RenderOptions,
    ) -> String {
        let mut out = String::new();
        compose(&mut out, "TypeName", headline, details, debug, options).unwrap();
        out
    }

    #[test]
    fn headline_alone() {
        let out = compose_string("Failed", None, None, &RenderOptions::default());
        assert_eq!(out, "Failed");
    }

    #[test]
    fn details_follow_headline() {
        let details = Detail::from("cause");
        let out = compose_string("Failed", Some(&details), None, &RenderOptions::default());
        assert_eq!(out, "Failed: cause");
    }

    #[test]
    fn debug_info_needs_opt_in() {
        let debug = Detail::from("query=SELECT 1");
        let off = compose_string("Failed", None, Some(&debug), &RenderOptions::default());
        let on = compose_string(
            "Failed",
            None,
            Some(&debug),
            &RenderOptions::default().with_debug_info(),
        );
        assert_eq!(off, "Failed");
        assert_eq!(on, "Failed [debug: query=SELECT 1]");
    }

    #[test]
    fn colors_wrap_sections() {
        let details = Detail::from("cause");
        let out = compose_string(
            "Failed",
            Some(&details),
            None,
            &RenderOptions::default().with_colors(),
        );
        assert_eq!(out, format!("Failed: {}cause{}", DETAILS_COLOR, COLOR_RESET));
    }

    #[test]
    fn empty_everything_falls_back_to_type_name() {
        let empty = Detail::Empty;
        let out = compose_string("", Some(&empty), None, &RenderOptions::default());
        assert_eq!(out, "TypeName");
    }

    #[test]
    fn empty_sequence_elements_do_not_open_a_section() {
        let details = Detail::Sequence(vec![Detail::Empty]);
        let out = compose_string(
            "Failed",
            Some(&details),
            None,
            &RenderOptions::default().with_colors(),
        );
        assert_eq!(out, "Failed");
    }

    #[test]
    fn nested_sections_write_in_place() {
        let inner = crate::AppError::operation("Cache", "evict")
            .with_details("miss")
            .with_debug_info("key=session:42");
        let details = Detail::from(vec![Detail::from("first"), Detail::from(inner)]);
        let out = compose_string(
            "Failed",
            Some(&details),
            None,
            &RenderOptions::default().with_debug_info(),
        );
        assert_eq!(
            out,
            "Failed: first & Cache: evict operation failed: miss [debug: key=session:42]"
        );
    }

    #[test]
    fn headline_only_suppresses_details() {
        let details = Detail::from("cause");
        let out = compose_string("Failed", Some(&details), None, &RenderOptions::headline_only());
        assert_eq!(out, "Failed");
    }

    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    #[test]
    fn trusted_includes_debug() {
        assert!(RenderOptions::trusted().include_debug_info);
    }
}
