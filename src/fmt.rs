//! Debug formatting helpers for [`custom_debug_derive`].

use std::fmt;

/// Formats a secret as `"***"`, or `""` when it is empty so a missing value stays visible.
///
/// Use with `#[debug(with = "crate::fmt::redacted")]` on credential fields.
#[allow(clippy::ptr_arg)]
pub fn redacted(value: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_empty() {
        f.write_str("\"\"")
    } else {
        f.write_str("\"***\"")
    }
}
