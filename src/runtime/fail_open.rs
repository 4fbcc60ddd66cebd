//! Continue-on-error policy for decorative operations
//!
//! Asset loads, tone emission and visual mutations never abort the intro.
//! Their results pass through [`fail_open`], which logs a warning for the
//! category and hands back what succeeded.

use super::debug::DebugCategory;
use std::fmt::Display;

/// Log `result`'s error (if any) under `category` and continue
pub fn fail_open<T, E: Display>(
    category: DebugCategory,
    what: &str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!(target: category.target(), "{what} failed, continuing: {err}");
            None
        }
    }
}

/// Like [`fail_open`] but also reports the error text, for callers that
/// record failures on a timeline
pub fn fail_open_reported<T, E: Display>(
    category: DebugCategory,
    what: &str,
    result: Result<T, E>,
) -> Result<T, String> {
    result.map_err(|err| {
        log::warn!(target: category.target(), "{what} failed, continuing: {err}");
        err.to_string()
    })
}
