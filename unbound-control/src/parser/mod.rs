//! Parsers turning raw control replies into [`ResponseData`](crate::response::ResponseData).
//!
//! All parsers are pure functions over the complete reply text.

mod record;
mod status;
mod verbosity;

pub use record::{flatten, parse_record, parse_stats};
pub use status::parse_status;
pub use verbosity::parse_verbosity;

use crate::{ControlError, Result, response::ResponseData};

/// How the daemon reports a command it does not implement
const UNKNOWN_COMMAND: &str = "error unknown command '";

/// Non-blank lines of `raw`, trimmed.
#[must_use]
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// [`ResponseData::Ok`] if the daemon answered `ok`, otherwise opaque text.
///
/// Error replies such as `error no such zone` are not failures here; the
/// caller gets them back verbatim in the raw text.
#[must_use]
pub fn parse_acknowledgement(raw: &str) -> ResponseData {
    match raw.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some("ok") => ResponseData::Ok,
        _ => ResponseData::Text,
    }
}

/// Fail if the reply contains `error unknown command '<name>'`.
///
/// Older daemons do not implement every command; this lets callers tell that
/// apart from a command that ran and failed.
///
/// # Errors
///
/// Returns [`ControlError::UnsupportedCommand`] naming the rejected command.
pub fn check_supported(raw: &str) -> Result<()> {
    let Some((_, rest)) = raw.split_once(UNKNOWN_COMMAND) else {
        return Ok(());
    };

    let name = rest.split('\'').next().unwrap_or(rest);
    Err(ControlError::UnsupportedCommand(format!(
        "Unknown command: {name}"
    )))
}
