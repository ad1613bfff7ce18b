use crate::{ControlError, Result, response::ResponseData};

/// Interpret the acknowledgement to `verbosity <level>`.
///
/// # Errors
///
/// Returns [`ControlError::Parse`] if the reply is empty, the daemon rejected
/// the level, or the first line is anything other than `ok`.
pub fn parse_verbosity(raw: &str, level: u8) -> Result<ResponseData> {
    let Some(first) = raw.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Err(ControlError::parse("No response received."));
    };

    if first.starts_with("error") {
        return Err(ControlError::parse(format!(
            "Invalid verbosity level: {level}"
        )));
    }

    if first == "ok" {
        return Ok(ResponseData::Ok);
    }

    Err(ControlError::parse(format!("Invalid response: {first}")))
}
