use std::str::FromStr;

use crate::{ControlError, Result, response::Status};

/// Prefix of the line reporting the daemon's pid and run state
const DAEMON_NAME: &str = "unbound";

/// Parse the reply to `status`.
///
/// Lines are split at the first `:`. Unknown keys are ignored.
///
/// ```text
/// version: 1.22.0
/// verbosity: 1
/// threads: 2
/// modules: 2 [ validator iterator ]
/// uptime: 3600 seconds
/// options: control(ssl)
/// unbound (pid 1234) is running...
/// ```
///
/// # Errors
///
/// Returns [`ControlError::Parse`] if `verbosity`, `threads` or `uptime`
/// does not start with an integer.
pub fn parse_status(raw: &str) -> Result<Status> {
    let mut status = Status::default();

    for line in raw.lines() {
        let (key, value) = line
            .split_once(':')
            .map_or((line.trim(), ""), |(key, value)| (key.trim(), value.trim()));

        match key {
            "version" => status.version = Some(value.to_string()),
            "verbosity" => status.verbosity = Some(leading_integer(key, value)?),
            "threads" => status.threads = Some(leading_integer(key, value)?),
            "uptime" => status.uptime = Some(leading_integer(key, value)?),
            "modules" => status.modules = Some(bracketed(value)),
            "options" => {
                status.options = Some(
                    value
                        .replace(['[', ']'], " ")
                        .split_whitespace()
                        .map(str::to_string)
                        .collect(),
                );
            }
            _ if key.starts_with(DAEMON_NAME) => {
                if let Some((pid, state)) = run_state(key) {
                    status.pid = Some(pid);
                    status.status = Some(state.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(status)
}

/// Digits at the start of `value`, so `3600 seconds` reads as `3600`
fn leading_integer<T: FromStr>(key: &str, value: &str) -> Result<T> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..end]
        .parse()
        .map_err(|_| ControlError::parse(format!("Invalid {key} value: {value:?}")))
}

/// Whitespace separated words between the first `[` and the next `]`
fn bracketed(value: &str) -> Vec<String> {
    value
        .split_once('[')
        .and_then(|(_, rest)| rest.split_once(']'))
        .map(|(inner, _)| inner.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// `unbound (pid 1234) is running...` yields `(1234, "running")`
fn run_state(line: &str) -> Option<(u32, &str)> {
    let (_, rest) = line.split_once("(pid ")?;
    let (pid, rest) = rest.split_once(')')?;
    let state = rest.strip_prefix(" is ")?;
    let state = &state[..state.rfind("...")?];
    Some((pid.parse().ok()?, state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_status() {
        let raw = "version: 1.22.0\n\
                   verbosity: 1\n\
                   threads: 2\n\
                   modules: [iterator validator]\n\
                   uptime: 3600 seconds\n\
                   options: [a b c]\n\
                   unbound (pid 1234) is running...\n";

        let status = parse_status(raw).unwrap();

        assert_eq!(
            status,
            Status {
                version: Some("1.22.0".to_string()),
                verbosity: Some(1),
                threads: Some(2),
                modules: Some(vec!["iterator".to_string(), "validator".to_string()]),
                uptime: Some(3600),
                options: Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
                pid: Some(1234),
                status: Some("running".to_string()),
            }
        );
    }

    #[test]
    fn test_module_count_before_brackets() {
        let status = parse_status("modules: 3 [ subnetcache validator iterator ]").unwrap();
        assert_eq!(
            status.modules,
            Some(vec![
                "subnetcache".to_string(),
                "validator".to_string(),
                "iterator".to_string()
            ])
        );
    }

    #[test]
    fn test_modules_without_brackets_are_empty() {
        let status = parse_status("modules: 2").unwrap();
        assert_eq!(status.modules, Some(Vec::new()));
    }

    #[test]
    fn test_options() {
        let status = parse_status("options: reuseport control(ssl)").unwrap();
        assert_eq!(
            status.options,
            Some(vec!["reuseport".to_string(), "control(ssl)".to_string()])
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let status = parse_status("something: else\n\nversion: 1.19.0\n").unwrap();
        assert_eq!(status.version.as_deref(), Some("1.19.0"));
        assert_eq!(status.verbosity, None);
    }

    #[test]
    fn test_invalid_integer_is_parse_error() {
        assert!(matches!(
            parse_status("threads: many"),
            Err(ControlError::Parse(_))
        ));
        assert!(matches!(
            parse_status("uptime: "),
            Err(ControlError::Parse(_))
        ));
    }

    #[test]
    fn test_run_state() {
        assert_eq!(run_state("unbound (pid 42) is running..."), Some((42, "running")));
        assert_eq!(
            run_state("unbound (pid 42) is stopping... now..."),
            Some((42, "stopping... now"))
        );
        assert_eq!(run_state("unbound is running"), None);
        assert_eq!(run_state("unbound (pid x) is running..."), None);
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(parse_status("").unwrap(), Status::default());
    }
}
