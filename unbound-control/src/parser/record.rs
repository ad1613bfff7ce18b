//! `key=value` statistics output.

use std::borrow::Cow;

use crate::{
    ControlError, Result,
    response::{Record, Value},
};

/// All keys starting with this are gathered into one nested map
const HISTOGRAM: &str = "histogram";

/// Appears both as a leaf and as the parent of `num.query.tls.resume`
const TLS_QUERY_COUNT: &str = "num.query.tls";

/// Parse dotted `key=value` lines into a nested [`Record`].
///
/// Blank lines are skipped. Values that parse as a finite number become
/// [`Value::Number`], anything else is kept as trimmed text. Keys starting
/// with `histogram` are collected under a single `histogram` map keyed by the
/// rest of the key, dots included.
///
/// # Errors
///
/// Returns [`ControlError::Parse`] if a line has no `=`, the key is empty,
/// or a key descends through a value that is already a leaf.
pub fn parse_record(raw: &str) -> Result<Record> {
    parse_with(raw, Cow::Borrowed)
}

/// Parse `stats`/`stats_noreset` output.
///
/// Same as [`parse_record`], except the `num.query.tls` counter is stored
/// as `num.query.tls.num` so it can sit next to `num.query.tls.resume`.
///
/// # Errors
///
/// See [`parse_record`].
pub fn parse_stats(raw: &str) -> Result<Record> {
    parse_with(raw, |key| {
        if key.ends_with(TLS_QUERY_COUNT) {
            Cow::Owned(format!("{key}.num"))
        } else {
            Cow::Borrowed(key)
        }
    })
}

fn parse_with<'a>(raw: &'a str, rename: impl Fn(&'a str) -> Cow<'a, str>) -> Result<Record> {
    let mut record = Record::new();

    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ControlError::parse(format!("Invalid key-value pair: {line}")))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ControlError::parse(format!("Invalid key-value pair: {line}")));
        }

        insert(&mut record, &rename(key), coerce(value.trim()))?;
    }

    Ok(record)
}

fn insert(record: &mut Record, key: &str, value: Value) -> Result<()> {
    if key.starts_with(HISTOGRAM) {
        let bucket = key.strip_prefix("histogram.").unwrap_or(key);
        descend(record, HISTOGRAM, key)?.insert(bucket.to_string(), value);
        return Ok(());
    }

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = record;
    for segment in parents.into_iter().flat_map(|parents| parents.split('.')) {
        current = descend(current, segment, key)?;
    }
    current.insert(leaf.to_string(), value);

    Ok(())
}

fn descend<'r>(map: &'r mut Record, segment: &str, key: &str) -> Result<&'r mut Record> {
    match map
        .entry(segment.to_string())
        .or_insert_with(|| Value::Map(Record::new()))
    {
        Value::Map(inner) => Ok(inner),
        _ => Err(ControlError::parse(format!(
            "Key {key} descends through the value at {segment}"
        ))),
    }
}

/// `"42"` and `"007"` become numbers; `"1.22.0"`, `"inf"` and `""` stay text.
fn coerce(value: &str) -> Value {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Value::Number(number),
        _ => Value::Text(value.to_string()),
    }
}

/// Flatten a [`Record`] back into dotted `(key, value)` pairs.
///
/// Only leaves are returned, in key order.
#[must_use]
pub fn flatten(record: &Record) -> Vec<(String, Value)> {
    let mut pairs = Vec::new();
    flatten_into(record, None, &mut pairs);
    pairs
}

fn flatten_into(record: &Record, prefix: Option<&str>, pairs: &mut Vec<(String, Value)>) {
    for (key, value) in record {
        let path = prefix.map_or_else(|| key.clone(), |prefix| format!("{prefix}.{key}"));
        match value {
            Value::Map(inner) => flatten_into(inner, Some(&path), pairs),
            leaf => pairs.push((path, leaf.clone())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::response::get_path;

    #[test]
    fn test_nested_number() {
        let record = parse_record("total.num.queries=42").unwrap();
        assert_eq!(
            get_path(&record, &["total", "num", "queries"]),
            Some(&Value::Number(42.0))
        );
    }

    #[test]
    fn test_version_is_not_coerced() {
        let record = parse_record("version=1.22.0").unwrap();
        assert_eq!(record.get("version"), Some(&Value::from("1.22.0")));
    }

    #[test]
    fn test_leading_zeros_are_numeric() {
        let record = parse_record("id=007").unwrap();
        assert_eq!(record.get("id"), Some(&Value::Number(7.0)));
    }

    #[test]
    fn test_coercion_boundary() {
        assert_eq!(coerce("0.000123"), Value::Number(0.000_123));
        assert_eq!(coerce("-3"), Value::Number(-3.0));
        assert_eq!(coerce("1e3"), Value::Number(1000.0));
        assert_eq!(coerce("inf"), Value::from("inf"));
        assert_eq!(coerce("NaN"), Value::from("NaN"));
        assert_eq!(coerce(""), Value::from(""));
        assert_eq!(coerce("12 seconds"), Value::from("12 seconds"));
    }

    #[test]
    fn test_histogram_bucket_key_is_kept_verbatim() {
        let raw = "histogram.000000.000000.to.000000.000001=12\n\
                   histogram.000000.000001.to.000000.000002=3\n";
        let record = parse_record(raw).unwrap();
        let histogram = record.get("histogram").and_then(Value::as_map).unwrap();

        assert_eq!(histogram.len(), 2);
        assert_eq!(
            histogram.get("000000.000000.to.000000.000001"),
            Some(&Value::Number(12.0))
        );
    }

    #[test]
    fn test_histogram_key_with_trailing_dot() {
        let record = parse_record("histogram.0.000000.to.0.000001.=12").unwrap();
        let histogram = record.get("histogram").and_then(Value::as_map).unwrap();
        assert_eq!(
            histogram.get("0.000000.to.0.000001."),
            Some(&Value::Number(12.0))
        );
    }

    #[test]
    fn test_blank_lines_and_whitespace() {
        let record = parse_record("\n  time.now = 1700000000.5 \n\n time.up=10\n").unwrap();
        assert_eq!(
            get_path(&record, &["time", "now"]),
            Some(&Value::Number(1_700_000_000.5))
        );
        assert_eq!(
            get_path(&record, &["time", "up"]),
            Some(&Value::Number(10.0))
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        let record = parse_record("key=a=b").unwrap();
        assert_eq!(record.get("key"), Some(&Value::from("a=b")));
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        let err = parse_record("total.num.queries=1\nnot a pair\n").unwrap_err();
        assert_eq!(
            err,
            ControlError::Parse("Invalid key-value pair: not a pair".to_string())
        );
    }

    #[test]
    fn test_empty_key_is_an_error() {
        assert!(matches!(
            parse_record(" =5"),
            Err(ControlError::Parse(_))
        ));
    }

    #[test]
    fn test_descending_through_a_leaf_is_an_error() {
        let err = parse_record("num.query.tls=1\nnum.query.tls.resume=0").unwrap_err();
        assert!(matches!(err, ControlError::Parse(_)));
    }

    #[test]
    fn test_stats_renames_tls_counter() {
        let raw = "total.num.queries=10\nnum.query.tls=4\nnum.query.tls.resume=1\n";
        let record = parse_stats(raw).unwrap();

        assert_eq!(
            get_path(&record, &["num", "query", "tls", "num"]),
            Some(&Value::Number(4.0))
        );
        assert_eq!(
            get_path(&record, &["num", "query", "tls", "resume"]),
            Some(&Value::Number(1.0))
        );
    }

    #[test]
    fn test_flatten_round_trip() {
        let raw = "thread0.num.queries=3\n\
                   thread0.num.cachehits=2\n\
                   total.num.queries=3\n\
                   total.requestlist.avg=0.5\n\
                   mem.cache.rrset=66176\n\
                   version=1.22.0\n\
                   histogram.000000.000000.to.000000.000001=0\n";
        let record = parse_record(raw).unwrap();

        let mut expected: Vec<(String, Value)> = raw
            .lines()
            .map(|line| {
                let (key, value) = line.split_once('=').unwrap();
                (key.to_string(), coerce(value))
            })
            .collect();
        expected.sort_by(|a, b| a.0.cmp(&b.0));

        let mut flattened = flatten(&record);
        flattened.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(flattened, expected);
    }
}
