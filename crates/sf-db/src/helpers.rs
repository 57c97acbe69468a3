//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a `YYYY-MM-DD` TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all sf-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// Use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Pull the next row, lifting the libSQL error into `DatabaseError`.
///
/// # Errors
///
/// Returns `DatabaseError::LibSql` if stepping the cursor fails.
pub async fn next_row(rows: &mut libsql::Rows) -> Result<Option<libsql::Row>, DatabaseError> {
    Ok(rows.next().await?)
}

/// Reject anything that is not a bare SQL identifier.
///
/// Collection and column names are interpolated into SQL text, so they must
/// be plain `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` naming the bad identifier.
pub fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(DatabaseError::InvalidState(format!(
            "'{name}' is not a valid identifier"
        )))
    }
}

/// Convert a JSON scalar into a libSQL bind value.
///
/// Booleans become 0/1; arrays and objects are stored as JSON text.
#[must_use]
pub fn json_to_value(value: &serde_json::Value) -> libsql::Value {
    use serde_json::Value;
    match value {
        Value::Null => libsql::Value::Null,
        Value::Bool(b) => libsql::Value::Integer(i64::from(*b)),
        Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().map_or(libsql::Value::Null, libsql::Value::Real),
            libsql::Value::Integer,
        ),
        Value::String(s) => libsql::Value::Text(s.clone()),
        other => libsql::Value::Text(other.to_string()),
    }
}

/// Bind an optional string, mapping `None` to SQL NULL.
#[must_use]
pub fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |s| libsql::Value::Text(s.to_string()))
}

/// Serialize a value into a JSON `Value`, mapping serde failures to `DatabaseError`.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::enums::ReportStatus;

    #[test]
    fn parse_datetime_both_formats() {
        let a = parse_datetime("2026-03-02T08:15:00+00:00").unwrap();
        let b = parse_datetime("2026-03-02 08:15:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn parse_optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        let d = parse_date("2026-03-02").unwrap();
        assert_eq!(d.to_string(), "2026-03-02");
        assert!(parse_date("02/03/2026").is_err());
    }

    #[test]
    fn parse_enum_status() {
        let s: ReportStatus = parse_enum("approved_by_manager").unwrap();
        assert_eq!(s, ReportStatus::ApprovedByManager);
        assert!(parse_enum::<ReportStatus>("approved").is_err());
    }

    #[test]
    fn identifier_validation() {
        validate_identifier("site_workers").unwrap();
        validate_identifier("_tmp2").unwrap();
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("sites; DROP TABLE sites").is_err());
        assert!(validate_identifier("a-b").is_err());
    }

    #[test]
    fn json_values_bind_as_expected() {
        assert_eq!(json_to_value(&serde_json::json!(null)), libsql::Value::Null);
        assert_eq!(json_to_value(&serde_json::json!(true)), libsql::Value::Integer(1));
        assert_eq!(json_to_value(&serde_json::json!(42)), libsql::Value::Integer(42));
        assert_eq!(json_to_value(&serde_json::json!(1.5)), libsql::Value::Real(1.5));
        assert_eq!(
            json_to_value(&serde_json::json!("x")),
            libsql::Value::Text("x".into())
        );
        assert_eq!(
            json_to_value(&serde_json::json!({"a": 1})),
            libsql::Value::Text(r#"{"a":1}"#.into())
        );
    }
}
