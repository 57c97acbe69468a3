use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a `YYYY-MM-DD` work date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use sf_core::enums::{EntityType, ReportStatus};

    use super::{parse_date, parse_enum};

    #[test]
    fn parses_snake_case_enum() {
        let status: ReportStatus = parse_enum("pending_approval", "status").expect("status should parse");
        assert_eq!(status, ReportStatus::PendingApproval);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let entity: EntityType = parse_enum("daily-report", "entity type").expect("should parse");
        assert_eq!(entity, EntityType::DailyReport);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<ReportStatus>("approved", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'approved'"));
    }

    #[test]
    fn parses_iso_date() {
        let date = parse_date("2026-03-14", "date").expect("date should parse");
        assert_eq!(date.to_string(), "2026-03-14");
        assert!(parse_date("14/03/2026", "date").is_err());
    }
}
