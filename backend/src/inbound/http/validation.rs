//! Shared validation helpers for inbound HTTP adapters.
//!
//! Date fields travel as `YYYY-MM-DD` strings and time-of-day fields as
//! `HH:MM` (seconds tolerated). Parsing happens at the boundary so the domain
//! only sees typed values.

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;

use crate::domain::itinerary::BlockType;
use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidDate,
    InvalidTime,
    InvalidBlockType,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidBlockType => "invalid_block_type",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(
    field: FieldName,
    message: impl Into<String>,
    code: ErrorCode,
    value: Option<&str>,
) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let (Some(object), Some(value)) = (details.as_object_mut(), value) {
        object.insert("value".into(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Require a field that the DTO models as `Option`.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a YYYY-MM-DD date"),
            ErrorCode::InvalidDate,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(raw, field)).transpose()
}

pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                format!("{name} must be an HH:MM time"),
                ErrorCode::InvalidTime,
                Some(value),
            )
        })
}

pub(crate) fn parse_optional_time(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveTime>, Error> {
    value.map(|raw| parse_time(raw, field)).transpose()
}

pub(crate) fn parse_block_type(value: &str, field: FieldName) -> Result<BlockType, Error> {
    value.parse::<BlockType>().map_err(|()| {
        field_error(
            field,
            "invalid block type",
            ErrorCode::InvalidBlockType,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_block_type(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<BlockType>, Error> {
    value.map(|raw| parse_block_type(raw, field)).transpose()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const FIELD: FieldName = FieldName::new("startDate");

    #[test]
    fn parses_iso_dates() {
        let date = parse_date("2026-03-01", FIELD).expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"));
    }

    #[rstest]
    #[case("01-03-2026")]
    #[case("2026/03/01")]
    #[case("2026-13-01")]
    #[case("not a date")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        let error = parse_date(raw, FIELD).expect_err("must reject");
        assert_eq!(
            error
                .details()
                .and_then(|d| d.get("code"))
                .and_then(|c| c.as_str()),
            Some("invalid_date")
        );
    }

    #[rstest]
    #[case("09:30")]
    #[case("09:30:00")]
    fn parses_times_with_and_without_seconds(#[case] raw: &str) {
        let time = parse_time(raw, FieldName::new("startTime")).expect("valid time");
        assert_eq!(time, NaiveTime::from_hms_opt(9, 30, 0).expect("time"));
    }

    #[test]
    fn rejects_out_of_range_time() {
        assert!(parse_time("25:00", FieldName::new("startTime")).is_err());
    }

    #[test]
    fn parses_known_block_types() {
        let parsed = parse_block_type("SLEEP", FieldName::new("blockType")).expect("known type");
        assert_eq!(parsed, BlockType::Sleep);
    }

    #[test]
    fn unknown_block_type_reports_value() {
        let error =
            parse_block_type("COMMUTE", FieldName::new("blockType")).expect_err("must reject");
        assert_eq!(error.message(), "invalid block type");
        assert_eq!(
            error
                .details()
                .and_then(|d| d.get("value"))
                .and_then(|v| v.as_str()),
            Some("COMMUTE")
        );
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let error = require::<String>(None, FIELD).expect_err("must reject");
        assert_eq!(error.message(), "missing required field: startDate");
    }
}
