//! Utility functions and helpers

use chrono::{DateTime, NaiveDate, Utc};

use crate::shared::errors::ValidationError;
use crate::shared::types::DateRange;

/// Solscan link for a transaction
pub fn explorer_url(signature: &str) -> String {
    format!("https://solscan.io/tx/{}", signature)
}

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(at) = date.and_hms_opt(0, 0, 0) {
            return Ok(at.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(input)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Build a range from optional CLI bounds
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, ValidationError> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ValidationError::MissingDateBound),
    };
    DateRange::new(parse_date(start)?, parse_date(end)?)
}
