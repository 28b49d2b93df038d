//! Route handlers, one module per resource.
//!
//! Request payloads arrive with ids, enums, timestamps, and amounts as
//! strings; the helpers here parse them while accumulating every problem
//! into one message list for a single 400 response.

pub mod assistant;
pub mod auth;
pub mod billing;
pub mod calendar;
pub mod cases;
pub mod clients;
pub mod documents;
pub mod notifications;
pub mod reports;
pub mod tasks;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::web::types::{ApiError, bad_request};

/// Parse a path id, rejecting with a 400 when malformed.
pub(crate) fn parse_path_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| bad_request(vec![format!("Invalid {what} id")]))
}

pub(crate) fn field_uuid(raw: &str, field: &str, errors: &mut Vec<String>) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(format!("{field} must be a UUID"));
            None
        }
    }
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn field_datetime(
    raw: &str,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    errors.push(format!("{field} must be an ISO 8601 date string"));
    None
}

pub(crate) fn field_decimal(raw: &str, field: &str, errors: &mut Vec<String>) -> Option<Decimal> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(format!("{field} must be a decimal number"));
            None
        }
    }
}

pub(crate) fn field_enum<T>(
    raw: &str,
    field: &str,
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match parse(raw.trim()) {
        Some(value) => Some(value),
        None => {
            errors.push(format!("{field} has an unknown value '{}'", raw.trim()));
            None
        }
    }
}

pub(crate) fn require_non_empty(raw: &str, field: &str, errors: &mut Vec<String>) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(format!("{field} must not be empty"));
    }
    trimmed.to_string()
}

/// Good-enough shape check; real deliverability is out of scope.
pub(crate) fn valid_email(raw: &str) -> bool {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

pub(crate) fn finish_validation(errors: Vec<String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(bad_request(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::{field_datetime, field_decimal, valid_email};

    #[test]
    fn datetime_accepts_rfc3339_and_bare_dates() {
        let mut errors = Vec::new();
        let full = field_datetime("2026-08-01T10:30:00Z", "start_at", &mut errors).unwrap();
        assert_eq!(full.to_rfc3339(), "2026-08-01T10:30:00+00:00");
        let bare = field_datetime("2026-08-01", "date", &mut errors).unwrap();
        assert_eq!(bare.to_rfc3339(), "2026-08-01T00:00:00+00:00");
        assert!(errors.is_empty());

        field_datetime("yesterday", "date", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn decimal_rejects_non_numbers() {
        let mut errors = Vec::new();
        assert!(field_decimal("1000.50", "amount", &mut errors).is_some());
        assert!(field_decimal("1,000", "amount", &mut errors).is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn email_shape_check() {
        assert!(valid_email("lawyer@firm.example"));
        assert!(!valid_email("lawyer"));
        assert!(!valid_email("lawyer@nodot"));
        assert!(!valid_email("@firm.example"));
    }
}
