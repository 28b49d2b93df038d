//! Embedded libSQL backend for the `Database` trait.
//!
//! Stores UUIDs, timestamps, and decimal amounts as text; booleans as
//! integers; string lists and JSON payloads as serialized JSON text.
//! Migrations are idempotent DDL statements executed at startup.

mod billing;
mod calendar;
mod cases;
mod clients;
mod documents;
mod notifications;
mod tasks;
mod users;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::DatabaseError;

const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL,
        phone TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        client_type TEXT NOT NULL,
        national_id TEXT,
        commercial_registration TEXT,
        email TEXT,
        phone TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS cases (
        id TEXT PRIMARY KEY,
        case_number TEXT NOT NULL,
        title TEXT,
        case_type TEXT NOT NULL,
        court TEXT,
        stage TEXT NOT NULL,
        status TEXT NOT NULL,
        description TEXT,
        client_id TEXT NOT NULL,
        responsible_lawyer_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_cases_client ON cases (client_id)",
    "CREATE TABLE IF NOT EXISTS case_sessions (
        id TEXT PRIMARY KEY,
        case_id TEXT NOT NULL,
        session_date TEXT NOT NULL,
        location TEXT,
        result TEXT,
        notes TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_case_sessions_case ON case_sessions (case_id)",
    "CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY,
        client_id TEXT NOT NULL,
        case_id TEXT,
        status TEXT NOT NULL,
        billing_model TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        due_date TEXT,
        paid_at TEXT,
        description TEXT,
        hours TEXT,
        hourly_rate TEXT,
        percentage TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices (client_id)",
    "CREATE TABLE IF NOT EXISTS payments (
        id TEXT PRIMARY KEY,
        invoice_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        paid_at TEXT NOT NULL,
        method TEXT,
        reference TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_payments_invoice ON payments (invoice_id)",
    "CREATE TABLE IF NOT EXISTS calendar_events (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        event_type TEXT NOT NULL,
        start_at TEXT NOT NULL,
        end_at TEXT,
        is_all_day INTEGER NOT NULL DEFAULT 0,
        location TEXT,
        description TEXT,
        client_id TEXT,
        case_id TEXT,
        assigned_to_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_calendar_events_start ON calendar_events (start_at)",
    "CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL,
        priority TEXT NOT NULL,
        due_date TEXT,
        completed_at TEXT,
        assigned_to_id TEXT NOT NULL,
        created_by_id TEXT NOT NULL,
        case_id TEXT,
        client_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks (assigned_to_id)",
    "CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        doc_type TEXT NOT NULL,
        file_url TEXT NOT NULL,
        original_file_name TEXT,
        mime_type TEXT,
        description TEXT,
        text_content TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        client_id TEXT,
        case_id TEXT,
        uploaded_by_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        channel TEXT NOT NULL,
        notification_type TEXT NOT NULL,
        target_email TEXT,
        target_phone TEXT,
        target_whatsapp TEXT,
        user_id TEXT,
        client_id TEXT,
        case_id TEXT,
        payload TEXT,
        scheduled_at TEXT,
        sent_at TEXT,
        status TEXT NOT NULL,
        error_message TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
];

/// Embedded libSQL database backend.
pub struct LibSqlBackend {
    db: libsql::Database,
}

impl LibSqlBackend {
    /// Open (or create) a local database file. `:memory:` works for tests.
    pub async fn new_local(path: &str) -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(Self { db })
    }

    pub(crate) async fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db
            .connect()
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let conn = self.connect().await?;
        for statement in MIGRATIONS {
            conn.execute(statement, ())
                .await
                .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        }
        tracing::debug!(statements = MIGRATIONS.len(), "database migrations applied");
        Ok(())
    }
}

// ==================== Row/param helpers ====================

pub(crate) fn get_text(row: &libsql::Row, idx: i32) -> String {
    row.get::<String>(idx).unwrap_or_default()
}

pub(crate) fn get_opt_text(row: &libsql::Row, idx: i32) -> Option<String> {
    row.get::<Option<String>>(idx).ok().flatten()
}

pub(crate) fn get_i64(row: &libsql::Row, idx: i32) -> i64 {
    row.get::<i64>(idx).unwrap_or_default()
}

/// Bindable value for an optional text column.
pub(crate) fn opt_text(value: Option<&str>) -> libsql::Value {
    match value {
        Some(text) => libsql::Value::Text(text.to_string()),
        None => libsql::Value::Null,
    }
}

pub(crate) fn opt_text_owned(value: Option<String>) -> libsql::Value {
    match value {
        Some(text) => libsql::Value::Text(text),
        None => libsql::Value::Null,
    }
}

pub(crate) fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn now_ts() -> String {
    fmt_ts(&Utc::now())
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    // datetime('now') and friends produce this shape.
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Serialization(format!("invalid timestamp '{raw}': {e}")))
}

pub(crate) fn parse_dt_opt(
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match raw {
        Some(value) => parse_timestamp(&value).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<uuid::Uuid, DatabaseError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| DatabaseError::Serialization(format!("invalid {field} uuid: {e}")))
}

pub(crate) fn parse_uuid_opt(
    raw: Option<String>,
    field: &str,
) -> Result<Option<uuid::Uuid>, DatabaseError> {
    raw.map(|value| parse_uuid(&value, field)).transpose()
}

pub(crate) fn fmt_decimal(value: &Decimal) -> String {
    value.to_string()
}

pub(crate) fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, DatabaseError> {
    raw.parse()
        .map_err(|_| DatabaseError::Serialization(format!("invalid {field} amount '{raw}'")))
}

pub(crate) fn parse_decimal_opt(
    raw: Option<String>,
    field: &str,
) -> Result<Option<Decimal>, DatabaseError> {
    raw.map(|value| parse_decimal(&value, field)).transpose()
}

pub(crate) fn fmt_string_list(values: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(values).map_err(|e| DatabaseError::Serialization(e.to_string()))
}

pub(crate) fn parse_string_list(raw: &str) -> Result<Vec<String>, DatabaseError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| DatabaseError::Serialization(e.to_string()))?;
    Ok(parsed
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default())
}

pub(crate) fn parse_json_opt(
    raw: Option<String>,
) -> Result<Option<serde_json::Value>, DatabaseError> {
    match raw {
        Some(value) if !value.trim().is_empty() => serde_json::from_str(&value)
            .map(Some)
            .map_err(|e| DatabaseError::Serialization(e.to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{fmt_ts, parse_string_list, parse_timestamp};

    #[test]
    fn timestamps_round_trip() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 10, 30, 0).unwrap();
        let parsed = parse_timestamp(&fmt_ts(&ts)).expect("round trip");
        assert_eq!(parsed, ts);
    }

    #[test]
    fn sqlite_datetime_format_is_accepted() {
        let parsed = parse_timestamp("2026-03-02 10:30:00").expect("sqlite format");
        assert_eq!(parsed.to_rfc3339(), "2026-03-02T10:30:00+00:00");
    }

    #[test]
    fn string_lists_tolerate_empty_and_junk() {
        assert!(parse_string_list("").unwrap().is_empty());
        assert_eq!(
            parse_string_list(r#"["a","b"]"#).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_string_list("{}").unwrap().is_empty());
    }
}
