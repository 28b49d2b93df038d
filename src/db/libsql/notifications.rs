use chrono::{DateTime, Utc};
use libsql::params;
use uuid::Uuid;

use crate::db::{
    CreateNotificationParams, NotificationChannel, NotificationRecord, NotificationStatus,
    NotificationStore, UpcomingSessionRecord,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_ts, get_opt_text, get_text, now_ts, opt_text, opt_text_owned,
    parse_dt_opt, parse_json_opt, parse_timestamp, parse_uuid, parse_uuid_opt,
};

const NOTIFICATION_COLUMNS: &str = "id, channel, notification_type, target_email, target_phone, \
     target_whatsapp, user_id, client_id, case_id, payload, scheduled_at, sent_at, status, \
     error_message, created_at, updated_at";

fn parse_channel(raw: &str) -> Result<NotificationChannel, DatabaseError> {
    NotificationChannel::from_db_value(raw).ok_or_else(|| {
        DatabaseError::Serialization(format!("invalid notification channel '{raw}'"))
    })
}

fn parse_status(raw: &str) -> Result<NotificationStatus, DatabaseError> {
    NotificationStatus::from_db_value(raw).ok_or_else(|| {
        DatabaseError::Serialization(format!("invalid notification status '{raw}'"))
    })
}

fn row_to_notification_record(row: &libsql::Row) -> Result<NotificationRecord, DatabaseError> {
    let channel_raw = get_text(row, 1);
    let status_raw = get_text(row, 12);
    Ok(NotificationRecord {
        id: parse_uuid(&get_text(row, 0), "notifications.id")?,
        channel: parse_channel(&channel_raw)?,
        notification_type: get_text(row, 2),
        target_email: get_opt_text(row, 3),
        target_phone: get_opt_text(row, 4),
        target_whatsapp: get_opt_text(row, 5),
        user_id: parse_uuid_opt(get_opt_text(row, 6), "notifications.user_id")?,
        client_id: parse_uuid_opt(get_opt_text(row, 7), "notifications.client_id")?,
        case_id: parse_uuid_opt(get_opt_text(row, 8), "notifications.case_id")?,
        payload: parse_json_opt(get_opt_text(row, 9))?,
        scheduled_at: parse_dt_opt(get_opt_text(row, 10))?,
        sent_at: parse_dt_opt(get_opt_text(row, 11))?,
        status: parse_status(&status_raw)?,
        error_message: get_opt_text(row, 13),
        created_at: parse_timestamp(&get_text(row, 14))?,
        updated_at: parse_timestamp(&get_text(row, 15))?,
    })
}

#[async_trait::async_trait]
impl NotificationStore for LibSqlBackend {
    async fn create_notification(
        &self,
        input: &CreateNotificationParams,
    ) -> Result<NotificationRecord, DatabaseError> {
        let payload = input
            .payload
            .as_ref()
            .map(|value| {
                serde_json::to_string(value)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))
            })
            .transpose()?;

        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO notifications (id, channel, notification_type, target_email, \
             target_phone, target_whatsapp, user_id, client_id, case_id, payload, scheduled_at, \
             sent_at, status, error_message, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, NULL, ?13, ?13)",
            params![
                id.as_str(),
                input.channel.as_str(),
                input.notification_type.trim(),
                opt_text(input.target_email.as_deref()),
                opt_text(input.target_phone.as_deref()),
                opt_text(input.target_whatsapp.as_deref()),
                opt_text_owned(input.user_id.map(|id| id.to_string())),
                opt_text_owned(input.client_id.map(|id| id.to_string())),
                opt_text_owned(input.case_id.map(|id| id.to_string())),
                opt_text_owned(payload),
                opt_text_owned(input.scheduled_at.as_ref().map(fmt_ts)),
                input.status.as_str(),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| {
                DatabaseError::Query("failed to load created notification".to_string())
            })?;

        row_to_notification_record(&row)
    }

    async fn list_notifications(&self) -> Result<Vec<NotificationRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC"
                ),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_notification_record(&row)?);
        }
        Ok(out)
    }

    async fn get_notification(
        &self,
        id: Uuid,
    ) -> Result<Option<NotificationRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_notification_record(&row)).transpose()
    }

    async fn mark_notification_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let updated = conn
            .execute(
                "UPDATE notifications SET status = ?2, sent_at = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    id.to_string(),
                    NotificationStatus::Sent.as_str(),
                    fmt_ts(&sent_at),
                    now_ts().as_str(),
                ],
            )
            .await?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_notification(id).await
    }

    async fn list_upcoming_case_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<UpcomingSessionRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT s.id, s.case_id, c.case_number, cl.name, s.session_date, s.location \
                 FROM case_sessions s \
                 JOIN cases c ON c.id = s.case_id \
                 LEFT JOIN clients cl ON cl.id = c.client_id \
                 WHERE s.session_date > ?1 AND s.session_date <= ?2 \
                 ORDER BY s.session_date ASC",
                params![fmt_ts(&from), fmt_ts(&to)],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(UpcomingSessionRecord {
                session_id: parse_uuid(&get_text(&row, 0), "case_sessions.id")?,
                case_id: parse_uuid(&get_text(&row, 1), "case_sessions.case_id")?,
                case_number: get_text(&row, 2),
                client_name: get_opt_text(&row, 3),
                session_date: parse_timestamp(&get_text(&row, 4))?,
                location: get_opt_text(&row, 5),
            });
        }
        Ok(out)
    }
}
