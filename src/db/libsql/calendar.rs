use libsql::{params, params_from_iter};
use uuid::Uuid;

use crate::db::{
    CalendarEventFilter, CalendarEventRecord, CalendarEventType, CalendarStore,
    CreateCalendarEventParams, UpdateCalendarEventParams,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_ts, get_i64, get_opt_text, get_text, now_ts, opt_text, opt_text_owned,
    parse_dt_opt, parse_timestamp, parse_uuid, parse_uuid_opt,
};

const EVENT_COLUMNS: &str = "id, title, event_type, start_at, end_at, is_all_day, location, \
     description, client_id, case_id, assigned_to_id, created_at, updated_at";

fn parse_event_type(raw: &str) -> Result<CalendarEventType, DatabaseError> {
    CalendarEventType::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid event type '{raw}'")))
}

fn row_to_event_record(row: &libsql::Row) -> Result<CalendarEventRecord, DatabaseError> {
    let event_type_raw = get_text(row, 2);
    Ok(CalendarEventRecord {
        id: parse_uuid(&get_text(row, 0), "calendar_events.id")?,
        title: get_text(row, 1),
        event_type: parse_event_type(&event_type_raw)?,
        start_at: parse_timestamp(&get_text(row, 3))?,
        end_at: parse_dt_opt(get_opt_text(row, 4))?,
        is_all_day: get_i64(row, 5) != 0,
        location: get_opt_text(row, 6),
        description: get_opt_text(row, 7),
        client_id: parse_uuid_opt(get_opt_text(row, 8), "calendar_events.client_id")?,
        case_id: parse_uuid_opt(get_opt_text(row, 9), "calendar_events.case_id")?,
        assigned_to_id: parse_uuid_opt(get_opt_text(row, 10), "calendar_events.assigned_to_id")?,
        created_at: parse_timestamp(&get_text(row, 11))?,
        updated_at: parse_timestamp(&get_text(row, 12))?,
    })
}

#[async_trait::async_trait]
impl CalendarStore for LibSqlBackend {
    async fn create_event(
        &self,
        input: &CreateCalendarEventParams,
    ) -> Result<CalendarEventRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO calendar_events (id, title, event_type, start_at, end_at, is_all_day, \
             location, description, client_id, case_id, assigned_to_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                id.as_str(),
                input.title.trim(),
                input.event_type.as_str(),
                fmt_ts(&input.start_at),
                opt_text_owned(input.end_at.as_ref().map(fmt_ts)),
                i64::from(input.is_all_day),
                opt_text(input.location.as_deref()),
                opt_text(input.description.as_deref()),
                opt_text_owned(input.client_id.map(|id| id.to_string())),
                opt_text_owned(input.case_id.map(|id| id.to_string())),
                opt_text_owned(input.assigned_to_id.map(|id| id.to_string())),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| {
                DatabaseError::Query("failed to load created calendar event".to_string())
            })?;

        row_to_event_record(&row)
    }

    async fn list_events(
        &self,
        filter: &CalendarEventFilter,
    ) -> Result<Vec<CalendarEventRecord>, DatabaseError> {
        let mut sql = format!("SELECT {EVENT_COLUMNS} FROM calendar_events");
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<libsql::Value> = Vec::new();

        if let Some(client_id) = filter.client_id {
            values.push(libsql::Value::Text(client_id.to_string()));
            clauses.push(format!("client_id = ?{}", values.len()));
        }
        if let Some(case_id) = filter.case_id {
            values.push(libsql::Value::Text(case_id.to_string()));
            clauses.push(format!("case_id = ?{}", values.len()));
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            values.push(libsql::Value::Text(assigned_to_id.to_string()));
            clauses.push(format!("assigned_to_id = ?{}", values.len()));
        }
        // The range applies only when both bounds are present.
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            values.push(libsql::Value::Text(fmt_ts(&from)));
            clauses.push(format!("start_at >= ?{}", values.len()));
            values.push(libsql::Value::Text(fmt_ts(&to)));
            clauses.push(format!("start_at <= ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY start_at ASC");

        let conn = self.connect().await?;
        let mut rows = conn.query(&sql, params_from_iter(values)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_event_record(&row)?);
        }
        Ok(out)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEventRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_event_record(&row)).transpose()
    }

    async fn update_event(
        &self,
        id: Uuid,
        input: &UpdateCalendarEventParams,
    ) -> Result<Option<CalendarEventRecord>, DatabaseError> {
        let Some(existing) = self.get_event(id).await? else {
            return Ok(None);
        };

        let merged_title = input.title.clone().unwrap_or(existing.title);
        if merged_title.trim().is_empty() {
            return Err(DatabaseError::Serialization(
                "event title cannot be empty".to_string(),
            ));
        }
        let merged_event_type = input.event_type.unwrap_or(existing.event_type);
        let merged_start_at = input.start_at.unwrap_or(existing.start_at);
        let merged_end_at = input.end_at.unwrap_or(existing.end_at);
        let merged_is_all_day = input.is_all_day.unwrap_or(existing.is_all_day);
        let merged_location = input.location.clone().unwrap_or(existing.location);
        let merged_description = input.description.clone().unwrap_or(existing.description);
        let merged_client_id = input.client_id.unwrap_or(existing.client_id);
        let merged_case_id = input.case_id.unwrap_or(existing.case_id);
        let merged_assigned_to = input.assigned_to_id.unwrap_or(existing.assigned_to_id);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE calendar_events SET \
               title = ?2, \
               event_type = ?3, \
               start_at = ?4, \
               end_at = ?5, \
               is_all_day = ?6, \
               location = ?7, \
               description = ?8, \
               client_id = ?9, \
               case_id = ?10, \
               assigned_to_id = ?11, \
               updated_at = ?12 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_title.trim(),
                merged_event_type.as_str(),
                fmt_ts(&merged_start_at),
                opt_text_owned(merged_end_at.as_ref().map(fmt_ts)),
                i64::from(merged_is_all_day),
                opt_text(merged_location.as_deref()),
                opt_text(merged_description.as_deref()),
                opt_text_owned(merged_client_id.map(|id| id.to_string())),
                opt_text_owned(merged_case_id.map(|id| id.to_string())),
                opt_text_owned(merged_assigned_to.map(|id| id.to_string())),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_event(id).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        let deleted = conn
            .execute(
                "DELETE FROM calendar_events WHERE id = ?1",
                params![id.to_string()],
            )
            .await?;
        Ok(deleted > 0)
    }
}
