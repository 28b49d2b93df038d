use libsql::params;
use uuid::Uuid;

use crate::db::{
    CaseRecord, CaseSessionRecord, CaseStage, CaseStatus, CaseStore, CaseType, CreateCaseParams,
    CreateCaseSessionParams, UpdateCaseParams,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_ts, get_opt_text, get_text, now_ts, opt_text, opt_text_owned,
    parse_timestamp, parse_uuid, parse_uuid_opt,
};

const CASE_COLUMNS: &str = "id, case_number, title, case_type, court, stage, status, \
     description, client_id, responsible_lawyer_id, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, case_id, session_date, location, result, notes";

fn parse_case_type(raw: &str) -> Result<CaseType, DatabaseError> {
    CaseType::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid case type '{raw}'")))
}

fn parse_case_stage(raw: &str) -> Result<CaseStage, DatabaseError> {
    CaseStage::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid case stage '{raw}'")))
}

fn parse_case_status(raw: &str) -> Result<CaseStatus, DatabaseError> {
    CaseStatus::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid case status '{raw}'")))
}

fn row_to_case_record(row: &libsql::Row) -> Result<CaseRecord, DatabaseError> {
    let case_type_raw = get_text(row, 3);
    let stage_raw = get_text(row, 5);
    let status_raw = get_text(row, 6);
    Ok(CaseRecord {
        id: parse_uuid(&get_text(row, 0), "cases.id")?,
        case_number: get_text(row, 1),
        title: get_opt_text(row, 2),
        case_type: parse_case_type(&case_type_raw)?,
        court: get_opt_text(row, 4),
        stage: parse_case_stage(&stage_raw)?,
        status: parse_case_status(&status_raw)?,
        description: get_opt_text(row, 7),
        client_id: parse_uuid(&get_text(row, 8), "cases.client_id")?,
        responsible_lawyer_id: parse_uuid_opt(get_opt_text(row, 9), "cases.responsible_lawyer_id")?,
        created_at: parse_timestamp(&get_text(row, 10))?,
        updated_at: parse_timestamp(&get_text(row, 11))?,
    })
}

fn row_to_session_record(row: &libsql::Row) -> Result<CaseSessionRecord, DatabaseError> {
    Ok(CaseSessionRecord {
        id: parse_uuid(&get_text(row, 0), "case_sessions.id")?,
        case_id: parse_uuid(&get_text(row, 1), "case_sessions.case_id")?,
        session_date: parse_timestamp(&get_text(row, 2))?,
        location: get_opt_text(row, 3),
        result: get_opt_text(row, 4),
        notes: get_opt_text(row, 5),
    })
}

#[async_trait::async_trait]
impl CaseStore for LibSqlBackend {
    async fn create_case(&self, input: &CreateCaseParams) -> Result<CaseRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO cases (id, case_number, title, case_type, court, stage, status, \
             description, client_id, responsible_lawyer_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                id.as_str(),
                input.case_number.trim(),
                opt_text(input.title.as_deref()),
                input.case_type.as_str(),
                opt_text(input.court.as_deref()),
                input.stage.as_str(),
                input.status.as_str(),
                opt_text(input.description.as_deref()),
                input.client_id.to_string(),
                opt_text_owned(input.responsible_lawyer_id.map(|id| id.to_string())),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created case".to_string()))?;

        row_to_case_record(&row)
    }

    async fn list_cases(&self) -> Result<Vec<CaseRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at DESC"),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_case_record(&row)?);
        }
        Ok(out)
    }

    async fn get_case(&self, id: Uuid) -> Result<Option<CaseRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_case_record(&row)).transpose()
    }

    async fn update_case(
        &self,
        id: Uuid,
        input: &UpdateCaseParams,
    ) -> Result<Option<CaseRecord>, DatabaseError> {
        let Some(existing) = self.get_case(id).await? else {
            return Ok(None);
        };

        let merged_case_number = input
            .case_number
            .as_deref()
            .unwrap_or(existing.case_number.as_str())
            .trim()
            .to_string();
        if merged_case_number.is_empty() {
            return Err(DatabaseError::Serialization(
                "case number cannot be empty".to_string(),
            ));
        }
        let merged_title = input.title.clone().unwrap_or(existing.title);
        let merged_case_type = input.case_type.unwrap_or(existing.case_type);
        let merged_court = input.court.clone().unwrap_or(existing.court);
        let merged_stage = input.stage.unwrap_or(existing.stage);
        let merged_status = input.status.unwrap_or(existing.status);
        let merged_description = input.description.clone().unwrap_or(existing.description);
        let merged_client_id = input.client_id.unwrap_or(existing.client_id);
        let merged_lawyer_id = input
            .responsible_lawyer_id
            .unwrap_or(existing.responsible_lawyer_id);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE cases SET \
               case_number = ?2, \
               title = ?3, \
               case_type = ?4, \
               court = ?5, \
               stage = ?6, \
               status = ?7, \
               description = ?8, \
               client_id = ?9, \
               responsible_lawyer_id = ?10, \
               updated_at = ?11 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_case_number.as_str(),
                opt_text(merged_title.as_deref()),
                merged_case_type.as_str(),
                opt_text(merged_court.as_deref()),
                merged_stage.as_str(),
                merged_status.as_str(),
                opt_text(merged_description.as_deref()),
                merged_client_id.to_string(),
                opt_text_owned(merged_lawyer_id.map(|id| id.to_string())),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_case(id).await
    }

    async fn delete_case(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        // Sessions are owned by the case; remove them with it.
        conn.execute(
            "DELETE FROM case_sessions WHERE case_id = ?1",
            params![id.to_string()],
        )
        .await?;
        let deleted = conn
            .execute("DELETE FROM cases WHERE id = ?1", params![id.to_string()])
            .await?;
        Ok(deleted > 0)
    }

    async fn add_case_session(
        &self,
        case_id: Uuid,
        input: &CreateCaseSessionParams,
    ) -> Result<CaseSessionRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO case_sessions (id, case_id, session_date, location, result, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.as_str(),
                case_id.to_string(),
                fmt_ts(&input.session_date),
                opt_text(input.location.as_deref()),
                opt_text(input.result.as_deref()),
                opt_text(input.notes.as_deref()),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {SESSION_COLUMNS} FROM case_sessions WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| {
                DatabaseError::Query("failed to load created case session".to_string())
            })?;

        row_to_session_record(&row)
    }

    async fn list_case_sessions(
        &self,
        case_id: Uuid,
    ) -> Result<Vec<CaseSessionRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SESSION_COLUMNS} FROM case_sessions \
                     WHERE case_id = ?1 ORDER BY session_date ASC"
                ),
                params![case_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_session_record(&row)?);
        }
        Ok(out)
    }

    async fn list_case_sessions_all(&self) -> Result<Vec<CaseSessionRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {SESSION_COLUMNS} FROM case_sessions ORDER BY session_date ASC"),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_session_record(&row)?);
        }
        Ok(out)
    }
}
