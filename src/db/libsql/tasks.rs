use libsql::{params, params_from_iter};
use uuid::Uuid;

use crate::db::{
    CreateTaskParams, TaskFilter, TaskPriority, TaskRecord, TaskStatus, TaskStore,
    UpdateTaskParams,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_ts, get_opt_text, get_text, now_ts, opt_text, opt_text_owned, parse_dt_opt,
    parse_timestamp, parse_uuid, parse_uuid_opt,
};

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, completed_at, \
     assigned_to_id, created_by_id, case_id, client_id, created_at, updated_at";

fn parse_task_status(raw: &str) -> Result<TaskStatus, DatabaseError> {
    TaskStatus::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid task status '{raw}'")))
}

fn parse_task_priority(raw: &str) -> Result<TaskPriority, DatabaseError> {
    TaskPriority::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid task priority '{raw}'")))
}

fn row_to_task_record(row: &libsql::Row) -> Result<TaskRecord, DatabaseError> {
    let status_raw = get_text(row, 3);
    let priority_raw = get_text(row, 4);
    Ok(TaskRecord {
        id: parse_uuid(&get_text(row, 0), "tasks.id")?,
        title: get_text(row, 1),
        description: get_opt_text(row, 2),
        status: parse_task_status(&status_raw)?,
        priority: parse_task_priority(&priority_raw)?,
        due_date: parse_dt_opt(get_opt_text(row, 5))?,
        completed_at: parse_dt_opt(get_opt_text(row, 6))?,
        assigned_to_id: parse_uuid(&get_text(row, 7), "tasks.assigned_to_id")?,
        created_by_id: parse_uuid(&get_text(row, 8), "tasks.created_by_id")?,
        case_id: parse_uuid_opt(get_opt_text(row, 9), "tasks.case_id")?,
        client_id: parse_uuid_opt(get_opt_text(row, 10), "tasks.client_id")?,
        created_at: parse_timestamp(&get_text(row, 11))?,
        updated_at: parse_timestamp(&get_text(row, 12))?,
    })
}

#[async_trait::async_trait]
impl TaskStore for LibSqlBackend {
    async fn create_task(&self, input: &CreateTaskParams) -> Result<TaskRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, completed_at, \
             assigned_to_id, created_by_id, case_id, client_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                id.as_str(),
                input.title.trim(),
                opt_text(input.description.as_deref()),
                input.status.as_str(),
                input.priority.as_str(),
                opt_text_owned(input.due_date.as_ref().map(fmt_ts)),
                input.assigned_to_id.to_string(),
                input.created_by_id.to_string(),
                opt_text_owned(input.case_id.map(|id| id.to_string())),
                opt_text_owned(input.client_id.map(|id| id.to_string())),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created task".to_string()))?;

        row_to_task_record(&row)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>, DatabaseError> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<libsql::Value> = Vec::new();

        if let Some(assigned_to_id) = filter.assigned_to_id {
            values.push(libsql::Value::Text(assigned_to_id.to_string()));
            clauses.push(format!("assigned_to_id = ?{}", values.len()));
        }
        if let Some(case_id) = filter.case_id {
            values.push(libsql::Value::Text(case_id.to_string()));
            clauses.push(format!("case_id = ?{}", values.len()));
        }
        if let Some(client_id) = filter.client_id {
            values.push(libsql::Value::Text(client_id.to_string()));
            clauses.push(format!("client_id = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(libsql::Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(priority) = filter.priority {
            values.push(libsql::Value::Text(priority.as_str().to_string()));
            clauses.push(format!("priority = ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        // Tasks without a due date sort after dated ones.
        sql.push_str(" ORDER BY due_date IS NULL, due_date ASC, created_at DESC");

        let conn = self.connect().await?;
        let mut rows = conn.query(&sql, params_from_iter(values)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_task_record(&row)?);
        }
        Ok(out)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<TaskRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_task_record(&row)).transpose()
    }

    async fn update_task(
        &self,
        id: Uuid,
        input: &UpdateTaskParams,
    ) -> Result<Option<TaskRecord>, DatabaseError> {
        let Some(existing) = self.get_task(id).await? else {
            return Ok(None);
        };

        let merged_title = input.title.clone().unwrap_or(existing.title);
        if merged_title.trim().is_empty() {
            return Err(DatabaseError::Serialization(
                "task title cannot be empty".to_string(),
            ));
        }
        let merged_description = input.description.clone().unwrap_or(existing.description);
        let merged_status = input.status.unwrap_or(existing.status);
        let merged_priority = input.priority.unwrap_or(existing.priority);
        let merged_due_date = input.due_date.unwrap_or(existing.due_date);
        let merged_completed_at = input.completed_at.unwrap_or(existing.completed_at);
        let merged_assigned_to = input.assigned_to_id.unwrap_or(existing.assigned_to_id);
        let merged_case_id = input.case_id.unwrap_or(existing.case_id);
        let merged_client_id = input.client_id.unwrap_or(existing.client_id);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE tasks SET \
               title = ?2, \
               description = ?3, \
               status = ?4, \
               priority = ?5, \
               due_date = ?6, \
               completed_at = ?7, \
               assigned_to_id = ?8, \
               case_id = ?9, \
               client_id = ?10, \
               updated_at = ?11 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_title.trim(),
                opt_text(merged_description.as_deref()),
                merged_status.as_str(),
                merged_priority.as_str(),
                opt_text_owned(merged_due_date.as_ref().map(fmt_ts)),
                opt_text_owned(merged_completed_at.as_ref().map(fmt_ts)),
                merged_assigned_to.to_string(),
                opt_text_owned(merged_case_id.map(|id| id.to_string())),
                opt_text_owned(merged_client_id.map(|id| id.to_string())),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_task(id).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        let deleted = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])
            .await?;
        Ok(deleted > 0)
    }
}
