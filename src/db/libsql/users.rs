use libsql::params;
use uuid::Uuid;

use crate::db::{CreateUserParams, UserRecord, UserRole, UserStore};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, get_opt_text, get_text, now_ts, opt_text, parse_timestamp, parse_uuid,
};

const USER_COLUMNS: &str =
    "id, email, full_name, phone, password_hash, role, created_at, updated_at";

fn parse_role(raw: &str) -> Result<UserRole, DatabaseError> {
    UserRole::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid user role '{raw}'")))
}

fn row_to_user_record(row: &libsql::Row) -> Result<UserRecord, DatabaseError> {
    let role_raw = get_text(row, 5);
    Ok(UserRecord {
        id: parse_uuid(&get_text(row, 0), "users.id")?,
        email: get_text(row, 1),
        full_name: get_text(row, 2),
        phone: get_opt_text(row, 3),
        password_hash: get_text(row, 4),
        role: parse_role(&role_raw)?,
        created_at: parse_timestamp(&get_text(row, 6))?,
        updated_at: parse_timestamp(&get_text(row, 7))?,
    })
}

#[async_trait::async_trait]
impl UserStore for LibSqlBackend {
    async fn create_user(&self, input: &CreateUserParams) -> Result<UserRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO users (id, email, full_name, phone, password_hash, role, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                id.as_str(),
                input.email.trim().to_ascii_lowercase(),
                input.full_name.trim(),
                opt_text(input.phone.as_deref()),
                input.password_hash.as_str(),
                input.role.as_str(),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created user".to_string()))?;

        row_to_user_record(&row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_user_record(&row)).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 LIMIT 1"),
                params![email.trim().to_ascii_lowercase()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_user_record(&row)).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_user_record(&row)?);
        }
        Ok(out)
    }
}
