use libsql::params;
use uuid::Uuid;

use crate::db::{ClientRecord, ClientStore, ClientType, CreateClientParams, UpdateClientParams};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, get_opt_text, get_text, now_ts, opt_text, parse_timestamp, parse_uuid,
};

const CLIENT_COLUMNS: &str = "id, name, client_type, national_id, commercial_registration, \
     email, phone, notes, created_at, updated_at";

fn parse_client_type(raw: &str) -> Result<ClientType, DatabaseError> {
    ClientType::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid client_type '{raw}'")))
}

fn row_to_client_record(row: &libsql::Row) -> Result<ClientRecord, DatabaseError> {
    let client_type_raw = get_text(row, 2);
    Ok(ClientRecord {
        id: parse_uuid(&get_text(row, 0), "clients.id")?,
        name: get_text(row, 1),
        client_type: parse_client_type(&client_type_raw)?,
        national_id: get_opt_text(row, 3),
        commercial_registration: get_opt_text(row, 4),
        email: get_opt_text(row, 5),
        phone: get_opt_text(row, 6),
        notes: get_opt_text(row, 7),
        created_at: parse_timestamp(&get_text(row, 8))?,
        updated_at: parse_timestamp(&get_text(row, 9))?,
    })
}

#[async_trait::async_trait]
impl ClientStore for LibSqlBackend {
    async fn create_client(
        &self,
        input: &CreateClientParams,
    ) -> Result<ClientRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO clients (id, name, client_type, national_id, commercial_registration, \
             email, phone, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                id.as_str(),
                input.name.trim(),
                input.client_type.as_str(),
                opt_text(input.national_id.as_deref()),
                opt_text(input.commercial_registration.as_deref()),
                opt_text(input.email.as_deref()),
                opt_text(input.phone.as_deref()),
                opt_text(input.notes.as_deref()),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created client".to_string()))?;

        row_to_client_record(&row)
    }

    async fn list_clients(&self) -> Result<Vec<ClientRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC"),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_client_record(&row)?);
        }
        Ok(out)
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<ClientRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_client_record(&row)).transpose()
    }

    async fn update_client(
        &self,
        id: Uuid,
        input: &UpdateClientParams,
    ) -> Result<Option<ClientRecord>, DatabaseError> {
        let Some(existing) = self.get_client(id).await? else {
            return Ok(None);
        };

        let merged_name = input.name.as_deref().unwrap_or(existing.name.as_str()).trim();
        if merged_name.is_empty() {
            return Err(DatabaseError::Serialization(
                "client name cannot be empty".to_string(),
            ));
        }
        let merged_client_type = input.client_type.unwrap_or(existing.client_type);
        let merged_national_id = input.national_id.clone().unwrap_or(existing.national_id);
        let merged_registration = input
            .commercial_registration
            .clone()
            .unwrap_or(existing.commercial_registration);
        let merged_email = input.email.clone().unwrap_or(existing.email);
        let merged_phone = input.phone.clone().unwrap_or(existing.phone);
        let merged_notes = input.notes.clone().unwrap_or(existing.notes);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE clients SET \
               name = ?2, \
               client_type = ?3, \
               national_id = ?4, \
               commercial_registration = ?5, \
               email = ?6, \
               phone = ?7, \
               notes = ?8, \
               updated_at = ?9 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_name,
                merged_client_type.as_str(),
                opt_text(merged_national_id.as_deref()),
                opt_text(merged_registration.as_deref()),
                opt_text(merged_email.as_deref()),
                opt_text(merged_phone.as_deref()),
                opt_text(merged_notes.as_deref()),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_client(id).await
    }

    async fn delete_client(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        let deleted = conn
            .execute("DELETE FROM clients WHERE id = ?1", params![id.to_string()])
            .await?;
        Ok(deleted > 0)
    }
}
