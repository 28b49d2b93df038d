use libsql::{params, params_from_iter};
use uuid::Uuid;

use crate::db::{
    CreateDocumentParams, DocumentFilter, DocumentRecord, DocumentStore, DocumentType,
    UpdateDocumentParams,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_string_list, get_opt_text, get_text, now_ts, opt_text, opt_text_owned,
    parse_string_list, parse_timestamp, parse_uuid, parse_uuid_opt,
};

const DOCUMENT_COLUMNS: &str = "id, title, doc_type, file_url, original_file_name, mime_type, \
     description, text_content, tags, client_id, case_id, uploaded_by_id, created_at, updated_at";

fn parse_doc_type(raw: &str) -> Result<DocumentType, DatabaseError> {
    DocumentType::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid document type '{raw}'")))
}

fn row_to_document_record(row: &libsql::Row) -> Result<DocumentRecord, DatabaseError> {
    let doc_type_raw = get_text(row, 2);
    Ok(DocumentRecord {
        id: parse_uuid(&get_text(row, 0), "documents.id")?,
        title: get_text(row, 1),
        doc_type: parse_doc_type(&doc_type_raw)?,
        file_url: get_text(row, 3),
        original_file_name: get_opt_text(row, 4),
        mime_type: get_opt_text(row, 5),
        description: get_opt_text(row, 6),
        text_content: get_opt_text(row, 7),
        tags: parse_string_list(&get_text(row, 8))?,
        client_id: parse_uuid_opt(get_opt_text(row, 9), "documents.client_id")?,
        case_id: parse_uuid_opt(get_opt_text(row, 10), "documents.case_id")?,
        uploaded_by_id: parse_uuid_opt(get_opt_text(row, 11), "documents.uploaded_by_id")?,
        created_at: parse_timestamp(&get_text(row, 12))?,
        updated_at: parse_timestamp(&get_text(row, 13))?,
    })
}

#[async_trait::async_trait]
impl DocumentStore for LibSqlBackend {
    async fn create_document(
        &self,
        input: &CreateDocumentParams,
    ) -> Result<DocumentRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO documents (id, title, doc_type, file_url, original_file_name, mime_type, \
             description, text_content, tags, client_id, case_id, uploaded_by_id, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                id.as_str(),
                input.title.trim(),
                input.doc_type.as_str(),
                input.file_url.trim(),
                opt_text(input.original_file_name.as_deref()),
                opt_text(input.mime_type.as_deref()),
                opt_text(input.description.as_deref()),
                opt_text(input.text_content.as_deref()),
                fmt_string_list(&input.tags)?,
                opt_text_owned(input.client_id.map(|id| id.to_string())),
                opt_text_owned(input.case_id.map(|id| id.to_string())),
                opt_text_owned(input.uploaded_by_id.map(|id| id.to_string())),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created document".to_string()))?;

        row_to_document_record(&row)
    }

    async fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, DatabaseError> {
        let conn = self.connect().await?;

        // Free-text search takes precedence over the id filters.
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let like = format!("%{}%", search.trim().to_lowercase());
            let mut rows = conn
                .query(
                    &format!(
                        "SELECT {DOCUMENT_COLUMNS} FROM documents \
                         WHERE lower(title) LIKE ?1 \
                            OR lower(coalesce(description, '')) LIKE ?1 \
                            OR lower(coalesce(text_content, '')) LIKE ?1 \
                         ORDER BY created_at DESC"
                    ),
                    params![like.as_str()],
                )
                .await?;

            let mut out = Vec::new();
            while let Some(row) = rows.next().await? {
                out.push(row_to_document_record(&row)?);
            }
            return Ok(out);
        }

        let mut sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents");
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
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut rows = conn.query(&sql, params_from_iter(values)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_document_record(&row)?);
        }
        Ok(out)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<DocumentRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_document_record(&row)).transpose()
    }

    async fn update_document(
        &self,
        id: Uuid,
        input: &UpdateDocumentParams,
    ) -> Result<Option<DocumentRecord>, DatabaseError> {
        let Some(existing) = self.get_document(id).await? else {
            return Ok(None);
        };

        let merged_title = input.title.clone().unwrap_or(existing.title);
        if merged_title.trim().is_empty() {
            return Err(DatabaseError::Serialization(
                "document title cannot be empty".to_string(),
            ));
        }
        let merged_doc_type = input.doc_type.unwrap_or(existing.doc_type);
        let merged_file_url = input.file_url.clone().unwrap_or(existing.file_url);
        let merged_file_name = input
            .original_file_name
            .clone()
            .unwrap_or(existing.original_file_name);
        let merged_mime_type = input.mime_type.clone().unwrap_or(existing.mime_type);
        let merged_description = input.description.clone().unwrap_or(existing.description);
        let merged_text_content = input.text_content.clone().unwrap_or(existing.text_content);
        let merged_tags = input.tags.clone().unwrap_or(existing.tags);
        let merged_client_id = input.client_id.unwrap_or(existing.client_id);
        let merged_case_id = input.case_id.unwrap_or(existing.case_id);
        let merged_uploaded_by = input.uploaded_by_id.unwrap_or(existing.uploaded_by_id);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE documents SET \
               title = ?2, \
               doc_type = ?3, \
               file_url = ?4, \
               original_file_name = ?5, \
               mime_type = ?6, \
               description = ?7, \
               text_content = ?8, \
               tags = ?9, \
               client_id = ?10, \
               case_id = ?11, \
               uploaded_by_id = ?12, \
               updated_at = ?13 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_title.trim(),
                merged_doc_type.as_str(),
                merged_file_url.trim(),
                opt_text(merged_file_name.as_deref()),
                opt_text(merged_mime_type.as_deref()),
                opt_text(merged_description.as_deref()),
                opt_text(merged_text_content.as_deref()),
                fmt_string_list(&merged_tags)?,
                opt_text_owned(merged_client_id.map(|id| id.to_string())),
                opt_text_owned(merged_case_id.map(|id| id.to_string())),
                opt_text_owned(merged_uploaded_by.map(|id| id.to_string())),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_document(id).await
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        let deleted = conn
            .execute(
                "DELETE FROM documents WHERE id = ?1",
                params![id.to_string()],
            )
            .await?;
        Ok(deleted > 0)
    }
}
