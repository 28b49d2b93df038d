use chrono::{DateTime, Utc};
use libsql::{params, params_from_iter};
use uuid::Uuid;

use crate::db::{
    BillingModel, CreateInvoiceParams, CreatePaymentParams, Currency, InvoiceFilter,
    InvoiceRecord, InvoiceStatus, InvoiceStore, PaymentRecord, UpdateInvoiceParams,
};
use crate::error::DatabaseError;

use super::{
    LibSqlBackend, fmt_decimal, fmt_ts, get_opt_text, get_text, now_ts, opt_text, opt_text_owned,
    parse_decimal, parse_decimal_opt, parse_dt_opt, parse_timestamp, parse_uuid, parse_uuid_opt,
};

const INVOICE_COLUMNS: &str = "id, client_id, case_id, status, billing_model, total_amount, \
     currency, due_date, paid_at, description, hours, hourly_rate, percentage, \
     created_at, updated_at";

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, amount, currency, paid_at, method, reference, created_at";

fn parse_invoice_status(raw: &str) -> Result<InvoiceStatus, DatabaseError> {
    InvoiceStatus::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid invoice status '{raw}'")))
}

fn parse_billing_model(raw: &str) -> Result<BillingModel, DatabaseError> {
    BillingModel::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid billing model '{raw}'")))
}

fn parse_currency(raw: &str) -> Result<Currency, DatabaseError> {
    Currency::from_db_value(raw)
        .ok_or_else(|| DatabaseError::Serialization(format!("invalid currency '{raw}'")))
}

fn row_to_invoice_record(row: &libsql::Row) -> Result<InvoiceRecord, DatabaseError> {
    let status_raw = get_text(row, 3);
    let billing_model_raw = get_text(row, 4);
    let currency_raw = get_text(row, 6);
    Ok(InvoiceRecord {
        id: parse_uuid(&get_text(row, 0), "invoices.id")?,
        client_id: parse_uuid(&get_text(row, 1), "invoices.client_id")?,
        case_id: parse_uuid_opt(get_opt_text(row, 2), "invoices.case_id")?,
        status: parse_invoice_status(&status_raw)?,
        billing_model: parse_billing_model(&billing_model_raw)?,
        total_amount: parse_decimal(&get_text(row, 5), "invoices.total_amount")?,
        currency: parse_currency(&currency_raw)?,
        due_date: parse_dt_opt(get_opt_text(row, 7))?,
        paid_at: parse_dt_opt(get_opt_text(row, 8))?,
        description: get_opt_text(row, 9),
        hours: parse_decimal_opt(get_opt_text(row, 10), "invoices.hours")?,
        hourly_rate: parse_decimal_opt(get_opt_text(row, 11), "invoices.hourly_rate")?,
        percentage: parse_decimal_opt(get_opt_text(row, 12), "invoices.percentage")?,
        created_at: parse_timestamp(&get_text(row, 13))?,
        updated_at: parse_timestamp(&get_text(row, 14))?,
    })
}

fn row_to_payment_record(row: &libsql::Row) -> Result<PaymentRecord, DatabaseError> {
    let currency_raw = get_text(row, 3);
    Ok(PaymentRecord {
        id: parse_uuid(&get_text(row, 0), "payments.id")?,
        invoice_id: parse_uuid(&get_text(row, 1), "payments.invoice_id")?,
        amount: parse_decimal(&get_text(row, 2), "payments.amount")?,
        currency: parse_currency(&currency_raw)?,
        paid_at: parse_timestamp(&get_text(row, 4))?,
        method: get_opt_text(row, 5),
        reference: get_opt_text(row, 6),
        created_at: parse_timestamp(&get_text(row, 7))?,
    })
}

#[async_trait::async_trait]
impl InvoiceStore for LibSqlBackend {
    async fn create_invoice(
        &self,
        input: &CreateInvoiceParams,
    ) -> Result<InvoiceRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        let now = now_ts();
        conn.execute(
            "INSERT INTO invoices (id, client_id, case_id, status, billing_model, total_amount, \
             currency, due_date, paid_at, description, hours, hourly_rate, percentage, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                id.as_str(),
                input.client_id.to_string(),
                opt_text_owned(input.case_id.map(|id| id.to_string())),
                input.status.as_str(),
                input.billing_model.as_str(),
                fmt_decimal(&input.total_amount),
                input.currency.as_str(),
                opt_text_owned(input.due_date.as_ref().map(fmt_ts)),
                opt_text(input.description.as_deref()),
                opt_text_owned(input.hours.as_ref().map(fmt_decimal)),
                opt_text_owned(input.hourly_rate.as_ref().map(fmt_decimal)),
                opt_text_owned(input.percentage.as_ref().map(fmt_decimal)),
                now.as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created invoice".to_string()))?;

        row_to_invoice_record(&row)
    }

    async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceRecord>, DatabaseError> {
        let mut sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices");
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
        if let Some(status) = filter.status {
            values.push(libsql::Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let conn = self.connect().await?;
        let mut rows = conn.query(&sql, params_from_iter(values)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_invoice_record(&row)?);
        }
        Ok(out)
    }

    async fn get_invoice(&self, id: Uuid) -> Result<Option<InvoiceRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 LIMIT 1"),
                params![id.to_string()],
            )
            .await?
            .next()
            .await?;
        row.map(|row| row_to_invoice_record(&row)).transpose()
    }

    async fn update_invoice(
        &self,
        id: Uuid,
        input: &UpdateInvoiceParams,
    ) -> Result<Option<InvoiceRecord>, DatabaseError> {
        let Some(existing) = self.get_invoice(id).await? else {
            return Ok(None);
        };

        let merged_client_id = input.client_id.unwrap_or(existing.client_id);
        let merged_case_id = input.case_id.unwrap_or(existing.case_id);
        let merged_status = input.status.unwrap_or(existing.status);
        let merged_billing_model = input.billing_model.unwrap_or(existing.billing_model);
        let merged_total = input.total_amount.unwrap_or(existing.total_amount);
        let merged_currency = input.currency.unwrap_or(existing.currency);
        let merged_due_date = input.due_date.unwrap_or(existing.due_date);
        let merged_description = input.description.clone().unwrap_or(existing.description);
        let merged_hours = input.hours.unwrap_or(existing.hours);
        let merged_hourly_rate = input.hourly_rate.unwrap_or(existing.hourly_rate);
        let merged_percentage = input.percentage.unwrap_or(existing.percentage);

        let conn = self.connect().await?;
        conn.execute(
            "UPDATE invoices SET \
               client_id = ?2, \
               case_id = ?3, \
               status = ?4, \
               billing_model = ?5, \
               total_amount = ?6, \
               currency = ?7, \
               due_date = ?8, \
               description = ?9, \
               hours = ?10, \
               hourly_rate = ?11, \
               percentage = ?12, \
               updated_at = ?13 \
             WHERE id = ?1",
            params![
                id.to_string(),
                merged_client_id.to_string(),
                opt_text_owned(merged_case_id.map(|id| id.to_string())),
                merged_status.as_str(),
                merged_billing_model.as_str(),
                fmt_decimal(&merged_total),
                merged_currency.as_str(),
                opt_text_owned(merged_due_date.as_ref().map(fmt_ts)),
                opt_text(merged_description.as_deref()),
                opt_text_owned(merged_hours.as_ref().map(fmt_decimal)),
                opt_text_owned(merged_hourly_rate.as_ref().map(fmt_decimal)),
                opt_text_owned(merged_percentage.as_ref().map(fmt_decimal)),
                now_ts().as_str(),
            ],
        )
        .await?;

        self.get_invoice(id).await
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.connect().await?;
        // Payments are owned by the invoice; remove them with it.
        conn.execute(
            "DELETE FROM payments WHERE invoice_id = ?1",
            params![id.to_string()],
        )
        .await?;
        let deleted = conn
            .execute("DELETE FROM invoices WHERE id = ?1", params![id.to_string()])
            .await?;
        Ok(deleted > 0)
    }

    async fn create_payment(
        &self,
        invoice_id: Uuid,
        input: &CreatePaymentParams,
    ) -> Result<PaymentRecord, DatabaseError> {
        let conn = self.connect().await?;
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO payments (id, invoice_id, amount, currency, paid_at, method, reference, \
             created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.as_str(),
                invoice_id.to_string(),
                fmt_decimal(&input.amount),
                input.currency.as_str(),
                fmt_ts(&input.paid_at),
                opt_text(input.method.as_deref()),
                opt_text(input.reference.as_deref()),
                now_ts().as_str(),
            ],
        )
        .await?;

        let row = conn
            .query(
                &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1 LIMIT 1"),
                params![id.as_str()],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("failed to load created payment".to_string()))?;

        row_to_payment_record(&row)
    }

    async fn list_payments(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<PaymentRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments \
                     WHERE invoice_id = ?1 ORDER BY paid_at DESC"
                ),
                params![invoice_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_payment_record(&row)?);
        }
        Ok(out)
    }

    async fn list_payments_all(&self) -> Result<Vec<PaymentRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY paid_at DESC"),
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_payment_record(&row)?);
        }
        Ok(out)
    }

    async fn set_invoice_payment_state(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Option<InvoiceRecord>, DatabaseError> {
        let conn = self.connect().await?;
        let updated = conn
            .execute(
                "UPDATE invoices SET status = ?2, paid_at = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    id.to_string(),
                    status.as_str(),
                    opt_text_owned(paid_at.as_ref().map(fmt_ts)),
                    now_ts().as_str(),
                ],
            )
            .await?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_invoice(id).await
    }
}
