use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::db::{
    BillingModel, CreateInvoiceParams, CreatePaymentParams, Currency, InvoiceFilter,
    InvoiceStatus, UpdateInvoiceParams,
};
use crate::firm::billing::{self, PaymentError};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CreateInvoiceRequest, DeleteResponse, InvoiceInfo, InvoicesListResponse,
    PaymentInfo, PaymentsListResponse, RecordPaymentRequest, UpdateInvoiceRequest, bad_request,
    internal_error, not_found,
};

use super::{field_datetime, field_decimal, field_enum, field_uuid, finish_validation, parse_path_id};

#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    pub client_id: Option<String>,
    pub case_id: Option<String>,
    pub status: Option<String>,
}

pub async fn create_invoice_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceInfo>), ApiError> {
    let mut errors = Vec::new();
    let client_id = field_uuid(&req.client_id, "client_id", &mut errors);
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    let billing_model = field_enum(
        &req.billing_model,
        "billing_model",
        BillingModel::from_db_value,
        &mut errors,
    );
    let total_amount = field_decimal(&req.total_amount, "total_amount", &mut errors);
    let currency = field_enum(&req.currency, "currency", Currency::from_db_value, &mut errors);
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", InvoiceStatus::from_db_value, &mut errors),
        None => Some(InvoiceStatus::Draft),
    };
    let due_date = match req.due_date.as_deref() {
        Some(raw) => field_datetime(raw, "due_date", &mut errors).map(Some),
        None => Some(None),
    };
    let hours = match req.hours.as_deref() {
        Some(raw) => field_decimal(raw, "hours", &mut errors).map(Some),
        None => Some(None),
    };
    let hourly_rate = match req.hourly_rate.as_deref() {
        Some(raw) => field_decimal(raw, "hourly_rate", &mut errors).map(Some),
        None => Some(None),
    };
    let percentage = match req.percentage.as_deref() {
        Some(raw) => field_decimal(raw, "percentage", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    let client_id = client_id.expect("validated");
    state
        .db
        .get_client(client_id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Client not found"))?;

    let case_id = match case_id.expect("validated") {
        Some(case_id) => {
            state
                .db
                .get_case(case_id)
                .await
                .map_err(internal_error)?
                .ok_or_else(|| not_found("Case not found"))?;
            Some(case_id)
        }
        None => None,
    };

    let invoice = state
        .db
        .create_invoice(&CreateInvoiceParams {
            client_id,
            case_id,
            status: status.expect("validated"),
            billing_model: billing_model.expect("validated"),
            total_amount: total_amount.expect("validated"),
            currency: currency.expect("validated"),
            due_date: due_date.expect("validated"),
            description: req.description,
            hours: hours.expect("validated"),
            hourly_rate: hourly_rate.expect("validated"),
            percentage: percentage.expect("validated"),
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(InvoiceInfo::from(&invoice))))
}

pub async fn list_invoices_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<InvoicesListResponse>, ApiError> {
    let mut errors = Vec::new();
    let client_id = match query.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let case_id = match query.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors),
        None => None,
    };
    let status = match query.status.as_deref() {
        Some(raw) => field_enum(raw, "status", InvoiceStatus::from_db_value, &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    let invoices = state
        .db
        .list_invoices(&InvoiceFilter {
            client_id,
            case_id,
            status,
        })
        .await
        .map_err(internal_error)?;

    Ok(Json(InvoicesListResponse {
        invoices: invoices.iter().map(InvoiceInfo::from).collect(),
    }))
}

pub async fn get_invoice_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceInfo>, ApiError> {
    let id = parse_path_id(&id, "invoice")?;
    let invoice = state
        .db
        .get_invoice(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Invoice not found"))?;
    Ok(Json(InvoiceInfo::from(&invoice)))
}

pub async fn update_invoice_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceInfo>, ApiError> {
    let id = parse_path_id(&id, "invoice")?;

    let mut errors = Vec::new();
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors),
        None => None,
    };
    let billing_model = match req.billing_model.as_deref() {
        Some(raw) => field_enum(raw, "billing_model", BillingModel::from_db_value, &mut errors),
        None => None,
    };
    let total_amount = match req.total_amount.as_deref() {
        Some(raw) => field_decimal(raw, "total_amount", &mut errors),
        None => None,
    };
    let currency = match req.currency.as_deref() {
        Some(raw) => field_enum(raw, "currency", Currency::from_db_value, &mut errors),
        None => None,
    };
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", InvoiceStatus::from_db_value, &mut errors),
        None => None,
    };
    let due_date = match &req.due_date {
        Some(Some(raw)) => field_datetime(raw, "due_date", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    let hours = match &req.hours {
        Some(Some(raw)) => field_decimal(raw, "hours", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    let hourly_rate = match &req.hourly_rate {
        Some(Some(raw)) => field_decimal(raw, "hourly_rate", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    let percentage = match &req.percentage {
        Some(Some(raw)) => field_decimal(raw, "percentage", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    finish_validation(errors)?;

    if let Some(client_id) = client_id {
        state
            .db
            .get_client(client_id)
            .await
            .map_err(internal_error)?
            .ok_or_else(|| not_found("Client not found"))?;
    }
    let case_id = match case_id {
        Some(case_id) => {
            state
                .db
                .get_case(case_id)
                .await
                .map_err(internal_error)?
                .ok_or_else(|| not_found("Case not found"))?;
            Some(Some(case_id))
        }
        None => None,
    };

    let updated = state
        .db
        .update_invoice(
            id,
            &UpdateInvoiceParams {
                client_id,
                case_id,
                status,
                billing_model,
                total_amount,
                currency,
                due_date,
                description: req.description,
                hours,
                hourly_rate,
                percentage,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Invoice not found"))?;

    Ok(Json(InvoiceInfo::from(&updated)))
}

pub async fn delete_invoice_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "invoice")?;
    let deleted = state.db.delete_invoice(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn list_payments_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentsListResponse>, ApiError> {
    let id = parse_path_id(&id, "invoice")?;
    state
        .db
        .get_invoice(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Invoice not found"))?;
    let payments = state.db.list_payments(id).await.map_err(internal_error)?;
    Ok(Json(PaymentsListResponse {
        payments: payments.iter().map(PaymentInfo::from).collect(),
    }))
}

pub async fn record_payment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentInfo>), ApiError> {
    let id = parse_path_id(&id, "invoice")?;

    let mut errors = Vec::new();
    let amount = field_decimal(&req.amount, "amount", &mut errors);
    let currency = field_enum(&req.currency, "currency", Currency::from_db_value, &mut errors);
    let paid_at = field_datetime(&req.paid_at, "paid_at", &mut errors);
    finish_validation(errors)?;

    let payment = billing::record_payment(
        state.db.as_ref(),
        id,
        &CreatePaymentParams {
            amount: amount.expect("validated"),
            currency: currency.expect("validated"),
            paid_at: paid_at.expect("validated"),
            method: req.method,
            reference: req.reference,
        },
    )
    .await
    .map_err(|err| match err {
        PaymentError::InvoiceNotFound => not_found("Invoice not found"),
        PaymentError::InvalidAmount => bad_request(vec![err.to_string()]),
        PaymentError::Database(db_err) => internal_error(db_err),
    })?;

    Ok((StatusCode::CREATED, Json(PaymentInfo::from(&payment))))
}

pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<billing::BillingSummary>, ApiError> {
    let summary = billing::billing_summary(state.db.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(Json(summary))
}
