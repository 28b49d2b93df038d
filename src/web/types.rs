//! Request and response DTOs for the REST API.
//!
//! Request payloads carry enums, timestamps, ids, and amounts as strings;
//! handlers parse them and collect every failure into one 400 response.
//! Responses render timestamps as RFC 3339 strings and money as decimal
//! strings.

use axum::Json;
use axum::http::StatusCode;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{
    CalendarEventRecord, CaseRecord, CaseSessionRecord, ClientRecord, DocumentRecord,
    InvoiceRecord, NotificationRecord, PaymentRecord, TaskRecord, UpcomingSessionRecord,
    UserRecord,
};
use crate::firm::assistant::{MemoSection, SentimentAnalysis};
use crate::firm::scheduling::SuggestedSlot;

// --- Errors ---

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub message: Vec<String>,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, error: &'static str, message: Vec<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            status_code: status.as_u16(),
            error,
            message,
        }),
    )
}

pub fn bad_request(messages: Vec<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, "Bad Request", messages)
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::NOT_FOUND, "Not Found", vec![message.into()])
}

pub fn conflict(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::CONFLICT, "Conflict", vec![message.into()])
}

pub fn unauthorized(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized", vec![message.into()])
}

pub fn internal_error(err: impl std::fmt::Display) -> ApiError {
    tracing::error!("internal error: {err}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        vec![err.to_string()],
    )
}

fn fmt_dt(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn fmt_dt_opt(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.as_ref().map(fmt_dt)
}

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

// --- Auth ---

#[derive(Debug, Deserialize)]
pub struct RegisterLawyerRequest {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&UserRecord> for UserInfo {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            full_name: record.full_name.clone(),
            phone: record.phone.clone(),
            role: record.role.as_str().to_string(),
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: crate::web::auth::Claims,
}

// --- Clients ---

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub client_type: String,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub commercial_registration: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_type: Option<String>,
    #[serde(default)]
    pub national_id: Option<Option<String>>,
    #[serde(default)]
    pub commercial_registration: Option<Option<String>>,
    #[serde(default)]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct ClientInfo {
    pub id: Uuid,
    pub name: String,
    pub client_type: String,
    pub national_id: Option<String>,
    pub commercial_registration: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ClientRecord> for ClientInfo {
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            client_type: record.client_type.as_str().to_string(),
            national_id: record.national_id.clone(),
            commercial_registration: record.commercial_registration.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            notes: record.notes.clone(),
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientsListResponse {
    pub clients: Vec<ClientInfo>,
}

// --- Cases ---

#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub case_number: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub client_id: String,
    #[serde(default)]
    pub responsible_lawyer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCaseRequest {
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub title: Option<Option<String>>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub court: Option<Option<String>>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub responsible_lawyer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCaseSessionRequest {
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaseSessionInfo {
    pub id: Uuid,
    pub case_id: Uuid,
    pub date: String,
    pub location: Option<String>,
    pub result: Option<String>,
    pub notes: Option<String>,
}

impl From<&CaseSessionRecord> for CaseSessionInfo {
    fn from(record: &CaseSessionRecord) -> Self {
        Self {
            id: record.id,
            case_id: record.case_id,
            date: fmt_dt(&record.session_date),
            location: record.location.clone(),
            result: record.result.clone(),
            notes: record.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseInfo {
    pub id: Uuid,
    pub case_number: String,
    pub title: Option<String>,
    pub case_type: String,
    pub court: Option<String>,
    pub stage: String,
    pub status: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub responsible_lawyer_id: Option<Uuid>,
    pub sessions: Vec<CaseSessionInfo>,
    pub created_at: String,
    pub updated_at: String,
}

impl CaseInfo {
    pub fn from_record(record: &CaseRecord, sessions: &[CaseSessionRecord]) -> Self {
        Self {
            id: record.id,
            case_number: record.case_number.clone(),
            title: record.title.clone(),
            case_type: record.case_type.as_str().to_string(),
            court: record.court.clone(),
            stage: record.stage.as_str().to_string(),
            status: record.status.as_str().to_string(),
            description: record.description.clone(),
            client_id: record.client_id,
            responsible_lawyer_id: record.responsible_lawyer_id,
            sessions: sessions.iter().map(CaseSessionInfo::from).collect(),
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CasesListResponse {
    pub cases: Vec<CaseInfo>,
}

#[derive(Debug, Serialize)]
pub struct CaseSessionsListResponse {
    pub sessions: Vec<CaseSessionInfo>,
}

// --- Billing ---

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_id: String,
    #[serde(default)]
    pub case_id: Option<String>,
    pub billing_model: String,
    pub total_amount: String,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<String>,
    #[serde(default)]
    pub percentage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub billing_model: Option<String>,
    #[serde(default)]
    pub total_amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub hours: Option<Option<String>>,
    #[serde(default)]
    pub hourly_rate: Option<Option<String>>,
    #[serde(default)]
    pub percentage: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: String,
    pub currency: String,
    pub paid_at: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceInfo {
    pub id: Uuid,
    pub client_id: Uuid,
    pub case_id: Option<Uuid>,
    pub status: String,
    pub billing_model: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub due_date: Option<String>,
    pub paid_at: Option<String>,
    pub description: Option<String>,
    pub hours: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&InvoiceRecord> for InvoiceInfo {
    fn from(record: &InvoiceRecord) -> Self {
        Self {
            id: record.id,
            client_id: record.client_id,
            case_id: record.case_id,
            status: record.status.as_str().to_string(),
            billing_model: record.billing_model.as_str().to_string(),
            total_amount: record.total_amount,
            currency: record.currency.as_str().to_string(),
            due_date: fmt_dt_opt(&record.due_date),
            paid_at: fmt_dt_opt(&record.paid_at),
            description: record.description.clone(),
            hours: record.hours,
            hourly_rate: record.hourly_rate,
            percentage: record.percentage,
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoicesListResponse {
    pub invoices: Vec<InvoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct PaymentInfo {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub paid_at: String,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub created_at: String,
}

impl From<&PaymentRecord> for PaymentInfo {
    fn from(record: &PaymentRecord) -> Self {
        Self {
            id: record.id,
            invoice_id: record.invoice_id,
            amount: record.amount,
            currency: record.currency.as_str().to_string(),
            paid_at: fmt_dt(&record.paid_at),
            method: record.method.clone(),
            reference: record.reference.clone(),
            created_at: fmt_dt(&record.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentsListResponse {
    pub payments: Vec<PaymentInfo>,
}

// --- Calendar ---

#[derive(Debug, Deserialize)]
pub struct CreateCalendarEventRequest {
    pub title: String,
    pub event_type: String,
    pub start_at: String,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCalendarEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<Option<String>>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub location: Option<Option<String>>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarEventInfo {
    pub id: Uuid,
    pub title: String,
    pub event_type: String,
    pub start_at: String,
    pub end_at: Option<String>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CalendarEventRecord> for CalendarEventInfo {
    fn from(record: &CalendarEventRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            event_type: record.event_type.as_str().to_string(),
            start_at: fmt_dt(&record.start_at),
            end_at: fmt_dt_opt(&record.end_at),
            is_all_day: record.is_all_day,
            location: record.location.clone(),
            description: record.description.clone(),
            client_id: record.client_id,
            case_id: record.case_id,
            assigned_to_id: record.assigned_to_id,
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarEventsListResponse {
    pub events: Vec<CalendarEventInfo>,
}

#[derive(Debug, Serialize)]
pub struct SuggestedSlotInfo {
    pub start_at: String,
    pub end_at: String,
}

impl From<&SuggestedSlot> for SuggestedSlotInfo {
    fn from(slot: &SuggestedSlot) -> Self {
        Self {
            start_at: fmt_dt(&slot.start_at),
            end_at: fmt_dt(&slot.end_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestedSlotsResponse {
    pub slots: Vec<SuggestedSlotInfo>,
}

// --- Tasks ---

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub assigned_to_id: String,
    pub created_by_id: String,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskInfo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub assigned_to_id: Uuid,
    pub created_by_id: Uuid,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&TaskRecord> for TaskInfo {
    fn from(record: &TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status.as_str().to_string(),
            priority: record.priority.as_str().to_string(),
            due_date: fmt_dt_opt(&record.due_date),
            completed_at: fmt_dt_opt(&record.completed_at),
            assigned_to_id: record.assigned_to_id,
            created_by_id: record.created_by_id,
            case_id: record.case_id,
            client_id: record.client_id,
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TasksListResponse {
    pub tasks: Vec<TaskInfo>,
}

// --- Documents ---

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub doc_type: String,
    pub file_url: String,
    #[serde(default)]
    pub original_file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub uploaded_by_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub original_file_name: Option<Option<String>>,
    #[serde(default)]
    pub mime_type: Option<Option<String>>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub text_content: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub uploaded_by_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentInfo {
    pub id: Uuid,
    pub title: String,
    pub doc_type: String,
    pub file_url: String,
    pub original_file_name: Option<String>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub tags: Vec<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub uploaded_by_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&DocumentRecord> for DocumentInfo {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            doc_type: record.doc_type.as_str().to_string(),
            file_url: record.file_url.clone(),
            original_file_name: record.original_file_name.clone(),
            mime_type: record.mime_type.clone(),
            description: record.description.clone(),
            text_content: record.text_content.clone(),
            tags: record.tags.clone(),
            client_id: record.client_id,
            case_id: record.case_id,
            uploaded_by_id: record.uploaded_by_id,
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentsListResponse {
    pub documents: Vec<DocumentInfo>,
}

// --- Notifications ---

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub channel: String,
    pub notification_type: String,
    #[serde(default)]
    pub target_email: Option<String>,
    #[serde(default)]
    pub target_phone: Option<String>,
    #[serde(default)]
    pub target_whatsapp: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationInfo {
    pub id: Uuid,
    pub channel: String,
    pub notification_type: String,
    pub target_email: Option<String>,
    pub target_phone: Option<String>,
    pub target_whatsapp: Option<String>,
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub payload: Option<serde_json::Value>,
    pub scheduled_at: Option<String>,
    pub sent_at: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&NotificationRecord> for NotificationInfo {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id,
            channel: record.channel.as_str().to_string(),
            notification_type: record.notification_type.clone(),
            target_email: record.target_email.clone(),
            target_phone: record.target_phone.clone(),
            target_whatsapp: record.target_whatsapp.clone(),
            user_id: record.user_id,
            client_id: record.client_id,
            case_id: record.case_id,
            payload: record.payload.clone(),
            scheduled_at: fmt_dt_opt(&record.scheduled_at),
            sent_at: fmt_dt_opt(&record.sent_at),
            status: record.status.as_str().to_string(),
            error_message: record.error_message.clone(),
            created_at: fmt_dt(&record.created_at),
            updated_at: fmt_dt(&record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationsListResponse {
    pub notifications: Vec<NotificationInfo>,
}

#[derive(Debug, Serialize)]
pub struct UpcomingSessionInfo {
    pub session_id: Uuid,
    pub case_id: Uuid,
    pub case_number: String,
    pub client_name: Option<String>,
    pub date: String,
    pub location: Option<String>,
}

impl From<&UpcomingSessionRecord> for UpcomingSessionInfo {
    fn from(record: &UpcomingSessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            case_id: record.case_id,
            case_number: record.case_number.clone(),
            client_name: record.client_name.clone(),
            date: fmt_dt(&record.session_date),
            location: record.location.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpcomingSessionsResponse {
    pub sessions: Vec<UpcomingSessionInfo>,
}

// --- Assistant ---

#[derive(Debug, Deserialize)]
pub struct SummarizeTextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeDocumentRequest {
    pub document_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCaseMemoRequest {
    #[serde(default)]
    pub case_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionInput {
    pub channel: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeSentimentRequest {
    #[serde(default)]
    pub interactions: Vec<InteractionInput>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummaryResponse {
    pub summary: String,
    pub document_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CaseMemoResponse {
    pub sections: Vec<MemoSection>,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    #[serde(flatten)]
    pub analysis: SentimentAnalysis,
}
