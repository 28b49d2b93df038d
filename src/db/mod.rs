//! Database abstraction layer.
//!
//! Provides a backend-agnostic `Database` trait that unifies all persistence
//! operations. One implementation exists behind a feature flag:
//!
//! - `libsql`: embedded libSQL database (local file or `:memory:`)
//!
//! Records are plain structs mirroring table rows. Create/update inputs are
//! separate param structs; update params use `Option<Option<T>>` for nullable
//! columns (outer option = field present in the patch, inner = new value or
//! null), so unspecified fields are always retained.

#[cfg(feature = "libsql")]
pub mod libsql;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Create the configured database backend, run migrations, and return it.
pub async fn connect_from_config(
    config: &crate::config::DatabaseConfig,
) -> Result<Arc<dyn Database>, DatabaseError> {
    #[cfg(feature = "libsql")]
    {
        let backend = libsql::LibSqlBackend::new_local(&config.path)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        backend.run_migrations().await?;
        Ok(Arc::new(backend))
    }
    #[cfg(not(feature = "libsql"))]
    {
        let _ = config;
        Err(DatabaseError::Connection(
            "no database backend available; enable the 'libsql' feature".to_string(),
        ))
    }
}

// ==================== Enums ====================
//
// Every enum is stored as its SCREAMING_SNAKE_CASE wire value, so the serde
// encoding and the database encoding coincide.

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            pub fn from_db_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

string_enum! {
    /// Role attached to a firm account.
    UserRole {
        Admin => "ADMIN",
        Lawyer => "LAWYER",
        Assistant => "ASSISTANT",
        Client => "CLIENT",
    }
}

string_enum! {
    ClientType {
        Individual => "INDIVIDUAL",
        Company => "COMPANY",
        Government => "GOVERNMENT",
    }
}

string_enum! {
    CaseType {
        Criminal => "CRIMINAL",
        Commercial => "COMMERCIAL",
        PersonalStatus => "PERSONAL_STATUS",
        Administrative => "ADMINISTRATIVE",
        Labor => "LABOR",
        Other => "OTHER",
    }
}

string_enum! {
    CaseStatus {
        Open => "OPEN",
        Closed => "CLOSED",
        Pending => "PENDING",
        Suspended => "SUSPENDED",
    }
}

string_enum! {
    /// Procedural stage a case has reached.
    CaseStage {
        PreTrial => "PRE_TRIAL",
        FirstInstance => "FIRST_INSTANCE",
        Appeal => "APPEAL",
        Supreme => "SUPREME",
        Execution => "EXECUTION",
    }
}

string_enum! {
    InvoiceStatus {
        Draft => "DRAFT",
        Sent => "SENT",
        PartiallyPaid => "PARTIALLY_PAID",
        Paid => "PAID",
        Overdue => "OVERDUE",
        Cancelled => "CANCELLED",
    }
}

string_enum! {
    BillingModel {
        Hourly => "HOURLY",
        Fixed => "FIXED",
        Contingency => "CONTINGENCY",
    }
}

string_enum! {
    Currency {
        Sar => "SAR",
        Usd => "USD",
        Egp => "EGP",
        Eur => "EUR",
    }
}

string_enum! {
    CalendarEventType {
        Session => "SESSION",
        Meeting => "MEETING",
        Deadline => "DEADLINE",
        Other => "OTHER",
    }
}

string_enum! {
    TaskStatus {
        Todo => "TODO",
        InProgress => "IN_PROGRESS",
        Done => "DONE",
    }
}

string_enum! {
    TaskPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

string_enum! {
    DocumentType {
        Pleading => "PLEADING",
        Judgment => "JUDGMENT",
        PowerOfAttorney => "POWER_OF_ATTORNEY",
        Contract => "CONTRACT",
        Correspondence => "CORRESPONDENCE",
        Other => "OTHER",
    }
}

string_enum! {
    NotificationChannel {
        Email => "EMAIL",
        Sms => "SMS",
        Whatsapp => "WHATSAPP",
    }
}

string_enum! {
    NotificationStatus {
        Pending => "PENDING",
        Sent => "SENT",
        Failed => "FAILED",
    }
}

// ==================== Users ====================

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

// ==================== Clients ====================

#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    pub client_type: ClientType,
    pub national_id: Option<String>,
    pub commercial_registration: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateClientParams {
    pub name: String,
    pub client_type: ClientType,
    pub national_id: Option<String>,
    pub commercial_registration: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClientParams {
    pub name: Option<String>,
    pub client_type: Option<ClientType>,
    pub national_id: Option<Option<String>>,
    pub commercial_registration: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

// ==================== Cases ====================

#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub id: Uuid,
    pub case_number: String,
    pub title: Option<String>,
    pub case_type: CaseType,
    pub court: Option<String>,
    pub stage: CaseStage,
    pub status: CaseStatus,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub responsible_lawyer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCaseParams {
    pub case_number: String,
    pub title: Option<String>,
    pub case_type: CaseType,
    pub court: Option<String>,
    pub stage: CaseStage,
    pub status: CaseStatus,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub responsible_lawyer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCaseParams {
    pub case_number: Option<String>,
    pub title: Option<Option<String>>,
    pub case_type: Option<CaseType>,
    pub court: Option<Option<String>>,
    pub stage: Option<CaseStage>,
    pub status: Option<CaseStatus>,
    pub description: Option<Option<String>>,
    pub client_id: Option<Uuid>,
    pub responsible_lawyer_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone)]
pub struct CaseSessionRecord {
    pub id: Uuid,
    pub case_id: Uuid,
    pub session_date: DateTime<Utc>,
    pub location: Option<String>,
    pub result: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCaseSessionParams {
    pub session_date: DateTime<Utc>,
    pub location: Option<String>,
    pub result: Option<String>,
    pub notes: Option<String>,
}

// ==================== Billing ====================

#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub case_id: Option<Uuid>,
    pub status: InvoiceStatus,
    pub billing_model: BillingModel,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub hours: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateInvoiceParams {
    pub client_id: Uuid,
    pub case_id: Option<Uuid>,
    pub status: InvoiceStatus,
    pub billing_model: BillingModel,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub hours: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceParams {
    pub client_id: Option<Uuid>,
    pub case_id: Option<Option<Uuid>>,
    pub status: Option<InvoiceStatus>,
    pub billing_model: Option<BillingModel>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub description: Option<Option<String>>,
    pub hours: Option<Option<Decimal>>,
    pub hourly_rate: Option<Option<Decimal>>,
    pub percentage: Option<Option<Decimal>>,
}

/// Filter for invoice listings; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub paid_at: DateTime<Utc>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePaymentParams {
    pub amount: Decimal,
    pub currency: Currency,
    pub paid_at: DateTime<Utc>,
    pub method: Option<String>,
    pub reference: Option<String>,
}

// ==================== Calendar ====================

#[derive(Debug, Clone)]
pub struct CalendarEventRecord {
    pub id: Uuid,
    pub title: String,
    pub event_type: CalendarEventType,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCalendarEventParams {
    pub title: String,
    pub event_type: CalendarEventType,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCalendarEventParams {
    pub title: Option<String>,
    pub event_type: Option<CalendarEventType>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<Option<DateTime<Utc>>>,
    pub is_all_day: Option<bool>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub client_id: Option<Option<Uuid>>,
    pub case_id: Option<Option<Uuid>>,
    pub assigned_to_id: Option<Option<Uuid>>,
}

/// Filter for calendar listings. The `from`/`to` range applies to `start_at`
/// (inclusive on both ends) and only when both bounds are present.
#[derive(Debug, Clone, Default)]
pub struct CalendarEventFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

// ==================== Tasks ====================

#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to_id: Uuid,
    pub created_by_id: Uuid,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTaskParams {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to_id: Uuid,
    pub created_by_id: Uuid,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskParams {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub assigned_to_id: Option<Uuid>,
    pub case_id: Option<Option<Uuid>>,
    pub client_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub assigned_to_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

// ==================== Documents ====================

#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub title: String,
    pub doc_type: DocumentType,
    pub file_url: String,
    pub original_file_name: Option<String>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub tags: Vec<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub uploaded_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateDocumentParams {
    pub title: String,
    pub doc_type: DocumentType,
    pub file_url: String,
    pub original_file_name: Option<String>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub tags: Vec<String>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub uploaded_by_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentParams {
    pub title: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub file_url: Option<String>,
    pub original_file_name: Option<Option<String>>,
    pub mime_type: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub text_content: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub client_id: Option<Option<Uuid>>,
    pub case_id: Option<Option<Uuid>>,
    pub uploaded_by_id: Option<Option<Uuid>>,
}

/// Filter for document listings. When `search` is set it wins over the id
/// filters and matches title/description/text content case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub search: Option<String>,
}

// ==================== Notifications ====================

#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub channel: NotificationChannel,
    pub notification_type: String,
    pub target_email: Option<String>,
    pub target_phone: Option<String>,
    pub target_whatsapp: Option<String>,
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub payload: Option<serde_json::Value>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNotificationParams {
    pub channel: NotificationChannel,
    pub notification_type: String,
    pub target_email: Option<String>,
    pub target_phone: Option<String>,
    pub target_whatsapp: Option<String>,
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub payload: Option<serde_json::Value>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: NotificationStatus,
}

/// A case session joined with its case number and client name, for the
/// upcoming-session notification preview.
#[derive(Debug, Clone)]
pub struct UpcomingSessionRecord {
    pub session_id: Uuid,
    pub case_id: Uuid,
    pub case_number: String,
    pub client_name: Option<String>,
    pub session_date: DateTime<Utc>,
    pub location: Option<String>,
}

// ==================== Sub-traits ====================
//
// Each sub-trait groups related persistence methods. The `Database`
// supertrait combines them all; leaf consumers can depend on a specific
// sub-trait instead.

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, input: &CreateUserParams) -> Result<UserRecord, DatabaseError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, DatabaseError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<UserRecord>, DatabaseError>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn create_client(
        &self,
        input: &CreateClientParams,
    ) -> Result<ClientRecord, DatabaseError>;
    /// All clients, newest first.
    async fn list_clients(&self) -> Result<Vec<ClientRecord>, DatabaseError>;
    async fn get_client(&self, id: Uuid) -> Result<Option<ClientRecord>, DatabaseError>;
    async fn update_client(
        &self,
        id: Uuid,
        input: &UpdateClientParams,
    ) -> Result<Option<ClientRecord>, DatabaseError>;
    /// Deletes the client row only; its cases are left in place.
    async fn delete_client(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn create_case(&self, input: &CreateCaseParams) -> Result<CaseRecord, DatabaseError>;
    /// All cases, newest first.
    async fn list_cases(&self) -> Result<Vec<CaseRecord>, DatabaseError>;
    async fn get_case(&self, id: Uuid) -> Result<Option<CaseRecord>, DatabaseError>;
    async fn update_case(
        &self,
        id: Uuid,
        input: &UpdateCaseParams,
    ) -> Result<Option<CaseRecord>, DatabaseError>;
    /// Deletes the case and all of its sessions.
    async fn delete_case(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn add_case_session(
        &self,
        case_id: Uuid,
        input: &CreateCaseSessionParams,
    ) -> Result<CaseSessionRecord, DatabaseError>;
    /// Sessions of one case, earliest first.
    async fn list_case_sessions(
        &self,
        case_id: Uuid,
    ) -> Result<Vec<CaseSessionRecord>, DatabaseError>;
    /// Every session across all cases, earliest first.
    async fn list_case_sessions_all(&self) -> Result<Vec<CaseSessionRecord>, DatabaseError>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create_invoice(
        &self,
        input: &CreateInvoiceParams,
    ) -> Result<InvoiceRecord, DatabaseError>;
    /// Matching invoices, newest first.
    async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceRecord>, DatabaseError>;
    async fn get_invoice(&self, id: Uuid) -> Result<Option<InvoiceRecord>, DatabaseError>;
    async fn update_invoice(
        &self,
        id: Uuid,
        input: &UpdateInvoiceParams,
    ) -> Result<Option<InvoiceRecord>, DatabaseError>;
    /// Deletes the invoice and all of its payments.
    async fn delete_invoice(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn create_payment(
        &self,
        invoice_id: Uuid,
        input: &CreatePaymentParams,
    ) -> Result<PaymentRecord, DatabaseError>;
    /// Payments of one invoice, most recently paid first.
    async fn list_payments(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<PaymentRecord>, DatabaseError>;
    /// Every payment across all invoices.
    async fn list_payments_all(&self) -> Result<Vec<PaymentRecord>, DatabaseError>;
    /// Persist a reconciled status/paid-at pair on the invoice.
    async fn set_invoice_payment_state(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Option<InvoiceRecord>, DatabaseError>;
}

#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn create_event(
        &self,
        input: &CreateCalendarEventParams,
    ) -> Result<CalendarEventRecord, DatabaseError>;
    /// Matching events ordered by start time ascending.
    async fn list_events(
        &self,
        filter: &CalendarEventFilter,
    ) -> Result<Vec<CalendarEventRecord>, DatabaseError>;
    async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEventRecord>, DatabaseError>;
    async fn update_event(
        &self,
        id: Uuid,
        input: &UpdateCalendarEventParams,
    ) -> Result<Option<CalendarEventRecord>, DatabaseError>;
    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, input: &CreateTaskParams) -> Result<TaskRecord, DatabaseError>;
    /// Matching tasks ordered by due date (unset last), then newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>, DatabaseError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<TaskRecord>, DatabaseError>;
    async fn update_task(
        &self,
        id: Uuid,
        input: &UpdateTaskParams,
    ) -> Result<Option<TaskRecord>, DatabaseError>;
    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        input: &CreateDocumentParams,
    ) -> Result<DocumentRecord, DatabaseError>;
    /// Matching documents, newest first.
    async fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, DatabaseError>;
    async fn get_document(&self, id: Uuid) -> Result<Option<DocumentRecord>, DatabaseError>;
    async fn update_document(
        &self,
        id: Uuid,
        input: &UpdateDocumentParams,
    ) -> Result<Option<DocumentRecord>, DatabaseError>;
    async fn delete_document(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(
        &self,
        input: &CreateNotificationParams,
    ) -> Result<NotificationRecord, DatabaseError>;
    /// All notifications, newest first.
    async fn list_notifications(&self) -> Result<Vec<NotificationRecord>, DatabaseError>;
    async fn get_notification(
        &self,
        id: Uuid,
    ) -> Result<Option<NotificationRecord>, DatabaseError>;
    /// Flip status to SENT and stamp `sent_at`.
    async fn mark_notification_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, DatabaseError>;
    /// Sessions with `from < session_date <= to`, joined with their case
    /// number and client name, earliest first.
    async fn list_upcoming_case_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<UpcomingSessionRecord>, DatabaseError>;
}

/// Backend-agnostic database supertrait combining every store.
#[async_trait]
pub trait Database:
    UserStore
    + ClientStore
    + CaseStore
    + InvoiceStore
    + CalendarStore
    + TaskStore
    + DocumentStore
    + NotificationStore
    + Send
    + Sync
{
    /// Run schema migrations for this backend.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;
}
