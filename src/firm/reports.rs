//! Report aggregations.
//!
//! Every report loads the relevant rows and folds them in memory; the data
//! volumes of a single firm do not warrant pushing these into SQL.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{
    CaseRecord, CaseType, Database, InvoiceRecord, TaskRecord, TaskStatus, UserRecord,
};
use crate::error::DatabaseError;
use crate::firm::billing::{BillingSummary, paid_totals_by_invoice, summarize_invoices};

#[derive(Debug, Clone, Serialize)]
pub struct CasesOverview {
    pub total: usize,
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub by_stage: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserTaskStats {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub open_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientProfitability {
    pub client_id: Uuid,
    pub client_name: String,
    pub total_invoiced: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseTypeRevenue {
    pub case_type: CaseType,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub cases_overview: CasesOverview,
    pub financial_overview: BillingSummary,
    pub team_performance: Vec<UserTaskStats>,
    pub top_case_types: Vec<CaseTypeRevenue>,
    pub client_profitability: Vec<ClientProfitability>,
}

pub fn cases_overview(cases: &[CaseRecord]) -> CasesOverview {
    let mut by_status = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    let mut by_stage = BTreeMap::new();

    for case in cases {
        *by_status.entry(case.status.as_str().to_string()).or_insert(0) += 1;
        *by_type.entry(case.case_type.as_str().to_string()).or_insert(0) += 1;
        *by_stage.entry(case.stage.as_str().to_string()).or_insert(0) += 1;
    }

    CasesOverview {
        total: cases.len(),
        by_status,
        by_type,
        by_stage,
    }
}

/// Per-assignee open/completed/overdue counts, in first-seen task order.
pub fn user_task_stats(
    tasks: &[TaskRecord],
    users: &[UserRecord],
    now: DateTime<Utc>,
) -> Vec<UserTaskStats> {
    let names: HashMap<Uuid, &str> = users
        .iter()
        .map(|user| (user.id, user.full_name.as_str()))
        .collect();

    let mut order: Vec<Uuid> = Vec::new();
    let mut stats: HashMap<Uuid, UserTaskStats> = HashMap::new();

    for task in tasks {
        let entry = stats.entry(task.assigned_to_id).or_insert_with(|| {
            order.push(task.assigned_to_id);
            UserTaskStats {
                user_id: task.assigned_to_id,
                full_name: names.get(&task.assigned_to_id).map(|s| s.to_string()),
                open_tasks: 0,
                completed_tasks: 0,
                overdue_tasks: 0,
            }
        });
        if task.status == TaskStatus::Done {
            entry.completed_tasks += 1;
        } else {
            entry.open_tasks += 1;
            if let Some(due) = task.due_date
                && due < now
            {
                entry.overdue_tasks += 1;
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| stats.remove(&id))
        .collect()
}

/// Invoice totals grouped by the linked case's type; invoices without a case
/// count as OTHER. Sorted by total descending.
pub fn case_type_revenue(
    invoices: &[InvoiceRecord],
    cases: &[CaseRecord],
) -> Vec<CaseTypeRevenue> {
    let types: HashMap<Uuid, CaseType> =
        cases.iter().map(|case| (case.id, case.case_type)).collect();

    let mut totals: HashMap<CaseType, Decimal> = HashMap::new();
    for invoice in invoices {
        let case_type = invoice
            .case_id
            .and_then(|id| types.get(&id).copied())
            .unwrap_or(CaseType::Other);
        *totals.entry(case_type).or_insert(Decimal::ZERO) += invoice.total_amount;
    }

    let mut items: Vec<CaseTypeRevenue> = totals
        .into_iter()
        .map(|(case_type, total)| CaseTypeRevenue { case_type, total })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total));
    items
}

pub async fn get_cases_overview(db: &dyn Database) -> Result<CasesOverview, DatabaseError> {
    Ok(cases_overview(&db.list_cases().await?))
}

/// Billing totals, optionally restricted to invoices created in a window.
pub async fn get_financial_overview(
    db: &dyn Database,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<BillingSummary, DatabaseError> {
    let invoices: Vec<InvoiceRecord> = db
        .list_invoices(&Default::default())
        .await?
        .into_iter()
        .filter(|invoice| {
            from.is_none_or(|from| invoice.created_at >= from)
                && to.is_none_or(|to| invoice.created_at <= to)
        })
        .collect();
    let paid_by_invoice = paid_totals_by_invoice(db).await?;
    Ok(summarize_invoices(
        &invoices,
        |id| paid_by_invoice.get(&id).copied().unwrap_or(Decimal::ZERO),
        Utc::now(),
    ))
}

pub async fn get_team_performance(db: &dyn Database) -> Result<Vec<UserTaskStats>, DatabaseError> {
    let tasks = db.list_tasks(&Default::default()).await?;
    let users = db.list_users().await?;
    Ok(user_task_stats(&tasks, &users, Utc::now()))
}

/// Per-client invoiced/paid/outstanding totals, every client included.
pub async fn get_client_profitability(
    db: &dyn Database,
) -> Result<Vec<ClientProfitability>, DatabaseError> {
    let clients = db.list_clients().await?;
    let invoices = db.list_invoices(&Default::default()).await?;
    let payments = db.list_payments_all().await?;

    let invoice_clients: HashMap<Uuid, Uuid> = invoices
        .iter()
        .map(|invoice| (invoice.id, invoice.client_id))
        .collect();

    let mut rows: Vec<ClientProfitability> = clients
        .iter()
        .map(|client| ClientProfitability {
            client_id: client.id,
            client_name: client.name.clone(),
            total_invoiced: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            outstanding: Decimal::ZERO,
        })
        .collect();
    let mut index: HashMap<Uuid, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.client_id, i))
        .collect();

    for invoice in &invoices {
        if let Some(&i) = index.get(&invoice.client_id) {
            rows[i].total_invoiced += invoice.total_amount;
        }
    }
    for payment in &payments {
        if let Some(&i) = invoice_clients
            .get(&payment.invoice_id)
            .and_then(|client_id| index.get(client_id))
        {
            rows[i].total_paid += payment.amount;
        }
    }
    for row in &mut rows {
        row.outstanding = row.total_invoiced - row.total_paid;
    }
    Ok(rows)
}

pub async fn get_top_case_types(
    db: &dyn Database,
) -> Result<Vec<CaseTypeRevenue>, DatabaseError> {
    let invoices = db.list_invoices(&Default::default()).await?;
    let cases = db.list_cases().await?;
    Ok(case_type_revenue(&invoices, &cases))
}

pub async fn get_dashboard_overview(
    db: &dyn Database,
) -> Result<DashboardOverview, DatabaseError> {
    Ok(DashboardOverview {
        cases_overview: get_cases_overview(db).await?,
        financial_overview: get_financial_overview(db, None, None).await?,
        team_performance: get_team_performance(db).await?,
        top_case_types: get_top_case_types(db).await?,
        client_profitability: get_client_profitability(db).await?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::db::{
        BillingModel, CaseRecord, CaseStage, CaseStatus, CaseType, Currency, InvoiceRecord,
        InvoiceStatus, TaskPriority, TaskRecord, TaskStatus, UserRecord, UserRole,
    };

    use super::{case_type_revenue, cases_overview, user_task_stats};

    fn case(case_type: CaseType, status: CaseStatus, stage: CaseStage) -> CaseRecord {
        let now = Utc::now();
        CaseRecord {
            id: Uuid::new_v4(),
            case_number: "1446/123".to_string(),
            title: None,
            case_type,
            court: None,
            stage,
            status,
            description: None,
            client_id: Uuid::new_v4(),
            responsible_lawyer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(
        assigned_to: Uuid,
        status: TaskStatus,
        due: Option<chrono::DateTime<Utc>>,
    ) -> TaskRecord {
        let now = Utc::now();
        TaskRecord {
            id: Uuid::new_v4(),
            title: "file motion".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: due,
            completed_at: None,
            assigned_to_id: assigned_to,
            created_by_id: assigned_to,
            case_id: None,
            client_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: Uuid, name: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id,
            email: format!("{name}@firm.example"),
            full_name: name.to_string(),
            phone: None,
            password_hash: "x".to_string(),
            role: UserRole::Lawyer,
            created_at: now,
            updated_at: now,
        }
    }

    fn invoice(case_id: Option<Uuid>, total: Decimal) -> InvoiceRecord {
        let now = Utc::now();
        InvoiceRecord {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            case_id,
            status: InvoiceStatus::Sent,
            billing_model: BillingModel::Fixed,
            total_amount: total,
            currency: Currency::Sar,
            due_date: None,
            paid_at: None,
            description: None,
            hours: None,
            hourly_rate: None,
            percentage: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn cases_overview_counts_every_dimension() {
        let cases = [
            case(CaseType::Commercial, CaseStatus::Open, CaseStage::PreTrial),
            case(CaseType::Commercial, CaseStatus::Closed, CaseStage::Appeal),
            case(CaseType::Labor, CaseStatus::Open, CaseStage::PreTrial),
        ];
        let overview = cases_overview(&cases);
        assert_eq!(overview.total, 3);
        assert_eq!(overview.by_type["COMMERCIAL"], 2);
        assert_eq!(overview.by_status["OPEN"], 2);
        assert_eq!(overview.by_stage["PRE_TRIAL"], 2);
        assert_eq!(overview.by_stage["APPEAL"], 1);
    }

    #[test]
    fn task_stats_split_open_completed_overdue() {
        let now = Utc::now();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let tasks = [
            task(alice, TaskStatus::Done, None),
            task(alice, TaskStatus::Todo, Some(now - Duration::days(1))),
            task(alice, TaskStatus::InProgress, Some(now + Duration::days(1))),
            task(bob, TaskStatus::Todo, None),
        ];
        let users = [user(alice, "Alice"), user(bob, "Bob")];

        let stats = user_task_stats(&tasks, &users, now);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].full_name.as_deref(), Some("Alice"));
        assert_eq!(stats[0].completed_tasks, 1);
        assert_eq!(stats[0].open_tasks, 2);
        assert_eq!(stats[0].overdue_tasks, 1);
        assert_eq!(stats[1].full_name.as_deref(), Some("Bob"));
        assert_eq!(stats[1].open_tasks, 1);
        assert_eq!(stats[1].overdue_tasks, 0);
    }

    #[test]
    fn revenue_groups_caseless_invoices_under_other() {
        let commercial = case(CaseType::Commercial, CaseStatus::Open, CaseStage::PreTrial);
        let invoices = [
            invoice(Some(commercial.id), dec!(700)),
            invoice(None, dec!(200)),
            invoice(Some(commercial.id), dec!(100)),
        ];
        let items = case_type_revenue(&invoices, &[commercial]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].case_type, CaseType::Commercial);
        assert_eq!(items[0].total, dec!(800));
        assert_eq!(items[1].case_type, CaseType::Other);
        assert_eq!(items[1].total, dec!(200));
    }
}
