//! Invoice payment recording and reconciliation.
//!
//! Recording a payment inserts the payment row, then re-derives the invoice
//! status from the sum of all payments. The two writes are intentionally not
//! wrapped in a transaction; the status is a derived convenience, recomputed
//! on every payment write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{CreatePaymentParams, InvoiceRecord, InvoiceStatus, InvoiceStore, PaymentRecord};
use crate::error::DatabaseError;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Invoice not found")]
    InvoiceNotFound,

    #[error("Payment amount must be greater than 0")]
    InvalidAmount,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Derive the invoice status from its paid total.
///
/// Full payment wins unconditionally; otherwise a past due date overrides
/// whatever the payment level would say.
pub fn reconciled_status(
    current: InvoiceStatus,
    total_amount: Decimal,
    total_paid: Decimal,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> InvoiceStatus {
    let mut status = if total_paid >= total_amount {
        InvoiceStatus::Paid
    } else if total_paid > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else {
        current
    };

    if status != InvoiceStatus::Paid
        && let Some(due) = due_date
        && due < now
    {
        status = InvoiceStatus::Overdue;
    }

    status
}

/// Record a payment against an invoice and reconcile the invoice status.
///
/// Returns the created payment. The invoice update happens after the payment
/// insert without a transaction; a crash in between leaves the status stale
/// until the next payment write.
pub async fn record_payment(
    db: &dyn InvoiceStore,
    invoice_id: Uuid,
    input: &CreatePaymentParams,
) -> Result<PaymentRecord, PaymentError> {
    if input.amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount);
    }

    let invoice = db
        .get_invoice(invoice_id)
        .await?
        .ok_or(PaymentError::InvoiceNotFound)?;

    let payment = db.create_payment(invoice_id, input).await?;

    let total_paid = db
        .list_payments(invoice_id)
        .await?
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc + p.amount);

    let status = reconciled_status(
        invoice.status,
        invoice.total_amount,
        total_paid,
        invoice.due_date,
        Utc::now(),
    );
    let paid_at = if status == InvoiceStatus::Paid {
        Some(payment.paid_at)
    } else {
        invoice.paid_at
    };

    db.set_invoice_payment_state(invoice_id, status, paid_at)
        .await?;

    Ok(payment)
}

/// Totals across a set of invoices and their paid amounts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BillingSummary {
    pub total_invoiced: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
    pub overdue: Decimal,
}

/// Fold invoices and their paid totals into the billing summary.
///
/// `paid_for` resolves the paid total of one invoice. Outstanding counts only
/// positive remainders; overdue is the outstanding share of past-due
/// invoices.
pub fn summarize_invoices<F>(
    invoices: &[InvoiceRecord],
    paid_for: F,
    now: DateTime<Utc>,
) -> BillingSummary
where
    F: Fn(Uuid) -> Decimal,
{
    let mut summary = BillingSummary {
        total_invoiced: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        outstanding: Decimal::ZERO,
        overdue: Decimal::ZERO,
    };

    for invoice in invoices {
        summary.total_invoiced += invoice.total_amount;
        let paid = paid_for(invoice.id);
        summary.total_paid += paid;

        let remaining = invoice.total_amount - paid;
        if remaining > Decimal::ZERO {
            summary.outstanding += remaining;
            if let Some(due) = invoice.due_date
                && due < now
            {
                summary.overdue += remaining;
            }
        }
    }

    summary
}

/// Billing summary across all invoices.
pub async fn billing_summary(db: &dyn InvoiceStore) -> Result<BillingSummary, DatabaseError> {
    let invoices = db.list_invoices(&Default::default()).await?;
    let paid_by_invoice = paid_totals_by_invoice(db).await?;
    Ok(summarize_invoices(
        &invoices,
        |id| paid_by_invoice.get(&id).copied().unwrap_or(Decimal::ZERO),
        Utc::now(),
    ))
}

/// Paid totals grouped by invoice id, over every payment in the store.
pub async fn paid_totals_by_invoice(
    db: &dyn InvoiceStore,
) -> Result<std::collections::HashMap<Uuid, Decimal>, DatabaseError> {
    let mut totals = std::collections::HashMap::new();
    for payment in db.list_payments_all().await? {
        *totals.entry(payment.invoice_id).or_insert(Decimal::ZERO) += payment.amount;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::db::{BillingModel, Currency, InvoiceRecord, InvoiceStatus};

    use super::{reconciled_status, summarize_invoices};

    fn invoice(
        total: Decimal,
        due_date: Option<chrono::DateTime<Utc>>,
        status: InvoiceStatus,
    ) -> InvoiceRecord {
        let now = Utc::now();
        InvoiceRecord {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            case_id: None,
            status,
            billing_model: BillingModel::Fixed,
            total_amount: total,
            currency: Currency::Sar,
            due_date,
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
    fn full_payment_is_paid_even_past_due() {
        let now = Utc::now();
        let status = reconciled_status(
            InvoiceStatus::Sent,
            dec!(1000),
            dec!(1000),
            Some(now - Duration::days(3)),
            now,
        );
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn overpayment_counts_as_paid() {
        let now = Utc::now();
        let status = reconciled_status(InvoiceStatus::Sent, dec!(1000), dec!(1200), None, now);
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn partial_payment_before_due_date() {
        let now = Utc::now();
        let status = reconciled_status(
            InvoiceStatus::Sent,
            dec!(1000),
            dec!(400),
            Some(now + Duration::days(7)),
            now,
        );
        assert_eq!(status, InvoiceStatus::PartiallyPaid);
    }

    #[test]
    fn past_due_date_overrides_partial_payment() {
        // 1000 SAR invoice, due date in the past, 400 paid.
        let now = Utc::now();
        let status = reconciled_status(
            InvoiceStatus::Sent,
            dec!(1000),
            dec!(400),
            Some(now - Duration::days(1)),
            now,
        );
        assert_eq!(status, InvoiceStatus::Overdue);
    }

    #[test]
    fn zero_paid_keeps_current_status_unless_overdue() {
        let now = Utc::now();
        let kept = reconciled_status(InvoiceStatus::Draft, dec!(500), Decimal::ZERO, None, now);
        assert_eq!(kept, InvoiceStatus::Draft);

        let overdue = reconciled_status(
            InvoiceStatus::Draft,
            dec!(500),
            Decimal::ZERO,
            Some(now - Duration::hours(1)),
            now,
        );
        assert_eq!(overdue, InvoiceStatus::Overdue);
    }

    #[test]
    fn summary_splits_outstanding_and_overdue() {
        let now = Utc::now();
        let past = now - Duration::days(2);
        let future = now + Duration::days(2);

        let a = invoice(dec!(1000), Some(past), InvoiceStatus::Sent);
        let b = invoice(dec!(500), Some(future), InvoiceStatus::Sent);
        let c = invoice(dec!(300), None, InvoiceStatus::Paid);
        let paid = std::collections::HashMap::from([
            (a.id, dec!(400)),
            (b.id, dec!(100)),
            (c.id, dec!(300)),
        ]);

        let summary = summarize_invoices(
            &[a.clone(), b.clone(), c.clone()],
            |id| paid.get(&id).copied().unwrap_or(Decimal::ZERO),
            now,
        );

        assert_eq!(summary.total_invoiced, dec!(1800));
        assert_eq!(summary.total_paid, dec!(800));
        assert_eq!(summary.outstanding, dec!(1000));
        assert_eq!(summary.overdue, dec!(600));
    }
}
