use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a plan
pub type PlanId = Uuid;

/// unique identifier for a sale
pub type SaleId = Uuid;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// spacing between regular installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Weekly,
    BiWeekly,
    Monthly,
}

impl PaymentFrequency {
    /// step a date forward by `units` frequency periods
    ///
    /// monthly stepping uses calendar months with the date library's
    /// month-end clamping (jan 31 + 1 month = feb 28/29)
    pub fn step(&self, date: NaiveDate, units: u32) -> NaiveDate {
        match self {
            PaymentFrequency::Weekly => date + chrono::Duration::days(7 * units as i64),
            PaymentFrequency::BiWeekly => date + chrono::Duration::days(14 * units as i64),
            PaymentFrequency::Monthly => date
                .checked_add_months(Months::new(units))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// one period after the given date
    pub fn next_after(&self, date: NaiveDate) -> NaiveDate {
        self.step(date, 1)
    }
}

/// plan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// payments outstanding, all mutations legal
    Active,
    /// balance fully paid
    Completed,
    /// written off after sustained non-payment
    Defaulted,
    /// voided by the business; no further payments accepted
    Cancelled,
}

impl PlanStatus {
    /// completed, defaulted and cancelled accept no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlanStatus::Active)
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
            PlanStatus::Defaulted => "defaulted",
            PlanStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// schedule entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Paid,
    Pending,
    Overdue,
}

/// sortable plan attributes for list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    PlanNumber,
    TotalAmount,
    NextPaymentDate,
}

/// sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// format a sequential plan number, e.g. INST-0042
pub fn format_plan_number(sequence: u32) -> String {
    format!("INST-{:04}", sequence)
}
