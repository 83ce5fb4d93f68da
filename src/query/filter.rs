use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::plan::InstallmentPlan;
use crate::types::{PlanStatus, SortDirection, SortKey};

/// session-scoped filter and sort state for plan list views
///
/// all set conditions are AND'ed; an unset condition passes everything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFilter {
    /// case-insensitive substring match against customer name or plan number
    pub query: Option<String>,
    /// `None` means all statuses
    pub status: Option<PlanStatus>,
    /// inclusive creation-date range
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for PlanFilter {
    fn default() -> Self {
        Self {
            query: None,
            status: None,
            date_from: None,
            date_to: None,
            sort_key: SortKey::CreatedAt,
            sort_direction: SortDirection::Descending,
        }
    }
}

impl PlanFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_status(mut self, status: PlanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }

    /// whether the plan passes every set condition
    pub fn matches(&self, plan: &InstallmentPlan) -> bool {
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            let name_hit = plan.terms.customer_name.to_lowercase().contains(&needle);
            let number_hit = plan.plan_number.to_lowercase().contains(&needle);
            if !name_hit && !number_hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if plan.status != status {
                return false;
            }
        }

        let created = plan.created_at.date_naive();
        if let Some(from) = self.date_from {
            if created < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if created > to {
                return false;
            }
        }

        true
    }

    /// stable sort by the selected key and direction
    ///
    /// plans without a next payment date sort as epoch
    pub fn sort(&self, plans: &mut [&InstallmentPlan]) {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        plans.sort_by(|a, b| {
            let ordering = match self.sort_key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::PlanNumber => a.plan_number.cmp(&b.plan_number),
                SortKey::TotalAmount => a.terms.total_amount.cmp(&b.terms.total_amount),
                SortKey::NextPaymentDate => a
                    .next_payment_date
                    .unwrap_or(epoch)
                    .cmp(&b.next_payment_date.unwrap_or(epoch)),
            };
            match self.sort_direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}
