use chrono::Duration;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::plan::InstallmentPlan;
use crate::types::PlanStatus;

/// summary statistics over a filtered plan set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub defaulted: usize,
    pub cancelled: usize,

    pub total_value: Money,
    pub total_paid: Money,
    pub total_balance_due: Money,

    /// active plans whose next payment date has passed
    pub overdue_count: usize,
    /// active plans due within 7 days of now, inclusive
    pub due_this_week: usize,
    /// active plans due within 30 days of now, inclusive
    pub due_this_month: usize,
}

impl PlanStats {
    /// compute stats over exactly the plans given
    ///
    /// callers pass the already-filtered set so counts agree with the
    /// rows they are shown next to
    pub fn compute(plans: &[&InstallmentPlan], time_provider: &SafeTimeProvider) -> Self {
        let today = time_provider.now().date_naive();
        let week_end = today + Duration::days(7);
        let month_end = today + Duration::days(30);

        let mut stats = PlanStats {
            total: plans.len(),
            ..Default::default()
        };

        for plan in plans {
            match plan.status {
                PlanStatus::Active => stats.active += 1,
                PlanStatus::Completed => stats.completed += 1,
                PlanStatus::Defaulted => stats.defaulted += 1,
                PlanStatus::Cancelled => stats.cancelled += 1,
            }

            stats.total_value += plan.terms.total_amount;
            stats.total_paid += plan.total_paid;
            stats.total_balance_due += plan.balance_due;

            if plan.status == PlanStatus::Active {
                if let Some(due) = plan.next_payment_date {
                    if due < today {
                        stats.overdue_count += 1;
                    }
                    if due >= today && due <= week_end {
                        stats.due_this_week += 1;
                    }
                    if due >= today && due <= month_end {
                        stats.due_this_month += 1;
                    }
                }
            }
        }

        stats
    }
}
