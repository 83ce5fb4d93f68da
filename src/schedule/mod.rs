pub mod generator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::EntryStatus;

pub use generator::InstallmentSchedule;

/// a single dated, amounted installment in a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based sequence position
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: EntryStatus,
}

impl ScheduleEntry {
    pub fn is_paid(&self) -> bool {
        self.status == EntryStatus::Paid
    }

    pub fn is_overdue(&self) -> bool {
        self.status == EntryStatus::Overdue
    }
}
