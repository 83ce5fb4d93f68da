use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{PlanId, PlanStatus};

/// all events that can be emitted by a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    PlanCreated {
        plan_id: PlanId,
        plan_number: String,
        total_amount: Money,
        first_payment: Money,
        number_of_installments: u32,
        timestamp: DateTime<Utc>,
    },
    PlanCompleted {
        plan_id: PlanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    PlanCancelled {
        plan_id: PlanId,
        balance_at_cancellation: Money,
        timestamp: DateTime<Utc>,
    },
    PlanDefaulted {
        plan_id: PlanId,
        balance_written_off: Money,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        plan_id: PlanId,
        amount: Money,
        new_total_paid: Money,
        new_balance_due: Money,
        next_payment_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },
    ReminderSent {
        plan_id: PlanId,
        next_payment_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        plan_id: PlanId,
        old_status: PlanStatus,
        new_status: PlanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
