use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PlanTerms;
use crate::decimal::Money;
use crate::errors::{PlanError, Result};
use crate::events::{Event, EventStore};
use crate::schedule::InstallmentSchedule;
use crate::types::{PlanId, PlanStatus};

/// persisted installment plan record
///
/// the schedule itself is not stored; it is regenerable from the terms
/// plus any per-entry overrides they carry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: PlanId,
    pub plan_number: String,
    pub terms: PlanTerms,

    pub status: PlanStatus,
    pub total_paid: Money,
    pub balance_due: Money,
    pub next_payment_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
    pub payment_count: u32,
    pub last_payment_amount: Option<Money>,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl InstallmentPlan {
    /// create a plan from validated terms
    ///
    /// the first payment, when present, is collected at the point of
    /// sale and is seeded as already paid; a plan whose first payment
    /// settles the total completes immediately
    pub fn create(
        terms: PlanTerms,
        plan_number: String,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Self> {
        terms.validate()?;

        let now = time_provider.now();
        let schedule = InstallmentSchedule::generate(&terms, time_provider)?;

        let total_paid = terms.first_payment;
        let balance_due = terms.total_amount - total_paid;
        let next_payment_date = schedule
            .next_unpaid_after(total_paid)
            .map(|entry| entry.due_date);

        let mut plan = Self {
            id: Uuid::new_v4(),
            plan_number,
            status: PlanStatus::Active,
            total_paid,
            balance_due,
            next_payment_date,
            created_at: now,
            last_status_change: now,
            payment_count: if terms.first_payment.is_positive() { 1 } else { 0 },
            last_payment_amount: if terms.first_payment.is_positive() {
                Some(terms.first_payment)
            } else {
                None
            },
            last_payment_date: if terms.first_payment.is_positive() {
                Some(now)
            } else {
                None
            },
            terms,
        };

        events.emit(Event::PlanCreated {
            plan_id: plan.id,
            plan_number: plan.plan_number.clone(),
            total_amount: plan.terms.total_amount,
            first_payment: plan.terms.first_payment,
            number_of_installments: plan.terms.number_of_installments,
            timestamp: now,
        });

        if plan.balance_due.is_zero() {
            plan.transition(PlanStatus::Completed, "settled by first payment", now, events);
            events.emit(Event::PlanCompleted {
                plan_id: plan.id,
                total_paid: plan.total_paid,
                timestamp: now,
            });
        }

        Ok(plan)
    }

    /// regenerate the schedule from stored terms and overrides
    pub fn schedule(&self, time_provider: &SafeTimeProvider) -> Result<InstallmentSchedule> {
        InstallmentSchedule::generate(&self.terms, time_provider)
    }

    /// record a payment against the plan
    ///
    /// legal only while active; the balance invariant
    /// `balance_due = total_amount - total_paid` holds on return, and
    /// the next payment date is recomputed from the schedule. a payment
    /// that clears the balance completes the plan
    pub fn record_payment(
        &mut self,
        amount: Money,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        self.guard(PlanStatus::Active, "record a payment against")?;

        if !amount.is_positive() {
            return Err(PlanError::InvalidPaymentAmount { amount });
        }
        if amount > self.balance_due {
            return Err(PlanError::PaymentExceedsBalance {
                balance: self.balance_due,
                amount,
            });
        }

        let now = time_provider.now();
        self.total_paid += amount;
        self.balance_due = self.terms.total_amount - self.total_paid;
        self.payment_count += 1;
        self.last_payment_amount = Some(amount);
        self.last_payment_date = Some(now);

        let schedule = self.schedule(time_provider)?;
        self.next_payment_date = schedule
            .next_unpaid_after(self.total_paid)
            .map(|entry| entry.due_date);

        events.emit(Event::PaymentRecorded {
            plan_id: self.id,
            amount,
            new_total_paid: self.total_paid,
            new_balance_due: self.balance_due,
            next_payment_date: self.next_payment_date,
            timestamp: now,
        });

        if self.balance_due.is_zero() {
            self.transition(PlanStatus::Completed, "balance fully paid", now, events);
            events.emit(Event::PlanCompleted {
                plan_id: self.id,
                total_paid: self.total_paid,
                timestamp: now,
            });
        }

        Ok(())
    }

    /// cancel the plan
    ///
    /// deletion is modeled as cancellation; terminal plans reject the
    /// attempt without touching status
    pub fn cancel(
        &mut self,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        self.guard(PlanStatus::Active, "cancel")?;

        let now = time_provider.now();
        let balance = self.balance_due;
        self.transition(PlanStatus::Cancelled, "cancelled by operator", now, events);

        events.emit(Event::PlanCancelled {
            plan_id: self.id,
            balance_at_cancellation: balance,
            timestamp: now,
        });

        Ok(())
    }

    /// mark the plan defaulted
    ///
    /// the overdue threshold that justifies this is an external
    /// business rule; the caller supplies the reason
    pub fn mark_defaulted(
        &mut self,
        reason: impl Into<String>,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        self.guard(PlanStatus::Active, "default")?;

        let now = time_provider.now();
        let reason = reason.into();
        let balance = self.balance_due;
        self.transition(PlanStatus::Defaulted, &reason, now, events);

        events.emit(Event::PlanDefaulted {
            plan_id: self.id,
            balance_written_off: balance,
            reason,
            timestamp: now,
        });

        Ok(())
    }

    /// emit a payment reminder
    ///
    /// pure notification side effect; does not change state
    pub fn send_reminder(
        &self,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        self.guard(PlanStatus::Active, "remind about")?;

        events.emit(Event::ReminderSent {
            plan_id: self.id,
            next_payment_date: self.next_payment_date,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// whether the next payment is overdue as of the given day
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == PlanStatus::Active
            && self.next_payment_date.map(|due| due < today).unwrap_or(false)
    }

    /// days past the next payment date, zero when current
    pub fn days_past_due(&self, today: NaiveDate) -> u32 {
        match self.next_payment_date {
            Some(due) if self.status == PlanStatus::Active && due < today => {
                (today - due).num_days() as u32
            }
            _ => 0,
        }
    }

    fn guard(&self, required: PlanStatus, operation: &'static str) -> Result<()> {
        if self.status != required {
            return Err(PlanError::InvalidTransition {
                current: self.status,
                operation,
            });
        }
        Ok(())
    }

    fn transition(
        &mut self,
        new_status: PlanStatus,
        reason: &str,
        timestamp: DateTime<Utc>,
        events: &mut EventStore,
    ) {
        let old_status = self.status;
        self.status = new_status;
        self.last_status_change = timestamp;

        events.emit(Event::StatusChanged {
            plan_id: self.id,
            old_status,
            new_status,
            reason: reason.to_string(),
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanTermsBuilder;
    use crate::types::PaymentFrequency;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn test_plan(total: i64, first: i64, installments: u32) -> (InstallmentPlan, EventStore) {
        let terms = PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Nadia Osei")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_major(total))
            .first_payment(Money::from_major(first))
            .installments(installments)
            .frequency(PaymentFrequency::Monthly)
            .start_date(ymd(2024, 1, 1))
            .build()
            .unwrap();

        let mut events = EventStore::new();
        let plan = InstallmentPlan::create(
            terms,
            "INST-0001".to_string(),
            &test_time(),
            &mut events,
        )
        .unwrap();
        (plan, events)
    }

    #[test]
    fn test_creation_seeds_first_payment() {
        let (plan, mut events) = test_plan(90_000, 30_000, 3);

        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(plan.total_paid, Money::from_major(30_000));
        assert_eq!(plan.balance_due, Money::from_major(60_000));
        assert_eq!(plan.next_payment_date, Some(ymd(2024, 2, 1)));
        assert_eq!(plan.payment_count, 1);

        let emitted = events.take_events();
        assert!(matches!(emitted[0], Event::PlanCreated { .. }));
    }

    #[test]
    fn test_payment_advances_next_due_and_completes() {
        let (mut plan, mut events) = test_plan(90_000, 30_000, 3);
        let time = test_time();

        plan.record_payment(Money::from_major(30_000), &time, &mut events)
            .unwrap();
        assert_eq!(plan.balance_due, Money::from_major(30_000));
        assert_eq!(plan.next_payment_date, Some(ymd(2024, 3, 1)));

        plan.record_payment(Money::from_major(30_000), &time, &mut events)
            .unwrap();
        assert_eq!(plan.balance_due, Money::ZERO);
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.next_payment_date, None);

        let emitted = events.take_events();
        assert!(emitted.iter().any(|e| matches!(e, Event::PlanCompleted { .. })));
    }

    #[test]
    fn test_balance_invariant_after_every_payment() {
        let (mut plan, mut events) = test_plan(1_000, 100, 10);
        let time = test_time();

        for _ in 0..5 {
            plan.record_payment(Money::from_major(100), &time, &mut events)
                .unwrap();
            assert_eq!(
                plan.balance_due,
                plan.terms.total_amount - plan.total_paid
            );
        }
    }

    #[test]
    fn test_rejects_overpayment_and_non_positive() {
        let (mut plan, mut events) = test_plan(90_000, 30_000, 3);
        let time = test_time();

        let err = plan
            .record_payment(Money::from_major(70_000), &time, &mut events)
            .unwrap_err();
        assert!(matches!(err, PlanError::PaymentExceedsBalance { .. }));

        let err = plan
            .record_payment(Money::ZERO, &time, &mut events)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidPaymentAmount { .. }));

        // failed attempts leave the balances untouched
        assert_eq!(plan.total_paid, Money::from_major(30_000));
        assert_eq!(plan.balance_due, Money::from_major(60_000));
    }

    #[test]
    fn test_terminal_states_reject_all_transitions() {
        let (mut plan, mut events) = test_plan(90_000, 30_000, 3);
        let time = test_time();

        plan.cancel(&time, &mut events).unwrap();
        assert_eq!(plan.status, PlanStatus::Cancelled);

        let err = plan.cancel(&time, &mut events).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidTransition { current: PlanStatus::Cancelled, .. }
        ));

        let err = plan
            .record_payment(Money::from_major(100), &time, &mut events)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidTransition { .. }));

        let err = plan
            .mark_defaulted("90 days past due", &time, &mut events)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidTransition { .. }));

        let err = plan.send_reminder(&time, &mut events).unwrap_err();
        assert!(matches!(err, PlanError::InvalidTransition { .. }));

        // status never corrupted by rejected attempts
        assert_eq!(plan.status, PlanStatus::Cancelled);
    }

    #[test]
    fn test_cancel_completed_plan_fails() {
        let (mut plan, mut events) = test_plan(500, 500, 1);
        assert_eq!(plan.status, PlanStatus::Completed);

        let err = plan.cancel(&test_time(), &mut events).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidTransition { current: PlanStatus::Completed, .. }
        ));
        assert_eq!(plan.status, PlanStatus::Completed);
    }

    #[test]
    fn test_mark_defaulted() {
        let (mut plan, mut events) = test_plan(90_000, 0, 3);
        let time = test_time();

        plan.mark_defaulted("missed three consecutive payments", &time, &mut events)
            .unwrap();
        assert_eq!(plan.status, PlanStatus::Defaulted);

        let emitted = events.take_events();
        assert!(emitted.iter().any(|e| matches!(
            e,
            Event::PlanDefaulted { balance_written_off, .. }
                if *balance_written_off == Money::from_major(90_000)
        )));
    }

    #[test]
    fn test_reminder_does_not_change_state() {
        let (plan, mut events) = test_plan(90_000, 30_000, 3);
        let status_before = plan.status;
        let paid_before = plan.total_paid;

        plan.send_reminder(&test_time(), &mut events).unwrap();

        assert_eq!(plan.status, status_before);
        assert_eq!(plan.total_paid, paid_before);
        assert!(matches!(
            events.take_events().last(),
            Some(Event::ReminderSent { .. })
        ));
    }

    #[test]
    fn test_overdue_detection() {
        let (plan, _) = test_plan(90_000, 30_000, 3);

        assert!(!plan.is_overdue(ymd(2024, 1, 15)));
        assert!(plan.is_overdue(ymd(2024, 2, 2)));
        assert_eq!(plan.days_past_due(ymd(2024, 2, 11)), 10);
        assert_eq!(plan.days_past_due(ymd(2024, 1, 15)), 0);
    }

    #[test]
    fn test_degenerate_plan_completes_on_creation() {
        let (plan, mut events) = test_plan(500, 500, 1);

        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.balance_due, Money::ZERO);
        assert_eq!(plan.next_payment_date, None);

        let emitted = events.take_events();
        assert!(emitted.iter().any(|e| matches!(e, Event::PlanCompleted { .. })));
    }
}
