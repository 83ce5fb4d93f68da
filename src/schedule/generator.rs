use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PlanTerms;
use crate::decimal::Money;
use crate::errors::Result;
use crate::schedule::ScheduleEntry;
use crate::types::EntryStatus;

/// fully-dated, fully-amounted installment schedule
///
/// generation is a pure function of the terms plus the injected clock
/// used only for overdue derivation; identical inputs yield identical
/// schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub total_amount: Money,
    pub first_payment: Money,
}

impl InstallmentSchedule {
    /// generate the schedule for the given terms
    ///
    /// validates the terms itself rather than relying on caller
    /// discipline; the time provider supplies "today" for entry status
    pub fn generate(terms: &PlanTerms, time_provider: &SafeTimeProvider) -> Result<Self> {
        Self::generate_as_of(terms, time_provider.now().date_naive())
    }

    /// generate with an explicit "today"
    pub fn generate_as_of(terms: &PlanTerms, today: NaiveDate) -> Result<Self> {
        terms.validate()?;

        let remaining = terms.remaining_regular_installments();
        let financed = terms.total_amount - terms.first_payment;
        let mut entries = Vec::with_capacity(terms.number_of_installments as usize);

        // the first payment is collected at the point of sale and is
        // always settled at plan creation
        if terms.first_payment.is_positive() {
            entries.push(ScheduleEntry {
                number: 1,
                due_date: terms.plan_start_date,
                amount: terms.first_payment,
                status: EntryStatus::Paid,
            });
        }

        if remaining > 0 {
            // each installment floors to the cent; the residual lands on
            // the last non-overridden entry so amounts sum to the total
            // exactly
            let base = Money::from_decimal(
                (financed.as_decimal() / Decimal::from(remaining)).trunc_with_scale(2),
            );
            let residual_target = (0..remaining)
                .rev()
                .find(|i| !terms.overrides.amounts.contains_key(i));
            let default_sum = base * Decimal::from(remaining);
            let residual = financed - default_sum;

            let number_offset = if terms.first_payment.is_positive() { 2 } else { 1 };

            for i in 0..remaining {
                let due_date = match terms.overrides.dates.get(&i) {
                    Some(date) => *date,
                    None => terms.frequency.step(terms.next_payment_date, i),
                };

                let amount = match terms.overrides.amounts.get(&i) {
                    Some(amount) => *amount,
                    None if Some(i) == residual_target => base + residual,
                    None => base,
                };

                let status = if due_date < today {
                    EntryStatus::Overdue
                } else {
                    EntryStatus::Pending
                };

                entries.push(ScheduleEntry {
                    number: i + number_offset,
                    due_date,
                    amount,
                    status,
                });
            }
        }

        Ok(Self {
            entries,
            total_amount: terms.total_amount,
            first_payment: terms.first_payment,
        })
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// get entry by 1-based number
    pub fn get_entry(&self, number: u32) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    /// sum of all entry amounts
    pub fn total_scheduled(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// earliest entry not fully covered by an already-paid total
    ///
    /// walks entries in order accumulating amounts; drives the
    /// recomputation of a plan's next payment date after each payment
    pub fn next_unpaid_after(&self, paid_total: Money) -> Option<&ScheduleEntry> {
        let mut cumulative = Money::ZERO;
        for entry in &self.entries {
            cumulative += entry.amount;
            if cumulative > paid_total {
                return Some(entry);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlanTermsBuilder, ScheduleOverrides};
    use crate::types::PaymentFrequency;
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms(
        total: i64,
        first: i64,
        installments: u32,
        frequency: PaymentFrequency,
    ) -> PlanTerms {
        PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Asha Patel")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_major(total))
            .first_payment(Money::from_major(first))
            .installments(installments)
            .frequency(frequency)
            .start_date(ymd(2024, 1, 1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_monthly_with_first_payment() {
        let terms = terms(90_000, 30_000, 3, PaymentFrequency::Monthly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 3);

        let first = &schedule.entries[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.due_date, ymd(2024, 1, 1));
        assert_eq!(first.amount, Money::from_major(30_000));
        assert_eq!(first.status, EntryStatus::Paid);

        let second = &schedule.entries[1];
        assert_eq!(second.number, 2);
        assert_eq!(second.due_date, ymd(2024, 2, 1));
        assert_eq!(second.amount, Money::from_major(30_000));
        assert_eq!(second.status, EntryStatus::Pending);

        let third = &schedule.entries[2];
        assert_eq!(third.number, 3);
        assert_eq!(third.due_date, ymd(2024, 3, 1));
        assert_eq!(third.amount, Money::from_major(30_000));
        assert_eq!(third.status, EntryStatus::Pending);
    }

    #[test]
    fn test_weekly_without_first_payment() {
        let terms = terms(100_000, 0, 4, PaymentFrequency::Weekly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 4);
        for (i, entry) in schedule.entries.iter().enumerate() {
            assert_eq!(entry.number, i as u32 + 1);
            assert_eq!(entry.amount, Money::from_major(25_000));
            assert_eq!(entry.due_date, ymd(2024, 1, 8 + 7 * i as u32));
        }
    }

    #[test]
    fn test_amount_conservation_under_rounding() {
        // 100 across 3 installments does not divide evenly
        let terms = terms(100, 0, 3, PaymentFrequency::Monthly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(schedule.total_scheduled(), Money::from_major(100));
        assert_eq!(schedule.entries[0].amount, Money::from_str_exact("33.33").unwrap());
        assert_eq!(schedule.entries[1].amount, Money::from_str_exact("33.33").unwrap());
        assert_eq!(schedule.entries[2].amount, Money::from_str_exact("33.34").unwrap());
    }

    #[test]
    fn test_conservation_with_first_payment_and_rounding() {
        let terms = terms(1_000, 333, 7, PaymentFrequency::BiWeekly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule.total_scheduled(), Money::from_major(1_000));
        // all defaults equal except the last, which absorbs the residual
        let base = schedule.entries[1].amount;
        for entry in &schedule.entries[1..6] {
            assert_eq!(entry.amount, base);
        }
        assert!(schedule.entries[6].amount >= base);
    }

    #[test]
    fn test_overdue_status_derivation() {
        let terms = terms(100_000, 0, 4, PaymentFrequency::Weekly);
        // two due dates behind today
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 20)).unwrap();

        assert_eq!(schedule.entries[0].status, EntryStatus::Overdue); // jan 8
        assert_eq!(schedule.entries[1].status, EntryStatus::Overdue); // jan 15
        assert_eq!(schedule.entries[2].status, EntryStatus::Pending); // jan 22
        assert_eq!(schedule.entries[3].status, EntryStatus::Pending); // jan 29
    }

    #[test]
    fn test_idempotence() {
        let terms = terms(90_000, 30_000, 3, PaymentFrequency::Monthly);
        let a = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 15)).unwrap();
        let b = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 15)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_override_precedence_targets_single_entry() {
        let base_terms = terms(90_000, 0, 3, PaymentFrequency::Monthly);
        let overridden = PlanTermsBuilder::new()
            .customer(base_terms.customer_id, base_terms.customer_name.clone())
            .sale(base_terms.sale_id)
            .total_amount(base_terms.total_amount)
            .installments(3)
            .frequency(PaymentFrequency::Monthly)
            .start_date(ymd(2024, 1, 1))
            .overrides(
                ScheduleOverrides::none()
                    .with_date(1, ymd(2024, 3, 15))
                    .with_amount(1, Money::from_major(40_000)),
            )
            .build()
            .unwrap();

        let default = InstallmentSchedule::generate_as_of(&base_terms, ymd(2024, 1, 1)).unwrap();
        let edited = InstallmentSchedule::generate_as_of(&overridden, ymd(2024, 1, 1)).unwrap();

        // position 1 replaced
        assert_eq!(edited.entries[1].due_date, ymd(2024, 3, 15));
        assert_eq!(edited.entries[1].amount, Money::from_major(40_000));

        // position 0 untouched
        assert_eq!(edited.entries[0].due_date, default.entries[0].due_date);
        assert_eq!(edited.entries[0].amount, default.entries[0].amount);

        // position 2 keeps its default date
        assert_eq!(edited.entries[2].due_date, default.entries[2].due_date);
    }

    #[test]
    fn test_residual_skips_overridden_final_entry() {
        let overridden = PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Omar Farouk")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_major(100))
            .installments(3)
            .frequency(PaymentFrequency::Weekly)
            .start_date(ymd(2024, 1, 1))
            .overrides(ScheduleOverrides::none().with_amount(2, Money::from_major(40)))
            .build()
            .unwrap();

        let schedule = InstallmentSchedule::generate_as_of(&overridden, ymd(2024, 1, 1)).unwrap();

        // residual lands on the last non-overridden entry
        assert_eq!(schedule.entries[2].amount, Money::from_major(40));
        assert_eq!(schedule.entries[0].amount, Money::from_str_exact("33.33").unwrap());
        assert_eq!(schedule.entries[1].amount, Money::from_str_exact("33.34").unwrap());
    }

    #[test]
    fn test_degenerate_single_upfront_payment() {
        let terms = PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Li Wei")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_major(500))
            .first_payment(Money::from_major(500))
            .installments(1)
            .frequency(PaymentFrequency::Monthly)
            .start_date(ymd(2024, 1, 1))
            .build()
            .unwrap();

        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.entries[0].status, EntryStatus::Paid);
        assert_eq!(schedule.total_scheduled(), Money::from_major(500));
        assert!(schedule.next_unpaid_after(Money::from_major(500)).is_none());
    }

    #[test]
    fn test_ordering_and_nondecreasing_dates() {
        let terms = terms(75_000, 15_000, 6, PaymentFrequency::Monthly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        for pair in schedule.entries.windows(2) {
            assert!(pair[1].number == pair[0].number + 1);
            assert!(pair[1].due_date >= pair[0].due_date);
        }
    }

    #[test]
    fn test_next_unpaid_after() {
        let terms = terms(90_000, 30_000, 3, PaymentFrequency::Monthly);
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();

        // first payment already covered
        let next = schedule.next_unpaid_after(Money::from_major(30_000)).unwrap();
        assert_eq!(next.number, 2);

        let next = schedule.next_unpaid_after(Money::from_major(60_000)).unwrap();
        assert_eq!(next.number, 3);

        assert!(schedule.next_unpaid_after(Money::from_major(90_000)).is_none());
    }

    #[test]
    fn test_no_zero_amount_entries_at_cent_boundary() {
        // a financed amount below one cent per installment is rejected
        // rather than split into zero-amount entries
        let result = PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Sana Iqbal")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_minor(1))
            .installments(2)
            .frequency(PaymentFrequency::Weekly)
            .start_date(ymd(2024, 1, 1))
            .build();
        assert!(result.is_err());

        // the tightest legal split yields strictly positive amounts
        let terms = PlanTermsBuilder::new()
            .customer(Uuid::new_v4(), "Sana Iqbal")
            .sale(Uuid::new_v4())
            .total_amount(Money::from_minor(3))
            .installments(2)
            .frequency(PaymentFrequency::Weekly)
            .start_date(ymd(2024, 1, 1))
            .build()
            .unwrap();
        let schedule = InstallmentSchedule::generate_as_of(&terms, ymd(2024, 1, 1)).unwrap();
        assert!(schedule.entries.iter().all(|e| e.amount.is_positive()));
        assert_eq!(schedule.total_scheduled(), Money::from_minor(3));
    }

    #[test]
    fn test_generator_rejects_invalid_terms() {
        let mut bad = terms(90_000, 0, 3, PaymentFrequency::Monthly);
        bad.total_amount = Money::ZERO;
        assert!(InstallmentSchedule::generate_as_of(&bad, ymd(2024, 1, 1)).is_err());
    }
}
