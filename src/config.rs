use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decimal::Money;
use crate::errors::{PlanError, Result};
use crate::types::{CustomerId, PaymentFrequency, SaleId};

/// sparse per-installment edits replacing computed defaults
///
/// keys are 0-based regular-installment positions (the up-front first
/// payment, when present, is not overridable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOverrides {
    pub dates: BTreeMap<u32, NaiveDate>,
    pub amounts: BTreeMap<u32, Money>,
}

impl ScheduleOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.amounts.is_empty()
    }

    pub fn with_date(mut self, position: u32, date: NaiveDate) -> Self {
        self.dates.insert(position, date);
        self
    }

    pub fn with_amount(mut self, position: u32, amount: Money) -> Self {
        self.amounts.insert(position, amount);
        self
    }
}

/// the parameters a plan is created from
///
/// the schedule is fully regenerable from these terms; nothing derived
/// is stored here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTerms {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub sale_id: SaleId,

    /// full amount being financed (the sale total)
    pub total_amount: Money,
    /// optional up-front payment collected at the point of sale,
    /// counted as installment #1 when nonzero
    pub first_payment: Money,
    /// total count of payments, including the first payment if present
    pub number_of_installments: u32,
    pub frequency: PaymentFrequency,

    /// date the plan is created; due date of the first payment
    pub plan_start_date: NaiveDate,
    /// due date of the first regular installment
    pub next_payment_date: NaiveDate,

    /// applied externally on overdue detection, carried only
    pub late_fee_amount: Money,

    #[serde(default)]
    pub overrides: ScheduleOverrides,
}

impl PlanTerms {
    /// reject malformed terms before any schedule generation or external call
    pub fn validate(&self) -> Result<()> {
        if !self.total_amount.is_positive() {
            return Err(PlanError::validation(
                "total_amount",
                format!("must be positive, got {}", self.total_amount),
            ));
        }
        if self.first_payment.is_negative() {
            return Err(PlanError::validation(
                "first_payment",
                format!("must not be negative, got {}", self.first_payment),
            ));
        }
        if self.first_payment > self.total_amount {
            return Err(PlanError::validation(
                "first_payment",
                format!(
                    "must not exceed total amount {}, got {}",
                    self.total_amount, self.first_payment
                ),
            ));
        }
        if self.number_of_installments < 1 {
            return Err(PlanError::validation(
                "number_of_installments",
                "must be at least 1",
            ));
        }
        if self.late_fee_amount.is_negative() {
            return Err(PlanError::validation(
                "late_fee_amount",
                format!("must not be negative, got {}", self.late_fee_amount),
            ));
        }
        if self.next_payment_date < self.plan_start_date {
            return Err(PlanError::validation(
                "next_payment_date",
                format!(
                    "must not precede plan start date {}, got {}",
                    self.plan_start_date, self.next_payment_date
                ),
            ));
        }

        // a plan satisfied entirely by its first payment is legal, but only
        // when that payment actually settles the total
        let remaining = self.remaining_regular_installments();
        if remaining == 0 && self.first_payment != self.total_amount {
            return Err(PlanError::validation(
                "number_of_installments",
                format!(
                    "no regular installments remain but first payment {} does not settle total {}",
                    self.first_payment, self.total_amount
                ),
            ));
        }

        if remaining > 0 && self.first_payment == self.total_amount {
            return Err(PlanError::validation(
                "first_payment",
                format!(
                    "settles the total but {} regular installments remain with nothing to amortize",
                    remaining
                ),
            ));
        }

        // every regular installment must be at least one cent; a financed
        // amount below that cannot produce a fully-amounted schedule
        if remaining > 0 {
            let financed = self.total_amount - self.first_payment;
            if financed < Money::from_minor(remaining as i64) {
                return Err(PlanError::validation(
                    "total_amount",
                    format!(
                        "financed amount {} cannot fund {} installments of at least one cent each",
                        financed, remaining
                    ),
                ));
            }
        }

        for (&position, amount) in &self.overrides.amounts {
            if position >= remaining {
                return Err(PlanError::validation(
                    "overrides.amounts",
                    format!(
                        "position {} out of range for {} regular installments",
                        position, remaining
                    ),
                ));
            }
            if !amount.is_positive() {
                return Err(PlanError::validation(
                    "overrides.amounts",
                    format!("amount at position {} must be positive, got {}", position, amount),
                ));
            }
        }
        for &position in self.overrides.dates.keys() {
            if position >= remaining {
                return Err(PlanError::validation(
                    "overrides.dates",
                    format!(
                        "position {} out of range for {} regular installments",
                        position, remaining
                    ),
                ));
            }
        }

        Ok(())
    }

    /// count of regular installments after the up-front first payment
    ///
    /// `number_of_installments` includes the first payment when one is
    /// present; keeping this in one place avoids off-by-one drift
    /// between preview and persisted schedules
    pub fn remaining_regular_installments(&self) -> u32 {
        if self.first_payment.is_positive() {
            self.number_of_installments.saturating_sub(1)
        } else {
            self.number_of_installments
        }
    }

    /// default first regular due date: one frequency step after start
    pub fn default_next_payment_date(
        start: NaiveDate,
        frequency: PaymentFrequency,
    ) -> NaiveDate {
        frequency.next_after(start)
    }
}

/// builder for plan terms
#[derive(Debug, Clone, Default)]
pub struct PlanTermsBuilder {
    customer_id: Option<CustomerId>,
    customer_name: Option<String>,
    sale_id: Option<SaleId>,
    total_amount: Option<Money>,
    first_payment: Money,
    number_of_installments: Option<u32>,
    frequency: Option<PaymentFrequency>,
    plan_start_date: Option<NaiveDate>,
    next_payment_date: Option<NaiveDate>,
    late_fee_amount: Money,
    overrides: ScheduleOverrides,
}

impl PlanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(mut self, id: CustomerId, name: impl Into<String>) -> Self {
        self.customer_id = Some(id);
        self.customer_name = Some(name.into());
        self
    }

    pub fn sale(mut self, id: SaleId) -> Self {
        self.sale_id = Some(id);
        self
    }

    pub fn total_amount(mut self, amount: Money) -> Self {
        self.total_amount = Some(amount);
        self
    }

    pub fn first_payment(mut self, amount: Money) -> Self {
        self.first_payment = amount;
        self
    }

    pub fn installments(mut self, count: u32) -> Self {
        self.number_of_installments = Some(count);
        self
    }

    pub fn frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.plan_start_date = Some(date);
        self
    }

    pub fn next_payment_date(mut self, date: NaiveDate) -> Self {
        self.next_payment_date = Some(date);
        self
    }

    pub fn late_fee(mut self, amount: Money) -> Self {
        self.late_fee_amount = amount;
        self
    }

    pub fn overrides(mut self, overrides: ScheduleOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// build and validate the terms
    pub fn build(self) -> Result<PlanTerms> {
        let customer_id = self
            .customer_id
            .ok_or(PlanError::validation("customer_id", "is required"))?;
        let customer_name = self
            .customer_name
            .ok_or(PlanError::validation("customer_name", "is required"))?;
        let sale_id = self
            .sale_id
            .ok_or(PlanError::validation("sale_id", "is required"))?;
        let total_amount = self
            .total_amount
            .ok_or(PlanError::validation("total_amount", "is required"))?;
        let number_of_installments = self
            .number_of_installments
            .ok_or(PlanError::validation("number_of_installments", "is required"))?;
        let frequency = self
            .frequency
            .ok_or(PlanError::validation("frequency", "is required"))?;
        let plan_start_date = self
            .plan_start_date
            .ok_or(PlanError::validation("plan_start_date", "is required"))?;

        let next_payment_date = self.next_payment_date.unwrap_or_else(|| {
            PlanTerms::default_next_payment_date(plan_start_date, frequency)
        });

        let terms = PlanTerms {
            customer_id,
            customer_name,
            sale_id,
            total_amount,
            first_payment: self.first_payment,
            number_of_installments,
            frequency,
            plan_start_date,
            next_payment_date,
            late_fee_amount: self.late_fee_amount,
            overrides: self.overrides,
        };

        terms.validate()?;
        Ok(terms)
    }
}
