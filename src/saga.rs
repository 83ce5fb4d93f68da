use crate::config::PlanTerms;
use crate::errors::{PlanError, Result};
use crate::plan::InstallmentPlan;
use crate::services::{InstallmentService, SaleInput, SaleRecord, SaleService};
use crate::types::PlanId;

/// outcome of the two-step checkout: the created sale and its linked plan
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub sale: SaleRecord,
    pub plan: InstallmentPlan,
}

/// two-step checkout orchestration: create the sale, then the linked plan
///
/// the steps are sequenced and their failures are distinguishable. when
/// the plan step fails the sale already exists; the error carries the
/// orphaned sale so the caller can surface the partial state instead of
/// silently discarding it
pub struct CheckoutSaga;

impl CheckoutSaga {
    pub fn execute<S, I>(
        sale_input: &SaleInput,
        mut terms: PlanTerms,
        sale_service: &mut S,
        installment_service: &mut I,
    ) -> Result<CheckoutOutcome>
    where
        S: SaleService,
        I: InstallmentService,
    {
        // validation happens before any external side effect; an invalid
        // plan must never leave a sale behind
        terms.validate()?;

        let sale = sale_service
            .create_sale(sale_input)
            .map_err(|e| PlanError::SaleCreationFailed {
                message: e.to_string(),
            })?;

        terms.sale_id = sale.id;

        let plan = installment_service
            .create_plan(&terms)
            .map_err(|e| PlanError::PlanCreationFailed {
                sale_id: sale.id,
                sale_number: sale.sale_number.clone(),
                message: e.to_string(),
            })?;

        Ok(CheckoutOutcome { sale, plan })
    }
}

/// per-item result tally for a bulk operation
///
/// items run independently; one failure never aborts siblings
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<(PlanId, PlanError)>,
}

impl BulkOutcome {
    pub fn is_all_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, id: PlanId, result: Result<()>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(e) => {
                self.failed += 1;
                self.failures.push((id, e));
            }
        }
    }
}

/// cancel each plan independently, reporting a per-item tally
pub fn cancel_plans<I: InstallmentService>(
    plan_ids: &[PlanId],
    service: &mut I,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for &id in plan_ids {
        let result = service.cancel_plan(id);
        outcome.record(id, result);
    }
    outcome
}

/// send a reminder for each plan independently
pub fn send_reminders<I: InstallmentService>(
    plan_ids: &[PlanId],
    service: &mut I,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for &id in plan_ids {
        let result = service.send_payment_reminder(id);
        outcome.record(id, result);
    }
    outcome
}
