/// checkout saga - sale then plan, with step-attributed failures
use chrono::{NaiveDate, TimeZone, Utc};
use installment_plan_rs::{
    CheckoutSaga, EventStore, InstallmentPlan, InstallmentService, Money, PaymentFrequency,
    PlanError, PlanId, PlanTerms, PlanTermsBuilder, SafeTimeProvider, SaleInput, SaleRecord,
    SaleService, TimeSource, Uuid,
};

struct DemoSaleService;

impl SaleService for DemoSaleService {
    fn create_sale(&mut self, input: &SaleInput) -> installment_plan_rs::Result<SaleRecord> {
        println!("creating sale for {}", input.total_amount);
        Ok(SaleRecord {
            id: Uuid::new_v4(),
            sale_number: "SALE-0117".to_string(),
        })
    }
}

struct DemoInstallmentService {
    fail: bool,
}

impl InstallmentService for DemoInstallmentService {
    fn create_plan(&mut self, terms: &PlanTerms) -> installment_plan_rs::Result<InstallmentPlan> {
        if self.fail {
            return Err(PlanError::Upstream {
                message: "plan persistence unavailable".to_string(),
            });
        }
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        ));
        let mut events = EventStore::new();
        InstallmentPlan::create(terms.clone(), "INST-0117".to_string(), &time, &mut events)
    }

    fn cancel_plan(&mut self, _plan_id: PlanId) -> installment_plan_rs::Result<()> {
        Ok(())
    }

    fn send_payment_reminder(&mut self, _plan_id: PlanId) -> installment_plan_rs::Result<()> {
        Ok(())
    }

    fn all_plans(&self) -> installment_plan_rs::Result<Vec<InstallmentPlan>> {
        Ok(Vec::new())
    }
}

fn terms() -> PlanTerms {
    PlanTermsBuilder::new()
        .customer(Uuid::new_v4(), "Li Wei")
        .sale(Uuid::new_v4())
        .total_amount(Money::from_major(60_000))
        .first_payment(Money::from_major(20_000))
        .installments(3)
        .frequency(PaymentFrequency::BiWeekly)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()
        .unwrap()
}

fn main() {
    let sale_input = SaleInput {
        customer_id: Uuid::new_v4(),
        total_amount: Money::from_major(60_000),
        line_items: Vec::new(),
    };

    // happy path: plan linked to the created sale
    let mut sales = DemoSaleService;
    let mut plans = DemoInstallmentService { fail: false };
    let outcome = CheckoutSaga::execute(&sale_input, terms(), &mut sales, &mut plans).unwrap();
    println!(
        "sale {} -> plan {}",
        outcome.sale.sale_number, outcome.plan.plan_number
    );

    // plan step fails: the error names the step and carries the orphaned sale
    let mut failing = DemoInstallmentService { fail: true };
    match CheckoutSaga::execute(&sale_input, terms(), &mut sales, &mut failing) {
        Err(PlanError::PlanCreationFailed { sale_number, message, .. }) => {
            println!("plan step failed after sale {} existed: {}", sale_number, message);
        }
        other => println!("unexpected outcome: {:?}", other.is_ok()),
    }
}
