/// plan lifecycle - payments through to completion, then a rejected cancel
use chrono::{NaiveDate, TimeZone, Utc};
use installment_plan_rs::{
    EventStore, InstallmentPlan, Money, PaymentFrequency, PlanTermsBuilder, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    ));
    let mut events = EventStore::new();

    let terms = PlanTermsBuilder::new()
        .customer(Uuid::new_v4(), "Omar Farouk")
        .sale(Uuid::new_v4())
        .total_amount(Money::from_major(100_000))
        .installments(4)
        .frequency(PaymentFrequency::Weekly)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()?;

    let mut plan = InstallmentPlan::create(terms, "INST-0001".to_string(), &time, &mut events)?;
    println!("created {} status {}", plan.plan_number, plan.status);

    // four weekly payments of 25,000
    for _ in 0..4 {
        plan.record_payment(Money::from_major(25_000), &time, &mut events)?;
        println!(
            "paid: total {} balance {} next {:?}",
            plan.total_paid, plan.balance_due, plan.next_payment_date
        );
    }
    println!("final status {}", plan.status);

    // completed plans reject further transitions
    match plan.cancel(&time, &mut events) {
        Err(e) => println!("cancel rejected: {}", e),
        Ok(()) => unreachable!(),
    }

    for event in events.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
