/// json state - plans and schedules round-trip through serde
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
        .customer(Uuid::new_v4(), "Asha Patel")
        .sale(Uuid::new_v4())
        .total_amount(Money::from_major(90_000))
        .first_payment(Money::from_major(30_000))
        .installments(3)
        .frequency(PaymentFrequency::Monthly)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()?;

    let plan = InstallmentPlan::create(terms, "INST-0001".to_string(), &time, &mut events)?;

    let json = serde_json::to_string_pretty(&plan)?;
    println!("{}", json);

    let restored: InstallmentPlan = serde_json::from_str(&json)?;
    assert_eq!(restored.balance_due, plan.balance_due);

    // the schedule is not persisted; regenerate it from the restored terms
    let schedule = restored.schedule(&time)?;
    println!("regenerated {} entries", schedule.len());

    Ok(())
}
