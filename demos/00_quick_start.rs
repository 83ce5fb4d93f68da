/// quick start - preview an installment schedule before submitting a plan
use chrono::NaiveDate;
use installment_plan_rs::{
    InstallmentSchedule, Money, PaymentFrequency, PlanTermsBuilder, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a 90,000 sale: 30,000 down, the rest across two monthly payments
    let terms = PlanTermsBuilder::new()
        .customer(Uuid::new_v4(), "Jane Doe")
        .sale(Uuid::new_v4())
        .total_amount(Money::from_major(90_000))
        .first_payment(Money::from_major(30_000))
        .installments(3)
        .frequency(PaymentFrequency::Monthly)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()?;

    let schedule =
        InstallmentSchedule::generate_as_of(&terms, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())?;

    for entry in &schedule.entries {
        println!(
            "#{} due {} amount {} ({:?})",
            entry.number, entry.due_date, entry.amount, entry.status
        );
    }
    println!("total scheduled: {}", schedule.total_scheduled());

    Ok(())
}
