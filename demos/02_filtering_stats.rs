/// filtering and stats - drive a plan list view from one query call
use chrono::{NaiveDate, TimeZone, Utc};
use installment_plan_rs::{
    EventStore, InstallmentPlan, Money, PaymentFrequency, PlanFilter, PlanQuery,
    PlanTermsBuilder, SafeTimeProvider, SortDirection, SortKey, TimeSource, Uuid,
};

fn plan(
    name: &str,
    number: &str,
    total: i64,
    time: &SafeTimeProvider,
) -> InstallmentPlan {
    let terms = PlanTermsBuilder::new()
        .customer(Uuid::new_v4(), name)
        .sale(Uuid::new_v4())
        .total_amount(Money::from_major(total))
        .installments(4)
        .frequency(PaymentFrequency::Monthly)
        .start_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .build()
        .unwrap();

    let mut events = EventStore::new();
    InstallmentPlan::create(terms, number.to_string(), time, &mut events).unwrap()
}

fn main() {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));

    let plans = vec![
        plan("Maria Santos", "INST-0001", 50_000, &time),
        plan("Mario Rossi", "INST-0002", 75_000, &time),
        plan("Chen Wei", "INST-0003", 25_000, &time),
    ];

    let filter = PlanFilter::default()
        .with_query("mari")
        .sorted_by(SortKey::TotalAmount, SortDirection::Descending);

    let view = PlanQuery::run(&plans, &filter, &time);

    for plan in &view.plans {
        println!(
            "{} {} total {}",
            plan.plan_number, plan.terms.customer_name, plan.terms.total_amount
        );
    }
    println!(
        "total {} active {} value {} balance {}",
        view.stats.total, view.stats.active, view.stats.total_value, view.stats.total_balance_due
    );
}
