pub mod cache;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod plan;
pub mod query;
pub mod saga;
pub mod schedule;
pub mod services;
pub mod types;

// re-export key types
pub use cache::PlanCache;
pub use config::{PlanTerms, PlanTermsBuilder, ScheduleOverrides};
pub use decimal::Money;
pub use errors::{PlanError, Result};
pub use events::{Event, EventStore};
pub use plan::InstallmentPlan;
pub use query::{PlanFilter, PlanQuery, PlanStats, PlanView};
pub use saga::{BulkOutcome, CheckoutOutcome, CheckoutSaga, cancel_plans, send_reminders};
pub use schedule::{InstallmentSchedule, ScheduleEntry};
pub use services::{
    FinanceAccountService, InstallmentService, PaymentAccount, SaleInput, SaleLineItem,
    SaleRecord, SaleService, StockLevel, StockService,
};
pub use types::{
    CustomerId, EntryStatus, PaymentFrequency, PlanId, PlanStatus, SaleId, SortDirection,
    SortKey, format_plan_number,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
