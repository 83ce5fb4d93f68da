pub mod filter;
pub mod stats;

use hourglass_rs::SafeTimeProvider;

use crate::plan::InstallmentPlan;

pub use filter::PlanFilter;
pub use stats::PlanStats;

/// a filtered, sorted view of a plan collection together with the
/// statistics computed over that same set
///
/// stats are never derived from a different set than the list shown,
/// so counts cannot silently disagree with the rows
#[derive(Debug, Clone)]
pub struct PlanView<'a> {
    pub plans: Vec<&'a InstallmentPlan>,
    pub stats: PlanStats,
}

/// single entry point for list views
pub struct PlanQuery;

impl PlanQuery {
    /// apply the filter, sort the result, and compute stats over it
    pub fn run<'a>(
        plans: &'a [InstallmentPlan],
        filter: &PlanFilter,
        time_provider: &SafeTimeProvider,
    ) -> PlanView<'a> {
        let mut matched: Vec<&InstallmentPlan> =
            plans.iter().filter(|p| filter.matches(p)).collect();
        filter.sort(&mut matched);

        let stats = PlanStats::compute(&matched, time_provider);

        PlanView { plans: matched, stats }
    }
}
