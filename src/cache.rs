use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::plan::InstallmentPlan;
use crate::query::{PlanFilter, PlanQuery, PlanView};

/// plan collection cache with an explicit staleness flag
///
/// the cached copy is served instantly while a background refetch runs;
/// `view` always applies the filter it is handed at call time, so a
/// refresh that lands after the user re-filters can never resurrect the
/// filter state captured when the refresh was issued
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: Vec<InstallmentPlan>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// whether a refresh has been requested or no fetch has happened yet
    pub fn is_stale(&self) -> bool {
        self.stale || self.fetched_at.is_none()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// flag the cached copy as outdated without dropping it
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// replace the cached collection with freshly fetched data
    pub fn replace(&mut self, fresh: Vec<InstallmentPlan>, time_provider: &SafeTimeProvider) {
        self.plans = fresh;
        self.fetched_at = Some(time_provider.now());
        self.stale = false;
    }

    /// filtered, sorted view over the current data with the current filter
    pub fn view<'a>(
        &'a self,
        filter: &PlanFilter,
        time_provider: &SafeTimeProvider,
    ) -> PlanView<'a> {
        PlanQuery::run(&self.plans, filter, time_provider)
    }
}
