//! Cohort statistics over profiled accounts.

use tracing::warn;

use crate::application::profile_builder::ProfileMap;
use crate::domain::values::cohort::{fallback, CohortStats, MetricSummary};

/// Compute normalization bounds over every profiled account.
///
/// Cycle time only counts accounts that have a cycle-time sample, and deal
/// size only counts accounts with a positive largest deal. A metric with no
/// contributing accounts falls back to fixed defaults so the scorer never
/// divides by zero.
pub fn compute_cohort_stats(profiles: &ProfileMap) -> CohortStats {
    if profiles.is_empty() {
        warn!("No profiled accounts; cohort stats fall back to defaults");
        return CohortStats::default();
    }

    let win_rates: Vec<f64> = profiles
        .values()
        .filter(|p| p.closed_won > 0)
        .map(|p| p.win_rate)
        .collect();
    let days_to_close: Vec<f64> = profiles
        .values()
        .filter(|p| p.has_cycle_sample())
        .map(|p| p.avg_days_to_close)
        .collect();
    let largest_deals: Vec<f64> = profiles
        .values()
        .filter(|p| p.largest_deal_amount > 0.0)
        .map(|p| p.largest_deal_amount)
        .collect();
    let product_counts: Vec<f64> = profiles.values().map(|p| p.product_count as f64).collect();

    CohortStats {
        win_rate: MetricSummary::from_values(&win_rates).unwrap_or(fallback::WIN_RATE),
        avg_days_to_close: MetricSummary::from_values(&days_to_close)
            .unwrap_or(fallback::DAYS_TO_CLOSE),
        largest_deal_amount: MetricSummary::from_values(&largest_deals)
            .unwrap_or(fallback::LARGEST_DEAL),
        product_count: MetricSummary::from_values(&product_counts)
            .unwrap_or(fallback::PRODUCT_COUNT),
        accounts: profiles.len(),
        empty_cohort: false,
    }
}
