//! Population-level normalization bounds.
//!
//! A [`MetricSummary`] is the five-number descriptor (min, max, median,
//! mean, sample standard deviation) of one metric across the cohort of
//! profiled accounts. [`CohortStats`] bundles the four metrics the scorer
//! normalizes against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl MetricSummary {
    /// Summarize `values`, or return `None` when there is nothing to summarize.
    ///
    /// Uses the sample standard deviation (n − 1 denominator); a single value
    /// has a standard deviation of 0.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let stddev = if values.len() > 1 {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };
        Some(Self {
            min,
            max,
            median: median(values),
            mean,
            stddev,
        })
    }
}

/// Median of an unsorted slice. Even-length slices average the two middle
/// values. Returns 0.0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Defaults used when no profiled account contributes to a metric.
pub mod fallback {
    use super::MetricSummary;

    pub const WIN_RATE: MetricSummary = MetricSummary {
        min: 0.0,
        max: 100.0,
        median: 50.0,
        mean: 50.0,
        stddev: 0.0,
    };

    pub const DAYS_TO_CLOSE: MetricSummary = MetricSummary {
        min: 0.0,
        max: 365.0,
        median: 90.0,
        mean: 90.0,
        stddev: 0.0,
    };

    pub const LARGEST_DEAL: MetricSummary = MetricSummary {
        min: 0.0,
        max: 1_000_000.0,
        median: 50_000.0,
        mean: 50_000.0,
        stddev: 0.0,
    };

    pub const PRODUCT_COUNT: MetricSummary = MetricSummary {
        min: 0.0,
        max: 10.0,
        median: 1.0,
        mean: 1.0,
        stddev: 0.0,
    };
}

/// Normalization anchors over the cohort of accounts with at least one win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortStats {
    pub win_rate: MetricSummary,
    pub avg_days_to_close: MetricSummary,
    pub largest_deal_amount: MetricSummary,
    pub product_count: MetricSummary,
    /// Number of profiled accounts the stats were computed over.
    pub accounts: usize,
    /// True when there were no profiled accounts and every metric fell back.
    pub empty_cohort: bool,
}

impl Default for CohortStats {
    fn default() -> Self {
        Self {
            win_rate: fallback::WIN_RATE,
            avg_days_to_close: fallback::DAYS_TO_CLOSE,
            largest_deal_amount: fallback::LARGEST_DEAL,
            product_count: fallback::PRODUCT_COUNT,
            accounts: 0,
            empty_cohort: true,
        }
    }
}

impl CohortStats {
    /// Ceiling for cycle time; never zero.
    pub fn max_days_to_close(&self) -> f64 {
        if self.avg_days_to_close.max > 0.0 {
            self.avg_days_to_close.max
        } else {
            fallback::DAYS_TO_CLOSE.max
        }
    }

    /// Ceiling for deal size; never zero.
    pub fn max_largest_deal(&self) -> f64 {
        if self.largest_deal_amount.max > 0.0 {
            self.largest_deal_amount.max
        } else {
            fallback::LARGEST_DEAL.max
        }
    }
}
