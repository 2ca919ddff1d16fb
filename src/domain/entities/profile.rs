use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One closed-won deal's contribution to the cycle-time sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSample {
    pub days_to_close: i64,
    pub amount: f64,
    pub close_date: NaiveDate,
}

/// Historical purchasing behavior of one account with at least one win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountScoringProfile {
    pub account_id: String,
    pub account_name: String,

    pub closed_won: u32,
    pub closed_lost: u32,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub avg_days_to_close: f64,
    pub median_days_to_close: f64,
    pub largest_deal_amount: f64,
    pub avg_deal_amount: f64,
    pub total_deal_amount: f64,

    pub products: BTreeSet<String>,
    pub product_count: usize,

    pub purchase_count: u32,
    pub has_upsell: bool,

    pub most_recent_close_date: Option<NaiveDate>,
    pub days_since_last_close: Option<i64>,

    pub cycle_samples: Vec<CycleSample>,
}

impl AccountScoringProfile {
    pub fn new(account_id: String, account_name: String) -> Self {
        Self {
            account_id,
            account_name,
            closed_won: 0,
            closed_lost: 0,
            win_rate: 0.0,
            avg_days_to_close: 0.0,
            median_days_to_close: 0.0,
            largest_deal_amount: 0.0,
            avg_deal_amount: 0.0,
            total_deal_amount: 0.0,
            products: BTreeSet::new(),
            product_count: 0,
            purchase_count: 0,
            has_upsell: false,
            most_recent_close_date: None,
            days_since_last_close: None,
            cycle_samples: Vec::new(),
        }
    }

    /// `closed_won / (closed_won + closed_lost) × 100`, or 0 with no closed deals.
    pub fn calculate_win_rate(&self) -> f64 {
        let total = self.closed_won + self.closed_lost;
        if total > 0 {
            self.closed_won as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn has_cycle_sample(&self) -> bool {
        !self.cycle_samples.is_empty()
    }
}
