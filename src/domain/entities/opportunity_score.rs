use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::values::confidence::ConfidenceLevel;
use crate::domain::values::score_band::ScoreBand;

/// The six behavioral sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub speed: f64,
    pub deal_size: f64,
    pub product_mix: f64,
    pub upsell: f64,
    pub win_rate: f64,
    pub recency: f64,
}

/// Score of one open pipeline opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityScore {
    pub opportunity_id: String,
    pub opportunity_name: String,
    pub account_id: String,
    pub account_name: String,
    pub amount: f64,
    pub stage: String,
    pub commit: Option<String>,
    pub close_date: Option<NaiveDate>,
    pub owner_name: String,

    pub components: ComponentScores,
    /// Bucketed comparison of this opportunity's amount to the account's
    /// average deal; 0 when the account has no history.
    pub amount_ratio_score: f64,

    pub account_score: f64,
    pub opportunity_score: f64,
    pub confidence_level: ConfidenceLevel,
    /// True when the account had closed-won history to score against.
    pub has_history: bool,
    pub explanation: String,
}

impl OpportunityScore {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.opportunity_score)
    }
}
