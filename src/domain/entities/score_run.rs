use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::opportunity_score::OpportunityScore;
use crate::domain::values::cohort::CohortStats;
use crate::domain::values::score_band::ScoreBand;

/// Counters for records the engine tolerated rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Closed deals skipped because they carry no account id.
    pub closed_missing_account: usize,
    /// Open opportunities skipped because they carry no account id.
    pub open_missing_account: usize,
    /// Closed-won deals left out of the cycle-time sample (missing,
    /// unparsable or inverted dates). They still count toward totals.
    pub cycle_samples_skipped: usize,
    /// Closed-lost deals for accounts with no wins; not tracked.
    pub losses_without_profile: usize,
    pub empty_cohort: bool,
}

/// Headline numbers for a scored pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_opportunities: usize,
    pub total_pipeline_value: f64,
    pub high_score_count: usize,
    pub high_score_value: f64,
    pub medium_score_count: usize,
    pub medium_score_value: f64,
    pub low_score_count: usize,
    pub low_score_value: f64,
    pub accounts_profiled: usize,
    pub upsell_accounts: usize,
    pub total_closed_won: usize,
    pub total_closed_lost: usize,
}

impl PipelineSummary {
    /// Tally scores into bands. Account and record counts are filled in by the caller.
    pub fn from_scores(scores: &[OpportunityScore]) -> Self {
        let mut summary = PipelineSummary {
            total_opportunities: scores.len(),
            ..Default::default()
        };
        for s in scores {
            summary.total_pipeline_value += s.amount;
            match s.band() {
                ScoreBand::High => {
                    summary.high_score_count += 1;
                    summary.high_score_value += s.amount;
                }
                ScoreBand::Medium => {
                    summary.medium_score_count += 1;
                    summary.medium_score_value += s.amount;
                }
                ScoreBand::Low => {
                    summary.low_score_count += 1;
                    summary.low_score_value += s.amount;
                }
            }
        }
        summary
    }
}

/// One execution of the scoring pipeline, as exported and stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRun {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub lookback_start: NaiveDate,
    pub summary: PipelineSummary,
    pub cohort: CohortStats,
    pub data_quality: DataQualityReport,
    /// Ranked best first.
    pub opportunities: Vec<OpportunityScore>,
}

impl ScoreRun {
    pub fn new(
        lookback_start: NaiveDate,
        summary: PipelineSummary,
        cohort: CohortStats,
        data_quality: DataQualityReport,
        opportunities: Vec<OpportunityScore>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            lookback_start,
            summary,
            cohort,
            data_quality,
            opportunities,
        }
    }
}

/// A stored run without its opportunity rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRunHeader {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub lookback_start: NaiveDate,
    pub total_opportunities: usize,
    pub total_pipeline_value: f64,
    pub accounts_profiled: usize,
    pub stored_opportunities: usize,
}
