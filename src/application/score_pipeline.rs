//! Score pipeline use case: fetches deals, builds profiles, scores the open
//! pipeline and returns a ranked, summarized run.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::application::cohort::compute_cohort_stats;
use crate::application::profile_builder::{build_profiles, ProfileMap};
use crate::application::scorer::score_opportunities;
use crate::domain::entities::opportunity_score::OpportunityScore;
use crate::domain::entities::score_run::{DataQualityReport, PipelineSummary, ScoreRun};
use crate::domain::error::DomainError;
use crate::domain::ports::deal_source::DealSource;
use crate::domain::ports::score_repository::ScoreRepository;
use crate::domain::values::cohort::CohortStats;
use crate::domain::values::deal_outcome::DealOutcome;

#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// Start of the historical lookback window.
    pub since: NaiveDate,
    /// Drop opportunities scoring below this after ranking.
    pub min_score: Option<f64>,
    /// Keep at most this many opportunities after filtering.
    pub limit: Option<usize>,
    /// Store the run in the score repository.
    pub persist: bool,
}

/// Profiles and cohort stats without scoring, for inspection.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub lookback_start: NaiveDate,
    pub cohort: CohortStats,
    pub data_quality: DataQualityReport,
    pub profiles: ProfileMap,
}

pub struct ScorePipelineUseCase {
    source: Arc<dyn DealSource>,
    repo: Arc<dyn ScoreRepository>,
}

impl ScorePipelineUseCase {
    pub fn new(source: Arc<dyn DealSource>, repo: Arc<dyn ScoreRepository>) -> Self {
        Self { source, repo }
    }

    pub async fn execute(&self, request: &ScoreRequest) -> Result<ScoreRun, DomainError> {
        let today = Utc::now().date_naive();
        if request.since > today {
            return Err(DomainError::InvalidInput(format!(
                "Lookback start {} is in the future",
                request.since
            )));
        }

        info!("Fetching deals from {} since {}", self.source.name(), request.since);
        let closed_won = self.source.closed_won(request.since).await?;
        let closed_lost = self.source.closed_lost(request.since).await?;
        let open = self.source.open_pipeline().await?;
        info!(
            "Fetched {} closed won, {} closed lost, {} open opportunities",
            closed_won.len(),
            closed_lost.len(),
            open.len()
        );

        let build = build_profiles(&closed_won, &closed_lost, today);
        let cohort = compute_cohort_stats(&build.profiles);
        let (mut scores, open_missing_account) =
            score_opportunities(&open, &build.profiles, &cohort);
        rank(&mut scores);

        let mut data_quality = build.data_quality;
        data_quality.open_missing_account = open_missing_account;
        data_quality.empty_cohort = cohort.empty_cohort;

        let mut summary = PipelineSummary::from_scores(&scores);
        summary.accounts_profiled = build.profiles.len();
        summary.upsell_accounts = build.profiles.values().filter(|p| p.has_upsell).count();
        let won_count = closed_won
            .iter()
            .chain(&closed_lost)
            .filter(|d| d.outcome == DealOutcome::Won)
            .count();
        summary.total_closed_won = won_count;
        summary.total_closed_lost = closed_won.len() + closed_lost.len() - won_count;

        if let Some(min) = request.min_score {
            scores.retain(|s| s.opportunity_score >= min);
        }
        if let Some(max) = request.limit {
            scores.truncate(max);
        }

        let run = ScoreRun::new(request.since, summary, cohort, data_quality, scores);
        info!(
            "Scored {} opportunities against {} account profiles (run {})",
            run.summary.total_opportunities, run.summary.accounts_profiled, run.id
        );

        if request.persist {
            self.repo.save_run(&run)?;
        }
        Ok(run)
    }

    pub async fn profiles(&self, since: NaiveDate) -> Result<ProfileReport, DomainError> {
        let today = Utc::now().date_naive();
        let closed_won = self.source.closed_won(since).await?;
        let closed_lost = self.source.closed_lost(since).await?;

        let build = build_profiles(&closed_won, &closed_lost, today);
        let cohort = compute_cohort_stats(&build.profiles);
        let mut data_quality = build.data_quality;
        data_quality.empty_cohort = cohort.empty_cohort;

        Ok(ProfileReport {
            lookback_start: since,
            cohort,
            data_quality,
            profiles: build.profiles,
        })
    }
}

/// Sort best first: opportunity score, then account score, then name.
pub fn rank(scores: &mut [OpportunityScore]) {
    scores.sort_by(|a, b| {
        b.opportunity_score
            .partial_cmp(&a.opportunity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.account_score
                    .partial_cmp(&a.account_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.opportunity_name.cmp(&b.opportunity_name))
    });
}
