use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::entities::deal::{ClosedDeal, OpenOpportunity};
use crate::domain::error::DomainError;
use crate::domain::ports::deal_source::DealSource;
use crate::domain::values::deal_outcome::DealOutcome;
use crate::infrastructure::salesforce::records::SfOpportunity;

/// A saved export of the three record sets, in raw Salesforce shape.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub closed_won: Vec<SfOpportunity>,
    #[serde(default)]
    pub closed_lost: Vec<SfOpportunity>,
    #[serde(default)]
    pub open: Vec<SfOpportunity>,
}

/// Data source backed by a JSON snapshot file, for offline runs.
///
/// The file is read on every call, so each run sees the file as it is then.
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Snapshot, DomainError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Io(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::Parse(format!("Invalid snapshot {}: {e}", self.path.display()))
        })
    }
}

/// Keep deals closing on or after `since`. Deals whose close date did not
/// parse are kept; the profile builder decides what they contribute.
fn within_window(deals: Vec<ClosedDeal>, since: NaiveDate) -> Vec<ClosedDeal> {
    deals
        .into_iter()
        .filter(|d| d.close_date.map_or(true, |c| c >= since))
        .collect()
}

#[async_trait]
impl DealSource for JsonSnapshotSource {
    fn name(&self) -> &str {
        "json-snapshot"
    }

    async fn closed_won(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        let snapshot = self.load().await?;
        let deals = snapshot
            .closed_won
            .into_iter()
            .map(|r| r.into_closed_deal(DealOutcome::Won))
            .collect();
        let deals = within_window(deals, since);
        info!("Loaded {} Closed Won opportunities from {}", deals.len(), self.path.display());
        Ok(deals)
    }

    async fn closed_lost(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        let snapshot = self.load().await?;
        let deals = snapshot
            .closed_lost
            .into_iter()
            .map(|r| r.into_closed_deal(DealOutcome::Lost))
            .collect();
        Ok(within_window(deals, since))
    }

    async fn open_pipeline(&self) -> Result<Vec<OpenOpportunity>, DomainError> {
        let snapshot = self.load().await?;
        Ok(snapshot
            .open
            .into_iter()
            .map(SfOpportunity::into_open_opportunity)
            .collect())
    }
}
