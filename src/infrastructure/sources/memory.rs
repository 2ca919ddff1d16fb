use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::deal::{ClosedDeal, OpenOpportunity};
use crate::domain::error::DomainError;
use crate::domain::ports::deal_source::DealSource;

/// In-memory data source. Closed deals are filtered by close date like the
/// real sources; deals without a close date are always returned.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub closed_won: Vec<ClosedDeal>,
    pub closed_lost: Vec<ClosedDeal>,
    pub open: Vec<OpenOpportunity>,
}

impl InMemorySource {
    pub fn new(
        closed_won: Vec<ClosedDeal>,
        closed_lost: Vec<ClosedDeal>,
        open: Vec<OpenOpportunity>,
    ) -> Self {
        Self {
            closed_won,
            closed_lost,
            open,
        }
    }

    fn since(deals: &[ClosedDeal], since: NaiveDate) -> Vec<ClosedDeal> {
        deals
            .iter()
            .filter(|d| d.close_date.map_or(true, |c| c >= since))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DealSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn closed_won(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        Ok(Self::since(&self.closed_won, since))
    }

    async fn closed_lost(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        Ok(Self::since(&self.closed_lost, since))
    }

    async fn open_pipeline(&self) -> Result<Vec<OpenOpportunity>, DomainError> {
        Ok(self.open.clone())
    }
}
