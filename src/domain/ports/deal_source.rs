//! Data-access port for opportunity records.
//!
//! Implementations fetch from Salesforce, a JSON snapshot, or memory, and
//! hand back typed records. Closed records are already restricted to the
//! lookback window; amounts are already restricted to positive values where
//! the backing query does so.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::deal::{ClosedDeal, OpenOpportunity};
use crate::domain::error::DomainError;

#[async_trait]
pub trait DealSource: Send + Sync {
    /// Human-readable name of this source, for logs.
    fn name(&self) -> &str;

    /// Closed-won deals closing on or after `since`.
    async fn closed_won(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError>;

    /// Closed-lost deals closing on or after `since`.
    async fn closed_lost(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError>;

    /// Open pipeline opportunities.
    async fn open_pipeline(&self) -> Result<Vec<OpenOpportunity>, DomainError>;
}
