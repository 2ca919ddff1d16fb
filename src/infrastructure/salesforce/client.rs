use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::queries;
use super::records::{QueryPage, SfOpportunity};
use crate::config::SalesforceConfig;
use crate::domain::entities::deal::{ClosedDeal, OpenOpportunity};
use crate::domain::error::DomainError;
use crate::domain::ports::deal_source::DealSource;
use crate::domain::values::deal_outcome::DealOutcome;

/// Salesforce REST data source. Runs SOQL queries with a pre-issued bearer
/// token and follows `nextRecordsUrl` pagination.
pub struct SalesforceSource {
    instance_url: String,
    api_version: String,
    access_token: String,
    client: reqwest::Client,
}

impl SalesforceSource {
    pub fn new(config: &SalesforceConfig) -> Self {
        Self {
            instance_url: config.instance_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            access_token: config.access_token.clone(),
            client: reqwest::Client::builder()
                .user_agent("pipescore/0.1")
                .build()
                .unwrap_or_default(),
        }
    }

    async fn query(&self, soql: &str) -> Result<Vec<SfOpportunity>, DomainError> {
        let url = format!("{}/services/data/{}/query", self.instance_url, self.api_version);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("q", soql)])
            .send()
            .await
            .map_err(|e| DomainError::Source(e.to_string()))?;
        let mut page = Self::read_page(resp).await?;

        let mut out = std::mem::take(&mut page.records);
        while !page.done {
            let Some(next) = page.next_records_url.take() else {
                break;
            };
            debug!("Following {next}");
            let resp = self
                .client
                .get(format!("{}{}", self.instance_url, next))
                .bearer_auth(&self.access_token)
                .send()
                .await
                .map_err(|e| DomainError::Source(e.to_string()))?;
            page = Self::read_page(resp).await?;
            out.append(&mut page.records);
        }
        Ok(out)
    }

    async fn read_page(
        resp: reqwest::Response,
    ) -> Result<QueryPage<SfOpportunity>, DomainError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Source(format!(
                "Salesforce query returned {status}: {}",
                error_message(&body)
            )));
        }
        resp.json()
            .await
            .map_err(|e| DomainError::Parse(format!("Bad query response: {e}")))
    }
}

/// Salesforce reports errors as `[{"message": ..., "errorCode": ...}]`.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = match &parsed {
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|i| i.get("message"))
            .and_then(|m| m.as_str()),
        Some(obj @ serde_json::Value::Object(_)) => obj.get("message").and_then(|m| m.as_str()),
        _ => None,
    };
    message.map(str::to_string).unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl DealSource for SalesforceSource {
    fn name(&self) -> &str {
        "salesforce"
    }

    async fn closed_won(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        let records = self.query(&queries::closed_won(since)).await?;
        info!("Found {} Closed Won opportunities", records.len());
        Ok(records
            .into_iter()
            .map(|r| r.into_closed_deal(DealOutcome::Won))
            .collect())
    }

    async fn closed_lost(&self, since: NaiveDate) -> Result<Vec<ClosedDeal>, DomainError> {
        let records = self.query(&queries::closed_lost(since)).await?;
        info!("Found {} Closed Lost opportunities", records.len());
        Ok(records
            .into_iter()
            .map(|r| r.into_closed_deal(DealOutcome::Lost))
            .collect())
    }

    async fn open_pipeline(&self) -> Result<Vec<OpenOpportunity>, DomainError> {
        let records = self.query(&queries::open_pipeline()).await?;
        info!("Found {} open pipeline opportunities", records.len());
        Ok(records
            .into_iter()
            .map(SfOpportunity::into_open_opportunity)
            .collect())
    }
}
