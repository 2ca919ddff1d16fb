//! Raw Salesforce opportunity records and their conversion into typed
//! domain records.
//!
//! This is the only place that knows the Salesforce JSON shape. Both the
//! REST source and the JSON snapshot source deserialize into
//! [`SfOpportunity`] and convert through here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::deal::{AccountRef, ClosedDeal, OpenOpportunity};
use crate::domain::values::deal_outcome::DealOutcome;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfOpportunity {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Account", default)]
    pub account: Option<SfAccount>,
    #[serde(rename = "Professional_Services_Amount__c", default)]
    pub amount: Option<f64>,
    #[serde(rename = "StageName", default)]
    pub stage_name: Option<String>,
    #[serde(rename = "Sales_Commit__c", default)]
    pub sales_commit: Option<serde_json::Value>,
    #[serde(rename = "CloseDate", default)]
    pub close_date: Option<String>,
    #[serde(rename = "CreatedDate", default)]
    pub created_date: Option<String>,
    #[serde(rename = "Owner", default)]
    pub owner: Option<SfOwner>,
    #[serde(rename = "IsWon", default)]
    pub is_won: Option<bool>,
    #[serde(rename = "OpportunityLineItems", default)]
    pub line_items: Option<SfLineItems>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfAccount {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfOwner {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfLineItems {
    #[serde(default)]
    pub records: Vec<SfLineItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfLineItem {
    #[serde(rename = "Product2", default)]
    pub product: Option<SfProduct>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfProduct {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// One page of a SOQL query response.
#[derive(Debug, Deserialize)]
pub struct QueryPage<T> {
    #[serde(default)]
    pub records: Vec<T>,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(rename = "nextRecordsUrl", default)]
    pub next_records_url: Option<String>,
}

fn default_done() -> bool {
    true
}

/// Parse a Salesforce date or datetime by its leading `YYYY-MM-DD`.
pub fn parse_sf_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            debug!("Unparsable date '{raw}': {e}");
            None
        }
    }
}

fn non_empty(s: Option<&String>) -> Option<String> {
    s.map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SfOpportunity {
    fn account_ref(&self) -> Option<AccountRef> {
        let account = self.account.as_ref()?;
        let id = non_empty(account.id.as_ref())?;
        let name = non_empty(account.name.as_ref()).unwrap_or_else(|| UNKNOWN.to_string());
        Some(AccountRef { id, name })
    }

    fn products(&self) -> Vec<String> {
        self.line_items
            .as_ref()
            .map(|items| {
                items
                    .records
                    .iter()
                    .filter_map(|i| i.product.as_ref().and_then(|p| non_empty(p.name.as_ref())))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn commit(&self) -> Option<String> {
        match &self.sales_commit {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(serde_json::Value::Bool(true)) => Some("true".to_string()),
            _ => None,
        }
    }

    /// Convert into a closed deal. `outcome` comes from the query the record
    /// was fetched by; `IsWon`, when present, overrides it.
    pub fn into_closed_deal(self, outcome: DealOutcome) -> ClosedDeal {
        let outcome = match self.is_won {
            Some(true) => DealOutcome::Won,
            Some(false) => DealOutcome::Lost,
            None => outcome,
        };
        ClosedDeal {
            account: self.account_ref(),
            products: self.products(),
            amount: self.amount.unwrap_or(0.0).max(0.0),
            created_date: self.created_date.as_deref().and_then(parse_sf_date),
            close_date: self.close_date.as_deref().and_then(parse_sf_date),
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_else(|| UNKNOWN.to_string()),
            outcome,
        }
    }

    pub fn into_open_opportunity(self) -> OpenOpportunity {
        OpenOpportunity {
            account: self.account_ref(),
            commit: self.commit(),
            amount: self.amount.unwrap_or(0.0).max(0.0),
            close_date: self.close_date.as_deref().and_then(parse_sf_date),
            owner_name: self
                .owner
                .as_ref()
                .and_then(|o| non_empty(o.name.as_ref()))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            stage: self.stage_name.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}
