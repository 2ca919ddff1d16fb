//! Typed opportunity records.
//!
//! These are produced once, at the data-source boundary, from the raw
//! Salesforce record shape. Anything the engine has to tolerate (missing
//! account, unparsable dates) is already expressed as an `Option` here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::values::deal_outcome::DealOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
    pub name: String,
}

impl AccountRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A closed-won or closed-lost opportunity from the lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedDeal {
    pub id: String,
    pub name: String,
    pub account: Option<AccountRef>,
    pub amount: f64,
    pub created_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub outcome: DealOutcome,
    /// Product names from the opportunity's line items, possibly repeated.
    pub products: Vec<String>,
}

impl ClosedDeal {
    /// Days from creation to close, if both dates are known and the close
    /// does not precede the creation.
    pub fn days_to_close(&self) -> Option<i64> {
        match (self.created_date, self.close_date) {
            (Some(created), Some(closed)) if closed >= created => {
                Some((closed - created).num_days())
            }
            _ => None,
        }
    }
}

/// An open pipeline opportunity to be scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOpportunity {
    pub id: String,
    pub name: String,
    pub account: Option<AccountRef>,
    pub amount: f64,
    pub stage: String,
    /// Sales commit flag (`Sales_Commit__c`), when set.
    pub commit: Option<String>,
    pub close_date: Option<NaiveDate>,
    pub owner_name: String,
}
