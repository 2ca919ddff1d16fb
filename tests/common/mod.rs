//! Shared test helpers.
#![allow(dead_code)]

use chrono::NaiveDate;
use pipescore::domain::entities::deal::{AccountRef, ClosedDeal, OpenOpportunity};
use pipescore::domain::values::deal_outcome::DealOutcome;
use pipescore::infrastructure::sources::memory::InMemorySource;
use pipescore::PipeScore;
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn won(account: &str, amount: f64, created: NaiveDate, closed: NaiveDate, products: &[&str]) -> ClosedDeal {
    ClosedDeal {
        id: format!("006-{account}-{amount}-{closed}"),
        name: format!("{account} deal"),
        account: Some(AccountRef::new(account, format!("{account} Inc"))),
        amount,
        created_date: Some(created),
        close_date: Some(closed),
        outcome: DealOutcome::Won,
        products: products.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn lost(account: &str, closed: NaiveDate) -> ClosedDeal {
    ClosedDeal {
        id: format!("006-lost-{account}-{closed}"),
        name: format!("{account} lost deal"),
        account: Some(AccountRef::new(account, format!("{account} Inc"))),
        amount: 0.0,
        created_date: None,
        close_date: Some(closed),
        outcome: DealOutcome::Lost,
        products: vec![],
    }
}

pub fn open(id: &str, account: &str, amount: f64) -> OpenOpportunity {
    OpenOpportunity {
        id: id.to_string(),
        name: format!("Opportunity {id}"),
        account: Some(AccountRef::new(account, format!("{account} Inc"))),
        amount,
        stage: "Proposal".to_string(),
        commit: None,
        close_date: Some(date(2026, 12, 31)),
        owner_name: "Dana Rep".to_string(),
    }
}

pub fn setup(source: InMemorySource) -> PipeScore {
    PipeScore::with_source(":memory:", Arc::new(source)).unwrap()
}

/// Account "A": three wins ($10k, $50k, $90k) with 30/45/60-day cycles and
/// one loss.
pub fn three_win_account(today: NaiveDate) -> (Vec<ClosedDeal>, Vec<ClosedDeal>) {
    let d = |days: i64| today - chrono::Duration::days(days);
    let wins = vec![
        won("A", 10_000.0, d(130), d(100), &["Migration"]),
        won("A", 50_000.0, d(95), d(50), &["Migration", "Support"]),
        won("A", 90_000.0, d(70), d(10), &["Assessment"]),
    ];
    let losses = vec![lost("A", d(20))];
    (wins, losses)
}
