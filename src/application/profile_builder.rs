//! Historical profile builder: folds closed deals into per-account
//! behavioral profiles.
//!
//! Only accounts with at least one closed-won deal get a profile. Losses are
//! counted against an account only once it has a profile, since scoring is
//! anchored on win history. Deals are folded by their own outcome, not by
//! which slice they arrive in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::entities::deal::ClosedDeal;
use crate::domain::entities::profile::{AccountScoringProfile, CycleSample};
use crate::domain::entities::score_run::DataQualityReport;
use crate::domain::values::cohort::median;
use crate::domain::values::deal_outcome::DealOutcome;

/// Profiles keyed by account id. Ordered so that anything aggregated over
/// the map sees accounts in the same order on every run.
pub type ProfileMap = BTreeMap<String, AccountScoringProfile>;

#[derive(Debug, Clone)]
pub struct ProfileBuild {
    pub profiles: ProfileMap,
    pub data_quality: DataQualityReport,
}

/// Build account profiles from the lookback window's closed deals.
///
/// `today` anchors `days_since_last_close`; passing it in keeps the build
/// reproducible for a fixed input.
pub fn build_profiles(
    closed_won: &[ClosedDeal],
    closed_lost: &[ClosedDeal],
    today: NaiveDate,
) -> ProfileBuild {
    let mut profiles = ProfileMap::new();
    let mut quality = DataQualityReport::default();

    let (wins, losses): (Vec<&ClosedDeal>, Vec<&ClosedDeal>) = closed_won
        .iter()
        .chain(closed_lost)
        .partition(|d| d.outcome == DealOutcome::Won);

    for deal in wins {
        let Some(account) = &deal.account else {
            warn!("Skipping closed-won deal {} with no account", deal.id);
            quality.closed_missing_account += 1;
            continue;
        };

        let profile = profiles
            .entry(account.id.clone())
            .or_insert_with(|| AccountScoringProfile::new(account.id.clone(), account.name.clone()));

        profile.closed_won += 1;
        profile.total_deal_amount += deal.amount;
        if deal.amount > profile.largest_deal_amount {
            profile.largest_deal_amount = deal.amount;
        }

        match (deal.days_to_close(), deal.close_date) {
            (Some(days), Some(close_date)) => profile.cycle_samples.push(CycleSample {
                days_to_close: days,
                amount: deal.amount,
                close_date,
            }),
            _ => {
                debug!(
                    "Deal {} left out of cycle-time sample (created {:?}, closed {:?})",
                    deal.id, deal.created_date, deal.close_date
                );
                quality.cycle_samples_skipped += 1;
            }
        }

        for product in &deal.products {
            let product = product.trim();
            if !product.is_empty() {
                profile.products.insert(product.to_string());
            }
        }

        if let Some(close_date) = deal.close_date {
            if profile.most_recent_close_date.map_or(true, |d| close_date > d) {
                profile.most_recent_close_date = Some(close_date);
            }
        }
    }

    for deal in losses {
        let Some(account) = &deal.account else {
            quality.closed_missing_account += 1;
            continue;
        };
        match profiles.get_mut(&account.id) {
            Some(profile) => profile.closed_lost += 1,
            None => quality.losses_without_profile += 1,
        }
    }

    for profile in profiles.values_mut() {
        derive_metrics(profile, today);
    }

    info!(
        "Built scoring profiles for {} accounts ({} with multiple purchases)",
        profiles.len(),
        profiles.values().filter(|p| p.has_upsell).count()
    );
    if quality.closed_missing_account > 0 {
        warn!(
            "{} closed deals had no account and were skipped",
            quality.closed_missing_account
        );
    }

    ProfileBuild {
        profiles,
        data_quality: quality,
    }
}

fn derive_metrics(profile: &mut AccountScoringProfile, today: NaiveDate) {
    profile.win_rate = profile.calculate_win_rate();

    if profile.has_cycle_sample() {
        let days: Vec<f64> = profile
            .cycle_samples
            .iter()
            .map(|s| s.days_to_close as f64)
            .collect();
        profile.avg_days_to_close = days.iter().sum::<f64>() / days.len() as f64;
        profile.median_days_to_close = median(&days);
    }

    if profile.closed_won > 0 {
        profile.avg_deal_amount = profile.total_deal_amount / profile.closed_won as f64;
    }
    profile.purchase_count = profile.closed_won;
    profile.has_upsell = profile.purchase_count > 1;
    profile.product_count = profile.products.len();

    profile.days_since_last_close = profile
        .most_recent_close_date
        .map(|d| (today - d).num_days().max(0));
}
