//! Opportunity scorer: rates each open opportunity against its account's
//! historical profile.
//!
//! Six component scores (0 to 100) are blended into an account score; the
//! account score is blended with a bucketed comparison of the opportunity's
//! amount to the account's average deal to give the opportunity score.
//!
//! The step functions (product mix, upsell, recency, amount ratio) are
//! business-calibrated breakpoints. Keep them exact.

use tracing::debug;

use crate::application::profile_builder::ProfileMap;
use crate::domain::entities::deal::OpenOpportunity;
use crate::domain::entities::opportunity_score::{ComponentScores, OpportunityScore};
use crate::domain::entities::profile::AccountScoringProfile;
use crate::domain::values::cohort::CohortStats;
use crate::domain::values::confidence::ConfidenceLevel;
use crate::domain::values::money::format_usd;

/// Account score weights. Sum to 1.0.
pub mod weights {
    pub const SPEED: f64 = 0.15;
    pub const DEAL_SIZE: f64 = 0.20;
    pub const PRODUCT_MIX: f64 = 0.15;
    pub const UPSELL: f64 = 0.25;
    pub const WIN_RATE: f64 = 0.20;
    pub const RECENCY: f64 = 0.05;

    /// Share of the opportunity score taken from the account score; the
    /// remainder comes from the amount-ratio score.
    pub const ACCOUNT_SHARE: f64 = 0.70;
    pub const AMOUNT_RATIO_SHARE: f64 = 0.30;
}

/// Score given to accounts with no closed-won history.
pub const NEUTRAL_SCORE: f64 = 50.0;

const NO_HISTORY_EXPLANATION: &str = "New account - no historical data available.";

/// Score every open opportunity that has an account reference.
///
/// Output order follows input order; ranking is up to the caller.
/// Opportunities without an account are skipped and counted in the second
/// element of the returned tuple.
pub fn score_opportunities(
    open: &[OpenOpportunity],
    profiles: &ProfileMap,
    stats: &CohortStats,
) -> (Vec<OpportunityScore>, usize) {
    let mut skipped = 0usize;
    let scores = open
        .iter()
        .filter_map(|opp| {
            let scored = score_opportunity(opp, profiles, stats);
            if scored.is_none() {
                debug!("Skipping open opportunity {} with no account", opp.id);
                skipped += 1;
            }
            scored
        })
        .collect();
    (scores, skipped)
}

/// Score one open opportunity, or `None` if it has no account reference.
pub fn score_opportunity(
    opp: &OpenOpportunity,
    profiles: &ProfileMap,
    stats: &CohortStats,
) -> Option<OpportunityScore> {
    let account = opp.account.as_ref()?;

    let mut score = OpportunityScore {
        opportunity_id: opp.id.clone(),
        opportunity_name: opp.name.clone(),
        account_id: account.id.clone(),
        account_name: account.name.clone(),
        amount: opp.amount,
        stage: opp.stage.clone(),
        commit: opp.commit.clone(),
        close_date: opp.close_date,
        owner_name: opp.owner_name.clone(),
        components: ComponentScores::default(),
        amount_ratio_score: 0.0,
        account_score: NEUTRAL_SCORE,
        opportunity_score: NEUTRAL_SCORE,
        confidence_level: ConfidenceLevel::Low,
        has_history: false,
        explanation: NO_HISTORY_EXPLANATION.to_string(),
    };

    let Some(profile) = profiles.get(&account.id).filter(|p| p.closed_won > 0) else {
        return Some(score);
    };

    let components = component_scores(profile, stats);
    let account_score = account_score(&components);
    let ratio_score = amount_ratio_score(opp.amount, profile.avg_deal_amount);

    score.components = components;
    score.amount_ratio_score = ratio_score;
    score.account_score = account_score;
    score.opportunity_score = clamp_score(
        account_score * weights::ACCOUNT_SHARE + ratio_score * weights::AMOUNT_RATIO_SHARE,
    );
    score.confidence_level = ConfidenceLevel::from_closed_won(profile.closed_won);
    score.has_history = true;
    score.explanation = explain(profile);
    Some(score)
}

pub fn component_scores(profile: &AccountScoringProfile, stats: &CohortStats) -> ComponentScores {
    ComponentScores {
        speed: if profile.has_cycle_sample() {
            speed_score(profile.avg_days_to_close, stats.max_days_to_close())
        } else {
            NEUTRAL_SCORE
        },
        deal_size: deal_size_score(profile.largest_deal_amount, stats.max_largest_deal()),
        product_mix: product_mix_score(profile.product_count),
        upsell: upsell_score(profile.purchase_count),
        win_rate: win_rate_score(profile.win_rate),
        recency: profile
            .days_since_last_close
            .map_or(NEUTRAL_SCORE, recency_score),
    }
}

pub fn account_score(c: &ComponentScores) -> f64 {
    clamp_score(
        c.speed * weights::SPEED
            + c.deal_size * weights::DEAL_SIZE
            + c.product_mix * weights::PRODUCT_MIX
            + c.upsell * weights::UPSELL
            + c.win_rate * weights::WIN_RATE
            + c.recency * weights::RECENCY,
    )
}

/// Faster closers score higher, linearly against the cohort's slowest.
pub fn speed_score(avg_days_to_close: f64, max_days_to_close: f64) -> f64 {
    clamp_score(100.0 - (avg_days_to_close / max_days_to_close) * 100.0)
}

/// Largest deal relative to the cohort's largest. A non-positive deal scores 25.
pub fn deal_size_score(largest_deal_amount: f64, max_largest_deal: f64) -> f64 {
    if largest_deal_amount <= 0.0 {
        return 25.0;
    }
    clamp_score(largest_deal_amount / max_largest_deal * 100.0)
}

/// 20 points per distinct product, saturating at five products.
pub fn product_mix_score(product_count: usize) -> f64 {
    (product_count as f64 * 20.0).min(100.0)
}

pub fn upsell_score(purchase_count: u32) -> f64 {
    match purchase_count {
        0 => 0.0,
        1 => 30.0,
        2 => 70.0,
        _ => 100.0,
    }
}

pub fn win_rate_score(win_rate: f64) -> f64 {
    clamp_score(win_rate)
}

/// Never 0: an old relationship still carries some signal.
pub fn recency_score(days_since_last_close: i64) -> f64 {
    match days_since_last_close {
        d if d <= 90 => 100.0,
        d if d <= 180 => 75.0,
        d if d <= 365 => 50.0,
        _ => 25.0,
    }
}

/// Bucketed `amount / avg_deal_amount`. 0 when the account has no average.
pub fn amount_ratio_score(amount: f64, avg_deal_amount: f64) -> f64 {
    if avg_deal_amount <= 0.0 {
        return 0.0;
    }
    let ratio = amount / avg_deal_amount;
    if ratio >= 1.5 {
        100.0
    } else if ratio >= 1.0 {
        75.0
    } else if ratio >= 0.75 {
        50.0
    } else {
        25.0
    }
}

fn clamp_score(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 100.0)
}

fn explain(profile: &AccountScoringProfile) -> String {
    let mut text = format!(
        "Account has {} closed won deal(s). Avg {:.0} days to close. Largest deal: {}. ",
        profile.closed_won,
        profile.avg_days_to_close,
        format_usd(profile.largest_deal_amount)
    );
    if profile.has_upsell {
        text.push_str(&format!(
            "Has {} purchase(s) (upsell potential). ",
            profile.purchase_count
        ));
    }
    text
}
