//! Tests for historical profile aggregation.

mod common;

use common::{date, lost, three_win_account, won};
use pipescore::application::profile_builder::build_profiles;
use pipescore::domain::entities::deal::ClosedDeal;
use pipescore::domain::values::deal_outcome::DealOutcome;

#[test]
fn test_three_win_account_profile() {
    let today = date(2025, 6, 1);
    let (wins, losses) = three_win_account(today);
    let build = build_profiles(&wins, &losses, today);

    let a = &build.profiles["A"];
    assert_eq!(a.account_name, "A Inc");
    assert_eq!(a.closed_won, 3);
    assert_eq!(a.closed_lost, 1);
    assert_eq!(a.win_rate, 75.0);
    assert_eq!(a.purchase_count, 3);
    assert!(a.has_upsell);
    assert_eq!(a.largest_deal_amount, 90_000.0);
    assert_eq!(a.total_deal_amount, 150_000.0);
    assert_eq!(a.avg_deal_amount, 50_000.0);
    assert_eq!(a.avg_days_to_close, 45.0);
    assert_eq!(a.median_days_to_close, 45.0);
    assert_eq!(a.product_count, 3);
    assert_eq!(a.most_recent_close_date, Some(date(2025, 5, 22)));
    assert_eq!(a.days_since_last_close, Some(10));
    assert_eq!(a.cycle_samples.len(), 3);
}

#[test]
fn test_losses_without_wins_are_not_tracked() {
    let today = date(2025, 6, 1);
    let wins = vec![won("A", 1000.0, date(2025, 1, 1), date(2025, 2, 1), &[])];
    let losses = vec![lost("B", date(2025, 3, 1)), lost("B", date(2025, 3, 2))];
    let build = build_profiles(&wins, &losses, today);

    assert_eq!(build.profiles.len(), 1);
    assert!(!build.profiles.contains_key("B"));
    assert_eq!(build.data_quality.losses_without_profile, 2);
    assert_eq!(build.profiles["A"].win_rate, 100.0);
}

#[test]
fn test_missing_account_is_skipped() {
    let today = date(2025, 6, 1);
    let mut orphan = won("A", 5000.0, date(2025, 1, 1), date(2025, 2, 1), &[]);
    orphan.account = None;
    let mut orphan_loss = lost("A", date(2025, 3, 1));
    orphan_loss.account = None;
    let wins = vec![orphan, won("A", 1000.0, date(2025, 1, 1), date(2025, 2, 1), &[])];

    let build = build_profiles(&wins, &[orphan_loss], today);
    assert_eq!(build.profiles["A"].closed_won, 1);
    assert_eq!(build.profiles["A"].closed_lost, 0);
    assert_eq!(build.data_quality.closed_missing_account, 2);
}

#[test]
fn test_bad_dates_only_degrade_cycle_sample() {
    let today = date(2025, 6, 1);
    let mut no_created = won("A", 20_000.0, date(2025, 1, 1), date(2025, 2, 1), &[]);
    no_created.created_date = None;
    // Closed before it was created.
    let inverted = won("A", 30_000.0, date(2025, 4, 1), date(2025, 3, 1), &[]);
    let good = won("A", 10_000.0, date(2025, 1, 1), date(2025, 1, 21), &[]);

    let build = build_profiles(&[no_created, inverted, good], &[], today);
    let a = &build.profiles["A"];
    assert_eq!(a.closed_won, 3);
    assert_eq!(a.total_deal_amount, 60_000.0);
    assert_eq!(a.largest_deal_amount, 30_000.0);
    assert_eq!(a.cycle_samples.len(), 1);
    assert_eq!(a.avg_days_to_close, 20.0);
    assert_eq!(a.most_recent_close_date, Some(date(2025, 3, 1)));
    assert_eq!(build.data_quality.cycle_samples_skipped, 2);
}

#[test]
fn test_same_day_close_counts_as_zero_days() {
    let today = date(2025, 6, 1);
    let d = date(2025, 5, 1);
    let build = build_profiles(&[won("A", 100.0, d, d, &[])], &[], today);
    let a = &build.profiles["A"];
    assert_eq!(a.cycle_samples.len(), 1);
    assert_eq!(a.avg_days_to_close, 0.0);
    assert!(a.has_cycle_sample());
}

#[test]
fn test_no_close_date_leaves_recency_unknown() {
    let today = date(2025, 6, 1);
    let mut deal = won("A", 100.0, date(2025, 1, 1), date(2025, 2, 1), &[]);
    deal.close_date = None;
    let build = build_profiles(&[deal], &[], today);
    let a = &build.profiles["A"];
    assert_eq!(a.most_recent_close_date, None);
    assert_eq!(a.days_since_last_close, None);
    assert!(!a.has_cycle_sample());
    assert_eq!(a.avg_days_to_close, 0.0);
}

#[test]
fn test_median_with_even_sample() {
    let today = date(2025, 6, 1);
    let wins = vec![
        won("A", 1.0, date(2025, 1, 1), date(2025, 1, 11), &[]),
        won("A", 1.0, date(2025, 1, 1), date(2025, 1, 21), &[]),
        won("A", 1.0, date(2025, 1, 1), date(2025, 1, 31), &[]),
        won("A", 1.0, date(2025, 1, 1), date(2025, 4, 11), &[]),
    ];
    let a = &build_profiles(&wins, &[], today).profiles["A"];
    assert_eq!(a.median_days_to_close, 25.0);
    assert_eq!(a.avg_days_to_close, 40.0);
}

#[test]
fn test_duplicate_products_counted_once() {
    let today = date(2025, 6, 1);
    let wins = vec![
        won("A", 1.0, date(2025, 1, 1), date(2025, 1, 11), &["Migration", "Migration"]),
        won("A", 1.0, date(2025, 1, 1), date(2025, 1, 21), &["Migration", "Training", ""]),
    ];
    let a = &build_profiles(&wins, &[], today).profiles["A"];
    assert_eq!(a.product_count, 2);
    assert!(a.products.contains("Training"));
}

#[test]
fn test_profile_invariants_hold() {
    let today = date(2025, 6, 1);
    let mut wins: Vec<ClosedDeal> = Vec::new();
    let mut losses: Vec<ClosedDeal> = Vec::new();
    for i in 0..20u32 {
        let account = format!("ACC{}", i % 7);
        wins.push(won(&account, 1000.0 * (i + 1) as f64, date(2024, 1, 1), date(2024, 1 + i % 12, 15), &[]));
        if i % 3 == 0 {
            losses.push(lost(&account, date(2024, 6, 1)));
        }
    }
    let build = build_profiles(&wins, &losses, today);
    for p in build.profiles.values() {
        assert!((0.0..=100.0).contains(&p.win_rate));
        let expected = p.closed_won as f64 / (p.closed_won + p.closed_lost) as f64 * 100.0;
        assert!((p.win_rate - expected).abs() < 1e-9);
        assert_eq!(p.has_upsell, p.purchase_count > 1);
        assert_eq!(p.purchase_count, p.closed_won);
        assert!(p.avg_days_to_close >= 0.0);
        assert!(p.avg_deal_amount >= 0.0);
        assert!(p.days_since_last_close.unwrap() >= 0);
    }
}

#[test]
fn test_deals_fold_by_their_own_outcome() {
    let today = date(2025, 6, 1);
    let mut lost_in_wins = won("B", 40_000.0, date(2025, 1, 1), date(2025, 2, 1), &["Support"]);
    lost_in_wins.outcome = DealOutcome::Lost;
    let mut won_in_losses = lost("A", date(2025, 4, 1));
    won_in_losses.outcome = DealOutcome::Won;
    won_in_losses.amount = 5_000.0;
    let wins = vec![won("A", 1_000.0, date(2025, 1, 1), date(2025, 1, 11), &[]), lost_in_wins];

    let build = build_profiles(&wins, &[won_in_losses], today);
    assert!(!build.profiles.contains_key("B"));
    assert_eq!(build.data_quality.losses_without_profile, 1);
    let a = &build.profiles["A"];
    assert_eq!(a.closed_won, 2);
    assert_eq!(a.closed_lost, 0);
    assert_eq!(a.largest_deal_amount, 5_000.0);
    assert_eq!(a.most_recent_close_date, Some(date(2025, 4, 1)));
}
