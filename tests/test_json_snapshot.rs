//! Tests for the JSON snapshot data source.

mod common;

use common::date;
use pipescore::application::score_pipeline::ScoreRequest;
use pipescore::domain::error::DomainError;
use pipescore::domain::ports::deal_source::DealSource;
use pipescore::infrastructure::sources::json_snapshot::JsonSnapshotSource;
use pipescore::PipeScore;
use std::io::Write;
use std::sync::Arc;

fn write_snapshot(json: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.to_string().as_bytes()).unwrap();
    file
}

fn sample() -> serde_json::Value {
    serde_json::json!({
        "closed_won": [
            {
                "Id": "006W1",
                "Name": "Acme phase 1",
                "Account": {"Id": "001ACME", "Name": "Acme"},
                "Professional_Services_Amount__c": 40000,
                "CreatedDate": "2024-02-01T09:30:00.000+0000",
                "CloseDate": "2024-03-02",
                "IsWon": true,
                "OpportunityLineItems": {"records": [{"Product2": {"Name": "Migration"}}]}
            },
            {
                "Id": "006W2",
                "Name": "Acme phase 2",
                "Account": {"Id": "001ACME", "Name": "Acme"},
                "Professional_Services_Amount__c": 60000,
                "CreatedDate": "not a date",
                "CloseDate": "2024-08-15",
                "IsWon": true,
                "OpportunityLineItems": null
            },
            {
                "Id": "006W3",
                "Name": "Ancient",
                "Account": {"Id": "001OLD", "Name": "Old Co"},
                "Professional_Services_Amount__c": 5000,
                "CreatedDate": "2019-01-01",
                "CloseDate": "2019-02-01"
            },
            {
                "Id": "006W4",
                "Name": "No account",
                "Account": null,
                "Professional_Services_Amount__c": 7000,
                "CloseDate": "2024-05-01"
            }
        ],
        "closed_lost": [
            {"Id": "006L1", "Account": {"Id": "001ACME", "Name": "Acme"}, "CloseDate": "2024-04-01", "StageName": "Closed Lost"}
        ],
        "open": [
            {
                "Id": "006O1",
                "Name": "Acme phase 3",
                "Account": {"Id": "001ACME", "Name": "Acme"},
                "Professional_Services_Amount__c": 80000,
                "StageName": "Negotiation",
                "CloseDate": "2026-11-30",
                "Owner": {"Name": "Sam Seller"}
            }
        ]
    })
}

#[tokio::test]
async fn test_snapshot_records_are_typed_and_windowed() {
    let file = write_snapshot(&sample());
    let source = JsonSnapshotSource::new(file.path());

    let won = source.closed_won(date(2024, 1, 1)).await.unwrap();
    assert_eq!(won.len(), 3);
    assert!(won.iter().all(|d| d.id != "006W3"));
    let phase2 = won.iter().find(|d| d.id == "006W2").unwrap();
    assert!(phase2.created_date.is_none());
    assert_eq!(phase2.close_date, Some(date(2024, 8, 15)));

    let lost = source.closed_lost(date(2024, 1, 1)).await.unwrap();
    assert_eq!(lost.len(), 1);

    let open = source.open_pipeline().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].owner_name, "Sam Seller");
}

#[tokio::test]
async fn test_snapshot_end_to_end() {
    let file = write_snapshot(&sample());
    let ps = PipeScore::with_source(":memory:", Arc::new(JsonSnapshotSource::new(file.path()))).unwrap();

    let run = ps
        .score(&ScoreRequest {
            since: date(2024, 1, 1),
            min_score: None,
            limit: None,
            persist: false,
        })
        .await
        .unwrap();

    assert_eq!(run.opportunities.len(), 1);
    let acme = &run.opportunities[0];
    assert!(acme.has_history);
    // Two wins, one loss.
    assert!((acme.components.win_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(acme.components.upsell, 70.0);
    // 80k vs 50k average
    assert_eq!(acme.amount_ratio_score, 100.0);
    assert_eq!(run.data_quality.closed_missing_account, 1);
    assert_eq!(run.data_quality.cycle_samples_skipped, 1);
    assert_eq!(run.summary.accounts_profiled, 1);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let source = JsonSnapshotSource::new("/nonexistent/pipescore/snapshot.json");
    let err = source.open_pipeline().await.unwrap_err();
    assert!(matches!(err, DomainError::Io(_)));
}

#[tokio::test]
async fn test_malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"closed_won\": 42}").unwrap();
    let source = JsonSnapshotSource::new(file.path());
    let err = source.closed_won(date(2024, 1, 1)).await.unwrap_err();
    assert!(matches!(err, DomainError::Parse(_)));
}

#[tokio::test]
async fn test_is_won_flag_decides_outcome() {
    let snapshot = serde_json::json!({
        "closed_won": [
            {
                "Id": "006W1",
                "Account": {"Id": "001ACME", "Name": "Acme"},
                "Professional_Services_Amount__c": 40000,
                "CreatedDate": "2024-02-01",
                "CloseDate": "2024-03-02",
                "IsWon": true
            },
            {
                "Id": "006W2",
                "Account": {"Id": "001ACME", "Name": "Acme"},
                "Professional_Services_Amount__c": 90000,
                "CreatedDate": "2024-05-01",
                "CloseDate": "2024-06-01",
                "IsWon": false
            },
            {
                "Id": "006W3",
                "Account": {"Id": "001BETA", "Name": "Beta"},
                "Professional_Services_Amount__c": 15000,
                "CloseDate": "2024-06-01",
                "IsWon": false
            }
        ],
        "closed_lost": [],
        "open": []
    });
    let file = write_snapshot(&snapshot);
    let ps = PipeScore::with_source(":memory:", Arc::new(JsonSnapshotSource::new(file.path()))).unwrap();

    let report = ps.profiles(date(2024, 1, 1)).await.unwrap();
    assert_eq!(report.profiles.len(), 1);
    let acme = &report.profiles["001ACME"];
    assert_eq!(acme.closed_won, 1);
    assert_eq!(acme.closed_lost, 1);
    assert_eq!(acme.win_rate, 50.0);
    assert_eq!(acme.largest_deal_amount, 40_000.0);
    assert_eq!(report.data_quality.losses_without_profile, 1);
}
