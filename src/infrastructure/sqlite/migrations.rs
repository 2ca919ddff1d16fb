use rusqlite::Connection;

use crate::domain::error::DomainError;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS score_runs (
            id TEXT PRIMARY KEY,
            generated_at TEXT NOT NULL,
            lookback_start TEXT NOT NULL,
            summary TEXT NOT NULL,
            cohort TEXT NOT NULL,
            data_quality TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS opportunity_scores (
            run_id TEXT NOT NULL REFERENCES score_runs(id) ON DELETE CASCADE,
            rank INTEGER NOT NULL,
            opportunity_id TEXT NOT NULL,
            opportunity_name TEXT NOT NULL,
            account_id TEXT NOT NULL,
            account_name TEXT NOT NULL,
            amount REAL NOT NULL,
            stage TEXT NOT NULL,
            sales_commit TEXT,
            close_date TEXT,
            owner_name TEXT NOT NULL,
            speed_score REAL NOT NULL,
            deal_size_score REAL NOT NULL,
            product_mix_score REAL NOT NULL,
            upsell_score REAL NOT NULL,
            win_rate_score REAL NOT NULL,
            recency_score REAL NOT NULL,
            amount_ratio_score REAL NOT NULL,
            account_score REAL NOT NULL,
            opportunity_score REAL NOT NULL,
            confidence_level TEXT NOT NULL,
            has_history INTEGER NOT NULL,
            explanation TEXT NOT NULL,
            PRIMARY KEY (run_id, rank)
        );

        CREATE INDEX IF NOT EXISTS idx_runs_generated ON score_runs(generated_at);
        CREATE INDEX IF NOT EXISTS idx_scores_account ON opportunity_scores(account_id);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
