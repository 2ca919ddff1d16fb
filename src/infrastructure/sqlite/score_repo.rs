use crate::domain::entities::opportunity_score::{ComponentScores, OpportunityScore};
use crate::domain::entities::score_run::{PipelineSummary, ScoreRun, ScoreRunHeader};
use crate::domain::error::DomainError;
use crate::domain::ports::score_repository::ScoreRepository;
use crate::domain::values::confidence::ConfidenceLevel;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;
use tracing::warn;

const SCORE_COLUMNS: &str = "opportunity_id, opportunity_name, account_id, account_name, amount, stage, sales_commit, close_date, owner_name, speed_score, deal_size_score, product_mix_score, upsell_score, win_rate_score, recency_score, amount_ratio_score, account_score, opportunity_score, confidence_level, has_history, explanation";

pub struct SqliteScoreRepo {
    conn: Mutex<Connection>,
}

impl SqliteScoreRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_score(row: &rusqlite::Row) -> Result<OpportunityScore, rusqlite::Error> {
        let close_str: Option<String> = row.get(7)?;
        let confidence_str: String = row.get(18)?;

        Ok(OpportunityScore {
            opportunity_id: row.get(0)?,
            opportunity_name: row.get(1)?,
            account_id: row.get(2)?,
            account_name: row.get(3)?,
            amount: row.get(4)?,
            stage: row.get(5)?,
            commit: row.get(6)?,
            close_date: close_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            owner_name: row.get(8)?,
            components: ComponentScores {
                speed: row.get(9)?,
                deal_size: row.get(10)?,
                product_mix: row.get(11)?,
                upsell: row.get(12)?,
                win_rate: row.get(13)?,
                recency: row.get(14)?,
            },
            amount_ratio_score: row.get(15)?,
            account_score: row.get(16)?,
            opportunity_score: row.get(17)?,
            confidence_level: confidence_str.parse().unwrap_or_else(|_| {
                warn!("Invalid confidence level '{confidence_str}' in stored score, defaulting to Low");
                ConfidenceLevel::Low
            }),
            has_history: row.get::<_, i64>(19)? != 0,
            explanation: row.get(20)?,
        })
    }

    fn parse_generated_at(s: &str) -> Result<DateTime<Utc>, DomainError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::Parse(format!("Stored run timestamp '{s}' is invalid: {e}")))
    }

    fn parse_lookback(s: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| DomainError::Parse(format!("Stored lookback date '{s}' is invalid: {e}")))
    }

    fn from_json<T: serde::de::DeserializeOwned>(s: &str, what: &str) -> Result<T, DomainError> {
        serde_json::from_str(s).map_err(|e| DomainError::Parse(format!("Stored {what} is invalid: {e}")))
    }

    fn to_json<T: serde::Serialize>(v: &T) -> Result<String, DomainError> {
        serde_json::to_string(v).map_err(|e| DomainError::Parse(e.to_string()))
    }
}

impl ScoreRepository for SqliteScoreRepo {
    fn save_run(&self, run: &ScoreRun) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO score_runs (id, generated_at, lookback_start, summary, cohort, data_quality)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run.id,
                run.generated_at.to_rfc3339(),
                run.lookback_start.format("%Y-%m-%d").to_string(),
                Self::to_json(&run.summary)?,
                Self::to_json(&run.cohort)?,
                Self::to_json(&run.data_quality)?,
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to save run: {e}")))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO opportunity_scores (run_id, rank, {SCORE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)"
                ))
                .map_err(|e| DomainError::Database(e.to_string()))?;
            for (rank, s) in run.opportunities.iter().enumerate() {
                stmt.execute(params![
                    run.id,
                    rank as i64,
                    s.opportunity_id,
                    s.opportunity_name,
                    s.account_id,
                    s.account_name,
                    s.amount,
                    s.stage,
                    s.commit,
                    s.close_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    s.owner_name,
                    s.components.speed,
                    s.components.deal_size,
                    s.components.product_mix,
                    s.components.upsell,
                    s.components.win_rate,
                    s.components.recency,
                    s.amount_ratio_score,
                    s.account_score,
                    s.opportunity_score,
                    s.confidence_level.to_string(),
                    s.has_history as i64,
                    s.explanation,
                ])
                .map_err(|e| DomainError::Database(format!("Failed to save score: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| DomainError::Database(format!("Failed to commit run: {e}")))
    }

    fn list_runs(&self, limit: usize) -> Result<Vec<ScoreRunHeader>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT r.id, r.generated_at, r.lookback_start, r.summary,
                        (SELECT COUNT(*) FROM opportunity_scores s WHERE s.run_id = r.id)
                 FROM score_runs r ORDER BY r.generated_at DESC LIMIT ?1",
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let rows: Vec<(String, String, String, String, i64)> = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        let mut headers = Vec::with_capacity(rows.len());
        for (id, generated_at, lookback, summary, stored) in rows {
            let summary: PipelineSummary = Self::from_json(&summary, "summary")?;
            let lookback_start = Self::parse_lookback(&lookback)?;
            headers.push(ScoreRunHeader {
                id,
                generated_at: Self::parse_generated_at(&generated_at)?,
                lookback_start,
                total_opportunities: summary.total_opportunities,
                total_pipeline_value: summary.total_pipeline_value,
                accounts_profiled: summary.accounts_profiled,
                stored_opportunities: stored as usize,
            });
        }
        Ok(headers)
    }

    fn get_run(&self, id: &str) -> Result<Option<ScoreRun>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let row: Option<(String, String, String, String, String)> = conn
            .query_row(
                "SELECT generated_at, lookback_start, summary, cohort, data_quality
                 FROM score_runs WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let Some((generated_at, lookback, summary, cohort, data_quality)) = row else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SCORE_COLUMNS} FROM opportunity_scores WHERE run_id = ?1 ORDER BY rank"
            ))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let opportunities = stmt
            .query_map(params![id], Self::row_to_score)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Some(ScoreRun {
            id: id.to_string(),
            generated_at: Self::parse_generated_at(&generated_at)?,
            lookback_start: Self::parse_lookback(&lookback)?,
            summary: Self::from_json(&summary, "summary")?,
            cohort: Self::from_json(&cohort, "cohort")?,
            data_quality: Self::from_json(&data_quality, "data quality")?,
            opportunities,
        }))
    }
}
