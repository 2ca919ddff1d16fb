pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::history::HistoryUseCase;
use crate::application::score_pipeline::{ProfileReport, ScorePipelineUseCase, ScoreRequest};
use crate::config::Config;
use crate::domain::entities::score_run::{ScoreRun, ScoreRunHeader};
use crate::domain::error::DomainError;
use crate::domain::ports::deal_source::DealSource;
use crate::domain::ports::score_repository::ScoreRepository;
use crate::infrastructure::salesforce::SalesforceSource;
use crate::infrastructure::sources::json_snapshot::JsonSnapshotSource;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::score_repo::SqliteScoreRepo;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::Arc;

pub struct PipeScore {
    score_uc: ScorePipelineUseCase,
    history_uc: HistoryUseCase,
}

impl PipeScore {
    /// Open the history database and pick a data source: the JSON snapshot
    /// at `input` if given, otherwise Salesforce from `config`.
    pub fn new(config: &Config, input: Option<&str>) -> Result<Self, DomainError> {
        let source: Arc<dyn DealSource> = match input {
            Some(path) => Arc::new(JsonSnapshotSource::new(path)),
            None => Arc::new(SalesforceSource::new(config.require_salesforce()?)),
        };
        Self::with_source(&config.db_path, source)
    }

    pub fn with_source(db_path: &str, source: Arc<dyn DealSource>) -> Result<Self, DomainError> {
        let repo = open_repo(db_path)?;
        Ok(Self {
            score_uc: ScorePipelineUseCase::new(source, repo.clone()),
            history_uc: HistoryUseCase::new(repo),
        })
    }

    /// History access without a data source, for commands that only read
    /// past runs.
    pub fn history_store(db_path: &str) -> Result<HistoryUseCase, DomainError> {
        Ok(HistoryUseCase::new(open_repo(db_path)?))
    }

    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreRun, DomainError> {
        self.score_uc.execute(request).await
    }

    pub async fn profiles(&self, since: NaiveDate) -> Result<ProfileReport, DomainError> {
        self.score_uc.profiles(since).await
    }

    pub fn history(&self, limit: usize) -> Result<Vec<ScoreRunHeader>, DomainError> {
        self.history_uc.list(limit)
    }

    pub fn run(&self, id: &str) -> Result<ScoreRun, DomainError> {
        self.history_uc.get(id)
    }
}

fn open_repo(db_path: &str) -> Result<Arc<dyn ScoreRepository>, DomainError> {
    let conn =
        Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| DomainError::Database(format!("Pragma error: {e}")))?;
    run_migrations(&conn)?;
    Ok(Arc::new(SqliteScoreRepo::new(conn)))
}
