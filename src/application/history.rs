use crate::domain::entities::score_run::{ScoreRun, ScoreRunHeader};
use crate::domain::error::DomainError;
use crate::domain::ports::score_repository::ScoreRepository;
use std::sync::Arc;

pub struct HistoryUseCase {
    repo: Arc<dyn ScoreRepository>,
}

impl HistoryUseCase {
    pub fn new(repo: Arc<dyn ScoreRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self, limit: usize) -> Result<Vec<ScoreRunHeader>, DomainError> {
        self.repo.list_runs(limit)
    }

    pub fn get(&self, id: &str) -> Result<ScoreRun, DomainError> {
        self.repo
            .get_run(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Score run not found: {id}")))
    }
}
