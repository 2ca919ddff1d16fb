use crate::domain::entities::score_run::{ScoreRun, ScoreRunHeader};
use crate::domain::error::DomainError;

pub trait ScoreRepository: Send + Sync {
    fn save_run(&self, run: &ScoreRun) -> Result<(), DomainError>;
    /// Newest first.
    fn list_runs(&self, limit: usize) -> Result<Vec<ScoreRunHeader>, DomainError>;
    fn get_run(&self, id: &str) -> Result<Option<ScoreRun>, DomainError>;
}
