use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard bucket for an opportunity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub const HIGH_MIN: f64 = 75.0;
    pub const MEDIUM_MIN: f64 = 50.0;

    pub fn of(score: f64) -> Self {
        if score >= Self::HIGH_MIN {
            ScoreBand::High
        } else if score >= Self::MEDIUM_MIN {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::High => write!(f, "high"),
            ScoreBand::Medium => write!(f, "medium"),
            ScoreBand::Low => write!(f, "low"),
        }
    }
}
