pub mod cohort;
pub mod confidence;
pub mod deal_outcome;
pub mod money;
pub mod score_band;
