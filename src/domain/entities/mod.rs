pub mod deal;
pub mod opportunity_score;
pub mod profile;
pub mod score_run;
