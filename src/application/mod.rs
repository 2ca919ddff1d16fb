pub mod cohort;
pub mod history;
pub mod profile_builder;
pub mod score_pipeline;
pub mod scorer;
