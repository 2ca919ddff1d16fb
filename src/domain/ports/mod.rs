pub mod deal_source;
pub mod score_repository;
