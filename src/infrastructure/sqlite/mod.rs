pub mod migrations;
pub mod score_repo;
