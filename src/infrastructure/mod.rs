pub mod salesforce;
pub mod sources;
pub mod sqlite;
