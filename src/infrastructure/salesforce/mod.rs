pub mod client;
pub mod queries;
pub mod records;

pub use client::SalesforceSource;
