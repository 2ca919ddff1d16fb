pub mod json_snapshot;
pub mod memory;
