pub mod replication;
pub mod report;
