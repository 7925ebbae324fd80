pub mod aggregate;
pub mod enrich;
pub mod error;
pub mod export;
pub mod models;
pub mod report;
pub mod store;
