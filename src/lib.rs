pub mod colors;
pub mod dashboard;
pub mod datasource;
pub mod ingest;
pub mod interchange;
pub mod logging;
pub mod pagination;
pub mod persist;
pub mod query;
pub mod table;
