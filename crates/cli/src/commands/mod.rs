//! Command handlers for the tutor CLI.

mod ingest;
mod serve;

pub use ingest::IngestCommand;
pub use serve::ServeCommand;
