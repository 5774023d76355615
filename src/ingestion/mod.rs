//! Ingestion entrypoints.
//!
//! Datasets arrive as JSON row records, either in a request body ([`records::ingest_records`])
//! or from a file holding a JSON array of objects ([`records::ingest_records_from_path`]).

pub mod records;

pub use records::{ingest_records, ingest_records_from_path, ingest_records_from_str, scalar_from_json};
