mod extraction_service;

pub use extraction_service::{Extraction, ExtractionError, ExtractionService};
