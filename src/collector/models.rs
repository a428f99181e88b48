// src/collector/models.rs
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifying metadata for one discovered filing document.
///
/// Produced once per document by the collector, consumed exactly once by the
/// pipeline, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingMetadata {
    pub cik: String,
    pub ticker: String,
    pub form_type: String,
    /// Filing date as YYYY-MM-DD, taken from the submission header.
    pub filing_date: String,
    pub path: PathBuf,
}

impl FilingMetadata {
    /// Reads the raw document body. Decoding is lossy: invalid UTF-8 bytes
    /// are replaced rather than failing the document.
    pub fn read_body(&self) -> std::io::Result<String> {
        let mut bytes = Vec::new();
        std::fs::File::open(&self.path)?.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
