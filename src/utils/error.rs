// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing or empty term category '{0}' (required by the scoring formulas)")]
    MissingCategory(&'static str),

    #[error("No section header patterns configured")]
    NoSectionPatterns,

    #[error("Invalid pattern: {0}")]
    BadPattern(String),

    #[error("Score weights must be finite numbers")]
    BadWeights,
}

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Raw filings directory not found: {0}")]
    RootNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No text could be extracted from the document")]
    EmptyText,

    #[error("Document too short: {words} words (floor is {floor})")]
    BelowWordFloor { words: usize, floor: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Filing collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
