use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid record at data row {row}: {source}")]
    Schema {
        row: usize,
        #[source]
        source: CoreError,
    },

    #[error("Failed to load statement book '{path}': {source}")]
    Statement {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Statement book '{path}' defines '{name}' more than once")]
    DuplicateStatement { path: PathBuf, name: String },

    #[error("Cannot generate synthetic records: {0}")]
    Generator(String),
}
