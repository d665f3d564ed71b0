use std::num::ParseIntError;
use thiserror::Error;

/// Everything that can abort a statsparse or statsplot run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected Result line: {0}")]
    MalformedResult(String),

    #[error("unexpected [conn] line: {0}")]
    TooManyFields(String),

    #[error("no rows")]
    EmptyTable,

    #[error("stat ({0}) not found")]
    StatNotFound(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    #[error("error converting {value:?}: {source}")]
    InvalidValue {
        value: String,
        source: ParseIntError,
    },

    #[error("error rendering chart: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
