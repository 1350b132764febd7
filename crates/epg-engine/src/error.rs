//! Error types for epg-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpgError {
    #[error("Invalid clock time: {0}")]
    InvalidClock(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid ad duration: {0}")]
    InvalidAdDuration(String),

    #[error("Mixed time modes: {0}")]
    MixedTimeModes(String),

    #[error("Unknown entry: {0}")]
    UnknownEntry(String),

    #[error("Entry ids exhausted")]
    IdsExhausted,

    #[error("Unknown campaign: {0}")]
    UnknownCampaign(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

pub type Result<T> = std::result::Result<T, EpgError>;
