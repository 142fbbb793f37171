/// Error taxonomy for the lookup pipeline.
///
/// Validation errors (`MissingParameter`, `InvalidText`) abort a request.
/// Source errors (`FetchFailed`, `ParseFailed`) are confined to the slot of
/// the source that produced them.
use std::fmt;

use thiserror::Error;

/// A request parameter the orchestrator requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Bkrs,
    Zhonga,
    Text,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Bkrs => write!(f, "bkrs"),
            Param::Zhonga => write!(f, "zhonga"),
            Param::Text => write!(f, "text"),
        }
    }
}

/// Which text rule a query broke. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextViolation {
    TooLong,
    Empty,
    NotChinese,
}

impl fmt::Display for TextViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextViolation::TooLong => write!(f, "text length exceeds the allowed maximum"),
            TextViolation::Empty => write!(f, "text field is empty"),
            TextViolation::NotChinese => write!(f, "text must be written in Chinese"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request is missing the {0} parameter")]
    MissingParameter(Param),

    #[error("{0}")]
    InvalidText(TextViolation),

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("parse failed: {0}")]
    ParseFailed(String),
}

impl LookupError {
    /// True for errors that reject the whole request rather than one source.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LookupError::MissingParameter(_) | LookupError::InvalidText(_)
        )
    }

    /// Stable machine-readable tag used in error placeholders.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::MissingParameter(_) => "missing_parameter",
            LookupError::InvalidText(_) => "invalid_text",
            LookupError::FetchFailed(_) => "fetch_failed",
            LookupError::ParseFailed(_) => "parse_failed",
        }
    }
}
