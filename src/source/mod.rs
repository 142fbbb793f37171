/// Dictionary sources and the client trait used to fetch their pages.
pub mod http;
pub mod mock;

use std::fmt;

use crate::document::DocNode;
use crate::error::LookupError;
use crate::extract::{self, Extraction};

/// One external dictionary website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// bkrs.info, the primary source.
    Bkrs,
    /// zhonga.ru, the secondary source.
    Zhonga,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Bkrs, Source::Zhonga];

    /// Key used for this source in request parameters and responses.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Source::Bkrs => "bkrs",
            Source::Zhonga => "zhonga",
        }
    }

    /// Run this source's structural extractor over a page body.
    pub fn extract<N: DocNode>(self, body: N, query: &str) -> Result<Extraction, LookupError> {
        match self {
            Source::Bkrs => extract::bkrs::extract(body, query),
            Source::Zhonga => extract::zhonga::extract(body, query),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches the raw result page of one source.
///
/// Implementations must be `Send + Sync` so a lookup can hold them behind
/// `Arc` and run on any blocking thread. A call performs exactly one
/// request; there is no retry and no caching.
pub trait SourceClient: Send + Sync {
    fn fetch(&self, query: &str) -> Result<String, LookupError>;
}
