/// Canned source client for tests.
///
/// Returns a fixed page (or a fixed fetch failure) and counts how many
/// times it was asked, so callers can assert that no fetch happened.
use std::sync::atomic::{AtomicUsize, Ordering};

use super::SourceClient;
use crate::error::LookupError;

enum Reply {
    Page(String),
    Failure(String),
}

pub struct StaticSourceClient {
    reply: Reply,
    calls: AtomicUsize,
}

impl StaticSourceClient {
    /// A client that always returns `markup`.
    #[must_use]
    pub fn page(markup: &str) -> Self {
        Self {
            reply: Reply::Page(markup.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every fetch fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Reply::Failure(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SourceClient for StaticSourceClient {
    fn fetch(&self, _query: &str) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Page(markup) => Ok(markup.clone()),
            Reply::Failure(message) => Err(LookupError::FetchFailed(message.clone())),
        }
    }
}
