//! Lookup orchestrator.
//!
//! A lookup moves through parameter validation, text validation, and then
//! one fetch + parse per requested source. Validation failures reject the
//! request; source failures stay in that source's slot of the result.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::Config;
use crate::document::HtmlDocument;
use crate::error::{LookupError, Param, TextViolation};
use crate::extract::Extraction;
use crate::script::is_chinese_text;
use crate::source::http::HttpSourceClient;
use crate::source::{Source, SourceClient};

/// Upper bound on query length, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Serialized value of [`SourceResult::Oversized`].
pub const OVERSIZED_MESSAGE: &str = "text length exceeds the source limit";

// ── Query ────────────────────────────────────────────────────────────

/// Which sources a caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub bkrs: bool,
    pub zhonga: bool,
}

impl Selection {
    #[must_use]
    pub fn wants(self, source: Source) -> bool {
        match source {
            Source::Bkrs => self.bkrs,
            Source::Zhonga => self.zhonga,
        }
    }
}

/// A validated lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    selection: Selection,
}

impl Query {
    /// Validate `text` and pair it with a source selection.
    pub fn new(text: &str, selection: Selection) -> Result<Self, LookupError> {
        validate_text(text)?;
        Ok(Self {
            text: text.to_string(),
            selection,
        })
    }

    /// Build a query from raw request parameters and the body's `text`
    /// field. Checks run in order and the first violation wins.
    pub fn from_request(
        params: &HashMap<String, String>,
        text: Option<&str>,
    ) -> Result<Self, LookupError> {
        let bkrs = parse_flag(params.get("bkrs").map(String::as_str), Param::Bkrs)?;
        let zhonga = parse_flag(params.get("zhonga").map(String::as_str), Param::Zhonga)?;
        let text = text.ok_or(LookupError::MissingParameter(Param::Text))?;
        Self::new(text, Selection { bkrs, zhonga })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }
}

/// A present flag is `true` only when it is exactly `"True"`; an absent
/// flag is an error.
pub fn parse_flag(value: Option<&str>, param: Param) -> Result<bool, LookupError> {
    match value {
        Some(v) => Ok(v == "True"),
        None => Err(LookupError::MissingParameter(param)),
    }
}

pub fn validate_text(text: &str) -> Result<(), LookupError> {
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(LookupError::InvalidText(TextViolation::TooLong));
    }
    if len < 1 {
        return Err(LookupError::InvalidText(TextViolation::Empty));
    }
    if !is_chinese_text(text) {
        return Err(LookupError::InvalidText(TextViolation::NotChinese));
    }
    Ok(())
}

// ── Results ──────────────────────────────────────────────────────────

/// Error placeholder stored in a failed source's slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub error: &'static str,
    pub message: String,
}

impl From<LookupError> for SourceFailure {
    fn from(err: LookupError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome for one requested source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResult {
    Found(Extraction),
    /// Query longer than the source accepts; nothing was fetched.
    Oversized,
    Failed(SourceFailure),
}

impl SourceResult {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceResult::Failed(_))
    }
}

impl Serialize for SourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceResult::Found(extraction) => extraction.serialize(serializer),
            SourceResult::Oversized => serializer.serialize_str(OVERSIZED_MESSAGE),
            SourceResult::Failed(failure) => failure.serialize(serializer),
        }
    }
}

/// Per-source results; only requested sources are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bkrs: Option<SourceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zhonga: Option<SourceResult>,
}

impl LookupResult {
    #[must_use]
    pub fn get(&self, source: Source) -> Option<&SourceResult> {
        match source {
            Source::Bkrs => self.bkrs.as_ref(),
            Source::Zhonga => self.zhonga.as_ref(),
        }
    }

    fn set(&mut self, source: Source, result: SourceResult) {
        match source {
            Source::Bkrs => self.bkrs = Some(result),
            Source::Zhonga => self.zhonga = Some(result),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bkrs.is_none() && self.zhonga.is_none()
    }

    /// True when at least one source was requested and all of them failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        let mut present = Source::ALL.iter().filter_map(|s| self.get(*s)).peekable();
        present.peek().is_some() && present.all(SourceResult::is_failed)
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Fetch + parse pipeline for one source.
#[derive(Clone)]
pub struct SourcePipeline {
    pub source: Source,
    pub client: Arc<dyn SourceClient>,
    pub max_query_len: usize,
}

impl SourcePipeline {
    #[must_use]
    pub fn new(source: Source, client: Arc<dyn SourceClient>, max_query_len: usize) -> Self {
        Self {
            source,
            client,
            max_query_len,
        }
    }

    pub fn run(&self, text: &str) -> SourceResult {
        if text.chars().count() > self.max_query_len {
            return SourceResult::Oversized;
        }

        match self.fetch_and_parse(text) {
            Ok(extraction) => SourceResult::Found(extraction),
            Err(e) => {
                warn!(source = %self.source, "lookup failed: {e}");
                SourceResult::Failed(e.into())
            }
        }
    }

    fn fetch_and_parse(&self, text: &str) -> Result<Extraction, LookupError> {
        let markup = self.client.fetch(text)?;
        let document = HtmlDocument::parse(&markup);
        self.source.extract(document.body(), text)
    }
}

/// Runs queries against the configured sources. Holds no per-request state.
#[derive(Clone)]
pub struct Lookup {
    bkrs: SourcePipeline,
    zhonga: SourcePipeline,
}

impl Lookup {
    #[must_use]
    pub fn new(bkrs: SourcePipeline, zhonga: SourcePipeline) -> Self {
        Self { bkrs, zhonga }
    }

    /// Build live HTTP pipelines from configuration.
    ///
    /// Must not be called from inside an async context.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.fetch_timeout();
        let client = |source: Source, base_url: &str| -> Result<Arc<dyn SourceClient>> {
            let client: Arc<dyn SourceClient> = Arc::new(HttpSourceClient::new(
                source,
                base_url,
                timeout,
                &config.user_agent,
            )?);
            Ok(client)
        };

        Ok(Self::new(
            SourcePipeline::new(
                Source::Bkrs,
                client(Source::Bkrs, &config.sources.bkrs.base_url)?,
                config.sources.bkrs.max_query_len,
            ),
            SourcePipeline::new(
                Source::Zhonga,
                client(Source::Zhonga, &config.sources.zhonga.base_url)?,
                config.sources.zhonga.max_query_len,
            ),
        ))
    }

    fn pipeline(&self, source: Source) -> &SourcePipeline {
        match source {
            Source::Bkrs => &self.bkrs,
            Source::Zhonga => &self.zhonga,
        }
    }

    /// Run every requested source in turn. Blocks on network I/O.
    pub fn run(&self, query: &Query) -> LookupResult {
        let selection = query.selection();
        info!(
            text = query.text(),
            bkrs = selection.bkrs,
            zhonga = selection.zhonga,
            "lookup started"
        );

        let mut result = LookupResult::default();
        for source in Source::ALL {
            if selection.wants(source) {
                result.set(source, self.pipeline(source).run(query.text()));
            }
        }

        info!(all_failed = result.all_failed(), "lookup finished");
        result
    }

    /// Validate raw request input, then run the lookup.
    pub fn lookup(
        &self,
        params: &HashMap<String, String>,
        text: Option<&str>,
    ) -> Result<LookupResult, LookupError> {
        let query = Query::from_request(params, text)?;
        Ok(self.run(&query))
    }
}
