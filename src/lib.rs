//! # hanzi-lookup: Chinese dictionary lookup service
//!
//! Looks up a Chinese query against the bkrs.info and zhonga.ru web
//! dictionaries and returns normalized headword / pinyin / translation
//! entries.
//!
//! ## Architecture
//!
//! - **[`script`]**: CJK script classification of query text
//! - **[`document`]**: Typed document tree over parsed HTML (and in-memory test trees)
//! - **[`source`]**: Dictionary sources and the blocking HTTP client that fetches their pages
//! - **[`extract`]**: Per-source structural extractors (multi-entry and single-entry layouts)
//! - **[`lookup`]**: Orchestrator: validation, per-source pipelines, result assembly
//! - **[`server`]**: axum HTTP API (`POST /translate/`) behind a bearer-token gate
//! - **[`auth`]**: Caller authentication boundary
//! - **[`config`]**: JSON configuration loading and validation
//! - **[`error`]**: Error taxonomy

pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod script;
pub mod server;
pub mod source;
