//! Tagdex - An embeddable document search engine.
//!
//! Tagdex keeps an in-memory inverted index of documents, each carrying free
//! text, a set of tags and a popularity counter. It answers exact, fuzzy and
//! multi-tag queries, ranked free-text and `NOT`-style boolean queries and
//! prefix completion, and persists the index to a compact binary file.
//!
//! Long queries fan out over an injected [`executor::TaskExecutor`]; the
//! `parallel` feature (on by default) provides rayon-backed executors.
//! Diagnostics are emitted as [`tracing`] events from the [`engine`] facade;
//! the host application installs the subscriber.

pub mod config;
pub mod context;
pub mod document;
pub mod engine;
pub mod error;
pub mod executor;
pub mod index;
pub mod persistence;
pub mod ranking;
pub mod searchers;
pub mod types;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::document::*;
    pub use crate::engine::*;
    pub use crate::error::SearchError;
    pub use crate::executor::*;
    pub use crate::index::*;
    pub use crate::types::*;
}
