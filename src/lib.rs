//! Coocnet
//!
//! Builds co-occurrence networks from a corpus of social media posts and
//! analyzes them: community detection, force-directed layout, and centrality
//! statistics, exported as Gephi-style tables.
//!
//! # Network types
//! - Hashtag co-occurrence (hashtags appearing in the same post)
//! - Word co-occurrence (tokens appearing in the same post)
//! - Author similarity (Jaccard over the hashtag vocabularies of authors)
//! - Author-hashtag bipartite (authors linked to the hashtags they use)
//!
//! # Pipeline
//! Extraction -> aggregation -> threshold filtering -> finalized graph ->
//! {communities, layout, statistics} -> tabular exports. The graph is
//! immutable after the filter stage; all analysis steps are read-only.

pub mod community;
pub mod config;
pub mod constants;
pub mod cooccur;
pub mod errors;
pub mod export;
pub mod extract;
pub mod layout;
pub mod network;
pub mod pipeline;
pub mod post;
pub mod stats;

// Re-export dependencies to ensure tests/benchmarks use the same version
pub use chrono;
pub use petgraph;
