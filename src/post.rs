//! Post records and dataset loading
//!
//! The pipeline consumes a cleaned tabular dataset produced by an upstream
//! preparation step. Each row carries the author handle, the raw and/or
//! cleaned text, and optionally a pre-tokenized form. Posts are immutable
//! once loaded.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CleaningConfig;
use crate::errors::{PipelineError, Result};

/// One input record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Author handle (e.g. "somebody.bsky.social")
    pub author_handle: String,

    /// Raw post text
    pub text: String,

    /// Cleaned text: URLs stripped, punctuation removed, lowercased
    pub text_clean: Option<String>,

    /// Pre-tokenized normalized tokens, when the upstream step produced them
    pub tokens: Option<Vec<String>>,

    /// Publication timestamp, when the dataset carries one
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(author_handle: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author_handle: author_handle.into(),
            text: text.into(),
            text_clean: None,
            tokens: None,
            created_at: None,
        }
    }

    /// Text used for hashtag extraction (raw preferred, since cleaning may
    /// have stripped the `#` marker)
    pub fn hashtag_source(&self) -> &str {
        &self.text
    }

    /// Word tokens: the pre-tokenized form when present, otherwise the
    /// cleaned text split on whitespace
    pub fn word_tokens(&self) -> Option<Vec<&str>> {
        if let Some(tokens) = &self.tokens {
            return Some(tokens.iter().map(String::as_str).collect());
        }
        self.text_clean
            .as_deref()
            .map(|clean| clean.split_whitespace().collect())
    }
}

/// Raw CSV row as produced by the dataset preparation step. All columns are
/// optional at decode time; schema validation happens against the header.
#[derive(Debug, Deserialize)]
struct PostRow {
    author_handle: Option<String>,
    text: Option<String>,
    text_clean: Option<String>,
    tokens_str: Option<String>,
    created_at: Option<String>,
}

/// Load posts from a cleaned dataset CSV
///
/// Required columns: `author_handle`, plus at least one of `text` /
/// `text_clean`. Optional: `tokens_str` (whitespace-joined tokens),
/// `created_at` (RFC 3339). A missing file is a [`PipelineError::MissingInput`];
/// a header without the required columns is a [`PipelineError::Schema`].
pub fn load_posts(path: &Path) -> Result<Vec<Post>> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    validate_header(reader.headers()?)?;

    let mut posts = Vec::new();
    for row in reader.deserialize::<PostRow>() {
        let row = row?;
        let author_handle = row.author_handle.unwrap_or_default();
        if author_handle.is_empty() {
            continue;
        }

        let text_clean = row.text_clean.filter(|s| !s.is_empty());
        let text = match row.text.filter(|s| !s.is_empty()) {
            Some(text) => text,
            // Datasets cleaned in place may only carry text_clean
            None => text_clean.clone().unwrap_or_default(),
        };
        if text.is_empty() && text_clean.is_none() {
            continue;
        }

        let tokens = row.tokens_str.map(|s| {
            s.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let created_at = row
            .created_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        posts.push(Post {
            author_handle,
            text,
            text_clean,
            tokens,
            created_at,
        });
    }

    if posts.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    info!(posts = posts.len(), path = %path.display(), "Loaded dataset");
    Ok(posts)
}

fn validate_header(headers: &csv::StringRecord) -> Result<()> {
    let columns: HashSet<&str> = headers.iter().collect();

    if !columns.contains("author_handle") {
        return Err(PipelineError::Schema {
            field: "author_handle".to_string(),
            reason: "required column missing from dataset header".to_string(),
        });
    }
    if !columns.contains("text") && !columns.contains("text_clean") {
        return Err(PipelineError::Schema {
            field: "text".to_string(),
            reason: "dataset must carry 'text' or 'text_clean'".to_string(),
        });
    }
    Ok(())
}

/// Drop posts written by aggregator accounts, plus their trending-digest
/// reposts published under other handles
///
/// Trending-summary bots repost machine-generated digests whose hashtag
/// lists distort co-occurrence counts.
pub fn filter_aggregators(posts: Vec<Post>, config: &CleaningConfig) -> Vec<Post> {
    let before = posts.len();
    let kept: Vec<Post> = posts
        .into_iter()
        .filter(|p| !config.aggregator_handles.contains(&p.author_handle))
        .filter(|p| !p.text.to_lowercase().contains("trending words"))
        .collect();
    if kept.len() != before {
        info!(
            dropped = before - kept.len(),
            "Filtered aggregator accounts"
        );
    }
    kept
}
