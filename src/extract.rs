//! Entity extraction and text normalization
//!
//! An extractor turns one post into the finite list of entities that post
//! contributes to the co-occurrence computation: hashtags matched by
//! pattern, word tokens, or the single author handle. Deduplication happens
//! downstream in the aggregator; extraction itself has no side effects.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::CleaningConfig;
use crate::errors::{PipelineError, Result};
use crate::post::Post;

static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern"));

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("url pattern"));

// Keeps word characters, hashtag/mention markers, and Latin-1 accented
// letters; everything else becomes a separator.
static NON_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w#@À-ÖØ-öø-ÿ\s]").expect("non-word pattern"));

static MULTISPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("multispace pattern"));

/// What kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hashtag,
    Word,
    Author,
}

impl EntityKind {
    /// String form used in the node table's `Type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hashtag => "hashtag",
            Self::Word => "word",
            Self::Author => "author",
        }
    }
}

/// Scan text for hashtags (`#` followed by word characters), lowercased
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Normalize raw post text: strip URLs, drop punctuation, collapse
/// whitespace, lowercase
pub fn clean_text(raw: &str) -> String {
    let no_urls = URL_PATTERN.replace_all(raw, " ");
    let words_only = NON_WORD_PATTERN.replace_all(&no_urls, " ");
    let collapsed = MULTISPACE_PATTERN.replace_all(&words_only, " ");
    collapsed.trim().to_lowercase()
}

/// Tokenize cleaned text into normalized word tokens
///
/// Drops tokens below the minimum length, hashtags and mentions (they are
/// their own entity kinds), stopwords, and blacklisted terms.
pub fn tokenize(clean: &str, config: &CleaningConfig) -> Vec<String> {
    clean
        .split_whitespace()
        .filter(|t| t.chars().count() >= config.min_token_len)
        .filter(|t| !t.starts_with('#') && !t.starts_with('@'))
        .filter(|t| !config.stopwords.contains(*t) && !config.blacklist.contains(*t))
        .map(str::to_string)
        .collect()
}

/// Apply the cleaning step to raw posts: fill `text_clean` and `tokens`
/// on every record, dropping posts whose cleaned text comes out empty
pub fn prepare_posts(posts: Vec<Post>, config: &CleaningConfig) -> Vec<Post> {
    posts
        .into_iter()
        .filter_map(|mut post| {
            let clean = clean_text(&post.text);
            if clean.is_empty() {
                return None;
            }
            post.tokens = Some(tokenize(&clean, config));
            post.text_clean = Some(clean);
            Some(post)
        })
        .collect()
}

/// Pulls entities of one kind out of posts
///
/// The optional exclusion set implements the "without generics" network
/// variants: the same pipeline, minus a configured set of corpus-dominant
/// entities.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    kind: EntityKind,
    excluded: HashSet<String>,
}

impl EntityExtractor {
    /// Hashtag extractor; `excluded` lists tags to drop (may be empty)
    pub fn hashtags(excluded: HashSet<String>) -> Self {
        Self {
            kind: EntityKind::Hashtag,
            excluded,
        }
    }

    /// Word extractor over the post's tokenized/cleaned text
    pub fn words(excluded: HashSet<String>) -> Self {
        Self {
            kind: EntityKind::Word,
            excluded,
        }
    }

    /// Author extractor: one entity per post, the author handle
    pub fn authors() -> Self {
        Self {
            kind: EntityKind::Author,
            excluded: HashSet::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Extract this post's entity list (possibly with repeats; the
    /// aggregator deduplicates per post)
    pub fn extract(&self, post: &Post) -> Result<Vec<String>> {
        let entities = match self.kind {
            EntityKind::Hashtag => extract_hashtags(post.hashtag_source()),
            EntityKind::Word => {
                let tokens = post.word_tokens().ok_or_else(|| PipelineError::Schema {
                    field: "tokens_str".to_string(),
                    reason: "word extraction needs 'tokens_str' or 'text_clean'".to_string(),
                })?;
                tokens.into_iter().map(str::to_string).collect()
            }
            EntityKind::Author => {
                if post.author_handle.is_empty() {
                    return Err(PipelineError::Schema {
                        field: "author_handle".to_string(),
                        reason: "post has no author handle".to_string(),
                    });
                }
                vec![post.author_handle.clone()]
            }
        };

        if self.excluded.is_empty() {
            return Ok(entities);
        }
        Ok(entities
            .into_iter()
            .filter(|e| !self.excluded.contains(e))
            .collect())
    }
}
