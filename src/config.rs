//! Configuration for the network builders and analysis stages
//!
//! All thresholds live in explicit config structs passed into each builder
//! call; there is no module-level mutable state. Defaults mirror the values
//! documented in [`crate::constants`].

use std::collections::HashSet;

use crate::constants::*;

/// Thresholds for the standard co-occurrence networks (hashtag, word)
#[derive(Debug, Clone)]
pub struct CooccurrenceConfig {
    /// Minimum number of posts an entity must appear in to become a node
    pub min_entity_freq: u64,

    /// Minimum number of shared posts for an edge between two entities
    pub min_edge_weight: u64,

    /// Optional node cap: keep only the top-N entities by frequency
    /// (ties broken by frequency descending, then label ascending)
    pub max_nodes: Option<usize>,
}

impl CooccurrenceConfig {
    /// Thresholds for the hashtag co-occurrence network
    pub fn hashtags() -> Self {
        Self {
            min_entity_freq: DEFAULT_MIN_HASHTAG_FREQ,
            min_edge_weight: DEFAULT_MIN_HASHTAG_EDGE_WEIGHT,
            max_nodes: None,
        }
    }

    /// Thresholds for the word co-occurrence network
    pub fn words() -> Self {
        Self {
            min_entity_freq: DEFAULT_MIN_WORD_FREQ,
            min_edge_weight: DEFAULT_MIN_WORD_EDGE_WEIGHT,
            max_nodes: Some(DEFAULT_MAX_WORD_NODES),
        }
    }
}

impl Default for CooccurrenceConfig {
    fn default() -> Self {
        Self::hashtags()
    }
}

/// Thresholds for the author similarity network
///
/// Authors are linked by the Jaccard similarity of their hashtag
/// vocabularies, not by co-occurrence counts; both a minimum shared count
/// and a minimum similarity must hold for an edge to exist.
#[derive(Debug, Clone)]
pub struct AuthorNetworkConfig {
    /// Minimum posts for an author to qualify as a node
    pub min_posts_per_author: u64,

    /// Minimum distinct hashtags for an author to qualify as a node
    pub min_unique_hashtags: usize,

    /// Minimum shared hashtags for an edge
    pub min_shared_hashtags: usize,

    /// Minimum Jaccard similarity for an edge
    pub min_jaccard: f64,

    /// Hashtags stripped before similarity is computed; the show's own
    /// tags would otherwise connect every pair of authors
    pub generic_hashtags: HashSet<String>,
}

impl Default for AuthorNetworkConfig {
    fn default() -> Self {
        Self {
            min_posts_per_author: DEFAULT_MIN_POSTS_PER_AUTHOR,
            min_unique_hashtags: DEFAULT_MIN_UNIQUE_HASHTAGS,
            min_shared_hashtags: DEFAULT_MIN_SHARED_HASHTAGS,
            min_jaccard: DEFAULT_MIN_JACCARD,
            generic_hashtags: GENERIC_HASHTAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Thresholds for the author-hashtag bipartite network
#[derive(Debug, Clone)]
pub struct BipartiteConfig {
    /// Minimum posts for an author to qualify as a node
    pub min_posts_per_author: u64,

    /// Minimum frequency for a hashtag to qualify as a node
    pub min_hashtag_freq: u64,

    /// Minimum posts-by-author-containing-hashtag for an edge
    pub min_edge_weight: u64,

    /// Hashtags stripped before counting (empty set keeps everything)
    pub generic_hashtags: HashSet<String>,
}

impl Default for BipartiteConfig {
    fn default() -> Self {
        Self {
            min_posts_per_author: DEFAULT_MIN_POSTS_PER_AUTHOR,
            min_hashtag_freq: DEFAULT_MIN_BIPARTITE_HASHTAG_FREQ,
            min_edge_weight: DEFAULT_MIN_BIPARTITE_EDGE_WEIGHT,
            generic_hashtags: HashSet::new(),
        }
    }
}

/// Parameters for the layout engine
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Fixed step count for the primary force-directed layout; the layout
    /// terminates after this many iterations regardless of convergence
    pub iterations: usize,

    /// Repulsion scaling for the primary layout
    pub scaling_ratio: f64,

    /// Gravity toward the origin
    pub gravity: f64,

    /// Barnes-Hut opening angle for approximate repulsion
    pub barnes_hut_theta: f64,

    /// Exponent applied to edge weight when computing attraction
    pub edge_weight_influence: f64,

    /// RNG seed for the fallback spring layout (reproducible output)
    pub seed: u64,

    /// Step count for the fallback spring layout
    pub spring_iterations: usize,

    /// Optimal node distance for the fallback spring layout
    pub spring_optimal_distance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_LAYOUT_ITERATIONS,
            scaling_ratio: DEFAULT_SCALING_RATIO,
            gravity: DEFAULT_GRAVITY,
            barnes_hut_theta: DEFAULT_BARNES_HUT_THETA,
            edge_weight_influence: DEFAULT_EDGE_WEIGHT_INFLUENCE,
            seed: DEFAULT_LAYOUT_SEED,
            spring_iterations: DEFAULT_SPRING_ITERATIONS,
            spring_optimal_distance: DEFAULT_SPRING_OPTIMAL_DISTANCE,
        }
    }
}

/// Output range for min-max scaling of a visual attribute
#[derive(Debug, Clone, Copy)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Default node size range in rendering units
    pub fn node_sizes() -> Self {
        Self::new(DEFAULT_NODE_SIZE_MIN, DEFAULT_NODE_SIZE_MAX)
    }

    /// Default edge width range in rendering units
    pub fn edge_widths() -> Self {
        Self::new(DEFAULT_EDGE_WIDTH_MIN, DEFAULT_EDGE_WIDTH_MAX)
    }

    /// Midpoint of the range, used when every input value is equal
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Rules for text cleaning and tokenization
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    /// Minimum token length kept by the tokenizer
    pub min_token_len: usize,

    /// Stopwords dropped by the tokenizer
    pub stopwords: HashSet<String>,

    /// Corpus-specific blacklist dropped by the tokenizer
    pub blacklist: HashSet<String>,

    /// Author handles whose posts are dropped entirely (aggregator bots)
    pub aggregator_handles: HashSet<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            stopwords: STOPWORDS_PT.iter().map(|s| s.to_string()).collect(),
            blacklist: GENERIC_TERMS.iter().map(|s| s.to_string()).collect(),
            aggregator_handles: AGGREGATOR_HANDLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
