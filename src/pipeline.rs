//! Network variants and the analysis pass
//!
//! The per-network scripts of the upstream workflow are one pipeline
//! parameterized by extractor mode and threshold config; the variant
//! constructors here encode those parameter sets. `analyze` is the single
//! read-only analysis pass over any finalized graph: communities, layout,
//! statistics.

use std::collections::HashSet;

use tracing::info;

use crate::community::{detect_communities, CommunityAssignment, CommunityStrategy};
use crate::config::{
    AuthorNetworkConfig, BipartiteConfig, CooccurrenceConfig, LayoutConfig,
};
use crate::constants::GENERIC_HASHTAGS;
use crate::errors::Result;
use crate::extract::EntityExtractor;
use crate::layout::{compute_layout, GraphLayout, LayoutStrategy};
use crate::network::{
    build_author_hashtag_network, build_author_network, build_cooccurrence_network, SocialGraph,
};
use crate::post::Post;
use crate::stats::{compute_stats, NodeStats};

/// Strategy and parameter choices for one analysis pass
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub community_strategy: CommunityStrategy,
    pub layout_strategy: LayoutStrategy,
    pub layout: LayoutConfig,
}

/// Everything the analysis pass produces for one finalized graph
///
/// The method names record which algorithm actually ran (primary or
/// fallback) for traceability.
#[derive(Debug)]
pub struct AnalysisReport {
    pub communities: CommunityAssignment,
    pub layout: GraphLayout,
    pub stats: Vec<NodeStats>,
}

impl AnalysisReport {
    pub fn community_method(&self) -> &'static str {
        self.communities.method().as_str()
    }

    pub fn layout_method(&self) -> &'static str {
        self.layout.method().as_str()
    }
}

/// Run the full analysis pass over a finalized graph
///
/// Communities, layout, and statistics are independent read-only queries;
/// an empty graph produces empty outputs rather than an error.
pub fn analyze(graph: &SocialGraph, options: &AnalysisOptions) -> AnalysisReport {
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Analyzing network"
    );

    let communities = detect_communities(graph, options.community_strategy);
    let layout = compute_layout(graph, &options.layout, options.layout_strategy);
    let stats = compute_stats(graph, &communities);

    AnalysisReport {
        communities,
        layout,
        stats,
    }
}

fn generic_hashtag_set() -> HashSet<String> {
    GENERIC_HASHTAGS.iter().map(|s| s.to_string()).collect()
}

/// Hashtag co-occurrence network; `drop_generics` excludes the show's own
/// hashtags from the node set
pub fn hashtag_network(posts: &[Post], drop_generics: bool) -> Result<SocialGraph> {
    let excluded = if drop_generics {
        generic_hashtag_set()
    } else {
        HashSet::new()
    };
    let extractor = EntityExtractor::hashtags(excluded);
    build_cooccurrence_network(posts, &extractor, &CooccurrenceConfig::hashtags())
}

/// Word co-occurrence network over the tokenized text; `drop_generics`
/// excludes the corpus-wide generic terms
pub fn word_network(posts: &[Post], drop_generics: bool) -> Result<SocialGraph> {
    let excluded = if drop_generics {
        crate::constants::GENERIC_TERMS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        HashSet::new()
    };
    let extractor = EntityExtractor::words(excluded);
    build_cooccurrence_network(posts, &extractor, &CooccurrenceConfig::words())
}

/// Author similarity network (always strips generic hashtags before
/// computing similarity)
pub fn author_network(posts: &[Post]) -> Result<SocialGraph> {
    build_author_network(posts, &AuthorNetworkConfig::default())
}

/// Author-hashtag bipartite network
pub fn author_hashtag_network(posts: &[Post], drop_generics: bool) -> Result<SocialGraph> {
    let config = BipartiteConfig {
        generic_hashtags: if drop_generics {
            generic_hashtag_set()
        } else {
            HashSet::new()
        },
        ..BipartiteConfig::default()
    };
    build_author_hashtag_network(posts, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty_graph_degrades_gracefully() {
        let graph = SocialGraph::new();
        let report = analyze(&graph, &AnalysisOptions::default());
        assert!(report.communities.is_empty());
        assert!(report.layout.is_empty());
        assert!(report.stats.is_empty());
    }

    #[test]
    fn test_method_names_surfaced() {
        let graph = SocialGraph::new();
        let report = analyze(&graph, &AnalysisOptions::default());
        assert_eq!(report.community_method(), "louvain");
        assert_eq!(report.layout_method(), "forceatlas2");
    }
}
