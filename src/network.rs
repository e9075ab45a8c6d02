//! Graph model and threshold filtering
//!
//! The finalized graph is a simple weighted undirected graph over entity
//! labels, built bottom-up: nodes from frequency counts, then edges from
//! co-occurrence (or similarity) counts, both pruned by the configured
//! thresholds. After a builder returns, the graph is immutable; community
//! detection, layout, and statistics are read-only passes over it.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::info;

use crate::config::{AuthorNetworkConfig, BipartiteConfig, CooccurrenceConfig};
use crate::cooccur::CooccurrenceCounts;
use crate::errors::Result;
use crate::extract::{extract_hashtags, EntityExtractor, EntityKind};
use crate::post::Post;

/// Node payload: the entity plus its corpus frequency
#[derive(Debug, Clone)]
pub struct NodeAttrs {
    pub label: String,
    pub kind: EntityKind,

    /// Number of posts containing this entity (for authors: post count)
    pub frequency: u64,

    /// Distinct hashtag count, present on author-similarity nodes only
    pub unique_hashtags: Option<usize>,
}

/// Edge payload
///
/// Co-occurrence counts and Jaccard similarities share the `Weight` column
/// in the exports but are different quantities; the distinction is kept
/// explicit here instead of collapsing both into one number.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeWeight {
    /// Number of posts in which both endpoints appear
    Cooccurrence(u64),

    /// Jaccard similarity of two authors' hashtag sets, with the shared
    /// count retained for sort tie-breaking
    Jaccard { similarity: f64, shared: usize },
}

impl EdgeWeight {
    /// Numeric weight as consumed by the analysis algorithms
    pub fn value(&self) -> f64 {
        match self {
            Self::Cooccurrence(count) => *count as f64,
            Self::Jaccard { similarity, .. } => *similarity,
        }
    }

    /// Shared-hashtag count, present on Jaccard edges only
    pub fn shared(&self) -> Option<usize> {
        match self {
            Self::Cooccurrence(_) => None,
            Self::Jaccard { shared, .. } => Some(*shared),
        }
    }
}

/// Finalized weighted undirected graph plus a label -> index map
///
/// Invariants: every edge's endpoints are present in the node set, no
/// self-loops, one edge per unordered pair, weight >= 0.
#[derive(Debug, Default)]
pub struct SocialGraph {
    graph: UnGraph<NodeAttrs, EdgeWeight>,
    node_map: HashMap<String, NodeIndex>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn add_node(&mut self, attrs: NodeAttrs) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&attrs.label) {
            return idx;
        }
        let label = attrs.label.clone();
        let idx = self.graph.add_node(attrs);
        self.node_map.insert(label, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, u: &str, v: &str, weight: EdgeWeight) -> bool {
        if u == v {
            return false;
        }
        match (self.node_map.get(u), self.node_map.get(v)) {
            (Some(&a), Some(&b)) => {
                if self.graph.find_edge(a, b).is_some() {
                    return false;
                }
                self.graph.add_edge(a, b, weight);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.node_map.contains_key(label)
    }

    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    pub fn attrs(&self, idx: NodeIndex) -> &NodeAttrs {
        &self.graph[idx]
    }

    /// Node labels in insertion order
    pub fn labels(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].label.as_str())
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NodeAttrs)> {
        self.graph.node_indices().map(|idx| (idx, &self.graph[idx]))
    }

    /// Edges as (source attrs, target attrs, weight) triples
    pub fn edges(&self) -> impl Iterator<Item = (&NodeAttrs, &NodeAttrs, &EdgeWeight)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    pub fn edge_between(&self, u: &str, v: &str) -> Option<&EdgeWeight> {
        let a = self.node_index(u)?;
        let b = self.node_index(v)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge)
    }

    /// Unweighted degree
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    /// Sum of incident edge weights
    pub fn weighted_degree(&self, idx: NodeIndex) -> f64 {
        self.graph.edges(idx).map(|e| e.weight().value()).sum()
    }

    pub fn graph(&self) -> &UnGraph<NodeAttrs, EdgeWeight> {
        &self.graph
    }

    /// Index-based weighted adjacency for the analysis algorithms. Node
    /// indices are contiguous (nodes are never removed after finalization).
    pub(crate) fn adjacency_list(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.graph.node_count()];
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let w = edge.weight().value();
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable_by(|x, y| x.0.cmp(&y.0));
        }
        adjacency
    }
}

/// Jaccard similarity of two sets: |A ∩ B| / |A ∪ B|, 0 when both empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Build a hashtag or word co-occurrence network
///
/// Standard threshold policy: entities kept at `min_entity_freq`, optional
/// top-N node cap, edges kept between surviving entities at
/// `min_edge_weight`. Edge weight = number of shared posts.
pub fn build_cooccurrence_network(
    posts: &[Post],
    extractor: &EntityExtractor,
    config: &CooccurrenceConfig,
) -> Result<SocialGraph> {
    let mut per_post = Vec::with_capacity(posts.len());
    for post in posts {
        per_post.push(extractor.extract(post)?);
    }
    let counts = CooccurrenceCounts::aggregate(per_post);

    // Frequency filter, then the optional top-N cap with a deterministic
    // tie-break (frequency descending, label ascending)
    let mut surviving: Vec<(&String, u64)> = counts
        .frequencies()
        .iter()
        .filter(|(_, &freq)| freq >= config.min_entity_freq)
        .map(|(label, &freq)| (label, freq))
        .collect();
    surviving.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if let Some(cap) = config.max_nodes {
        surviving.truncate(cap);
    }

    let mut graph = SocialGraph::new();
    for (label, freq) in &surviving {
        graph.add_node(NodeAttrs {
            label: (*label).clone(),
            kind: extractor.kind(),
            frequency: *freq,
            unique_hashtags: None,
        });
    }

    let mut edges: Vec<(&(String, String), u64)> = counts
        .pair_weights()
        .iter()
        .filter(|(_, &weight)| weight >= config.min_edge_weight)
        .filter(|((u, v), _)| graph.contains(u) && graph.contains(v))
        .map(|(key, &weight)| (key, weight))
        .collect();
    edges.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for ((u, v), weight) in edges {
        graph.add_edge(u, v, EdgeWeight::Cooccurrence(weight));
    }

    info!(
        kind = extractor.kind().as_str(),
        posts = posts.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built co-occurrence network"
    );
    Ok(graph)
}

/// Build the author similarity network
///
/// An author qualifies as a node with at least `min_posts_per_author` posts
/// AND `min_unique_hashtags` distinct hashtags. Every qualifying pair gets
/// an edge iff they share `min_shared_hashtags` hashtags and the Jaccard
/// similarity of their hashtag sets reaches `min_jaccard`; the edge weight
/// is the Jaccard value.
pub fn build_author_network(posts: &[Post], config: &AuthorNetworkConfig) -> Result<SocialGraph> {
    let mut post_counts: HashMap<&str, u64> = HashMap::new();
    let mut hashtag_sets: HashMap<&str, HashSet<String>> = HashMap::new();

    for post in posts {
        *post_counts.entry(post.author_handle.as_str()).or_insert(0) += 1;
        let tags = hashtag_sets.entry(post.author_handle.as_str()).or_default();
        for tag in extract_hashtags(post.hashtag_source()) {
            if !config.generic_hashtags.contains(&tag) {
                tags.insert(tag);
            }
        }
    }

    let mut qualifying: Vec<&str> = post_counts
        .iter()
        .filter(|(author, &n)| {
            n >= config.min_posts_per_author
                && hashtag_sets
                    .get(*author)
                    .map(|s| s.len())
                    .unwrap_or(0)
                    >= config.min_unique_hashtags
        })
        .map(|(author, _)| *author)
        .collect();
    qualifying.sort_unstable();

    let mut graph = SocialGraph::new();
    for author in &qualifying {
        graph.add_node(NodeAttrs {
            label: (*author).to_string(),
            kind: EntityKind::Author,
            frequency: post_counts[author],
            unique_hashtags: Some(hashtag_sets[author].len()),
        });
    }

    for i in 0..qualifying.len() {
        for j in (i + 1)..qualifying.len() {
            let (a, b) = (qualifying[i], qualifying[j]);
            let shared = hashtag_sets[a].intersection(&hashtag_sets[b]).count();
            if shared < config.min_shared_hashtags {
                continue;
            }
            let similarity = jaccard(&hashtag_sets[a], &hashtag_sets[b]);
            if similarity < config.min_jaccard {
                continue;
            }
            graph.add_edge(a, b, EdgeWeight::Jaccard { similarity, shared });
        }
    }

    info!(
        posts = posts.len(),
        authors = graph.node_count(),
        edges = graph.edge_count(),
        "Built author similarity network"
    );
    Ok(graph)
}

/// Build the author-hashtag bipartite network
///
/// Nodes are the union of qualifying authors and frequency-filtered
/// hashtags; an (author, hashtag) edge carries the number of posts by that
/// author containing the hashtag, kept at `min_edge_weight`.
pub fn build_author_hashtag_network(
    posts: &[Post],
    config: &BipartiteConfig,
) -> Result<SocialGraph> {
    let mut post_counts: HashMap<&str, u64> = HashMap::new();
    for post in posts {
        *post_counts.entry(post.author_handle.as_str()).or_insert(0) += 1;
    }
    let valid_authors: HashSet<&str> = post_counts
        .iter()
        .filter(|(_, &n)| n >= config.min_posts_per_author)
        .map(|(author, _)| *author)
        .collect();

    // Per-post deduplicated hashtag sets, restricted to valid authors
    let mut tags_per_post: Vec<(&str, HashSet<String>)> = Vec::new();
    for post in posts {
        if !valid_authors.contains(post.author_handle.as_str()) {
            continue;
        }
        let tags: HashSet<String> = extract_hashtags(post.hashtag_source())
            .into_iter()
            .filter(|t| !config.generic_hashtags.contains(t))
            .collect();
        tags_per_post.push((post.author_handle.as_str(), tags));
    }

    let mut hashtag_freq: HashMap<&str, u64> = HashMap::new();
    for (_, tags) in &tags_per_post {
        for tag in tags {
            *hashtag_freq.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    let surviving_tags: HashMap<String, u64> = hashtag_freq
        .into_iter()
        .filter(|(_, freq)| *freq >= config.min_hashtag_freq)
        .map(|(tag, freq)| (tag.to_string(), freq))
        .collect();

    let mut edge_counts: HashMap<(String, String), u64> = HashMap::new();
    for (author, tags) in &tags_per_post {
        for tag in tags {
            if surviving_tags.contains_key(tag) {
                *edge_counts
                    .entry(((*author).to_string(), tag.clone()))
                    .or_insert(0) += 1;
            }
        }
    }

    let mut graph = SocialGraph::new();
    let mut authors: Vec<&str> = valid_authors.iter().copied().collect();
    authors.sort_unstable();
    for author in authors {
        graph.add_node(NodeAttrs {
            label: author.to_string(),
            kind: EntityKind::Author,
            frequency: post_counts[author],
            unique_hashtags: None,
        });
    }
    let mut tags: Vec<(&String, &u64)> = surviving_tags.iter().collect();
    tags.sort_unstable_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (tag, freq) in tags {
        graph.add_node(NodeAttrs {
            label: tag.clone(),
            kind: EntityKind::Hashtag,
            frequency: *freq,
            unique_hashtags: None,
        });
    }

    let mut edges: Vec<(&(String, String), u64)> = edge_counts
        .iter()
        .filter(|(_, &weight)| weight >= config.min_edge_weight)
        .map(|(key, &weight)| (key, weight))
        .collect();
    edges.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for ((author, tag), weight) in edges {
        graph.add_edge(author, tag, EdgeWeight::Cooccurrence(weight));
    }

    info!(
        posts = posts.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built author-hashtag bipartite network"
    );
    Ok(graph)
}
