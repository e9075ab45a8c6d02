//! Network Construction Tests
//!
//! End-to-end checks for the builders:
//! - Hashtag co-occurrence counting and thresholds
//! - Generic-term exclusion variants
//! - Word network node cap
//! - Author similarity (Jaccard) policy
//! - Author-hashtag bipartite policy

use std::collections::HashSet;

use coocnet::config::{AuthorNetworkConfig, BipartiteConfig, CooccurrenceConfig};
use coocnet::extract::{EntityExtractor, EntityKind};
use coocnet::network::{
    build_author_hashtag_network, build_author_network, build_cooccurrence_network, jaccard,
    EdgeWeight,
};
use coocnet::pipeline::{hashtag_network, word_network};
use coocnet::post::Post;

fn posts(rows: &[(&str, &str)]) -> Vec<Post> {
    rows.iter()
        .map(|(author, text)| Post::new(*author, *text))
        .collect()
}

/// Author posting each given text once
fn author_posts(author: &str, texts: &[&str]) -> Vec<Post> {
    texts.iter().map(|t| Post::new(author, *t)).collect()
}

#[test]
fn test_hashtag_cooccurrence_scenario() {
    // Three posts; with both thresholds at 1 every tag and every shared
    // post must survive
    let posts = posts(&[("a", "#x #y"), ("b", "#y #z"), ("a", "#x")]);
    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 1,
        max_nodes: None,
    };
    let extractor = EntityExtractor::hashtags(HashSet::new());
    let graph = build_cooccurrence_network(&posts, &extractor, &config).expect("build");

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.attrs(graph.node_index("#x").unwrap()).frequency, 2);
    assert_eq!(graph.attrs(graph.node_index("#y").unwrap()).frequency, 2);
    assert_eq!(graph.attrs(graph.node_index("#z").unwrap()).frequency, 1);

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(
        graph.edge_between("#x", "#y"),
        Some(&EdgeWeight::Cooccurrence(1))
    );
    assert_eq!(
        graph.edge_between("#y", "#z"),
        Some(&EdgeWeight::Cooccurrence(1))
    );
    assert!(graph.edge_between("#x", "#z").is_none());
}

#[test]
fn test_edge_weight_threshold_prunes_rare_pairs() {
    let posts = posts(&[
        ("a", "#x #y"),
        ("b", "#x #y"),
        ("c", "#x #z"),
        ("d", "#x"),
        ("e", "#y"),
        ("f", "#z"),
    ]);
    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 2,
        max_nodes: None,
    };
    let extractor = EntityExtractor::hashtags(HashSet::new());
    let graph = build_cooccurrence_network(&posts, &extractor, &config).expect("build");

    // (#x,#y) co-occurs twice and survives; (#x,#z) co-occurs once
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.edge_between("#x", "#y"),
        Some(&EdgeWeight::Cooccurrence(2))
    );
}

#[test]
fn test_repeated_mention_counts_once_per_post() {
    let posts = posts(&[("a", "#x #x #y")]);
    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 1,
        max_nodes: None,
    };
    let extractor = EntityExtractor::hashtags(HashSet::new());
    let graph = build_cooccurrence_network(&posts, &extractor, &config).expect("build");

    assert_eq!(graph.attrs(graph.node_index("#x").unwrap()).frequency, 1);
    assert_eq!(
        graph.edge_between("#x", "#y"),
        Some(&EdgeWeight::Cooccurrence(1))
    );
}

#[test]
fn test_generic_hashtags_excluded_variant() {
    let mut all = Vec::new();
    for _ in 0..3 {
        all.extend(posts(&[("a", "#bbb26 #teamana"), ("b", "#bbb26 #teambruno")]));
    }
    let with_generics = hashtag_network(&all, false).expect("build");
    let without_generics = hashtag_network(&all, true).expect("build");

    assert!(with_generics.contains("#bbb26"));
    assert!(!without_generics.contains("#bbb26"));
    assert!(without_generics.contains("#teamana"));
    // Without the hub tag the two team tags never co-occur
    assert_eq!(without_generics.edge_count(), 0);
}

#[test]
fn test_word_network_node_cap_is_deterministic() {
    let mut rows = Vec::new();
    for _ in 0..5 {
        rows.push(("a", "alpha beta gamma"));
        rows.push(("b", "alpha beta delta"));
    }
    let mut all = posts(&rows);
    for post in &mut all {
        post.text_clean = Some(post.text.clone());
    }

    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 1,
        max_nodes: Some(2),
    };
    let extractor = EntityExtractor::words(HashSet::new());
    let graph = build_cooccurrence_network(&all, &extractor, &config).expect("build");

    // alpha and beta appear in 10 posts each, gamma/delta in 5; the cap
    // keeps the top two by frequency
    assert_eq!(graph.node_count(), 2);
    assert!(graph.contains("alpha"));
    assert!(graph.contains("beta"));

    let again = build_cooccurrence_network(&all, &extractor, &config).expect("build");
    assert_eq!(again.labels(), graph.labels());
}

#[test]
fn test_word_network_uses_pretokenized_form() {
    let mut all = posts(&[("a", "raw text"), ("b", "raw text")]);
    for post in &mut all {
        post.tokens = Some(vec!["rivalidade".to_string(), "casa".to_string()]);
    }
    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 1,
        max_nodes: None,
    };
    let extractor = EntityExtractor::words(HashSet::new());
    let graph = build_cooccurrence_network(&all, &extractor, &config).expect("build");

    assert!(graph.contains("rivalidade"));
    assert!(!graph.contains("raw"));
    assert_eq!(
        graph.edge_between("casa", "rivalidade"),
        Some(&EdgeWeight::Cooccurrence(2))
    );
}

#[test]
fn test_word_network_without_clean_text_is_schema_error() {
    let all = posts(&[("a", "raw only")]);
    let err = word_network(&all, false).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_ERROR");
}

#[test]
fn test_author_similarity_scenario() {
    // Author A uses {#x,#y,#z}, author B uses {#y,#z,#w}; both have three
    // posts and enough distinct hashtags. Shared = 2, Jaccard = 2/4 = 0.5.
    let mut all = author_posts("autor_a", &["#x #y", "#z", "#x"]);
    all.extend(author_posts("autor_b", &["#y", "#z #w", "#w"]));

    let config = AuthorNetworkConfig {
        min_posts_per_author: 3,
        min_unique_hashtags: 2,
        min_shared_hashtags: 2,
        min_jaccard: 0.08,
        generic_hashtags: HashSet::new(),
    };
    let graph = build_author_network(&all, &config).expect("build");

    assert_eq!(graph.node_count(), 2);
    let a = graph.attrs(graph.node_index("autor_a").unwrap());
    assert_eq!(a.kind, EntityKind::Author);
    assert_eq!(a.frequency, 3);
    assert_eq!(a.unique_hashtags, Some(3));

    match graph.edge_between("autor_a", "autor_b") {
        Some(EdgeWeight::Jaccard { similarity, shared }) => {
            assert!((similarity - 0.5).abs() < 1e-9);
            assert_eq!(*shared, 2);
        }
        other => panic!("expected a Jaccard edge, got {other:?}"),
    }
}

#[test]
fn test_author_below_post_minimum_is_excluded() {
    let mut all = author_posts("prolific", &["#x #y", "#y", "#x"]);
    all.extend(author_posts("casual", &["#x #y"]));

    let graph = build_author_network(&all, &AuthorNetworkConfig::default()).expect("build");
    assert!(graph.contains("prolific"));
    assert!(!graph.contains("casual"));
}

#[test]
fn test_author_pair_below_jaccard_minimum_has_no_edge() {
    // Ten distinct tags each, two shared: Jaccard = 2/18 ≈ 0.11 passes at
    // 0.08 but fails a stricter threshold
    let tags_a = "#s1 #s2 #a1 #a2 #a3 #a4 #a5 #a6 #a7 #a8";
    let tags_b = "#s1 #s2 #b1 #b2 #b3 #b4 #b5 #b6 #b7 #b8";
    let mut all = author_posts("autor_a", &[tags_a, tags_a, tags_a]);
    all.extend(author_posts("autor_b", &[tags_b, tags_b, tags_b]));

    let strict = AuthorNetworkConfig {
        min_jaccard: 0.2,
        generic_hashtags: HashSet::new(),
        ..AuthorNetworkConfig::default()
    };
    let graph = build_author_network(&all, &strict).expect("build");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_jaccard_helper_matches_manual_value() {
    let a: HashSet<String> = ["#x", "#y", "#z"].iter().map(|s| s.to_string()).collect();
    let b: HashSet<String> = ["#y", "#z", "#w"].iter().map(|s| s.to_string()).collect();
    assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
}

#[test]
fn test_bipartite_network() {
    let mut all = author_posts("autor_a", &["#x #y", "#x", "#x #y"]);
    all.extend(author_posts("autor_b", &["#x", "#x", "#y"]));
    all.extend(author_posts("casual", &["#x"]));

    let config = BipartiteConfig {
        min_posts_per_author: 3,
        min_hashtag_freq: 1,
        min_edge_weight: 2,
        generic_hashtags: HashSet::new(),
    };
    let graph = build_author_hashtag_network(&all, &config).expect("build");

    // casual has a single post and is dropped along with their posts
    assert!(!graph.contains("casual"));
    assert!(graph.contains("autor_a"));
    assert!(graph.contains("#x"));

    // autor_a used #x in three posts, #y in two; autor_b used #x twice
    // and #y once (below the edge threshold)
    assert_eq!(
        graph.edge_between("autor_a", "#x"),
        Some(&EdgeWeight::Cooccurrence(3))
    );
    assert_eq!(
        graph.edge_between("autor_a", "#y"),
        Some(&EdgeWeight::Cooccurrence(2))
    );
    assert_eq!(
        graph.edge_between("autor_b", "#x"),
        Some(&EdgeWeight::Cooccurrence(2))
    );
    assert!(graph.edge_between("autor_b", "#y").is_none());

    // Author nodes carry post counts among surviving posts
    let a = graph.attrs(graph.node_index("autor_a").unwrap());
    assert_eq!(a.frequency, 3);
    let x = graph.attrs(graph.node_index("#x").unwrap());
    assert_eq!(x.kind, EntityKind::Hashtag);
    assert_eq!(x.frequency, 5);
}

#[test]
fn test_empty_corpus_yields_empty_graph() {
    let graph = hashtag_network(&[], false).expect("build");
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
