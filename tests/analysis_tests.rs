//! Analysis & Export Tests
//!
//! Full-pipeline checks over built networks:
//! - Community assignment totality and cluster separation
//! - Layout totality, finiteness, reproducibility
//! - Statistics ordering and betweenness behavior
//! - Tabular and DOT export round-trips
//! - Dataset loading into the pipeline

use std::collections::HashSet;
use std::io::Write;

use coocnet::community::{detect_communities, modularity, CommunityStrategy};
use coocnet::config::{CooccurrenceConfig, LayoutConfig};
use coocnet::export::{to_dot, write_edge_table, write_node_table, write_stats_table};
use coocnet::extract::EntityExtractor;
use coocnet::layout::LayoutStrategy;
use coocnet::network::{build_cooccurrence_network, SocialGraph};
use coocnet::pipeline::{analyze, AnalysisOptions};
use coocnet::post::{load_posts, Post};

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Two hashtag cliques joined by a single bridge post
fn clustered_posts() -> Vec<Post> {
    let mut rows = Vec::new();
    for _ in 0..4 {
        rows.push(Post::new("a", "#ana #paula #renault"));
        rows.push(Post::new("b", "#bruno #carlos #davi"));
    }
    rows.push(Post::new("c", "#renault #bruno"));
    rows
}

fn clustered_graph() -> SocialGraph {
    let config = CooccurrenceConfig {
        min_entity_freq: 1,
        min_edge_weight: 1,
        max_nodes: None,
    };
    let extractor = EntityExtractor::hashtags(HashSet::new());
    build_cooccurrence_network(&clustered_posts(), &extractor, &config).expect("build")
}

fn quick_options() -> AnalysisOptions {
    AnalysisOptions {
        layout: LayoutConfig {
            iterations: 100,
            spring_iterations: 30,
            ..LayoutConfig::default()
        },
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_full_analysis_pass() {
    init_logs();
    let graph = clustered_graph();
    let report = analyze(&graph, &quick_options());

    // Community mapping is total
    assert_eq!(report.communities.len(), graph.node_count());
    for label in graph.labels() {
        assert!(report.communities.get(label).is_some());
    }

    // Layout is total with finite coordinates
    assert_eq!(report.layout.len(), graph.node_count());
    for (_, (x, y)) in report.layout.iter() {
        assert!(x.is_finite() && y.is_finite());
    }

    // One stats row per node, sorted by weighted degree descending
    assert_eq!(report.stats.len(), graph.node_count());
    for pair in report.stats.windows(2) {
        assert!(pair[0].weighted_degree >= pair[1].weighted_degree);
    }

    assert_eq!(report.community_method(), "louvain");
    assert_eq!(report.layout_method(), "forceatlas2");
}

#[test]
fn test_communities_separate_the_two_cliques() {
    let graph = clustered_graph();
    let communities = detect_communities(&graph, CommunityStrategy::Auto);

    assert_eq!(communities.get("#ana"), communities.get("#paula"));
    assert_eq!(communities.get("#bruno"), communities.get("#davi"));
    assert_ne!(communities.get("#ana"), communities.get("#bruno"));
    assert!(modularity(&graph, &communities) > 0.2);
}

#[test]
fn test_fallback_strategies_also_cover_every_node() {
    let graph = clustered_graph();
    let communities = detect_communities(&graph, CommunityStrategy::GreedyMerge);
    assert_eq!(communities.len(), graph.node_count());
    assert_eq!(communities.method().as_str(), "greedy_modularity_fallback");
    assert_ne!(communities.get("#ana"), communities.get("#bruno"));
}

#[test]
fn test_spring_fallback_reproducible_in_pipeline() {
    let graph = clustered_graph();
    let mut options = quick_options();
    options.layout_strategy = LayoutStrategy::FruchtermanReingold;

    let first = analyze(&graph, &options);
    let second = analyze(&graph, &options);
    assert_eq!(first.layout_method(), "spring_layout_fallback");
    for (label, pos) in first.layout.iter() {
        assert_eq!(second.layout.get(label), Some(pos));
    }
}

#[test]
fn test_bridge_node_has_highest_betweenness() {
    let graph = clustered_graph();
    let report = analyze(&graph, &quick_options());

    // #renault and #bruno bridge the cliques; anything strictly inside a
    // clique routes no shortest paths between the clusters
    let betweenness = |node: &str| {
        report
            .stats
            .iter()
            .find(|s| s.node == node)
            .expect("stats row")
            .betweenness
    };
    assert!(betweenness("#renault") > betweenness("#ana"));
    assert!(betweenness("#bruno") > betweenness("#davi"));
}

#[test]
fn test_export_round_trip() {
    init_logs();
    let graph = clustered_graph();
    let report = analyze(&graph, &quick_options());

    let dir = tempfile::TempDir::new().expect("tempdir");
    let nodes_path = dir.path().join("out/nodes_hashtag.csv");
    let edges_path = dir.path().join("out/edges_hashtag.csv");
    let stats_path = dir.path().join("out/estatisticas_hashtag.csv");

    write_node_table(&graph, &nodes_path).expect("nodes");
    write_edge_table(&graph, &edges_path).expect("edges");
    write_stats_table(&report.stats, &stats_path).expect("stats");

    let mut nodes = csv::Reader::from_path(&nodes_path).expect("open nodes");
    assert_eq!(
        nodes.headers().expect("headers"),
        &csv::StringRecord::from(vec!["Id", "Label", "Type", "Frequency"])
    );
    assert_eq!(nodes.records().count(), graph.node_count());

    let mut edges = csv::Reader::from_path(&edges_path).expect("open edges");
    assert_eq!(edges.records().count(), graph.edge_count());

    let mut stats = csv::Reader::from_path(&stats_path).expect("open stats");
    let rows: Vec<csv::StringRecord> = stats.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), graph.node_count());
    // First column of the first row is the top node by weighted degree
    assert_eq!(&rows[0][0], report.stats[0].node.as_str());
}

#[test]
fn test_dot_export_is_parsable_text() {
    let graph = clustered_graph();
    let communities = detect_communities(&graph, CommunityStrategy::Auto);
    let dot = to_dot(&graph, &communities);

    assert!(dot.starts_with("graph {"));
    assert!(dot.contains("fillcolor"));
    assert!(dot.contains("#ana"));
}

#[test]
fn test_load_and_analyze_from_csv() {
    init_logs();
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("cleaned_posts.csv");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(file, "author_handle,text").expect("write");
    for _ in 0..3 {
        writeln!(file, "a,#ana #paula").expect("write");
        writeln!(file, "b,#ana #bruno").expect("write");
    }
    drop(file);

    let posts = load_posts(&path).expect("load");
    assert_eq!(posts.len(), 6);

    let graph = coocnet::pipeline::hashtag_network(&posts, false).expect("build");
    assert!(graph.contains("#ana"));
    let report = analyze(&graph, &quick_options());
    assert_eq!(report.stats.len(), graph.node_count());
    assert_eq!(report.stats[0].node, "#ana");
}

#[test]
fn test_empty_graph_pipeline_produces_empty_exports() {
    let graph = SocialGraph::new();
    let report = analyze(&graph, &quick_options());

    let dir = tempfile::TempDir::new().expect("tempdir");
    let nodes_path = dir.path().join("nodes.csv");
    write_node_table(&graph, &nodes_path).expect("nodes");
    write_stats_table(&report.stats, &dir.path().join("stats.csv")).expect("stats");

    let mut reader = csv::Reader::from_path(&nodes_path).expect("open");
    assert_eq!(reader.records().count(), 0);
}
