//! Tabular and DOT exports
//!
//! Node/edge tables follow the Gephi import conventions used downstream:
//! nodes as {Id, Label, Type, Frequency [, UniqueHashtags]}, edges as
//! {Source, Target, Weight [, Shared]}. Co-occurrence weights export as
//! integers; Jaccard weights as 6-decimal reals. The DOT export colors
//! nodes by community for a quick Graphviz rendering.

use std::path::Path;

use ordered_float::OrderedFloat;
use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use tracing::info;

use crate::community::CommunityAssignment;
use crate::config::ScaleRange;
use crate::errors::Result;
use crate::network::{EdgeWeight, SocialGraph};
use crate::stats::{min_max_scale, NodeStats};

/// Write the node table
///
/// The `UniqueHashtags` column appears when any node carries the attribute
/// (author similarity networks). Rows sort by frequency descending, then
/// unique hashtags descending, then label.
pub fn write_node_table(graph: &SocialGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;

    let with_unique = graph.nodes().any(|(_, a)| a.unique_hashtags.is_some());
    if with_unique {
        writer.write_record(["Id", "Label", "Type", "Frequency", "UniqueHashtags"])?;
    } else {
        writer.write_record(["Id", "Label", "Type", "Frequency"])?;
    }

    let mut nodes: Vec<_> = graph.nodes().map(|(_, attrs)| attrs).collect();
    nodes.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| b.unique_hashtags.cmp(&a.unique_hashtags))
            .then_with(|| a.label.cmp(&b.label))
    });

    for attrs in nodes {
        let frequency = attrs.frequency.to_string();
        let mut record = vec![
            attrs.label.as_str(),
            attrs.label.as_str(),
            attrs.kind.as_str(),
            frequency.as_str(),
        ];
        let unique;
        if with_unique {
            unique = attrs
                .unique_hashtags
                .map(|n| n.to_string())
                .unwrap_or_default();
            record.push(unique.as_str());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(nodes = graph.node_count(), path = %path.display(), "Wrote node table");
    Ok(())
}

/// Write the edge table
///
/// The `Shared` column appears when any edge carries a Jaccard weight.
/// Rows sort by weight descending (then shared count for Jaccard edges).
pub fn write_edge_table(graph: &SocialGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;

    let with_shared = graph
        .edges()
        .any(|(_, _, w)| matches!(w, EdgeWeight::Jaccard { .. }));
    if with_shared {
        writer.write_record(["Source", "Target", "Weight", "Shared"])?;
    } else {
        writer.write_record(["Source", "Target", "Weight"])?;
    }

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by(|a, b| {
        OrderedFloat(b.2.value())
            .cmp(&OrderedFloat(a.2.value()))
            .then_with(|| b.2.shared().cmp(&a.2.shared()))
            .then_with(|| (a.0.label.as_str(), a.1.label.as_str()).cmp(&(
                b.0.label.as_str(),
                b.1.label.as_str(),
            )))
    });

    for (source, target, weight) in edges {
        let formatted = match weight {
            EdgeWeight::Cooccurrence(count) => count.to_string(),
            EdgeWeight::Jaccard { similarity, .. } => format!("{similarity:.6}"),
        };
        let mut record = vec![
            source.label.as_str(),
            target.label.as_str(),
            formatted.as_str(),
        ];
        let shared;
        if with_shared {
            shared = weight
                .shared()
                .map(|n| n.to_string())
                .unwrap_or_default();
            record.push(shared.as_str());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(edges = graph.edge_count(), path = %path.display(), "Wrote edge table");
    Ok(())
}

/// Write the statistics table, preserving the row order produced by
/// [`crate::stats::compute_stats`]
pub fn write_stats_table(stats: &[NodeStats], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "node",
        "frequency",
        "degree",
        "weighted_degree",
        "betweenness",
        "modularity_class",
    ])?;
    for row in stats {
        writer.write_record([
            row.node.clone(),
            row.frequency.to_string(),
            row.degree.to_string(),
            format!("{}", row.weighted_degree),
            format!("{:.6}", row.betweenness),
            row.modularity_class.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(rows = stats.len(), path = %path.display(), "Wrote statistics table");
    Ok(())
}

/// Export graph as DOT for Graphviz, nodes filled by community color and
/// edge pen widths scaled from weight
pub fn to_dot(graph: &SocialGraph, communities: &CommunityAssignment) -> String {
    let inner = graph.graph();

    let weights: Vec<f64> = inner
        .edge_references()
        .map(|e| e.weight().value())
        .collect();
    let widths = min_max_scale(&weights, ScaleRange::edge_widths());

    let node_attr = |_g, (_, attrs): (_, &crate::network::NodeAttrs)| {
        let community = communities.get(&attrs.label).unwrap_or(0);
        let hue = (community * 60 % 360) as f64 / 360.0;
        format!(
            "label=\"{}\", style=filled, fillcolor=\"{:.3} 0.5 0.7\"",
            attrs.label, hue
        )
    };

    let edge_attr = |_g, edge: petgraph::graph::EdgeReference<'_, EdgeWeight>| {
        let width = widths.get(edge.id().index()).copied().unwrap_or(1.0);
        format!("penwidth=\"{width:.2}\"")
    };
    let dot = Dot::with_attr_getters(
        inner,
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &edge_attr,
        &node_attr,
    );
    format!("{dot:?}")
}
