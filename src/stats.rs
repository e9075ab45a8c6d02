//! Per-node statistics over the finalized graph
//!
//! Degree, weighted degree, normalized weighted betweenness centrality, and
//! the community id, sorted the way the statistics table is published:
//! weighted degree, then degree, then frequency, all descending.
//!
//! Betweenness uses Brandes' accumulation over Dijkstra shortest paths with
//! edge weight as traversal cost. O(V*E*log V); fine at the target scale of
//! a few thousand nodes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::info;

use crate::community::CommunityAssignment;
use crate::config::ScaleRange;
use crate::network::SocialGraph;

const EPS: f64 = 1e-12;

/// One row of the statistics table
#[derive(Debug, Clone, Serialize)]
pub struct NodeStats {
    pub node: String,
    pub frequency: u64,
    pub degree: usize,
    pub weighted_degree: f64,
    pub betweenness: f64,
    pub modularity_class: usize,
}

/// Compute the statistics table for a finalized graph with its community
/// assignment attached. Empty graph produces an empty table.
pub fn compute_stats(graph: &SocialGraph, communities: &CommunityAssignment) -> Vec<NodeStats> {
    let adjacency = graph.adjacency_list();
    let betweenness = weighted_betweenness(&adjacency);

    let mut rows: Vec<NodeStats> = graph
        .nodes()
        .map(|(idx, attrs)| NodeStats {
            node: attrs.label.clone(),
            frequency: attrs.frequency,
            degree: graph.degree(idx),
            weighted_degree: graph.weighted_degree(idx),
            betweenness: betweenness[idx.index()],
            modularity_class: communities.get(&attrs.label).unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| {
        OrderedFloat(b.weighted_degree)
            .cmp(&OrderedFloat(a.weighted_degree))
            .then_with(|| b.degree.cmp(&a.degree))
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.node.cmp(&b.node))
    });

    info!(rows = rows.len(), "Computed node statistics");
    rows
}

/// Normalized weighted betweenness centrality, one value per node index
///
/// Brandes (2001) accumulation over Dijkstra trees; each undirected pair is
/// counted once and scores are scaled by (n-1)(n-2)/2. Nodes with no paths
/// through them (isolated nodes included) score 0.
fn weighted_betweenness(adjacency: &[Vec<(usize, f64)>]) -> Vec<f64> {
    let n = adjacency.len();
    let mut centrality = vec![0.0; n];
    if n < 3 {
        return centrality;
    }

    for source in 0..n {
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![f64::INFINITY; n];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut settled: Vec<usize> = Vec::new();
        let mut visited = vec![false; n];

        sigma[source] = 1.0;
        dist[source] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(0.0f64), source)));

        while let Some(Reverse((OrderedFloat(d), v))) = heap.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            settled.push(v);

            for &(w, cost) in &adjacency[v] {
                let next = d + cost;
                if next < dist[w] - EPS {
                    dist[w] = next;
                    sigma[w] = sigma[v];
                    preds[w].clear();
                    preds[w].push(v);
                    heap.push(Reverse((OrderedFloat(next), w)));
                } else if (next - dist[w]).abs() <= EPS {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = settled.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    // Each pair was counted from both endpoints; normalize to [0, 1]
    let norm = (n - 1) as f64 * (n - 2) as f64;
    for score in &mut centrality {
        *score /= norm;
    }
    centrality
}

/// Min-max scale values into a visual range
///
/// Empty input comes back unchanged; an all-equal input maps every value to
/// the midpoint of the range; otherwise the minimum maps to `range.min` and
/// the maximum to `range.max`.
pub fn min_max_scale(values: &[f64], range: ScaleRange) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < EPS {
        return vec![range.midpoint(); values.len()];
    }
    values
        .iter()
        .map(|v| range.min + (range.max - range.min) * (v - lo) / (hi - lo))
        .collect()
}

/// Node sizes for rendering: weighted degree scaled into the range
pub fn node_sizes(stats: &[NodeStats], range: ScaleRange) -> Vec<f64> {
    let degrees: Vec<f64> = stats.iter().map(|s| s.weighted_degree).collect();
    min_max_scale(&degrees, range)
}
