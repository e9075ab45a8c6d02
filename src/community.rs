//! Community detection by modularity optimization
//!
//! Primary algorithm: weighted Louvain local search with graph coarsening.
//! Fallback: greedy community-merge modularity maximization. The strategy
//! is resolved once per invocation and the chosen method travels with the
//! result for diagnostics; choosing the fallback is never an error.
//!
//! Both algorithms are deterministic for a fixed node/edge insertion order:
//! nodes are visited in index order and ties break toward the smaller
//! community id. Isolated nodes end up in singleton communities. Community
//! ids are dense, assigned in first-seen node order; they are not stable
//! across runs of different inputs, but the mapping is always total.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::network::SocialGraph;

const MIN_GAIN: f64 = 1e-12;
const MAX_PASSES: usize = 100;

/// Which algorithm to run; `Auto` binds the primary once per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunityStrategy {
    #[default]
    Auto,
    Louvain,
    GreedyMerge,
}

/// Which algorithm actually produced the assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityMethod {
    Louvain,
    GreedyMerge,
}

impl CommunityMethod {
    /// Diagnostic name recorded in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Louvain => "louvain",
            Self::GreedyMerge => "greedy_modularity_fallback",
        }
    }
}

/// Total mapping from node label to community id
#[derive(Debug, Clone)]
pub struct CommunityAssignment {
    assignment: HashMap<String, usize>,
    method: CommunityMethod,
}

impl CommunityAssignment {
    pub fn method(&self) -> CommunityMethod {
        self.method
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.assignment.get(label).copied()
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Number of distinct communities
    pub fn community_count(&self) -> usize {
        let mut seen: Vec<usize> = self.assignment.values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.assignment.iter().map(|(label, &id)| (label.as_str(), id))
    }
}

/// Partition the graph's nodes into communities
pub fn detect_communities(
    graph: &SocialGraph,
    strategy: CommunityStrategy,
) -> CommunityAssignment {
    let method = match strategy {
        CommunityStrategy::Auto | CommunityStrategy::Louvain => CommunityMethod::Louvain,
        CommunityStrategy::GreedyMerge => CommunityMethod::GreedyMerge,
    };
    if strategy == CommunityStrategy::GreedyMerge {
        debug!("Community detection bound to the greedy-merge fallback");
    }

    let adjacency = graph.adjacency_list();
    let membership = match method {
        CommunityMethod::Louvain => louvain_partition(&adjacency),
        CommunityMethod::GreedyMerge => greedy_merge_partition(&adjacency),
    };

    let assignment: HashMap<String, usize> = graph
        .nodes()
        .map(|(idx, attrs)| (attrs.label.clone(), membership[idx.index()]))
        .collect();

    let result = CommunityAssignment { assignment, method };
    info!(
        method = method.as_str(),
        nodes = result.len(),
        communities = result.community_count(),
        "Detected communities"
    );
    result
}

/// Modularity Q of an assignment over the graph's weighted edges
///
/// Q = sum_c [ in_c / 2m - (tot_c / 2m)^2 ], where in_c counts internal
/// weight in both directions and tot_c sums member weighted degrees.
pub fn modularity(graph: &SocialGraph, assignment: &CommunityAssignment) -> f64 {
    let adjacency = graph.adjacency_list();
    let membership: Vec<usize> = graph
        .nodes()
        .map(|(_, attrs)| assignment.get(&attrs.label).unwrap_or(0))
        .collect();

    let m2: f64 = adjacency
        .iter()
        .map(|nb| nb.iter().map(|&(_, w)| w).sum::<f64>())
        .sum();
    if m2 <= 0.0 {
        return 0.0;
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut total: HashMap<usize, f64> = HashMap::new();
    for (i, neighbors) in adjacency.iter().enumerate() {
        let k_i: f64 = neighbors.iter().map(|&(_, w)| w).sum();
        *total.entry(membership[i]).or_insert(0.0) += k_i;
        for &(j, w) in neighbors {
            if membership[i] == membership[j] {
                *internal.entry(membership[i]).or_insert(0.0) += w;
            }
        }
    }

    let mut q = 0.0;
    for (community, &tot) in &total {
        let inner = internal.get(community).copied().unwrap_or(0.0);
        q += inner / m2 - (tot / m2).powi(2);
    }
    q
}

/// Weighted Louvain: local moves until no gain, then coarsen and repeat
fn louvain_partition(adjacency: &[Vec<(usize, f64)>]) -> Vec<usize> {
    let n = adjacency.len();
    if n == 0 {
        return Vec::new();
    }

    let mut node_to_comm: Vec<usize> = (0..n).collect();
    let mut level_adj: Vec<Vec<(usize, f64)>> = adjacency.to_vec();
    let mut self_loops: Vec<f64> = vec![0.0; n];

    loop {
        let (level_comm, moved) = local_move(&level_adj, &self_loops);
        if !moved {
            break;
        }
        let level_comm = renumber(&level_comm);
        for id in node_to_comm.iter_mut() {
            *id = level_comm[*id];
        }
        let (coarse_adj, coarse_loops) = coarsen(&level_adj, &self_loops, &level_comm);
        if coarse_adj.len() == level_adj.len() {
            break;
        }
        level_adj = coarse_adj;
        self_loops = coarse_loops;
    }

    renumber(&node_to_comm)
}

/// One Louvain level: move nodes between communities while modularity
/// improves. Returns the level's membership and whether anything moved.
fn local_move(adjacency: &[Vec<(usize, f64)>], self_loops: &[f64]) -> (Vec<usize>, bool) {
    let n = adjacency.len();
    let mut comm: Vec<usize> = (0..n).collect();

    // Weighted degree includes self-loop weight twice, per the modularity
    // null model
    let degree: Vec<f64> = (0..n)
        .map(|i| {
            adjacency[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self_loops[i]
        })
        .collect();
    let m2: f64 = degree.iter().sum();
    if m2 <= 0.0 {
        return (comm, false);
    }

    let mut sigma_tot: Vec<f64> = degree.clone();
    let mut any_moved = false;

    for _ in 0..MAX_PASSES {
        let mut moved_this_pass = false;

        for node in 0..n {
            if adjacency[node].is_empty() {
                continue;
            }
            let current = comm[node];

            // Weight from this node to each neighboring community
            let mut weight_to: HashMap<usize, f64> = HashMap::new();
            for &(neighbor, w) in &adjacency[node] {
                if neighbor != node {
                    *weight_to.entry(comm[neighbor]).or_insert(0.0) += w;
                }
            }

            sigma_tot[current] -= degree[node];

            let own_link = weight_to.get(&current).copied().unwrap_or(0.0);
            let mut best_comm = current;
            let mut best_gain = own_link - degree[node] * sigma_tot[current] / m2;

            let mut candidates: Vec<(&usize, &f64)> = weight_to.iter().collect();
            candidates.sort_unstable_by_key(|(id, _)| **id);
            for (&candidate, &link) in candidates {
                if candidate == current {
                    continue;
                }
                let gain = link - degree[node] * sigma_tot[candidate] / m2;
                if gain > best_gain + MIN_GAIN {
                    best_gain = gain;
                    best_comm = candidate;
                }
            }

            sigma_tot[best_comm] += degree[node];
            if best_comm != current {
                comm[node] = best_comm;
                moved_this_pass = true;
                any_moved = true;
            }
        }

        if !moved_this_pass {
            break;
        }
    }

    (comm, any_moved)
}

/// Collapse each community into a super-node, aggregating edge weights.
/// Internal weight becomes the super-node's self-loop.
fn coarsen(
    adjacency: &[Vec<(usize, f64)>],
    self_loops: &[f64],
    comm: &[usize],
) -> (Vec<Vec<(usize, f64)>>, Vec<f64>) {
    let n_comms = comm.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let mut loops = vec![0.0; n_comms];
    let mut between: HashMap<(usize, usize), f64> = HashMap::new();

    for (i, neighbors) in adjacency.iter().enumerate() {
        loops[comm[i]] += self_loops[i];
        for &(j, w) in neighbors {
            if comm[i] == comm[j] {
                // Each undirected edge appears once from each endpoint
                loops[comm[i]] += w / 2.0;
            } else if comm[i] < comm[j] {
                *between.entry((comm[i], comm[j])).or_insert(0.0) += w;
            }
        }
    }

    let mut coarse: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_comms];
    for ((a, b), w) in between {
        coarse[a].push((b, w));
        coarse[b].push((a, w));
    }
    for neighbors in &mut coarse {
        neighbors.sort_unstable_by(|x, y| x.0.cmp(&y.0));
    }
    (coarse, loops)
}

/// Greedy modularity maximization on a community-merge basis: repeatedly
/// merge the connected pair of communities with the best modularity gain
/// until no merge improves it.
fn greedy_merge_partition(adjacency: &[Vec<(usize, f64)>]) -> Vec<usize> {
    let n = adjacency.len();
    if n == 0 {
        return Vec::new();
    }

    let degree: Vec<f64> = adjacency
        .iter()
        .map(|nb| nb.iter().map(|&(_, w)| w).sum::<f64>())
        .collect();
    let m2: f64 = degree.iter().sum();
    if m2 <= 0.0 {
        return (0..n).collect();
    }

    let mut comm: Vec<usize> = (0..n).collect();
    let mut tot: Vec<f64> = degree.clone();
    // Undirected weight between community pairs, keyed (small, large)
    let mut between: HashMap<(usize, usize), f64> = HashMap::new();
    for (i, neighbors) in adjacency.iter().enumerate() {
        for &(j, w) in neighbors {
            if i < j {
                *between.entry((i, j)).or_insert(0.0) += w;
            }
        }
    }

    loop {
        let mut best: Option<((usize, usize), f64)> = None;
        let mut pairs: Vec<(&(usize, usize), &f64)> = between.iter().collect();
        pairs.sort_unstable_by_key(|(key, _)| **key);
        for (&(a, b), &w) in pairs {
            // dQ of merging a and b, dropping the constant 2/(2m) factor:
            // w_ab / m2 - 2 * tot_a * tot_b / m2^2, scaled by m2
            let gain = w - 2.0 * tot[a] * tot[b] / m2;
            if gain > MIN_GAIN && best.map(|(_, g)| gain > g + MIN_GAIN).unwrap_or(true) {
                best = Some(((a, b), gain));
            }
        }

        let Some(((a, b), _)) = best else {
            break;
        };

        // Merge b into a
        for id in comm.iter_mut() {
            if *id == b {
                *id = a;
            }
        }
        tot[a] += tot[b];
        tot[b] = 0.0;

        let mut merged: HashMap<(usize, usize), f64> = HashMap::new();
        for ((x, y), w) in between.drain() {
            let x = if x == b { a } else { x };
            let y = if y == b { a } else { y };
            if x == y {
                continue;
            }
            let key = if x < y { (x, y) } else { (y, x) };
            *merged.entry(key).or_insert(0.0) += w;
        }
        between = merged;
    }

    renumber(&comm)
}

/// Dense community ids in first-seen order
fn renumber(comm: &[usize]) -> Vec<usize> {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut next = 0;
    comm.iter()
        .map(|&id| {
            *remap.entry(id).or_insert_with(|| {
                let dense = next;
                next += 1;
                dense
            })
        })
        .collect()
}
