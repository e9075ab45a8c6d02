//! 2D layout for graph rendering
//!
//! Primary: a ForceAtlas2-style force-directed scheme. Edge weight acts as
//! attraction strength, node repulsion uses a Barnes-Hut quadtree
//! approximation, and the simulation runs a fixed number of iterations
//! regardless of convergence. Fallback: a Fruchterman-Reingold spring
//! layout seeded from a fixed seed so output is reproducible.
//!
//! The strategy is resolved once per invocation; the chosen method travels
//! with the result for diagnostics. Every emitted coordinate is finite.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::network::SocialGraph;

const EPS: f64 = 1e-9;
const MAX_QUADTREE_DEPTH: usize = 32;

/// Which layout to run; `Auto` binds the primary once per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    #[default]
    Auto,
    ForceAtlas2,
    FruchtermanReingold,
}

/// Which layout actually produced the coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMethod {
    ForceAtlas2,
    FruchtermanReingold,
}

impl LayoutMethod {
    /// Diagnostic name recorded in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForceAtlas2 => "forceatlas2",
            Self::FruchtermanReingold => "spring_layout_fallback",
        }
    }
}

/// Total mapping from node label to a finite 2D coordinate
#[derive(Debug, Clone)]
pub struct GraphLayout {
    positions: HashMap<String, (f64, f64)>,
    method: LayoutMethod,
}

impl GraphLayout {
    pub fn method(&self) -> LayoutMethod {
        self.method
    }

    pub fn get(&self, label: &str) -> Option<(f64, f64)> {
        self.positions.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, (f64, f64))> {
        self.positions.iter().map(|(label, &pos)| (label.as_str(), pos))
    }
}

/// Compute node positions for the finalized graph
pub fn compute_layout(
    graph: &SocialGraph,
    config: &LayoutConfig,
    strategy: LayoutStrategy,
) -> GraphLayout {
    let method = match strategy {
        LayoutStrategy::Auto | LayoutStrategy::ForceAtlas2 => LayoutMethod::ForceAtlas2,
        LayoutStrategy::FruchtermanReingold => LayoutMethod::FruchtermanReingold,
    };
    if strategy == LayoutStrategy::FruchtermanReingold {
        debug!(seed = config.seed, "Layout bound to the spring fallback");
    }

    let adjacency = graph.adjacency_list();
    let positions = match method {
        LayoutMethod::ForceAtlas2 => force_atlas2(&adjacency, config),
        LayoutMethod::FruchtermanReingold => fruchterman_reingold(&adjacency, config),
    };

    let positions: HashMap<String, (f64, f64)> = graph
        .nodes()
        .map(|(idx, attrs)| (attrs.label.clone(), positions[idx.index()]))
        .collect();

    info!(
        method = method.as_str(),
        nodes = positions.len(),
        "Computed layout"
    );
    GraphLayout { positions, method }
}

/// Deterministic initial placement on a circle. Distinct starting positions
/// keep the first repulsion pass well-defined without a RNG.
fn circle_positions(n: usize) -> Vec<(f64, f64)> {
    let radius = 10.0 * (n.max(1) as f64).sqrt();
    (0..n)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n.max(1) as f64;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// ForceAtlas2-style layout: linear attraction along edges scaled by
/// weight^influence, degree-scaled repulsion approximated with Barnes-Hut,
/// gravity toward the origin, and the adaptive global speed heuristic.
fn force_atlas2(adjacency: &[Vec<(usize, f64)>], config: &LayoutConfig) -> Vec<(f64, f64)> {
    let n = adjacency.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    let mut positions = circle_positions(n);
    let masses: Vec<f64> = adjacency.iter().map(|nb| nb.len() as f64 + 1.0).collect();
    let mut prev_forces = vec![(0.0f64, 0.0f64); n];
    let mut speed = 1.0f64;

    for _ in 0..config.iterations {
        let mut forces = vec![(0.0f64, 0.0f64); n];

        // Repulsion via quadtree
        let tree = QuadTree::build(&positions, &masses);
        for i in 0..n {
            let (fx, fy) = tree.repulsion(
                positions[i],
                masses[i],
                config.scaling_ratio,
                config.barnes_hut_theta,
            );
            forces[i].0 += fx;
            forces[i].1 += fy;
        }

        // Attraction along edges (each edge appears once per direction in
        // the adjacency, which applies the pull at both endpoints)
        for (i, neighbors) in adjacency.iter().enumerate() {
            for &(j, w) in neighbors {
                let dx = positions[j].0 - positions[i].0;
                let dy = positions[j].1 - positions[i].1;
                let pull = w.powf(config.edge_weight_influence);
                forces[i].0 += dx * pull;
                forces[i].1 += dy * pull;
            }
        }

        // Gravity
        for i in 0..n {
            let (x, y) = positions[i];
            let dist = (x * x + y * y).sqrt().max(EPS);
            let g = config.gravity * masses[i];
            forces[i].0 -= g * x / dist;
            forces[i].1 -= g * y / dist;
        }

        // Adaptive global speed: fast when nodes travel steadily, slow
        // when they oscillate
        let mut swinging = 0.0;
        let mut traction = 0.0;
        for i in 0..n {
            let dx = forces[i].0 - prev_forces[i].0;
            let dy = forces[i].1 - prev_forces[i].1;
            swinging += masses[i] * (dx * dx + dy * dy).sqrt();
            let sx = forces[i].0 + prev_forces[i].0;
            let sy = forces[i].1 + prev_forces[i].1;
            traction += masses[i] * (sx * sx + sy * sy).sqrt() / 2.0;
        }
        if swinging > EPS {
            // Bounded adjustment toward the target keeps the simulation
            // from oscillating when the force field flips sign
            let target = traction / swinging;
            speed = target.clamp(speed / 2.0, speed * 1.5);
        }
        speed = speed.clamp(0.001, 10.0);

        for i in 0..n {
            let (fx, fy) = forces[i];
            let norm = (fx * fx + fy * fy).sqrt();
            if norm < EPS {
                continue;
            }
            let dx = forces[i].0 - prev_forces[i].0;
            let dy = forces[i].1 - prev_forces[i].1;
            let local_swing = (dx * dx + dy * dy).sqrt();
            let factor = (0.1 * speed / (1.0 + speed * local_swing.sqrt())).min(10.0 / norm);
            positions[i].0 += fx * factor;
            positions[i].1 += fy * factor;
        }
        prev_forces = forces;
    }

    positions
}

/// Fruchterman-Reingold spring layout with seeded random initialization
fn fruchterman_reingold(adjacency: &[Vec<(usize, f64)>], config: &LayoutConfig) -> Vec<(f64, f64)> {
    let n = adjacency.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let k = config.spring_optimal_distance;
    let iterations = config.spring_iterations.max(1);
    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![(0.0f64, 0.0f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(EPS);
                let repulse = k * k / dist;
                disp[i].0 += dx / dist * repulse;
                disp[i].1 += dy / dist * repulse;
                disp[j].0 -= dx / dist * repulse;
                disp[j].1 -= dy / dist * repulse;
            }
        }

        for (i, neighbors) in adjacency.iter().enumerate() {
            for &(j, w) in neighbors {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(EPS);
                let attract = w * dist * dist / k;
                disp[i].0 -= dx / dist * attract;
                disp[i].1 -= dy / dist * attract;
            }
        }

        for i in 0..n {
            let (dx, dy) = disp[i];
            let norm = (dx * dx + dy * dy).sqrt().max(EPS);
            let limited = norm.min(temperature);
            positions[i].0 += dx / norm * limited;
            positions[i].1 += dy / norm * limited;
        }
        temperature -= cooling;
    }

    positions
}

/// Barnes-Hut quadtree over node positions
///
/// Arena-allocated; each cell stores aggregate mass and center of mass.
/// Cells far enough away (size / distance < theta) act on a node as a
/// single body.
struct QuadTree {
    cells: Vec<Cell>,
}

struct Cell {
    cx: f64,
    cy: f64,
    half: f64,
    mass: f64,
    com_x: f64,
    com_y: f64,
    body: Option<(f64, f64, f64)>,
    children: Option<[usize; 4]>,
}

impl QuadTree {
    fn build(positions: &[(f64, f64)], masses: &[f64]) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let half = ((max_x - min_x).max(max_y - min_y) / 2.0).max(EPS);
        let root = Cell::empty((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, half);

        let mut tree = Self { cells: vec![root] };
        for (i, &(x, y)) in positions.iter().enumerate() {
            tree.insert(0, x, y, masses[i], 0);
        }
        tree
    }

    fn insert(&mut self, cell: usize, x: f64, y: f64, mass: f64, depth: usize) {
        self.cells[cell].mass += mass;
        self.cells[cell].com_x += x * mass;
        self.cells[cell].com_y += y * mass;

        // Coincident bodies past the depth limit stay aggregated in the cell
        if depth >= MAX_QUADTREE_DEPTH {
            return;
        }

        if self.cells[cell].children.is_none() {
            match self.cells[cell].body.take() {
                None => {
                    self.cells[cell].body = Some((x, y, mass));
                    return;
                }
                Some((bx, by, bmass)) => {
                    self.subdivide(cell);
                    let child = self.child_for(cell, bx, by);
                    self.insert(child, bx, by, bmass, depth + 1);
                }
            }
        }
        let child = self.child_for(cell, x, y);
        self.insert(child, x, y, mass, depth + 1);
    }

    fn subdivide(&mut self, cell: usize) {
        let (cx, cy, half) = {
            let c = &self.cells[cell];
            (c.cx, c.cy, c.half / 2.0)
        };
        let mut ids = [0usize; 4];
        for (slot, (sx, sy)) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .iter()
            .enumerate()
        {
            ids[slot] = self.cells.len();
            self.cells
                .push(Cell::empty(cx + sx * half, cy + sy * half, half));
        }
        self.cells[cell].children = Some(ids);
    }

    fn child_for(&self, cell: usize, x: f64, y: f64) -> usize {
        let c = &self.cells[cell];
        let east = x >= c.cx;
        let north = y >= c.cy;
        let slot = match (east, north) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        };
        c.children.expect("subdivided cell")[slot]
    }

    /// Total repulsion force on a body at `pos` with mass `mass`
    fn repulsion(&self, pos: (f64, f64), mass: f64, scaling: f64, theta: f64) -> (f64, f64) {
        self.repulsion_from(0, pos, mass, scaling, theta)
    }

    fn repulsion_from(
        &self,
        cell: usize,
        pos: (f64, f64),
        mass: f64,
        scaling: f64,
        theta: f64,
    ) -> (f64, f64) {
        let c = &self.cells[cell];
        if c.mass <= 0.0 {
            return (0.0, 0.0);
        }

        let com_x = c.com_x / c.mass;
        let com_y = c.com_y / c.mass;
        let dx = pos.0 - com_x;
        let dy = pos.1 - com_y;
        let dist = (dx * dx + dy * dy).sqrt();

        let is_leaf = c.children.is_none();
        let opens = dist > EPS && (c.half * 2.0) / dist < theta;

        if is_leaf || opens {
            if dist < EPS {
                // The cell is the queried body itself or a coincident one;
                // no usable direction. A far-approximated cell can never
                // contain the query point, so self-interaction only lands
                // here.
                return (0.0, 0.0);
            }
            let f = scaling * mass * c.mass / dist;
            return (f * dx / dist, f * dy / dist);
        }

        let mut fx = 0.0;
        let mut fy = 0.0;
        if let Some(children) = c.children {
            for child in children {
                let (cfx, cfy) = self.repulsion_from(child, pos, mass, scaling, theta);
                fx += cfx;
                fy += cfy;
            }
        }
        (fx, fy)
    }
}

impl Cell {
    fn empty(cx: f64, cy: f64, half: f64) -> Self {
        Self {
            cx,
            cy,
            half,
            mass: 0.0,
            com_x: 0.0,
            com_y: 0.0,
            body: None,
            children: None,
        }
    }
}
