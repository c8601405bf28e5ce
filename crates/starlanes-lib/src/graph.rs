//! Proximity graph construction over a star snapshot.
//!
//! Edges connect every pair of stars separated by at most the maximum edge
//! distance, weighted by the exact Euclidean distance. Nodes are stored as a
//! dense array with an id-to-index map and per-node adjacency lists of
//! (neighbour index, weight), so a built graph is read-only and freely
//! shareable across threads.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::spatial::SpatialIndex;
use crate::star::{Star, StarId};

/// Star count at which [`BuildStrategy::Auto`] switches from the naive
/// builder to the spatial index; below it the index overhead outweighs the
/// O(n²) scan it replaces.
pub const SPATIAL_STRATEGY_THRESHOLD: usize = 100;

/// Graph construction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// Resolve to `Naive` below [`SPATIAL_STRATEGY_THRESHOLD`] stars and to
    /// `Spatial` at or above it.
    #[default]
    Auto,
    /// All-pairs O(n²) scan; the reference implementation, and the faster
    /// choice for small inputs.
    Naive,
    /// KD-tree radius queries, O(n log n + E) overall.
    Spatial,
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            BuildStrategy::Auto => "auto",
            BuildStrategy::Naive => "naive",
            BuildStrategy::Spatial => "spatial",
        };
        f.write_str(value)
    }
}

/// Weighted edge to a neighbouring node, by node index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Edge {
    pub(crate) target: usize,
    pub(crate) distance: f64,
}

/// Undirected weighted proximity graph.
///
/// Built once from a star snapshot and a maximum edge distance; rebuild to
/// reflect a changed snapshot or threshold. Both build strategies produce
/// identical graphs, down to adjacency order.
#[derive(Debug, Clone)]
pub struct Graph {
    strategy: BuildStrategy,
    max_distance: f64,
    ids: Vec<StarId>,
    id_to_index: HashMap<StarId, usize>,
    adjacency: Vec<Vec<Edge>>,
    lex_rank: Vec<usize>,
    edge_count: usize,
}

impl Graph {
    /// Strategy that actually built this graph (never `Auto`).
    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    /// Maximum edge distance the graph was built with.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Number of nodes, including isolated ones.
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns true when the identifier names a node of this graph.
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Node identifiers in snapshot order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(StarId::as_str)
    }

    /// Return the neighbours of a node as (identifier, distance) pairs.
    pub fn neighbours(&self, id: &str) -> Result<Vec<(&str, f64)>> {
        let index = self.resolve(id)?;
        Ok(self.adjacency[index]
            .iter()
            .map(|edge| (self.ids[edge.target].as_str(), edge.distance))
            .collect())
    }

    /// Weight of the edge between two nodes, or `Ok(None)` when they are not
    /// adjacent.
    pub fn edge_distance(&self, a: &str, b: &str) -> Result<Option<f64>> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        Ok(self.edge_distance_by_index(a, b))
    }

    /// Breadth-first reachability between two nodes.
    pub fn is_reachable(&self, source: &str, destination: &str) -> Result<bool> {
        let start = self.resolve(source)?;
        let goal = self.resolve(destination)?;
        if start == goal {
            return Ok(true);
        }

        let mut visited = vec![false; self.ids.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for edge in &self.adjacency[current] {
                if visited[edge.target] {
                    continue;
                }
                if edge.target == goal {
                    return Ok(true);
                }
                visited[edge.target] = true;
                queue.push_back(edge.target);
            }
        }

        Ok(false)
    }

    pub(crate) fn resolve(&self, id: &str) -> Result<usize> {
        self.id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownStar { id: id.to_string() })
    }

    pub(crate) fn id_at(&self, index: usize) -> &StarId {
        &self.ids[index]
    }

    pub(crate) fn edges(&self, index: usize) -> &[Edge] {
        &self.adjacency[index]
    }

    pub(crate) fn lex_rank(&self, index: usize) -> usize {
        self.lex_rank[index]
    }

    pub(crate) fn edge_distance_by_index(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency[a]
            .iter()
            .find(|edge| edge.target == b)
            .map(|edge| edge.distance)
    }

    fn skeleton(stars: &[Star], max_distance: f64, strategy: BuildStrategy) -> Result<Self> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "maximum edge distance must be positive and finite, got {max_distance}"
            )));
        }

        let mut id_to_index = HashMap::with_capacity(stars.len());
        for (index, star) in stars.iter().enumerate() {
            if id_to_index.insert(star.id.clone(), index).is_some() {
                return Err(Error::DuplicateStarId {
                    id: star.id.clone(),
                });
            }
        }

        let ids: Vec<StarId> = stars.iter().map(|star| star.id.clone()).collect();
        let lex_rank = lexicographic_ranks(&ids);

        Ok(Self {
            strategy,
            max_distance,
            adjacency: vec![Vec::new(); ids.len()],
            ids,
            id_to_index,
            lex_rank,
            edge_count: 0,
        })
    }

    fn push_edge(&mut self, a: usize, b: usize, distance: f64) {
        self.adjacency[a].push(Edge {
            target: b,
            distance,
        });
        self.adjacency[b].push(Edge {
            target: a,
            distance,
        });
        self.edge_count += 1;
    }

    fn finish(&mut self) {
        // Fix adjacency order so both strategies emit identical graphs and
        // pathfinding relaxation order is deterministic.
        for edges in &mut self.adjacency {
            edges.sort_unstable_by_key(|edge| edge.target);
        }

        info!(
            strategy = %self.strategy,
            node_count = self.ids.len(),
            edge_count = self.edge_count,
            "built proximity graph"
        );
    }
}

/// Build a proximity graph with the given strategy.
pub fn build_proximity_graph(
    stars: &[Star],
    max_distance: f64,
    strategy: BuildStrategy,
) -> Result<Graph> {
    match strategy {
        BuildStrategy::Auto => {
            let resolved = if stars.len() < SPATIAL_STRATEGY_THRESHOLD {
                BuildStrategy::Naive
            } else {
                BuildStrategy::Spatial
            };
            debug!(star_count = stars.len(), strategy = %resolved, "resolved auto build strategy");
            build_proximity_graph(stars, max_distance, resolved)
        }
        BuildStrategy::Naive => build_naive_graph(stars, max_distance),
        BuildStrategy::Spatial => build_spatial_graph(stars, max_distance),
    }
}

/// Build a proximity graph by scanning all O(n²) star pairs.
///
/// Reference implementation used to cross-check the spatial builder, and the
/// lower-overhead path for small inputs.
pub fn build_naive_graph(stars: &[Star], max_distance: f64) -> Result<Graph> {
    let mut graph = Graph::skeleton(stars, max_distance, BuildStrategy::Naive)?;

    for i in 0..stars.len() {
        for j in (i + 1)..stars.len() {
            let distance = stars[i].position.distance_to(&stars[j].position);
            if distance <= max_distance {
                graph.push_edge(i, j, distance);
            }
        }
    }

    graph.finish();
    Ok(graph)
}

/// Build a proximity graph via KD-tree radius queries.
///
/// Each star issues one radius query at `max_distance`; every returned pair
/// is added once (undirected de-duplication by index order), so the total
/// cost is O(n log n + E) rather than O(n²).
pub fn build_spatial_graph(stars: &[Star], max_distance: f64) -> Result<Graph> {
    let mut graph = Graph::skeleton(stars, max_distance, BuildStrategy::Spatial)?;
    let index = SpatialIndex::build(stars)?;

    for (i, star) in stars.iter().enumerate() {
        let neighbours = index.within_radius(star.position, max_distance)?;
        for (neighbour, distance) in neighbours {
            let j = graph.id_to_index[neighbour.id.as_str()];
            // Skip the query star itself and pairs already seen from the
            // lower-indexed side.
            if j <= i {
                continue;
            }
            graph.push_edge(i, j, distance);
        }
    }

    graph.finish();
    Ok(graph)
}

fn lexicographic_ranks(ids: &[StarId]) -> Vec<usize> {
    let mut sorted: Vec<usize> = (0..ids.len()).collect();
    sorted.sort_unstable_by(|&a, &b| ids[a].cmp(&ids[b]));
    let mut ranks = vec![0; ids.len()];
    for (rank, &index) in sorted.iter().enumerate() {
        ranks[index] = rank;
    }
    ranks
}
