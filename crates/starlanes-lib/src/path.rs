//! Shortest-path search over a proximity graph.
//!
//! Single-pair Dijkstra with deterministic tie-breaking, and Yen's algorithm
//! for the K shortest loopless routes. Both operate on node indices
//! internally and translate to star identifiers only at the boundary.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashSet};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::star::StarId;

/// A route through the graph: visited star identifiers in travel order plus
/// the summed edge weight in light-years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub steps: Vec<StarId>,
    pub total_distance: f64,
}

impl Path {
    /// Number of jumps, one less than the number of visited stars.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Find the least-weight route between two stars.
///
/// Returns `Ok(None)` when the destination is unreachable, and
/// [`Error::UnknownStar`] when either identifier is not in the graph. When
/// `source == destination` the trivial single-star path of weight zero is
/// returned without running the search. Among equal-weight routes the result
/// is deterministic: the frontier prefers the lexicographically smaller star
/// identifier.
pub fn shortest_path(graph: &Graph, source: &str, destination: &str) -> Result<Option<Path>> {
    let source = graph.resolve(source)?;
    let destination = graph.resolve(destination)?;

    if source == destination {
        return Ok(Some(into_path(graph, &[source], 0.0)));
    }

    Ok(dijkstra(graph, source, destination, None)
        .map(|(nodes, total_distance)| into_path(graph, &nodes, total_distance)))
}

/// Find up to `k` distinct loopless routes between two stars, best first.
///
/// Implements Yen's algorithm: the shortest route seeds the result, then
/// each accepted route spawns spur candidates by banning, per spur node, the
/// outgoing edges of every accepted route sharing the same root prefix plus
/// the root nodes themselves, and re-running the search from the spur node.
/// Results are sorted by (total distance, star sequence). Fewer than `k`
/// routes means the graph admits no more; `k == 0` is an error.
pub fn k_shortest_paths(
    graph: &Graph,
    source: &str,
    destination: &str,
    k: usize,
) -> Result<Vec<Path>> {
    if k == 0 {
        return Err(Error::invalid_argument(
            "route count must be at least 1, got 0",
        ));
    }

    let source = graph.resolve(source)?;
    let destination = graph.resolve(destination)?;

    if source == destination {
        return Ok(vec![into_path(graph, &[source], 0.0)]);
    }

    let Some(first) = dijkstra(graph, source, destination, None) else {
        return Ok(Vec::new());
    };

    let mut accepted: Vec<(Vec<usize>, f64)> = vec![first];
    // Candidates persist across rounds; the key orders pops by weight first,
    // then by the lexicographic rank sequence of the visited stars.
    let mut candidates: BTreeSet<(FloatOrd, Vec<usize>, Vec<usize>)> = BTreeSet::new();

    'grow: while accepted.len() < k {
        let (previous, _) = accepted[accepted.len() - 1].clone();

        let mut root_distance = 0.0;
        for spur_position in 0..previous.len() - 1 {
            if spur_position > 0 {
                match graph
                    .edge_distance_by_index(previous[spur_position - 1], previous[spur_position])
                {
                    Some(weight) => root_distance += weight,
                    // Accepted routes only walk existing edges.
                    None => break,
                }
            }

            let spur_node = previous[spur_position];
            let root = &previous[..=spur_position];

            let mut mask = ExclusionMask::new(graph.node_count());
            for (nodes, _) in &accepted {
                if nodes.len() > spur_position + 1 && nodes[..=spur_position] == *root {
                    mask.exclude_edge(nodes[spur_position], nodes[spur_position + 1]);
                }
            }
            for &node in &root[..spur_position] {
                mask.exclude_node(node);
            }

            let Some((spur_nodes, spur_distance)) =
                dijkstra(graph, spur_node, destination, Some(&mask))
            else {
                continue;
            };

            let mut nodes = root[..spur_position].to_vec();
            nodes.extend(spur_nodes);
            let ranks = nodes.iter().map(|&node| graph.lex_rank(node)).collect();
            candidates.insert((FloatOrd(root_distance + spur_distance), ranks, nodes));
        }

        loop {
            let Some((FloatOrd(total_distance), _, nodes)) = candidates.pop_first() else {
                break 'grow;
            };
            // A route can be rediscovered from a later spur; keep only new ones.
            if accepted.iter().any(|(existing, _)| *existing == nodes) {
                continue;
            }
            accepted.push((nodes, total_distance));
            break;
        }
    }

    let mut paths: Vec<Path> = accepted
        .into_iter()
        .map(|(nodes, total_distance)| into_path(graph, &nodes, total_distance))
        .collect();
    paths.sort_by(|a, b| {
        a.total_distance
            .total_cmp(&b.total_distance)
            .then_with(|| a.steps.cmp(&b.steps))
    });

    Ok(paths)
}

fn into_path(graph: &Graph, nodes: &[usize], total_distance: f64) -> Path {
    Path {
        steps: nodes.iter().map(|&node| graph.id_at(node).clone()).collect(),
        total_distance,
    }
}

/// Dijkstra between node indices, honouring an optional exclusion mask.
///
/// Returns the visited indices and total weight, or `None` when the
/// destination cannot be reached. The mask must not exclude `source` or
/// `destination`. Equal-distance frontier entries pop in lexicographic
/// identifier order and a predecessor is only replaced on strict
/// improvement, so results do not depend on edge discovery order.
fn dijkstra(
    graph: &Graph,
    source: usize,
    destination: usize,
    mask: Option<&ExclusionMask>,
) -> Option<(Vec<usize>, f64)> {
    if source == destination {
        return Some((vec![source], 0.0));
    }

    let node_count = graph.node_count();
    let mut distance = vec![f64::INFINITY; node_count];
    let mut previous: Vec<Option<usize>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut queue = BinaryHeap::new();

    distance[source] = 0.0;
    queue.push(QueueEntry {
        cost: FloatOrd(0.0),
        rank: graph.lex_rank(source),
        node: source,
    });

    while let Some(entry) = queue.pop() {
        let node = entry.node;
        if settled[node] {
            // Stale entry superseded by a cheaper relaxation.
            continue;
        }
        settled[node] = true;

        if node == destination {
            return Some((reconstruct_path(&previous, destination), distance[node]));
        }

        for edge in graph.edges(node) {
            let next = edge.target;
            if settled[next] {
                continue;
            }
            if let Some(mask) = mask {
                if !mask.allows_node(next) || !mask.allows_edge(node, next) {
                    continue;
                }
            }

            let candidate = distance[node] + edge.distance;
            if candidate < distance[next] {
                distance[next] = candidate;
                previous[next] = Some(node);
                queue.push(QueueEntry {
                    cost: FloatOrd(candidate),
                    rank: graph.lex_rank(next),
                    node: next,
                });
            }
        }
    }

    None
}

fn reconstruct_path(previous: &[Option<usize>], destination: usize) -> Vec<usize> {
    let mut nodes = vec![destination];
    let mut current = destination;
    while let Some(parent) = previous[current] {
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    nodes
}

/// Nodes and edges hidden from one search without touching the graph.
#[derive(Debug, Clone)]
struct ExclusionMask {
    nodes: Vec<bool>,
    edges: HashSet<(usize, usize)>,
}

impl ExclusionMask {
    fn new(node_count: usize) -> Self {
        Self {
            nodes: vec![false; node_count],
            edges: HashSet::new(),
        }
    }

    fn exclude_node(&mut self, node: usize) {
        self.nodes[node] = true;
    }

    fn exclude_edge(&mut self, a: usize, b: usize) {
        self.edges.insert(undirected(a, b));
    }

    fn allows_node(&self, node: usize) -> bool {
        !self.nodes[node]
    }

    fn allows_edge(&self, a: usize, b: usize) -> bool {
        !self.edges.contains(&undirected(a, b))
    }
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Total order over edge weights so they can key heaps and ordered sets.
#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    cost: FloatOrd,
    rank: usize,
    node: usize,
}

impl Ord for QueueEntry {
    // Reverse ordering so BinaryHeap becomes a min-heap by cost, breaking
    // ties on the identifier rank of the node.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.rank.cmp(&self.rank))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
