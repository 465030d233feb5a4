//! Single-source shortest paths over the topology graph.
//!
//! Classic Dijkstra with settled/unsettled sets. All state is scoped to one
//! `execute` call and discarded afterwards; a new computation pass always
//! starts from a fresh value, so concurrent runs for different sources stay
//! independent.

use crate::error::TopologyError;
use crate::graph::{Graph, Vertex};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Shortest-path tree rooted at one source vertex.
///
/// Holds the distance and predecessor maps produced by one engine run.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: Vertex,
    distance: HashMap<Vertex, u32>,
    predecessor: HashMap<Vertex, Vertex>,
}

impl ShortestPaths {
    /// Compute shortest paths from `source` to every vertex reachable over
    /// the directed edges of `graph`.
    ///
    /// Distance ties in the minimum selection break toward the lowest
    /// address, so repeated runs over the same snapshot are reproducible.
    /// Fails with [`TopologyError::GraphDesync`] if an edge referenced during
    /// relaxation is missing from the edge set; no partial result is returned.
    pub fn execute(graph: &Graph, source: Vertex) -> Result<Self, TopologyError> {
        let mut settled: HashSet<Vertex> = HashSet::new();
        let mut unsettled: HashSet<Vertex> = HashSet::new();
        let mut distance: HashMap<Vertex, u32> = HashMap::new();
        let mut predecessor: HashMap<Vertex, Vertex> = HashMap::new();

        distance.insert(source, 0);
        unsettled.insert(source);

        while let Some(node) = minimum(&unsettled, &distance) {
            unsettled.remove(&node);
            settled.insert(node);

            let node_distance = distance.get(&node).copied().unwrap_or(u32::MAX);
            for neighbor in graph.neighbors(node) {
                if settled.contains(&neighbor) {
                    continue;
                }

                let weight = graph.edge_weight(node, neighbor)?;
                let candidate = node_distance.saturating_add(weight);
                let best = distance.get(&neighbor).copied().unwrap_or(u32::MAX);

                if candidate < best {
                    distance.insert(neighbor, candidate);
                    predecessor.insert(neighbor, node);
                    unsettled.insert(neighbor);
                }
            }
        }

        debug!(
            "shortest paths from {}: {} vertices reached",
            source.address,
            distance.len()
        );

        Ok(Self {
            source,
            distance,
            predecessor,
        })
    }

    /// Source vertex this tree is rooted at
    pub fn source(&self) -> Vertex {
        self.source
    }

    /// Ordered vertex sequence from the source to `target`, or `None` when
    /// no directed path reached `target`. The source's own path is itself.
    pub fn path_to(&self, target: Vertex) -> Option<Vec<Vertex>> {
        if !self.predecessor.contains_key(&target) {
            if target == self.source {
                return Some(vec![self.source]);
            }
            return None;
        }

        let mut path = vec![target];
        let mut step = target;
        while let Some(&prev) = self.predecessor.get(&step) {
            path.push(prev);
            step = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Total weight of the best path to `target`, `None` when unreachable
    pub fn distance_to(&self, target: Vertex) -> Option<u32> {
        self.distance.get(&target).copied()
    }

    /// First hop on the path from the source toward `target`.
    ///
    /// `None` for the source itself and for unreachable targets.
    pub fn next_hop_toward(&self, target: Vertex) -> Option<Vertex> {
        if target == self.source {
            return None;
        }

        let mut step = target;
        loop {
            let prev = *self.predecessor.get(&step)?;
            if prev == self.source {
                return Some(step);
            }
            step = prev;
        }
    }
}

/// Unsettled vertex with the minimum known distance; ties break toward the
/// lowest address.
fn minimum(unsettled: &HashSet<Vertex>, distance: &HashMap<Vertex, u32>) -> Option<Vertex> {
    unsettled
        .iter()
        .min_by_key(|vertex| {
            (
                distance.get(vertex).copied().unwrap_or(u32::MAX),
                vertex.address,
            )
        })
        .copied()
}
