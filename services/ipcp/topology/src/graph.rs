//! Directed topology graph built from flow-state advertisements.

use crate::advertisement::FlowStateAdvertisement;
use crate::error::TopologyError;
use std::collections::BTreeSet;
use tracing::debug;

/// One IPC process in a topology snapshot, identified by its address.
///
/// Equality, hashing and ordering are all by address value. Vertices are
/// created while building the graph and never mutated within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex {
    /// Network address of the node
    pub address: u64,
}

impl Vertex {
    /// Vertex for the given address
    pub fn new(address: u64) -> Self {
        Self { address }
    }
}

/// A directed link between two vertices.
///
/// An edge A -> B does not imply B -> A; the reverse direction exists only if
/// a corresponding advertisement states it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Origin vertex
    pub source: Vertex,
    /// Destination vertex
    pub destination: Vertex,
    /// Positive link weight
    pub weight: u32,
    /// Local port id the source uses to reach the destination
    pub port_id: u32,
}

/// Directed graph over one consistent snapshot of advertisements.
///
/// Endpoint vertices are created lazily on first reference. Duplicate
/// advertisements for the same ordered pair produce duplicate edges; when a
/// weight or port is resolved for a pair, the minimum-weight edge wins.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: BTreeSet<Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build the graph from an ordered collection of advertisements
    pub fn from_advertisements(advertisements: &[FlowStateAdvertisement]) -> Self {
        let mut graph = Graph::default();

        for adv in advertisements {
            let source = Vertex::new(adv.origin_address);
            let destination = Vertex::new(adv.neighbor_address);
            graph.vertices.insert(source);
            graph.vertices.insert(destination);
            graph.edges.push(Edge {
                source,
                destination,
                weight: adv.weight(),
                port_id: adv.port_id,
            });
        }

        debug!(
            "built topology graph: {} vertices, {} edges",
            graph.vertices.len(),
            graph.edges.len()
        );
        graph
    }

    /// Vertices in ascending address order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// All edges, in advertisement order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether the graph knows this vertex
    pub fn contains(&self, vertex: &Vertex) -> bool {
        self.vertices.contains(vertex)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct destinations of edges leaving `from`, in ascending address order
    pub fn neighbors(&self, from: Vertex) -> Vec<Vertex> {
        let set: BTreeSet<Vertex> = self
            .edges
            .iter()
            .filter(|edge| edge.source == from)
            .map(|edge| edge.destination)
            .collect();
        set.into_iter().collect()
    }

    /// Weight of the minimum-weight edge `from -> to`.
    ///
    /// An edge referenced here must exist in the edge set; a miss means the
    /// graph and the shortest-path engine lost sync and the pass is aborted.
    pub fn edge_weight(&self, from: Vertex, to: Vertex) -> Result<u32, TopologyError> {
        self.min_weight_edge(from, to)
            .map(|edge| edge.weight)
            .ok_or_else(|| TopologyError::GraphDesync {
                from: from.address,
                to: to.address,
            })
    }

    /// Port id recorded on the minimum-weight edge `from -> to`
    pub fn edge_port(&self, from: Vertex, to: Vertex) -> Result<u32, TopologyError> {
        self.min_weight_edge(from, to)
            .map(|edge| edge.port_id)
            .ok_or_else(|| TopologyError::GraphDesync {
                from: from.address,
                to: to.address,
            })
    }

    /// Among equal-weight duplicates the first advertisement wins
    fn min_weight_edge(&self, from: Vertex, to: Vertex) -> Option<&Edge> {
        self.edges
            .iter()
            .filter(|edge| edge.source == from && edge.destination == to)
            .min_by_key(|edge| edge.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_vertex_creation() {
        let advertisements = vec![
            FlowStateAdvertisement::new(1, 2, 10),
            FlowStateAdvertisement::new(2, 3, 20),
        ];

        let graph = Graph::from_advertisements(&advertisements);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains(&Vertex::new(3)));
        assert!(!graph.contains(&Vertex::new(4)));
    }

    #[test]
    fn test_edges_are_directional() {
        let advertisements = vec![FlowStateAdvertisement::new(1, 2, 10)];
        let graph = Graph::from_advertisements(&advertisements);

        assert_eq!(graph.neighbors(Vertex::new(1)), vec![Vertex::new(2)]);
        assert!(graph.neighbors(Vertex::new(2)).is_empty());
        assert!(graph.edge_weight(Vertex::new(2), Vertex::new(1)).is_err());
    }

    #[test]
    fn test_duplicate_advertisements_keep_duplicate_edges() {
        let advertisements = vec![
            FlowStateAdvertisement::with_metric(1, 2, 10, 5),
            FlowStateAdvertisement::with_metric(1, 2, 11, 2),
        ];

        let graph = Graph::from_advertisements(&advertisements);
        assert_eq!(graph.edge_count(), 2);

        // Minimum weight wins for both weight and port resolution
        assert_eq!(graph.edge_weight(Vertex::new(1), Vertex::new(2)).unwrap(), 2);
        assert_eq!(graph.edge_port(Vertex::new(1), Vertex::new(2)).unwrap(), 11);
    }

    #[test]
    fn test_missing_edge_is_desync() {
        let graph = Graph::from_advertisements(&[FlowStateAdvertisement::new(1, 2, 10)]);

        let err = graph
            .edge_weight(Vertex::new(1), Vertex::new(3))
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::GraphDesync { from: 1, to: 3 }
        ));
    }
}
