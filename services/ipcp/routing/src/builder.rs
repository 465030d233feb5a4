//! Forwarding table computation from flow-state advertisements.

use crate::entry::ForwardingEntry;
use crate::error::RoutingError;
use ipcp_topology::{FlowStateAdvertisement, Graph, ShortestPaths, Vertex};
use tracing::{debug, info};

/// Build the forwarding table for `local_address` from one consistent
/// snapshot of advertisements.
///
/// Builds the topology graph, runs the shortest-path engine rooted at the
/// local vertex and emits one entry per reachable destination other than the
/// local node itself. The next hop is the first hop on the shortest path and
/// the egress port is the one recorded on the edge toward that hop.
/// Unreachable destinations are skipped silently; the data plane treats the
/// missing entry as "no route". Entry order follows vertex iteration order
/// and is not part of the contract.
pub fn build_forwarding_table(
    advertisements: &[FlowStateAdvertisement],
    local_address: u64,
) -> Result<Vec<ForwardingEntry>, RoutingError> {
    let graph = Graph::from_advertisements(advertisements);
    let source = Vertex::new(local_address);
    let paths = ShortestPaths::execute(&graph, source)?;

    let mut entries = Vec::new();
    for vertex in graph.vertices() {
        if vertex.address == local_address {
            continue;
        }

        let next_hop = match paths.next_hop_toward(*vertex) {
            Some(hop) => hop,
            None => {
                debug!("no route to {}, omitting entry", vertex.address);
                continue;
            }
        };

        let port_id = graph.edge_port(source, next_hop)?;
        entries.push(ForwardingEntry::new(
            vertex.address,
            next_hop.address,
            port_id,
        ));
    }

    info!(
        "computed {} forwarding entries for address {}",
        entries.len(),
        local_address
    );
    Ok(entries)
}
