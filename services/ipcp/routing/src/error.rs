//! Routing error types.

use ipcp_topology::TopologyError;
use thiserror::Error;

/// Errors raised while computing a forwarding table
#[derive(Error, Debug)]
pub enum RoutingError {
    /// The topology graph and the shortest-path engine lost sync. This is an
    /// unexpected-state condition; the pass is aborted and the previously
    /// published table stays in place.
    #[error("routing pass aborted: {0}")]
    Topology(#[from] TopologyError),
}
