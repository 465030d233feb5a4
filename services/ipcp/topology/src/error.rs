//! Topology error types.

use thiserror::Error;

/// Errors raised while computing shortest paths over the topology graph
#[derive(Error, Debug)]
pub enum TopologyError {
    /// An edge referenced during relaxation is missing from the edge set.
    /// This means the graph was built inconsistently with the vertex set
    /// handed to the engine; the computation pass must be aborted rather
    /// than produce a partially-correct table.
    #[error("graph desync: no edge {from} -> {to}")]
    GraphDesync {
        /// Source address of the missing edge
        from: u64,
        /// Destination address of the missing edge
        to: u64,
    },
}
