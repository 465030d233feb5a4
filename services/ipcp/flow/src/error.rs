//! Flow error types.

use thiserror::Error;

/// Errors surfaced by a flow's data-transfer operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// Peer closed the flow
    #[error("peer closed the flow")]
    PeerClosed,

    /// The flow was deallocated locally
    #[error("flow deallocated")]
    Deallocated,

    /// Transport failure underneath the flow
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}
