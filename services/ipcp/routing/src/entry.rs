//! Forwarding table entries.

use serde::{Deserialize, Serialize};

/// One PDU forwarding entry: where traffic for a destination leaves the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForwardingEntry {
    /// Destination address
    pub destination: u64,
    /// Address of the resolved next hop
    pub next_hop: u64,
    /// Egress port id used to reach the next hop
    pub port_id: u32,
}

impl ForwardingEntry {
    /// Create a new forwarding entry
    pub fn new(destination: u64, next_hop: u64, port_id: u32) -> Self {
        Self {
            destination,
            next_hop,
            port_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = ForwardingEntry::new(3, 2, 10);
        assert_eq!(entry.destination, 3);
        assert_eq!(entry.next_hop, 2);
        assert_eq!(entry.port_id, 10);
    }
}
