//! Flow-state advertisements consumed by the topology graph.

use serde::{Deserialize, Serialize};

/// Edge weight used when an advertisement carries no metric (one per hop)
pub const DEFAULT_EDGE_WEIGHT: u32 = 1;

/// One observed adjacency between two IPC process addresses.
///
/// Advertisements are produced by the flow-state distribution layer, which is
/// also responsible for staleness filtering: only the currently-valid subset
/// reaches the graph. Fields are assumed well-formed by the time they get
/// here; no validation happens in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStateAdvertisement {
    /// Address of the node originating the advertisement
    pub origin_address: u64,
    /// Address of the observed neighbor
    pub neighbor_address: u64,
    /// Local port id the origin uses to reach the neighbor
    pub port_id: u32,
    /// Link metric; `None` means the policy default weight
    #[serde(default)]
    pub metric: Option<u32>,
    /// Sequence number assigned by the distribution layer
    #[serde(default)]
    pub sequence_number: u64,
}

impl FlowStateAdvertisement {
    /// Create an advertisement with the default metric
    pub fn new(origin_address: u64, neighbor_address: u64, port_id: u32) -> Self {
        Self {
            origin_address,
            neighbor_address,
            port_id,
            metric: None,
            sequence_number: 0,
        }
    }

    /// Create an advertisement carrying an explicit link metric
    pub fn with_metric(
        origin_address: u64,
        neighbor_address: u64,
        port_id: u32,
        metric: u32,
    ) -> Self {
        Self {
            origin_address,
            neighbor_address,
            port_id,
            metric: Some(metric),
            sequence_number: 0,
        }
    }

    /// Weight this advertisement contributes to the graph
    pub fn weight(&self) -> u32 {
        self.metric.unwrap_or(DEFAULT_EDGE_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weight() {
        let adv = FlowStateAdvertisement::new(1, 2, 10);
        assert_eq!(adv.weight(), DEFAULT_EDGE_WEIGHT);

        let adv = FlowStateAdvertisement::with_metric(1, 2, 10, 7);
        assert_eq!(adv.weight(), 7);
    }

    #[test]
    fn test_yaml_metric_defaults() {
        let yaml = r#"
origin_address: 1
neighbor_address: 2
port_id: 10
"#;
        let adv: FlowStateAdvertisement = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(adv.metric, None);
        assert_eq!(adv.sequence_number, 0);
        assert_eq!(adv.weight(), DEFAULT_EDGE_WEIGHT);
    }
}
