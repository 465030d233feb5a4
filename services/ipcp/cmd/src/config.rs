//! Configuration handling for the IPC process.
//!
//! Reads the YAML configuration file and applies environment variable
//! overrides, yielding one unified configuration value for the binary.

use anyhow::Result;
use ipcp_topology::FlowStateAdvertisement;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// IPC process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcpConfig {
    /// Address of this IPC process; the root of every routing computation
    pub local_address: u64,
    /// TCP listen address for inbound flows
    pub listen_addr: String,
    /// Maximum SDU size accepted on a flow, in bytes
    pub max_sdu_size: usize,
    /// Warm-up delay before the first read on a new flow, in milliseconds
    pub warmup_ms: u64,
    /// Static flow-state advertisements describing the topology snapshot
    pub flow_state: Vec<FlowStateAdvertisement>,
}

impl Default for IpcpConfig {
    fn default() -> Self {
        Self {
            local_address: 1,
            listen_addr: "127.0.0.1:4545".to_string(),
            max_sdu_size: 1500,
            warmup_ms: 1000,
            flow_state: Vec::new(),
        }
    }
}

impl IpcpConfig {
    /// Load configuration from file, then apply environment overrides
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            match serde_yaml::from_str::<IpcpConfig>(&content) {
                Ok(parsed) => {
                    config = parsed;
                    info!("loaded configuration from {:?}", config_path.as_ref());
                }
                Err(e) => {
                    warn!(
                        "failed to parse config file {:?} ({}), using defaults",
                        config_path.as_ref(),
                        e
                    );
                }
            }
        } else {
            warn!(
                "config file {:?} not found, using defaults",
                config_path.as_ref()
            );
        }

        config.apply_environment_overrides();

        info!(
            "final configuration: local_address={}, listen_addr={}, max_sdu_size={}, {} flow-state entries",
            config.local_address,
            config.listen_addr,
            config.max_sdu_size,
            config.flow_state.len()
        );
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        if let Ok(value) = std::env::var("IPCP_LOCAL_ADDRESS") {
            if let Ok(address) = value.parse::<u64>() {
                self.local_address = address;
                info!("local address overridden by environment: {}", address);
            }
        }

        if let Ok(value) = std::env::var("IPCP_LISTEN_ADDR") {
            info!("listen address overridden by environment: {}", value);
            self.listen_addr = value;
        }

        if let Ok(value) = std::env::var("IPCP_MAX_SDU_SIZE") {
            if let Ok(size) = value.parse::<usize>() {
                self.max_sdu_size = size;
                info!("max SDU size overridden by environment: {}", size);
            }
        }
    }
}
