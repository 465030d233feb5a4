//! Recursive IPC process node binary.
//!
//! Computes the PDU forwarding table from the configured flow-state snapshot
//! and drains inbound data flows, one reader task per flow, counting the
//! SDUs it delivers.

use anyhow::{Context, Result};
use clap::Parser;
use ipcp_flow::{FlowReader, FlowReaderConfig, FlowReaderHandle, SduCounter, TcpFlow};
use ipcp_routing::{build_forwarding_table, ForwardingTable};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::IpcpConfig;
use logging::IpcpLogFormatter;

/// Recursive IPC process: link-state routing and per-flow data drain
#[derive(Parser, Debug)]
#[command(name = "ripc-ipcp", version, about = "Recursive IPC process node")]
struct Args {
    /// Configuration file path
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the local IPC process address
    #[arg(long)]
    local_address: Option<u64>,

    /// Override the flow listen address, e.g. 0.0.0.0:4545
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = IpcpConfig::load_from_file(&args.config)?;
    if let Some(address) = args.local_address {
        config.local_address = address;
    }
    if let Some(listen) = args.listen {
        config.listen_addr = listen.to_string();
    }

    info!("starting IPC process at address {}", config.local_address);

    // Control plane: one computation pass over the configured snapshot,
    // published wholesale to the data plane.
    let entries = build_forwarding_table(&config.flow_state, config.local_address)
        .context("forwarding table computation failed")?;
    let table = Arc::new(ForwardingTable::new(config.local_address));
    table.replace(entries).await;
    for entry in table.snapshot().await.values() {
        info!(
            "route: destination {} via {} on port {}",
            entry.destination, entry.next_hop, entry.port_id
        );
    }

    // Data plane: accept flows and drain each one on its own reader task.
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("accepting flows on {}", config.listen_addr);

    let counter = Arc::new(SduCounter::new());
    let reader_config = FlowReaderConfig {
        warmup: Duration::from_millis(config.warmup_ms),
        max_sdu_size: config.max_sdu_size,
    };
    let mut readers: Vec<FlowReaderHandle> = Vec::new();
    let mut next_port_id: u32 = 1;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let port_id = next_port_id;
                        next_port_id += 1;
                        info!("flow {} allocated from {}", port_id, peer);

                        let flow = TcpFlow::new(stream, port_id);
                        let reader = FlowReader::new(
                            Box::new(flow),
                            counter.clone(),
                            reader_config.clone(),
                        );
                        readers.push(reader.start());
                    }
                    Err(e) => {
                        warn!("accept failed: {}", e);
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    // Cooperative stop; readers blocked in a read terminate with the
    // process, since nothing closes their flows for them here.
    for reader in &readers {
        reader.stop();
    }

    info!(
        "delivered {} SDUs, {} bytes total",
        counter.sdus(),
        counter.bytes()
    );
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(IpcpLogFormatter::new())
        .init();
}
