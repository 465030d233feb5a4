//! Per-flow SDU reader tasks with cooperative lifecycle for the IPC process.
//!
//! One [`FlowReader`] runs per active flow: it drains SDUs from the flow and
//! hands each one to the registered [`SduListener`], strictly in read order,
//! until a read fails or a stop is requested through the handle.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ipcp_flow::{FlowReader, FlowReaderConfig, SduCounter, TcpFlow};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:4545").await?;
//! let flow = TcpFlow::new(stream, 1);
//!
//! let counter = Arc::new(SduCounter::new());
//! let reader = FlowReader::new(Box::new(flow), counter.clone(), FlowReaderConfig::default());
//! let handle = reader.start();
//!
//! // ... later, from the owning control-plane task:
//! handle.stop();
//! handle.join().await?;
//! println!("drained {} SDUs, {} bytes", counter.sdus(), counter.bytes());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod flow;
pub mod listener;
pub mod reader;

pub use error::FlowError;
pub use flow::{Flow, TcpFlow};
pub use listener::{SduCounter, SduListener};
pub use reader::{FlowReader, FlowReaderConfig, FlowReaderHandle};
