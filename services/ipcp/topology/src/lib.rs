//! Flow-state topology graph and shortest-path computation for the IPC process.
//!
//! This crate builds a directed topology graph from flow-state advertisements
//! distributed across the layer and computes single-source shortest paths over
//! it. The routing crate turns the result into a PDU forwarding table.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod advertisement;
pub mod dijkstra;
pub mod error;
pub mod graph;

pub use advertisement::*;
pub use dijkstra::*;
pub use error::*;
pub use graph::*;
