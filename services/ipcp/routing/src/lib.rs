//! PDU forwarding table computation and published snapshots for the IPC process.
//!
//! This crate turns one consistent snapshot of flow-state advertisements into
//! a per-destination forwarding table (destination address, next hop, egress
//! port) and publishes it to the data plane as an immutable snapshot that a
//! later pass replaces wholesale.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod entry;
pub mod error;
pub mod table;

pub use builder::*;
pub use entry::*;
pub use error::*;
pub use table::*;
