//! Core types for the matching engine.

pub mod node;
pub mod modification;
pub mod connection;

pub use node::{DocumentId, NodeId, NodeKind};
pub use modification::Modification;
pub use connection::{Connection, DEFAULT_WEIGHT};
