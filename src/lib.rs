//! # docmatch
//!
//! Structural matching between two versions of a hierarchical document.
//!
//! The matching is the foundation of a semantic diff: it pairs at most one
//! node of document A with at most one node of document B, expressing
//! "this element of version A became that element of version B".
//!
//! ## Architecture
//!
//! ```text
//! TreeDocument (A, B) → Connector* → ConnectionManager → Producer → Artifact
//!                                        ↑        ↓
//!                                  union / intersection / set_diff
//! ```
//!
//! - [`ConnectionManager`] owns the matching and enforces that each node is
//!   connected at most once per side.
//! - [`Connector`] is the strategy seam; [`IdConnector`] matches by unique id.
//! - [`Producer`] turns a finished matching into an artifact, e.g. a
//!   [`DiffReport`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use docmatch::{ConnectionManager, Connector, IdConnector};
//! use docmatch::document::DocumentBuilder;
//!
//! let mut a = DocumentBuilder::new("model");
//! let s1_a = a.add_element(a.root(), "species").unwrap();
//! a.set_attribute(s1_a, "id", "s1").unwrap();
//!
//! let mut b = DocumentBuilder::new("model");
//! let s1_b = b.add_element(b.root(), "species").unwrap();
//! b.set_attribute(s1_b, "id", "s1").unwrap();
//!
//! let mut manager = ConnectionManager::new(Arc::new(a.build()), Arc::new(b.build()));
//! IdConnector::default().connect(&mut manager).unwrap();
//!
//! assert!(manager.connection_of_nodes(s1_a, s1_b).is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod document;
pub mod manager;
pub mod connector;
pub mod producer;
pub mod canonical;

// Re-exports
pub use types::{Connection, DocumentId, Modification, NodeId, NodeKind, DEFAULT_WEIGHT};
pub use document::{DocumentBuilder, DocumentError, InMemoryDocument, TreeDocument};
pub use manager::{ConnectionError, ConnectionManager, Side};
pub use connector::{Connector, IdConnector, IdConnectorConfig};
pub use producer::{classify, ChangeKind, DiffEntry, DiffReport, DiffReportProducer, Producer};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
