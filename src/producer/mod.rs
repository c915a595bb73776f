//! Producers consume a finished matching.
//!
//! A [`Producer`] borrows the [`ConnectionManager`] immutably, so no
//! connector can mutate the matching while an artifact is being produced.
//!
//! ## Classification
//!
//! Consumers derive a [`ChangeKind`] per node from connection presence plus
//! the documents' modification flags:
//!
//! | Node | Kind |
//! |------|------|
//! | unmatched, in A | `Delete` |
//! | unmatched, in B | `Insert` |
//! | matched, either side MODIFIED or SUB_MODIFIED | `Modified` |
//! | matched otherwise | `Unmodified` |

pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::TreeDocument;
use crate::manager::ConnectionManager;
use crate::types::NodeId;

/// Builds a derived artifact from a finished matching.
pub trait Producer<D: TreeDocument> {
    /// The produced artifact.
    type Artifact;
    /// Error type of production.
    type Error;

    /// Produce the artifact.
    fn produce(&self, manager: &ConnectionManager<D>) -> Result<Self::Artifact, Self::Error>;
}

/// Change classification of a node or pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Only present in B.
    Insert,
    /// Only present in A.
    Delete,
    /// Present in both, changed.
    Modified,
    /// Present in both, unchanged.
    Unmodified,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Delete => write!(f, "delete"),
            Self::Modified => write!(f, "modified"),
            Self::Unmodified => write!(f, "unmodified"),
        }
    }
}

/// Classify `node` against the matching held by `manager`.
///
/// Returns `None` if `node` belongs to neither document.
pub fn classify<D: TreeDocument>(manager: &ConnectionManager<D>, node: NodeId) -> Option<ChangeKind> {
    let in_a = manager.doc_a().contains(node);
    let in_b = manager.doc_b().contains(node);
    if !in_a && !in_b {
        return None;
    }

    let Some(c) = manager.connection_for_node(node) else {
        return Some(if in_a { ChangeKind::Delete } else { ChangeKind::Insert });
    };

    let changed = manager.doc_a().modification(c.node_a()).is_changed()
        || manager.doc_b().modification(c.node_b()).is_changed();

    Some(if changed { ChangeKind::Modified } else { ChangeKind::Unmodified })
}

pub use report::{DiffEntry, DiffReport, DiffReportProducer};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::document::{DocumentBuilder, InMemoryDocument};
    use crate::types::{Connection, Modification};

    #[test]
    fn test_classify() {
        let mut a = DocumentBuilder::new("root");
        let kept_a = a.add_element(a.root(), "kept").unwrap();
        let changed_a = a.add_element(a.root(), "changed").unwrap();
        let gone = a.add_element(a.root(), "gone").unwrap();

        let mut b = DocumentBuilder::new("root");
        let kept_b = b.add_element(b.root(), "kept").unwrap();
        let changed_b = b.add_element(b.root(), "changed").unwrap();
        let new = b.add_element(b.root(), "new").unwrap();
        b.set_modification(changed_b, Modification::MODIFIED).unwrap();

        let doc_a: Arc<InMemoryDocument> = Arc::new(a.build());
        let doc_b = Arc::new(b.build());
        let mut m = ConnectionManager::new(Arc::clone(&doc_a), Arc::clone(&doc_b));
        m.add_connection(Connection::new(kept_a, kept_b)).unwrap();
        m.add_connection(Connection::new(changed_a, changed_b)).unwrap();

        assert_eq!(classify(&m, kept_a), Some(ChangeKind::Unmodified));
        assert_eq!(classify(&m, kept_b), Some(ChangeKind::Unmodified));
        // Either side's flag is enough
        assert_eq!(classify(&m, changed_a), Some(ChangeKind::Modified));
        assert_eq!(classify(&m, gone), Some(ChangeKind::Delete));
        assert_eq!(classify(&m, new), Some(ChangeKind::Insert));

        let stranger = DocumentBuilder::new("x").build();
        assert_eq!(classify(&m, stranger.root()), None);
    }
}
