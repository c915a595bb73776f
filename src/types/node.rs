//! Node handles for document trees.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;

/// Identity of one document instance.
///
/// Assigned once when a document is built. Two documents are the same
/// instance iff their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a DocumentId from a UUID.
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random DocumentId.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Handle to a node inside a document tree.
///
/// A cheap `Copy` handle: the owning document plus the node's arena index.
/// Nodes of different documents never compare equal, even when their
/// indices coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    document: DocumentId,
    index: u32,
}

impl NodeId {
    /// Create a handle for the node at `index` in `document`.
    pub const fn new(document: DocumentId, index: u32) -> Self {
        Self { document, index }
    }

    /// The document this node belongs to.
    #[inline]
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Arena index within the owning document.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.index)
    }
}

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Document element. The only kind that carries children.
    Element,
    /// Text content. Always a leaf.
    Text,
}

impl NodeKind {
    /// Whether nodes of this kind may have children.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_index_different_documents() {
        let a = NodeId::new(DocumentId::new(Uuid::from_u128(1)), 0);
        let b = NodeId::new(DocumentId::new(Uuid::from_u128(2)), 0);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn test_node_ordering() {
        let doc = DocumentId::new(Uuid::from_u128(1));
        let other = DocumentId::new(Uuid::from_u128(2));

        // Document first, then index
        assert!(NodeId::new(doc, 5) < NodeId::new(other, 0));
        assert!(NodeId::new(doc, 1) < NodeId::new(doc, 2));
    }
}
