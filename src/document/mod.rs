//! Document tree boundary.
//!
//! The matching core consumes documents through [`TreeDocument`] and never
//! mutates them. Parsing a concrete format into a tree lives outside this
//! crate; [`InMemoryDocument`] is an arena-backed implementation for callers
//! that build trees programmatically, and for tests.

pub mod memory;

use crate::types::{DocumentId, Modification, NodeId, NodeKind};

/// Attribute holding a node's unique identifier.
pub const ID_ATTRIBUTE: &str = "id";

/// Read-only view of a hierarchical document.
///
/// Methods taking a [`NodeId`] that belongs to another document return
/// `None`, an empty slice, or an empty mask.
pub trait TreeDocument {
    /// Identity of this document instance.
    fn id(&self) -> DocumentId;

    /// Root node of the tree.
    fn root(&self) -> NodeId;

    /// Whether `node` belongs to this document.
    fn contains(&self, node: NodeId) -> bool;

    /// Whether every id value occurs at most once in this document.
    fn has_unique_ids(&self) -> bool;

    /// Every id value occurring in this document, in ascending order.
    fn occurring_ids(&self) -> Vec<&str>;

    /// Node carrying the id value `id`.
    fn node_by_id(&self, id: &str) -> Option<NodeId>;

    /// Parent of `node`, `None` for the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Ordered children of `node`. Only element nodes have children.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Kind of `node`.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Tag name of an element node.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Value of attribute `name` on an element node.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Modification flags of `node`.
    fn modification(&self, node: NodeId) -> Modification;

    /// True if `node` is an element node.
    fn is_element(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(NodeKind::Element))
    }
}

pub use memory::{DocumentBuilder, DocumentError, InMemoryDocument};
