//! In-memory document tree.

use std::collections::BTreeMap;

use crate::types::{DocumentId, Modification, NodeId, NodeKind};
use super::{TreeDocument, ID_ATTRIBUTE};

/// Error type for building in-memory documents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// Node does not belong to the document under construction.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// Only element nodes can take children.
    #[error("Node {0} is not an element and cannot have children")]
    ParentNotElement(NodeId),
    /// Only element nodes carry attributes.
    #[error("Node {0} is not an element and cannot carry attributes")]
    AttributeOnText(NodeId),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    /// Tag name for elements, content for text nodes.
    label: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    modification: Modification,
}

impl NodeData {
    fn new(kind: NodeKind, label: String, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            label,
            attributes: BTreeMap::new(),
            parent,
            children: Vec::new(),
            modification: Modification::UNMODIFIED,
        }
    }
}

/// Arena-backed document tree.
///
/// Nodes are stored contiguously and addressed by their [`NodeId`] index.
/// The id index uses a BTreeMap for deterministic iteration order.
#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    id: DocumentId,
    nodes: Vec<NodeData>,
    /// Id value -> first node carrying it.
    ids: BTreeMap<String, NodeId>,
    unique_ids: bool,
}

impl InMemoryDocument {
    fn data(&self, node: NodeId) -> Option<&NodeData> {
        if node.document() != self.id {
            return None;
        }
        self.nodes.get(node.index() as usize)
    }

    /// Number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node)
            .filter(|d| d.kind == NodeKind::Text)
            .map(|d| d.label.as_str())
    }

    /// Overwrite the modification flags of `node`.
    ///
    /// Returns `false` if the node does not belong to this document.
    pub fn set_modification(&mut self, node: NodeId, modification: Modification) -> bool {
        if node.document() != self.id {
            return false;
        }
        match self.nodes.get_mut(node.index() as usize) {
            Some(data) => {
                data.modification = modification;
                true
            }
            None => false,
        }
    }

    /// All nodes in pre-order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            // Reverse so the first child is visited first
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }
}

impl TreeDocument for InMemoryDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn root(&self) -> NodeId {
        NodeId::new(self.id, 0)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.data(node).is_some()
    }

    fn has_unique_ids(&self) -> bool {
        self.unique_ids
    }

    fn occurring_ids(&self) -> Vec<&str> {
        self.ids.keys().map(String::as_str).collect()
    }

    fn node_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).and_then(|d| d.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node)
            .map(|d| d.children.as_slice())
            .unwrap_or_default()
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.data(node).map(|d| d.kind)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.data(node)
            .filter(|d| d.kind == NodeKind::Element)
            .map(|d| d.label.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node)
            .and_then(|d| d.attributes.get(name))
            .map(String::as_str)
    }

    fn modification(&self, node: NodeId) -> Modification {
        self.data(node)
            .map(|d| d.modification)
            .unwrap_or_else(Modification::empty)
    }
}

/// Builder for [`InMemoryDocument`].
///
/// The root element is created up front, so a built document is never empty.
///
/// ```
/// use docmatch::document::{DocumentBuilder, TreeDocument};
///
/// let mut builder = DocumentBuilder::new("sbml");
/// let model = builder.add_element(builder.root(), "model").unwrap();
/// builder.set_attribute(model, "id", "m1").unwrap();
/// let doc = builder.build();
///
/// assert_eq!(doc.node_by_id("m1"), Some(model));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: DocumentId,
    nodes: Vec<NodeData>,
}

impl DocumentBuilder {
    /// Start a document with a fresh random id and root element `root_tag`.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self::with_document_id(DocumentId::random(), root_tag)
    }

    /// Start a document with a fixed id (for reproducible fixtures).
    ///
    /// The id is not checked for uniqueness. Managers only treat documents
    /// as the same scope when they share the built instance, so two trees
    /// built with one id never mix.
    pub fn with_document_id(id: DocumentId, root_tag: impl Into<String>) -> Self {
        Self {
            id,
            nodes: vec![NodeData::new(NodeKind::Element, root_tag.into(), None)],
        }
    }

    /// Id of the document under construction.
    pub fn document_id(&self) -> DocumentId {
        self.id
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        NodeId::new(self.id, 0)
    }

    fn data_mut(&mut self, node: NodeId) -> Result<&mut NodeData, DocumentError> {
        if node.document() != self.id {
            return Err(DocumentError::UnknownNode(node));
        }
        self.nodes
            .get_mut(node.index() as usize)
            .ok_or(DocumentError::UnknownNode(node))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind, label: String) -> Result<NodeId, DocumentError> {
        let parent_data = self.data_mut(parent)?;
        if parent_data.kind != NodeKind::Element {
            return Err(DocumentError::ParentNotElement(parent));
        }

        let node = NodeId::new(self.id, self.nodes.len() as u32);
        // Re-borrow after the length read
        self.data_mut(parent)?.children.push(node);
        self.nodes.push(NodeData::new(kind, label, Some(parent)));
        Ok(node)
    }

    /// Append an element with tag `tag` below `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: impl Into<String>) -> Result<NodeId, DocumentError> {
        self.push(parent, NodeKind::Element, tag.into())
    }

    /// Append a text node below `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId, DocumentError> {
        self.push(parent, NodeKind::Text, text.into())
    }

    /// Set attribute `name` on element `node`.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let data = self.data_mut(node)?;
        if data.kind != NodeKind::Element {
            return Err(DocumentError::AttributeOnText(node));
        }
        data.attributes.insert(name.into(), value.into());
        Ok(())
    }

    /// Set the modification flags of `node`.
    pub fn set_modification(&mut self, node: NodeId, modification: Modification) -> Result<(), DocumentError> {
        self.data_mut(node)?.modification = modification;
        Ok(())
    }

    /// Finish the document and build its id index.
    pub fn build(self) -> InMemoryDocument {
        let mut ids: BTreeMap<String, NodeId> = BTreeMap::new();
        let mut unique_ids = true;

        for (index, data) in self.nodes.iter().enumerate() {
            if let Some(value) = data.attributes.get(ID_ATTRIBUTE) {
                let node = NodeId::new(self.id, index as u32);
                if ids.contains_key(value) {
                    unique_ids = false;
                } else {
                    ids.insert(value.clone(), node);
                }
            }
        }

        InMemoryDocument {
            id: self.id,
            nodes: self.nodes,
            ids,
            unique_ids,
        }
    }
}
