//! Connection manager: the bijective store of a matching.
//!
//! A [`ConnectionManager`] is scoped to one pair of documents (A, B) and owns
//! every [`Connection`] between them.
//!
//! ## Invariants
//!
//! - **Bijective per side**: a node of A is the A-side of at most one stored
//!   connection, and symmetrically for B. Insertion is atomic: either the
//!   connection lands in the store and both indices, or nothing changes.
//! - **Document scoping**: set algebra only combines managers scoped to the
//!   identical document pair. Connections only join nodes of A to nodes of B.
//! - **No operand mutation**: `union`, `intersection`, `set_diff` and
//!   `sym_diff` always build a fresh manager, and leave both operands
//!   untouched on failure.
//!
//! ## Storage
//!
//! Connections live in a single insertion-ordered map keyed by a sequence
//! number. The two side indices map a node to that key only, so every drop
//! has one record to remove.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::canonical::{canonical_hash_hex, quantize};
use crate::document::TreeDocument;
use crate::types::{Connection, NodeId};

/// Side of a matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// The original document.
    A,
    /// The modified document.
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Error type for connection manager operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// One side of the proposed connection is already connected.
    #[error("Node {node} of document {side} is already connected")]
    ConnectionConflict {
        /// Side on which the conflict was found.
        side: Side,
        /// The already connected node.
        node: NodeId,
    },
    /// The operands are scoped to different document pairs.
    #[error("Connection managers are scoped to different document pairs")]
    DocumentScopeMismatch,
    /// A node does not belong to the document of its side.
    #[error("Node {node} does not belong to document {side}")]
    ForeignNode {
        /// Side the node was proposed for.
        side: Side,
        /// The offending node.
        node: NodeId,
    },
}

type ConnectionKey = u64;

/// Owning, query-able store of a matching between two documents.
pub struct ConnectionManager<D: TreeDocument> {
    doc_a: Arc<D>,
    doc_b: Arc<D>,
    /// Sole owner of the connections, in insertion order.
    connections: BTreeMap<ConnectionKey, Connection>,
    /// A-side node -> connection key.
    by_a: HashMap<NodeId, ConnectionKey>,
    /// B-side node -> connection key.
    by_b: HashMap<NodeId, ConnectionKey>,
    next_key: ConnectionKey,
}

#[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct FingerprintEntry {
    node_a: NodeId,
    node_b: NodeId,
    weight: i64,
}

impl<D: TreeDocument> ConnectionManager<D> {
    /// Create an empty manager for the document pair (A, B).
    pub fn new(doc_a: Arc<D>, doc_b: Arc<D>) -> Self {
        Self {
            doc_a,
            doc_b,
            connections: BTreeMap::new(),
            by_a: HashMap::new(),
            by_b: HashMap::new(),
            next_key: 0,
        }
    }

    /// Deep copy of this manager, scoped to the same document pair.
    ///
    /// Every connection is re-added through [`add_connection`](Self::add_connection),
    /// so a copy of a consistent manager never fails.
    pub fn try_clone(&self) -> Result<Self, ConnectionError> {
        let mut copy = Self::new(Arc::clone(&self.doc_a), Arc::clone(&self.doc_b));
        for c in self.connections() {
            copy.add_connection(c.clone())?;
        }
        Ok(copy)
    }

    /// Document A (the original).
    pub fn doc_a(&self) -> &Arc<D> {
        &self.doc_a
    }

    /// Document B (the modified version).
    pub fn doc_b(&self) -> &Arc<D> {
        &self.doc_b
    }

    /// Number of stored connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// True if no connection is stored.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Stored connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.values()
    }

    /// Whether `other` is scoped to the same document pair.
    ///
    /// Both managers must hold the identical document instances; two
    /// documents that merely share a [`DocumentId`](crate::DocumentId) are
    /// different scopes.
    pub fn same_scope(&self, other: &Self) -> bool {
        self.doc_a.id() == other.doc_a.id()
            && self.doc_b.id() == other.doc_b.id()
            && Arc::ptr_eq(&self.doc_a, &other.doc_a)
            && Arc::ptr_eq(&self.doc_b, &other.doc_b)
    }

    fn check_scope(&self, other: &Self) -> Result<(), ConnectionError> {
        if self.same_scope(other) {
            Ok(())
        } else {
            Err(ConnectionError::DocumentScopeMismatch)
        }
    }

    /// Store a connection.
    ///
    /// # Errors
    /// - `ForeignNode` if `node_a` is not in A or `node_b` is not in B
    /// - `ConnectionConflict` if either node is already connected
    ///
    /// Both checks run before any mutation.
    pub fn add_connection(&mut self, c: Connection) -> Result<(), ConnectionError> {
        let (a, b) = (c.node_a(), c.node_b());

        if !self.doc_a.contains(a) {
            return Err(ConnectionError::ForeignNode { side: Side::A, node: a });
        }
        if !self.doc_b.contains(b) {
            return Err(ConnectionError::ForeignNode { side: Side::B, node: b });
        }
        if self.by_a.contains_key(&a) {
            return Err(ConnectionError::ConnectionConflict { side: Side::A, node: a });
        }
        if self.by_b.contains_key(&b) {
            return Err(ConnectionError::ConnectionConflict { side: Side::B, node: b });
        }

        let key = self.next_key;
        self.next_key += 1;
        self.by_a.insert(a, key);
        self.by_b.insert(b, key);
        self.connections.insert(key, c);
        Ok(())
    }

    /// Multiply the weight of every connection by `factor`.
    pub fn scale_weight_of_all(&mut self, factor: f64) {
        for c in self.connections.values_mut() {
            c.scale_weight(factor);
        }
    }

    /// Add `delta` to the weight of every connection.
    pub fn add_weight_to_all(&mut self, delta: f64) {
        for c in self.connections.values_mut() {
            c.add_weight(delta);
        }
    }

    /// Set the weight of every connection to `weight`.
    pub fn set_weight_of_all(&mut self, weight: f64) {
        for c in self.connections.values_mut() {
            c.set_weight(weight);
        }
    }

    fn remove_key(&mut self, key: ConnectionKey) -> Option<Connection> {
        let c = self.connections.remove(&key)?;
        self.by_a.remove(&c.node_a());
        self.by_b.remove(&c.node_b());
        Some(c)
    }

    fn key_for_node(&self, node: NodeId) -> Option<ConnectionKey> {
        self.by_a
            .get(&node)
            .or_else(|| self.by_b.get(&node))
            .copied()
    }

    /// Remove the connection touching `node` on either side.
    ///
    /// Returns the removed connection, `None` if `node` was unmatched.
    pub fn drop_connection_for_node(&mut self, node: NodeId) -> Option<Connection> {
        let key = self.key_for_node(node)?;
        self.remove_key(key)
    }

    /// Remove exactly the pair of `c`, if stored.
    pub fn drop_connection(&mut self, c: &Connection) -> Option<Connection> {
        let key = *self.by_a.get(&c.node_a())?;
        if !self.connections.get(&key)?.connects(c.node_a(), c.node_b()) {
            return None;
        }
        self.remove_key(key)
    }

    /// Connection touching `node` on either side (A index is consulted first).
    pub fn connection_for_node(&self, node: NodeId) -> Option<&Connection> {
        let key = self.key_for_node(node)?;
        self.connections.get(&key)
    }

    /// Mutable access to the connection touching `node`, e.g. to re-weight it.
    pub fn connection_for_node_mut(&mut self, node: NodeId) -> Option<&mut Connection> {
        let key = self.key_for_node(node)?;
        self.connections.get_mut(&key)
    }

    /// Connection pairing exactly `a` (in A) with `b` (in B).
    pub fn connection_of_nodes(&self, a: NodeId, b: NodeId) -> Option<&Connection> {
        let key = self.by_a.get(&a)?;
        self.connections.get(key).filter(|c| c.connects(a, b))
    }

    /// The node `node` is connected to, on the other side.
    pub fn partner_of(&self, node: NodeId) -> Option<NodeId> {
        if let Some(key) = self.by_a.get(&node) {
            return self.connections.get(key).map(Connection::node_b);
        }
        let key = self.by_b.get(&node)?;
        self.connections.get(key).map(Connection::node_a)
    }

    /// `self ∪ other`. Weights of shared pairs are taken from `self`.
    ///
    /// Connections of `other` that collide with a node already connected by
    /// `self` are skipped; that is the merge policy, not an error.
    ///
    /// # Errors
    /// `DocumentScopeMismatch` if `other` is scoped to another document pair.
    pub fn union(&self, other: &Self) -> Result<Self, ConnectionError> {
        self.check_scope(other)?;

        let mut union = self.try_clone()?;
        for c in other.connections() {
            match union.add_connection(c.clone()) {
                Ok(()) => {}
                Err(ConnectionError::ConnectionConflict { side, node }) => {
                    tracing::trace!(
                        side = %side,
                        node = %node,
                        "union: skipping connection, node already connected"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(union)
    }

    /// `self ∩ other`: pairs present in both, with weights from `self`.
    ///
    /// # Errors
    /// `DocumentScopeMismatch` if `other` is scoped to another document pair.
    pub fn intersection(&self, other: &Self) -> Result<Self, ConnectionError> {
        self.check_scope(other)?;
        self.filtered(|c| other.connection_of_nodes(c.node_a(), c.node_b()).is_some())
    }

    /// `self \ other`: pairs of `self` absent from `other`.
    ///
    /// # Errors
    /// `DocumentScopeMismatch` if `other` is scoped to another document pair.
    pub fn set_diff(&self, other: &Self) -> Result<Self, ConnectionError> {
        self.check_scope(other)?;
        self.filtered(|c| other.connection_of_nodes(c.node_a(), c.node_b()).is_none())
    }

    /// `(self \ other) ∪ (other \ self)`: pairs stored in exactly one operand.
    ///
    /// Expensive: runs two full set differences and a union. Avoid calling
    /// it repeatedly on large matchings.
    ///
    /// # Errors
    /// `DocumentScopeMismatch` if `other` is scoped to another document pair.
    pub fn sym_diff(&self, other: &Self) -> Result<Self, ConnectionError> {
        self.set_diff(other)?.union(&other.set_diff(self)?)
    }

    fn filtered<F>(&self, keep: F) -> Result<Self, ConnectionError>
    where
        F: Fn(&Connection) -> bool,
    {
        let mut out = Self::new(Arc::clone(&self.doc_a), Arc::clone(&self.doc_b));
        for c in self.connections().filter(|c| keep(c)) {
            out.add_connection(c.clone())?;
        }
        Ok(out)
    }

    fn document_of(&self, node: NodeId) -> Option<&D> {
        if self.doc_a.contains(node) {
            Some(self.doc_a.as_ref())
        } else if self.doc_b.contains(node) {
            Some(self.doc_b.as_ref())
        } else {
            None
        }
    }

    /// Unmatched nodes of the subtree rooted at `subtree_root`, in pre-order.
    ///
    /// Only element nodes are descended into. A node belonging to neither
    /// document is treated as a childless leaf.
    pub fn unmatched_in(&self, subtree_root: NodeId) -> Vec<NodeId> {
        let doc = self.document_of(subtree_root);
        let mut unmatched = Vec::new();
        let mut stack = vec![subtree_root];

        while let Some(node) = stack.pop() {
            if self.connection_for_node(node).is_none() {
                unmatched.push(node);
            }
            if let Some(doc) = doc {
                if doc.is_element(node) {
                    stack.extend(doc.children(node).iter().rev().copied());
                }
            }
        }
        unmatched
    }

    /// Remove every matched node from `nodes`, in place.
    pub fn remove_matched_from(&self, nodes: &mut Vec<NodeId>) {
        for i in (0..nodes.len()).rev() {
            if self.connection_for_node(nodes[i]).is_some() {
                nodes.remove(i);
            }
        }
    }

    /// Whether the parents of both sides of `c` are connected to each other.
    ///
    /// Two roots count as connected parents; a root paired with a non-root
    /// does not.
    pub fn parents_connected(&self, c: &Connection) -> bool {
        let parent_a = self.doc_a.parent(c.node_a());
        let parent_b = self.doc_b.parent(c.node_b());

        match (parent_a, parent_b) {
            (None, None) => true,
            (Some(pa), Some(pb)) => self.connection_of_nodes(pa, pb).is_some(),
            _ => false,
        }
    }

    /// Canonical hash of the matching.
    ///
    /// Independent of insertion order; weights are quantized before hashing.
    pub fn fingerprint(&self) -> String {
        let mut entries: Vec<FingerprintEntry> = self
            .connections()
            .map(|c| FingerprintEntry {
                node_a: c.node_a(),
                node_b: c.node_b(),
                weight: quantize(c.weight()),
            })
            .collect();
        entries.sort();
        canonical_hash_hex(&entries)
    }
}

impl<D: TreeDocument> fmt::Debug for ConnectionManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("doc_a", &self.doc_a.id())
            .field("doc_b", &self.doc_b.id())
            .field("connections", &self.connections.len())
            .field("index_a", &self.by_a.len())
            .field("index_b", &self.by_b.len())
            .finish()
    }
}

impl<D: TreeDocument> fmt::Display for ConnectionManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "connections: {}-{}-{}",
            self.connections.len(),
            self.by_a.len(),
            self.by_b.len()
        )?;
        for c in self.connections() {
            writeln!(f, "{}", c)?;
        }
        Ok(())
    }
}
