//! Connection between a node of document A and a node of document B.

use serde::{Deserialize, Serialize};
use std::fmt;
use super::node::NodeId;

/// Weight assigned when none is given.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One pairing of a node in document A with a node in document B.
///
/// The pair `(node_a, node_b)` is the identity of a connection; the weight
/// is a mutable confidence score and does not take part in equality.
///
/// Weights never drop below zero: every constructor and mutator clamps
/// negative results (and NaN) to `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    node_a: NodeId,
    node_b: NodeId,
    weight: f64,
}

fn clamp(weight: f64) -> f64 {
    // f64::max returns the non-NaN operand
    weight.max(0.0)
}

impl Connection {
    /// Connect `node_a` with `node_b` using the default weight.
    pub fn new(node_a: NodeId, node_b: NodeId) -> Self {
        Self::with_weight(node_a, node_b, DEFAULT_WEIGHT)
    }

    /// Connect `node_a` with `node_b` using `weight`.
    pub fn with_weight(node_a: NodeId, node_b: NodeId, weight: f64) -> Self {
        Self {
            node_a,
            node_b,
            weight: clamp(weight),
        }
    }

    /// Node in document A.
    pub fn node_a(&self) -> NodeId {
        self.node_a
    }

    /// Node in document B.
    pub fn node_b(&self) -> NodeId {
        self.node_b
    }

    /// Current weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Multiply the weight by `factor`.
    pub fn scale_weight(&mut self, factor: f64) {
        self.weight = clamp(self.weight * factor);
    }

    /// Add `delta` to the weight. Negative results are floored at zero.
    pub fn add_weight(&mut self, delta: f64) {
        self.weight = clamp(self.weight + delta);
    }

    /// Replace the weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = clamp(weight);
    }

    /// True if this connection pairs exactly `a` with `b`.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        self.node_a == a && self.node_b == b
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.node_a == other.node_a && self.node_b == other.node_b
    }
}

impl Eq for Connection {}

impl std::hash::Hash for Connection {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.node_a.hash(state);
        self.node_b.hash(state);
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.node_a, self.node_b, self.weight)
    }
}
