//! Identifier-based matching.
//!
//! Connects nodes of A and B that carry the same unique id. Only meaningful
//! when ids are unique in both documents; otherwise the strategy adds
//! nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_hash_hex, quantize};
use crate::document::TreeDocument;
use crate::manager::{ConnectionError, ConnectionManager};
use crate::types::{Connection, NodeId};
use super::Connector;

/// Weight of connections found by id.
pub const ID_BASE_WEIGHT: f64 = 1.0;

/// Configuration of [`IdConnector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConnectorConfig {
    /// Only connect two nodes if both are elements with the same tag name.
    pub require_same_label: bool,
    /// Weight of every connection added.
    pub base_weight: f64,
}

impl Default for IdConnectorConfig {
    fn default() -> Self {
        Self {
            require_same_label: true,
            base_weight: ID_BASE_WEIGHT,
        }
    }
}

#[derive(Serialize)]
struct QuantizedConfig {
    require_same_label: bool,
    base_weight: i64,
}

impl IdConnectorConfig {
    /// Canonical hash of this configuration, for provenance.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&QuantizedConfig {
            require_same_label: self.require_same_label,
            base_weight: quantize(self.base_weight),
        })
    }
}

/// Connects nodes with the same id.
#[derive(Debug, Clone, Default)]
pub struct IdConnector {
    config: IdConnectorConfig,
}

impl IdConnector {
    /// Create a connector with `config`.
    pub fn new(config: IdConnectorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &IdConnectorConfig {
        &self.config
    }

    /// Connect every id shared by A and B.
    ///
    /// Ids are visited in ascending order. With `require_same_label`, a pair
    /// is only connected if both nodes are elements with the same tag name.
    pub fn find_connections<D: TreeDocument>(
        &self,
        manager: &mut ConnectionManager<D>,
        require_same_label: bool,
    ) -> Result<usize, ConnectionError> {
        // Cloning the handles releases the borrow on the manager
        let doc_a = Arc::clone(manager.doc_a());
        let doc_b = Arc::clone(manager.doc_b());

        if !doc_a.has_unique_ids() || !doc_b.has_unique_ids() {
            tracing::debug!(
                doc_a = %doc_a.id(),
                doc_b = %doc_b.id(),
                unique_a = doc_a.has_unique_ids(),
                unique_b = doc_b.has_unique_ids(),
                "ids not unique, skipping id matching"
            );
            return Ok(0);
        }

        let mut added = 0;
        for id in doc_a.occurring_ids() {
            let Some(node_b) = doc_b.node_by_id(id) else {
                continue;
            };
            let Some(node_a) = doc_a.node_by_id(id) else {
                continue;
            };

            if require_same_label && !same_label(doc_a.as_ref(), node_a, doc_b.as_ref(), node_b) {
                continue;
            }

            manager.add_connection(Connection::with_weight(node_a, node_b, self.config.base_weight))?;
            added += 1;
        }

        tracing::debug!(added, require_same_label, "id matching finished");
        Ok(added)
    }
}

fn same_label<D: TreeDocument>(doc_a: &D, node_a: NodeId, doc_b: &D, node_b: NodeId) -> bool {
    if !doc_a.is_element(node_a) || !doc_b.is_element(node_b) {
        return false;
    }
    match (doc_a.tag_name(node_a), doc_b.tag_name(node_b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl<D: TreeDocument> Connector<D> for IdConnector {
    fn name(&self) -> &'static str {
        "id"
    }

    fn connect(&self, manager: &mut ConnectionManager<D>) -> Result<usize, ConnectionError> {
        self.find_connections(manager, self.config.require_same_label)
    }
}
