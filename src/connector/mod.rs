//! Matching strategies.
//!
//! A [`Connector`] runs one matching heuristic against the document pair a
//! [`ConnectionManager`] is scoped to, adding connections to it. Managers
//! need not be empty: several connectors can share one manager in sequence
//! to build a matching in passes, or each can fill its own manager for a
//! later merge through set algebra.
//!
//! ```text
//! Connector 1 ─┐
//! Connector 2 ─┼─▶ ConnectionManager ─▶ Producer
//! Connector n ─┘
//! ```

pub mod id;

use crate::document::TreeDocument;
use crate::manager::{ConnectionError, ConnectionManager};

/// A pluggable matching heuristic.
///
/// Implementations must only add connections through
/// [`ConnectionManager::add_connection`]; a conflict returned from there is a
/// bug in the strategy and is propagated unchanged.
pub trait Connector<D: TreeDocument> {
    /// Short name of the strategy, used in logs.
    fn name(&self) -> &'static str;

    /// Run the heuristic, returning the number of connections added.
    fn connect(&self, manager: &mut ConnectionManager<D>) -> Result<usize, ConnectionError>;
}

/// Run `connectors` one after another on the same manager.
///
/// Stops at the first failing connector. Returns the total number of
/// connections added.
pub fn run_all<D: TreeDocument>(
    connectors: &[&dyn Connector<D>],
    manager: &mut ConnectionManager<D>,
) -> Result<usize, ConnectionError> {
    let mut total = 0;
    for connector in connectors {
        let added = connector.connect(manager)?;
        tracing::debug!(
            connector = connector.name(),
            added,
            total_connections = manager.len(),
            "connector pass finished"
        );
        total += added;
    }
    Ok(total)
}

pub use id::{IdConnector, IdConnectorConfig};
