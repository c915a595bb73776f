//! Diff report: a flat, serializable summary of a matching.
//!
//! Entries follow document A in pre-order (matched pairs and deletions),
//! followed by the insertions of document B in pre-order.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::document::TreeDocument;
use crate::manager::ConnectionManager;
use crate::types::NodeId;
use super::{classify, ChangeKind, Producer};

/// One line of a [`DiffReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Classification of the entry.
    pub kind: ChangeKind,
    /// Node in A, absent for insertions.
    pub node_a: Option<NodeId>,
    /// Node in B, absent for deletions.
    pub node_b: Option<NodeId>,
    /// Human readable label, `"old -> new"` when the label changed.
    pub label: String,
    /// Connection weight, absent for unmatched nodes.
    pub weight: Option<f64>,
}

/// Summary of a matching between two documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    /// Entries in report order.
    pub entries: Vec<DiffEntry>,
    /// Number of insertions.
    pub inserted: usize,
    /// Number of deletions.
    pub deleted: usize,
    /// Number of modified pairs.
    pub modified: usize,
    /// Number of unmodified pairs.
    pub unmodified: usize,
    /// Fingerprint of the underlying matching.
    pub matching_fingerprint: String,
}

impl DiffReport {
    /// Entries of a given kind.
    pub fn entries_of(&self, kind: ChangeKind) -> impl Iterator<Item = &DiffEntry> + '_ {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// True if the documents are structurally identical under the matching.
    pub fn is_unchanged(&self) -> bool {
        self.inserted == 0 && self.deleted == 0 && self.modified == 0
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Produces a [`DiffReport`].
#[derive(Debug, Clone)]
pub struct DiffReportProducer {
    /// Attribute used as label before falling back to the tag name.
    pub label_attribute: String,
    /// Also report text nodes.
    pub include_text: bool,
}

impl Default for DiffReportProducer {
    fn default() -> Self {
        Self {
            label_attribute: "name".to_string(),
            include_text: false,
        }
    }
}

impl DiffReportProducer {
    fn label<D: TreeDocument>(&self, doc: &D, node: NodeId) -> Option<String> {
        if let Some(value) = doc.attribute(node, &self.label_attribute) {
            return Some(value.to_string());
        }
        doc.tag_name(node).map(str::to_string)
    }

    fn reportable<D: TreeDocument>(&self, doc: &D, node: NodeId) -> bool {
        self.include_text || doc.is_element(node)
    }
}

fn combine_labels(a: Option<String>, b: Option<String>) -> String {
    match (a, b) {
        (Some(a), Some(b)) if a == b => a,
        (Some(a), Some(b)) => format!("{} -> {}", a, b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => String::new(),
    }
}

/// Pre-order walk of the whole document.
fn preorder<D: TreeDocument>(doc: &D) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        out.push(node);
        if doc.is_element(node) {
            stack.extend(doc.children(node).iter().rev().copied());
        }
    }
    out
}

impl<D: TreeDocument> Producer<D> for DiffReportProducer {
    type Artifact = DiffReport;
    type Error = Infallible;

    fn produce(&self, manager: &ConnectionManager<D>) -> Result<DiffReport, Infallible> {
        let doc_a = manager.doc_a().as_ref();
        let doc_b = manager.doc_b().as_ref();
        let mut entries = Vec::new();

        for node in preorder(doc_a) {
            if !self.reportable(doc_a, node) {
                continue;
            }
            let Some(kind) = classify(manager, node) else {
                continue;
            };
            let (node_b, weight) = match manager.connection_for_node(node) {
                Some(c) => (Some(c.node_b()), Some(c.weight())),
                None => (None, None),
            };
            let label = combine_labels(
                self.label(doc_a, node),
                node_b.and_then(|b| self.label(doc_b, b)),
            );
            entries.push(DiffEntry {
                kind,
                node_a: Some(node),
                node_b,
                label,
                weight,
            });
        }

        for node in manager.unmatched_in(doc_b.root()) {
            if !self.reportable(doc_b, node) {
                continue;
            }
            entries.push(DiffEntry {
                kind: ChangeKind::Insert,
                node_a: None,
                node_b: Some(node),
                label: combine_labels(None, self.label(doc_b, node)),
                weight: None,
            });
        }

        let count = |kind: ChangeKind| entries.iter().filter(|e| e.kind == kind).count();
        let inserted = count(ChangeKind::Insert);
        let deleted = count(ChangeKind::Delete);
        let modified = count(ChangeKind::Modified);
        let unmodified = count(ChangeKind::Unmodified);

        tracing::debug!(inserted, deleted, modified, unmodified, "diff report produced");

        Ok(DiffReport {
            entries,
            inserted,
            deleted,
            modified,
            unmodified,
            matching_fingerprint: manager.fingerprint(),
        })
    }
}
