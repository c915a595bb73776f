//! Property tests for the connection manager.
//!
//! Matchings are generated as arbitrary pair lists over two fixed
//! documents; pairs that collide with an earlier pair are dropped on
//! insertion, like any connector would see them.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use docmatch::{
    Connection, ConnectionError, ConnectionManager, DocumentBuilder, DocumentId,
    InMemoryDocument, NodeId, TreeDocument,
};
use proptest::prelude::*;
use uuid::Uuid;

const NODES: usize = 12;

struct Fixture {
    doc_a: Arc<InMemoryDocument>,
    doc_b: Arc<InMemoryDocument>,
    a: Vec<NodeId>,
    b: Vec<NodeId>,
}

fn tree_doc(seed: u128) -> (InMemoryDocument, Vec<NodeId>) {
    let mut builder = DocumentBuilder::with_document_id(DocumentId::new(Uuid::from_u128(seed)), "root");
    let mut nodes = vec![builder.root()];
    for i in 1..NODES {
        let parent = nodes[(i - 1) / 3];
        nodes.push(builder.add_element(parent, format!("n{}", i)).unwrap());
    }
    (builder.build(), nodes)
}

fn fixture() -> Fixture {
    let (doc_a, a) = tree_doc(10);
    let (doc_b, b) = tree_doc(20);
    Fixture {
        doc_a: Arc::new(doc_a),
        doc_b: Arc::new(doc_b),
        a,
        b,
    }
}

impl Fixture {
    fn build(&self, pairs: &[(usize, usize, f64)]) -> ConnectionManager<InMemoryDocument> {
        let mut m = ConnectionManager::new(Arc::clone(&self.doc_a), Arc::clone(&self.doc_b));
        for &(i, j, w) in pairs {
            let _ = m.add_connection(Connection::with_weight(self.a[i], self.b[j], w));
        }
        m
    }
}

fn pair_set(m: &ConnectionManager<InMemoryDocument>) -> BTreeSet<(NodeId, NodeId)> {
    m.connections().map(|c| (c.node_a(), c.node_b())).collect()
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0..NODES, 0..NODES, 0.0f64..10.0), 0..24)
}

proptest! {
    #[test]
    fn prop_injective(pairs in pairs_strategy()) {
        let f = fixture();
        let m = f.build(&pairs);

        let mut seen_a = HashSet::new();
        let mut seen_b = HashSet::new();
        for c in m.connections() {
            prop_assert!(seen_a.insert(c.node_a()));
            prop_assert!(seen_b.insert(c.node_b()));
        }
    }

    #[test]
    fn prop_rejection_is_atomic(pairs in pairs_strategy(), i in 0..NODES, j in 0..NODES) {
        let f = fixture();
        let mut m = f.build(&pairs);
        let before = pair_set(&m);
        let (a, b) = (f.a[i], f.b[j]);
        let a_partner = m.partner_of(a);
        let b_partner = m.partner_of(b);

        match m.add_connection(Connection::new(a, b)) {
            Ok(()) => {
                prop_assert!(a_partner.is_none() && b_partner.is_none());
                prop_assert_eq!(m.len(), before.len() + 1);
            }
            Err(ConnectionError::ConnectionConflict { .. }) => {
                prop_assert!(a_partner.is_some() || b_partner.is_some());
                prop_assert_eq!(pair_set(&m), before);
                prop_assert_eq!(m.partner_of(a), a_partner);
                prop_assert_eq!(m.partner_of(b), b_partner);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn prop_union(p1 in pairs_strategy(), p2 in pairs_strategy()) {
        let f = fixture();
        let m1 = f.build(&p1);
        let m2 = f.build(&p2);
        let u = m1.union(&m2).unwrap();
        let (s1, s2, su) = (pair_set(&m1), pair_set(&m2), pair_set(&u));

        prop_assert!(s1.is_subset(&su));
        prop_assert!(su.is_subset(&s1.union(&s2).cloned().collect()));
        // A pair of m2 is only missing if one of its nodes is taken
        for (a, b) in s2.difference(&su) {
            prop_assert!(u.connection_for_node(*a).is_some() || u.connection_for_node(*b).is_some());
        }
        // Weights from the left operand
        for c in m1.connections() {
            let w = u.connection_of_nodes(c.node_a(), c.node_b()).unwrap().weight();
            prop_assert_eq!(w, c.weight());
        }
    }

    #[test]
    fn prop_intersection_and_diff(p1 in pairs_strategy(), p2 in pairs_strategy()) {
        let f = fixture();
        let m1 = f.build(&p1);
        let m2 = f.build(&p2);
        let (s1, s2) = (pair_set(&m1), pair_set(&m2));

        let i = m1.intersection(&m2).unwrap();
        let expected: BTreeSet<_> = s1.intersection(&s2).cloned().collect();
        prop_assert_eq!(pair_set(&i), expected);
        for c in i.connections() {
            let w = m1.connection_of_nodes(c.node_a(), c.node_b()).unwrap().weight();
            prop_assert_eq!(c.weight(), w);
        }

        let d = m1.set_diff(&m2).unwrap();
        let expected: BTreeSet<_> = s1.difference(&s2).cloned().collect();
        prop_assert_eq!(pair_set(&d), expected);
    }

    #[test]
    fn prop_sym_diff(p1 in pairs_strategy(), p2 in pairs_strategy()) {
        let f = fixture();
        let m1 = f.build(&p1);
        let m2 = f.build(&p2);
        let (s1, s2) = (pair_set(&m1), pair_set(&m2));

        let s = m1.sym_diff(&m2).unwrap();
        let pairs: Vec<_> = s.connections().map(|c| (c.node_a(), c.node_b())).collect();
        let unique: BTreeSet<_> = pairs.iter().cloned().collect();
        prop_assert_eq!(pairs.len(), unique.len());

        let left: BTreeSet<_> = s1.difference(&s2).cloned().collect();
        let right: BTreeSet<_> = s2.difference(&s1).cloned().collect();
        prop_assert!(left.is_subset(&unique));
        prop_assert!(unique.is_subset(&left.union(&right).cloned().collect()));
        // Nothing shared by both operands survives
        prop_assert!(unique.is_disjoint(&s1.intersection(&s2).cloned().collect()));
    }

    #[test]
    fn prop_copy_is_independent(pairs in pairs_strategy(), drop_at in 0..NODES) {
        let f = fixture();
        let original = f.build(&pairs);
        let before = pair_set(&original);
        let weights: Vec<f64> = original.connections().map(|c| c.weight()).collect();

        let mut copy = original.try_clone().unwrap();
        prop_assert_eq!(pair_set(&copy), before.clone());
        copy.drop_connection_for_node(f.a[drop_at]);
        copy.set_weight_of_all(42.0);

        prop_assert_eq!(pair_set(&original), before);
        let after: Vec<f64> = original.connections().map(|c| c.weight()).collect();
        prop_assert_eq!(after, weights);
    }

    #[test]
    fn prop_unmatched_complements_matched(pairs in pairs_strategy()) {
        let f = fixture();
        let m = f.build(&pairs);

        let unmatched = m.unmatched_in(f.doc_a.root());
        let mut all = f.doc_a.preorder();
        m.remove_matched_from(&mut all);
        prop_assert_eq!(unmatched, all);
    }
}
