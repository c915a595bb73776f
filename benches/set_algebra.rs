//! Benchmarks for matching construction and set algebra.
//!
//! Run with: `cargo bench --bench set_algebra`
//!
//! `sym_diff` runs two set differences plus a union, so it is expected to
//! cost roughly three times `set_diff` on the same input.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use docmatch::{
    ConnectionManager, Connector, DocumentBuilder, IdConnector, InMemoryDocument, NodeId,
};

/// Build a document with `n` species, each carrying id `s{i}`.
fn make_document(n: usize) -> (Arc<InMemoryDocument>, Vec<NodeId>) {
    let mut builder = DocumentBuilder::new("sbml");
    let model = builder.add_element(builder.root(), "model").unwrap();
    let list = builder.add_element(model, "listOfSpecies").unwrap();

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let species = builder.add_element(list, "species").unwrap();
        builder.set_attribute(species, "id", format!("s{}", i)).unwrap();
        nodes.push(species);
    }
    (Arc::new(builder.build()), nodes)
}

/// Id matching over the whole document pair.
fn bench_id_connector(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_connector");

    for size in [100, 1_000, 10_000] {
        let (doc_a, _) = make_document(size);
        let (doc_b, _) = make_document(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut m = ConnectionManager::new(Arc::clone(&doc_a), Arc::clone(&doc_b));
                black_box(IdConnector::default().connect(&mut m).unwrap())
            })
        });
    }

    group.finish();
}

/// Two half-overlapping matchings: even species in one, the first half in the other.
fn make_managers(size: usize) -> (ConnectionManager<InMemoryDocument>, ConnectionManager<InMemoryDocument>) {
    let (doc_a, a) = make_document(size);
    let (doc_b, b) = make_document(size);

    let mut m1 = ConnectionManager::new(Arc::clone(&doc_a), Arc::clone(&doc_b));
    let mut m2 = ConnectionManager::new(doc_a, doc_b);
    for i in 0..size {
        if i % 2 == 0 {
            m1.add_connection(docmatch::Connection::new(a[i], b[i])).unwrap();
        }
        if i < size / 2 {
            m2.add_connection(docmatch::Connection::new(a[i], b[i])).unwrap();
        }
    }
    (m1, m2)
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_algebra");

    for size in [1_000, 10_000] {
        let (m1, m2) = make_managers(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("union", size), &size, |b, _| {
            b.iter(|| black_box(m1.union(&m2).unwrap().len()))
        });
        group.bench_with_input(BenchmarkId::new("intersection", size), &size, |b, _| {
            b.iter(|| black_box(m1.intersection(&m2).unwrap().len()))
        });
        group.bench_with_input(BenchmarkId::new("set_diff", size), &size, |b, _| {
            b.iter(|| black_box(m1.set_diff(&m2).unwrap().len()))
        });
        group.bench_with_input(BenchmarkId::new("sym_diff", size), &size, |b, _| {
            b.iter(|| black_box(m1.sym_diff(&m2).unwrap().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_id_connector, bench_set_algebra);
criterion_main!(benches);
