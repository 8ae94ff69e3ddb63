//! Benchmarks for validation and propagation over random graphs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use got_reason::graph::traverse::find_cycles;
use got_reason::graph::{Edge, Graph};
use got_reason::node::{Node, NodeId, NodeType};
use got_reason::propagate::PropagationService;
use got_reason::relation::RelationType;
use got_reason::validate::Validator;

fn random_graph(nodes: usize, edges: usize) -> Graph {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let mut g = Graph::new();
    for i in 0..nodes {
        let node = Node::with_id(format!("n{i}"), format!("concept {i}"), NodeType::Concept);
        g.add_node(node.unwrap()).unwrap();
    }
    for _ in 0..edges {
        let s = rng.gen_range(0..nodes);
        let t = rng.gen_range(0..nodes);
        let relation = RelationType::ALL[rng.gen_range(0..RelationType::ALL.len())];
        if let Ok(edge) = Edge::new(format!("n{s}"), format!("n{t}"), relation) {
            let _ = g.add_edge(edge);
        }
    }
    g
}

fn bench_validate(c: &mut Criterion) {
    let graph = random_graph(1_000, 4_000);
    let validator = Validator::new();

    c.bench_function("validate_1k_nodes", |bench| {
        bench.iter(|| black_box(validator.validate(&graph)))
    });
}

fn bench_find_cycles(c: &mut Criterion) {
    let graph = random_graph(5_000, 20_000);

    c.bench_function("find_cycles_causal_5k", |bench| {
        bench.iter(|| black_box(find_cycles(&graph, RelationType::is_causal)))
    });
}

fn bench_propagate(c: &mut Criterion) {
    let graph = random_graph(1_000, 4_000);
    let seeds: Vec<NodeId> = (0..10).map(|i| NodeId::new(format!("n{i}"))).collect();
    let service = PropagationService::new();

    c.bench_function("propagate_all_1k_nodes", |bench| {
        bench.iter(|| {
            let mut g = graph.clone();
            service.propagate_all(&mut g, &seeds);
            black_box(g.node_count())
        })
    });
}

criterion_group!(benches, bench_validate, bench_find_cycles, bench_propagate);
criterion_main!(benches);
