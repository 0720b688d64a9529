use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fsm_layout::config::TreeConfig;
use fsm_layout::ir::{FsmState, FsmStates, NodeId};
use fsm_layout::layout::build_rows;
use fsm_layout::{AlignConfig, BoundingBox, DependencyMap, auto_align, compute_tree_layout};
use indexmap::IndexMap;
use std::hint::black_box;

/// Root with `width` children per level, each child feeding the next level.
fn fanout_deps(levels: usize, width: usize) -> DependencyMap {
    let mut deps = DependencyMap::new();
    deps.insert(0, Vec::new());
    let mut previous: Vec<NodeId> = vec![0];
    let mut next_id: NodeId = 1;
    for _ in 0..levels {
        let mut level = Vec::with_capacity(width);
        for i in 0..width {
            let parent = previous[i % previous.len()];
            deps.insert(next_id, vec![parent]);
            level.push(next_id);
            next_id += 1;
        }
        previous = level;
    }
    deps
}

/// Layers where every node depends on two nodes of the layer above.
fn lattice_deps(levels: usize, width: usize) -> DependencyMap {
    let mut deps = DependencyMap::new();
    let id = |level: usize, col: usize| (level * width + col) as NodeId;
    for col in 0..width {
        deps.insert(id(0, col), Vec::new());
    }
    for level in 1..levels {
        for col in 0..width {
            let left = id(level - 1, col);
            let right = id(level - 1, (col + 1) % width);
            let above = if left == right { vec![left] } else { vec![left, right] };
            deps.insert(id(level, col), above);
        }
    }
    deps
}

/// States scattered around a loose grid so most of them need a nudge.
fn scattered_states(count: usize) -> (FsmStates, IndexMap<String, BoundingBox>) {
    let mut states = FsmStates::new();
    let mut boxes = IndexMap::new();
    for i in 0..count {
        let col = (i % 6) as f64;
        let row = (i / 6) as f64;
        let jitter = ((i * 37) % 23) as f64;
        let key = (i + 1).to_string();
        states.insert(
            key.clone(),
            FsmState::at(100.0 + col * 410.0 + jitter, 100.0 + row * 140.0 + jitter),
        );
        boxes.insert(key, BoundingBox::sized(300.0, 30.0 + (i % 3) as f64 * 20.0));
    }
    (states, boxes)
}

fn dependency_cases() -> Vec<(String, DependencyMap)> {
    vec![
        ("fanout_4x4".to_string(), fanout_deps(4, 4)),
        ("fanout_8x16".to_string(), fanout_deps(8, 16)),
        ("lattice_6x6".to_string(), lattice_deps(6, 6)),
        ("lattice_12x24".to_string(), lattice_deps(12, 24)),
    ]
}

fn bench_tree_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_layout");
    for (name, deps) in dependency_cases() {
        group.bench_with_input(BenchmarkId::from_parameter(&name), &deps, |b, deps| {
            b.iter(|| {
                let layout = compute_tree_layout(black_box(deps)).expect("layout failed");
                black_box(layout.len());
            });
        });
    }
    group.finish();
}

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows");
    let config = TreeConfig::default();
    for (name, deps) in dependency_cases() {
        let layout = compute_tree_layout(&deps).expect("layout failed");
        group.bench_with_input(BenchmarkId::from_parameter(&name), &layout, |b, layout| {
            b.iter(|| {
                let rows = build_rows(black_box(layout), &config);
                black_box(rows.placed.len());
            });
        });
    }
    group.finish();
}

fn bench_auto_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_align");
    let config = AlignConfig::default();
    for count in [8usize, 32, 96] {
        let (states, boxes) = scattered_states(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &states, |b, states| {
            b.iter(|| {
                let outcome = auto_align(black_box(states), &config, None, &boxes);
                black_box(outcome.grid.len());
            });
        });
    }
    group.finish();
}

fn bench_realign(c: &mut Criterion) {
    let mut group = c.benchmark_group("realign");
    let config = AlignConfig::default();
    for count in [32usize, 96] {
        let (states, boxes) = scattered_states(count);
        let first = auto_align(&states, &config, None, &boxes);
        let cells = first.grid.cells.clone();
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &first.aligned_states,
            |b, aligned| {
                b.iter(|| {
                    let outcome = auto_align(black_box(aligned), &config, Some(&cells), &boxes);
                    black_box(outcome.aligned_states.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_tree_layout, bench_rows, bench_auto_align, bench_realign
);
criterion_main!(benches);
