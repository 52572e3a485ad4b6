use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeSet;
use treap_set::TreapSet;

const NUM_OF_OPERATIONS: usize = 100;

fn keys(seed: u32) -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([seed, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let values = keys(1);
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &values {
                set.insert(*key);
            }
        })
    });
}

fn bench_treapset_insert(c: &mut Criterion) {
    let values = keys(1);
    c.bench_function("bench treapset insert", move |b| {
        b.iter(|| {
            let mut set = TreapSet::new();
            for key in &values {
                set.insert(*key);
            }
        })
    });
}

fn bench_btreeset_contains(c: &mut Criterion) {
    let values = keys(1);
    let missing = keys(2);
    let set = values.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset contains", move |b| {
        b.iter(|| {
            for key in values.iter().chain(missing.iter()) {
                black_box(set.contains(key));
            }
        })
    });
}

fn bench_treapset_contains(c: &mut Criterion) {
    let values = keys(1);
    let missing = keys(2);
    let set = values.iter().cloned().collect::<TreapSet<u32>>();
    c.bench_function("bench treapset contains", move |b| {
        b.iter(|| {
            for key in values.iter().chain(missing.iter()) {
                black_box(set.contains(key));
            }
        })
    });
}

fn bench_btreeset_remove(c: &mut Criterion) {
    let values = keys(1);
    c.bench_function("bench btreeset remove", move |b| {
        b.iter(|| {
            let mut set = values.iter().cloned().collect::<BTreeSet<u32>>();
            for key in &values {
                set.remove(key);
            }
        })
    });
}

fn bench_treapset_remove(c: &mut Criterion) {
    let values = keys(1);
    c.bench_function("bench treapset remove", move |b| {
        b.iter(|| {
            let mut set = values.iter().cloned().collect::<TreapSet<u32>>();
            for key in &values {
                set.remove(key);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_treapset_insert,
    bench_btreeset_contains,
    bench_treapset_contains,
    bench_btreeset_remove,
    bench_treapset_remove
);
criterion_main!(benches);
