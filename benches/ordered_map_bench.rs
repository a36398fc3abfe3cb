use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ordered_map::OrderedMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (OrderedMap<String, u64>, Vec<String>) {
    let mut m = OrderedMap::with_capacity(n);
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        let _ = m.push_back(k.clone(), i as u64).unwrap();
    }
    (m, keys)
}

// Precompute `count` pseudo-random indices below `n`.
fn picks(count: usize, n: usize) -> Vec<usize> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % n
        })
        .collect()
}

fn bench_push_back_100k(c: &mut Criterion) {
    c.bench_function("ordered::push_back_100k", |b| {
        b.iter_batched(
            OrderedMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.push_back(key(x), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("ordered::get_hit_10k_on_100k", |b| {
        let (m, keys) = filled(7, 100_000);
        let queries: Vec<&String> = picks(10_000, keys.len())
            .into_iter()
            .map(|i| &keys[i])
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k.as_str()).ok());
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("ordered::get_miss_10k_on_100k", |b| {
        let (m, _keys) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(m.contains_key(k.as_str()));
            }
        })
    });
}

fn bench_index_access_10k(c: &mut Criterion) {
    c.bench_function("ordered::index_access_10k_on_100k", |b| {
        let (m, _keys) = filled(13, 100_000);
        let targets = picks(10_000, m.len());
        b.iter(|| {
            let mut sum = 0u64;
            for &i in &targets {
                sum = sum.wrapping_add(m[i]);
                black_box(m.key_at(i).ok());
            }
            black_box(sum)
        })
    });
}

// Removal renumbers the tail, so removing from the front is the worst case
// and removing from the back the best.
fn bench_remove(c: &mut Criterion) {
    c.bench_function("ordered::remove_front_1k_of_10k", |b| {
        b.iter_batched(
            || filled(17, 10_000).0,
            |mut m| {
                for _ in 0..1_000 {
                    let _ = m.remove_index(0).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("ordered::remove_back_1k_of_10k", |b| {
        b.iter_batched(
            || filled(19, 10_000).0,
            |mut m| {
                for _ in 0..1_000 {
                    let last = m.len() - 1;
                    let _ = m.remove_index(last).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("ordered::remove_by_key_1k_of_10k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(23, 10_000);
                let mut chosen: Vec<String> =
                    picks(1_000, keys.len()).into_iter().map(|i| keys[i].clone()).collect();
                chosen.sort();
                chosen.dedup();
                (m, chosen)
            },
            |(mut m, chosen)| {
                for k in &chosen {
                    let _ = m.remove(k.as_str()).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_rename_10k(c: &mut Criterion) {
    c.bench_function("ordered::rename_index_10k_on_100k", |b| {
        b.iter_batched(
            || {
                let (m, _keys) = filled(29, 100_000);
                let mut s = 0u64;
                let renames: Vec<(usize, String)> = picks(10_000, m.len())
                    .into_iter()
                    .map(|i| {
                        s += 1;
                        (i, format!("renamed{:08}", s))
                    })
                    .collect();
                (m, renames)
            },
            |(mut m, renames)| {
                for (i, k) in renames {
                    let _ = m.rename_index(i, k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_and_iter_mut(c: &mut Criterion) {
    c.bench_function("ordered::iter_all_100k", |b| {
        let (m, _keys) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("ordered::iter_mut_increment_all_100k", |b| {
        b.iter_batched(
            || filled(1001, 100_000).0,
            |mut m| {
                for v in m.values_mut() {
                    *v = v.wrapping_add(1);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_push_back_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_get_hit_10k,
              bench_get_miss_10k,
              bench_index_access_10k,
              bench_remove,
              bench_rename_10k,
              bench_iter_and_iter_mut
}
criterion_main!(benches_insert, benches_ops);
