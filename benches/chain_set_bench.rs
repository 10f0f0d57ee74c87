use chain_set::{ChainSet, GrowthPolicy};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
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

fn filled(seed: u64, n: usize, policy: GrowthPolicy) -> (ChainSet<String>, Vec<String>) {
    let mut s = ChainSet::with_policy(policy);
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for k in &keys {
        s.insert(k.clone());
    }
    (s, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    for (name, policy) in [
        ("chain_set::insert_fresh_100k/load_0.75", GrowthPolicy::default()),
        ("chain_set::insert_fresh_100k/loose", GrowthPolicy::Loose),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
                    (ChainSet::<String>::with_policy(policy), keys)
                },
                |(mut s, keys)| {
                    for k in keys {
                        s.insert(k);
                    }
                    black_box(s)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_insert_warm_100k(c: &mut Criterion) {
    c.bench_function("chain_set::insert_after_erase_all_100k", |b| {
        b.iter_batched(
            || {
                // grow first, then empty it; capacity stays
                let (mut s, keys) = filled(2, 110_000, GrowthPolicy::default());
                for k in &keys {
                    s.erase(k);
                }
                let fresh: Vec<String> = lcg(3).take(100_000).map(key).collect();
                (s, fresh)
            },
            |(mut s, fresh)| {
                for k in fresh {
                    s.insert(k);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_erase_random_10k(c: &mut Criterion) {
    c.bench_function("chain_set::erase_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (s, keys) = filled(5, 110_000, GrowthPolicy::default());
                let n = keys.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut x = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    x = x.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((x as usize) % n);
                }
                let to_erase: Vec<String> = sel.into_iter().map(|i| keys[i].clone()).collect();
                (s, to_erase)
            },
            |(mut s, to_erase)| {
                for k in &to_erase {
                    black_box(s.erase(k));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    for (name, policy) in [
        ("chain_set::count_hit_10k_on_100k/load_0.75", GrowthPolicy::default()),
        ("chain_set::count_hit_10k_on_100k/loose", GrowthPolicy::Loose),
    ] {
        c.bench_function(name, |b| {
            let (s, keys) = filled(7, 100_000, policy);
            let n = keys.len();
            let mut x = 0x9e3779b97f4a7c15u64;
            let queries: Vec<String> = (0..10_000)
                .map(|_| {
                    x = x.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    keys[(x as usize) % n].clone()
                })
                .collect();
            b.iter(|| {
                for k in &queries {
                    black_box(s.count(k));
                }
            })
        });
    }
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("chain_set::find_miss_10k_on_100k", |b| {
        let (s, _) = filled(11, 100_000, GrowthPolicy::default());
        let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(s.find(k).is_end());
            }
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    c.bench_function("chain_set::iter_all_100k", |b| {
        let (s, _) = filled(999, 100_000, GrowthPolicy::default());
        b.iter(|| {
            let mut total = 0usize;
            for k in &s {
                total = total.wrapping_add(k.len());
            }
            black_box(total)
        })
    });

    c.bench_function("chain_set::cursor_walk_100k", |b| {
        let (s, _) = filled(1001, 100_000, GrowthPolicy::default());
        b.iter(|| {
            let mut n = 0usize;
            let mut cur = s.begin();
            while !cur.is_end() {
                n += 1;
                cur.advance();
            }
            black_box(n)
        })
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
    targets = bench_insert_fresh_100k, bench_insert_warm_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_erase_random_10k,
              bench_find_hit_10k,
              bench_find_miss_10k,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
