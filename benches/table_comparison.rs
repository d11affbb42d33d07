use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robin_table::AnyHasher;
use robin_table::HasherKind;
use robin_table::Table;

const SIZES: &[usize] = &[(1 << 10), (1 << 12), (1 << 14), (1 << 16), (1 << 18)];

fn keys(count: usize) -> Vec<String> {
    let mut rng = SmallRng::from_os_rng();
    (0..count)
        .map(|_| format!("key_{:016X}", rng.random::<u64>()))
        .collect()
}

fn filled_table(kind: HasherKind, keys: &[String]) -> Table<u64, AnyHasher> {
    let mut table = Table::with_kind(kind).unwrap();
    for (i, key) in keys.iter().enumerate() {
        table.add(key, i as u64);
    }
    table
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        for &kind in HasherKind::ALL {
            let hasher = AnyHasher::new(kind).unwrap();
            group.bench_function(format!("robin_table/{kind}/{size}"), |b| {
                b.iter_batched(
                    || Table::<u64, AnyHasher>::new(hasher),
                    |mut table| {
                        for (i, key) in keys.iter().enumerate() {
                            table.add(key, i as u64);
                        }
                        table
                    },
                    BatchSize::LargeInput,
                )
            });
        }

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                HashbrownMap::<&str, u64>::new,
                |mut map| {
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.as_str(), i as u64);
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        for &kind in HasherKind::ALL {
            let table = filled_table(kind, &keys);
            group.bench_function(format!("robin_table/{kind}/{size}"), |b| {
                b.iter(|| {
                    for key in &keys {
                        black_box(table.get(key));
                    }
                })
            });
        }

        let map = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i as u64))
            .collect::<HashbrownMap<_, _>>();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.get(key.as_str()));
                }
            })
        });
    }

    group.finish();
}

fn bench_fold32(c: &mut Criterion) {
    use robin_table::KeyHasher;

    let mut group = c.benchmark_group("fold32");
    let keys = keys(1 << 10);
    group.throughput(Throughput::Elements(keys.len() as u64));

    for &kind in HasherKind::ALL {
        let hasher = AnyHasher::new(kind).unwrap();
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                for key in &keys {
                    black_box(hasher.fold32(key.as_bytes()));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_get, bench_fold32);
criterion_main!(benches);
