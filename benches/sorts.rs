use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use sort_timings::{sorts::Algorithm, ticket};

fn sort_tickets(c: &mut Criterion) {
    let mut group = c.benchmark_group("lottery tickets");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [100usize, 500, 1000] {
        let tickets = ticket::generate(size, &mut rng);
        for algorithm in Algorithm::ALL {
            group.bench_with_input(BenchmarkId::new(algorithm.name(), size), &tickets, |b, tickets| {
                b.iter(|| {
                    let mut data = tickets.clone();
                    algorithm.sort(black_box(&mut data));
                    data
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, sort_tickets);
criterion_main!(benches);
