use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use framering::{new_pool, Config};
use std::thread;

const FRAMES: u64 = 200_000;
const FRAME_SIZE: usize = 4096;

fn bench_single_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_reader");
    group.throughput(Throughput::Elements(FRAMES));

    group.bench_function("publish_then_borrow", |b| {
        b.iter(|| {
            let (sender, receiver) = new_pool(Config::new(FRAME_SIZE, false));
            let frame = vec![0xABu8; FRAME_SIZE];

            let writer = thread::spawn(move || {
                for ts in 0..FRAMES {
                    sender.publish(&frame, ts).unwrap();
                }
            });

            let mut last_seen = 0u64;
            while last_seen < FRAMES - 1 {
                if let Ok(view) = receiver.borrow() {
                    last_seen = view.timestamp();
                    black_box(view.data());
                } else {
                    std::hint::spin_loop();
                }
            }

            writer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");

    for num_receivers in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements(FRAMES));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_receivers", num_receivers)),
            num_receivers,
            |b, &n| {
                b.iter(|| {
                    let (sender, root) = new_pool(Config::new(FRAME_SIZE, false));
                    let mut receivers = vec![root];
                    for _ in 1..n {
                        receivers.push(receivers[0].try_clone().unwrap());
                    }

                    let frame = vec![0xCDu8; FRAME_SIZE];
                    let writer = thread::spawn(move || {
                        for ts in 0..FRAMES {
                            sender.publish(&frame, ts).unwrap();
                        }
                    });

                    let readers: Vec<_> = receivers
                        .into_iter()
                        .map(|r| {
                            thread::spawn(move || {
                                let mut last_seen = 0u64;
                                while last_seen < FRAMES - 1 {
                                    if let Ok(view) = r.borrow() {
                                        last_seen = view.timestamp();
                                        black_box(view.data());
                                    } else {
                                        std::hint::spin_loop();
                                    }
                                }
                            })
                        })
                        .collect();

                    writer.join().unwrap();
                    for reader in readers {
                        reader.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_reader, bench_fanout);
criterion_main!(benches);
