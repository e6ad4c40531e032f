use criterion::{black_box, criterion_group, criterion_main, BatchSize, Bencher, Criterion};
use leftist_heap::leftist_heap::LeftistHeap;
use leftist_heap::util::Key;

const KEYS: [Key; 16] = [1, 3, 5, -2, 6, -7, 9, 10, 13, 4, 12, 115, 500, 132, 67, 334];

fn build_heap(size: Key, offset: Key) -> LeftistHeap {
    (0..size).map(|key| (key * 7919 + offset) % 10007).collect()
}

fn is_empty_benchmark(b: &mut Bencher) {
    let mut heap = LeftistHeap::new();
    heap.insert(black_box(1));
    b.iter(|| heap.is_empty());
}

fn insert_benchmark(b: &mut Bencher) {
    b.iter_batched(
        LeftistHeap::new,
        |mut heap| KEYS.iter().for_each(|key| heap.insert(black_box(*key))),
        BatchSize::SmallInput,
    );
}

fn peek_min_benchmark(b: &mut Bencher) {
    let heap = LeftistHeap::from_keys(&KEYS);
    b.iter(|| {
        let _ = heap.peek_min();
    });
}

fn extract_min_benchmark(b: &mut Bencher) {
    b.iter_batched(
        || LeftistHeap::from_keys(&KEYS),
        |mut heap| {
            for _ in 0..KEYS.len() {
                let _ = heap.extract_min();
            }
        },
        BatchSize::SmallInput,
    );
}

fn merge_with_benchmark(b: &mut Bencher) {
    b.iter_batched(
        || (build_heap(10000, 0), build_heap(10000, 1)),
        |(mut heap_a, mut heap_b)| {
            heap_a.merge_with(&mut heap_b);
            (heap_a, heap_b)
        },
        BatchSize::LargeInput,
    );
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("LeftistHeap.is_empty", is_empty_benchmark);
    c.bench_function("LeftistHeap.insert", insert_benchmark);
    c.bench_function("LeftistHeap.peek_min", peek_min_benchmark);
    c.bench_function("LeftistHeap.extract_min", extract_min_benchmark);
    c.bench_function("LeftistHeap.merge_with", merge_with_benchmark);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
