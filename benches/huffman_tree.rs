use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huffman_text::{FrequencyTable, HuffmanTree};
use rand::Rng;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    // wide alphabet so the queue and the traversal dominate
    let random_input: String = (0..8192)
        .map(|_| char::from_u32(rng.gen_range(0x20..0x800)).unwrap_or('?'))
        .collect();
    let frequencies = FrequencyTable::from_text(&random_input).unwrap();

    c.bench_function("tree build", |b| {
        b.iter(|| HuffmanTree::from_frequencies(black_box(&frequencies)))
    });

    let tree = HuffmanTree::from_frequencies(&frequencies);
    c.bench_function("code tables", |b| b.iter(|| black_box(&tree).code_tables()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
