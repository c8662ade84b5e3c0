use criterion::{black_box, criterion_group, criterion_main, Criterion};

use service::pagination::page_items;

fn bench_page_items(c: &mut Criterion) {
    c.bench_function("pager_middle_window", |b| {
        b.iter(|| page_items(black_box(500), black_box(250)));
    });
    c.bench_function("pager_small_count", |b| {
        b.iter(|| page_items(black_box(5), black_box(3)));
    });
}

criterion_group!(benches, bench_page_items);
criterion_main!(benches);
