use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pixel_loop::Framebuffer;

fn bench_fill_solid(c: &mut Criterion) {
    let mut framebuffer = Framebuffer::new(426, 240).expect("dimensions");

    c.bench_function("fill_solid", |b| {
        b.iter(|| framebuffer.fill(black_box(0x00FF8040)))
    });
}

fn bench_fill_gradient(c: &mut Criterion) {
    let mut framebuffer = Framebuffer::new(426, 240).expect("dimensions");

    c.bench_function("fill_gradient", |b| {
        b.iter(|| {
            framebuffer.fill_with(|x, y| {
                black_box((x.wrapping_mul(31) ^ y.wrapping_mul(17)) & 0x00FFFFFF)
            })
        })
    });
}

fn bench_single_pixel_writes(c: &mut Criterion) {
    let mut framebuffer = Framebuffer::new(426, 240).expect("dimensions");

    c.bench_function("set_row", |b| {
        b.iter(|| {
            for x in 0..426 {
                framebuffer.set(black_box(x), 120, 0x123456).expect("in bounds");
            }
        })
    });
}

criterion_group!(
    benches,
    bench_fill_solid,
    bench_fill_gradient,
    bench_single_pixel_writes
);
criterion_main!(benches);
