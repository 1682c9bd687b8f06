use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use blobs::{compute_central_moments, render, Blobs, ColorFormat, Image, ImageDesc, RenderOptions};

const SIZE: u32 = 1024;

/// Grid of 32x32 squares separated by background, one label per square.
fn grid_labels() -> Image {
    let mut data = vec![0u32; (SIZE * SIZE) as usize];
    for y in 0..SIZE {
        for x in 0..SIZE {
            if x % 40 < 32 && y % 40 < 32 {
                data[(y * SIZE + x) as usize] = 1 + (y / 40) * (SIZE / 40 + 1) + x / 40;
            }
        }
    }
    Image::from_labels(SIZE, SIZE, data).expect("valid label image")
}

fn bench_central_moments(c: &mut Criterion) {
    let labels = grid_labels();
    let blobs = Blobs::from_label_image(&labels).expect("L_U32 label image");

    c.bench_function("central_moments", |b| {
        b.iter(|| {
            let mut blobs = blobs.clone();
            for blob in blobs.iter_mut() {
                black_box(compute_central_moments(blob, &labels).expect("in bounds"));
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let labels = grid_labels();
    let blobs = Blobs::from_label_image(&labels).expect("L_U32 label image");
    let desc = ImageDesc::new(SIZE, SIZE, ColorFormat::RGB_U8);
    let source = Image::new_empty(desc);
    let options = RenderOptions::default().with_alpha(0.5);

    c.bench_function("render_all_overlays", |b| {
        b.iter(|| {
            let mut blobs = blobs.clone();
            let mut dest = source.clone();
            render(&labels, &mut blobs, &source, &mut dest, &options).expect("valid inputs");
            black_box(dest);
        })
    });
}

criterion_group!(benches, bench_central_moments, bench_render);
criterion_main!(benches);
