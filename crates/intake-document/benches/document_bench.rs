// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the intake-document rendering engine: a text upload
// at the truncation ceiling and a small synthetic image, both resolved from a
// temporary search root.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use intake_core::{RenderConfig, RenderRequest};
use intake_document::{RenderEngine, SearchPath};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Render a text file that just exceeds the default character ceiling, so
/// truncation, wrapping, and multi-page layout are all on the hot path.
fn bench_text_render(c: &mut Criterion) {
    let root = tempfile::tempdir().expect("tempdir");
    let text = "lorem ipsum dolor sit amet ".repeat(20_000);
    std::fs::write(root.path().join("big.txt"), &text).expect("write fixture");

    let engine = RenderEngine::new(RenderConfig::default(), SearchPath::new([root.path()]));
    let request = RenderRequest::new(1, "big.txt", "text/plain", text.len() as u64, "big.txt");

    c.bench_function("render text (540k chars)", |b| {
        b.iter(|| {
            let rendered = engine.render(black_box(&request)).expect("render");
            black_box(rendered.bytes.len());
        });
    });
}

/// Render a 256x256 PNG scaled onto a Letter page.
fn bench_image_render(c: &mut Criterion) {
    let root = tempfile::tempdir().expect("tempdir");
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_fn(256, 256, |x, y| {
        Rgb([x as u8, y as u8, 128])
    }))
    .write_to(&mut png, ImageFormat::Png)
    .expect("encode png");
    std::fs::write(root.path().join("gradient.png"), png.get_ref()).expect("write fixture");

    let engine = RenderEngine::new(RenderConfig::default(), SearchPath::new([root.path()]));
    let request = RenderRequest::new(
        2,
        "gradient.png",
        "image/png",
        png.get_ref().len() as u64,
        "gradient.png",
    );

    c.bench_function("render image (256x256)", |b| {
        b.iter(|| {
            let rendered = engine.render(black_box(&request)).expect("render");
            black_box(rendered.bytes.len());
        });
    });
}

criterion_group!(benches, bench_text_render, bench_image_render);
criterion_main!(benches);
