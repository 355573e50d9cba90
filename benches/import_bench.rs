//! Import and transform throughput.
//!
//! Run with `cargo bench --bench import_bench`.

use std::fmt::Write;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use cinder::assets::{MemoryFileReader, ObjImport, parse_obj};
use cinder::math::{self, Vec3f};
use cinder::resources::texture::checkerboard_pixels;
use cinder::{HeadlessBackend, Material, ShaderProgram};

/// `n` x `n` quad grid with texture coordinates, as OBJ text.
fn grid_obj(n: usize) -> String {
    let mut src = String::new();
    for y in 0..=n {
        for x in 0..=n {
            let _ = writeln!(src, "v {x} {y} 0");
            let _ = writeln!(src, "vt {} {}", x as f32 / n as f32, y as f32 / n as f32);
        }
    }

    let row = n + 1;
    for y in 0..n {
        for x in 0..n {
            let a = y * row + x + 1;
            let (b, c, d) = (a + 1, a + row + 1, a + row);
            let _ = writeln!(src, "f {a}/{a} {b}/{b} {c}/{c} {d}/{d}");
        }
    }
    src
}

fn bench_parse(c: &mut Criterion) {
    let reader = MemoryFileReader::new().with_file("grid.obj", grid_obj(128));

    c.bench_function("parse_obj 128x128 grid", |b| {
        b.iter(|| parse_obj(black_box("grid.obj"), &reader));
    });
}

fn bench_import(c: &mut Criterion) {
    let reader = MemoryFileReader::new().with_file("grid.obj", grid_obj(64));
    let decoder = cinder::assets::ImageCrateDecoder;

    c.bench_function("import 64x64 grid (headless)", |b| {
        b.iter(|| {
            let mut gpu = HeadlessBackend::new();
            let Ok(shader) = ShaderProgram::embedded_default(&mut gpu) else {
                return;
            };
            let fallback = Material::new(shader.clone());
            let model = ObjImport {
                gpu: &mut gpu,
                reader: &reader,
                decoder: &decoder,
                shader: &shader,
                fallback,
            }
            .load("grid.obj");
            let _ = black_box(model);
        });
    });
}

fn bench_math(c: &mut Criterion) {
    c.bench_function("model_matrix", |b| {
        b.iter(|| {
            math::model_matrix(
                black_box(Vec3f::new(1.0, 2.0, 3.0)),
                black_box(Vec3f::splat(2.0)),
                black_box(Vec3f::new(0.1, 0.2, 0.3)),
            )
        });
    });

    c.bench_function("checkerboard_pixels", |b| b.iter(checkerboard_pixels));
}

criterion_group!(benches, bench_parse, bench_import, bench_math);
criterion_main!(benches);
