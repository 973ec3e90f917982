use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symb_bridge::{ExpressionAdapter, MatrixManager, NativeEngine, parse};

// ==============================================================================
// Adapter Benchmarks: parse, operate, render
// ==============================================================================

// Benchmark parsing separately
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("parse_poly_x^3+2x^2+x", |b| {
        b.iter(|| parse(black_box("x^3 + 2*x^2 + x")))
    });

    group.bench_function("parse_implicit_2x(x+1)", |b| {
        b.iter(|| parse(black_box("2x(x + 1)")))
    });

    group.bench_function("parse_nested_sin(cos(tan(x)))", |b| {
        b.iter(|| parse(black_box("sin(cos(tan(x)))")))
    });

    group.finish();
}

// Full string-in, string-out round trips
fn bench_adapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapter");
    let adapter = ExpressionAdapter::new(NativeEngine::default());

    group.bench_function("expand_(x+y)^6", |b| {
        b.iter(|| adapter.expand(black_box(Some("(x + y)^6"))))
    });

    group.bench_function("differentiate_x^2*sin(x)*exp(x)", |b| {
        b.iter(|| adapter.differentiate(black_box(Some("x^2 * sin(x) * exp(x)")), Some("x")))
    });

    group.bench_function("solve_cubic", |b| {
        b.iter(|| adapter.solve(black_box(Some("x^3 - 6x^2 + 11x - 6")), Some("x")))
    });

    group.bench_function("evaluate_numeric", |b| {
        b.iter(|| adapter.evaluate(black_box(Some("sqrt(2) * pi / 3"))))
    });

    group.bench_function("fibonacci_1000", |b| {
        b.iter(|| adapter.fibonacci(black_box(1000)))
    });

    group.finish();
}

fn bench_matrices(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrices");
    let matrices = MatrixManager::new(NativeEngine::default());

    let numeric = matrices.create(4, 4).unwrap();
    let symbolic = matrices.create(3, 3).unwrap();
    for row in 0..4 {
        for col in 0..4 {
            let value = ((row * 7 + col * 3) % 11 + 1).to_string();
            matrices.set_element(numeric, row, col, Some(&value)).unwrap();
            if row < 3 && col < 3 {
                let name = format!("a{row}{col}");
                matrices.set_element(symbolic, row, col, Some(&name)).unwrap();
            }
        }
    }

    group.bench_function("det_numeric_4x4", |b| b.iter(|| matrices.det(black_box(numeric))));

    group.bench_function("det_symbolic_3x3", |b| b.iter(|| matrices.det(black_box(symbolic))));

    group.bench_function("inv_numeric_4x4", |b| {
        b.iter(|| {
            if let Ok(h) = matrices.inv(black_box(numeric)) {
                matrices.free(h);
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_adapter, bench_matrices);
criterion_main!(benches);
