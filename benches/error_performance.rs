// benches/error_performance.rs
//! Benchmarks for scalamed_errors hot paths.
//!
//! Covers construction, template formatting, rendering of nested payloads and
//! structured log output.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scalamed_errors::{
    AppError, ConnectionType, Detail, RenderOptions, TemplateValue, catalog, format_template,
    template_values,
};

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    group.bench_function("operation_static_strs", |b| {
        b.iter(|| black_box(AppError::operation("PatientStore", "save")))
    });

    group.bench_function("connection_with_details", |b| {
        b.iter(|| {
            black_box(
                AppError::connection(ConnectionType::Database, "orders-primary")
                    .with_details("connect timed out"),
            )
        })
    });

    group.bench_function("service_scalar_values", |b| {
        b.iter(|| {
            black_box(AppError::service(
                &catalog::RX_CANCEL_FAILED,
                template_values! { "details" => "RX-1001" },
            ))
        })
    });

    group.bench_function("service_by_key", |b| {
        b.iter(|| black_box(AppError::service_by_key("invalidLogin", template_values! {})))
    });

    group.finish();
}

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");
    let template = catalog::RECORD_DOES_NOT_EXIST.message();

    group.bench_function("no_values", |b| {
        let values = template_values! {};
        b.iter(|| black_box(format_template(black_box(template), &values)))
    });

    group.bench_function("scalar_value", |b| {
        let values = template_values! { "context" => "Patient" };
        b.iter(|| black_box(format_template(black_box(template), &values)))
    });

    group.bench_function("lazy_value", |b| {
        let values = template_values! {
            "context" => TemplateValue::lazy(|| "Patient".to_string()),
        };
        b.iter(|| black_box(format_template(black_box(template), &values)))
    });

    group.finish();
}

fn nested(depth: usize) -> AppError {
    let mut err = AppError::connection(ConnectionType::Cache, "redis-1");
    for level in 0..depth {
        err = AppError::operation("Layer", format!("step{}", level)).with_details(err);
    }
    err
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = RenderOptions::default();

    for depth in [1usize, 4, 16] {
        let err = nested(depth);
        group.bench_with_input(BenchmarkId::new("nested", depth), &err, |b, err| {
            b.iter(|| black_box(err.render(&options)))
        });
    }

    for width in [2usize, 8, 32] {
        let err = AppError::api_call("pharmacy-gateway", "POST /orders").with_details(
            (0..width).map(|i| Detail::from(format!("item {}", i))).collect::<Vec<_>>(),
        );
        group.bench_with_input(BenchmarkId::new("sequence", width), &err, |b, err| {
            b.iter(|| black_box(err.render(&options)))
        });
    }

    let err = AppError::operation("Billing", "charge")
        .with_details("declined")
        .with_debug_info("card=4111");
    group.bench_function("with_debug_and_colors", |b| {
        let options = RenderOptions::default().with_debug_info().with_colors();
        b.iter(|| black_box(err.render(&options)))
    });

    group.finish();
}

fn bench_logging(c: &mut Criterion) {
    let err = AppError::service(
        &catalog::OPERATION_FAILED,
        template_values! { "operation" => "sync" },
    )
    .with_details("x".repeat(4096));
    let options = RenderOptions::default();

    c.bench_function("log_write_to_truncated", |b| {
        b.iter(|| {
            let mut line = String::with_capacity(2048);
            err.with_log(&options, |log| log.write_to(&mut line)).ok();
            black_box(line)
        })
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_templates,
    bench_rendering,
    bench_logging
);
criterion_main!(benches);
