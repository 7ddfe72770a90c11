//! 工具函数性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shortlinks::utils::url_validator::validate_url;
use shortlinks::utils::{extract_code, generate_random_code};

// ============== extract_code 基准测试 ==============

fn bench_extract_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/extract_code");

    group.bench_function("bare_code", |b| {
        b.iter(|| {
            assert_eq!(extract_code("AbC1234").unwrap(), "AbC1234");
        });
    });

    group.bench_function("full_url", |b| {
        b.iter(|| {
            assert_eq!(extract_code("https://clck.ru/AbC1234").unwrap(), "AbC1234");
        });
    });

    group.bench_function("url_with_query_and_fragment", |b| {
        b.iter(|| {
            assert_eq!(
                extract_code("https://clck.ru/AbC1234?utm=x#top").unwrap(),
                "AbC1234"
            );
        });
    });

    group.bench_function("invalid_blank", |b| {
        b.iter(|| {
            assert!(extract_code("   ").is_err());
        });
    });

    group.finish();
}

// ============== generate_random_code 基准测试 ==============

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for length in [6, 7, 12, 20] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let code = generate_random_code(length).unwrap();
                assert_eq!(code.len(), length);
            });
        });
    }

    group.finish();
}

// ============== validate_url 基准测试 ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("valid_https", |b| {
        b.iter(|| {
            assert!(validate_url("https://example.com/path?query=1").is_ok());
        });
    });

    group.bench_function("invalid_no_host", |b| {
        b.iter(|| {
            assert!(validate_url("mailto:someone@example.com").is_err());
        });
    });

    group.bench_function("invalid_empty", |b| {
        b.iter(|| {
            assert!(validate_url("").is_err());
        });
    });

    // 长 URL
    let long_url = format!("https://example.com/{}", "a".repeat(1000));
    group.bench_function("valid_long_url", |b| {
        b.iter(|| {
            assert!(validate_url(&long_url).is_ok());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_extract_code,
    bench_generate_random_code,
    bench_validate_url,
);
criterion_main!(benches);
