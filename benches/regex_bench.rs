// Criterion benchmark suite for runeregex.
//
// Run: cargo bench
// Specific group: cargo bench -- search
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use runeregex::regcomp::compile;
use runeregex::regdefs::RegexOptions;
use runeregex::regexec::{exec, exec_with_config, ExecConfig};
use runeregex::regint::Program;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn comp(pattern: &[u8]) -> Program {
    compile(pattern, RegexOptions::empty()).expect("compile failed")
}

fn haystack() -> Vec<u8> {
    let mut text = Vec::new();
    for i in 0..200 {
        text.extend_from_slice(format!("line {} of the benchmark text, ", i).as_bytes());
        text.extend_from_slice("with ünïcödé words and 日本語 here\n".as_bytes());
    }
    text.extend_from_slice(b"needle_at_the_end=42\n");
    text
}

// ---------------------------------------------------------------------------
// 1. compile -- measure compilation time
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let patterns: &[(&str, &[u8])] = &[
        ("literal", b"hello world"),
        ("dot_star", b"foo.*bar"),
        ("alternation", b"alpha|beta|gamma|delta"),
        ("char_class", b"[a-zA-Z0-9_]+"),
        ("quantifier", b"ab+c?d*"),
        ("group", b"(abc)+(def)*"),
        ("anchored", b"^[a-z]+=[0-9]+$"),
    ];

    let mut group = c.benchmark_group("compile");
    for (name, pat) in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pat, |b, pat| {
            b.iter(|| {
                let prog = comp(black_box(pat));
                black_box(&prog);
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. search -- whole-haystack searches
// ---------------------------------------------------------------------------

fn bench_search(c: &mut Criterion) {
    let text = haystack();
    let patterns: &[(&str, &[u8])] = &[
        ("literal_end", b"needle_at_the_end"),
        ("class_run", b"=[0-9]+"),
        ("alternation", b"gamma|needle|delta"),
        ("multibyte", "日本語".as_bytes()),
        ("anchored_line", b"^needle[a-z_]*=[0-9]+$"),
        ("no_match", b"zzz[0-9]"),
    ];

    let mut group = c.benchmark_group("search");
    for (name, pat) in patterns {
        let prog = comp(pat);
        group.bench_function(*name, |b| {
            b.iter(|| black_box(exec(&prog, black_box(&text)).unwrap()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. captures -- group tracking cost
// ---------------------------------------------------------------------------

fn bench_captures(c: &mut Criterion) {
    let subject = b"key_one=value_one; key_two=value_two";
    let mut group = c.benchmark_group("captures");

    let flat = comp(b"[a-z_]+=[a-z_]+");
    group.bench_function("no_groups", |b| {
        b.iter(|| black_box(exec(&flat, black_box(subject)).unwrap()));
    });

    let grouped = comp(b"([a-z_]+)=([a-z_]+)");
    group.bench_function("two_groups", |b| {
        b.iter(|| black_box(exec(&grouped, black_box(subject)).unwrap()));
    });

    let repeated = comp(b"(([a-z]+)_)+([a-z]+)");
    group.bench_function("repeated_group", |b| {
        b.iter(|| black_box(exec(&repeated, black_box(subject)).unwrap()));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. fallback -- cost of the overflow retry path
// ---------------------------------------------------------------------------

fn bench_fallback(c: &mut Criterion) {
    let prog = comp(b"(a|b|c|d)*(e|f)?x");
    let subject = b"abcdabcdabcdabcdabcdfx";
    let tiny = ExecConfig {
        list_size: 1,
        ..ExecConfig::default()
    };

    let mut group = c.benchmark_group("fallback");
    group.bench_function("default", |b| {
        b.iter(|| black_box(exec(&prog, black_box(subject)).unwrap()));
    });
    group.bench_function("forced_retry", |b| {
        b.iter(|| black_box(exec_with_config(&prog, black_box(subject), &tiny).unwrap()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_search,
    bench_captures,
    bench_fallback
);
criterion_main!(benches);
