//! Benchmarks for matcher derivations.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use querygram_grammar::{Dictionary, MatchOptions, Matcher, tokenize};

/// Dictionary of `size` keys, one to four tokens long.
fn generate_dict(size: usize) -> Dictionary {
    (0..size)
        .map(|i| {
            let words = (0..=i % 4)
                .map(|j| format!("w{}", (i + j) % size))
                .collect::<Vec<_>>();
            (words.join(" "), vec![i as u64])
        })
        .collect()
}

fn generate_query(len: usize, size: usize) -> Vec<String> {
    (0..len).map(|i| format!("w{}", (i * 7) % size)).collect()
}

fn bench_dict_needle(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_needle");

    for size in [100, 1000, 10000].iter() {
        let dict = generate_dict(*size);
        let query = generate_query(16, *size);
        let unbounded = Matcher::full_text(vec![
            Matcher::dict(dict.clone(), 1, MatchOptions::new()),
            Matcher::words(query.clone(), MatchOptions::new()),
        ]);
        let bounded = Matcher::full_text(vec![
            Matcher::dict(dict, 1, MatchOptions::new().with_calculate_needle_length()),
            Matcher::words(query.clone(), MatchOptions::new()),
        ]);

        group.bench_with_input(BenchmarkId::new("full_length", size), size, |b, _| {
            b.iter(|| black_box(unbounded.derive(query.clone())));
        });
        group.bench_with_input(BenchmarkId::new("bounded", size), size, |b, _| {
            b.iter(|| black_box(bounded.derive(query.clone())));
        });
    }

    group.finish();
}

fn bench_any_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("any_order_dict");

    for len in [4, 16, 64].iter() {
        let dict = generate_dict(1000);
        let matcher = Matcher::any_order_dict(dict, 1, MatchOptions::new());
        let query = generate_query(*len, 1000);

        group.bench_with_input(BenchmarkId::new("query_len", len), len, |b, _| {
            b.iter(|| black_box(matcher.derive(query.clone())));
        });
    }

    group.finish();
}

fn bench_realty_query(c: &mut Criterion) {
    let rooms: Dictionary = [
        ("1к".to_string(), vec![1]),
        ("2к".to_string(), vec![2]),
        ("2 или 3 комнатная".to_string(), vec![2, 3]),
    ]
    .into();
    let single = |key: &str, attr: u64| {
        Matcher::any_order_dict([(key.to_string(), vec![attr])].into(), attr, MatchOptions::new())
    };
    let rent = Matcher::try_all(vec![single("снять", 1), single("посуточно", 2)]);
    let root = Matcher::full_text(vec![
        Matcher::once(rent),
        Matcher::once(Matcher::any_order_dict(rooms, 10, MatchOptions::new())),
        Matcher::words(["квартиру", "у моря"], MatchOptions::new()),
    ]);
    let query = tokenize(
        "снять 2 или 3 комнатная квартиру посуточно у моря",
    );

    c.bench_function("realty_query", |b| {
        b.iter(|| black_box(root.derive(query.clone())));
    });
}

criterion_group!(benches, bench_dict_needle, bench_any_order, bench_realty_query);
criterion_main!(benches);
