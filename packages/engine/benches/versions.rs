//! Benchmarks for applying parametrizations and enumerating versions.
//!
//! Run with: cargo bench --bench versions

use std::hint::black_box;

use arrete_engine::{
    apply, enumerate_versions, generate_versions, Condition, EntityReference,
    NonApplicationCondition, Parameter, ParameterValue, ParameterValues, Parametrization,
    VersionOptions,
};
use arrete_shared::{EnrichedString, StructuredText};
use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn document(articles: usize) -> StructuredText {
    let sections = (0..articles)
        .map(|i| {
            StructuredText::new(
                EnrichedString::new(format!("Article {}", i + 1)),
                vec![
                    EnrichedString::new("Premier alinéa."),
                    EnrichedString::new("Second alinéa."),
                ],
                vec![],
            )
        })
        .collect();
    StructuredText::new(EnrichedString::new("Arrêté"), vec![], sections)
}

/// One date cut per article, each on a distinct date so every cut adds a version.
fn parametrization(articles: usize) -> Parametrization {
    let date = Parameter::date("date-d-installation");
    let conditions = (0..articles)
        .filter_map(|i| {
            let year = 2000 + i32::try_from(i).ok()?;
            let target = NaiveDate::from_ymd_opt(year, 1, 1)?;
            Some(NonApplicationCondition::new(
                EntityReference::section(vec![i]),
                Condition::littler(date.clone(), target, true),
            ))
        })
        .collect();
    Parametrization::new(conditions, vec![]).expect("disjoint paths are consistent")
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for articles in [10, 50, 200] {
        let doc = document(articles);
        let parametrization = parametrization(articles.min(50));
        let mut values = ParameterValues::new();
        values.insert(
            Parameter::date("date-d-installation"),
            ParameterValue::Date(NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date")),
        );

        group.bench_with_input(BenchmarkId::from_parameter(articles), &doc, |b, doc| {
            b.iter(|| apply(black_box(doc), black_box(&parametrization), black_box(&values)))
        });
    }

    group.finish();
}

fn bench_versions(c: &mut Criterion) {
    let mut group = c.benchmark_group("versions");

    for articles in [5, 20, 50] {
        let doc = document(articles);
        let parametrization = parametrization(articles);

        group.bench_with_input(
            BenchmarkId::new("enumerate", articles),
            &parametrization,
            |b, parametrization| {
                b.iter(|| enumerate_versions(black_box(parametrization), VersionOptions::default()))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("generate", articles),
            &parametrization,
            |b, parametrization| {
                b.iter(|| {
                    generate_versions(
                        black_box(&doc),
                        black_box(parametrization),
                        VersionOptions::default(),
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_versions);
criterion_main!(benches);
