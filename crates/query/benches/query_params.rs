use criterion::{Criterion, black_box, criterion_group, criterion_main};

use backoffice_core::FieldErrors;
use backoffice_query::build_query_params;
use backoffice_query::reconcile;
use backoffice_query::resources::payments::PaymentFilters;

fn bench_params(c: &mut Criterion) {
    let filters = PaymentFilters {
        status: "paid".into(),
        method: "card".into(),
        user_id: Some(42),
        date_from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        per_page: 25,
        ..PaymentFilters::default()
    };
    let errors = FieldErrors::from([("status".to_string(), vec!["invalid".to_string()])]);

    c.bench_function("build_query_params", |b| b.iter(|| build_query_params(black_box(&filters))));

    c.bench_function("reconcile_one_field", |b| {
        b.iter(|| reconcile(black_box(&filters), black_box(&errors)))
    });
}

criterion_group!(benches, bench_params);
criterion_main!(benches);
