/// Benchmarks for building forecast series and computing their metrics.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feederwatch::series::ForecastSeries;
use feederwatch::store::Row;
use feederwatch::summary;
use serde_json::{json, Value};
use time::macros::datetime;
use time::Duration;

fn make_rows(count: i64) -> Vec<Row> {
    let start = datetime!(2024-01-01 00:00 UTC);
    // Reverse order so that building the series has to sort.
    (0..count)
        .rev()
        .map(|hour| {
            let timestamp = start + Duration::hours(hour);
            let value = json!({
                "feeder_id": 1,
                "model_version": "v1.7_HP_Tuning_1",
                "tag": "exp_HP",
                "scenario_type": "24hr",
                "model_architecture_type": "LSTM",
                "target_timestamp": timestamp
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap(),
                "forecast_value": (hour % 24) as f64,
                "actual_value": if hour % 3 == 0 { Value::Null } else { json!(hour % 20) },
            });
            match value {
                Value::Object(row) => row,
                _ => unreachable!(),
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    for size in [24, 24 * 7, 24 * 365] {
        let rows = make_rows(size);
        c.bench_function(&format!("from_rows({})", size), |b| {
            b.iter(|| ForecastSeries::from_rows(black_box(rows.clone())))
        });
        let series = ForecastSeries::from_rows(rows).unwrap();
        c.bench_function(&format!("load_metrics({})", size), |b| {
            b.iter(|| summary::load_metrics(black_box(&series)))
        });
        c.bench_function(&format!("accuracy_metrics({})", size), |b| {
            b.iter(|| summary::accuracy_metrics(black_box(&series)))
        });
        c.bench_function(&format!("to_api_entries({})", size), |b| {
            b.iter(|| black_box(&series).to_api_entries())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
