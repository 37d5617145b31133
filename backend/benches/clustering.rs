use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use salesmap::clustering::{ClusterConfig, group_close_points};
use salesmap::models::{GeoPoint, PointRecord, SalesInfo, SalesPoint, ZoneRecord};
use salesmap::zones::build_zone_report;

/// Deterministic grid of points around Bogotá, ~100 m apart.
fn grid(count: usize) -> Vec<SalesPoint> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            SalesPoint::new(
                GeoPoint::new(4.60 + row as f64 * 0.0009, -74.08 + col as f64 * 0.0009),
                SalesInfo {
                    units: (i % 17) as f64,
                    liters: (i % 5) as f64,
                    usd: (i % 11) as f64,
                },
            )
        })
        .collect()
}

fn benchmark_group_close_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_close_points");

    for count in [100, 500, 2_000] {
        let points = grid(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| group_close_points(black_box(points), &ClusterConfig::default()));
        });
    }

    group.finish();
}

fn benchmark_zone_report(c: &mut Criterion) {
    let zones: Vec<ZoneRecord> = (0..10)
        .map(|route| ZoneRecord {
            route: route.to_string(),
            city: None,
            points: Vec::new(),
            sales_summary: None,
            point_data: grid(200)
                .into_iter()
                .map(|p| PointRecord {
                    gps_coordinates: format!("({},{})", p.coordinates.lat, p.coordinates.lon),
                    sales_units: p.sales_info.units,
                    sales_liters: p.sales_info.liters,
                    sales_usd: p.sales_info.usd,
                })
                .collect(),
        })
        .collect();

    c.bench_function("build_zone_report_10_routes", |b| {
        b.iter(|| build_zone_report(black_box(&zones), &ClusterConfig::default()));
    });
}

criterion_group!(benches, benchmark_group_close_points, benchmark_zone_report);
criterion_main!(benches);
