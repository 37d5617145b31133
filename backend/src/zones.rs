use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    clustering::{ClusterConfig, group_close_points},
    colorizer::colorize,
    error::ZoneError,
    geo::{centroid, parse_gps_coordinates},
    models::{
        GeoPoint, RejectedPoint, RouteZone, SalesInfo, SalesPoint, ZoneRecord, ZonesPayload,
        ZonesReport,
    },
};

const ZONE_NAME_PREFIX: &str = "Ruta";

pub fn zone_name(route: &str) -> String {
    format!("{ZONE_NAME_PREFIX} {route}")
}

pub fn read_payload_file(path: impl AsRef<Path>) -> Result<ZonesPayload, ZoneError> {
    let file = File::open(path)?;
    read_payload(BufReader::new(file))
}

pub fn read_payload(reader: impl Read) -> Result<ZonesPayload, ZoneError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write `report` as pretty JSON followed by a newline.
pub fn write_report(report: &ZonesReport, mut writer: impl Write) -> Result<(), ZoneError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `report` to `path`, or to stdout when no path is given.
pub fn write_report_to(report: &ZonesReport, path: Option<&Path>) -> Result<(), ZoneError> {
    match path {
        Some(path) => write_report(report, BufWriter::new(File::create(path)?)),
        None => write_report(report, std::io::stdout().lock()),
    }
}

/// Sales points and raw totals collected for one route.
#[derive(Debug, Default)]
struct RouteBucket {
    route: String,
    sales_points: Vec<SalesPoint>,
    totals: SalesInfo,
}

/// Run the full pipeline over one country's zone records: parse, cluster per
/// route, color per route and total per route.
///
/// Routes come out in the order they first appear in `zones`. Point records
/// with an unparseable `gps_coordinates` are left out of clustering and listed
/// in [`ZonesReport::rejected_points`]; their sales still count towards the
/// route totals.
pub fn build_zone_report(zones: &[ZoneRecord], config: &ClusterConfig) -> ZonesReport {
    let mut buckets: Vec<RouteBucket> = Vec::new();
    let mut bucket_index: HashMap<&str, usize> = HashMap::new();
    let mut rejected_points = Vec::new();

    for zone in zones {
        let idx = *bucket_index.entry(zone.route.as_str()).or_insert_with(|| {
            buckets.push(RouteBucket {
                route: zone.route.clone(),
                ..RouteBucket::default()
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[idx];

        if zone.point_data.is_empty() {
            if let Some(summary) = zone.sales_summary {
                bucket.totals.accumulate(summary);
            }
            continue;
        }

        for record in &zone.point_data {
            let sales_info = record.sales_info();
            bucket.totals.accumulate(sales_info);

            match parse_gps_coordinates(&record.gps_coordinates) {
                Ok(coordinates) => {
                    if !coordinates.is_within_canonical_range() {
                        tracing::debug!(
                            "Route {} has out-of-range point {:?}, clustering it as given",
                            zone.route,
                            coordinates
                        );
                    }
                    bucket
                        .sales_points
                        .push(SalesPoint::new(coordinates, sales_info));
                }
                Err(err) => {
                    tracing::warn!("Skipping point on route {}: {}", zone.route, err);
                    rejected_points.push(RejectedPoint {
                        route: zone.route.clone(),
                        gps_coordinates: record.gps_coordinates.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        "Clustering {} zone record(s) across {} route(s) within {:.3} km",
        zones.len(),
        buckets.len(),
        config.max_distance_km
    );

    let mut route_totals = BTreeMap::new();
    let zones_out = buckets
        .into_iter()
        .map(|bucket| {
            let groups = group_close_points(&bucket.sales_points, config);
            let sales_clusters = colorize(groups, bucket.totals.units);
            tracing::debug!(
                "Route {}: {} point(s), {} cluster(s)",
                bucket.route,
                bucket.sales_points.len(),
                sales_clusters.len()
            );
            route_totals.insert(bucket.route.clone(), bucket.totals);
            RouteZone {
                name: zone_name(&bucket.route),
                route: bucket.route,
                sales_clusters,
            }
        })
        .collect();

    ZonesReport {
        zones: zones_out,
        route_totals,
        map_center: map_center(zones),
        rejected_points,
    }
}

/// Mean position of every parseable entry in the zones' raw `points` lists.
pub fn map_center(zones: &[ZoneRecord]) -> Option<GeoPoint> {
    let points: Vec<_> = zones
        .iter()
        .flat_map(|zone| zone.points.iter())
        .filter_map(|raw| parse_gps_coordinates(raw).ok())
        .collect();
    centroid(&points)
}
