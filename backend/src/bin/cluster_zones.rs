use std::path::PathBuf;

use clap::Parser;
use salesmap::{
    clustering::{ClusterConfig, DEFAULT_MAX_DISTANCE_KM, MIN_CLUSTER_SIZE},
    zones::{build_zone_report, read_payload_file, write_report_to},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Cluster a distribution-zones payload into colored route zones"
)]
struct Args {
    /// JSON payload as returned by the zones API (`{"zones": [...]}`)
    #[arg(long)]
    input: PathBuf,

    /// Where to write the report; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum distance in km between a seed point and its cluster members
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE_KM)]
    max_distance_km: f64,

    /// Smallest group kept as a cluster
    #[arg(long, default_value_t = MIN_CLUSTER_SIZE)]
    min_cluster_size: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ClusterConfig {
        max_distance_km: args.max_distance_km,
        min_cluster_size: args.min_cluster_size,
    }
    .validated()?;

    tracing::info!("reading zones from {:?}", args.input);
    let payload = read_payload_file(&args.input)?;
    let report = build_zone_report(&payload.zones, &config);

    write_report_to(&report, args.output.as_deref())?;
    if let Some(path) = &args.output {
        tracing::info!(
            "wrote {} route zone(s) to {:?}",
            report.zones.len(),
            path
        );
    }

    if !report.rejected_points.is_empty() {
        tracing::warn!(
            "{} point(s) had unparseable coordinates",
            report.rejected_points.len()
        );
    }

    Ok(())
}
