use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    clustering::ClusterConfig,
    distributors::build_distributor_report,
    error::ZoneError,
    models::{DistributorType, DistributorsReport, ZonesReport},
    upstream::ZoneSource,
    zones::build_zone_report,
};

/// Report published for the most recent country selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub country: String,
    pub generation: u64,
    pub computed_at: DateTime<Utc>,
    pub report: ZonesReport,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    Published(ZoneSnapshot),
    /// A newer selection started while this one was waiting on the upstream
    /// fetch; its result was discarded.
    Superseded {
        country: String,
        generation: u64,
        latest_generation: u64,
    },
}

/// Runs the zone pipeline for country selections, keeping only the result of
/// the newest selection.
///
/// Every call to [`ZoneService::select_country`] takes a generation ticket
/// before fetching. When the fetch resolves the ticket is compared with the
/// current generation; a selection that has been overtaken never replaces
/// the published snapshot, whatever order the fetches complete in.
pub struct ZoneService<S> {
    source: S,
    config: ClusterConfig,
    generation: AtomicU64,
    latest: RwLock<Option<ZoneSnapshot>>,
}

impl<S: ZoneSource> ZoneService<S> {
    pub fn new(source: S, config: ClusterConfig) -> Self {
        Self {
            source,
            config,
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn latest(&self) -> Option<ZoneSnapshot> {
        self.latest.read().await.clone()
    }

    pub async fn select_country(&self, country: &str) -> Result<SelectionOutcome, ZoneError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Selection #{ticket}: loading zones for {country}");

        let fetched = self.source.fetch_zones(country).await;
        if let Some(outcome) = self.superseded(country, ticket) {
            return Ok(outcome);
        }
        let zones = fetched?;

        let report = build_zone_report(&zones, &self.config);

        let mut latest = self.latest.write().await;
        if let Some(outcome) = self.superseded(country, ticket) {
            return Ok(outcome);
        }
        let snapshot = ZoneSnapshot {
            country: country.to_string(),
            generation: ticket,
            computed_at: Utc::now(),
            report,
        };
        *latest = Some(snapshot.clone());
        tracing::info!(
            "Selection #{ticket}: published {} route zone(s) for {country}",
            snapshot.report.zones.len()
        );

        Ok(SelectionOutcome::Published(snapshot))
    }

    /// Distributor locations for `country` and their map center. Independent
    /// of the zone selection generation.
    pub async fn distributors(
        &self,
        country: &str,
        distributor_type: Option<DistributorType>,
    ) -> Result<DistributorsReport, ZoneError> {
        let locations = self
            .source
            .fetch_distributors(country, distributor_type)
            .await?;
        Ok(build_distributor_report(country, distributor_type, locations))
    }

    fn superseded(&self, country: &str, ticket: u64) -> Option<SelectionOutcome> {
        let latest_generation = self.current_generation();
        if latest_generation == ticket {
            return None;
        }
        tracing::warn!(
            "Selection #{ticket} for {country} superseded by #{latest_generation}, discarding result"
        );
        Some(SelectionOutcome::Superseded {
            country: country.to_string(),
            generation: ticket,
            latest_generation,
        })
    }
}
