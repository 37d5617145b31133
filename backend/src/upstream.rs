use std::{future::Future, time::Duration};

use crate::models::{
    DistributorLocation, DistributorType, DistributorsPayload, ZoneRecord, ZonesPayload,
};

/// Source of per-country zone records and distributor locations.
///
/// Abstracts the zones API so the selection service can be driven by an
/// in-memory source in tests and benchmarks.
pub trait ZoneSource: Send + Sync {
    fn fetch_zones(
        &self,
        country: &str,
    ) -> impl Future<Output = Result<Vec<ZoneRecord>, UpstreamError>> + Send;

    /// Distributor locations of `country`, all tiers when `distributor_type`
    /// is `None`.
    fn fetch_distributors(
        &self,
        country: &str,
        distributor_type: Option<DistributorType>,
    ) -> impl Future<Output = Result<Vec<DistributorLocation>, UpstreamError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to zones API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("zones API answered {status} for country {country}")]
    Status { status: u16, country: String },
}

/// Client for the zones API:
/// `GET {api_root}/distribution-zones?country=<country>` and
/// `GET {api_root}/distributor-data?country=<country>[&distributor_type=<type>]`.
#[derive(Clone)]
pub struct HttpZoneSource {
    client: reqwest::Client,
    api_root: String,
}

impl HttpZoneSource {
    pub fn new(api_root: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_root: api_root.trim_end_matches('/').to_string(),
        })
    }

    pub fn zones_url(&self) -> String {
        format!("{}/distribution-zones", self.api_root)
    }

    pub fn distributors_url(&self) -> String {
        format!("{}/distributor-data", self.api_root)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        country: &str,
    ) -> Result<T, UpstreamError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                country: country.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

impl ZoneSource for HttpZoneSource {
    async fn fetch_zones(&self, country: &str) -> Result<Vec<ZoneRecord>, UpstreamError> {
        let url = self.zones_url();
        tracing::debug!("Fetching zones for {country} from {url}");

        let payload: ZonesPayload = self
            .get_json(&url, &[("country", country)], country)
            .await?;
        tracing::debug!("Received {} zone record(s) for {country}", payload.zones.len());
        Ok(payload.zones)
    }

    async fn fetch_distributors(
        &self,
        country: &str,
        distributor_type: Option<DistributorType>,
    ) -> Result<Vec<DistributorLocation>, UpstreamError> {
        let url = self.distributors_url();
        let mut query = vec![("country", country)];
        if let Some(kind) = distributor_type {
            query.push(("distributor_type", kind.as_str()));
        }
        tracing::debug!("Fetching distributors for {country} from {url} ({distributor_type:?})");

        let payload: DistributorsPayload = self.get_json(&url, &query, country).await?;
        tracing::debug!(
            "Received {} distributor location(s) for {country}",
            payload.distributors.len()
        );
        Ok(payload.distributors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_strip_trailing_slash() {
        let source = HttpZoneSource::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.zones_url(), "http://127.0.0.1:8000/distribution-zones");
        assert_eq!(source.distributors_url(), "http://127.0.0.1:8000/distributor-data");
    }

    /// Root URL of a local port that was just released, so nothing listens on it.
    async fn closed_port_root() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_request_error() {
        let root = closed_port_root().await;
        let source = HttpZoneSource::new(&root, Duration::from_secs(2)).unwrap();

        let err = source.fetch_zones("Colombia").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Request(_)));

        let err = source
            .fetch_distributors("Colombia", Some(DistributorType::Wholesalers))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Request(_)));
    }
}
