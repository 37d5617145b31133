use std::{
    fmt::Display,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use crate::clustering::{
    ClusterConfig, ClusterConfigError, DEFAULT_MAX_DISTANCE_KM, MIN_CLUSTER_SIZE,
};

pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
pub const DEFAULT_ZONES_API_ROOT: &str = "http://127.0.0.1:8000";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Cluster(#[from] ClusterConfigError),
}

/// Service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub zones_api_root: String,
    pub cluster: ClusterConfig,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Environment variables: `BIND_ADDR`, `ZONES_API_ROOT`,
    /// `CLUSTER_MAX_DISTANCE_KM`, `CLUSTER_MIN_SIZE`, `UPSTREAM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cluster = ClusterConfig {
            max_distance_km: parse_var(&lookup, "CLUSTER_MAX_DISTANCE_KM", DEFAULT_MAX_DISTANCE_KM)?,
            min_cluster_size: parse_var(&lookup, "CLUSTER_MIN_SIZE", MIN_CLUSTER_SIZE)?,
        }
        .validated()?;

        Ok(Self {
            bind_addr: parse_var(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?,
            zones_api_root: lookup("ZONES_API_ROOT")
                .unwrap_or_else(|| DEFAULT_ZONES_API_ROOT.to_string()),
            cluster,
            upstream_timeout: Duration::from_secs(parse_var(
                &lookup,
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::InvalidVar {
            var,
            reason: err.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.zones_api_root, DEFAULT_ZONES_API_ROOT);
        assert_eq!(config.cluster, ClusterConfig::default());
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("ZONES_API_ROOT", "https://zones.example.com"),
            ("CLUSTER_MAX_DISTANCE_KM", " 1.25 "),
            ("CLUSTER_MIN_SIZE", "3"),
            ("UPSTREAM_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.zones_api_root, "https://zones.example.com");
        assert_eq!(config.cluster.max_distance_km, 1.25);
        assert_eq!(config.cluster.min_cluster_size, 3);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = config_from(&[("CLUSTER_MIN_SIZE", "two")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "CLUSTER_MIN_SIZE", .. }));

        let err = config_from(&[("CLUSTER_MAX_DISTANCE_KM", "-3")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Cluster(ClusterConfigError::InvalidDistance(_))
        ));

        assert!(config_from(&[("BIND_ADDR", "localhost")]).is_err());
    }
}
