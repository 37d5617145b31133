use crate::{
    geo::haversine_km,
    models::{ClusterGroup, SalesPoint},
};

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 0.5;
/// Groups with fewer members are dropped from the output.
pub const MIN_CLUSTER_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    pub max_distance_km: f64,
    pub min_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            min_cluster_size: MIN_CLUSTER_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterConfigError {
    #[error("maximum cluster distance must be a finite, non-negative number of km (got {0})")]
    InvalidDistance(f64),
    #[error("minimum cluster size must be at least 1")]
    InvalidMinSize,
}

impl ClusterConfig {
    pub fn with_max_distance(self, max_distance_km: f64) -> Result<Self, ClusterConfigError> {
        Self {
            max_distance_km,
            ..self
        }
        .validated()
    }

    pub fn validated(self) -> Result<Self, ClusterConfigError> {
        if !self.max_distance_km.is_finite() || self.max_distance_km < 0.0 {
            return Err(ClusterConfigError::InvalidDistance(self.max_distance_km));
        }
        if self.min_cluster_size == 0 {
            return Err(ClusterConfigError::InvalidMinSize);
        }
        Ok(self)
    }
}

/// Group sales points that lie close to a seed point.
///
/// # Algorithm: single-pass greedy seeding
///
/// Points are visited in input order. The first point not yet claimed becomes
/// a seed; every other unclaimed point (before or after it in the input) whose
/// distance to the seed is at most `max_distance_km` joins the seed's group.
///
/// - Membership is measured against the seed only, so two members of the same
///   group may be further apart than the threshold.
/// - A point is claimed at most once, which makes the result depend on input
///   order.
/// - Groups smaller than `min_cluster_size` are discarded; their points do not
///   appear anywhere in the output.
///
/// Groups are returned in the input order of their seeds.
pub fn group_close_points(points: &[SalesPoint], config: &ClusterConfig) -> Vec<ClusterGroup> {
    let mut visited = vec![false; points.len()];
    let mut groups = Vec::new();

    for (seed_idx, seed) in points.iter().enumerate() {
        if visited[seed_idx] {
            continue;
        }
        visited[seed_idx] = true;
        let mut group = ClusterGroup::seeded(seed);

        for (other_idx, other) in points.iter().enumerate() {
            if visited[other_idx] {
                continue;
            }
            if haversine_km(seed.coordinates, other.coordinates) <= config.max_distance_km {
                group.push(other);
                visited[other_idx] = true;
            }
        }

        if group.len() >= config.min_cluster_size {
            groups.push(group);
        } else {
            tracing::trace!(
                "Dropping group seeded at {:?} with {} member(s)",
                seed.coordinates,
                group.len()
            );
        }
    }

    tracing::debug!(
        "Grouped {} point(s) into {} cluster(s) within {:.3} km",
        points.len(),
        groups.len(),
        config.max_distance_km
    );

    groups
}
