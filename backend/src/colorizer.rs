use crate::models::{ClusterGroup, ColoredCluster, ZoneColor};

const LOW_TIER_CEILING: f64 = 0.33;
const MID_TIER_CEILING: f64 = 0.66;

/// Min and max cluster totals of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesRange {
    pub min: f64,
    pub max: f64,
}

impl SalesRange {
    /// `None` when there are no groups to range over.
    pub fn of_groups(groups: &[ClusterGroup]) -> Option<Self> {
        let mut totals = groups.iter().map(|g| g.total_sales);
        let first = totals.next()?;
        Some(totals.fold(Self { min: first, max: first }, |range, total| Self {
            min: range.min.min(total),
            max: range.max.max(total),
        }))
    }

    pub fn color_for(self, value: f64) -> ZoneColor {
        color_for(value, self.min, self.max)
    }
}

/// Tier of `value` within `[min, max]`.
///
/// A degenerate range (`max == min`) or any other non-finite ratio maps to
/// [`ZoneColor::Mid`].
pub fn color_for(value: f64, min: f64, max: f64) -> ZoneColor {
    let ratio = (value - min) / (max - min);
    if !ratio.is_finite() {
        return ZoneColor::Mid;
    }

    if ratio < LOW_TIER_CEILING {
        ZoneColor::Low
    } else if ratio < MID_TIER_CEILING {
        ZoneColor::Mid
    } else {
        ZoneColor::High
    }
}

/// Color every group against the range of the groups passed in, which must
/// all belong to the same route.
pub fn colorize(groups: Vec<ClusterGroup>, route_units: f64) -> Vec<ColoredCluster> {
    let Some(range) = SalesRange::of_groups(&groups) else {
        return Vec::new();
    };

    groups
        .into_iter()
        .map(|group| ColoredCluster {
            color: range.color_for(group.total_sales),
            share_of_route: share_of(group.total_sales, route_units),
            group,
        })
        .collect()
}

fn share_of(cluster_units: f64, route_units: f64) -> Option<f64> {
    if route_units == 0.0 || !route_units.is_finite() {
        return None;
    }
    Some(cluster_units / route_units * 100.0)
}
