use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_within_canonical_range(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesInfo {
    pub units: f64,
    pub liters: f64,
    pub usd: f64,
}

impl SalesInfo {
    pub fn accumulate(&mut self, other: SalesInfo) {
        self.units += other.units;
        self.liters += other.liters;
        self.usd += other.usd;
    }
}

/// One observed sales location within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    pub coordinates: GeoPoint,
    pub sales: f64,
    pub sales_info: SalesInfo,
}

impl SalesPoint {
    pub fn new(coordinates: GeoPoint, sales_info: SalesInfo) -> Self {
        Self {
            coordinates,
            sales: sales_info.units,
            sales_info,
        }
    }
}

/// Points grouped around a seed point. `points` and `points_data` are parallel
/// and kept in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroup {
    pub points: Vec<GeoPoint>,
    pub total_sales: f64,
    /// Serialized as `pointsData`; `details` is accepted on input for
    /// consumers that still send the older name.
    #[serde(alias = "details")]
    pub points_data: Vec<SalesPoint>,
}

impl ClusterGroup {
    pub fn seeded(seed: &SalesPoint) -> Self {
        Self {
            points: vec![seed.coordinates],
            total_sales: seed.sales,
            points_data: vec![seed.clone()],
        }
    }

    pub fn push(&mut self, member: &SalesPoint) {
        self.points.push(member.coordinates);
        self.total_sales += member.sales;
        self.points_data.push(member.clone());
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Relative sales tier of a cluster within its route. Ordered LOW < MID < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneColor {
    #[serde(rename = "#ff4444")]
    Low,
    #[serde(rename = "#ffff44")]
    Mid,
    #[serde(rename = "#44ff44")]
    High,
}

impl ZoneColor {
    pub const fn hex(self) -> &'static str {
        match self {
            ZoneColor::Low => "#ff4444",
            ZoneColor::Mid => "#ffff44",
            ZoneColor::High => "#44ff44",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoredCluster {
    #[serde(flatten)]
    pub group: ClusterGroup,
    pub color: ZoneColor,
    /// Percentage of the route's total units held by this cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_of_route: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteZone {
    pub name: String,
    pub route: String,
    pub sales_clusters: Vec<ColoredCluster>,
}

/// Point-level sales record as delivered by the zones API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub gps_coordinates: String,
    pub sales_units: f64,
    pub sales_liters: f64,
    pub sales_usd: f64,
}

impl PointRecord {
    pub fn sales_info(&self) -> SalesInfo {
        SalesInfo {
            units: self.sales_units,
            liters: self.sales_liters,
            usd: self.sales_usd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(deserialize_with = "deserialize_route_id")]
    pub route: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_summary: Option<SalesInfo>,
    #[serde(default)]
    pub point_data: Vec<PointRecord>,
}

/// Body of `GET /distribution-zones`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZonesPayload {
    pub zones: Vec<ZoneRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub zones: Vec<ZoneRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedPoint {
    pub route: String,
    pub gps_coordinates: String,
    pub reason: String,
}

/// Display-ready output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonesReport {
    pub zones: Vec<RouteZone>,
    pub route_totals: BTreeMap<String, SalesInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_center: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_points: Vec<RejectedPoint>,
}

/// Distributor tier filter understood by the distributor-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributorType {
    Wholesalers,
    Distributors,
    #[serde(rename = "Sub-distributors")]
    SubDistributors,
}

impl DistributorType {
    pub const ALL: [DistributorType; 3] = [
        DistributorType::Wholesalers,
        DistributorType::Distributors,
        DistributorType::SubDistributors,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            DistributorType::Wholesalers => "Wholesalers",
            DistributorType::Distributors => "Distributors",
            DistributorType::SubDistributors => "Sub-distributors",
        }
    }
}

/// One distributor location as delivered by the distributor-data API.
/// Coordinates may arrive as numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorLocation {
    #[serde(deserialize_with = "deserialize_degrees")]
    pub latitude: f64,
    #[serde(deserialize_with = "deserialize_degrees")]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub sales_units: f64,
    #[serde(default)]
    pub sales_liters: f64,
    #[serde(default)]
    pub sales_usd: f64,
}

impl DistributorLocation {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Body of `GET /distributor-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributorsPayload {
    pub distributors: Vec<DistributorLocation>,
}

/// Distributor locations of one country with the map center they imply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorsReport {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<DistributorType>,
    pub locations: Vec<DistributorLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_center: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

fn deserialize_route_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRouteId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawRouteId::deserialize(deserializer)? {
        RawRouteId::Text(text) => text,
        RawRouteId::Integer(id) => id.to_string(),
        RawRouteId::Float(id) => id.to_string(),
    })
}

fn deserialize_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDegrees {
        Number(f64),
        Text(String),
    }

    match RawDegrees::deserialize(deserializer)? {
        RawDegrees::Number(value) => Ok(value),
        RawDegrees::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate {text:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_id_accepts_numbers_and_strings() {
        let json = r#"{"zones": [
            {"route": 12, "points": []},
            {"route": "R-7", "point_data": []}
        ]}"#;
        let payload: ZonesPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.zones[0].route, "12");
        assert_eq!(payload.zones[1].route, "R-7");
        assert!(payload.zones[1].sales_summary.is_none());
    }

    #[test]
    fn canonical_range_check() {
        assert!(GeoPoint::new(-90.0, 180.0).is_within_canonical_range());
        assert!(!GeoPoint::new(90.5, 0.0).is_within_canonical_range());
        assert!(!GeoPoint::new(0.0, -181.0).is_within_canonical_range());
    }

    #[test]
    fn zone_color_serializes_as_hex() {
        let json = serde_json::to_string(&ZoneColor::High).unwrap();
        assert_eq!(json, "\"#44ff44\"");
        assert_eq!(ZoneColor::Low.hex(), "#ff4444");
        assert!(ZoneColor::Low < ZoneColor::Mid && ZoneColor::Mid < ZoneColor::High);
    }

    #[test]
    fn colored_cluster_uses_downstream_field_names() {
        let point = SalesPoint::new(
            GeoPoint::new(4.6, -74.08),
            SalesInfo {
                units: 3.0,
                liters: 1.5,
                usd: 9.0,
            },
        );
        let cluster = ColoredCluster {
            group: ClusterGroup::seeded(&point),
            color: ZoneColor::Mid,
            share_of_route: Some(100.0),
        };
        let value = serde_json::to_value(&cluster).unwrap();
        assert_eq!(value["totalSales"], 3.0);
        assert_eq!(value["color"], "#ffff44");
        assert_eq!(value["shareOfRoute"], 100.0);
        assert_eq!(value["pointsData"][0]["salesInfo"]["liters"], 1.5);
    }

    #[test]
    fn cluster_members_accept_details_alias() {
        let json = r##"{
            "points": [{"lat": 1.0, "lon": 2.0}],
            "totalSales": 4.0,
            "details": [{"coordinates": {"lat": 1.0, "lon": 2.0}, "sales": 4.0,
                "salesInfo": {"units": 4.0, "liters": 0.0, "usd": 0.0}}],
            "color": "#ff4444"
        }"##;
        let cluster: ColoredCluster = serde_json::from_str(json).unwrap();
        assert_eq!(cluster.group.points_data.len(), 1);
        assert_eq!(cluster.group.points_data[0].sales, 4.0);
        assert_eq!(cluster.color, ZoneColor::Low);
        assert_eq!(cluster.share_of_route, None);
    }

    #[test]
    fn distributor_coordinates_accept_strings_and_numbers() {
        let json = r#"{"distributors": [
            {"latitude": "4.61", "longitude": "-74.08", "brand": "Acme", "sales_usd": 12.5},
            {"latitude": 6.25, "longitude": -75.56}
        ]}"#;
        let payload: DistributorsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.distributors[0].position(), GeoPoint::new(4.61, -74.08));
        assert_eq!(payload.distributors[0].brand.as_deref(), Some("Acme"));
        assert_eq!(payload.distributors[1].sales_units, 0.0);

        let bad = r#"{"distributors": [{"latitude": "north", "longitude": 1}]}"#;
        assert!(serde_json::from_str::<DistributorsPayload>(bad).is_err());
    }

    #[test]
    fn distributor_type_uses_upstream_labels() {
        let json = serde_json::to_string(&DistributorType::SubDistributors).unwrap();
        assert_eq!(json, "\"Sub-distributors\"");
        for kind in DistributorType::ALL {
            let parsed: DistributorType =
                serde_json::from_value(serde_json::Value::from(kind.as_str())).unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
