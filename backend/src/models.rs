pub use shared::{
    ApiError, ClusterGroup, ClusterRequest, ColoredCluster, DistributorLocation, DistributorType,
    DistributorsPayload, DistributorsReport, GeoPoint, PointRecord, RejectedPoint, RouteZone,
    SalesInfo, SalesPoint, ZoneColor, ZoneRecord, ZonesPayload, ZonesReport,
};
