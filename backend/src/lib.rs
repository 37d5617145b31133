pub mod clustering;
pub mod colorizer;
pub mod config;
pub mod distributors;
pub mod error;
pub mod geo;
pub mod models;
pub mod service;
pub mod upstream;
pub mod zones;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ZoneError;
use crate::models::{ApiError, ClusterRequest, DistributorType, DistributorsReport, ZonesReport};
use crate::service::{SelectionOutcome, ZoneService, ZoneSnapshot};
use crate::upstream::ZoneSource;
use crate::zones::build_zone_report;

pub struct AppState<S> {
    pub service: Arc<ZoneService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Debug, Deserialize)]
struct DistributorQuery {
    distributor_type: Option<DistributorType>,
}

pub fn create_router<S: ZoneSource + 'static>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/zones", get(latest_zones_handler::<S>))
        .route("/api/zones/cluster", post(cluster_handler::<S>))
        .route("/api/countries/:country/zones", get(select_country_handler::<S>))
        .route(
            "/api/countries/:country/distributors",
            get(distributors_handler::<S>),
        )
        .layer(cors)
        .with_state(state)
}

/// POST /api/zones/cluster - cluster zone records supplied in the body
async fn cluster_handler<S: ZoneSource>(
    State(state): State<AppState<S>>,
    Json(req): Json<ClusterRequest>,
) -> Result<Json<ZonesReport>, ApiFailure> {
    let base = *state.service.config();
    let config = match req.max_distance_km {
        Some(max_distance_km) => base
            .with_max_distance(max_distance_km)
            .map_err(|err| api_error(err.into()))?,
        None => base,
    };

    Ok(Json(build_zone_report(&req.zones, &config)))
}

/// GET /api/countries/:country/zones - fetch, cluster and publish a country
async fn select_country_handler<S: ZoneSource>(
    State(state): State<AppState<S>>,
    Path(country): Path<String>,
) -> Result<Json<ZoneSnapshot>, ApiFailure> {
    match state.service.select_country(&country).await.map_err(api_error)? {
        SelectionOutcome::Published(snapshot) => Ok(Json(snapshot)),
        SelectionOutcome::Superseded {
            country,
            latest_generation,
            ..
        } => Err((
            StatusCode::CONFLICT,
            Json(ApiError {
                message: format!(
                    "Selection of {country} was superseded by selection #{latest_generation}"
                ),
            }),
        )),
    }
}

/// GET /api/countries/:country/distributors?distributor_type= - distributor
/// locations and their map center
async fn distributors_handler<S: ZoneSource>(
    State(state): State<AppState<S>>,
    Path(country): Path<String>,
    Query(query): Query<DistributorQuery>,
) -> Result<Json<DistributorsReport>, ApiFailure> {
    state
        .service
        .distributors(&country, query.distributor_type)
        .await
        .map(Json)
        .map_err(api_error)
}

/// GET /api/zones - latest published snapshot
async fn latest_zones_handler<S: ZoneSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<ZoneSnapshot>, ApiFailure> {
    state.service.latest().await.map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                message: "No country has been selected yet".to_string(),
            }),
        )
    })
}

fn api_error(err: ZoneError) -> ApiFailure {
    let status = match err {
        ZoneError::Config(_) | ZoneError::Parse(_) => StatusCode::BAD_REQUEST,
        ZoneError::Upstream(_) => StatusCode::BAD_GATEWAY,
        ZoneError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
