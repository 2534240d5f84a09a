//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::timetable::{IndexError, ScheduleFilter};

use super::dto::*;
use super::state::AppState;

const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        path: "/",
        description: "service description and route table",
    },
    RouteInfo {
        path: "/health",
        description: "index readiness",
    },
    RouteInfo {
        path: "/status",
        description: "index readiness",
    },
    RouteInfo {
        path: "/horarios",
        description: "available schedules",
    },
    RouteInfo {
        path: "/consulta",
        description: "query by transport, day_group, direction, station, origin, destination",
    },
    RouteInfo {
        path: "/estaciones",
        description: "stations, optionally by transport, day_group, direction",
    },
    RouteInfo {
        path: "/regenerar",
        description: "rebuild the index from the source files",
    },
];

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(status))
        .route("/status", get(status))
        .route("/horarios", get(list_schedules))
        .route("/consulta", get(query))
        .route("/estaciones", get(list_stations))
        .route("/regenerar", get(regenerate).post(regenerate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn current_status(state: &AppState) -> StatusResponse {
    let rebuilding = state.timetable.is_rebuilding();
    match state.timetable.current().await {
        Ok(index) => StatusResponse::from_index(&index, rebuilding),
        Err(_) => StatusResponse::not_ready(rebuilding),
    }
}

/// Service description.
async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        service: env!("CARGO_PKG_NAME"),
        status: current_status(&state).await,
        routes: ROUTES.to_vec(),
    })
}

/// Readiness and size of the active index. Always 200.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(current_status(&state).await)
}

/// Distinct schedule keys.
async fn list_schedules(State(state): State<AppState>) -> Result<Json<SchedulesResponse>, AppError> {
    let index = state.timetable.current().await?;
    let schedules = index.list_schedules();

    Ok(Json(SchedulesResponse {
        count: schedules.len(),
        schedules,
    }))
}

/// Filtered lookup. Unknown filter values give an empty result.
async fn query(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<Json<QueryResponse>, AppError> {
    let index = state.timetable.current().await?;
    let result = index.query(&filter);

    Ok(Json(QueryResponse::new(filter, result)))
}

/// Distinct stations of the schedules matching the key fields of the filter.
async fn list_stations(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<Json<StationsResponse>, AppError> {
    let index = state.timetable.current().await?;
    let stations = index.stations(|key| filter.matches_key(key));

    Ok(Json(StationsResponse {
        count: stations.len(),
        stations,
    }))
}

/// Rebuild from sources and swap the new index in.
async fn regenerate(State(state): State<AppState>) -> Result<Json<RegenerateResponse>, AppError> {
    let summary = state.timetable.regenerate().await?;
    Ok(Json(summary.into()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotReady,
    Internal { message: String },
}

impl From<IndexError> for AppError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::NotReady => AppError::NotReady,
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotReady => {
                warn!("request before the timetable index is ready");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    IndexError::NotReady.to_string(),
                )
            }
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
