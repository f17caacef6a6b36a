use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{geo, health, incidents, reports, transit};

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/geo", geo_router())
        .nest("/api/transit", transit_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn geo_router() -> Router<AppState> {
    Router::new()
        .route("/city", get(geo::get_city))
        .route("/city/{name}", get(geo::get_city_by_name))
        .route(
            "/reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route(
            "/reports/{id}",
            get(reports::get_report)
                .put(reports::update_report)
                .delete(reports::delete_report),
        )
}

fn transit_router() -> Router<AppState> {
    Router::new()
        .route("/lines", get(transit::list_lines))
        .route("/lines/refresh", post(transit::refresh_lines))
        .route("/lines/{line_id}", get(transit::get_line))
        .route("/lines/{line_id}/refresh", post(transit::refresh_line))
        .route(
            "/incidents",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route(
            "/incidents/{id}",
            get(incidents::get_incident)
                .put(incidents::update_incident)
                .delete(incidents::delete_incident),
        )
}
