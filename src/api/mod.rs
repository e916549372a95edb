pub mod dto;
pub mod errors;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

use crate::{control::ControlService, sensors::SensorService};

/// Shared handler state. Cloning is cheap: both services only hold handles.
#[derive(Clone)]
pub struct AppState {
    pub sensors: SensorService,
    pub control: ControlService,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/settings", put(handlers::put_settings))
        .route("/sensorData", post(handlers::post_sensor_data))
        .route("/graph", get(handlers::get_graph))
        .route("/fan", get(handlers::get_fan))
        .route("/light", get(handlers::get_light))
        .route("/state", get(handlers::get_state))
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}

/// CORS policy for the browser client: listed origins only, with
/// credentials. Methods and headers are mirrored from the preflight, since
/// wildcards are not allowed together with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
