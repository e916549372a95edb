use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::OpenApi;

use super::{
    dto::{
        DeviceStatesDto, FanDto, LightDto, SensorDataDto, SensorDataRequest, SettingsDto,
        SettingsRequest,
    },
    errors::AppError,
    AppState,
};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GraphParams {
    pub size: Option<u32>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Resolve the light schedule and store it with the fan threshold.
/// `user_light` is either `"HH:MM:SS"` or `"sunset"`; the end time is always
/// derived from `light_duration`.
#[utoipa::path(
    put,
    path = "/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Preferences updated", body = SettingsDto),
        (status = 201, description = "Preferences created", body = SettingsDto),
        (status = 422, description = "Malformed time or duration"),
        (status = 502, description = "Sunset lookup failed"),
    ),
    tag = "settings"
)]
pub async fn put_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsRequest>,
) -> Result<(StatusCode, Json<SettingsDto>), AppError> {
    let (prefs, created) = state.control.update_settings(body.into()).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(prefs.into())))
}

// ---------------------------------------------------------------------------
// Sensor data
// ---------------------------------------------------------------------------

/// Record a reading from the hub device. The server stamps the time of day.
#[utoipa::path(
    post,
    path = "/sensorData",
    request_body = SensorDataRequest,
    responses(
        (status = 201, description = "Reading recorded", body = SensorDataDto),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sensors"
)]
pub async fn post_sensor_data(
    State(state): State<AppState>,
    Json(body): Json<SensorDataRequest>,
) -> Result<(StatusCode, Json<SensorDataDto>), AppError> {
    let reading = state.sensors.record(body.temperature, body.presence).await?;
    Ok((StatusCode::CREATED, Json(reading.into())))
}

/// Up to `size` of the most recent readings, oldest first. All readings when
/// `size` is omitted.
#[utoipa::path(
    get,
    path = "/graph",
    params(
        ("size" = Option<u32>, Query, description = "Maximum number of readings"),
    ),
    responses(
        (status = 200, description = "Recent readings", body = Vec<SensorDataDto>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sensors"
)]
pub async fn get_graph(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Json<Vec<SensorDataDto>>, AppError> {
    let rows = state.sensors.recent(params.size).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ---------------------------------------------------------------------------
// Device states
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/fan",
    responses(
        (status = 200, description = "Fan state", body = FanDto),
        (status = 404, description = "No reading or no preferences yet"),
    ),
    tag = "devices"
)]
pub async fn get_fan(State(state): State<AppState>) -> Result<Json<FanDto>, AppError> {
    let states = state.control.device_states().await?;
    Ok(Json(FanDto { fan: states.fan }))
}

#[utoipa::path(
    get,
    path = "/light",
    responses(
        (status = 200, description = "Light state", body = LightDto),
        (status = 404, description = "No reading or no preferences yet"),
    ),
    tag = "devices"
)]
pub async fn get_light(State(state): State<AppState>) -> Result<Json<LightDto>, AppError> {
    let states = state.control.device_states().await?;
    Ok(Json(LightDto { light: states.light }))
}

/// Fan and light state in one response.
#[utoipa::path(
    get,
    path = "/state",
    responses(
        (status = 200, description = "Fan and light state", body = DeviceStatesDto),
        (status = 404, description = "No reading or no preferences yet"),
    ),
    tag = "devices"
)]
pub async fn get_state(State(state): State<AppState>) -> Result<Json<DeviceStatesDto>, AppError> {
    let states = state.control.device_states().await?;
    Ok(Json(states.into()))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(put_settings, post_sensor_data, get_graph, get_fan, get_light, get_state, health),
    components(schemas(
        SettingsRequest,
        SettingsDto,
        SensorDataRequest,
        SensorDataDto,
        FanDto,
        LightDto,
        DeviceStatesDto
    )),
    tags(
        (name = "settings", description = "User preferences"),
        (name = "sensors",  description = "Sensor reading endpoints"),
        (name = "devices",  description = "Derived fan and light states"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Smart Hub API",
        version = "0.1.0",
        description = "REST API for the smart hub: sensor ingestion, preferences and device states"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
