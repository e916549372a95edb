pub mod models;
pub mod solar;

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveTime, Timelike, Utc};
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::{
    config::{Config, SunsetSourceKind},
    error::{ControlError, ControlResult},
};

use self::{models::SunsetApiResponse, solar::SolarSunset};

/// Anything that can tell today's sunset time for the hub's location.
pub trait SunsetLookup {
    fn sunset_time(&self) -> impl Future<Output = ControlResult<NaiveTime>> + Send;
}

// ---------------------------------------------------------------------------
// Remote API client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SunsetClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl SunsetClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.sunset_timeout_secs))
            .build()
            .context("Failed to build sunset HTTP client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.sunset_api_url.clone(),
                latitude: config.latitude,
                longitude: config.longitude,
            }),
        })
    }

    /// Fetch today's sunset at the configured coordinate as a server-local
    /// time of day.
    pub async fn get_sunset_time(&self) -> Result<NaiveTime> {
        let url = Url::parse_with_params(
            &self.inner.base_url,
            &[
                ("lat", self.inner.latitude.to_string()),
                ("lng", self.inner.longitude.to_string()),
            ],
        )
        .with_context(|| format!("invalid sunset API url: {}", self.inner.base_url))?;
        debug!(url = %url, "Requesting sunset time");

        let bytes = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .context("Sunset API request failed")?
            .error_for_status()
            .context("Sunset API returned error status")?
            .bytes()
            .await
            .context("Failed to read sunset API response body")?;

        let instant = serde_json::from_slice::<SunsetApiResponse>(&bytes)
            .context("Failed to deserialize sunset API response")?
            .into_sunset()?;
        let sunset = to_server_local(instant);

        info!(sunset = %sunset, utc = %instant, "Sunset time resolved");
        Ok(sunset)
    }
}

/// Wall-clock time of `instant` in the server's zone, whole seconds. Sensor
/// readings are stamped on the same clock.
pub(crate) fn to_server_local(instant: DateTime<Utc>) -> NaiveTime {
    let local = instant.with_timezone(&Local).time();
    local.with_nanosecond(0).unwrap_or(local)
}

// ---------------------------------------------------------------------------
// Configured provider
// ---------------------------------------------------------------------------

/// The sunset provider chosen by `SUNSET_SOURCE`.
#[derive(Debug, Clone)]
pub enum SunsetSource {
    Api(SunsetClient),
    Solar(SolarSunset),
}

impl SunsetSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.sunset_source {
            SunsetSourceKind::Api => Self::Api(SunsetClient::new(config)?),
            SunsetSourceKind::Solar => {
                Self::Solar(SolarSunset::new(config.latitude, config.longitude))
            }
        })
    }
}

impl SunsetLookup for SunsetSource {
    async fn sunset_time(&self) -> ControlResult<NaiveTime> {
        let result = match self {
            Self::Api(client) => client.get_sunset_time().await,
            Self::Solar(solar) => solar.sunset_today(),
        };
        result.map_err(|e| ControlError::UpstreamLookupFailure(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    fn test_config(url: String, timeout_secs: u64) -> Config {
        Config {
            database_url: None,
            server_host: "127.0.0.1".into(),
            server_port: 0,
            sunset_source: SunsetSourceKind::Api,
            sunset_api_url: url,
            sunset_timeout_secs: timeout_secs,
            latitude: 17.97787,
            longitude: -76.77339,
            cors_origins: vec![],
        }
    }

    /// Serve `app` on an ephemeral port and return its `/json` URL.
    async fn spawn_api(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/json")
    }

    async fn fake_sunset(Query(params): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("lat").map(String::as_str), Some("17.97787"));
        assert_eq!(params.get("lng").map(String::as_str), Some("-76.77339"));
        Json(json!({
            "results": {
                "date": "2024-06-21",
                "sunset": "6:41:09 PM",
                "timezone": "America/Jamaica"
            },
            "status": "OK"
        }))
    }

    /// Answers like sunrisesunset.io would for `instant`: wall-clock strings
    /// in `zone`.
    fn api_body_for(instant: DateTime<Utc>, zone: chrono_tz::Tz) -> Value {
        let there = instant.with_timezone(&zone);
        json!({
            "results": {
                "date": there.format("%Y-%m-%d").to_string(),
                "sunset": there.format("%-I:%M:%S %p").to_string(),
                "timezone": zone.name()
            },
            "status": "OK"
        })
    }

    #[tokio::test]
    async fn api_source_converts_to_server_local_time() {
        let url = spawn_api(Router::new().route("/json", get(fake_sunset))).await;
        let source = SunsetSource::from_config(&test_config(url, 5)).unwrap();

        // 18:41:09 in Jamaica (UTC-5), shown on this machine's clock.
        let expected = to_server_local(
            chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 6, 21, 23, 41, 9).unwrap(),
        );
        assert_eq!(source.sunset_time().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn api_and_solar_sources_share_a_clock() {
        let mut config = test_config(String::new(), 5);
        let solar = solar::SolarSunset::new(config.latitude, config.longitude);
        let instant = solar
            .sunset_utc_on(Local::now().date_naive())
            .unwrap()
            .with_nanosecond(0)
            .unwrap();

        let body = api_body_for(instant, chrono_tz::America::Jamaica);
        let app = Router::new().route("/json", get(move || async move { Json(body) }));
        config.sunset_api_url = spawn_api(app).await;
        let api = SunsetSource::from_config(&config).unwrap();

        config.sunset_source = SunsetSourceKind::Solar;
        let solar = SunsetSource::from_config(&config).unwrap();

        let from_api = api.sunset_time().await.unwrap();
        let from_solar = solar.sunset_time().await.unwrap();
        let diff = (from_api - from_solar).num_seconds().abs();
        assert!(diff <= 1, "api {from_api} vs solar {from_solar}");
    }

    #[tokio::test]
    async fn api_error_status_is_upstream_failure() {
        let app = Router::new().route(
            "/json",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let url = spawn_api(app).await;
        let source = SunsetSource::from_config(&test_config(url, 5)).unwrap();

        let err = source.sunset_time().await.unwrap_err();
        assert!(matches!(err, ControlError::UpstreamLookupFailure(_)));
    }

    #[tokio::test]
    async fn api_malformed_body_is_upstream_failure() {
        let app = Router::new().route("/json", get(|| async { "<html>nope</html>" }));
        let url = spawn_api(app).await;
        let source = SunsetSource::from_config(&test_config(url, 5)).unwrap();

        let err = source.sunset_time().await.unwrap_err();
        assert!(matches!(err, ControlError::UpstreamLookupFailure(_)));
    }

    #[tokio::test]
    async fn slow_api_times_out() {
        let app = Router::new().route(
            "/json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let url = spawn_api(app).await;
        let source = SunsetSource::from_config(&test_config(url, 1)).unwrap();

        let err = source.sunset_time().await.unwrap_err();
        assert!(matches!(err, ControlError::UpstreamLookupFailure(_)));
    }

    #[tokio::test]
    async fn solar_source_needs_no_network() {
        let mut config = test_config("http://127.0.0.1:9/unused".into(), 1);
        config.sunset_source = SunsetSourceKind::Solar;
        let source = SunsetSource::from_config(&config).unwrap();

        assert!(source.sunset_time().await.is_ok());
    }
}
