use std::str::FromStr;

use anyhow::{Context, Result};

/// Origins the hub's web client is served from.
const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:8000,\
https://simple-smart-hub-client.netlify.app,\
http://192.168.102.46:8000";

// ---------------------------------------------------------------------------
// SunsetSourceKind
// ---------------------------------------------------------------------------

/// Where `"sunset"` light schedules get their start time from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunsetSourceKind {
    /// Remote sunrisesunset.io-compatible JSON API.
    Api,
    /// Local solar calculation, no network access.
    Solar,
}

impl FromStr for SunsetSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "api" => Ok(Self::Api),
            "solar" => Ok(Self::Solar),
            other => Err(anyhow::anyhow!("unknown sunset source: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Readings and preferences are kept in
    /// memory when unset.
    pub database_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub sunset_source: SunsetSourceKind,
    pub sunset_api_url: String,
    /// Upper bound on a single sunset lookup, in seconds.
    pub sunset_timeout_secs: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Format: `"origin1,origin2"`.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            sunset_source: optional("SUNSET_SOURCE", "api")
                .parse()
                .context("SUNSET_SOURCE must be 'api' or 'solar'")?,
            sunset_api_url: optional("SUNSET_API_URL", "https://api.sunrisesunset.io/json"),
            sunset_timeout_secs: optional("SUNSET_TIMEOUT_SECS", "10")
                .parse()
                .context("SUNSET_TIMEOUT_SECS must be a positive integer")?,
            latitude: parse_coordinate(&optional("LATITUDE", "17.97787"), 90.0)
                .context("LATITUDE must be a number between -90 and 90")?,
            longitude: parse_coordinate(&optional("LONGITUDE", "-76.77339"), 180.0)
                .context("LONGITUDE must be a number between -180 and 180")?,
            cors_origins: parse_list(&optional("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }
}

fn parse_coordinate(raw: &str, bound: f64) -> Result<f64> {
    let value: f64 = raw.trim().parse()?;
    if !(-bound..=bound).contains(&value) {
        anyhow::bail!("coordinate {value} outside ±{bound}");
    }
    Ok(value)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sunset_source_from_str() {
        assert_eq!("api".parse::<SunsetSourceKind>().unwrap(), SunsetSourceKind::Api);
        assert_eq!("solar".parse::<SunsetSourceKind>().unwrap(), SunsetSourceKind::Solar);
    }

    #[test]
    fn sunset_source_unknown_errors() {
        let err = "moon".parse::<SunsetSourceKind>().unwrap_err();
        assert!(err.to_string().contains("unknown sunset source"));
    }

    #[test]
    fn parse_list_skips_blanks_and_trims() {
        assert_eq!(
            parse_list(" http://a , ,http://b,"),
            vec!["http://a".to_owned(), "http://b".to_owned()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn default_cors_origins_are_three() {
        let origins = parse_list(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 3);
        assert!(origins.contains(&"https://simple-smart-hub-client.netlify.app".to_owned()));
    }

    #[test]
    fn parse_coordinate_bounds() {
        assert_eq!(parse_coordinate("17.97787", 90.0).unwrap(), 17.97787);
        assert_eq!(parse_coordinate(" -76.77339 ", 180.0).unwrap(), -76.77339);
        assert!(parse_coordinate("91", 90.0).is_err());
        assert!(parse_coordinate("north", 90.0).is_err());
    }
}
