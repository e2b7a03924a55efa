//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query string of `GET /v1/match.json`.
///
/// Both fields stay raw strings so that missing and malformed values can be
/// reported separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl MatchParams {
    /// Parse into `(lon, lat)` degrees.
    pub fn coordinates(&self) -> Result<(f64, f64), ParamsError> {
        let (Some(lat), Some(lon)) = (&self.lat, &self.lon) else {
            return Err(ParamsError::Missing);
        };

        let lat: f64 = lat.trim().parse().map_err(|_| ParamsError::NotNumeric)?;
        let lon: f64 = lon.trim().parse().map_err(|_| ParamsError::NotNumeric)?;
        Ok((lon, lat))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("lat and lon required")]
    Missing,
    #[error("lat and lon must be numbers")]
    NotNumeric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perf {
    pub match_time_ms: f64,
}

/// Body of a successful match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Canonical identifiers of every containing district, roots first
    pub ocdids: Vec<String>,
    pub perf: Perf,
}
