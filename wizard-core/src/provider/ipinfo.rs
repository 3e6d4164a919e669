use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    model::{Coordinates, DEFAULT_COORDINATES},
};

use super::{Locator, read_success_body};

/// IP-based geolocation through ipinfo.io.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: String,
}

impl IpInfoLocator {
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            http: Client::new(),
        }
    }

    /// Look up the current position, surfacing every failure.
    pub async fn try_locate(&self) -> Result<Coordinates> {
        let res = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to reach location service: {e}")))?;

        let body = read_success_body(res, "Location").await?;
        let parsed: IpInfoResponse = serde_json::from_str(&body)?;

        parse_loc(&parsed.loc)
    }
}

/// Parse ipinfo's `"<lat>,<lon>"` field.
fn parse_loc(loc: &str) -> Result<Coordinates> {
    let (lat, lon) = loc
        .split_once(',')
        .ok_or_else(|| Error::DataFormat(format!("unexpected loc value '{loc}'")))?;

    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| Error::DataFormat(format!("unexpected loc value '{loc}': {e}")))
    };

    Coordinates::new(parse(lat)?, parse(lon)?)
}

#[async_trait]
impl Locator for IpInfoLocator {
    async fn locate(&self) -> Coordinates {
        match self.try_locate().await {
            Ok(coords) => coords,
            Err(err) => {
                tracing::warn!(error = %err, "Error getting location, using default coordinates");
                DEFAULT_COORDINATES
            }
        }
    }
}
