use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geocode::AreaId;

/// Default Overpass interpreter endpoint.
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Decoded Overpass response. Elements are kept as raw JSON values so that
/// persisting them writes back exactly what the server sent.
#[derive(Debug, Clone, Deserialize)]
pub struct WaterwayResponse {
    pub elements: Vec<Value>,
}

/// Client for the map-query collaborator.
pub struct Overpass {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl Overpass {
    pub fn new() -> Self {
        Self::with_endpoint(OVERPASS_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch all ways of the two given waterway types inside the search
    /// area, with full geometry. One request, one attempt; a non-success
    /// status or a body without an `elements` array aborts the pipeline.
    pub fn fetch_waterways(
        &self,
        area: AreaId,
        kind_a: &str,
        kind_b: &str,
    ) -> Result<WaterwayResponse> {
        let query = waterway_query(area, kind_a, kind_b);
        tracing::debug!(%area, kind_a, kind_b, "querying overpass");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

impl Default for Overpass {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the Overpass QL query combining both waterway type filters.
fn waterway_query(area: AreaId, kind_a: &str, kind_b: &str) -> String {
    format!(
        "[out:json];\n\
         area({area})->.searchArea;\n\
         (\n\
         way[\"waterway\"={kind_a}](area.searchArea);\n\
         way[\"waterway\"={kind_b}](area.searchArea);\n\
         );\n\
         out geom;"
    )
}
