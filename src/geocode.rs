use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default Nominatim search endpoint.
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Offset Overpass uses to turn a relation id into an area-search id.
pub const AREA_ID_OFFSET: u64 = 3_600_000_000;

/// How many geocode candidates to request per lookup.
const CANDIDATE_LIMIT: &str = "3";

const USER_AGENT: &str = concat!("waterways/", env!("CARGO_PKG_VERSION"));

/// An Overpass search-area id, derived from the numeric id of an
/// administrative boundary relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaId(pub u64);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One geocode match as returned by Nominatim.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub osm_type: String,
    pub osm_id: u64,
    #[serde(default)]
    pub display_name: String,
}

impl Candidate {
    /// The search-area id this candidate's relation maps to.
    pub fn area_id(&self) -> AreaId {
        AreaId(self.osm_id + AREA_ID_OFFSET)
    }
}

/// Client for the geocoding collaborator.
pub struct Geocoder {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_endpoint(NOMINATIM_URL)
    }

    /// Use an alternative search endpoint (a private Nominatim instance,
    /// or a local server in tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Resolve a free-text place name to an Overpass search-area id.
    ///
    /// Requests up to three candidate matches and picks the first one that
    /// Nominatim classified as a relation. Fails with [Error::Resolution]
    /// if no candidate qualifies, so callers never fetch with an undefined
    /// area.
    pub fn resolve_area(&self, place: &str) -> Result<AreaId> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", place), ("format", "jsonv2"), ("limit", CANDIDATE_LIMIT)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
            });
        }

        let candidates: Vec<Candidate> = response
            .json()
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        let relation =
            first_relation(&candidates).ok_or_else(|| Error::Resolution(place.to_string()))?;
        tracing::debug!(place, area = %relation.area_id(), "resolved search area");

        Ok(relation.area_id())
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans candidates in returned order and picks the first relation.
fn first_relation(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().find(|c| c.osm_type == "relation")
}
