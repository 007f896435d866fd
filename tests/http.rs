//! Collaborator-facing tests: the geocoding and map-query clients are
//! exercised against a local mock server.

use mockito::Matcher;

use waterways::{AreaId, Error, GeoTable, Geocoder, Overpass, Provenance};

const GEOCODE_BODY: &str = r#"[
    {"osm_type": "way", "osm_id": 99, "display_name": "Osaka Street"},
    {"osm_type": "relation", "osm_id": 12345, "display_name": "Osaka"},
    {"osm_type": "relation", "osm_id": 67890, "display_name": "Osaka Prefecture"}
]"#;

const OVERPASS_BODY: &str = r#"{"elements": [
    {"type": "way", "id": 1,
     "tags": {"waterway": "river", "source": "KSJ2"},
     "geometry": [{"lat": 35.0, "lon": 139.0}, {"lat": 35.1, "lon": 139.1}]}
]}"#;

#[test]
fn resolver_picks_the_first_relation_and_applies_the_offset() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(GEOCODE_BODY)
        .create();

    let area = Geocoder::with_endpoint(format!("{}/search", server.url()))
        .resolve_area("Osaka")
        .unwrap();
    assert_eq!(area, AreaId(3_600_000_012_345));
}

#[test]
fn resolver_fails_when_no_candidate_is_a_relation() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"osm_type": "way", "osm_id": 99, "display_name": "A Street"}]"#)
        .create();

    let err = Geocoder::with_endpoint(format!("{}/search", server.url()))
        .resolve_area("Nowhere")
        .unwrap_err();
    match err {
        Error::Resolution(place) => assert_eq!(place, "Nowhere"),
        other => panic!("expected a resolution error, got {:?}", other),
    }
}

#[test]
fn resolver_surfaces_non_success_statuses() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let err = Geocoder::with_endpoint(format!("{}/search", server.url()))
        .resolve_area("Osaka")
        .unwrap_err();
    assert!(matches!(err, Error::Fetch { status: 503 }));
}

#[test]
fn fetcher_decodes_the_element_list() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/interpreter")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(OVERPASS_BODY)
        .create();

    let response = Overpass::with_endpoint(format!("{}/api/interpreter", server.url()))
        .fetch_waterways(AreaId(3_600_000_012_345), "river", "canal")
        .unwrap();
    assert_eq!(response.elements.len(), 1);
}

#[test]
fn fetcher_surfaces_non_success_statuses() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/interpreter")
        .match_query(Matcher::Any)
        .with_status(504)
        .create();

    let err = Overpass::with_endpoint(format!("{}/api/interpreter", server.url()))
        .fetch_waterways(AreaId(3_600_000_012_345), "river", "canal")
        .unwrap_err();
    assert!(matches!(err, Error::Fetch { status: 504 }));
}

#[test]
fn fetcher_rejects_bodies_without_an_element_list() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/interpreter")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"version": 0.6, "remark": "runtime error"}"#)
        .create();

    let err = Overpass::with_endpoint(format!("{}/api/interpreter", server.url()))
        .fetch_waterways(AreaId(3_600_000_012_345), "river", "canal")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[test]
fn mocked_city_flows_from_geocode_to_geo_table() {
    let mut server = mockito::Server::new();
    let _geocode = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(GEOCODE_BODY)
        .create();
    let _overpass = server
        .mock("GET", "/api/interpreter")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(OVERPASS_BODY)
        .create();

    let area = Geocoder::with_endpoint(format!("{}/search", server.url()))
        .resolve_area("Osaka")
        .unwrap();
    assert_eq!(area, AreaId(3_600_000_012_345));

    let response = Overpass::with_endpoint(format!("{}/api/interpreter", server.url()))
        .fetch_waterways(area, "river", "canal")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = waterways::persist(&response, dir.path(), "osaka").unwrap();
    let table = GeoTable::from_records(&file).unwrap();

    assert_eq!(table.len(), 1);
    let feature = &table.features()[0];
    assert_eq!(feature.source, Provenance::Ksj2);
    assert_eq!(feature.layer, "0");
    let coords: Vec<(f64, f64)> = feature
        .geometry
        .as_ref()
        .unwrap()
        .coords()
        .map(|c| (c.x, c.y))
        .collect();
    assert_eq!(coords, vec![(139.0, 35.0), (139.1, 35.1)]);
}
