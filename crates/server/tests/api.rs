//! Router-level tests driving the HTTP surface with an in-memory store.

// Tests are allowed to use unwrap/expect freely.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use poimap_server::error::AppError;
use poimap_server::filter::SpatialRelation;
use poimap_server::registry::CategoryRegistry;
use poimap_server::routes;
use poimap_server::state::AppState;
use poimap_server::store::{PoiRow, RegionRow, SpatialStore};

/// In-memory store with canned rows and a query call counter.
struct MockStore {
    regions: HashMap<String, RegionRow>,
    rows: Vec<PoiRow>,
    fail: bool,
    query_calls: AtomicUsize,
}

impl MockStore {
    fn new(regions: HashMap<String, RegionRow>, rows: Vec<PoiRow>) -> Arc<Self> {
        Arc::new(Self {
            regions,
            rows,
            fail: false,
            query_calls: AtomicUsize::new(0),
        })
    }

    fn with_rows(rows: Vec<PoiRow>) -> Arc<Self> {
        Self::new(HashMap::new(), rows)
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            regions: HashMap::new(),
            rows: Vec::new(),
            fail: true,
            query_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SpatialStore for MockStore {
    async fn lookup_region(&self, name: &str) -> Result<Option<RegionRow>, AppError> {
        if self.fail {
            return Err(AppError::Internal(anyhow::anyhow!("store down")));
        }
        Ok(self.regions.get(name).cloned())
    }

    async fn query_points(
        &self,
        clause: &str,
        params: &[String],
    ) -> Result<Vec<PoiRow>, AppError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Internal(anyhow::anyhow!("store down")));
        }
        // The composed filter always carries the region as $1.
        assert!(clause.contains("$1"));
        assert!(!params.is_empty());
        Ok(self.rows.clone())
    }

    async fn healthy(&self) -> bool {
        !self.fail
    }
}

fn poi_row(id: i64, name: &str, lon: f64, lat: f64) -> PoiRow {
    PoiRow {
        id,
        name: Some(name.to_string()),
        tags: sqlx::types::Json(HashMap::from([(
            "shop".to_string(),
            "supermarket".to_string(),
        )])),
        geometry: format!(r#"{{"type":"Point","coordinates":[{lon},{lat}]}}"#),
    }
}

fn cordoba_region() -> (String, RegionRow) {
    (
        "Cordoba".to_string(),
        RegionRow {
            name: "Cordoba".to_string(),
            geometry: r#"{"type":"MultiPolygon","coordinates":[[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]]}"#
                .to_string(),
        },
    )
}

fn app_with(store: Arc<MockStore>) -> Router {
    routes::router(AppState::with_store(
        CategoryRegistry::builtin(),
        SpatialRelation::Intersects,
        store,
    ))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

// -------------------------------------------------------------------------
// /pois
// -------------------------------------------------------------------------

#[tokio::test]
async fn pois_returns_features_in_row_order() {
    let store = MockStore::with_rows(vec![
        poi_row(10, "Mercado Norte", -64.18, -31.41),
        poi_row(7, "Disco", -64.19, -31.42),
    ]);
    let app = app_with(store);

    let (status, body) = get_json(app, "/pois?region=Cordoba&category=supermarkets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");

    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["id"], 10);
    assert_eq!(features[1]["properties"]["id"], 7);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["properties"]["tags"]["shop"], "supermarket");
}

#[tokio::test]
async fn pois_empty_result_is_valid_empty_collection() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/pois?region=Nowhere&category=supermarkets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"type": "FeatureCollection", "features": []})
    );
}

#[tokio::test]
async fn pois_missing_region_is_bad_request() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/pois?category=supermarkets").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("region"));
}

#[tokio::test]
async fn pois_missing_category_is_bad_request() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/pois?region=Cordoba").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("category"));
}

#[tokio::test]
async fn pois_unknown_category_is_bad_request_and_skips_store() {
    let store = MockStore::with_rows(vec![poi_row(1, "x", 0.0, 0.0)]);
    let app = app_with(store.clone());

    let (status, body) = get_json(app, "/pois?region=Cordoba&category=florists").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("florists"));
    assert_eq!(store.query_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pois_store_failure_is_generic_internal_error() {
    let app = app_with(MockStore::failing());

    let (status, body) = get_json(app, "/pois?region=Cordoba&category=supermarkets").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn pois_malformed_geometry_is_internal_error() {
    let mut bad = poi_row(3, "broken", 0.0, 0.0);
    bad.geometry = "not geojson".to_string();
    let app = app_with(MockStore::with_rows(vec![
        poi_row(1, "fine", 0.0, 0.0),
        bad,
    ]));

    let (status, body) = get_json(app, "/pois?region=Cordoba&category=supermarkets").await;

    // No partial output: the whole response fails.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

// -------------------------------------------------------------------------
// /boundary
// -------------------------------------------------------------------------

#[tokio::test]
async fn boundary_returns_region_feature() {
    let (name, row) = cordoba_region();
    let app = app_with(MockStore::new(HashMap::from([(name, row)]), Vec::new()));

    let (status, body) = get_json(app, "/boundary?region=Cordoba").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["properties"]["name"], "Cordoba");
    assert_eq!(body["geometry"]["type"], "MultiPolygon");
}

#[tokio::test]
async fn boundary_unknown_region_is_bad_request() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/boundary?region=Atlantis").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn boundary_missing_region_is_bad_request() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/boundary").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("region"));
}

// -------------------------------------------------------------------------
// /categories and /health
// -------------------------------------------------------------------------

#[tokio::test]
async fn categories_lists_builtin_table() {
    let app = app_with(MockStore::with_rows(Vec::new()));

    let (status, body) = get_json(app, "/categories").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    let supermarkets = entries
        .iter()
        .find(|e| e["id"] == "supermarkets")
        .unwrap();
    assert_eq!(supermarkets["rules"][0]["key"], "shop");
    assert_eq!(supermarkets["rules"][0]["value"], "supermarket");

    // Wildcard rules serialize without a value.
    let offices = entries.iter().find(|e| e["id"] == "offices").unwrap();
    assert_eq!(offices["rules"][0]["key"], "office");
    assert!(offices["rules"][0].get("value").is_none());
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = app_with(MockStore::with_rows(Vec::new()));
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["postgres"], true);

    let app = app_with(MockStore::failing());
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}
