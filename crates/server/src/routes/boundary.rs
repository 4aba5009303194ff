//! Region boundary route.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::geojson::{BoundaryProperties, Feature, parse_geometry};
use crate::state::AppState;

/// Create the boundary router.
pub fn router() -> Router<AppState> {
    Router::new().route("/boundary", get(boundary))
}

/// Query parameters for `/boundary`.
#[derive(Debug, Deserialize)]
struct BoundaryQuery {
    region: Option<String>,
}

/// Return the named region's boundary as a GeoJSON feature.
async fn boundary(
    State(state): State<AppState>,
    Query(params): Query<BoundaryQuery>,
) -> Result<Json<Feature<BoundaryProperties>>, AppError> {
    let region = params
        .region
        .filter(|r| !r.is_empty())
        .ok_or(AppError::MissingParameter("region"))?;

    let row = state
        .store()
        .lookup_region(&region)
        .await?
        .ok_or_else(|| AppError::UnknownRegion(region.clone()))?;

    let geometry = parse_geometry(&row.geometry).map_err(|source| AppError::Geometry {
        subject: format!("region {}", row.name),
        source,
    })?;

    Ok(Json(Feature {
        properties: BoundaryProperties { name: row.name },
        geometry,
    }))
}
