//! POI lookup route.
//!
//! The one place the full pipeline runs: validate → registry lookup →
//! predicate compile → filter compose → store query → serialize. Registry
//! and compiler failures surface before the store is touched; any stage
//! failure short-circuits to an error response.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::filter::{self, TAG_PARAM_START};
use crate::geojson::{self, FeatureCollection};
use crate::predicate;
use crate::state::AppState;

/// Create the POI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/pois", get(pois))
}

/// Query parameters for `/pois`.
#[derive(Debug, Deserialize)]
struct PoiQuery {
    region: Option<String>,
    category: Option<String>,
}

/// Return the POIs inside `region` matching `category`.
///
/// An unknown region simply matches no boundary row and yields an empty
/// collection; only an unknown category is a validation error here.
async fn pois(
    State(state): State<AppState>,
    Query(params): Query<PoiQuery>,
) -> Result<Json<FeatureCollection>, AppError> {
    let region = params
        .region
        .filter(|r| !r.is_empty())
        .ok_or(AppError::MissingParameter("region"))?;
    let category = params
        .category
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingParameter("category"))?;

    let rules = state
        .registry()
        .lookup(&category)
        .ok_or_else(|| AppError::UnknownCategory(category.clone()))?;

    let predicate = predicate::compile(rules, TAG_PARAM_START)?;
    let query = filter::compose(&region, &predicate, state.relation());

    tracing::debug!(region = %region, category = %category, "running POI query");
    let rows = state
        .store()
        .query_points(&query.clause, &query.params)
        .await?;

    Ok(Json(geojson::serialize_rows(rows)?))
}
