//! Category listing route.
//!
//! The registry is configurable, so the map front-end discovers what it
//! may ask for here instead of hardcoding category ids.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Create the categories router.
pub fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

/// One category in the listing.
#[derive(Debug, Serialize)]
struct CategoryEntry {
    id: String,
    rules: Vec<RuleEntry>,
}

/// One tag rule; `value` is absent for wildcard rules.
#[derive(Debug, Serialize)]
struct RuleEntry {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

/// List the configured categories and their tag rules.
async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryEntry>> {
    let mut entries: Vec<CategoryEntry> = state
        .registry()
        .iter()
        .map(|(id, rules)| CategoryEntry {
            id: id.to_string(),
            rules: rules
                .iter()
                .map(|r| RuleEntry {
                    key: r.key.clone(),
                    value: r.value.clone(),
                })
                .collect(),
        })
        .collect();

    // Registry iteration order is arbitrary; keep the listing stable.
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    Json(entries)
}
