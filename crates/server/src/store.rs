//! Spatial store collaborator.
//!
//! The query pipeline compiles a filter clause plus positional parameters;
//! this module owns the seam to the PostGIS database executing it. Handlers
//! depend on the `SpatialStore` trait, so tests substitute an in-memory
//! store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::error::AppError;

/// A matched POI row. `geometry` is the raw `ST_AsGeoJSON` payload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PoiRow {
    pub id: i64,
    pub name: Option<String>,
    pub tags: Json<HashMap<String, String>>,
    pub geometry: String,
}

/// A region boundary row. `geometry` is the raw `ST_AsGeoJSON` payload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegionRow {
    pub name: String,
    pub geometry: String,
}

/// The spatial data store.
#[async_trait]
pub trait SpatialStore: Send + Sync {
    /// Fetch a region boundary by name.
    async fn lookup_region(&self, name: &str) -> Result<Option<RegionRow>, AppError>;

    /// Run a compiled filter over the POI table.
    ///
    /// `clause` comes from the filter composer only; caller-supplied values
    /// travel exclusively through `params`, bound as `$1`, `$2`, … in order.
    async fn query_points(
        &self,
        clause: &str,
        params: &[String],
    ) -> Result<Vec<PoiRow>, AppError>;

    /// Whether the store is reachable.
    async fn healthy(&self) -> bool;
}

/// PostGIS-backed store.
pub struct PgSpatialStore {
    pool: PgPool,
}

impl PgSpatialStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpatialStore for PgSpatialStore {
    async fn lookup_region(&self, name: &str) -> Result<Option<RegionRow>, AppError> {
        let row = sqlx::query_as::<_, RegionRow>(
            "SELECT b.name, ST_AsGeoJSON(b.geom) AS geometry \
             FROM boundaries AS b WHERE b.name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn query_points(
        &self,
        clause: &str,
        params: &[String],
    ) -> Result<Vec<PoiRow>, AppError> {
        let sql = format!(
            "SELECT p.id, p.name, p.tags, ST_AsGeoJSON(p.geom) AS geometry \
             FROM pois AS p WHERE {clause}"
        );

        let mut query = sqlx::query_as::<_, PoiRow>(&sql);
        for param in params {
            query = query.bind(param);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
