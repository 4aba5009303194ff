//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::filter::SpatialRelation;
use crate::registry::CategoryRegistry;
use crate::store::{PgSpatialStore, SpatialStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything inside is frozen
/// at startup; requests only read it, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Category id → tag rules.
    registry: CategoryRegistry,

    /// Spatial relation scoping POIs to a region.
    relation: SpatialRelation,

    /// The spatial data store.
    store: Arc<dyn SpatialStore>,
}

impl AppState {
    /// Create application state backed by PostGIS.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        let registry = match &config.categories_file {
            Some(path) => {
                CategoryRegistry::load(path).context("failed to load category registry")?
            }
            None => CategoryRegistry::builtin(),
        };
        info!(categories = registry.len(), "category registry loaded");

        Ok(Self::with_store(
            registry,
            config.spatial_relation,
            Arc::new(PgSpatialStore::new(pool)),
        ))
    }

    /// Assemble state from parts; the seam tests use to substitute an
    /// in-memory store.
    pub fn with_store(
        registry: CategoryRegistry,
        relation: SpatialRelation,
        store: Arc<dyn SpatialStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                relation,
                store,
            }),
        }
    }

    /// Get the category registry.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.inner.registry
    }

    /// Get the configured spatial relation.
    pub fn relation(&self) -> SpatialRelation {
        self.inner.relation
    }

    /// Get the spatial store.
    pub fn store(&self) -> &Arc<dyn SpatialStore> {
        &self.inner.store
    }
}
