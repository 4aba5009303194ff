//! Geospatial filter composition.
//!
//! Combines a region boundary relation with a compiled tag predicate into
//! one WHERE clause the store can bind positionally: the region name is
//! always `$1`, the tag predicate's placeholders follow with no gap.

use std::str::FromStr;

use crate::predicate::TagPredicate;

/// Placeholder index of the region name in a composed filter.
pub const REGION_PARAM_INDEX: usize = 1;

/// First placeholder index available to the tag predicate.
pub const TAG_PARAM_START: usize = REGION_PARAM_INDEX + 1;

/// Spatial relation between a POI point and the region polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialRelation {
    /// Point strictly inside the region polygon.
    Contains,

    /// Point inside or on the region boundary.
    #[default]
    Intersects,
}

impl SpatialRelation {
    /// Render the PostGIS call for this relation.
    ///
    /// `ST_Contains(region, point)` excludes points on the boundary;
    /// `ST_Intersects(point, region)` includes them.
    fn sql(self, point: &str, region: &str) -> String {
        match self {
            Self::Contains => format!("ST_Contains({region}, {point})"),
            Self::Intersects => format!("ST_Intersects({point}, {region})"),
        }
    }
}

impl FromStr for SpatialRelation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "intersects" => Ok(Self::Intersects),
            other => Err(format!("unknown spatial relation {other:?}")),
        }
    }
}

/// A composed filter ready for the store: clause text plus positional
/// parameter values, region name first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoQuery {
    pub clause: String,
    pub params: Vec<String>,
}

/// Combine the region boundary relation with a compiled tag predicate.
///
/// The predicate must have been compiled with `TAG_PARAM_START` so its
/// placeholders follow the region name contiguously.
pub fn compose(region: &str, predicate: &TagPredicate, relation: SpatialRelation) -> GeoQuery {
    let boundary =
        format!("(SELECT b.geom FROM boundaries AS b WHERE b.name = ${REGION_PARAM_INDEX})");
    let spatial = relation.sql("p.geom", &boundary);

    let mut params = Vec::with_capacity(1 + predicate.params.len());
    params.push(region.to_string());
    params.extend(predicate.params.iter().cloned());

    GeoQuery {
        clause: format!("{spatial} AND ({})", predicate.clause),
        params,
    }
}
