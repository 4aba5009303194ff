//! GeoJSON output types and the row serializer.
//!
//! Rows arrive from the store with their geometry as the raw text payload
//! produced by `ST_AsGeoJSON`; serialization parses that payload into a
//! typed `Geometry`, so a malformed payload fails the request instead of
//! leaking through to the map client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::PoiRow;

/// A GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// A GeoJSON feature; `P` is the properties payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub struct Feature<P> {
    pub properties: P,
    pub geometry: Geometry,
}

/// Properties carried by a POI feature.
#[derive(Debug, Clone, Serialize)]
pub struct PoiProperties {
    pub id: i64,
    pub name: Option<String>,
    pub tags: HashMap<String, String>,
}

/// Properties carried by a boundary feature.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryProperties {
    pub name: String,
}

/// A GeoJSON feature collection; feature order matches input row order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature<PoiProperties>>,
}

/// Parse an `ST_AsGeoJSON` payload.
pub fn parse_geometry(payload: &str) -> Result<Geometry, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Map store rows to a feature collection, preserving row order.
///
/// An empty row list is a valid empty collection. A geometry payload that
/// fails to parse aborts the whole response; partial output is never
/// returned.
pub fn serialize_rows(rows: Vec<PoiRow>) -> Result<FeatureCollection, AppError> {
    let features = rows
        .into_iter()
        .map(|row| {
            let geometry = parse_geometry(&row.geometry).map_err(|source| AppError::Geometry {
                subject: format!("poi {}", row.id),
                source,
            })?;

            Ok(Feature {
                properties: PoiProperties {
                    id: row.id,
                    name: row.name,
                    tags: row.tags.0,
                },
                geometry,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(FeatureCollection { features })
}
