use foundation::math::GeoPosition;
use serde_json::{Map, Value};

/// One point feature as delivered by a station feed.
///
/// `position` is `None` when the feature carries no geometry; the collection
/// still parses and the marker build decides what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<String>,
    pub position: Option<GeoPosition>,
    pub properties: Map<String, Value>,
}

impl GeoFeature {
    pub fn point(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            id: None,
            position: Some(GeoPosition::new(lat_deg, lon_deg)),
            properties: Map::new(),
        }
    }

    pub fn without_position() -> Self {
        Self {
            id: None,
            position: None,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeoFeatureCollection {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug)]
pub enum FeatureCollectionError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for FeatureCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureCollectionError::Json(e) => write!(f, "JSON parse error: {e}"),
            FeatureCollectionError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            FeatureCollectionError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for FeatureCollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeatureCollectionError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl GeoFeatureCollection {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureCollectionError> {
        let value: Value = serde_json::from_str(payload).map_err(FeatureCollectionError::Json)?;
        Self::from_geojson_value(&value)
    }

    /// Accepts a FeatureCollection of Point features. A feature whose
    /// geometry or Point coordinates are missing or null parses with
    /// `position: None`; any other geometry type is an error.
    pub fn from_geojson_value(value: &Value) -> Result<Self, FeatureCollectionError> {
        let raw_features = value
            .as_object()
            .filter(|obj| obj.get("type").and_then(Value::as_str) == Some("FeatureCollection"))
            .and_then(|obj| obj.get("features"))
            .and_then(Value::as_array)
            .ok_or(FeatureCollectionError::NotAFeatureCollection)?;

        let features = raw_features
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                parse_feature(raw)
                    .map_err(|reason| FeatureCollectionError::InvalidFeature { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }
}

fn parse_feature(raw: &Value) -> Result<GeoFeature, String> {
    let Some(fields) = raw.as_object() else {
        return Err("feature must be an object".to_string());
    };
    match fields.get("type").and_then(Value::as_str) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }

    let id = match fields.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let position = match fields.get("geometry") {
        None | Some(Value::Null) => None,
        Some(geometry) => point_position(geometry)?,
    };
    let properties = match fields.get("properties") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    Ok(GeoFeature {
        id,
        position,
        properties,
    })
}

/// `Ok(None)` when the Point carries no coordinates.
fn point_position(geometry: &Value) -> Result<Option<GeoPosition>, String> {
    let Some(fields) = geometry.as_object() else {
        return Err("geometry must be an object".to_string());
    };
    match fields.get("type").and_then(Value::as_str) {
        Some("Point") => {}
        Some(other) => return Err(format!("unsupported geometry type: {other}")),
        None => return Err("geometry missing type".to_string()),
    }

    let coords = match fields.get("coordinates") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(coords)) => coords,
        Some(_) => return Err("Point coordinates must be an array".to_string()),
    };
    match coords.as_slice() {
        [lon, lat, ..] => {
            let lon = lon.as_f64().ok_or("Point lon must be a number".to_string())?;
            let lat = lat.as_f64().ok_or("Point lat must be a number".to_string())?;
            Ok(Some(GeoPosition::new(lat, lon)))
        }
        _ => Err("Point coordinates must have [lon, lat]".to_string()),
    }
}
