use foundation::math::GeoPosition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flight route record as published by the route feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightRouteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub way_points: Vec<WayPointRecord>,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WayPointRecord {
    pub coords: CoordsRecord,
}

/// Waypoint coordinates: either a `[lat, lon]` pair or a `{lat, lng}` object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CoordsRecord {
    Pair([f64; 2]),
    LatLng { lat: f64, lng: f64 },
}

impl CoordsRecord {
    pub fn position(&self) -> GeoPosition {
        match *self {
            CoordsRecord::Pair([lat, lon]) => GeoPosition::new(lat, lon),
            CoordsRecord::LatLng { lat, lng } => GeoPosition::new(lat, lng),
        }
    }
}

impl FlightRouteRecord {
    pub fn waypoint_positions(&self) -> Vec<GeoPosition> {
        self.way_points.iter().map(|w| w.coords.position()).collect()
    }
}

#[derive(Debug)]
pub enum RouteRecordError {
    Json(serde_json::Error),
}

impl std::fmt::Display for RouteRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteRecordError::Json(e) => write!(f, "invalid flight route payload: {e}"),
        }
    }
}

impl std::error::Error for RouteRecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteRecordError::Json(e) => Some(e),
        }
    }
}

pub fn flight_routes_from_str(payload: &str) -> Result<Vec<FlightRouteRecord>, RouteRecordError> {
    serde_json::from_str(payload).map_err(RouteRecordError::Json)
}

pub fn flight_routes_from_value(value: Value) -> Result<Vec<FlightRouteRecord>, RouteRecordError> {
    serde_json::from_value(value).map_err(RouteRecordError::Json)
}
