use formats::FlightRouteRecord;
use foundation::Id;
use foundation::math::GeoPosition;
use tracing::{info, warn};

use crate::error::LayerError;
use crate::symbology::MotionStyle;

/// Ordered waypoints (at least two) plus playback speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    name: Option<String>,
    waypoints: Vec<GeoPosition>,
    speed: f64,
}

impl Route {
    pub fn new(waypoints: Vec<GeoPosition>, speed: f64) -> Result<Self, LayerError> {
        if waypoints.len() < 2 {
            return Err(LayerError::InvalidRoute(format!(
                "needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }
        if let Some(i) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(LayerError::InvalidRoute(format!(
                "waypoint {i} is not a finite position"
            )));
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(LayerError::InvalidRoute(format!(
                "speed must be positive, got {speed}"
            )));
        }
        Ok(Self {
            name: None,
            waypoints,
            speed,
        })
    }

    pub fn from_record(record: &FlightRouteRecord) -> Result<Self, LayerError> {
        let mut route = Self::new(record.waypoint_positions(), record.speed)?;
        route.name = record.id.clone();
        Ok(route)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn waypoints(&self) -> &[GeoPosition] {
        &self.waypoints
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

/// Everything the playback engine needs to animate one route.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    pub waypoints: Vec<GeoPosition>,
    pub speed: f64,
    pub style: MotionStyle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId(pub Id);

#[derive(Debug, Clone, PartialEq)]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EngineError {}

/// Opaque animated-path player. Interpolation and timing are its business;
/// once started a playback cannot be cancelled.
pub trait PathEngine {
    fn start(&mut self, path: &PathDescriptor) -> Result<PlaybackId, EngineError>;
}

#[derive(Debug, Default, Clone)]
pub struct RouteAnimator {
    style: MotionStyle,
}

impl RouteAnimator {
    pub fn new(style: MotionStyle) -> Self {
        Self { style }
    }

    pub fn describe(&self, route: &Route) -> PathDescriptor {
        PathDescriptor {
            waypoints: route.waypoints.clone(),
            speed: route.speed,
            style: self.style.clone(),
        }
    }

    /// Starts one sequential animation over every waypoint of `route`.
    /// Engine failures come back as `LayerError::Playback`; nothing is retried.
    pub fn play(
        &self,
        route: &Route,
        engine: &mut dyn PathEngine,
    ) -> Result<PlaybackId, LayerError> {
        let path = self.describe(route);
        match engine.start(&path) {
            Ok(id) => {
                info!(
                    playback = %id.0,
                    route = route.name().unwrap_or("unnamed"),
                    waypoints = path.waypoints.len(),
                    speed = path.speed,
                    "route playback started"
                );
                Ok(id)
            }
            Err(e) => {
                warn!(route = route.name().unwrap_or("unnamed"), "route playback failed: {e}");
                Err(LayerError::Playback(e))
            }
        }
    }
}
