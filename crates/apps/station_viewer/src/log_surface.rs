//! Headless surface and playback engine that only log what they are asked to
//! draw. The CLI runs sessions against these.

use foundation::IdAllocator;
use foundation::math::GeoPosition;
use layers::{
    CircleOverlay, EngineError, LayerId, LayerSpec, MapSurface, Marker, OverlayId,
    PathDescriptor, PathEngine, PlaybackId,
};
use tracing::info;

#[derive(Debug, Default)]
pub struct LogSurface {
    ids: IdAllocator,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapSurface for LogSurface {
    fn add_layer(&mut self, layer: &LayerSpec) -> LayerId {
        let id = LayerId(self.ids.next_id());
        match layer {
            LayerSpec::Tiles(tiles) => info!(
                layer = %id.0,
                url = %tiles.url_template,
                max_zoom = tiles.max_zoom,
                attribution = %tiles.attribution,
                "add tile layer"
            ),
            LayerSpec::MarkerBatch => info!(layer = %id.0, "add marker sublayer"),
        }
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        info!(layer = %layer.0, "remove layer");
    }

    fn add_marker_batch(&mut self, sublayer: LayerId, markers: &[Marker]) {
        info!(sublayer = %sublayer.0, markers = markers.len(), "add marker batch");
        for marker in markers {
            info!(
                id = %marker.id,
                at = %marker.position.key(),
                label = %marker.label,
                icon = marker.icon.url,
                popup = marker.popup.is_some(),
                "  marker"
            );
        }
    }

    fn remove_marker(&mut self, sublayer: LayerId, marker: &Marker) {
        info!(sublayer = %sublayer.0, id = %marker.id, "remove marker");
    }

    fn close_marker_popups(&mut self, marker: &Marker) {
        info!(id = %marker.id, "close popups");
    }

    fn add_overlay(&mut self, circle: &CircleOverlay) -> OverlayId {
        let id = OverlayId(self.ids.next_id());
        info!(
            overlay = %id.0,
            category = %circle.category,
            center = %circle.center.key(),
            radius_m = circle.radius_m,
            color = circle.style.color,
            "add range circle"
        );
        id
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        info!(overlay = %overlay.0, "remove range circle");
    }

    fn set_view(&mut self, center: GeoPosition, zoom: u8) {
        info!(center = %center.key(), zoom, "set view");
    }
}

#[derive(Debug, Default)]
pub struct LogEngine {
    ids: IdAllocator,
}

impl LogEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathEngine for LogEngine {
    fn start(&mut self, path: &PathDescriptor) -> Result<PlaybackId, EngineError> {
        let (Some(first), Some(last)) = (path.waypoints.first(), path.waypoints.last()) else {
            return Err(EngineError::new("empty path"));
        };
        let id = PlaybackId(self.ids.next_id());
        info!(
            playback = %id.0,
            from = %first.key(),
            to = %last.key(),
            waypoints = path.waypoints.len(),
            speed = path.speed,
            color = path.style.line_color,
            "start path playback"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{LogEngine, LogSurface};
    use foundation::math::GeoPosition;
    use layers::{LayerSpec, MapSurface, MotionStyle, PathDescriptor, PathEngine, TileLayerSpec};

    #[test]
    fn surface_hands_out_distinct_ids() {
        let mut surface = LogSurface::new();
        let a = surface.add_layer(&LayerSpec::Tiles(TileLayerSpec::default()));
        let b = surface.add_layer(&LayerSpec::MarkerBatch);
        assert_ne!(a, b);
    }

    #[test]
    fn engine_rejects_an_empty_path() {
        let mut engine = LogEngine::new();
        let empty = PathDescriptor {
            waypoints: Vec::new(),
            speed: 1.0,
            style: MotionStyle::default(),
        };
        assert!(engine.start(&empty).is_err());

        let path = PathDescriptor {
            waypoints: vec![GeoPosition::new(0.0, 0.0), GeoPosition::new(1.0, 1.0)],
            ..empty
        };
        assert!(engine.start(&path).is_ok());
    }
}
