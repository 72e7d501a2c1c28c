use foundation::math::GeoPosition;

use crate::category::Category;
use crate::layer::{LayerId, LayerSpec, OverlayId};
use crate::marker::Marker;
use crate::symbology::CircleStyle;

/// Range ring drawn around one shown marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOverlay {
    pub category: Category,
    pub center: GeoPosition,
    pub radius_m: f64,
    pub style: CircleStyle,
}

/// Boundary to the map canvas.
///
/// The surface is opaque: it draws what it is given and hands back ids for
/// later removal. Calls never fail from the caller's point of view.
pub trait MapSurface {
    fn add_layer(&mut self, layer: &LayerSpec) -> LayerId;

    fn remove_layer(&mut self, layer: LayerId);

    /// Adds markers to the shared batching sublayer in one call.
    fn add_marker_batch(&mut self, sublayer: LayerId, markers: &[Marker]);

    fn remove_marker(&mut self, sublayer: LayerId, marker: &Marker);

    /// Closes any popup or tooltip the operator opened on `marker`.
    fn close_marker_popups(&mut self, _marker: &Marker) {}

    fn add_overlay(&mut self, circle: &CircleOverlay) -> OverlayId;

    fn remove_overlay(&mut self, overlay: OverlayId);

    fn set_view(&mut self, _center: GeoPosition, _zoom: u8) {}
}
