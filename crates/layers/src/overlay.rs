use std::collections::BTreeMap;

use foundation::math::{PositionKey, RANGE_RING_NAUTICAL_MILES, nautical_miles_to_meters};
use tracing::debug;

use crate::category::Category;
use crate::error::LayerError;
use crate::layer::OverlayId;
use crate::registry::CategoryLayer;
use crate::surface::{CircleOverlay, MapSurface};
use crate::symbology::CircleStyle;

#[derive(Debug, Clone, PartialEq)]
struct TrackedCircle {
    overlay: OverlayId,
    circle: CircleOverlay,
}

/// Range circles currently on the surface, per category, keyed by the
/// position of the marker they surround.
///
/// Invariant: at most one circle per `(category, PositionKey)`. Markers that
/// share a position share one circle; drawing again replaces the old circle
/// instead of stacking a second one.
#[derive(Debug)]
pub struct OverlayTracker {
    radius_m: f64,
    circles: [BTreeMap<PositionKey, TrackedCircle>; 3],
}

impl Default for OverlayTracker {
    fn default() -> Self {
        Self::with_radius_m(nautical_miles_to_meters(RANGE_RING_NAUTICAL_MILES))
    }
}

impl OverlayTracker {
    pub fn with_radius_m(radius_m: f64) -> Self {
        Self {
            radius_m,
            circles: Default::default(),
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn count(&self, category: Category) -> usize {
        self.circles[category.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.iter().all(BTreeMap::is_empty)
    }

    pub fn circles(&self, category: Category) -> impl Iterator<Item = (&PositionKey, &CircleOverlay)> {
        self.circles[category.index()]
            .iter()
            .map(|(k, t)| (k, &t.circle))
    }

    pub fn overlay_ids(&self, category: Category) -> Vec<OverlayId> {
        self.circles[category.index()]
            .values()
            .map(|t| t.overlay)
            .collect()
    }

    /// Draws a range circle around every marker `layer` has on the surface.
    ///
    /// Fails with `LayerNotActive` and leaves the surface untouched when the
    /// category is hidden or has no markers. Returns the number of circles
    /// tracked for the category afterwards.
    pub fn draw_all(
        &mut self,
        layer: &CategoryLayer,
        style: CircleStyle,
        surface: &mut dyn MapSurface,
    ) -> Result<usize, LayerError> {
        let category = layer.category();
        let Some(markers) = layer.shown_markers().filter(|m| !m.is_empty()) else {
            debug!(%category, "range circles requested for inactive layer");
            return Err(LayerError::LayerNotActive(category));
        };

        let radius_m = self.radius_m;
        let tracked = &mut self.circles[category.index()];
        for marker in markers {
            let key = marker.position.key();
            if let Some(previous) = tracked.remove(&key) {
                debug!(%category, %key, "replacing range circle");
                surface.remove_overlay(previous.overlay);
            }
            let circle = CircleOverlay {
                category,
                center: marker.position,
                radius_m,
                style,
            };
            let overlay = surface.add_overlay(&circle);
            tracked.insert(key, TrackedCircle { overlay, circle });
        }

        debug!(%category, circles = tracked.len(), "range circles drawn");
        Ok(tracked.len())
    }

    /// Removes every tracked circle of `category` from the surface. Returns how
    /// many were removed; zero when nothing was tracked.
    pub fn clear_all(&mut self, category: Category, surface: &mut dyn MapSurface) -> usize {
        let tracked = std::mem::take(&mut self.circles[category.index()]);
        for t in tracked.values() {
            surface.remove_overlay(t.overlay);
        }
        if !tracked.is_empty() {
            debug!(%category, removed = tracked.len(), "range circles cleared");
        }
        tracked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::OverlayTracker;
    use crate::category::Category;
    use crate::error::LayerError;
    use crate::layer::LayerSpec;
    use crate::presentation::{PresentationRule, station_rule};
    use crate::recording::RecordingSurface;
    use crate::registry::CategoryLayer;
    use crate::surface::MapSurface;
    use formats::{GeoFeature, GeoFeatureCollection};

    fn shown_layer(
        surface: &mut RecordingSurface,
        category: Category,
        points: &[(f64, f64)],
    ) -> CategoryLayer {
        let sublayer = surface.add_layer(&LayerSpec::MarkerBatch);
        let mut layer = CategoryLayer::new(category);
        let features = points
            .iter()
            .map(|(lat, lon)| GeoFeature::point(*lat, *lon).with_property("iata", "X"))
            .collect();
        layer
            .load(&GeoFeatureCollection::new(features))
            .expect("load");
        layer.show(sublayer, surface);
        layer
    }

    #[test]
    fn draws_one_circle_per_marker() {
        let mut surface = RecordingSurface::new();
        let layer = shown_layer(&mut surface, Category::AcarsStation, &[(10.0, 20.0), (30.0, 40.0)]);
        let mut tracker = OverlayTracker::default();
        let style = station_rule(Category::AcarsStation).circle_style();

        let n = tracker.draw_all(&layer, style, &mut surface).expect("draw");
        assert_eq!(n, 2);
        assert_eq!(surface.live_overlays().len(), 2);
        assert!(
            surface
                .live_overlays()
                .iter()
                .all(|c| (c.radius_m - 370_399.865).abs() < 0.01 && c.style.color == "#ff6666")
        );
    }

    #[test]
    fn hidden_layer_is_rejected_without_surface_calls() {
        let mut surface = RecordingSurface::new();
        let mut layer = CategoryLayer::new(Category::Airport);
        layer
            .load(&GeoFeatureCollection::new(vec![GeoFeature::point(1.0, 2.0)]))
            .expect("load");
        let before = surface.calls().len();

        let mut tracker = OverlayTracker::default();
        let err = tracker
            .draw_all(&layer, station_rule(Category::Airport).circle_style(), &mut surface)
            .unwrap_err();
        assert_eq!(err, LayerError::LayerNotActive(Category::Airport));
        assert_eq!(surface.calls().len(), before);
        assert_eq!(tracker.count(Category::Airport), 0);
    }

    #[test]
    fn shared_position_keeps_a_single_circle() {
        let mut surface = RecordingSurface::new();
        let layer = shown_layer(&mut surface, Category::VdlStation, &[(5.0, 5.0), (5.0, 5.0)]);
        let mut tracker = OverlayTracker::default();

        let n = tracker
            .draw_all(&layer, station_rule(Category::VdlStation).circle_style(), &mut surface)
            .expect("draw");
        assert_eq!(layer.markers().len(), 2);
        assert_eq!(n, 1);
        assert_eq!(tracker.count(Category::VdlStation), 1);
        assert_eq!(surface.live_overlays().len(), 1);
    }

    #[test]
    fn redraw_replaces_instead_of_stacking() {
        let mut surface = RecordingSurface::new();
        let layer = shown_layer(&mut surface, Category::AcarsStation, &[(1.0, 1.0), (2.0, 2.0)]);
        let mut tracker = OverlayTracker::default();
        let style = station_rule(Category::AcarsStation).circle_style();

        tracker.draw_all(&layer, style, &mut surface).expect("first draw");
        let first_ids = tracker.overlay_ids(Category::AcarsStation);
        tracker.draw_all(&layer, style, &mut surface).expect("second draw");

        assert_eq!(tracker.count(Category::AcarsStation), 2);
        assert_eq!(surface.live_overlays().len(), 2);
        assert!(
            first_ids
                .iter()
                .all(|id| !tracker.overlay_ids(Category::AcarsStation).contains(id))
        );
    }

    #[test]
    fn clear_all_removes_every_circle_and_is_repeatable() {
        let mut surface = RecordingSurface::new();
        let layer = shown_layer(&mut surface, Category::Airport, &[(1.0, 1.0), (2.0, 2.0)]);
        let mut tracker = OverlayTracker::default();
        tracker
            .draw_all(&layer, station_rule(Category::Airport).circle_style(), &mut surface)
            .expect("draw");

        assert_eq!(tracker.clear_all(Category::Airport, &mut surface), 2);
        assert!(surface.live_overlays().is_empty());
        assert!(tracker.is_empty());
        assert_eq!(tracker.clear_all(Category::Airport, &mut surface), 0);
    }

    #[test]
    fn categories_are_tracked_independently() {
        let mut surface = RecordingSurface::new();
        let acars = shown_layer(&mut surface, Category::AcarsStation, &[(1.0, 1.0)]);
        let vdl = shown_layer(&mut surface, Category::VdlStation, &[(1.0, 1.0)]);
        let mut tracker = OverlayTracker::with_radius_m(1_000.0);

        tracker
            .draw_all(&acars, station_rule(Category::AcarsStation).circle_style(), &mut surface)
            .expect("draw acars");
        tracker
            .draw_all(&vdl, station_rule(Category::VdlStation).circle_style(), &mut surface)
            .expect("draw vdl");
        tracker.clear_all(Category::AcarsStation, &mut surface);

        assert_eq!(tracker.count(Category::AcarsStation), 0);
        assert_eq!(tracker.count(Category::VdlStation), 1);
        assert_eq!(surface.live_overlays().len(), 1);
        assert_eq!(surface.live_overlays()[0].radius_m, 1_000.0);
    }
}
