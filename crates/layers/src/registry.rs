use formats::GeoFeatureCollection;
use tracing::{debug, info};

use crate::category::Category;
use crate::error::LayerError;
use crate::layer::{LayerId, LayerSpec};
use crate::marker::{Marker, MarkerFactory, MarkerSet};
use crate::overlay::OverlayTracker;
use crate::presentation::{PresentationRule, station_rule};
use crate::surface::MapSurface;

/// Marker state of one category.
///
/// `on_surface` is exactly what was batched onto the surface by the last
/// `show`, so `hide` removes what was added even if a reload replaced
/// `markers` in between. `Some` means the category is shown.
#[derive(Debug, Clone)]
pub struct CategoryLayer {
    category: Category,
    next_generation: u32,
    markers: MarkerSet,
    on_surface: Option<Vec<Marker>>,
}

impl CategoryLayer {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            next_generation: 0,
            markers: MarkerSet::empty(category),
            on_surface: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn is_shown(&self) -> bool {
        self.on_surface.is_some()
    }

    pub fn shown_markers(&self) -> Option<&[Marker]> {
        self.on_surface.as_deref()
    }

    pub(crate) fn load(&mut self, collection: &GeoFeatureCollection) -> Result<usize, LayerError> {
        let rule = station_rule(self.category);
        let set = MarkerFactory::new(self.next_generation).build(collection, rule)?;
        self.next_generation = self.next_generation.wrapping_add(1);
        if self.is_shown() {
            debug!(
                category = %self.category,
                "reloaded while shown; new markers appear on the next show"
            );
        }
        self.markers = set;
        Ok(self.markers.len())
    }

    pub(crate) fn show(&mut self, sublayer: LayerId, surface: &mut dyn MapSurface) -> bool {
        if self.is_shown() {
            debug!(category = %self.category, "already shown");
            return false;
        }
        if self.markers.is_empty() {
            debug!(category = %self.category, "nothing loaded to show");
            return false;
        }
        let batch = self.markers.to_vec();
        surface.add_marker_batch(sublayer, &batch);
        self.on_surface = Some(batch);
        true
    }

    pub(crate) fn hide(&mut self, sublayer: LayerId, surface: &mut dyn MapSurface) -> bool {
        let Some(shown) = self.on_surface.take() else {
            debug!(category = %self.category, "already hidden");
            return false;
        };
        for marker in &shown {
            surface.close_marker_popups(marker);
            surface.remove_marker(sublayer, marker);
        }
        true
    }

    pub(crate) fn unload(&mut self) {
        self.markers = MarkerSet::empty(self.category);
    }
}

/// Owns every category's markers and range circles, and is the only code
/// that adds or removes them on the surface.
///
/// Invariants:
/// - A category's markers are on the surface at most once.
/// - Circles exist for a category only while it is shown; `hide` clears them.
#[derive(Debug)]
pub struct LayerRegistry {
    layers: [CategoryLayer; 3],
    overlays: OverlayTracker,
    sublayer: Option<LayerId>,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new(OverlayTracker::default())
    }
}

impl LayerRegistry {
    pub fn new(overlays: OverlayTracker) -> Self {
        Self {
            layers: Category::ALL.map(CategoryLayer::new),
            overlays,
            sublayer: None,
        }
    }

    pub fn layer(&self, category: Category) -> &CategoryLayer {
        &self.layers[category.index()]
    }

    pub fn markers(&self, category: Category) -> &MarkerSet {
        self.layer(category).markers()
    }

    pub fn is_shown(&self, category: Category) -> bool {
        self.layer(category).is_shown()
    }

    pub fn overlays(&self) -> &OverlayTracker {
        &self.overlays
    }

    pub fn sublayer(&self) -> Option<LayerId> {
        self.sublayer
    }

    /// Attaches the shared marker sublayer. Idempotent.
    pub fn attach(&mut self, surface: &mut dyn MapSurface) -> LayerId {
        if let Some(id) = self.sublayer {
            return id;
        }
        let id = surface.add_layer(&LayerSpec::MarkerBatch);
        info!(sublayer = %id.0, "marker sublayer attached");
        self.sublayer = Some(id);
        id
    }

    /// Hides every category, then removes the marker sublayer.
    pub fn detach(&mut self, surface: &mut dyn MapSurface) {
        for category in Category::ALL {
            self.hide(category, surface);
        }
        if let Some(id) = self.sublayer.take() {
            surface.remove_layer(id);
            info!(sublayer = %id.0, "marker sublayer detached");
        }
    }

    /// Replaces the stored markers of `category`. Never touches the surface.
    ///
    /// On error the previous markers are kept.
    pub fn load(
        &mut self,
        category: Category,
        collection: &GeoFeatureCollection,
    ) -> Result<usize, LayerError> {
        let n = self.layers[category.index()].load(collection)?;
        info!(%category, markers = n, "markers loaded");
        Ok(n)
    }

    /// Adds the category's markers as one batch. Returns `false` without
    /// touching the surface when already shown, when nothing is loaded, or
    /// when the sublayer is not attached yet.
    pub fn show(&mut self, category: Category, surface: &mut dyn MapSurface) -> bool {
        let Some(sublayer) = self.sublayer else {
            debug!(%category, "show before the marker sublayer is attached");
            return false;
        };
        let shown = self.layers[category.index()].show(sublayer, surface);
        if shown {
            info!(%category, markers = self.markers(category).len(), "layer shown");
        }
        shown
    }

    /// Clears the category's range circles and removes its markers one by one.
    /// Returns `false` without touching the surface when already hidden.
    pub fn hide(&mut self, category: Category, surface: &mut dyn MapSurface) -> bool {
        let Some(sublayer) = self.sublayer else {
            return false;
        };
        if !self.is_shown(category) {
            debug!(%category, "already hidden");
            return false;
        }
        let circles = self.overlays.clear_all(category, surface);
        self.layers[category.index()].hide(sublayer, surface);
        info!(%category, circles, "layer hidden");
        true
    }

    /// Draws range circles around the category's shown markers.
    pub fn draw_circles(
        &mut self,
        category: Category,
        surface: &mut dyn MapSurface,
    ) -> Result<usize, LayerError> {
        let style = station_rule(category).circle_style();
        self.overlays
            .draw_all(&self.layers[category.index()], style, surface)
    }

    pub fn clear_circles(&mut self, category: Category, surface: &mut dyn MapSurface) -> usize {
        self.overlays.clear_all(category, surface)
    }

    /// Hides the category and drops its markers.
    pub fn unload(&mut self, category: Category, surface: &mut dyn MapSurface) {
        self.hide(category, surface);
        self.layers[category.index()].unload();
    }
}
