//! In-memory surface and engine that record every call and track what is
//! currently drawn. Used by tests and dry runs.

use std::collections::BTreeMap;

use foundation::IdAllocator;
use foundation::math::GeoPosition;

use crate::category::Category;
use crate::layer::{LayerId, LayerSpec, OverlayId};
use crate::marker::{Marker, MarkerId};
use crate::route::{EngineError, PathDescriptor, PathEngine, PlaybackId};
use crate::surface::{CircleOverlay, MapSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    AddLayer { id: LayerId, kind: &'static str },
    RemoveLayer(LayerId),
    AddMarkerBatch { sublayer: LayerId, markers: Vec<MarkerId> },
    RemoveMarker(MarkerId),
    ClosePopups(MarkerId),
    AddOverlay { id: OverlayId, category: Category },
    RemoveOverlay(OverlayId),
    SetView { center: GeoPosition, zoom: u8 },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ids: IdAllocator,
    calls: Vec<SurfaceCall>,
    layers: BTreeMap<LayerId, LayerSpec>,
    // Marker plus how many times it is currently on the surface.
    markers: BTreeMap<MarkerId, (Marker, usize)>,
    overlays: BTreeMap<OverlayId, CircleOverlay>,
    stray_removals: usize,
    view: Option<(GeoPosition, u8)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn count_calls(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn live_layers(&self) -> Vec<&LayerSpec> {
        self.layers.values().collect()
    }

    pub fn live_markers(&self) -> Vec<&Marker> {
        self.markers.values().map(|(m, _)| m).collect()
    }

    /// Markers that were batched onto the surface more than once.
    pub fn duplicate_markers(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|(_, (_, n))| *n > 1)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn live_overlays(&self) -> Vec<&CircleOverlay> {
        self.overlays.values().collect()
    }

    /// Removals of layers, markers or overlays that were not on the surface.
    pub fn stray_removals(&self) -> usize {
        self.stray_removals
    }

    pub fn view(&self) -> Option<(GeoPosition, u8)> {
        self.view
    }
}

impl MapSurface for RecordingSurface {
    fn add_layer(&mut self, layer: &LayerSpec) -> LayerId {
        let id = LayerId(self.ids.next_id());
        self.calls.push(SurfaceCall::AddLayer {
            id,
            kind: layer.kind(),
        });
        self.layers.insert(id, layer.clone());
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.calls.push(SurfaceCall::RemoveLayer(layer));
        if self.layers.remove(&layer).is_none() {
            self.stray_removals += 1;
        }
    }

    fn add_marker_batch(&mut self, sublayer: LayerId, markers: &[Marker]) {
        self.calls.push(SurfaceCall::AddMarkerBatch {
            sublayer,
            markers: markers.iter().map(|m| m.id).collect(),
        });
        for marker in markers {
            self.markers
                .entry(marker.id)
                .and_modify(|(_, n)| *n += 1)
                .or_insert_with(|| (marker.clone(), 1));
        }
    }

    fn remove_marker(&mut self, _sublayer: LayerId, marker: &Marker) {
        self.calls.push(SurfaceCall::RemoveMarker(marker.id));
        match self.markers.get_mut(&marker.id) {
            Some((_, n)) if *n > 1 => *n -= 1,
            Some(_) => {
                self.markers.remove(&marker.id);
            }
            None => self.stray_removals += 1,
        }
    }

    fn close_marker_popups(&mut self, marker: &Marker) {
        self.calls.push(SurfaceCall::ClosePopups(marker.id));
    }

    fn add_overlay(&mut self, circle: &CircleOverlay) -> OverlayId {
        let id = OverlayId(self.ids.next_id());
        self.calls.push(SurfaceCall::AddOverlay {
            id,
            category: circle.category,
        });
        self.overlays.insert(id, circle.clone());
        id
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        self.calls.push(SurfaceCall::RemoveOverlay(overlay));
        if self.overlays.remove(&overlay).is_none() {
            self.stray_removals += 1;
        }
    }

    fn set_view(&mut self, center: GeoPosition, zoom: u8) {
        self.calls.push(SurfaceCall::SetView { center, zoom });
        self.view = Some((center, zoom));
    }
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    ids: IdAllocator,
    started: Vec<PathDescriptor>,
    failure: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose every `start` fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn started(&self) -> &[PathDescriptor] {
        &self.started
    }
}

impl PathEngine for RecordingEngine {
    fn start(&mut self, path: &PathDescriptor) -> Result<PlaybackId, EngineError> {
        if let Some(message) = &self.failure {
            return Err(EngineError::new(message.clone()));
        }
        self.started.push(path.clone());
        Ok(PlaybackId(self.ids.next_id()))
    }
}
