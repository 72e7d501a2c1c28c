use foundation::Id;

/// Surface-assigned id of a layer (tile layer, marker sublayer, route path).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub Id);

/// Surface-assigned id of a single overlay such as a range circle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub Id);

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayerSpec {
    fn default() -> Self {
        Self {
            url_template: "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_zoom: 13,
            attribution: "Open Street Map".to_string(),
        }
    }
}

/// What to attach when asking the surface for a new layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Tiles(TileLayerSpec),
    /// Shared canvas sublayer every category's markers are batched into.
    MarkerBatch,
}

impl LayerSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::Tiles(_) => "tiles",
            LayerSpec::MarkerBatch => "marker-batch",
        }
    }
}
