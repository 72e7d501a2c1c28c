use std::collections::VecDeque;

use formats::GeoFeatureCollection;
use foundation::Handle;
use foundation::math::GeoPosition;

use crate::category::Category;
use crate::error::LayerError;
use crate::presentation::PresentationRule;
use crate::symbology::{IconSpec, TooltipSpec};

/// Identifies one marker: its category plus `(arrival index, load generation)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId {
    pub category: Category,
    pub handle: Handle,
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}@{}",
            self.category,
            self.handle.index(),
            self.handle.generation()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: GeoPosition,
    pub category: Category,
    pub label: String,
    pub popup: Option<String>,
    pub icon: IconSpec,
    pub tooltip: TooltipSpec,
}

/// Markers of one category, most recently arrived first.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSet {
    category: Category,
    markers: VecDeque<Marker>,
}

impl MarkerSet {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            markers: VecDeque::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn get(&self, i: usize) -> Option<&Marker> {
        self.markers.get(i)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.markers.iter().map(|m| m.label.as_str()).collect()
    }

    pub fn to_vec(&self) -> Vec<Marker> {
        self.markers.iter().cloned().collect()
    }

    fn prepend(&mut self, marker: Marker) {
        self.markers.push_front(marker);
    }
}

/// Turns a feature collection into markers.
///
/// The factory has no side effects; `generation` only tags the ids it mints so
/// markers from successive loads of one category never compare equal.
#[derive(Debug, Default, Copy, Clone)]
pub struct MarkerFactory {
    generation: u32,
}

impl MarkerFactory {
    pub fn new(generation: u32) -> Self {
        Self { generation }
    }

    /// Builds one marker per feature, prepending each so the result is in
    /// reverse arrival order.
    ///
    /// Features whose properties cannot fill the popup template still get a
    /// label and tooltip, just no popup. A feature without a finite position
    /// aborts the whole build with `MalformedFeature`.
    pub fn build(
        &self,
        collection: &GeoFeatureCollection,
        rule: &dyn PresentationRule,
    ) -> Result<MarkerSet, LayerError> {
        let category = rule.category();
        let mut set = MarkerSet::empty(category);
        let icon = rule.icon();
        let tooltip = rule.tooltip();

        for (index, feature) in collection.features.iter().enumerate() {
            let position = feature
                .position
                .filter(GeoPosition::is_finite)
                .ok_or(LayerError::MalformedFeature { category, index })?;

            set.prepend(Marker {
                id: MarkerId {
                    category,
                    handle: Handle::new(index as u32, self.generation),
                },
                position,
                category,
                label: rule.label(&feature.properties),
                popup: rule.popup(&feature.properties),
                icon,
                tooltip,
            });
        }

        Ok(set)
    }
}

pub fn build_markers(
    collection: &GeoFeatureCollection,
    rule: &dyn PresentationRule,
) -> Result<MarkerSet, LayerError> {
    MarkerFactory::default().build(collection, rule)
}

#[cfg(test)]
mod tests {
    use super::{MarkerFactory, build_markers};
    use crate::category::Category;
    use crate::error::LayerError;
    use crate::presentation::station_rule;
    use formats::{GeoFeature, GeoFeatureCollection};
    use foundation::math::GeoPosition;
    use pretty_assertions::assert_eq;

    fn station(lat: f64, lon: f64, iata: &str) -> GeoFeature {
        GeoFeature::point(lat, lon)
            .with_property("iata", iata)
            .with_property("frequency", "131.550")
    }

    #[test]
    fn markers_come_out_in_reverse_arrival_order() {
        let collection = GeoFeatureCollection::new(vec![
            station(1.0, 1.0, "F1"),
            station(2.0, 2.0, "F2"),
            station(3.0, 3.0, "F3"),
        ]);
        let set = build_markers(&collection, station_rule(Category::AcarsStation))
            .expect("build");
        assert_eq!(set.labels(), vec!["F3", "F2", "F1"]);
        assert_eq!(set.get(0).map(|m| m.id.handle.index()), Some(2));
        assert_eq!(set.get(2).map(|m| m.position), Some(GeoPosition::new(1.0, 1.0)));
    }

    #[test]
    fn incomplete_properties_drop_only_the_popup() {
        let collection = GeoFeatureCollection::new(vec![
            GeoFeature::point(10.0, 20.0).with_property("iata", "AAA"),
            station(30.0, 40.0, "BBB"),
        ]);
        let set = build_markers(&collection, station_rule(Category::VdlStation)).expect("build");
        let bbb = set.get(0).expect("BBB");
        let aaa = set.get(1).expect("AAA");
        assert_eq!(aaa.label, "AAA");
        assert_eq!(aaa.popup, None);
        assert_eq!(bbb.label, "BBB");
        assert!(bbb.popup.is_some());
        assert_eq!(bbb.category, Category::VdlStation);
    }

    #[test]
    fn feature_without_position_aborts_the_build() {
        let collection = GeoFeatureCollection::new(vec![
            station(1.0, 1.0, "OK"),
            GeoFeature::without_position().with_property("iata", "BAD"),
        ]);
        let err = build_markers(&collection, station_rule(Category::Airport)).unwrap_err();
        assert_eq!(
            err,
            LayerError::MalformedFeature {
                category: Category::Airport,
                index: 1
            }
        );
    }

    #[test]
    fn non_finite_position_is_malformed() {
        let collection = GeoFeatureCollection::new(vec![station(f64::NAN, 1.0, "NAN")]);
        assert!(matches!(
            build_markers(&collection, station_rule(Category::AcarsStation)),
            Err(LayerError::MalformedFeature { index: 0, .. })
        ));
    }

    #[test]
    fn generations_keep_ids_distinct() {
        let collection = GeoFeatureCollection::new(vec![station(1.0, 1.0, "A")]);
        let rule = station_rule(Category::AcarsStation);
        let first = MarkerFactory::new(0).build(&collection, rule).expect("build");
        let second = MarkerFactory::new(1).build(&collection, rule).expect("build");
        assert_ne!(
            first.get(0).map(|m| m.id),
            second.get(0).map(|m| m.id)
        );
    }

    #[test]
    fn empty_collection_gives_empty_set() {
        let set = build_markers(
            &GeoFeatureCollection::default(),
            station_rule(Category::Airport),
        )
        .expect("build");
        assert!(set.is_empty());
        assert_eq!(set.category(), Category::Airport);
    }
}
