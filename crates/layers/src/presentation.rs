use serde_json::{Map, Value};

use crate::category::Category;
use crate::symbology::{CircleStyle, IconSpec, TooltipSpec};

/// Per-category presentation. Implementations are pure: the same properties
/// always yield the same label and popup.
pub trait PresentationRule {
    fn category(&self) -> Category;

    fn icon(&self) -> IconSpec;

    fn tooltip(&self) -> TooltipSpec {
        TooltipSpec::default()
    }

    fn label(&self, properties: &Map<String, Value>) -> String;

    /// `None` when the properties cannot fill the popup template.
    fn popup(&self, properties: &Map<String, Value>) -> Option<String>;

    fn circle_style(&self) -> CircleStyle;
}

/// Table-driven rule shared by every station category.
#[derive(Debug)]
pub struct StationRule {
    pub category: Category,
    pub icon: IconSpec,
    pub circle: CircleStyle,
    pub label_key: &'static str,
    pub heading: &'static str,
    /// `(property key, caption)` in popup order. Every key is required.
    pub popup_fields: &'static [(&'static str, &'static str)],
}

pub static ACARS_STATION_RULE: StationRule = StationRule {
    category: Category::AcarsStation,
    icon: IconSpec::new("assets/broadcast-tower-solid.svg"),
    circle: CircleStyle::outline("#ff6666"),
    label_key: "iata",
    heading: "I am an Acar station",
    popup_fields: &[("iata", "IATA Code"), ("frequency", "Frequency")],
};

pub static AIRPORT_RULE: StationRule = StationRule {
    category: Category::Airport,
    icon: IconSpec::new("assets/Airport_symbol.svg"),
    circle: CircleStyle::outline("gray"),
    label_key: "iata",
    heading: "I am an Airport",
    popup_fields: &[
        ("airport", "Airport Name"),
        ("iata", "IATA Code"),
        ("numberOfVHFStations", "Num of VHF Station"),
        ("city", "City"),
        ("state", "State"),
        ("country", "Country"),
    ],
};

pub static VDL_STATION_RULE: StationRule = StationRule {
    category: Category::VdlStation,
    icon: IconSpec::new("assets/building-solid.svg"),
    circle: CircleStyle::outline("red"),
    label_key: "iata",
    heading: "I am an Vdl station",
    popup_fields: &[("iata", "IATA Code"), ("frequency", "Frequency")],
};

pub fn station_rule(category: Category) -> &'static StationRule {
    match category {
        Category::AcarsStation => &ACARS_STATION_RULE,
        Category::Airport => &AIRPORT_RULE,
        Category::VdlStation => &VDL_STATION_RULE,
    }
}

impl PresentationRule for StationRule {
    fn category(&self) -> Category {
        self.category
    }

    fn icon(&self) -> IconSpec {
        self.icon
    }

    fn label(&self, properties: &Map<String, Value>) -> String {
        properties
            .get(self.label_key)
            .filter(|v| !v.is_null())
            .map(render_value)
            .unwrap_or_default()
    }

    fn popup(&self, properties: &Map<String, Value>) -> Option<String> {
        let mut lines = Vec::with_capacity(self.popup_fields.len() + 1);
        lines.push(self.heading.to_string());
        for (key, caption) in self.popup_fields {
            let value = properties.get(*key).filter(|v| is_present(v))?;
            lines.push(format!("{caption}: {}", render_value(value)));
        }
        Some(lines.join(" <br> "))
    }

    fn circle_style(&self) -> CircleStyle {
        self.circle
    }
}

/// A property counts as present unless it is null, `false`, an empty string
/// or numeric zero.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
