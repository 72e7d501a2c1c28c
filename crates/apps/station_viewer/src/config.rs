use std::path::PathBuf;

use clap::Parser;
use foundation::math::{GeoPosition, RANGE_RING_NAUTICAL_MILES, nautical_miles_to_meters};
use layers::{Category, MotionStyle, TileLayerSpec};

/// Values the session needs once the surface is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub tiles: TileLayerSpec,
    pub initial_center: GeoPosition,
    pub initial_zoom: u8,
    pub range_ring_nm: f64,
    pub motion: MotionStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tiles: TileLayerSpec::default(),
            initial_center: GeoPosition::new(39.1696, -76.6786),
            initial_zoom: 13,
            range_ring_nm: RANGE_RING_NAUTICAL_MILES,
            motion: MotionStyle::default(),
        }
    }
}

impl SessionConfig {
    pub fn range_ring_m(&self) -> f64 {
        nautical_miles_to_meters(self.range_ring_nm)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Station and airport map layers driven from local feeds")]
pub struct Args {
    /// ACARS station GeoJSON FeatureCollection
    #[arg(long, env = "ACARS_STATIONS")]
    pub acars: Option<PathBuf>,

    /// Airport GeoJSON FeatureCollection
    #[arg(long, env = "AIRPORTS")]
    pub airports: Option<PathBuf>,

    /// VDL station GeoJSON FeatureCollection
    #[arg(long, env = "VDL_STATIONS")]
    pub vdl: Option<PathBuf>,

    /// JSON array of flight routes
    #[arg(long, env = "FLIGHT_ROUTES")]
    pub routes: Option<PathBuf>,

    /// Base tile URL template
    #[arg(long, env = "TILE_URL")]
    pub tile_url: Option<String>,

    #[arg(long, default_value_t = 13)]
    pub max_zoom: u8,

    /// Range circle radius in nautical miles
    #[arg(long, default_value_t = RANGE_RING_NAUTICAL_MILES, value_parser = parse_range_nm)]
    pub range_nm: f64,

    /// Operator actions run in order: show:<cat>, hide:<cat>, circles:<cat>, route:<index>
    #[arg(value_name = "ACTION")]
    pub actions: Vec<String>,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default();
        if let Some(url) = &self.tile_url {
            config.tiles.url_template = url.clone();
        }
        config.tiles.max_zoom = self.max_zoom;
        config.range_ring_nm = self.range_nm;
        config
    }

    pub fn station_files(&self) -> Vec<(Category, PathBuf)> {
        [
            (Category::AcarsStation, &self.acars),
            (Category::Airport, &self.airports),
            (Category::VdlStation, &self.vdl),
        ]
        .into_iter()
        .filter_map(|(c, p)| p.clone().map(|p| (c, p)))
        .collect()
    }
}

fn parse_range_nm(s: &str) -> Result<f64, String> {
    let nm: f64 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if nm.is_finite() && nm > 0.0 {
        Ok(nm)
    } else {
        Err(format!("range must be a positive distance, got {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, SessionConfig};
    use clap::Parser;
    use layers::Category;

    #[test]
    fn defaults_match_the_operations_map() {
        let config = SessionConfig::default();
        assert_eq!(config.initial_zoom, 13);
        assert_eq!(config.tiles.max_zoom, 13);
        assert_eq!(config.tiles.attribution, "Open Street Map");
        assert!((config.range_ring_m() - 370_399.865).abs() < 0.01);
    }

    #[test]
    fn args_override_config() {
        let args = Args::parse_from([
            "station-viewer",
            "--acars",
            "a.json",
            "--vdl",
            "v.json",
            "--range-nm",
            "100",
            "--max-zoom",
            "10",
            "show:acars",
            "circles:acars",
        ]);
        let config = args.session_config();
        assert_eq!(config.range_ring_nm, 100.0);
        assert_eq!(config.tiles.max_zoom, 10);
        assert_eq!(args.actions, vec!["show:acars", "circles:acars"]);
        let files: Vec<Category> = args.station_files().into_iter().map(|(c, _)| c).collect();
        assert_eq!(files, vec![Category::AcarsStation, Category::VdlStation]);
    }

    #[test]
    fn rejects_degenerate_ranges() {
        for bad in ["0", "-5", "NaN", "inf", "far"] {
            assert!(
                Args::try_parse_from(["station-viewer", "--range-nm", bad]).is_err(),
                "{bad} accepted"
            );
        }
        let args = Args::try_parse_from(["station-viewer", "--range-nm", "12.5"]).expect("parse");
        assert_eq!(args.range_nm, 12.5);
    }
}
