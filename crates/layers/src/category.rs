use std::str::FromStr;

/// Station group managed as one independent layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    AcarsStation,
    Airport,
    VdlStation,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::AcarsStation,
        Category::Airport,
        Category::VdlStation,
    ];

    /// Dense index for per-category arrays.
    pub const fn index(self) -> usize {
        match self {
            Category::AcarsStation => 0,
            Category::Airport => 1,
            Category::VdlStation => 2,
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Category::AcarsStation => "acars",
            Category::Airport => "airport",
            Category::VdlStation => "vdl",
        }
    }

    /// Name used in operator-facing messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Category::AcarsStation => "ACARS station",
            Category::Airport => "Airport",
            Category::VdlStation => "VDL station",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl std::fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown category {:?} (expected acars, airport or vdl)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
