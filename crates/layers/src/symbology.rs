//! Styling data carried through to the surface untouched.

/// Marker icon. Size and anchor are in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub url: &'static str,
    pub size_px: [u32; 2],
    /// Canvas-batched markers need an explicit anchor to render in place.
    pub anchor_px: [u32; 2],
}

impl IconSpec {
    pub const fn new(url: &'static str) -> Self {
        Self {
            url,
            size_px: [24, 24],
            anchor_px: [10, 9],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TooltipSpec {
    pub permanent: bool,
    pub offset_px: [i32; 2],
}

impl Default for TooltipSpec {
    fn default() -> Self {
        Self {
            permanent: true,
            offset_px: [30, 30],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CircleStyle {
    pub color: &'static str,
    pub dash_array: &'static str,
    pub fill: bool,
}

impl CircleStyle {
    pub const fn outline(color: &'static str) -> Self {
        Self {
            color,
            dash_array: "10",
            fill: false,
        }
    }
}

/// Line and moving-icon style of an animated route.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionStyle {
    pub line_color: &'static str,
    pub icon_html: &'static str,
    pub icon_size_px: [u32; 2],
    pub icon_base_rotation_deg: f64,
    pub remove_on_end: bool,
}

impl Default for MotionStyle {
    fn default() -> Self {
        Self {
            line_color: "indigo",
            icon_html: "<i class='airpline-solid' aria-hidden='true' motion-base='-45'></i>",
            icon_size_px: [24, 24],
            icon_base_rotation_deg: -45.0,
            remove_on_end: true,
        }
    }
}
