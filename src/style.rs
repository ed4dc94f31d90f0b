use serde::Serialize;

pub const WALL_STROKE_COLOR: &str = "#000000";
pub const WALL_STROKE_WIDTH: f64 = 2.0;
pub const DOOR_STROKE_COLOR: &str = "#FF0000";
pub const DOOR_STROKE_WIDTH: f64 = 5.0;

/// Stroke and fill settings of a host path item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
    pub stroke_dash: Vec<f64>,
}

impl PathStyle {
    /// Unfilled solid stroke
    pub fn outline(stroke_color: &str, stroke_width: f64) -> Self {
        Self {
            fill_color: "black".to_string(),
            fill_opacity: 0.0,
            stroke_color: stroke_color.to_string(),
            stroke_opacity: 1.0,
            stroke_width,
            stroke_dash: Vec::new(),
        }
    }

    pub fn wall() -> Self {
        Self::outline(WALL_STROKE_COLOR, WALL_STROKE_WIDTH)
    }

    pub fn door() -> Self {
        Self::outline(DOOR_STROKE_COLOR, DOOR_STROKE_WIDTH)
    }

    /// Inline SVG style string for previews
    pub fn to_svg_style(&self) -> String {
        format!(
            "stroke:{};stroke-width:{};stroke-opacity:{};fill:none",
            self.stroke_color, self.stroke_width, self.stroke_opacity
        )
    }
}

/// Host fill rule for path items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    Nonzero,
}
