use serde::{Deserialize, Serialize};

/// 2D point in document grid units, or in scene pixels once scaled
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vector2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Grid resolution block
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resolution {
    /// Top-left of the map in grid units
    #[serde(default)]
    pub map_origin: Vector2,
    /// Map extent in grid units
    #[serde(default)]
    pub map_size: Vector2,
    pub pixels_per_grid: f64,
}

/// Door or opening on the line-of-sight layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Portal {
    #[serde(default)]
    pub position: Vector2,
    pub bounds: Vec<Vector2>,
    #[serde(default)]
    pub rotation: f64,
    pub closed: bool,
    #[serde(default)]
    pub freestanding: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub baked_lighting: bool,
    #[serde(default)]
    pub ambient_light: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Light {
    pub position: Vector2,
    /// Range in grid units
    pub range: f64,
    #[serde(default = "Light::default_intensity")]
    pub intensity: f64,
    /// RGBA hex without the leading '#'
    #[serde(default = "Light::default_color")]
    pub color: String,
    #[serde(default = "Light::default_shadows")]
    pub shadows: bool,
}

impl Light {
    fn default_intensity() -> f64 {
        1.0
    }

    fn default_color() -> String {
        "ffffffff".to_string()
    }

    fn default_shadows() -> bool {
        true
    }
}

/// Parsed Universal VTT export (.uvtt, .dd2vtt, .df2vtt)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UniversalVtt {
    #[serde(default)]
    pub format: f64,
    pub resolution: Resolution,
    #[serde(default)]
    pub line_of_sight: Vec<Vec<Vector2>>,
    #[serde(default)]
    pub objects_line_of_sight: Option<Vec<Vec<Vector2>>>,
    #[serde(default)]
    pub portals: Option<Vec<Portal>>,
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default)]
    pub lights: Option<Vec<Light>>,
    /// Base64-encoded map image
    #[serde(default)]
    pub image: Option<String>,
}

impl UniversalVtt {
    /// Walls from `line_of_sight` followed by `objects_line_of_sight`
    pub fn walls(&self) -> impl Iterator<Item = &Vec<Vector2>> {
        self.line_of_sight
            .iter()
            .chain(self.objects_line_of_sight.iter().flatten())
    }

    pub fn portals(&self) -> &[Portal] {
        self.portals.as_deref().unwrap_or(&[])
    }

    pub fn lights(&self) -> &[Light] {
        self.lights.as_deref().unwrap_or(&[])
    }

    pub fn pixels_per_grid(&self) -> f64 {
        self.resolution.pixels_per_grid
    }

    /// Embedded image, treating an empty string as absent
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }
}
