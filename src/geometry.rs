//! Grid-to-pixel conversion of walls, portals and lights

use serde::Deserialize;
use tracing::debug;

use crate::error::ImportError;
use crate::uvtt::{Light, Portal, UniversalVtt, Vector2};

/// Whether `resolution.map_origin` is subtracted before scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginOffset {
    /// Scale coordinates as-is
    #[default]
    Ignore,
    Apply,
}

/// Uniform scale from document grid units into scene pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScale {
    dpi: f64,
    origin: Vector2,
}

impl GridScale {
    pub fn new(dpi: f64) -> Result<Self, ImportError> {
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ImportError::InvalidDpi(dpi));
        }
        Ok(Self {
            dpi,
            origin: Vector2::default(),
        })
    }

    /// Scale for a document, applying its map origin when requested
    pub fn for_document(
        document: &UniversalVtt,
        dpi: f64,
        offset: OriginOffset,
    ) -> Result<Self, ImportError> {
        let mut scale = Self::new(dpi)?;
        if offset == OriginOffset::Apply {
            scale.origin = document.resolution.map_origin;
        }
        Ok(scale)
    }

    pub fn scale_point(&self, point: &Vector2) -> Vector2 {
        let p = *point - self.origin;
        Vector2::new(p.x * self.dpi, p.y * self.dpi)
    }

    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.dpi
    }
}

/// Scaled wall polyline, at least two points
#[derive(Debug, Clone, PartialEq)]
pub struct WallPath {
    pub points: Vec<Vector2>,
}

/// Straight door connector between the first and last portal bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSegment {
    pub start: Vector2,
    pub end: Vector2,
    pub length: f64,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    pub position: Vector2,
    pub attenuation_radius: f64,
    pub intensity: f64,
    pub color: String,
    pub shadows: bool,
}

pub fn convert_wall(points: &[Vector2], scale: &GridScale) -> Option<WallPath> {
    if points.len() < 2 {
        return None;
    }
    Some(WallPath {
        points: points.iter().map(|p| scale.scale_point(p)).collect(),
    })
}

pub fn convert_portal(portal: &Portal, scale: &GridScale) -> Option<DoorSegment> {
    let (first, last) = match portal.bounds.as_slice() {
        [first, .., last] => (first, last),
        _ => return None,
    };
    let start = scale.scale_point(first);
    let end = scale.scale_point(last);
    Some(DoorSegment {
        start,
        end,
        length: start.distance(&end),
        open: !portal.closed,
    })
}

/// Light position and range in scene pixels
///
/// The position is scaled along with the range, so the light lands in scene
/// pixels rather than at its raw grid coordinates.
pub fn convert_light(light: &Light, scale: &GridScale) -> LightSource {
    LightSource {
        position: scale.scale_point(&light.position),
        attenuation_radius: scale.scale_length(light.range),
        intensity: light.intensity,
        color: light.color.clone(),
        shadows: light.shadows,
    }
}

fn ensure_finite(field: impl FnOnce() -> String, point: &Vector2) -> Result<(), ImportError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ImportError::invalid(
            field(),
            format!("scaled coordinate ({}, {}) is out of range", point.x, point.y),
        ))
    }
}

fn ensure_finite_length(field: impl FnOnce() -> String, length: f64) -> Result<(), ImportError> {
    if length.is_finite() {
        Ok(())
    } else {
        Err(ImportError::invalid(
            field(),
            format!("scaled length {} is out of range", length),
        ))
    }
}

/// Convert both wall sources, dropping polylines with fewer than two points
///
/// Fails when a scaled coordinate overflows.
pub fn convert_walls(
    document: &UniversalVtt,
    scale: &GridScale,
) -> Result<Vec<WallPath>, ImportError> {
    let primary = document.line_of_sight.len();
    let mut walls = Vec::new();
    for (i, wall) in document.walls().enumerate() {
        let Some(converted) = convert_wall(wall, scale) else {
            debug!(index = i, points = wall.len(), "skipping degenerate wall");
            continue;
        };
        for (j, point) in converted.points.iter().enumerate() {
            ensure_finite(
                || {
                    if i < primary {
                        format!("line_of_sight[{}][{}]", i, j)
                    } else {
                        format!("objects_line_of_sight[{}][{}]", i - primary, j)
                    }
                },
                point,
            )?;
        }
        walls.push(converted);
    }
    Ok(walls)
}

pub fn convert_portals(
    document: &UniversalVtt,
    scale: &GridScale,
) -> Result<Vec<DoorSegment>, ImportError> {
    let mut doors = Vec::new();
    for (i, portal) in document.portals().iter().enumerate() {
        let Some(door) = convert_portal(portal, scale) else {
            debug!(
                index = i,
                points = portal.bounds.len(),
                "skipping degenerate portal"
            );
            continue;
        };
        let field = || format!("portals[{}].bounds", i);
        ensure_finite(field, &door.start)?;
        ensure_finite(field, &door.end)?;
        ensure_finite_length(field, door.length)?;
        doors.push(door);
    }
    Ok(doors)
}

pub fn convert_lights(
    document: &UniversalVtt,
    scale: &GridScale,
) -> Result<Vec<LightSource>, ImportError> {
    document
        .lights()
        .iter()
        .enumerate()
        .map(|(i, light)| {
            let source = convert_light(light, scale);
            ensure_finite(|| format!("lights[{}].position", i), &source.position)?;
            ensure_finite_length(|| format!("lights[{}].range", i), source.attenuation_radius)?;
            Ok(source)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uvtt::parse_uvtt;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn portal(bounds: Vec<Vector2>, closed: bool) -> Portal {
        Portal {
            position: Vector2::default(),
            bounds,
            rotation: 0.0,
            closed,
            freestanding: false,
        }
    }

    #[test]
    fn test_rejects_invalid_dpi() {
        for dpi in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(GridScale::new(dpi), Err(ImportError::InvalidDpi(_))));
        }
    }

    #[test]
    fn test_scale_is_exact_multiplication() {
        let scale = GridScale::new(137.5).unwrap();
        let p = v(3.3, -0.7);
        let scaled = scale.scale_point(&p);
        assert_eq!(scaled.x, 3.3 * 137.5);
        assert_eq!(scaled.y, -0.7 * 137.5);
    }

    #[test]
    fn test_wall_needs_two_points() {
        let scale = GridScale::new(50.0).unwrap();
        assert!(convert_wall(&[], &scale).is_none());
        assert!(convert_wall(&[v(1.0, 1.0)], &scale).is_none());

        let wall = convert_wall(&[v(0.0, 0.0), v(1.0, 0.0)], &scale).unwrap();
        assert_eq!(wall.points, vec![v(0.0, 0.0), v(50.0, 0.0)]);
    }

    #[test]
    fn test_portal_uses_first_and_last_bound() {
        let scale = GridScale::new(10.0).unwrap();
        let door = convert_portal(
            &portal(vec![v(0.0, 0.0), v(5.0, 5.0), v(2.0, 0.0)], true),
            &scale,
        )
        .unwrap();
        assert_eq!(door.start, v(0.0, 0.0));
        assert_eq!(door.end, v(20.0, 0.0));
        assert_eq!(door.length, 20.0);
        assert!(!door.open);
    }

    #[test]
    fn test_portal_with_single_bound_is_skipped() {
        let scale = GridScale::new(10.0).unwrap();
        assert!(convert_portal(&portal(vec![v(1.0, 1.0)], false), &scale).is_none());
    }

    #[test]
    fn test_open_portal_diagonal_length() {
        let scale = GridScale::new(10.0).unwrap();
        let door = convert_portal(&portal(vec![v(0.0, 0.0), v(3.0, 4.0)], false), &scale).unwrap();
        assert!(door.open);
        assert!((door.length - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_light_range_becomes_attenuation_radius() {
        let scale = GridScale::new(100.0).unwrap();
        let light = Light {
            position: v(2.0, 3.0),
            range: 4.5,
            intensity: 0.8,
            color: "ff0000ff".to_string(),
            shadows: false,
        };
        let source = convert_light(&light, &scale);
        assert_eq!(source.position, v(200.0, 300.0));
        assert_eq!(source.attenuation_radius, 450.0);
        assert_eq!(source.color, "ff0000ff");
    }

    #[test]
    fn test_origin_offset_is_noop_unless_applied() {
        let doc = parse_uvtt(
            r#"{
                "resolution": {
                    "map_origin": { "x": 1, "y": 2 },
                    "pixels_per_grid": 70
                },
                "line_of_sight": [[{ "x": 1, "y": 2 }, { "x": 3, "y": 2 }]]
            }"#,
        )
        .unwrap();

        let ignored = GridScale::for_document(&doc, 10.0, OriginOffset::Ignore).unwrap();
        let walls = convert_walls(&doc, &ignored).unwrap();
        assert_eq!(walls[0].points[0], v(10.0, 20.0));

        let applied = GridScale::for_document(&doc, 10.0, OriginOffset::Apply).unwrap();
        let walls = convert_walls(&doc, &applied).unwrap();
        assert_eq!(walls[0].points, vec![v(0.0, 0.0), v(20.0, 0.0)]);
    }

    #[test]
    fn test_overflowing_wall_is_rejected() {
        let doc = parse_uvtt(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "line_of_sight": [[{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }]],
                "objects_line_of_sight": [[{ "x": 0, "y": 0 }, { "x": 1e307, "y": 0 }]]
            }"#,
        )
        .unwrap();
        let scale = GridScale::new(150.0).unwrap();
        match convert_walls(&doc, &scale).unwrap_err() {
            ImportError::InvalidDocument { field, .. } => {
                assert_eq!(field, "objects_line_of_sight[0][1]")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_portal_and_light_are_rejected() {
        let doc = parse_uvtt(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "portals": [
                    { "bounds": [{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }], "closed": true },
                    { "bounds": [{ "x": 0, "y": 0 }, { "x": 1e307, "y": 0 }], "closed": true }
                ],
                "lights": [{ "position": { "x": 1, "y": 1 }, "range": 1e307 }]
            }"#,
        )
        .unwrap();
        let scale = GridScale::new(150.0).unwrap();
        match convert_portals(&doc, &scale).unwrap_err() {
            ImportError::InvalidDocument { field, .. } => assert_eq!(field, "portals[1].bounds"),
            other => panic!("unexpected error: {other}"),
        }
        match convert_lights(&doc, &scale).unwrap_err() {
            ImportError::InvalidDocument { field, .. } => assert_eq!(field, "lights[0].range"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
