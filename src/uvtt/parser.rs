use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::*;
use crate::error::ImportError;

/// File extensions parsed as Universal VTT, without the leading dot
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["dd2vtt", "uvtt", "df2vtt"];

/// Check whether a file name carries one of the Universal VTT extensions
pub fn is_supported_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Read a Universal VTT file as text, refusing unknown extensions
pub fn read_uvtt_file(path: impl AsRef<Path>) -> Result<String, ImportError> {
    let path = path.as_ref();
    if !is_supported_file(path) {
        return Err(ImportError::UnsupportedExtension(
            path.extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ));
    }
    fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a Universal VTT JSON string and validate it before any conversion
pub fn parse_uvtt(json: &str) -> Result<UniversalVtt, ImportError> {
    let document: UniversalVtt = serde_json::from_str(json)?;
    validate(&document)?;
    debug!(
        format = document.format,
        walls = document.line_of_sight.len(),
        object_walls = document.objects_line_of_sight.as_ref().map_or(0, Vec::len),
        portals = document.portals().len(),
        lights = document.lights().len(),
        "parsed UVTT document"
    );
    Ok(document)
}

fn validate(document: &UniversalVtt) -> Result<(), ImportError> {
    let ppg = document.resolution.pixels_per_grid;
    if !ppg.is_finite() || ppg <= 0.0 {
        return Err(ImportError::invalid(
            "resolution.pixels_per_grid",
            format!("must be a finite positive number, got {}", ppg),
        ));
    }
    check_point("resolution.map_origin", &document.resolution.map_origin)?;
    check_point("resolution.map_size", &document.resolution.map_size)?;

    check_polylines("line_of_sight", &document.line_of_sight)?;
    if let Some(walls) = &document.objects_line_of_sight {
        check_polylines("objects_line_of_sight", walls)?;
    }

    for (i, portal) in document.portals().iter().enumerate() {
        check_point(&format!("portals[{}].position", i), &portal.position)?;
        for (j, point) in portal.bounds.iter().enumerate() {
            check_point(&format!("portals[{}].bounds[{}]", i, j), point)?;
        }
    }

    for (i, light) in document.lights().iter().enumerate() {
        check_point(&format!("lights[{}].position", i), &light.position)?;
        if !light.range.is_finite() || light.range < 0.0 {
            return Err(ImportError::invalid(
                format!("lights[{}].range", i),
                format!("must be a finite non-negative number, got {}", light.range),
            ));
        }
    }

    Ok(())
}

fn check_polylines(field: &str, polylines: &[Vec<Vector2>]) -> Result<(), ImportError> {
    for (i, line) in polylines.iter().enumerate() {
        for (j, point) in line.iter().enumerate() {
            check_point(&format!("{}[{}][{}]", field, i, j), point)?;
        }
    }
    Ok(())
}

fn check_point(field: &str, point: &Vector2) -> Result<(), ImportError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ImportError::invalid(
            field,
            format!("coordinate ({}, {}) is not finite", point.x, point.y),
        ))
    }
}
