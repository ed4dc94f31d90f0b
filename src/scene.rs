//! Scene-creation payloads built from the embedded map image

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use image::{ImageFormat, ImageReader};
use serde::Serialize;
use tracing::info;

use crate::error::ImportError;
use crate::uvtt::UniversalVtt;

pub const MAP_IMAGE_NAME: &str = "Imported Map";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridType {
    Square,
}

/// Image asset uploaded as a scene's base map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub name: String,
    /// Pixels per grid cell of the image
    pub dpi: f64,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Decode a base64 image and sniff its format and dimensions
    pub fn from_base64(name: &str, encoded: &str, dpi: f64) -> Result<Self, ImportError> {
        let bytes = BASE64_STANDARD.decode(encoded.trim())?;
        let format = image::guess_format(&bytes)?;
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()?;
        Ok(Self {
            name: name.to_string(),
            dpi,
            mime_type: format.to_mime_type().to_string(),
            width,
            height,
            bytes,
        })
    }

    /// File extension matching the detected image format
    pub fn extension(&self) -> &'static str {
        ImageFormat::from_mime_type(&self.mime_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneUpload {
    pub name: String,
    pub base_map: ImageUpload,
    pub grid_type: GridType,
    /// Grid scale string, equal to the document's pixels per grid
    pub grid_scale: String,
}

/// Scene name taken from the file name without its final extension
pub fn scene_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Build a square-grid scene upload whose base map is the embedded image
pub fn build_scene_upload(
    document: &UniversalVtt,
    file_name: &str,
) -> Result<SceneUpload, ImportError> {
    let encoded = document.image().ok_or(ImportError::MissingImage)?;
    let ppg = document.pixels_per_grid();
    let base_map = ImageUpload::from_base64(MAP_IMAGE_NAME, encoded, ppg)?;
    let upload = SceneUpload {
        name: scene_name(file_name),
        base_map,
        grid_type: GridType::Square,
        grid_scale: ppg.to_string(),
    };
    info!(
        scene = %upload.name,
        width = upload.base_map.width,
        height = upload.base_map.height,
        mime = %upload.base_map.mime_type,
        "built scene upload"
    );
    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uvtt::parse_uvtt;

    /// 4x2 RGB PNG
    const TINY_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAQAAAACCAIAAADwyuo0AAAAEElEQVR4nGNoSHCAIwZkDgB3GgkBGixyIgAAAABJRU5ErkJggg==";

    fn doc_with_image(image: Option<&str>, ppg: f64) -> UniversalVtt {
        let image = image
            .map(|i| format!(r#", "image": "{}""#, i))
            .unwrap_or_default();
        parse_uvtt(&format!(
            r#"{{ "resolution": {{ "pixels_per_grid": {} }}{} }}"#,
            ppg, image
        ))
        .unwrap()
    }

    #[test]
    fn test_scene_name_strips_last_extension() {
        assert_eq!(scene_name("tavern.dd2vtt"), "tavern");
        assert_eq!(scene_name("old.keep.uvtt"), "old.keep");
        assert_eq!(scene_name("plain"), "plain");
    }

    #[test]
    fn test_decode_png_upload() {
        let upload = ImageUpload::from_base64(MAP_IMAGE_NAME, TINY_PNG, 256.0).unwrap();
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!((upload.width, upload.height), (4, 2));
        assert_eq!(upload.extension(), "png");
        assert_eq!(&upload.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_build_scene_upload() {
        let doc = doc_with_image(Some(TINY_PNG), 256.0);
        let upload = build_scene_upload(&doc, "tavern.dd2vtt").unwrap();
        assert_eq!(upload.name, "tavern");
        assert_eq!(upload.grid_type, GridType::Square);
        assert_eq!(upload.grid_scale, "256");
        assert_eq!(upload.base_map.name, "Imported Map");
        assert_eq!(upload.base_map.dpi, 256.0);
    }

    #[test]
    fn test_fractional_grid_scale() {
        let doc = doc_with_image(Some(TINY_PNG), 70.5);
        assert_eq!(build_scene_upload(&doc, "a.uvtt").unwrap().grid_scale, "70.5");
    }

    #[test]
    fn test_missing_image_fails() {
        let doc = doc_with_image(None, 70.0);
        let err = build_scene_upload(&doc, "a.uvtt").unwrap_err();
        assert!(matches!(err, ImportError::MissingImage));
        assert_eq!(err.to_string(), "No map image found in UVTT file");
    }

    #[test]
    fn test_invalid_base64_fails() {
        let doc = doc_with_image(Some("not*base64"), 70.0);
        assert!(matches!(
            build_scene_upload(&doc, "a.uvtt"),
            Err(ImportError::ImageDecode(_))
        ));
    }

    #[test]
    fn test_non_image_bytes_fail() {
        // "hello world"
        let doc = doc_with_image(Some("aGVsbG8gd29ybGQ="), 70.0);
        assert!(matches!(
            build_scene_upload(&doc, "a.uvtt"),
            Err(ImportError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_upload_json_omits_bytes() {
        let doc = doc_with_image(Some(TINY_PNG), 100.0);
        let json = serde_json::to_value(build_scene_upload(&doc, "a.uvtt").unwrap()).unwrap();
        assert_eq!(json["gridType"], "SQUARE");
        assert_eq!(json["baseMap"]["mimeType"], "image/png");
        assert!(json["baseMap"].get("bytes").is_none());
    }
}
