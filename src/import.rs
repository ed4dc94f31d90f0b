//! The two import paths: a new scene from the map image, or walls, doors
//! and (optionally) lights added to the current scene.

use tracing::{info, warn};

use crate::config::{ImportConfig, ReadinessPolicy};
use crate::error::ImportError;
use crate::geometry::{GridScale, OriginOffset, convert_lights, convert_portals, convert_walls};
use crate::host::SceneHost;
use crate::items::{DEFAULT_PLUGIN_ID, Item, SceneItemBuilder};
use crate::scene::build_scene_upload;
use crate::uvtt::{UniversalVtt, parse_uvtt};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub readiness: ReadinessPolicy,
    /// Light items are built only when set
    pub include_lights: bool,
    pub origin_offset: OriginOffset,
    pub plugin_id: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            readiness: ReadinessPolicy::default(),
            include_lights: false,
            origin_offset: OriginOffset::default(),
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
        }
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            readiness: config.readiness,
            include_lights: config.include_lights,
            origin_offset: config.origin_offset,
            plugin_id: config.plugin_id.clone(),
        }
    }
}

/// Counts of the items submitted by one import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub walls: usize,
    pub doors: usize,
    pub lights: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.walls + self.doors + self.lights
    }
}

/// Build the scene items for a document: walls, then doors, then lights
pub fn build_scene_items(
    document: &UniversalVtt,
    dpi: f64,
    player_id: &str,
    options: &ImportOptions,
) -> Result<(Vec<Item>, ImportSummary), ImportError> {
    let scale = GridScale::for_document(document, dpi, options.origin_offset)?;
    let builder = SceneItemBuilder::new(options.plugin_id.as_str(), player_id);

    let walls = convert_walls(document, &scale)?;
    if document.walls().next().is_none() {
        warn!("no wall data found in the UVTT file");
    }
    let doors = convert_portals(document, &scale)?;
    let lights = if options.include_lights {
        convert_lights(document, &scale)?
    } else {
        Vec::new()
    };

    let summary = ImportSummary {
        walls: walls.len(),
        doors: doors.len(),
        lights: lights.len(),
    };

    let mut items = Vec::with_capacity(summary.total());
    items.extend(walls.iter().map(|wall| builder.wall(wall)));
    items.extend(doors.iter().map(|door| builder.door(door)));
    items.extend(lights.iter().map(|light| builder.light(light)));
    Ok((items, summary))
}

/// Add the document's walls, doors and lights to the host's current scene
///
/// Items are submitted in one batch, after which the fog layer is filled.
pub fn add_items_from_vtt<H: SceneHost + ?Sized>(
    host: &mut H,
    content: &str,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    if !host.is_scene_ready()? {
        match options.readiness {
            ReadinessPolicy::Block => return Err(ImportError::SceneNotReady),
            ReadinessPolicy::Warn => {
                warn!("scene is not ready, importing anyway");
            }
        }
    }

    let document = parse_uvtt(content)?;
    let dpi = host.grid_dpi()?;
    let player_id = host.player_id()?;

    let (items, summary) = build_scene_items(&document, dpi, &player_id, options)?;
    info!(
        walls = summary.walls,
        doors = summary.doors,
        lights = summary.lights,
        dpi,
        "adding items to scene"
    );
    host.add_items(&items)?;
    host.set_fog_filled(true)?;
    Ok(summary)
}

/// Create a new scene whose base map is the document's embedded image
///
/// Returns the name of the uploaded scene.
pub fn upload_scene_from_vtt<H: SceneHost + ?Sized>(
    host: &mut H,
    file_name: &str,
    content: &str,
) -> Result<String, ImportError> {
    let document = parse_uvtt(content)?;
    let upload = build_scene_upload(&document, file_name)?;
    let name = upload.name.clone();
    host.upload_scenes(vec![upload])?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_order_walls_doors_lights() {
        let doc = parse_uvtt(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "lights": [{ "position": { "x": 1, "y": 1 }, "range": 2 }],
                "portals": [{ "bounds": [{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }], "closed": false }],
                "line_of_sight": [[{ "x": 0, "y": 0 }, { "x": 0, "y": 1 }]]
            }"#,
        )
        .unwrap();
        let options = ImportOptions {
            include_lights: true,
            ..ImportOptions::default()
        };
        let (items, summary) = build_scene_items(&doc, 10.0, "gm", &options).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Wall", "Door", "Light"]);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_lights_disabled_by_default() {
        let doc = parse_uvtt(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "lights": [{ "position": { "x": 1, "y": 1 }, "range": 2 }]
            }"#,
        )
        .unwrap();
        let (items, summary) =
            build_scene_items(&doc, 10.0, "gm", &ImportOptions::default()).unwrap();
        assert!(items.is_empty());
        assert_eq!(summary.lights, 0);
    }

    #[test]
    fn test_invalid_host_dpi_is_rejected() {
        let doc = parse_uvtt(r#"{ "resolution": { "pixels_per_grid": 70 } }"#).unwrap();
        assert!(matches!(
            build_scene_items(&doc, 0.0, "gm", &ImportOptions::default()),
            Err(ImportError::InvalidDpi(_))
        ));
    }

    #[test]
    fn test_options_from_config() {
        let config = ImportConfig {
            readiness: ReadinessPolicy::Warn,
            include_lights: true,
            plugin_id: "x.y".to_string(),
            ..ImportConfig::default()
        };
        let options = ImportOptions::from(&config);
        assert_eq!(options.readiness, ReadinessPolicy::Warn);
        assert!(options.include_lights);
        assert_eq!(options.plugin_id, "x.y");
    }
}
