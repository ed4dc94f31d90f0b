//! Boundary to the tabletop host runtime
//!
//! Everything the importer does to the outside world goes through
//! [`SceneHost`]: readiness and grid queries, batch item insertion, the fog
//! fill toggle, scene uploads and user notifications.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::items::Item;
use crate::scene::SceneUpload;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize host payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Scene, asset and notification API of the host
pub trait SceneHost {
    fn is_scene_ready(&self) -> Result<bool, HostError>;

    /// Scene pixels per grid cell
    fn grid_dpi(&self) -> Result<f64, HostError>;

    fn player_id(&self) -> Result<String, HostError>;

    /// Insert a batch of items into the current scene
    fn add_items(&mut self, items: &[Item]) -> Result<(), HostError>;

    fn set_fog_filled(&mut self, filled: bool) -> Result<(), HostError>;

    fn upload_scenes(&mut self, scenes: Vec<SceneUpload>) -> Result<(), HostError>;

    fn notify(&mut self, message: &str, level: NotificationLevel) -> Result<(), HostError>;
}

pub const ITEMS_FILE: &str = "scene-items.json";
pub const FOG_FILE: &str = "fog.json";
pub const SCENE_FILE: &str = "scene.json";

/// Host backed by an output directory
///
/// Items are kept in memory and the whole scene is rewritten to
/// `scene-items.json` after every batch. Uploaded scenes land in a
/// sub-directory named after the scene.
#[derive(Debug)]
pub struct DirectoryHost {
    root: PathBuf,
    dpi: f64,
    player_id: String,
    ready: bool,
    items: Vec<Item>,
    fog_filled: bool,
    notifications: Vec<(NotificationLevel, String)>,
}

impl DirectoryHost {
    pub fn new(root: impl Into<PathBuf>, dpi: f64, player_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dpi,
            player_id: player_id.into(),
            ready: true,
            items: Vec::new(),
            fog_filled: false,
            notifications: Vec::new(),
        }
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn fog_filled(&self) -> bool {
        self.fog_filled
    }

    pub fn notifications(&self) -> &[(NotificationLevel, String)] {
        &self.notifications
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), HostError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| HostError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), HostError> {
        let json = serde_json::to_vec_pretty(value)?;
        self.write(path, &json)
    }
}

/// Directory-safe form of a scene name
fn scene_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').to_string();
    if cleaned.is_empty() {
        "scene".to_string()
    } else {
        cleaned
    }
}

impl SceneHost for DirectoryHost {
    fn is_scene_ready(&self) -> Result<bool, HostError> {
        Ok(self.ready)
    }

    fn grid_dpi(&self) -> Result<f64, HostError> {
        Ok(self.dpi)
    }

    fn player_id(&self) -> Result<String, HostError> {
        Ok(self.player_id.clone())
    }

    fn add_items(&mut self, items: &[Item]) -> Result<(), HostError> {
        let mut scene = self.items.clone();
        scene.extend_from_slice(items);
        self.write_json(&self.root.join(ITEMS_FILE), &scene)?;
        self.items = scene;
        info!(added = items.len(), total = self.items.len(), "items written");
        Ok(())
    }

    fn set_fog_filled(&mut self, filled: bool) -> Result<(), HostError> {
        self.write_json(&self.root.join(FOG_FILE), &json!({ "filled": filled }))?;
        self.fog_filled = filled;
        Ok(())
    }

    fn upload_scenes(&mut self, scenes: Vec<SceneUpload>) -> Result<(), HostError> {
        for scene in &scenes {
            let dir = self.root.join(scene_dir_name(&scene.name));
            let map_path = dir.join(format!("map.{}", scene.base_map.extension()));
            self.write(&map_path, &scene.base_map.bytes)?;
            self.write_json(&dir.join(SCENE_FILE), scene)?;
            info!(scene = %scene.name, dir = %dir.display(), "scene uploaded");
        }
        Ok(())
    }

    fn notify(&mut self, message: &str, level: NotificationLevel) -> Result<(), HostError> {
        match level {
            NotificationLevel::Error => error!("{}", message),
            NotificationLevel::Warning => warn!("{}", message),
            _ => info!(level = ?level, "{}", message),
        }
        self.notifications.push((level, message.to_string()));
        Ok(())
    }
}
