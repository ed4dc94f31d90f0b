//! Host scene item representations
//!
//! Items serialize to the JSON shape the tabletop host expects from
//! `addItems`: camelCase fields, a `type` tag, and path commands encoded as
//! `[verb, x, y]` tuples.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::geometry::{DoorSegment, LightSource, WallPath};
use crate::style::{FillRule, PathStyle};
use crate::uvtt::Vector2;

pub const DEFAULT_PLUGIN_ID: &str = "com.uvtt-import";

/// Source radius given to every imported light
pub const LIGHT_SOURCE_RADIUS: f64 = 25.0;
pub const LIGHT_FALLOFF: f64 = 0.2;

/// Namespaced key under the extension's plugin id
pub fn plugin_key(plugin_id: &str, path: &str) -> String {
    format!("{}/{}", plugin_id, path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Path,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Fog,
    Character,
}

/// Path drawing command, serialized as the host's numeric verb tuple
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    Move(Vector2),
    Line(Vector2),
}

impl PathCommand {
    const MOVE: u8 = 0;
    const LINE: u8 = 1;

    pub fn point(&self) -> Vector2 {
        match self {
            PathCommand::Move(p) | PathCommand::Line(p) => *p,
        }
    }
}

impl Serialize for PathCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathCommand::Move(p) => (Self::MOVE, p.x, p.y).serialize(serializer),
            PathCommand::Line(p) => (Self::LINE, p.x, p.y).serialize(serializer),
        }
    }
}

/// Polyline commands: move to the first point, line to each following one
pub fn polyline_commands(points: &[Vector2]) -> Vec<PathCommand> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                PathCommand::Move(*p)
            } else {
                PathCommand::Line(*p)
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathShape {
    pub commands: Vec<PathCommand>,
    pub fill_rule: FillRule,
    pub style: PathStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub created_user_id: String,
    pub last_modified: String,
    pub last_modified_user_id: String,
    pub z_index: f64,
    pub position: Vector2,
    pub rotation: f64,
    pub scale: Vector2,
    pub layer: Layer,
    pub metadata: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub path: Option<PathShape>,
}

impl Item {
    pub fn commands(&self) -> &[PathCommand] {
        self.path
            .as_ref()
            .map(|p| p.commands.as_slice())
            .unwrap_or(&[])
    }
}

/// Builds host items for one import batch
///
/// All items of a batch share the author and the modification timestamp.
#[derive(Debug, Clone)]
pub struct SceneItemBuilder {
    plugin_id: String,
    player_id: String,
    timestamp: String,
}

impl SceneItemBuilder {
    pub fn new(plugin_id: impl Into<String>, player_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            player_id: player_id.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn base(&self, kind: ItemKind, name: &str, layer: Layer) -> Item {
        Item {
            kind,
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
            locked: false,
            created_user_id: self.player_id.clone(),
            last_modified: self.timestamp.clone(),
            last_modified_user_id: self.player_id.clone(),
            z_index: 0.0,
            position: Vector2::default(),
            rotation: 0.0,
            scale: Vector2::new(1.0, 1.0),
            layer,
            metadata: BTreeMap::new(),
            path: None,
        }
    }

    /// Unfilled black polyline on the fog layer
    pub fn wall(&self, wall: &WallPath) -> Item {
        let mut item = self.base(ItemKind::Path, "Wall", Layer::Fog);
        item.path = Some(PathShape {
            commands: polyline_commands(&wall.points),
            fill_rule: FillRule::Nonzero,
            style: PathStyle::wall(),
        });
        item
    }

    /// Red connector segment on the fog layer carrying door state metadata
    pub fn door(&self, door: &DoorSegment) -> Item {
        let mut item = self.base(ItemKind::Path, "Door", Layer::Fog);
        item.path = Some(PathShape {
            commands: vec![PathCommand::Move(door.start), PathCommand::Line(door.end)],
            fill_rule: FillRule::Nonzero,
            style: PathStyle::door(),
        });
        item.metadata.insert(
            plugin_key(&self.plugin_id, "doors"),
            json!([{
                "open": door.open,
                "start": { "distance": 0.0, "index": 0 },
                "end": { "distance": door.length, "index": 0 },
            }]),
        );
        item
    }

    pub fn light(&self, light: &LightSource) -> Item {
        let mut item = self.base(ItemKind::Basic, "Light", Layer::Character);
        item.position = light.position;
        item.metadata.insert(
            plugin_key(&self.plugin_id, "light"),
            json!({
                "attenuationRadius": light.attenuation_radius,
                "sourceRadius": LIGHT_SOURCE_RADIUS,
                "falloff": LIGHT_FALLOFF,
                "lightType": "PRIMARY",
            }),
        );
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SceneItemBuilder {
        SceneItemBuilder::new(DEFAULT_PLUGIN_ID, "player-1")
    }

    #[test]
    fn test_wall_item_json_shape() {
        let wall = WallPath {
            points: vec![Vector2::new(0.0, 0.0), Vector2::new(50.0, 0.0), Vector2::new(50.0, 25.0)],
        };
        let item = builder().wall(&wall);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "PATH");
        assert_eq!(json["name"], "Wall");
        assert_eq!(json["layer"], "FOG");
        assert_eq!(json["visible"], true);
        assert_eq!(json["createdUserId"], "player-1");
        assert_eq!(json["fillRule"], "nonzero");
        assert_eq!(json["style"]["strokeColor"], "#000000");
        assert_eq!(
            json["commands"],
            json!([[0, 0.0, 0.0], [1, 50.0, 0.0], [1, 50.0, 25.0]])
        );
        assert!(json["metadata"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_door_item_metadata() {
        let door = DoorSegment {
            start: Vector2::new(0.0, 0.0),
            end: Vector2::new(20.0, 0.0),
            length: 20.0,
            open: false,
        };
        let item = builder().door(&door);
        assert_eq!(item.commands().len(), 2);
        assert_eq!(item.path.as_ref().map(|p| p.style.stroke_width), Some(5.0));

        let meta = &item.metadata["com.uvtt-import/doors"];
        assert_eq!(meta[0]["open"], false);
        assert_eq!(meta[0]["start"]["distance"], 0.0);
        assert_eq!(meta[0]["end"]["distance"], 20.0);
        assert_eq!(meta[0]["end"]["index"], 0);
    }

    #[test]
    fn test_light_item_is_basic_on_character_layer() {
        let light = LightSource {
            position: Vector2::new(100.0, 200.0),
            attenuation_radius: 300.0,
            intensity: 1.0,
            color: "ffffffff".to_string(),
            shadows: true,
        };
        let item = builder().light(&light);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "BASIC");
        assert_eq!(json["layer"], "CHARACTER");
        assert_eq!(json["position"], json!({ "x": 100.0, "y": 200.0 }));
        assert!(json.get("commands").is_none());

        let meta = &json["metadata"]["com.uvtt-import/light"];
        assert_eq!(meta["attenuationRadius"], 300.0);
        assert_eq!(meta["sourceRadius"], 25.0);
        assert_eq!(meta["falloff"], 0.2);
        assert_eq!(meta["lightType"], "PRIMARY");
    }

    #[test]
    fn test_items_get_distinct_ids() {
        let wall = WallPath {
            points: vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)],
        };
        let b = builder();
        assert_ne!(b.wall(&wall).id, b.wall(&wall).id);
    }

    #[test]
    fn test_last_modified_is_utc_millis() {
        let ts = builder().timestamp;
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.split('.').nth(1).map(str::len), Some(4));
    }
}
