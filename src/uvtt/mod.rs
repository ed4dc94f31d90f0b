//! Universal VTT format model
//!
//! Parses the JSON map exports written by Dungeondraft (`.dd2vtt`),
//! DungeonFog (`.df2vtt`) and other tools (`.uvtt`). All three share one
//! schema: grid resolution, wall polylines, portals, lights and a base64
//! map image.

pub mod parser;
pub mod types;

pub use parser::{SUPPORTED_EXTENSIONS, is_supported_file, parse_uvtt, read_uvtt_file};
pub use types::*;
