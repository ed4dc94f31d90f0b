//! # uvtt-import
//!
//! Converts Universal VTT map exports (`.uvtt`, `.dd2vtt`, `.df2vtt`) into
//! virtual tabletop scene content.
//!
//! ## Features
//!
//! - **New scene**: upload the embedded map image as a square-grid scene
//! - **Scene items**: turn walls and portals into fog-layer path items, with
//!   an optional light pipeline
//! - **Preview**: render the converted geometry over the map as SVG
//!
//! ## Example - Import Items
//!
//! ```rust,ignore
//! use uvtt_import::{DirectoryHost, ImportOptions, add_items_from_vtt};
//!
//! let content = std::fs::read_to_string("tavern.dd2vtt").unwrap();
//! let mut host = DirectoryHost::new("out", 150.0, "gm");
//! let summary = add_items_from_vtt(&mut host, &content, &ImportOptions::default()).unwrap();
//! println!("{} walls, {} doors", summary.walls, summary.doors);
//! ```
//!
//! ## Example - Preview
//!
//! ```rust,ignore
//! use uvtt_import::{ImportOptions, build_scene_items, parse_uvtt, render_preview};
//!
//! let doc = parse_uvtt(&std::fs::read_to_string("tavern.dd2vtt").unwrap()).unwrap();
//! let (items, _) = build_scene_items(&doc, 100.0, "gm", &ImportOptions::default()).unwrap();
//! std::fs::write("tavern.svg", render_preview(&doc, &items, 100.0).unwrap()).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod import;
pub mod items;
pub mod scene;
pub mod style;
pub mod svg;
pub mod ui;
pub mod uvtt;

// Re-export commonly used items
pub use error::ImportError;
pub use host::{DirectoryHost, HostError, NotificationLevel, SceneHost};
pub use import::{
    ImportOptions, ImportSummary, add_items_from_vtt, build_scene_items, upload_scene_from_vtt,
};
pub use items::{Item, SceneItemBuilder};
pub use scene::{SceneUpload, build_scene_upload};
pub use svg::render_preview;
pub use ui::{ImportAction, run_import_action};
pub use uvtt::{UniversalVtt, parse_uvtt, read_uvtt_file};
