//! SVG preview of a converted map

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::ImportError;
use crate::items::{Item, ItemKind, LIGHT_SOURCE_RADIUS, PathCommand};
use crate::uvtt::UniversalVtt;

/// Format a number with 3 decimal places, treating -0 as 0
fn f(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:.3}", n)
}

/// SVG path data for a command list
pub fn path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|cmd| match cmd {
            PathCommand::Move(p) => format!("M{},{}", f(p.x), f(p.y)),
            PathCommand::Line(p) => format!("L{},{}", f(p.x), f(p.y)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn light_radius(item: &Item) -> f64 {
    item.metadata
        .iter()
        .find(|(key, _)| key.ends_with("/light"))
        .and_then(|(_, meta)| meta["attenuationRadius"].as_f64())
        .unwrap_or(LIGHT_SOURCE_RADIUS)
}

/// Canvas size: the map extent in pixels, else the item bounds
fn canvas_size(document: &UniversalVtt, items: &[Item], dpi: f64) -> (f64, f64) {
    let size = document.resolution.map_size;
    if size.x > 0.0 && size.y > 0.0 {
        return (size.x * dpi, size.y * dpi);
    }

    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for item in items {
        for cmd in item.commands() {
            let p = cmd.point();
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if item.kind == ItemKind::Basic {
            let r = light_radius(item);
            max_x = max_x.max(item.position.x + r);
            max_y = max_y.max(item.position.y + r);
        }
    }

    if max_x.is_finite() && max_y.is_finite() && max_x > 0.0 && max_y > 0.0 {
        (max_x, max_y)
    } else {
        (100.0, 100.0)
    }
}

fn write_svg(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    document: &UniversalVtt,
    items: &[Item],
    dpi: f64,
) -> std::io::Result<()> {
    let (w, h) = canvas_size(document, items, dpi);
    let (width, height) = (f(w), f(h));
    let view_box = format!("0 0 {} {}", width, height);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    writer.write_event(Event::Start(BytesStart::new("svg").with_attributes([
        ("xmlns", "http://www.w3.org/2000/svg"),
        ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("viewBox", view_box.as_str()),
    ])))?;

    if let Some(image) = document.image() {
        let href = format!("data:image/png;base64,{}", image.trim());
        writer.write_event(Event::Empty(BytesStart::new("image").with_attributes([
            ("x", "0"),
            ("y", "0"),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("xlink:href", href.as_str()),
        ])))?;
    }

    for item in items {
        match &item.path {
            Some(shape) => {
                let d = path_data(&shape.commands);
                let style = shape.style.to_svg_style();
                writer.write_event(Event::Empty(BytesStart::new("path").with_attributes([
                    ("class", item.name.to_lowercase().as_str()),
                    ("d", d.as_str()),
                    ("style", style.as_str()),
                ])))?;
            }
            None if item.kind == ItemKind::Basic => {
                let (cx, cy, r) = (
                    f(item.position.x),
                    f(item.position.y),
                    f(light_radius(item)),
                );
                writer.write_event(Event::Empty(BytesStart::new("circle").with_attributes([
                    ("class", "light"),
                    ("cx", cx.as_str()),
                    ("cy", cy.as_str()),
                    ("r", r.as_str()),
                    ("style", "stroke:#FFCC00;stroke-width:1;fill:#FFCC00;fill-opacity:0.15"),
                ])))?;
            }
            None => {}
        }
    }

    writer.write_event(Event::End(BytesEnd::new("svg")))
}

/// Render the document's map image and converted items as an SVG string
pub fn render_preview(
    document: &UniversalVtt,
    items: &[Item],
    dpi: f64,
) -> Result<String, ImportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
    write_svg(&mut writer, document, items, dpi).map_err(ImportError::Preview)?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| {
        ImportError::Preview(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportOptions, build_scene_items};
    use crate::uvtt::{Vector2, parse_uvtt};

    fn preview(json: &str, dpi: f64, include_lights: bool) -> String {
        let doc = parse_uvtt(json).unwrap();
        let options = ImportOptions {
            include_lights,
            ..ImportOptions::default()
        };
        let (items, _) = build_scene_items(&doc, dpi, "gm", &options).unwrap();
        render_preview(&doc, &items, dpi).unwrap()
    }

    #[test]
    fn test_path_data() {
        let cmds = [
            PathCommand::Move(Vector2::new(0.0, -0.0)),
            PathCommand::Line(Vector2::new(50.0, 12.5)),
        ];
        assert_eq!(path_data(&cmds), "M0.000,0.000 L50.000,12.500");
    }

    #[test]
    fn test_preview_uses_map_size() {
        let svg = preview(
            r#"{
                "resolution": { "map_size": { "x": 4, "y": 2 }, "pixels_per_grid": 70 },
                "line_of_sight": [[{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }]],
                "portals": [{ "bounds": [{ "x": 1, "y": 1 }, { "x": 2, "y": 1 }], "closed": true }]
            }"#,
            50.0,
            false,
        );
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"width="200.000""#));
        assert!(svg.contains(r#"height="100.000""#));
        assert!(svg.contains(r#"class="wall" d="M0.000,0.000 L50.000,0.000""#));
        assert!(svg.contains(r#"class="door""#));
        assert!(svg.contains("stroke:#FF0000;stroke-width:5"));
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn test_preview_falls_back_to_item_bounds() {
        let svg = preview(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "line_of_sight": [[{ "x": 0, "y": 0 }, { "x": 3, "y": 1 }]]
            }"#,
            10.0,
            false,
        );
        assert!(svg.contains(r#"viewBox="0 0 30.000 10.000""#));
    }

    #[test]
    fn test_preview_draws_lights_and_image() {
        let svg = preview(
            r#"{
                "resolution": { "pixels_per_grid": 70 },
                "lights": [{ "position": { "x": 1, "y": 1 }, "range": 2 }],
                "image": "iVBORw0KGgo="
            }"#,
            10.0,
            true,
        );
        assert!(svg.contains(r#"<circle class="light" cx="10.000" cy="10.000" r="20.000""#));
        assert!(svg.contains("data:image/png;base64,iVBORw0KGgo="));
    }

    #[test]
    fn test_empty_document_preview() {
        let svg = preview(r#"{ "resolution": { "pixels_per_grid": 70 } }"#, 10.0, false);
        assert!(svg.contains(r#"viewBox="0 0 100.000 100.000""#));
    }
}
