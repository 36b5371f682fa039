//! Local stand-ins returned when the model cannot be used.

use shared::design::{
    Diagram, DiagramEdge, DiagramNode, GeneratedAssets, Point2D, PolygonPath, StyleTemplate, SvgShape,
    TechStackIcon, ViewBox, PLACEHOLDER_COLOR,
};
use shared::{Asset, CategoryMappings, GeometryType, StylePreset, EXEMPT_CATEGORY};

use super::template::{adjust_color, ELEMENT_HEIGHT, ELEMENT_WIDTH};

pub const AI_THUMBNAIL: &str = "✨";

const SHAPES: [&str; 5] = [
    "M 50 10 L 90 30 L 90 70 L 50 90 L 10 70 L 10 30 Z",
    "M 10 50 L 30 10 L 70 10 L 90 50 L 70 90 L 30 90 Z",
    "M 50 10 L 80 35 L 70 70 L 30 70 L 20 35 Z",
    "M 10 10 L 90 10 L 90 90 L 10 90 Z",
    "M 50 10 L 90 40 L 75 90 L 25 90 L 10 40 Z",
];

const COLORS: [&str; 5] = ["#4A90E2", "#E24A90", "#90E24A", "#E2904A", "#904AE2"];

/// Same description, same pick
fn pick(description: &str, len: usize) -> usize {
    description.bytes().map(usize::from).sum::<usize>() % len
}

pub fn shape(description: &str) -> SvgShape {
    let color = COLORS[pick(description, COLORS.len())];
    SvgShape {
        svg_path: SHAPES[pick(description, SHAPES.len())].to_string(),
        fill: color.to_string(),
        stroke: adjust_color(color, -30),
        stroke_width: 2.0,
    }
}

fn node(id: &str, label: &str, category: &str, x: f64, description: &str) -> DiagramNode {
    DiagramNode {
        id: id.to_string(),
        label: label.to_string(),
        category: Some(category.to_string()),
        position: Point2D { x, y: 150.0 },
        description: Some(description.to_string()),
        custom_shape: None,
    }
}

fn edge(id: &str, source: &str, target: &str, label: &str) -> DiagramEdge {
    DiagramEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        label: Some(label.to_string()),
    }
}

/// Frontend → Backend → Database
pub fn diagram() -> Diagram {
    Diagram {
        nodes: vec![
            node("1", "Frontend", "Framework", 100.0, "User interface"),
            node("2", "Backend", "Language", 400.0, "Server logic"),
            node("3", "Database", "Database", 700.0, "Data storage"),
        ],
        edges: vec![
            edge("e1-2", "1", "2", "API calls"),
            edge("e2-3", "2", "3", "queries"),
        ],
    }
}

fn polygon(id: &str, svg_path: String, fill: &str, stroke: &str, stroke_width: f64, opacity: f64) -> PolygonPath {
    PolygonPath {
        id: id.to_string(),
        svg_path,
        fill: fill.to_string(),
        stroke: stroke.to_string(),
        stroke_width,
        opacity: Some(opacity),
    }
}

/// An orbit, a core and a diamond, scaled to the requested size
pub fn icon(description: &str, w: f64, h: f64) -> TechStackIcon {
    let orbit = format!(
        "M {} {} C {} {} {} {} {} {} C {} {} {} {} {} {} C {} {} {} {} {} {} C {} {} {} {} {} {} Z",
        w / 2.0, h * 0.3,
        w * 0.7, h * 0.3, w * 0.85, h * 0.4, w * 0.85, h * 0.5,
        w * 0.85, h * 0.6, w * 0.7, h * 0.7, w / 2.0, h * 0.7,
        w * 0.3, h * 0.7, w * 0.15, h * 0.6, w * 0.15, h * 0.5,
        w * 0.15, h * 0.4, w * 0.3, h * 0.3, w / 2.0, h * 0.3,
    );
    let core = format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        w * 0.35, h * 0.35, w * 0.65, h * 0.35, w * 0.65, h * 0.65, w * 0.35, h * 0.65,
    );
    let diamond = format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        w / 2.0, h * 0.4, w * 0.6, h * 0.5, w / 2.0, h * 0.6, w * 0.4, h * 0.5,
    );

    TechStackIcon {
        name: "Mock Icon".to_string(),
        description: description.to_string(),
        view_box: ViewBox { width: w, height: h },
        polygons: vec![
            polygon("polygon-1", orbit, "#61dafb", "#00d8ff", 2.0, 0.8),
            polygon("polygon-2", core, "#282c34", "#1a1e26", 1.0, 1.0),
            polygon("polygon-3", diamond, "#61dafb", "#00d8ff", 1.0, 1.0),
        ],
    }
}

/// Horizontal band across the whole canvas between two height ratios
fn band(id: &str, (w, h): (f64, f64), (top, bottom): (f64, f64), fill: &str, stroke: &str, stroke_width: f64) -> PolygonPath {
    let path = format!(
        "M 0 {} L {w} {} L {w} {} L 0 {} Z",
        h * top,
        h * top,
        h * bottom,
        h * bottom
    );
    polygon(id, path, fill, stroke, stroke_width, 1.0)
}

/// Train car on a platform with rails
pub fn style_template(w: f64, h: f64) -> StyleTemplate {
    let part = |id: &str, path: &str, fill: &str, stroke: &str, width: f64| {
        polygon(id, path.to_string(), fill, stroke, width, 1.0)
    };

    StyleTemplate {
        name: "Train Car".to_string(),
        description: "Simple train car template".to_string(),
        element_width: ELEMENT_WIDTH,
        element_height: ELEMENT_HEIGHT,
        element_template: vec![
            part("body", "M 0 20 L 180 20 L 180 120 L 0 120 Z", PLACEHOLDER_COLOR, "#000000", 3.0),
            part("roof", "M 15 20 L 165 20 L 145 0 L 35 0 Z", PLACEHOLDER_COLOR, "#000000", 2.0),
            part(
                "wheel-1",
                "M 30 120 C 30 105 45 105 45 120 C 45 135 30 135 30 120 Z",
                "#333333",
                "#222222",
                2.0,
            ),
            part(
                "wheel-2",
                "M 135 120 C 135 105 150 105 150 120 C 150 135 135 135 135 120 Z",
                "#333333",
                "#222222",
                2.0,
            ),
        ],
        background_polygons: vec![
            band("platform", (w, h), (0.75, 0.82), "#8B7355", "#654321", 2.0),
            band("rail-1", (w, h), (0.82, 0.825), "#333333", "#222222", 1.0),
            band("rail-2", (w, h), (0.86, 0.865), "#333333", "#222222", 1.0),
        ],
    }
}

pub fn style_preset(description: &str) -> StylePreset {
    StylePreset {
        id: format!("style-{}", uuid::Uuid::new_v4()),
        name: "Classic Shapes".to_string(),
        description: description.to_string(),
        category_mappings: CategoryMappings {
            language: GeometryType::Sphere,
            framework: GeometryType::Box,
            database: GeometryType::Cylinder,
            tools: GeometryType::Cone,
        },
        ai_generated: true,
        ai_prompt: Some(description.to_string()),
    }
}

/// A single box tagged with the request
pub fn assets(feedback: &str) -> GeneratedAssets {
    GeneratedAssets {
        assets: vec![Asset {
            id: format!("ai-{}", uuid::Uuid::new_v4()),
            name: "AI Generated Object 1".to_string(),
            category: EXEMPT_CATEGORY.to_string(),
            tags: vec!["ai".to_string(), "generated".to_string(), feedback.to_lowercase()],
            thumbnail: AI_THUMBNAIL.to_string(),
            description: format!("Generated based on: \"{feedback}\""),
            primitive: GeometryType::Box.canonical(),
            ai_generated: true,
            ai_prompt: Some(feedback.to_string()),
            color: None,
            display_text: None,
        }],
    }
}
