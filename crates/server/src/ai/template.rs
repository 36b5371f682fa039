//! Stamping a style template once per selected tech stack.

use shared::design::{
    Point2D, PolygonPath, StyleTemplate, StyledLayout, TechStackElement, PLACEHOLDER_COLOR,
};

pub const ELEMENT_WIDTH: f64 = 180.0;
pub const ELEMENT_HEIGHT: f64 = 120.0;

/// Left margin of the first element
const ROW_START_X: f64 = 150.0;
const ELEMENT_GAP: f64 = 50.0;
/// Elements sit on a row at this fraction of the canvas height
const ROW_HEIGHT_RATIO: f64 = 0.55;
/// Strokes standing in for the placeholder are darkened by this much
const STROKE_DARKEN: i32 = -30;

const DEFAULT_TECH_COLOR: &str = "#4A90E2";

const TECH_COLORS: &[(&str, &str)] = &[
    ("react", "#61dafb"),
    ("vue", "#42b883"),
    ("angular", "#dd0031"),
    ("svelte", "#ff3e00"),
    ("nodejs", "#339933"),
    ("python", "#3776ab"),
    ("java", "#007396"),
    ("go", "#00add8"),
    ("mongodb", "#47a248"),
    ("postgresql", "#336791"),
    ("mysql", "#4479a1"),
    ("redis", "#dc382d"),
    ("docker", "#2496ed"),
    ("kubernetes", "#326ce5"),
    ("aws", "#ff9900"),
    ("github", "#181717"),
];

/// Brand colour of a known stack, case-insensitive
pub fn tech_color(tech: &str) -> &'static str {
    let tech = tech.to_lowercase();
    TECH_COLORS
        .iter()
        .find(|(name, _)| *name == tech)
        .map_or(DEFAULT_TECH_COLOR, |(_, color)| color)
}

/// Shift each RGB channel of a `#rrggbb` colour by `amount`, clamped to 0..=255.
/// Unparseable channels are treated as 0.
pub fn adjust_color(color: &str, amount: i32) -> String {
    let hex = color.trim_start_matches('#');
    let channel = |i: usize| {
        let value = hex
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0);
        (i32::from(value) + amount).clamp(0, 255)
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(2), channel(4))
}

fn stamp(polygon: &PolygonPath, tech: &str, index: usize, color: &str) -> PolygonPath {
    PolygonPath {
        id: format!("{tech}-{}-{index}", polygon.id),
        fill: if polygon.fill == PLACEHOLDER_COLOR {
            color.to_string()
        } else {
            polygon.fill.clone()
        },
        stroke: if polygon.stroke == PLACEHOLDER_COLOR {
            adjust_color(color, STROKE_DARKEN)
        } else {
            polygon.stroke.clone()
        },
        ..polygon.clone()
    }
}

/// Lay the selected stacks out left to right, each a copy of the template
/// with placeholder colours replaced by the stack's colour.
pub fn apply_style_to_stacks(
    template: &StyleTemplate,
    selected_stacks: &[String],
    canvas_height: f64,
) -> StyledLayout {
    let step = template.element_width + ELEMENT_GAP;
    let y = canvas_height * ROW_HEIGHT_RATIO;

    let elements = selected_stacks
        .iter()
        .enumerate()
        .map(|(i, tech)| {
            let color = tech_color(tech);
            TechStackElement {
                id: format!("tech-{tech}-{i}"),
                tech_name: tech.clone(),
                position: Point2D {
                    x: ROW_START_X + i as f64 * step,
                    y,
                },
                polygons: template
                    .element_template
                    .iter()
                    .enumerate()
                    .map(|(j, polygon)| stamp(polygon, tech, j, color))
                    .collect(),
                label: Some(tech.clone()),
            }
        })
        .collect();

    StyledLayout {
        elements,
        background_polygons: template.background_polygons.clone(),
        description: format!("{} with {}", template.description, selected_stacks.join(", ")),
    }
}
