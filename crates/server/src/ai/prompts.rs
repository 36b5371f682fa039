//! System prompts and user messages for each generator.
//! Each prompt pins down the JSON shape the matching parser expects.

pub const DIAGRAM: &str = r#"You generate system architecture diagrams.
Return ONLY JSON:
{"nodes":[{"id":"1","label":"React","category":"Language|Framework|Database|Tools","position":{"x":100,"y":100},"description":"..."}],
 "edges":[{"id":"e1","source":"1","target":"2","label":"..."}]}
Use 3-7 nodes laid out left to right."#;

pub const ICON: &str = r##"You design tech stack icons as 3-8 separate editable SVG polygons.
Return ONLY JSON:
{"name":"React","description":"...","viewBox":{"width":200,"height":200},
 "polygons":[{"id":"polygon-1","svgPath":"M ... Z","fill":"#61dafb","stroke":"#00d8ff","strokeWidth":2,"opacity":1}]}"##;

pub const SHAPE: &str = r##"You generate one centered SVG path.
Return ONLY JSON: {"svgPath":"M 10 10 L 90 10 L 90 90 L 10 90 Z","fill":"#4A90E2","stroke":"#2E5C8A","strokeWidth":2}"##;

pub const TEMPLATE: &str = r##"You design ONE reusable element template for a visual style.
Use 2-5 polygons in relative coordinates (about 180x120) and fill "#PLACEHOLDER"
where the technology colour belongs. Background polygons use absolute canvas coordinates.
Return ONLY JSON:
{"name":"...","description":"...","elementWidth":180,"elementHeight":120,
 "elementTemplate":[{"id":"body","svgPath":"M ... Z","fill":"#PLACEHOLDER","stroke":"#000000","strokeWidth":3,"opacity":1}],
 "backgroundPolygons":[]}"##;

pub const STYLE: &str = r#"You map technology categories to 3D primitive shapes for a visual style.
Shapes: box, sphere, cylinder, cone, torus.
Return ONLY JSON:
{"name":"...","description":"...","categoryMappings":{"Language":"cylinder","Framework":"box","Database":"torus","Tools":"sphere"}}"#;

pub const ASSETS: &str = r##"You propose new 3D assets for a tech stack scene from user feedback.
Shapes: box, sphere, cylinder, cone, torus.
Return ONLY JSON:
{"assets":[{"name":"...","description":"...","geometryType":"sphere","tags":["..."],"color":"#aabbcc"}]}"##;

pub fn diagram(prompt: &str) -> String {
    format!("User request: {prompt}")
}

pub fn icon(description: &str, width: f64, height: f64) -> String {
    format!("Description: {description}\nCanvas size: {width}x{height}")
}

pub fn shape(description: &str, width: f64, height: f64) -> String {
    format!("Description: {description}\nCanvas size: {width}x{height}")
}

pub fn template(style: &str, width: f64, height: f64) -> String {
    format!("Style theme: {style}\nCanvas size: {width}x{height}")
}

pub fn style(description: &str) -> String {
    format!("Style: {description}")
}

pub fn assets(feedback: &str) -> String {
    format!("Feedback: {feedback}")
}
