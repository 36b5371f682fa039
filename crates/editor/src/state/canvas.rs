//! 2D canvases: the architecture diagram, the styled stack layout and the
//! icon board.
//!
//! Moves go through the same collision engine as the 3D scene. Canvas
//! `(x, y)` maps to the ground plane `(x, z)`; the engine never looks at
//! height, so the canvas y axis becomes the world z axis.

use serde::{Deserialize, Serialize};
use shared::design::{
    Diagram, DiagramEdge, DiagramNode, Point2D, PolygonPath, StyledLayout, TechStackElement, TechStackIcon,
};
use shared::{CollisionConfig, GeometryType, PlacedObject};

pub fn to_ground(p: Point2D) -> [f64; 3] {
    [p.x, 0.0, p.y]
}

pub fn from_ground(p: [f64; 3]) -> Point2D {
    Point2D { x: p[0], y: p[2] }
}

/// Stand-ins for canvas items so the 3D engine can check them
fn proxies<'a>(items: impl Iterator<Item = (&'a str, Point2D)>) -> Vec<PlacedObject> {
    items
        .map(|(id, position)| {
            let mut proxy = PlacedObject::new(id, id, GeometryType::Box.canonical());
            proxy.transform.position = to_ground(position);
            proxy
        })
        .collect()
}

fn resolve(id: &str, proposed: Point2D, others: &[PlacedObject], config: &CollisionConfig) -> Point2D {
    from_ground(shared::resolve_position(id, to_ground(proposed), others, config))
}

fn free(id: &str, start: Point2D, others: &[PlacedObject], config: &CollisionConfig) -> Point2D {
    from_ground(shared::free_position(id, to_ground(start), others, config))
}

/// Partial polygon edit; `None` leaves the field as is
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolygonPatch {
    pub svg_path: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl PolygonPatch {
    fn apply(&self, polygon: &mut PolygonPath) {
        if let Some(path) = &self.svg_path {
            polygon.svg_path = path.clone();
        }
        if let Some(fill) = &self.fill {
            polygon.fill = fill.clone();
        }
        if let Some(stroke) = &self.stroke {
            polygon.stroke = stroke.clone();
        }
        if let Some(width) = self.stroke_width.filter(|w| w.is_finite()) {
            polygon.stroke_width = width;
        }
        if let Some(opacity) = self.opacity.filter(|o| o.is_finite()) {
            polygon.opacity = Some(opacity.clamp(0.0, 1.0));
        }
    }
}

// ── Diagram ───────────────────────────────────────────────────

/// Node fields editable in place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Architecture diagram with node selection
#[derive(Debug, Clone, Default)]
pub struct DiagramState {
    pub diagram: Diagram,
    selected: Vec<String>,
}

impl DiagramState {
    /// Replace the whole diagram (e.g. a fresh AI result)
    pub fn set_diagram(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.selected.clear();
    }

    pub fn clear(&mut self) {
        self.set_diagram(Diagram::default());
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.diagram.nodes.iter().find(|n| n.id == id)
    }

    fn node_proxies(&self) -> Vec<PlacedObject> {
        proxies(self.diagram.nodes.iter().map(|n| (n.id.as_str(), n.position)))
    }

    /// Add a node at the free spot nearest to its requested position.
    /// Returns the position used, or `None` if the id is taken.
    pub fn add_node(&mut self, mut node: DiagramNode, config: &CollisionConfig) -> Option<Point2D> {
        if self.node(&node.id).is_some() {
            return None;
        }
        node.position = free(&node.id, node.position, &self.node_proxies(), config);
        let position = node.position;
        self.diagram.nodes.push(node);
        Some(position)
    }

    /// Remove a node together with its edges and selection
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.diagram.nodes.len();
        self.diagram.nodes.retain(|n| n.id != id);
        if self.diagram.nodes.len() == before {
            return false;
        }
        self.diagram.edges.retain(|e| e.source != id && e.target != id);
        self.selected.retain(|s| s != id);
        true
    }

    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        let Some(node) = self.diagram.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(category) = patch.category {
            node.category = Some(category);
        }
        if let Some(description) = patch.description {
            node.description = Some(description);
        }
        true
    }

    /// Move a node with collision correction; returns the position written
    pub fn move_node(&mut self, id: &str, proposed: Point2D, config: &CollisionConfig) -> Option<Point2D> {
        self.node(id)?;
        let position = resolve(id, proposed, &self.node_proxies(), config);
        let node = self.diagram.nodes.iter_mut().find(|n| n.id == id)?;
        node.position = position;
        Some(position)
    }

    /// Connect two existing nodes; duplicate ids and dangling ends are refused
    pub fn add_edge(&mut self, edge: DiagramEdge) -> bool {
        let dangling = self.node(&edge.source).is_none() || self.node(&edge.target).is_none();
        if dangling || self.diagram.edges.iter().any(|e| e.id == edge.id) {
            return false;
        }
        self.diagram.edges.push(edge);
        true
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.diagram.edges.len();
        self.diagram.edges.retain(|e| e.id != id);
        self.diagram.edges.len() != before
    }

    /// Select a node; with `multi_select` the node is toggled instead
    pub fn select_node(&mut self, id: &str, multi_select: bool) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if !multi_select {
            self.selected = vec![id.to_string()];
        } else if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }
}

// ── Styled layout ─────────────────────────────────────────────

/// Styled stack layout: stamped elements over a fixed background
#[derive(Debug, Clone, Default)]
pub struct LayoutCanvas {
    pub elements: Vec<TechStackElement>,
    pub background_polygons: Vec<PolygonPath>,
    pub description: String,
    selected_element: Option<String>,
    selected_polygon: Option<String>,
}

impl LayoutCanvas {
    pub fn set_layout(&mut self, layout: StyledLayout) {
        self.elements = layout.elements;
        self.background_polygons = layout.background_polygons;
        self.description = layout.description;
        self.selected_element = None;
        self.selected_polygon = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn element(&self, id: &str) -> Option<&TechStackElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn move_element(&mut self, id: &str, proposed: Point2D, config: &CollisionConfig) -> Option<Point2D> {
        self.element(id)?;
        let others = proxies(self.elements.iter().map(|e| (e.id.as_str(), e.position)));
        let position = resolve(id, proposed, &others, config);
        let element = self.elements.iter_mut().find(|e| e.id == id)?;
        element.position = position;
        Some(position)
    }

    /// Selecting an element drops the polygon selection
    pub fn select_element(&mut self, id: Option<&str>) {
        self.selected_element = id.map(str::to_string);
        self.selected_polygon = None;
    }

    pub fn select_polygon(&mut self, id: Option<&str>) {
        self.selected_polygon = id.map(str::to_string);
    }

    fn polygons(&self) -> impl Iterator<Item = &PolygonPath> {
        self.background_polygons
            .iter()
            .chain(self.elements.iter().flat_map(|e| e.polygons.iter()))
    }

    /// Background polygons are searched before element polygons
    pub fn selected_polygon(&self) -> Option<&PolygonPath> {
        let id = self.selected_polygon.as_deref()?;
        self.polygons().find(|p| p.id == id)
    }

    /// Edit every polygon with this id, background and elements alike.
    /// Template ids repeat once per element, so one edit restyles them all.
    pub fn update_polygon(&mut self, polygon_id: &str, patch: &PolygonPatch) -> usize {
        let mut updated = 0;
        let all = self
            .background_polygons
            .iter_mut()
            .chain(self.elements.iter_mut().flat_map(|e| e.polygons.iter_mut()));
        for polygon in all.filter(|p| p.id == polygon_id) {
            patch.apply(polygon);
            updated += 1;
        }
        updated
    }
}

// ── Icon board ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedIcon {
    pub id: String,
    pub position: Point2D,
    pub icon: TechStackIcon,
}

/// Generated icons laid out on a board for editing
#[derive(Debug, Clone, Default)]
pub struct IconBoard {
    pub icons: Vec<PlacedIcon>,
    selected_icon: Option<String>,
    selected_polygon: Option<String>,
}

impl IconBoard {
    pub fn get(&self, id: &str) -> Option<&PlacedIcon> {
        self.icons.iter().find(|i| i.id == id)
    }

    fn icon_proxies(&self) -> Vec<PlacedObject> {
        proxies(self.icons.iter().map(|i| (i.id.as_str(), i.position)))
    }

    /// Place an icon at the free spot nearest to `position`
    pub fn add_icon(&mut self, icon: TechStackIcon, position: Point2D, config: &CollisionConfig) -> String {
        let id = format!("icon-{}", uuid::Uuid::new_v4());
        let position = free(&id, position, &self.icon_proxies(), config);
        self.icons.push(PlacedIcon {
            id: id.clone(),
            position,
            icon,
        });
        id
    }

    pub fn remove_icon(&mut self, id: &str) -> bool {
        let before = self.icons.len();
        self.icons.retain(|i| i.id != id);
        if self.selected_icon.as_deref() == Some(id) {
            self.selected_icon = None;
            self.selected_polygon = None;
        }
        self.icons.len() != before
    }

    pub fn move_icon(&mut self, id: &str, proposed: Point2D, config: &CollisionConfig) -> Option<Point2D> {
        self.get(id)?;
        let position = resolve(id, proposed, &self.icon_proxies(), config);
        let icon = self.icons.iter_mut().find(|i| i.id == id)?;
        icon.position = position;
        Some(position)
    }

    pub fn select_icon(&mut self, id: Option<&str>) {
        self.selected_icon = id.map(str::to_string);
        self.selected_polygon = None;
    }

    pub fn select_polygon(&mut self, id: Option<&str>) {
        self.selected_polygon = id.map(str::to_string);
    }

    pub fn selected_polygon(&self) -> Option<&PolygonPath> {
        let icon = self.get(self.selected_icon.as_deref()?)?;
        let id = self.selected_polygon.as_deref()?;
        icon.icon.polygons.iter().find(|p| p.id == id)
    }

    pub fn update_polygon(&mut self, icon_id: &str, polygon_id: &str, patch: &PolygonPatch) -> bool {
        let polygon = self
            .icons
            .iter_mut()
            .find(|i| i.id == icon_id)
            .and_then(|i| i.icon.polygons.iter_mut().find(|p| p.id == polygon_id));
        match polygon {
            Some(polygon) => {
                patch.apply(polygon);
                true
            }
            None => false,
        }
    }
}
