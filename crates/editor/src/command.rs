//! JSON command protocol for driving the editor from an agent or the CLI.

use serde::{Deserialize, Serialize};
use shared::design::{Diagram, DiagramEdge, DiagramNode, Point2D, StyledLayout, TechStackIcon};
use shared::{Asset, PlacedObject, Primitive, StylePreset, Transform};

use crate::picking::Ray;
use crate::state::{
    object_display_name, primitive_icon, EditorState, LayoutSettings, NodePatch, ObjectPatch, PolygonPatch,
};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Place a catalog asset in the scene
    InsertAsset { asset_id: String },
    /// Create an object from a raw primitive
    AddObject {
        name: String,
        primitive: Primitive,
        #[serde(default)]
        transform: Transform,
        #[serde(default)]
        category: Option<String>,
    },
    DeleteObject { id: String },
    DuplicateObject { id: String },
    UpdateObject {
        id: String,
        #[serde(flatten)]
        patch: ObjectPatch,
    },
    SetVisible { id: String, visible: bool },
    /// Pointer pressed on an object; starts a drag
    BeginDrag {
        id: String,
        ray: Ray,
        #[serde(default)]
        multi_select: bool,
    },
    /// Pointer moved during a drag
    DragTo { ray: Ray },
    EndDrag,
    /// Move an object to a proposed position with collision correction
    MoveObject { id: String, position: [f64; 3] },
    AutoLayout,
    /// Replace the layout and collision settings
    SetLayout { layout: LayoutSettings },
    ApplyStyle { preset: StylePreset },
    /// Filter the catalog by category; `None` or "All" shows everything
    FilterCategory {
        #[serde(default)]
        category: Option<String>,
    },
    SearchAssets { query: String },
    AddAsset { asset: Asset },
    /// Record an AI generation and add its assets to the catalog
    RecordGeneration {
        user_input: String,
        assets: Vec<Asset>,
        #[serde(default)]
        context: Option<String>,
    },
    Select { ids: Vec<String> },
    ClearSelection,
    Undo,
    Redo,
    Clear,
    /// List all objects in the scene
    Inspect,
    ExportScene,

    // 2D canvases; positions are canvas pixels
    SetDiagram { diagram: Diagram },
    ClearDiagram,
    AddNode { node: DiagramNode },
    RemoveNode { id: String },
    UpdateNode {
        id: String,
        #[serde(flatten)]
        patch: NodePatch,
    },
    MoveNode { id: String, position: Point2D },
    AddEdge { edge: DiagramEdge },
    RemoveEdge { id: String },
    SelectNode {
        id: String,
        #[serde(default)]
        multi_select: bool,
    },
    SetStyledLayout { layout: StyledLayout },
    ClearStyledLayout,
    MoveElement { id: String, position: Point2D },
    /// Edit every layout polygon with this id
    UpdateLayoutPolygon { polygon_id: String, patch: PolygonPatch },
    AddIcon {
        icon: TechStackIcon,
        #[serde(default)]
        position: Point2D,
    },
    RemoveIcon { id: String },
    MoveIcon { id: String, position: Point2D },
    UpdateIconPolygon {
        icon_id: String,
        polygon_id: String,
        patch: PolygonPatch,
    },
    /// Positions of everything on the 2D canvases
    InspectCanvas,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn not_found(id: &str) -> CommandResponse {
    CommandResponse::err(format!("Object not found: {id}"))
}

fn node_not_found(id: &str) -> CommandResponse {
    CommandResponse::err(format!("Node not found: {id}"))
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut EditorState, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::InsertAsset { asset_id } => match editor.insert_asset(&asset_id) {
            Some(id) => {
                let position = editor.scene.get_object(&id).map(PlacedObject::position);
                CommandResponse::ok_with_data(serde_json::json!({ "id": id, "position": position }))
            }
            None => CommandResponse::err(format!("Asset not found: {asset_id}")),
        },

        AgentCommand::AddObject {
            name,
            primitive,
            transform,
            category,
        } => {
            let mut object = PlacedObject::new(String::new(), name, primitive);
            object.transform = transform;
            object.category = category;
            let id = editor.scene.add_object(object);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::DeleteObject { id } => {
            if editor.delete_object(&id) {
                CommandResponse::ok_with_data(serde_json::json!({ "removed": true }))
            } else {
                not_found(&id)
            }
        }

        AgentCommand::DuplicateObject { id } => match editor.duplicate_object(&id) {
            Some(copy) => CommandResponse::ok_with_data(serde_json::json!({ "id": copy })),
            None => not_found(&id),
        },

        AgentCommand::UpdateObject { id, patch } => {
            if editor.scene.update_object(&id, patch) {
                CommandResponse::ok()
            } else {
                not_found(&id)
            }
        }

        AgentCommand::SetVisible { id, visible } => {
            if editor.scene.set_object_visible(&id, visible) {
                CommandResponse::ok()
            } else {
                not_found(&id)
            }
        }

        AgentCommand::BeginDrag {
            id,
            ray,
            multi_select,
        } => {
            if !editor.scene.contains(&id) {
                return not_found(&id);
            }
            if editor.pointer_down(&id, &ray, multi_select) {
                CommandResponse::ok()
            } else {
                CommandResponse::err("Ray does not hit the drag plane")
            }
        }

        AgentCommand::DragTo { ray } => {
            if !editor.is_dragging() {
                return CommandResponse::err("No drag in progress");
            }
            match editor.pointer_move(&ray) {
                Some(position) => {
                    CommandResponse::ok_with_data(serde_json::json!({ "position": position }))
                }
                None => CommandResponse::err("Ray does not hit the drag plane"),
            }
        }

        AgentCommand::EndDrag => {
            let ended = editor.pointer_up();
            CommandResponse::ok_with_data(serde_json::json!({ "ended": ended }))
        }

        AgentCommand::MoveObject { id, position } => match editor.move_object(&id, position) {
            Some(position) => {
                CommandResponse::ok_with_data(serde_json::json!({ "position": position }))
            }
            None => not_found(&id),
        },

        AgentCommand::AutoLayout => {
            let arranged = editor.auto_layout();
            CommandResponse::ok_with_data(serde_json::json!({ "arranged": arranged }))
        }

        AgentCommand::SetLayout { layout } => match layout.validate() {
            Ok(()) => {
                editor.settings.layout = layout;
                CommandResponse::ok()
            }
            Err(e) => CommandResponse::err(format!("Invalid layout settings: {e}")),
        },

        AgentCommand::ApplyStyle { preset } => {
            let report = editor.apply_style(&preset);
            CommandResponse::ok_with_data(serde_json::json!(report))
        }

        AgentCommand::FilterCategory { category } => {
            editor.catalog.filter_by_category(category.as_deref());
            CommandResponse::ok_with_data(serde_json::json!({
                "visible": editor.catalog.filtered().len(),
            }))
        }

        AgentCommand::SearchAssets { query } => {
            editor.catalog.search(&query);
            let ids: Vec<&str> = editor.catalog.filtered().iter().map(|a| a.id.as_str()).collect();
            CommandResponse::ok_with_data(serde_json::json!({ "assets": ids }))
        }

        AgentCommand::AddAsset { asset } => {
            let id = asset.id.clone();
            editor.catalog.add_asset(asset);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::RecordGeneration {
            user_input,
            assets,
            context,
        } => {
            let id = editor.record_generation(user_input, assets, context);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::Select { ids } => {
            editor.selection.clear();
            for id in &ids {
                if editor.scene.contains(id) {
                    editor.selection.toggle(id.clone());
                }
            }
            CommandResponse::ok_with_data(serde_json::json!({ "selected": editor.selection.all() }))
        }

        AgentCommand::ClearSelection => {
            editor.selection.clear();
            CommandResponse::ok()
        }

        AgentCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = editor.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        AgentCommand::Clear => {
            editor.clear();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = editor
                .scene
                .objects()
                .iter()
                .map(|object| {
                    serde_json::json!({
                        "id": object.id,
                        "name": object_display_name(object),
                        "shape": object.primitive.tag(),
                        "icon": primitive_icon(&object.primitive),
                        "category": object.category,
                        "position": object.position(),
                        "visible": object.visible,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "version": editor.scene.version(),
            }))
        }

        AgentCommand::ExportScene => {
            let json = editor.export_scene_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }

        AgentCommand::SetDiagram { diagram } => {
            let nodes = diagram.nodes.len();
            editor.diagram.set_diagram(diagram);
            CommandResponse::ok_with_data(serde_json::json!({ "nodes": nodes }))
        }

        AgentCommand::ClearDiagram => {
            editor.diagram.clear();
            CommandResponse::ok()
        }

        AgentCommand::AddNode { node } => {
            let id = node.id.clone();
            match editor.add_node(node) {
                Some(position) => {
                    CommandResponse::ok_with_data(serde_json::json!({ "id": id, "position": position }))
                }
                None => CommandResponse::err(format!("Node already exists: {id}")),
            }
        }

        AgentCommand::RemoveNode { id } => {
            if editor.diagram.remove_node(&id) {
                CommandResponse::ok()
            } else {
                node_not_found(&id)
            }
        }

        AgentCommand::UpdateNode { id, patch } => {
            if editor.diagram.update_node(&id, patch) {
                CommandResponse::ok()
            } else {
                node_not_found(&id)
            }
        }

        AgentCommand::MoveNode { id, position } => match editor.move_node(&id, position) {
            Some(position) => CommandResponse::ok_with_data(serde_json::json!({ "position": position })),
            None => node_not_found(&id),
        },

        AgentCommand::AddEdge { edge } => {
            let id = edge.id.clone();
            if editor.diagram.add_edge(edge) {
                CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
            } else {
                CommandResponse::err(format!("Edge {id} is a duplicate or references a missing node"))
            }
        }

        AgentCommand::RemoveEdge { id } => {
            if editor.diagram.remove_edge(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Edge not found: {id}"))
            }
        }

        AgentCommand::SelectNode { id, multi_select } => {
            if editor.diagram.select_node(&id, multi_select) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": editor.diagram.selected() }))
            } else {
                node_not_found(&id)
            }
        }

        AgentCommand::SetStyledLayout { layout } => {
            let elements = layout.elements.len();
            editor.styled_layout.set_layout(layout);
            CommandResponse::ok_with_data(serde_json::json!({ "elements": elements }))
        }

        AgentCommand::ClearStyledLayout => {
            editor.styled_layout.clear();
            CommandResponse::ok()
        }

        AgentCommand::MoveElement { id, position } => match editor.move_element(&id, position) {
            Some(position) => CommandResponse::ok_with_data(serde_json::json!({ "position": position })),
            None => CommandResponse::err(format!("Element not found: {id}")),
        },

        AgentCommand::UpdateLayoutPolygon { polygon_id, patch } => {
            match editor.styled_layout.update_polygon(&polygon_id, &patch) {
                0 => CommandResponse::err(format!("Polygon not found: {polygon_id}")),
                updated => CommandResponse::ok_with_data(serde_json::json!({ "updated": updated })),
            }
        }

        AgentCommand::AddIcon { icon, position } => {
            let id = editor.add_icon(icon, position);
            let position = editor.icons.get(&id).map(|i| i.position);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id, "position": position }))
        }

        AgentCommand::RemoveIcon { id } => {
            if editor.icons.remove_icon(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Icon not found: {id}"))
            }
        }

        AgentCommand::MoveIcon { id, position } => match editor.move_icon(&id, position) {
            Some(position) => CommandResponse::ok_with_data(serde_json::json!({ "position": position })),
            None => CommandResponse::err(format!("Icon not found: {id}")),
        },

        AgentCommand::UpdateIconPolygon {
            icon_id,
            polygon_id,
            patch,
        } => {
            if editor.icons.update_polygon(&icon_id, &polygon_id, &patch) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Polygon {polygon_id} not found on icon {icon_id}"))
            }
        }

        AgentCommand::InspectCanvas => {
            let nodes: Vec<_> = editor
                .diagram
                .diagram
                .nodes
                .iter()
                .map(|n| serde_json::json!({ "id": n.id, "label": n.label, "position": n.position }))
                .collect();
            let elements: Vec<_> = editor
                .styled_layout
                .elements
                .iter()
                .map(|e| serde_json::json!({ "id": e.id, "tech": e.tech_name, "position": e.position }))
                .collect();
            let icons: Vec<_> = editor
                .icons
                .icons
                .iter()
                .map(|i| serde_json::json!({ "id": i.id, "name": i.icon.name, "position": i.position }))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "nodes": nodes,
                "edges": editor.diagram.diagram.edges.len(),
                "elements": elements,
                "icons": icons,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut EditorState, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    editor: &mut EditorState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
