//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use stackviz_editor_lib::command::{execute_json, execute_json_batch};
use stackviz_editor_lib::state::EditorState;

fn id_of(resp: &stackviz_editor_lib::command::CommandResponse) -> String {
    resp.data.as_ref().unwrap()["id"].as_str().unwrap().to_string()
}

#[test]
fn test_command_add_object_with_transform() {
    let mut e = EditorState::new();

    let json = r#"{"command": "add_object", "name": "Box1", "primitive": {"type": "box", "width": 1.0, "height": 1.0, "depth": 1.0}, "transform": {"position": [1.0, 0.5, 3.0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}, "category": "Tools"}"#;

    let resp = execute_json(&mut e, json).unwrap();
    assert!(resp.success);
    let id = id_of(&resp);
    let object = e.scene.get_object(&id).unwrap();
    assert_eq!(object.position(), [1.0, 0.5, 3.0]);
    assert_eq!(object.category.as_deref(), Some("Tools"));
}

#[test]
fn test_command_add_object_default_transform_has_unit_scale() {
    let mut e = EditorState::new();
    let json = r#"{"command": "add_object", "name": "S", "primitive": {"type": "sphere", "radius": 1, "width_segments": 32, "height_segments": 32}}"#;
    let id = id_of(&execute_json(&mut e, json).unwrap());
    assert_eq!(e.scene.get_object(&id).unwrap().transform.scale, [1.0, 1.0, 1.0]);
}

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut e = EditorState::new();

    let json = r#"[
        {"command": "insert_asset", "asset_id": "asset-1"},
        {"command": "insert_asset", "asset_id": "asset-2"},
        {"command": "insert_asset", "asset_id": "asset-3"},
        {"command": "auto_layout"},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut e, json).unwrap();
    assert_eq!(responses.len(), 5);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    assert_eq!(responses[3].data.as_ref().unwrap()["arranged"], 3);
    let inspect = responses[4].data.as_ref().unwrap();
    assert_eq!(inspect["object_count"], 3);
    // 2x2 grid, first cell at (-0.9, 0.5, -0.9)
    assert_eq!(inspect["objects"][0]["position"], serde_json::json!([-0.9, 0.5, -0.9]));
}

#[test]
fn test_command_invalid_json_error() {
    let mut e = EditorState::new();
    let result = execute_json(&mut e, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));
}

#[test]
fn test_command_unknown_command_error() {
    let mut e = EditorState::new();
    let result = execute_json(&mut e, r#"{"command": "extrude"}"#);
    assert!(result.is_err());
}

#[test]
fn test_command_undo_redo_via_json() {
    let mut e = EditorState::new();
    e.insert_asset("asset-1");
    assert_eq!(e.scene.len(), 1);

    let resp = execute_json(&mut e, r#"{"command": "undo"}"#).unwrap();
    assert_eq!(resp.data.as_ref().unwrap()["undone"], true);
    assert!(e.scene.is_empty());

    let resp = execute_json(&mut e, r#"{"command": "redo"}"#).unwrap();
    assert_eq!(resp.data.as_ref().unwrap()["redone"], true);
    assert_eq!(e.scene.len(), 1);

    // Undo again, then try undo on empty
    execute_json(&mut e, r#"{"command": "undo"}"#).unwrap();
    let resp = execute_json(&mut e, r#"{"command": "undo"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.as_ref().unwrap()["undone"], false);
}

#[test]
fn test_command_delete_and_duplicate() {
    let mut e = EditorState::new();
    let a = e.insert_asset("asset-1").unwrap();

    let resp = execute_json(&mut e, &format!(r#"{{"command": "duplicate_object", "id": "{a}"}}"#)).unwrap();
    let copy = id_of(&resp);
    let copied = e.scene.get_object(&copy).unwrap();
    assert_eq!(copied.name, "Cube Copy");
    assert_eq!(copied.position(), [1.0, 0.5, 1.0]);
    assert_eq!(e.selection.primary(), Some(&copy));

    let resp = execute_json(&mut e, &format!(r#"{{"command": "delete_object", "id": "{a}"}}"#)).unwrap();
    assert!(resp.success);
    assert_eq!(e.scene.len(), 1);

    let resp = execute_json(&mut e, &format!(r#"{{"command": "delete_object", "id": "{a}"}}"#)).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_update_and_visibility() {
    let mut e = EditorState::new();
    let a = e.insert_asset("asset-2").unwrap();

    let json = format!(r#"{{"command": "update_object", "id": "{a}", "name": "Planet", "scale": [2, 2, 2]}}"#);
    assert!(execute_json(&mut e, &json).unwrap().success);
    let json = format!(r#"{{"command": "set_visible", "id": "{a}", "visible": false}}"#);
    assert!(execute_json(&mut e, &json).unwrap().success);

    let object = e.scene.get_object(&a).unwrap();
    assert_eq!(object.name, "Planet");
    assert_eq!(object.transform.scale, [2.0, 2.0, 2.0]);
    assert!(!object.visible);
}

#[test]
fn test_command_select_and_clear_selection() {
    let mut e = EditorState::new();
    let id1 = e.insert_asset("asset-1").unwrap();
    let id2 = e.insert_asset("asset-2").unwrap();

    let select_json = format!(r#"{{"command": "select", "ids": ["{id1}", "{id2}", "ghost"]}}"#);
    let resp = execute_json(&mut e, &select_json).unwrap();
    assert!(resp.success);
    assert_eq!(e.selection.count(), 2);

    let resp = execute_json(&mut e, r#"{"command": "clear_selection"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(e.selection.count(), 0);
}

#[test]
fn test_command_drag_session() {
    let mut e = EditorState::new();
    let a = e.insert_asset("asset-1").unwrap();
    let b = e.insert_asset("asset-1").unwrap();

    let cmds = format!(
        r#"[
        {{"command": "begin_drag", "id": "{b}", "ray": {{"origin": [2, 10, 0], "direction": [0, -1, 0]}}}},
        {{"command": "drag_to", "ray": {{"origin": [5, 10, 4], "direction": [0, -1, 0]}}}},
        {{"command": "drag_to", "ray": {{"origin": [0, 10, 0.5], "direction": [0, -1, 0]}}}},
        {{"command": "end_drag"}}
    ]"#
    );
    let responses = execute_json_batch(&mut e, &cmds).unwrap();
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    assert_eq!(responses[1].data.as_ref().unwrap()["position"], serde_json::json!([5.0, 0.5, 4.0]));
    // pushed out along +z away from the object at the origin
    assert_eq!(responses[2].data.as_ref().unwrap()["position"], serde_json::json!([0.0, 0.5, 2.0]));
    assert_eq!(responses[3].data.as_ref().unwrap()["ended"], true);
    assert!(e.scene.contains(&a));
}

#[test]
fn test_command_catalog_filter_and_search() {
    let mut e = EditorState::new();

    let resp = execute_json(&mut e, r#"{"command": "search_assets", "query": "round"}"#).unwrap();
    let ids = resp.data.unwrap()["assets"].clone();
    assert!(ids.as_array().unwrap().iter().any(|v| v == "asset-2"));

    let resp = execute_json(&mut e, r#"{"command": "search_assets", "query": ""}"#).unwrap();
    assert_eq!(resp.data.unwrap()["assets"].as_array().unwrap().len(), 5);

    let resp = execute_json(&mut e, r#"{"command": "filter_category", "category": "Database"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["visible"], 0);

    let resp = execute_json(&mut e, r#"{"command": "filter_category", "category": "All"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["visible"], 5);
}

#[test]
fn test_command_export_and_reload() {
    let mut e = EditorState::new();
    e.insert_asset("asset-1");
    e.insert_asset("asset-4");

    let resp = execute_json(&mut e, r#"{"command": "export_scene"}"#).unwrap();
    let scene_json = resp.data.unwrap()["scene_json"].as_str().unwrap().to_string();
    assert!(scene_json.contains("objects"));

    let mut e2 = EditorState::new();
    e2.load_scene_json(&scene_json).unwrap();
    assert_eq!(e2.scene.objects(), e.scene.objects());
}

#[test]
fn test_command_clear() {
    let mut e = EditorState::new();
    e.insert_asset("asset-1");
    e.insert_asset("asset-2");

    let resp = execute_json(&mut e, r#"{"command": "clear"}"#).unwrap();
    assert!(resp.success);
    assert!(e.scene.is_empty());
    assert_eq!(e.catalog.assets().len(), 5);
}

#[test]
fn test_command_diagram_editing() {
    let mut e = EditorState::new();
    let cmds = r#"[
        {"command": "set_diagram", "diagram": {"nodes": [
            {"id": "1", "label": "Frontend", "position": {"x": 100, "y": 150}},
            {"id": "2", "label": "Backend", "position": {"x": 400, "y": 150}}
        ], "edges": [{"id": "e1-2", "source": "1", "target": "2"}]}},
        {"command": "move_node", "id": "2", "position": {"x": 130, "y": 150}},
        {"command": "add_node", "node": {"id": "3", "label": "Database", "position": {"x": 100, "y": 150}}},
        {"command": "add_edge", "edge": {"id": "e2-3", "source": "2", "target": "3"}},
        {"command": "update_node", "id": "3", "label": "Postgres", "category": "Database"},
        {"command": "select_node", "id": "3"},
        {"command": "inspect_canvas"}
    ]"#;
    let responses = execute_json_batch(&mut e, cmds).unwrap();
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    // canvas y maps to world z; default canvas radius 60 keeps centres 120px apart
    assert_eq!(responses[1].data.as_ref().unwrap()["position"], serde_json::json!({"x": 220.0, "y": 150.0}));
    // new node cascades off "1" then "2"
    assert_eq!(responses[2].data.as_ref().unwrap()["position"], serde_json::json!({"x": 340.0, "y": 150.0}));
    let canvas = responses[6].data.as_ref().unwrap();
    assert_eq!(canvas["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(canvas["nodes"][2]["label"], "Postgres");
    assert_eq!(canvas["edges"], 2);

    let resp = execute_json(&mut e, r#"{"command": "remove_node", "id": "2"}"#).unwrap();
    assert!(resp.success);
    assert!(e.diagram.diagram.edges.is_empty());

    let resp = execute_json(&mut e, r#"{"command": "move_node", "id": "2", "position": {"x": 0, "y": 0}}"#).unwrap();
    assert!(!resp.success);
    let resp = execute_json(&mut e, r#"{"command": "add_edge", "edge": {"id": "x", "source": "1", "target": "2"}}"#).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_styled_layout_and_icons() {
    let mut e = EditorState::new();
    let polygon = |id: &str| {
        serde_json::json!({"id": id, "svgPath": "M 0 0 Z", "fill": "#61dafb", "stroke": "#000", "strokeWidth": 1})
    };
    let layout = serde_json::json!({
        "command": "set_styled_layout",
        "layout": {
            "description": "trains",
            "elements": [
                {"id": "el-0", "techName": "react", "position": {"x": 150, "y": 440}, "polygons": [polygon("body")]},
                {"id": "el-1", "techName": "docker", "position": {"x": 380, "y": 440}, "polygons": [polygon("body")]}
            ],
            "backgroundPolygons": [polygon("platform")]
        }
    });
    assert!(execute_json(&mut e, &layout.to_string()).unwrap().success);

    let resp = execute_json(&mut e, r#"{"command": "move_element", "id": "el-1", "position": {"x": 150, "y": 400}}"#).unwrap();
    assert_eq!(resp.data.unwrap()["position"], serde_json::json!({"x": 150.0, "y": 320.0}));

    let resp = execute_json(
        &mut e,
        r##"{"command": "update_layout_polygon", "polygon_id": "body", "patch": {"fill": "#ff0000"}}"##,
    )
    .unwrap();
    assert_eq!(resp.data.unwrap()["updated"], 2);
    assert!(e.styled_layout.elements.iter().all(|el| el.polygons[0].fill == "#ff0000"));

    let icon = serde_json::json!({
        "command": "add_icon",
        "icon": {"name": "React", "description": "", "viewBox": {"width": 200, "height": 200},
                 "polygons": [polygon("polygon-1")]}
    });
    let first = id_of(&execute_json(&mut e, &icon.to_string()).unwrap());
    let resp = execute_json(&mut e, &icon.to_string()).unwrap();
    assert_eq!(resp.data.as_ref().unwrap()["position"], serde_json::json!({"x": 120.0, "y": 0.0}));

    let cmd = format!(
        r#"{{"command": "update_icon_polygon", "icon_id": "{first}", "polygon_id": "polygon-1", "patch": {{"strokeWidth": 3}}}}"#
    );
    assert!(execute_json(&mut e, &cmd).unwrap().success);
    assert_eq!(e.icons.get(&first).unwrap().icon.polygons[0].stroke_width, 3.0);

    let cmd = format!(r#"{{"command": "remove_icon", "id": "{first}"}}"#);
    assert!(execute_json(&mut e, &cmd).unwrap().success);
    assert_eq!(e.icons.icons.len(), 1);
}
