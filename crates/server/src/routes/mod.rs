use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use shared::design::{
    AssetRequest, Diagram, DiagramRequest, GeneratedAssets, GeneratedStyle, IconRequest, ShapeRequest,
    StylePresetRequest, StyledLayout, StyledLayoutRequest, SvgShape, TechStackIcon,
};
use shared::{
    ApplyStyleRequest, ApplyStyleResponse, AutoLayoutRequest, PlacedObject, ResolvePositionRequest,
    ResolvePositionResponse, SceneDescription,
};

use crate::AppState;

/// Health check
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "ai": state.ai.has_key() }))
}

// ── Generation ────────────────────────────────────────────────

pub async fn generate_diagram(
    State(state): State<AppState>,
    Json(request): Json<DiagramRequest>,
) -> Json<Diagram> {
    Json(state.ai.generate_diagram(&request.prompt).await)
}

pub async fn generate_icon(
    State(state): State<AppState>,
    Json(request): Json<IconRequest>,
) -> Json<TechStackIcon> {
    Json(state.ai.generate_icon(&request).await)
}

pub async fn generate_shape(
    State(state): State<AppState>,
    Json(request): Json<ShapeRequest>,
) -> Json<SvgShape> {
    Json(state.ai.generate_shape(&request).await)
}

pub async fn generate_layout(
    State(state): State<AppState>,
    Json(request): Json<StyledLayoutRequest>,
) -> Json<StyledLayout> {
    Json(state.ai.generate_styled_layout(&request).await)
}

pub async fn generate_style(
    State(state): State<AppState>,
    Json(request): Json<StylePresetRequest>,
) -> Json<GeneratedStyle> {
    Json(state.ai.generate_style(&request.description).await)
}

pub async fn generate_assets(
    State(state): State<AppState>,
    Json(request): Json<AssetRequest>,
) -> Json<GeneratedAssets> {
    Json(state.ai.generate_assets(&request.feedback).await)
}

// ── Engines (stateless) ───────────────────────────────────────

type ApiError = (StatusCode, Json<Value>);

fn bad_request(e: shared::LayoutError) -> ApiError {
    tracing::warn!("Rejected layout request: {e}");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
}

/// Collision-corrected drag position
pub async fn resolve_position(
    Json(request): Json<ResolvePositionRequest>,
) -> Result<Json<ResolvePositionResponse>, ApiError> {
    request.collision.validate().map_err(bad_request)?;
    let position = shared::resolve_position(
        &request.moving_id,
        request.proposed,
        &request.objects,
        &request.collision,
    );
    Ok(Json(ResolvePositionResponse {
        adjusted: position != request.proposed,
        position,
    }))
}

pub async fn auto_layout(Json(request): Json<AutoLayoutRequest>) -> Result<Json<SceneDescription>, ApiError> {
    request.grid.validate().map_err(bad_request)?;
    let objects: Vec<PlacedObject> = shared::auto_layout(&request.objects, &request.grid);
    tracing::info!("Auto layout arranged {} objects", objects.len());
    Ok(Json(SceneDescription { objects }))
}

pub async fn apply_style(Json(request): Json<ApplyStyleRequest>) -> Json<ApplyStyleResponse> {
    tracing::info!(
        "Applying style '{}' to {} objects and {} assets",
        request.preset.name,
        request.objects.len(),
        request.assets.len()
    );
    Json(ApplyStyleResponse {
        objects: shared::apply_style(&request.preset, &request.objects),
        assets: shared::apply_style(&request.preset, &request.assets),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared::{CategoryMappings, GeometryType, StylePreset, Transform};

    use super::*;
    use crate::ai::AiClient;

    fn state() -> State<AppState> {
        State(AppState {
            ai: Arc::new(AiClient::offline()),
        })
    }

    fn obj(id: &str, x: f64, z: f64) -> PlacedObject {
        let mut o = PlacedObject::new(id, id, GeometryType::Box.canonical());
        o.transform = Transform::at([x, 0.0, z]);
        o
    }

    #[tokio::test]
    async fn test_health_reports_offline() {
        let Json(body) = health(state()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai"], false);
    }

    #[tokio::test]
    async fn test_resolve_position_pushes_out() {
        let request: ResolvePositionRequest = serde_json::from_value(json!({
            "moving_id": "c",
            "proposed": [0.5, 0.0, 0.0],
            "objects": [obj("a", 0.0, 0.0), obj("b", 5.0, 0.0), obj("c", 9.0, 9.0)],
        }))
        .unwrap();

        let Json(resp) = resolve_position(Json(request)).await.unwrap();
        assert_eq!(resp.position, [2.0, 0.0, 0.0]);
        assert!(resp.adjusted);
    }

    #[tokio::test]
    async fn test_resolve_position_free_spot() {
        let request = ResolvePositionRequest {
            moving_id: "b".into(),
            proposed: [4.0, 0.0, 0.0],
            objects: vec![obj("a", 0.0, 0.0)],
            collision: Default::default(),
        };
        let Json(resp) = resolve_position(Json(request)).await.unwrap();
        assert_eq!(resp.position, [4.0, 0.0, 0.0]);
        assert!(!resp.adjusted);
    }

    #[tokio::test]
    async fn test_layout_endpoints_reject_bad_config() {
        let request: ResolvePositionRequest = serde_json::from_value(json!({
            "moving_id": "b",
            "proposed": [0.5, 0.0, 0.0],
            "objects": [obj("a", 0.0, 0.0)],
            "collision": { "push_factor": -1.0 },
        }))
        .unwrap();
        let (status, Json(body)) = resolve_position(Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("push factor"));

        let request = AutoLayoutRequest {
            objects: vec![obj("a", 0.0, 0.0)],
            grid: shared::GridLayout { spacing: f64::NAN, resting_height: 0.5 },
        };
        let (status, _) = auto_layout(Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auto_layout_endpoint() {
        let request = AutoLayoutRequest {
            objects: (0..4).map(|i| obj(&format!("o{i}"), i as f64 * 10.0, 3.0)).collect(),
            grid: Default::default(),
        };
        let Json(scene) = auto_layout(Json(request)).await.unwrap();
        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.objects[0].position(), [-0.9, 0.5, -0.9]);
        assert_eq!(scene.objects[3].position(), [0.9, 0.5, 0.9]);
    }

    #[tokio::test]
    async fn test_apply_style_endpoint() {
        let mut rust = obj("rust", 0.0, 0.0);
        rust.category = Some("Language".into());
        let request = ApplyStyleRequest {
            preset: StylePreset {
                id: "p".into(),
                name: "Torus".into(),
                description: String::new(),
                category_mappings: CategoryMappings {
                    language: GeometryType::Torus,
                    framework: GeometryType::Box,
                    database: GeometryType::Box,
                    tools: GeometryType::Box,
                },
                ai_generated: false,
                ai_prompt: None,
            },
            objects: vec![rust],
            assets: vec![],
        };
        let Json(resp) = apply_style(Json(request)).await;
        assert_eq!(resp.objects[0].primitive, GeometryType::Torus.canonical());
    }

    #[tokio::test]
    async fn test_generate_layout_offline() {
        let request: StyledLayoutRequest = serde_json::from_value(json!({
            "selectedStacks": ["react", "mongodb", "docker"],
            "styleDescription": "train station",
        }))
        .unwrap();
        let Json(layout) = generate_layout(state(), Json(request)).await;
        assert_eq!(layout.elements.len(), 3);
        assert_eq!(layout.elements[1].position.x, 380.0);
        assert_eq!(layout.elements[2].polygons[0].fill, "#2496ed");
        assert_eq!(layout.background_polygons.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_diagram_offline() {
        let Json(diagram) = generate_diagram(
            state(),
            Json(DiagramRequest {
                prompt: "three tier app".into(),
            }),
        )
        .await;
        assert_eq!(diagram.nodes[2].label, "Database");
        assert_eq!(diagram.edges.len(), 2);
    }
}
