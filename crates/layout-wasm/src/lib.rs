use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    ApplyStyleRequest, ApplyStyleResponse, AutoLayoutRequest, CollisionConfig, ResolvePositionRequest,
    ResolvePositionResponse, SceneDescription,
};

/// Разбирает JSON-запрос, вызывает движок и сериализует ответ
fn call<Req, Resp>(json: &str, f: impl FnOnce(Req) -> Result<Resp, String>) -> Result<String, String>
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let request: Req = serde_json::from_str(json).map_err(|e| format!("Invalid request JSON: {e}"))?;
    serde_json::to_string(&f(request)?).map_err(|e| e.to_string())
}

fn resolve_position_json(request_json: &str) -> Result<String, String> {
    call(request_json, |req: ResolvePositionRequest| {
        req.collision.validate().map_err(|e| e.to_string())?;
        let position =
            shared::resolve_position(&req.moving_id, req.proposed, &req.objects, &req.collision);
        Ok(ResolvePositionResponse {
            adjusted: position != req.proposed,
            position,
        })
    })
}

fn auto_layout_json(request_json: &str) -> Result<String, String> {
    call(request_json, |req: AutoLayoutRequest| {
        req.grid.validate().map_err(|e| e.to_string())?;
        Ok(SceneDescription {
            objects: shared::auto_layout(&req.objects, &req.grid),
        })
    })
}

fn apply_style_json(request_json: &str) -> Result<String, String> {
    call(request_json, |req: ApplyStyleRequest| {
        Ok(ApplyStyleResponse {
            objects: shared::apply_style(&req.preset, &req.objects),
            assets: shared::apply_style(&req.preset, &req.assets),
        })
    })
}

fn collisions_json(scene_json: &str) -> Result<String, String> {
    call(scene_json, |scene: SceneDescription| {
        Ok(shared::collisions(&scene.objects, &CollisionConfig::default()))
    })
}

/// Корректирует позицию перетаскиваемого объекта.
/// Вход: `ResolvePositionRequest`, выход: `ResolvePositionResponse`
#[wasm_bindgen]
pub fn resolve_position(request_json: &str) -> Result<String, JsError> {
    resolve_position_json(request_json).map_err(|e| JsError::new(&e))
}

/// Раскладывает объекты сеткой. Вход: `AutoLayoutRequest`, выход: сцена
#[wasm_bindgen]
pub fn auto_layout(request_json: &str) -> Result<String, JsError> {
    auto_layout_json(request_json).map_err(|e| JsError::new(&e))
}

/// Применяет стилевой пресет к объектам и ассетам
#[wasm_bindgen]
pub fn apply_style(request_json: &str) -> Result<String, JsError> {
    apply_style_json(request_json).map_err(|e| JsError::new(&e))
}

/// Пары пересекающихся объектов сцены (радиус по умолчанию)
#[wasm_bindgen]
pub fn find_collisions(scene_json: &str) -> Result<String, JsError> {
    collisions_json(scene_json).map_err(|e| JsError::new(&e))
}

/// Размер сетки `[cols, rows]` для `n` объектов
#[wasm_bindgen]
pub fn grid_dimensions(n: usize) -> Vec<u32> {
    let (cols, rows) = shared::grid_dimensions(n);
    vec![cols as u32, rows as u32]
}
