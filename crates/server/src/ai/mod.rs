//! AI design generation. Every public generator returns a usable result:
//! when the model is unavailable or answers with something unusable, the
//! failure is logged and a local fallback of the same shape is returned.

mod fallback;
mod prompts;
pub mod template;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::design::{
    Diagram, GeneratedAssets, GeneratedStyle, IconRequest, PolygonPath, ShapeRequest, StyleTemplate,
    StyledLayout, StyledLayoutRequest, SvgShape, TechStackIcon, ViewBox,
};
use shared::{Asset, CategoryMappings, GeometryType, StylePreset, EXEMPT_CATEGORY};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 4096;

const DEFAULT_CANVAS: (f64, f64) = (1200.0, 800.0);
const DEFAULT_ICON_SIZE: f64 = 200.0;
const DEFAULT_SHAPE_SIZE: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("ANTHROPIC_API_KEY not set")]
    MissingKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response has no text content")]
    EmptyCompletion,

    #[error("No JSON object in completion")]
    NoJson,

    #[error("Malformed design JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Messages API client
pub struct AiClient {
    api_key: Option<String>,
    model: String,
    http: reqwest::Client,
}

impl AiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }

    /// `ANTHROPIC_API_KEY` and `STACKVIZ_MODEL` from the environment
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("ANTHROPIC_API_KEY").ok(),
            std::env::var("STACKVIZ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        )
    }

    /// Client that never calls out; every generator uses its fallback
    pub fn offline() -> Self {
        Self::new(None, DEFAULT_MODEL)
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one user message and return the text of the first content block
    async fn complete(&self, system: &str, user: String) -> Result<String, AiError> {
        let api_key = self.api_key.as_ref().ok_or(AiError::MissingKey)?;

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "system": system,
                "messages": [{ "role": "user", "content": user }]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        body["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .map(str::to_string)
            .ok_or(AiError::EmptyCompletion)
    }

    /// Complete and parse the JSON object embedded in the answer
    async fn complete_json<T: DeserializeOwned>(&self, system: &str, user: String) -> Result<T, AiError> {
        let text = self.complete(system, user).await?;
        let json = extract_json(&text).ok_or(AiError::NoJson)?;
        Ok(serde_json::from_str(json)?)
    }

    // ── Generators ────────────────────────────────────────────

    pub async fn generate_diagram(&self, prompt: &str) -> Diagram {
        let result: Result<Diagram, AiError> = self
            .complete_json(prompts::DIAGRAM, prompts::diagram(prompt))
            .await;
        result.unwrap_or_else(|e| {
            tracing::warn!("Diagram generation failed, using fallback: {e}");
            fallback::diagram()
        })
    }

    pub async fn generate_icon(&self, request: &IconRequest) -> TechStackIcon {
        let width = request.width.unwrap_or(DEFAULT_ICON_SIZE);
        let height = request.height.unwrap_or(DEFAULT_ICON_SIZE);

        let result: Result<IconDraft, AiError> = self
            .complete_json(prompts::ICON, prompts::icon(&request.description, width, height))
            .await;
        match result {
            Ok(draft) => TechStackIcon {
                name: draft.name.unwrap_or_else(|| "Tech Icon".to_string()),
                description: draft.description.unwrap_or_else(|| request.description.clone()),
                view_box: draft.view_box.unwrap_or(ViewBox { width, height }),
                polygons: draft.polygons,
            },
            Err(e) => {
                tracing::warn!("Icon generation failed, using fallback: {e}");
                fallback::icon(&request.description, width, height)
            }
        }
    }

    pub async fn generate_shape(&self, request: &ShapeRequest) -> SvgShape {
        let width = request.width.unwrap_or(DEFAULT_SHAPE_SIZE);
        let height = request.height.unwrap_or(DEFAULT_SHAPE_SIZE);

        let result: Result<ShapeDraft, AiError> = self
            .complete_json(prompts::SHAPE, prompts::shape(&request.description, width, height))
            .await;
        match result {
            Ok(draft) => SvgShape {
                svg_path: draft
                    .svg_path
                    .unwrap_or_else(|| "M 10 10 L 90 10 L 90 90 L 10 90 Z".to_string()),
                fill: draft.fill.unwrap_or_else(|| "#4A90E2".to_string()),
                stroke: draft.stroke.unwrap_or_else(|| "#2E5C8A".to_string()),
                stroke_width: draft.stroke_width.unwrap_or(2.0),
            },
            Err(e) => {
                tracing::warn!("Shape generation failed, using fallback: {e}");
                fallback::shape(&request.description)
            }
        }
    }

    pub async fn generate_style_template(&self, style: &str, width: f64, height: f64) -> StyleTemplate {
        let result: Result<TemplateDraft, AiError> = self
            .complete_json(prompts::TEMPLATE, prompts::template(style, width, height))
            .await;
        match result {
            Ok(draft) => StyleTemplate {
                name: draft.name.unwrap_or_else(|| "Style Template".to_string()),
                description: draft.description.unwrap_or_else(|| style.to_string()),
                element_template: draft.element_template,
                background_polygons: draft.background_polygons,
                element_width: draft.element_width.unwrap_or(template::ELEMENT_WIDTH),
                element_height: draft.element_height.unwrap_or(template::ELEMENT_HEIGHT),
            },
            Err(e) => {
                tracing::warn!("Style template generation failed, using fallback: {e}");
                fallback::style_template(width, height)
            }
        }
    }

    /// One template from the model, stamped once per selected stack
    pub async fn generate_styled_layout(&self, request: &StyledLayoutRequest) -> StyledLayout {
        let width = request.canvas_width.unwrap_or(DEFAULT_CANVAS.0);
        let height = request.canvas_height.unwrap_or(DEFAULT_CANVAS.1);
        let style_template = self
            .generate_style_template(&request.style_description, width, height)
            .await;
        template::apply_style_to_stacks(&style_template, &request.selected_stacks, height)
    }

    pub async fn generate_style(&self, description: &str) -> GeneratedStyle {
        let result: Result<StyleDraft, AiError> = self
            .complete_json(prompts::STYLE, prompts::style(description))
            .await;
        let preset = match result {
            Ok(draft) => StylePreset {
                id: new_id("style"),
                name: draft.name.unwrap_or_else(|| "AI Style".to_string()),
                description: draft.description.unwrap_or_else(|| description.to_string()),
                category_mappings: draft.category_mappings,
                ai_generated: true,
                ai_prompt: Some(description.to_string()),
            },
            Err(e) => {
                tracing::warn!("Style generation failed, using fallback: {e}");
                fallback::style_preset(description)
            }
        };
        GeneratedStyle { preset }
    }

    pub async fn generate_assets(&self, feedback: &str) -> GeneratedAssets {
        let result: Result<AssetsDraft, AiError> = self
            .complete_json(prompts::ASSETS, prompts::assets(feedback))
            .await;
        match result {
            Ok(draft) if !draft.assets.is_empty() => GeneratedAssets {
                assets: draft
                    .assets
                    .into_iter()
                    .map(|a| a.into_asset(feedback))
                    .collect(),
            },
            Ok(_) => {
                tracing::warn!("Asset generation returned no assets, using fallback");
                fallback::assets(feedback)
            }
            Err(e) => {
                tracing::warn!("Asset generation failed, using fallback: {e}");
                fallback::assets(feedback)
            }
        }
    }
}

/// Slice from the first `{` to the last `}` of a completion
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

// ── Lenient model output ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IconDraft {
    name: Option<String>,
    description: Option<String>,
    view_box: Option<ViewBox>,
    #[serde(default)]
    polygons: Vec<PolygonPath>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeDraft {
    svg_path: Option<String>,
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDraft {
    name: Option<String>,
    description: Option<String>,
    element_width: Option<f64>,
    element_height: Option<f64>,
    #[serde(default)]
    element_template: Vec<PolygonPath>,
    #[serde(default)]
    background_polygons: Vec<PolygonPath>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleDraft {
    name: Option<String>,
    description: Option<String>,
    category_mappings: CategoryMappings,
}

#[derive(Deserialize)]
struct AssetsDraft {
    #[serde(default)]
    assets: Vec<AssetDraft>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetDraft {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_geometry")]
    geometry_type: GeometryType,
    #[serde(default)]
    tags: Vec<String>,
    color: Option<String>,
}

fn default_geometry() -> GeometryType {
    GeometryType::Box
}

impl AssetDraft {
    fn into_asset(self, feedback: &str) -> Asset {
        Asset {
            id: new_id("ai"),
            name: self.name,
            category: EXEMPT_CATEGORY.to_string(),
            tags: self.tags,
            thumbnail: fallback::AI_THUMBNAIL.to_string(),
            description: self.description,
            primitive: self.geometry_type.canonical(),
            ai_generated: true,
            ai_prompt: Some(feedback.to_string()),
            color: self.color,
            display_text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_prose() {
        let text = "Sure! Here it is:\n```json\n{\"nodes\": [{\"a\": {}}]}\n```\nEnjoy.";
        assert_eq!(extract_json(text), Some("{\"nodes\": [{\"a\": {}}]}"));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_blank_key_is_offline() {
        assert!(!AiClient::new(Some("  ".into()), DEFAULT_MODEL).has_key());
        assert!(AiClient::new(Some("k".into()), DEFAULT_MODEL).has_key());
    }

    #[test]
    fn test_template_draft_defaults() {
        let draft: TemplateDraft = serde_json::from_str(r#"{"elementTemplate": []}"#).unwrap();
        assert!(draft.name.is_none());
        assert!(draft.background_polygons.is_empty());
    }

    #[tokio::test]
    async fn test_offline_generators_fall_back() {
        let ai = AiClient::offline();

        let diagram = ai.generate_diagram("web app").await;
        assert_eq!(diagram.nodes.len(), 3);

        let icon = ai
            .generate_icon(&IconRequest {
                description: "React".into(),
                width: None,
                height: None,
            })
            .await;
        assert_eq!(icon.view_box, ViewBox { width: 200.0, height: 200.0 });

        let layout = ai
            .generate_styled_layout(&StyledLayoutRequest {
                selected_stacks: vec!["react".into(), "redis".into()],
                style_description: "train".into(),
                canvas_width: None,
                canvas_height: None,
            })
            .await;
        assert_eq!(layout.elements.len(), 2);
        assert!((layout.elements[0].position.y - 440.0).abs() < 1e-9);

        let style = ai.generate_style("metro").await;
        assert!(style.preset.ai_generated);

        let assets = ai.generate_assets("Glowing Crystal").await;
        assert_eq!(assets.assets[0].category, EXEMPT_CATEGORY);
    }
}
