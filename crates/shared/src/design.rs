//! Типы контракта с AI-генератором дизайна.
//!
//! Поля в camelCase: в таком виде их возвращает модель.

use serde::{Deserialize, Serialize};

use crate::{Asset, StylePreset};

/// Заглушка цвета в шаблоне, заменяется цветом технологии
pub const PLACEHOLDER_COLOR: &str = "#PLACEHOLDER";

/// 2D-точка на холсте
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// Один полигон (SVG path) иконки или шаблона
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonPath {
    pub id: String,
    pub svg_path: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

// ── Запросы ────────────────────────────────────────────────

/// Запрос одиночной SVG-фигуры
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRequest {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Запрос иконки технологии
pub type IconRequest = ShapeRequest;

/// Запрос диаграммы по текстовому описанию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub prompt: String,
}

/// Запрос стилизованной раскладки выбранных технологий
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledLayoutRequest {
    pub selected_stacks: Vec<String>,
    pub style_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<f64>,
}

/// Запрос стилевого пресета по описанию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePresetRequest {
    pub description: String,
}

/// Запрос новых ассетов по отзыву пользователя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub feedback: String,
}

// ── Ответы ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgShape {
    pub svg_path: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackIcon {
    pub name: String,
    pub description: String,
    pub polygons: Vec<PolygonPath>,
    pub view_box: ViewBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub position: Point2D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_shape: Option<SvgShape>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    #[serde(default)]
    pub edges: Vec<DiagramEdge>,
}

/// Шаблон одного элемента (относительные координаты) + фон (абсолютные)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTemplate {
    pub name: String,
    pub description: String,
    pub element_template: Vec<PolygonPath>,
    #[serde(default)]
    pub background_polygons: Vec<PolygonPath>,
    pub element_width: f64,
    pub element_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackElement {
    pub id: String,
    pub tech_name: String,
    pub position: Point2D,
    pub polygons: Vec<PolygonPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledLayout {
    pub elements: Vec<TechStackElement>,
    #[serde(default)]
    pub background_polygons: Vec<PolygonPath>,
    pub description: String,
}

/// Ответ на запрос ассетов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAssets {
    pub assets: Vec<Asset>,
}

/// Ответ на запрос стиля
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStyle {
    pub preset: StylePreset,
}
