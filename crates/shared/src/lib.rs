use serde::{Deserialize, Serialize};

pub mod design;
pub mod layout;
pub mod style;

pub use layout::{
    auto_layout, collisions, free_position, grid_dimensions, resolve_position, CollisionConfig, CollisionPolicy,
    GridLayout, LayoutError,
};
pub use style::{apply_style, Styleable};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Категория, которую стилевой пресет никогда не переопределяет
pub const EXEMPT_CATEGORY: &str = "AI Generated";

fn default_true() -> bool {
    true
}

/// Тип геометрии, допустимый в стилевом пресете
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryType {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl GeometryType {
    pub const ALL: [GeometryType; 5] = [
        GeometryType::Box,
        GeometryType::Sphere,
        GeometryType::Cylinder,
        GeometryType::Cone,
        GeometryType::Torus,
    ];

    /// Канонический примитив с параметрами по умолчанию
    pub fn canonical(self) -> Primitive {
        match self {
            GeometryType::Box => Primitive::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            GeometryType::Sphere => Primitive::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 32,
            },
            GeometryType::Cylinder => Primitive::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: 32,
            },
            GeometryType::Cone => Primitive::Cone {
                radius: 1.0,
                height: 2.0,
                radial_segments: 32,
            },
            GeometryType::Torus => Primitive::Torus {
                radius: 1.0,
                tube: 0.4,
                radial_segments: 16,
                tubular_segments: 100,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Box => "box",
            GeometryType::Sphere => "sphere",
            GeometryType::Cylinder => "cylinder",
            GeometryType::Cone => "cone",
            GeometryType::Torus => "torus",
        }
    }
}

/// Примитив с собственным набором параметров
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        radial_segments: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Torus {
        radius: f64,
        tube: f64,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Произвольная геометрия (AI-контент), параметры не интерпретируются
    Custom {
        #[serde(default)]
        params: serde_json::Map<String, serde_json::Value>,
    },
}

impl Primitive {
    /// Тип геометрии; `None` для `Custom`
    pub fn geometry_type(&self) -> Option<GeometryType> {
        match self {
            Primitive::Box { .. } => Some(GeometryType::Box),
            Primitive::Sphere { .. } => Some(GeometryType::Sphere),
            Primitive::Cylinder { .. } => Some(GeometryType::Cylinder),
            Primitive::Cone { .. } => Some(GeometryType::Cone),
            Primitive::Torus { .. } => Some(GeometryType::Torus),
            Primitive::Custom { .. } => None,
        }
    }

    /// Имя тега (как в JSON)
    pub fn tag(&self) -> &'static str {
        self.geometry_type().map_or("custom", GeometryType::as_str)
    }
}

/// Трансформация объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

/// Параметры материала
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub color: String,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive: String,
    pub emissive_intensity: f64,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            metalness: 0.3,
            roughness: 0.7,
            emissive: "#000000".to_string(),
            emissive_intensity: 0.0,
        }
    }
}

/// Объект, размещённый в сцене
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub primitive: Primitive,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Текстовая подпись над объектом
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    /// Иконка (эмодзи) объекта
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialProperties>,
}

impl PlacedObject {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transform: Transform::new(),
            primitive,
            category: None,
            visible: true,
            display_text: None,
            glyph: None,
            material: None,
        }
    }

    /// Создать объект сцены из ассета каталога.
    ///
    /// Подпись по умолчанию равна имени ассета; материал задаётся всегда,
    /// цвет берётся из ассета, если он есть.
    pub fn from_asset(id: impl Into<ObjectId>, asset: &Asset, position: [f64; 3]) -> Self {
        Self {
            id: id.into(),
            name: asset.name.clone(),
            transform: Transform::at(position),
            primitive: asset.primitive.clone(),
            category: Some(asset.category.clone()),
            visible: true,
            display_text: Some(asset.display_text.clone().unwrap_or_else(|| asset.name.clone())),
            glyph: Some(asset.thumbnail.clone()),
            material: Some(MaterialProperties {
                color: asset.color.clone().unwrap_or_else(|| MaterialProperties::default().color),
                ..MaterialProperties::default()
            }),
        }
    }

    pub fn position(&self) -> [f64; 3] {
        self.transform.position
    }
}

/// Элемент каталога ассетов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    pub primitive: Primitive,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl Asset {
    /// Совпадение с поисковой строкой по имени или тегам (без учёта регистра)
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// Одна из четырёх категорий, управляемых стилевым пресетом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleCategory {
    Language,
    Framework,
    Database,
    Tools,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 4] = [
        StyleCategory::Language,
        StyleCategory::Framework,
        StyleCategory::Database,
        StyleCategory::Tools,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Language" => Some(StyleCategory::Language),
            "Framework" => Some(StyleCategory::Framework),
            "Database" => Some(StyleCategory::Database),
            "Tools" => Some(StyleCategory::Tools),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Language => "Language",
            StyleCategory::Framework => "Framework",
            StyleCategory::Database => "Database",
            StyleCategory::Tools => "Tools",
        }
    }
}

/// Отображение категорий на типы геометрии (все четыре ключа обязательны)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMappings {
    #[serde(rename = "Language")]
    pub language: GeometryType,
    #[serde(rename = "Framework")]
    pub framework: GeometryType,
    #[serde(rename = "Database")]
    pub database: GeometryType,
    #[serde(rename = "Tools")]
    pub tools: GeometryType,
}

impl CategoryMappings {
    pub fn get(&self, category: StyleCategory) -> GeometryType {
        match category {
            StyleCategory::Language => self.language,
            StyleCategory::Framework => self.framework,
            StyleCategory::Database => self.database,
            StyleCategory::Tools => self.tools,
        }
    }
}

/// Стилевой пресет. Неизменяем, новый стиль создаётся новой записью
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_mappings: CategoryMappings,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
}

impl StylePreset {
    /// Тип геометрии для категории объекта; `None` для чужих и исключённых категорий
    pub fn geometry_for(&self, category: &str) -> Option<GeometryType> {
        StyleCategory::parse(category).map(|c| self.category_mappings.get(c))
    }
}

/// Описание сцены: плоский список объектов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDescription {
    #[serde(default)]
    pub objects: Vec<PlacedObject>,
}

// ============================================================================
// HTTP-запросы движка (сервер и wasm)
// ============================================================================

/// Запрос на коррекцию позиции при перетаскивании
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvePositionRequest {
    pub moving_id: ObjectId,
    pub proposed: [f64; 3],
    pub objects: Vec<PlacedObject>,
    #[serde(default)]
    pub collision: CollisionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvePositionResponse {
    pub position: [f64; 3],
    /// true, если позиция была скорректирована
    pub adjusted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLayoutRequest {
    pub objects: Vec<PlacedObject>,
    #[serde(default)]
    pub grid: GridLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyStyleRequest {
    pub preset: StylePreset,
    #[serde(default)]
    pub objects: Vec<PlacedObject>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyStyleResponse {
    pub objects: Vec<PlacedObject>,
    pub assets: Vec<Asset>,
}
