//! Editor settings

use serde::{Deserialize, Serialize};
use shared::{CollisionConfig, CollisionPolicy, GridLayout, LayoutError};

/// Layout and collision settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Distance between grid cell centres for auto-layout
    pub spacing: f64,
    /// Height objects rest at after auto-layout; also the drag plane height
    pub resting_height: f64,
    /// Collision radius shared by every object
    pub collision_radius: f64,
    /// Push-out distance multiplier (1.0 → exactly two radii)
    pub push_factor: f64,
    /// Resolve cascading collisions instead of stopping at the first one
    pub iterative: bool,
    /// Upper bound of passes when `iterative` is on
    pub max_passes: u32,
    /// Collision radius of diagram nodes, layout elements and icons, in canvas pixels
    pub canvas_collision_radius: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            spacing: 1.8,
            resting_height: 0.5,
            collision_radius: 1.0,
            push_factor: 1.0,
            iterative: false,
            max_passes: 8,
            canvas_collision_radius: 60.0,
        }
    }
}

impl LayoutSettings {
    pub fn collision(&self) -> CollisionConfig {
        CollisionConfig {
            radius: self.collision_radius,
            push_factor: self.push_factor,
            policy: if self.iterative {
                CollisionPolicy::Iterative {
                    max_passes: self.max_passes,
                }
            } else {
                CollisionPolicy::FirstMatch
            },
        }
    }

    /// Same policy as the scene, sized for 2D canvases
    pub fn canvas_collision(&self) -> CollisionConfig {
        CollisionConfig {
            radius: self.canvas_collision_radius,
            ..self.collision()
        }
    }

    pub fn grid(&self) -> GridLayout {
        GridLayout {
            spacing: self.spacing,
            resting_height: self.resting_height,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        self.collision().validate()?;
        self.canvas_collision().validate()?;
        self.grid().validate()
    }
}

/// Scene display settings, read by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub background_color: String,
    pub show_grid: bool,
    /// Show text labels above objects
    pub show_text: bool,
    /// Show glyphs above objects
    pub show_emoji: bool,
    pub ambient_light_intensity: f32,
    pub directional_light_intensity: f32,
    pub directional_light_position: [f32; 3],
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            background_color: "#1a1a1a".to_string(),
            show_grid: true,
            show_text: true,
            show_emoji: true,
            ambient_light_intensity: 0.5,
            directional_light_intensity: 1.0,
            directional_light_position: [5.0, 10.0, 5.0],
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "stackviz", "stackviz")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(mut settings) => {
                        if let Err(e) = settings.layout.validate() {
                            tracing::warn!("Resetting layout settings from {}: {e}", path.display());
                            settings.layout = LayoutSettings::default();
                        }
                        return settings;
                    }
                    Err(e) => tracing::warn!("Ignoring invalid settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(dir) = path.parent() {
                if std::fs::create_dir_all(dir).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }
}
