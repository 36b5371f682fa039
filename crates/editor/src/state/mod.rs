pub mod canvas;
pub mod catalog;
pub mod generation;
pub mod scene;
pub mod selection;
pub mod settings;

use serde::{Deserialize, Serialize};
use shared::design::{DiagramNode, Point2D, TechStackIcon};
use shared::{apply_style, Asset, ObjectId, PlacedObject, SceneDescription, StylePreset};

pub use canvas::{DiagramState, IconBoard, LayoutCanvas, NodePatch, PolygonPatch};

pub use catalog::AssetCatalog;
pub use generation::{GenerationLog, GenerationRecord};
pub use scene::{object_display_name, primitive_icon, short_id, ObjectPatch, SceneState};
pub use selection::SelectionState;
pub use settings::{DisplaySettings, EditorSettings, LayoutSettings};

use crate::picking::{DragSession, Ray};

/// Outcome of applying a style preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleReport {
    pub assets_restyled: usize,
    pub objects_restyled: usize,
}

/// Application service: owns the live scene and the asset catalog and is the
/// only place that changes both together.
#[derive(Default)]
pub struct EditorState {
    pub scene: SceneState,
    pub catalog: AssetCatalog,
    pub selection: SelectionState,
    pub settings: EditorSettings,
    pub generations: GenerationLog,
    pub diagram: DiagramState,
    pub styled_layout: LayoutCanvas,
    pub icons: IconBoard,
    drag: Option<DragSession>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── Objects ───────────────────────────────────────────────

    /// Place a catalog asset in the scene at the first free spot near the origin
    pub fn insert_asset(&mut self, asset_id: &str) -> Option<ObjectId> {
        let asset = self.catalog.get(asset_id)?.clone();
        let id = uuid::Uuid::new_v4().to_string();

        let layout = &self.settings.layout;
        let position = shared::free_position(
            &id,
            [0.0, layout.resting_height, 0.0],
            self.scene.objects(),
            &layout.collision(),
        );

        let id = self.scene.add_object(PlacedObject::from_asset(id, &asset, position));
        self.selection.select(id.clone(), false);
        tracing::info!("Inserted asset {} as {}", asset.name, short_id(&id));
        Some(id)
    }

    pub fn delete_object(&mut self, id: &str) -> bool {
        if self.drag.as_ref().is_some_and(|d| d.object_id == id) {
            self.drag = None;
        }
        self.selection.remove(id);
        self.scene.remove_object(id)
    }

    /// Duplicate an object and select the copy
    pub fn duplicate_object(&mut self, id: &str) -> Option<ObjectId> {
        let copy = self.scene.duplicate_object(id)?;
        self.selection.select(copy.clone(), false);
        Some(copy)
    }

    // ── Dragging ──────────────────────────────────────────────

    /// Pointer pressed on an object: select it and start a drag
    pub fn pointer_down(&mut self, id: &str, ray: &Ray, multi_select: bool) -> bool {
        let Some(object) = self.scene.get_object(id) else {
            return false;
        };
        let Some(session) = DragSession::begin(object, ray, self.settings.layout.resting_height) else {
            return false;
        };

        self.selection.select(id.to_string(), multi_select);
        self.scene.begin_drag();
        self.drag = Some(session);
        true
    }

    /// Pointer moved during a drag; returns the corrected position written
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<[f64; 3]> {
        let session = self.drag.as_ref()?;
        let proposed = session.proposed_position(ray)?;
        let id = session.object_id.clone();
        self.scene
            .drag_to(&id, proposed, &self.settings.layout.collision())
    }

    /// Pointer released; returns true if a drag was active
    pub fn pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Move an object to a proposed position with collision correction
    pub fn move_object(&mut self, id: &str, proposed: [f64; 3]) -> Option<[f64; 3]> {
        self.scene
            .move_object(id, proposed, &self.settings.layout.collision())
    }

    // ── Layout / style ────────────────────────────────────────

    /// Arrange all objects on a grid
    pub fn auto_layout(&mut self) -> usize {
        let layout = &self.settings.layout;
        let grid = layout.grid();
        if grid.overlaps(&layout.collision()) {
            tracing::warn!(
                "Layout spacing {} is below twice the collision radius {}; objects may overlap",
                grid.spacing,
                layout.collision_radius
            );
        }
        let count = self.scene.auto_layout(&grid);
        tracing::info!("Auto layout arranged {count} objects");
        count
    }

    /// Apply a style preset to both the catalog and the live scene, then
    /// rebuild the catalog's filtered view.
    pub fn apply_style(&mut self, preset: &StylePreset) -> StyleReport {
        let assets = self.catalog.assets();
        let styled_assets = apply_style(preset, assets);
        let assets_restyled = count_changed(assets, &styled_assets);

        let objects = self.scene.objects();
        let styled_objects = apply_style(preset, objects);
        let objects_restyled = count_changed(objects, &styled_objects);

        self.catalog.set_assets(styled_assets);
        if objects_restyled > 0 {
            self.scene.replace_objects(styled_objects);
        }

        let report = StyleReport {
            assets_restyled,
            objects_restyled,
        };
        tracing::info!(
            "Applied style '{}': {} assets, {} objects restyled",
            preset.name,
            report.assets_restyled,
            report.objects_restyled
        );
        report
    }

    /// Record an AI generation and add its assets to the catalog
    pub fn record_generation(
        &mut self,
        user_input: String,
        assets: Vec<Asset>,
        context: Option<String>,
    ) -> String {
        for asset in &assets {
            self.catalog.add_asset(asset.clone());
        }
        self.generations.record(user_input, assets, context).id.clone()
    }

    // ── 2D canvases ───────────────────────────────────────────

    pub fn add_node(&mut self, node: DiagramNode) -> Option<Point2D> {
        let config = self.settings.layout.canvas_collision();
        self.diagram.add_node(node, &config)
    }

    pub fn move_node(&mut self, id: &str, proposed: Point2D) -> Option<Point2D> {
        let config = self.settings.layout.canvas_collision();
        self.diagram.move_node(id, proposed, &config)
    }

    pub fn move_element(&mut self, id: &str, proposed: Point2D) -> Option<Point2D> {
        let config = self.settings.layout.canvas_collision();
        self.styled_layout.move_element(id, proposed, &config)
    }

    pub fn add_icon(&mut self, icon: TechStackIcon, position: Point2D) -> String {
        let config = self.settings.layout.canvas_collision();
        self.icons.add_icon(icon, position, &config)
    }

    pub fn move_icon(&mut self, id: &str, proposed: Point2D) -> Option<Point2D> {
        let config = self.settings.layout.canvas_collision();
        self.icons.move_icon(id, proposed, &config)
    }

    // ── Scene lifecycle ───────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.drag = None;
        self.scene.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.drag = None;
        self.scene.redo()
    }

    /// Clear the scene and selection; the catalog is kept
    pub fn clear(&mut self) {
        self.drag = None;
        self.selection.clear();
        self.scene.clear();
    }

    /// Load a scene (replaces current)
    pub fn load_scene(&mut self, scene: SceneDescription) {
        self.drag = None;
        self.selection.clear();
        self.scene.set_scene(scene);
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let scene: SceneDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_scene(scene);
        Ok(())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.scene.scene).unwrap_or_default()
    }
}

fn count_changed<T: PartialEq>(before: &[T], after: &[T]) -> usize {
    before.iter().zip(after).filter(|(a, b)| a != b).count()
}
