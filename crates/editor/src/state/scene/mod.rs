//! Scene state management
//!
//! This module provides the live scene of placed objects with undo/redo history.

mod display;
mod history;
mod object_ops;
mod persistence;
mod transform_ops;

pub use display::{object_display_name, primitive_icon, short_id};
pub use object_ops::ObjectPatch;
pub use persistence::SceneFileError;

use shared::{ObjectId, PlacedObject, SceneDescription};

/// Maximum number of snapshots kept on the undo stack
const UNDO_LIMIT: usize = 100;

/// Scene state with placed objects and undo/redo history
#[derive(Default)]
pub struct SceneState {
    /// Current scene
    pub scene: SceneDescription,
    /// Undo stack - previous states
    pub(crate) undo_stack: Vec<SceneDescription>,
    /// Redo stack - undone states
    pub(crate) redo_stack: Vec<SceneDescription>,
    /// Monotonically increasing version counter, renderers re-read on change
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All placed objects in insertion order
    pub fn objects(&self) -> &[PlacedObject] {
        &self.scene.objects
    }

    /// Number of placed objects
    pub fn len(&self) -> usize {
        self.scene.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.objects.is_empty()
    }

    /// Get an object by ID
    pub fn get_object(&self, id: &str) -> Option<&PlacedObject> {
        self.scene.objects.iter().find(|o| o.id == id)
    }

    /// Get mutable object by ID
    pub fn get_object_mut(&mut self, id: &str) -> Option<&mut PlacedObject> {
        self.scene.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_object(id).is_some()
    }

    /// IDs of all objects
    pub fn ids(&self) -> Vec<ObjectId> {
        self.scene.objects.iter().map(|o| o.id.clone()).collect()
    }

    /// Bump version without saving undo
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// Save current state to undo stack
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.scene.clone());
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }
}
