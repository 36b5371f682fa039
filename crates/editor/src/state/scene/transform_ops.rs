//! Transform/drag operations and grid auto-layout

use shared::{CollisionConfig, GridLayout};

use super::SceneState;

impl SceneState {
    /// Save undo state once at the beginning of a drag operation
    pub fn begin_drag(&mut self) {
        self.save_undo();
        self.redo_stack.clear();
        self.version += 1;
    }

    /// Move an object to a collision-corrected position without saving undo.
    ///
    /// Returns the position actually written, or `None` for an unknown ID.
    pub fn drag_to(
        &mut self,
        id: &str,
        proposed: [f64; 3],
        collision: &CollisionConfig,
    ) -> Option<[f64; 3]> {
        if !self.contains(id) {
            return None;
        }

        let position = shared::resolve_position(id, proposed, &self.scene.objects, collision);
        let object = self.get_object_mut(id)?;
        object.transform.position = position;
        self.version += 1;
        Some(position)
    }

    /// Single-step move with its own undo entry
    pub fn move_object(
        &mut self,
        id: &str,
        proposed: [f64; 3],
        collision: &CollisionConfig,
    ) -> Option<[f64; 3]> {
        if !self.contains(id) {
            return None;
        }
        self.begin_drag();
        self.drag_to(id, proposed, collision)
    }

    /// Arrange all objects on a centred grid, resetting rotation and scale.
    ///
    /// Returns the number of objects laid out; an empty scene is left untouched.
    pub fn auto_layout(&mut self, grid: &GridLayout) -> usize {
        if self.scene.objects.is_empty() {
            return 0;
        }
        let laid = shared::auto_layout(&self.scene.objects, grid);
        let count = laid.len();
        self.replace_objects(laid);
        count
    }
}
