use shared::ObjectId;

/// Object selection state (supports multi-select)
#[derive(Default)]
pub struct SelectionState {
    /// Selected object IDs (in order of selection)
    selected: Vec<ObjectId>,
}

impl SelectionState {
    /// Select an object; with `multi` the object is toggled instead
    pub fn select(&mut self, id: ObjectId, multi: bool) {
        if multi {
            self.toggle(id);
        } else {
            self.selected = vec![id];
        }
    }

    /// Add or remove an object from the selection
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Drop an ID (e.g. after deletion)
    pub fn remove(&mut self, id: &str) {
        self.selected.retain(|s| s != id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Most recently selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.last()
    }

    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }
}
