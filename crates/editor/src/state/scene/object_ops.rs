//! Object CRUD operations

use serde::{Deserialize, Serialize};
use shared::{MaterialProperties, ObjectId, PlacedObject, Primitive, SceneDescription, Transform};

use super::SceneState;

/// Offset applied to a duplicate on the ground plane
const DUPLICATE_OFFSET: f64 = 1.0;

/// Partial update of an object; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub position: Option<[f64; 3]>,
    pub rotation: Option<[f64; 3]>,
    pub scale: Option<[f64; 3]>,
    pub primitive: Option<Primitive>,
    pub category: Option<String>,
    pub visible: Option<bool>,
    pub display_text: Option<String>,
    pub glyph: Option<String>,
    pub material: Option<MaterialProperties>,
}

impl ObjectPatch {
    fn apply(self, object: &mut PlacedObject) {
        if let Some(name) = self.name {
            object.name = name;
        }
        if let Some(position) = self.position.filter(|p| p.iter().all(|v| v.is_finite())) {
            object.transform.position = position;
        }
        if let Some(rotation) = self.rotation.filter(|r| r.iter().all(|v| v.is_finite())) {
            object.transform.rotation = rotation;
        }
        if let Some(scale) = self.scale.filter(|s| s.iter().all(|v| v.is_finite())) {
            object.transform.scale = scale;
        }
        if let Some(primitive) = self.primitive {
            object.primitive = primitive;
        }
        if let Some(category) = self.category {
            object.category = Some(category);
        }
        if let Some(visible) = self.visible {
            object.visible = visible;
        }
        if let Some(text) = self.display_text {
            object.display_text = Some(text);
        }
        if let Some(glyph) = self.glyph {
            object.glyph = Some(glyph);
        }
        if let Some(material) = self.material {
            object.material = Some(material);
        }
    }
}

impl SceneState {
    /// Add a fully built object. An empty or duplicate ID is replaced by a fresh one.
    pub fn add_object(&mut self, mut object: PlacedObject) -> ObjectId {
        self.save_undo();
        self.redo_stack.clear();

        if object.id.is_empty() || self.contains(&object.id) {
            object.id = uuid::Uuid::new_v4().to_string();
        }
        let id = object.id.clone();
        self.scene.objects.push(object);

        self.version += 1;
        id
    }

    /// Create a new object with a primitive
    pub fn create_object(
        &mut self,
        name: String,
        primitive: Primitive,
        transform: Transform,
    ) -> ObjectId {
        let mut object = PlacedObject::new(uuid::Uuid::new_v4().to_string(), name, primitive);
        object.transform = transform;
        self.add_object(object)
    }

    /// Remove an object by ID
    pub fn remove_object(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.save_undo();
        self.redo_stack.clear();
        self.scene.objects.retain(|o| o.id != id);
        self.version += 1;
        true
    }

    /// Apply a partial update
    pub fn update_object(&mut self, id: &str, patch: ObjectPatch) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.save_undo();
        self.redo_stack.clear();
        if let Some(object) = self.get_object_mut(id) {
            patch.apply(object);
        }
        self.version += 1;
        true
    }

    /// Duplicate an object next to the original
    pub fn duplicate_object(&mut self, id: &str) -> Option<ObjectId> {
        let original = self.get_object(id)?;

        let mut copy = original.clone();
        copy.id = uuid::Uuid::new_v4().to_string();
        copy.name = format!("{} Copy", original.name);
        copy.transform.position[0] += DUPLICATE_OFFSET;
        copy.transform.position[2] += DUPLICATE_OFFSET;

        Some(self.add_object(copy))
    }

    /// Set object visibility; a real change is one undo step
    pub fn set_object_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(current) = self.get_object(id).map(|o| o.visible) else {
            return false;
        };
        if current != visible {
            self.save_undo();
            self.redo_stack.clear();
            if let Some(object) = self.get_object_mut(id) {
                object.visible = visible;
            }
            self.version += 1;
        }
        true
    }

    /// Replace all objects with a new snapshot as one undo step
    pub fn replace_objects(&mut self, objects: Vec<PlacedObject>) {
        self.save_undo();
        self.redo_stack.clear();
        self.scene.objects = objects;
        self.version += 1;
    }

    /// Clear the scene
    pub fn clear(&mut self) {
        self.save_undo();
        self.redo_stack.clear();
        self.scene = SceneDescription::default();
        self.version += 1;
    }

    /// Set scene from loaded data
    pub fn set_scene(&mut self, scene: SceneDescription) {
        self.save_undo();
        self.redo_stack.clear();
        self.scene = scene;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use shared::GeometryType;

    use super::*;

    fn cube(s: &mut SceneState, name: &str) -> ObjectId {
        s.create_object(name.to_string(), GeometryType::Box.canonical(), Transform::new())
    }

    #[test]
    fn test_create_and_remove() {
        let mut s = SceneState::default();
        let id = cube(&mut s, "a");
        assert_eq!(s.len(), 1);
        assert!(s.remove_object(&id));
        assert!(s.is_empty());
        assert!(!s.remove_object(&id));
    }

    #[test]
    fn test_add_object_replaces_duplicate_id() {
        let mut s = SceneState::default();
        let a = s.add_object(PlacedObject::new("same", "a", GeometryType::Box.canonical()));
        let b = s.add_object(PlacedObject::new("same", "b", GeometryType::Box.canonical()));
        assert_eq!(a, "same");
        assert_ne!(b, "same");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_duplicate_offsets_and_renames() {
        let mut s = SceneState::default();
        let id = s.create_object(
            "Rust".to_string(),
            GeometryType::Cylinder.canonical(),
            Transform::at([1.0, 0.5, 2.0]),
        );
        let copy_id = s.duplicate_object(&id).unwrap();
        let copy = s.get_object(&copy_id).unwrap();
        assert_eq!(copy.name, "Rust Copy");
        assert_eq!(copy.transform.position, [2.0, 0.5, 3.0]);
        assert_eq!(copy.primitive, GeometryType::Cylinder.canonical());
        assert!(s.duplicate_object("missing").is_none());
    }

    #[test]
    fn test_update_ignores_non_finite_position() {
        let mut s = SceneState::default();
        let id = cube(&mut s, "a");
        let patch = ObjectPatch {
            name: Some("b".to_string()),
            position: Some([f64::NAN, 0.0, 0.0]),
            ..ObjectPatch::default()
        };
        assert!(s.update_object(&id, patch));
        let o = s.get_object(&id).unwrap();
        assert_eq!(o.name, "b");
        assert_eq!(o.transform.position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_visibility_bumps_version_once() {
        let mut s = SceneState::default();
        let id = cube(&mut s, "a");
        let v = s.version();
        assert!(s.set_object_visible(&id, false));
        assert!(s.set_object_visible(&id, false));
        assert_eq!(s.version(), v + 1);
        assert!(!s.get_object(&id).unwrap().visible);
    }

    #[test]
    fn test_visibility_toggle_is_undoable() {
        let mut s = SceneState::default();
        let id = cube(&mut s, "a");
        assert!(s.set_object_visible(&id, false));
        assert!(s.undo());
        assert!(s.get_object(&id).unwrap().visible);
        assert!(s.redo());
        assert!(!s.get_object(&id).unwrap().visible);

        // no-op toggle adds no undo step
        assert!(s.set_object_visible(&id, false));
        assert!(s.undo());
        assert!(s.get_object(&id).unwrap().visible);
        assert!(!s.set_object_visible("ghost", true));
    }
}
