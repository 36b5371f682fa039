//! Scene files: the autosave slot and explicit `--scene` paths.
//!
//! JSON has no NaN/Infinity, so non-finite transforms are repaired before
//! writing; otherwise the file could not be read back.

use std::path::{Path, PathBuf};

use shared::{SceneDescription, Transform};

use super::SceneState;

const AUTOSAVE_FILE: &str = "autosave.json";

#[derive(Debug, thiserror::Error)]
pub enum SceneFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn autosave_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "stackviz", "stackviz")
        .map(|dirs| dirs.data_dir().join(AUTOSAVE_FILE))
}

/// Replace NaN/Infinity components with the identity pose.
/// Returns how many objects had to be repaired.
fn repair_transforms(scene: &mut SceneDescription) -> usize {
    let identity = Transform::new();
    let mut repaired = 0;
    for object in &mut scene.objects {
        let t = &mut object.transform;
        let mut touched = false;
        for (values, fallback) in [
            (&mut t.position, identity.position),
            (&mut t.rotation, identity.rotation),
            (&mut t.scale, identity.scale),
        ] {
            for (v, f) in values.iter_mut().zip(fallback) {
                if !v.is_finite() {
                    *v = f;
                    touched = true;
                }
            }
        }
        if touched {
            tracing::warn!("Repaired non-finite transform of {}", object.id);
            repaired += 1;
        }
    }
    repaired
}

impl SceneState {
    /// Write the scene as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SceneFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut scene = self.scene.clone();
        repair_transforms(&mut scene);
        let json = serde_json::to_string_pretty(&scene)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a scene file
    pub fn read_scene(path: &Path) -> Result<SceneDescription, SceneFileError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn autosave(&self) {
        let Some(path) = autosave_path() else {
            return;
        };
        match self.save_to(&path) {
            Ok(()) => tracing::debug!("Autosaved {} objects to {}", self.len(), path.display()),
            Err(e) => tracing::warn!("Autosave to {} failed: {e}", path.display()),
        }
    }

    pub fn load_autosave() -> Option<SceneDescription> {
        let path = autosave_path()?;
        match Self::read_scene(&path) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!("Ignoring autosave {}: {e}", path.display());
                None
            }
        }
    }

    pub fn has_autosave() -> bool {
        autosave_path().is_some_and(|p| p.exists())
    }
}
