//! Pointer ray to ground-plane picking for drag operations.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::{ObjectId, PlacedObject};

/// A ray in world space (y is up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: [f64; 3],
    pub direction: [f64; 3],
}

impl Ray {
    pub fn new(origin: [f64; 3], direction: [f64; 3]) -> Self {
        Self { origin, direction }
    }

    fn origin_vec(&self) -> DVec3 {
        DVec3::from_array(self.origin)
    }

    fn direction_vec(&self) -> DVec3 {
        DVec3::from_array(self.direction)
    }
}

/// Intersect a ray with the horizontal plane `y = height`.
/// Returns None when the ray is parallel to the plane or points away from it.
pub fn ray_ground_intersection(ray: &Ray, height: f64) -> Option<DVec3> {
    const EPSILON: f64 = 1e-9;

    let origin = ray.origin_vec();
    let direction = ray.direction_vec();
    if !origin.is_finite() || !direction.is_finite() || direction.y.abs() < EPSILON {
        return None;
    }

    let t = (height - origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}

/// An in-progress drag: keeps the grab offset so the object does not jump
/// to the pointer on the first move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub object_id: ObjectId,
    offset: DVec3,
    plane_height: f64,
    object_height: f64,
}

impl DragSession {
    /// Start dragging `object` from the point where `ray` hits the drag plane
    pub fn begin(object: &PlacedObject, ray: &Ray, plane_height: f64) -> Option<Self> {
        let hit = ray_ground_intersection(ray, plane_height)?;
        let [x, y, z] = object.transform.position;
        Some(Self {
            object_id: object.id.clone(),
            offset: DVec3::new(hit.x - x, 0.0, hit.z - z),
            plane_height,
            object_height: y,
        })
    }

    /// Position the object would take under the current pointer ray,
    /// before collision correction
    pub fn proposed_position(&self, ray: &Ray) -> Option<[f64; 3]> {
        let hit = ray_ground_intersection(ray, self.plane_height)?;
        Some([hit.x - self.offset.x, self.object_height, hit.z - self.offset.z])
    }
}
