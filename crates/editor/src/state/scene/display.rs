//! Display helper functions for placed objects

use shared::{PlacedObject, Primitive};

/// Get display name for an object
pub fn object_display_name(object: &PlacedObject) -> String {
    format!("{} ({})", object.name, short_id(&object.id))
}

/// Get a short text icon for a primitive
pub fn primitive_icon(primitive: &Primitive) -> &'static str {
    match primitive {
        Primitive::Box { .. } => "[B]",
        Primitive::Sphere { .. } => "[S]",
        Primitive::Cylinder { .. } => "[Y]",
        Primitive::Cone { .. } => "[K]",
        Primitive::Torus { .. } => "[O]",
        Primitive::Custom { .. } => "[*]",
    }
}

/// First 8 characters of an ID
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GeometryType;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_object_display_name() {
        let o = PlacedObject::new("deadbeef-cafe", "Redis", GeometryType::Torus.canonical());
        assert_eq!(object_display_name(&o), "Redis (deadbeef)");
        assert_eq!(primitive_icon(&o.primitive), "[O]");
    }
}
