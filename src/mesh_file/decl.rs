//! Serde model of the `.smeshdecl` declaration file.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Root record of a declaration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MeshDecl {
    pub name: String,
    pub mesh_count: usize,
    /// A declaration without this key describes no meshes and its blob is
    /// never read. An empty list still reads the blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meshes: Option<Vec<MeshDeclOffset>>,
    pub vertex_count: usize,
    pub binary_data_path: String,
}

/// One mesh entry of a declaration: the vertex slice it occupies in the blob
/// and the base scale it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDeclOffset {
    #[serde(with = "quoted")]
    pub vertex_start_offset: usize,
    #[serde(with = "quoted")]
    pub vertex_end_offset: usize,
    pub base_mesh_scale: Vec3,
}

impl MeshDeclOffset {
    pub fn vertex_range(&self) -> std::ops::Range<usize> {
        self.vertex_start_offset..self.vertex_end_offset
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_end_offset.saturating_sub(self.vertex_start_offset)
    }
}

/// Integers written as strings. Reading accepts either form.
mod quoted {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        deserializer.deserialize_any(QuotedVisitor)
    }

    struct QuotedVisitor;

    impl<'de> Visitor<'de> for QuotedVisitor {
        type Value = usize;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a string holding one")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<usize, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<usize, E> {
            usize::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<usize, E> {
            usize::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "(vertexStartOffset: \"4\", vertexEndOffset: 10, baseMeshScale: (1.0, 2.0, 3.0))";

    #[test]
    fn test_offsets_written_quoted() {
        let entry = MeshDeclOffset {
            vertex_start_offset: 3,
            vertex_end_offset: 9,
            base_mesh_scale: Vec3::ONE,
        };
        let text = ron::to_string(&entry).unwrap();
        assert!(text.contains("\"3\""), "{text}");
        assert!(text.contains("\"9\""), "{text}");

        let parsed: MeshDeclOffset = ron::from_str(&text).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_offsets_read_quoted_or_bare() {
        let entry: MeshDeclOffset = ron::from_str(ENTRY).unwrap();
        assert_eq!(entry.vertex_range(), 4..10);
        assert_eq!(entry.vertex_count(), 6);
        assert_eq!(entry.base_mesh_scale, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let text = ENTRY.replace("\"4\"", "-4");
        assert!(ron::from_str::<MeshDeclOffset>(&text).is_err());

        let text = ENTRY.replace("\"4\"", "\"four\"");
        assert!(ron::from_str::<MeshDeclOffset>(&text).is_err());
    }

    #[test]
    fn test_missing_meshes_key() {
        let text = "(name: \"empty\", meshCount: 0, vertexCount: 0, binaryDataPath: \"empty.smesh\")";
        let decl: MeshDecl = ron::from_str(text).unwrap();
        assert!(decl.meshes.is_none());
        assert_eq!(decl.binary_data_path, "empty.smesh");

        let text = text.replace("meshCount: 0,", "meshCount: 0, meshes: [],");
        let decl: MeshDecl = ron::from_str(&text).unwrap();
        assert_eq!(decl.meshes, Some(Vec::new()));
    }
}
