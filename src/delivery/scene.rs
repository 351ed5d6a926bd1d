//! Scene context handed in by the host editor.
//!
//! This is a plain snapshot: selection, the active object and collection,
//! the frame range, and per-object transform and volume data. Delivery reads
//! it and never mutates it.

use super::CsvSpace;
use crate::error::Result;
use crate::types::{AttributeRecord, GridDescriptor};
use crate::volume::VolumeField;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Host object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Mesh,
    Curve,
    Meta,
    Surface,
    Font,
    Armature,
    Camera,
    Empty,
    Light,
    #[serde(other)]
    Other,
}

impl ObjectKind {
    /// Kinds that mesh exporters can turn into geometry.
    pub const DELIVERABLE: [ObjectKind; 5] = [
        ObjectKind::Curve,
        ObjectKind::Mesh,
        ObjectKind::Meta,
        ObjectKind::Surface,
        ObjectKind::Font,
    ];

    pub fn is_deliverable(&self) -> bool {
        Self::DELIVERABLE.contains(self)
    }
}

/// Object transform at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformKey {
    pub frame: i32,
    pub world: Mat4,
    /// Parent-relative matrix; the world matrix stands in when absent.
    #[serde(default)]
    pub local: Option<Mat4>,
}

/// Grid-shaped point attributes read from a host mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeAttributes {
    /// Host grid properties (x, y, z).
    pub size: [u32; 3],
    /// Per-point records in the host's storage order.
    pub records: Vec<AttributeRecord>,
}

impl VolumeAttributes {
    /// Validate and convert into a volume field.
    pub fn to_field(&self) -> Result<VolumeField> {
        let grid = GridDescriptor::from_host(self.size)?;
        VolumeField::from_attributes(grid, &self.records)
    }
}

/// An object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub selected: bool,
    /// Transform keys, not necessarily sorted.
    #[serde(default)]
    pub transforms: Vec<TransformKey>,
    #[serde(default)]
    pub volume: Option<VolumeAttributes>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            selected: false,
            transforms: Vec::new(),
            volume: None,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn with_volume(mut self, volume: VolumeAttributes) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Matrix at `frame`, holding the last key at or before it.
    ///
    /// Frames before the first key use the first key; an object without
    /// keys sits at the identity.
    pub fn matrix_at(&self, frame: i32, space: CsvSpace) -> Mat4 {
        let held = self
            .transforms
            .iter()
            .filter(|key| key.frame <= frame)
            .max_by_key(|key| key.frame);
        let key = held.or_else(|| self.transforms.iter().min_by_key(|key| key.frame));

        match (key, space) {
            (None, _) => Mat4::IDENTITY,
            (Some(key), CsvSpace::World) => key.world,
            (Some(key), CsvSpace::Local) => key.local.unwrap_or(key.world),
        }
    }
}

/// A named collection of objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneCollection {
    pub name: String,
    /// Names of all objects in the collection, nested children included.
    #[serde(default)]
    pub objects: Vec<String>,
}

/// Snapshot of the editor state a delivery runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneContext {
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub active_object: Option<String>,
    #[serde(default)]
    pub active_collection: SceneCollection,
    #[serde(default = "default_frame_start")]
    pub frame_start: i32,
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
}

fn default_frame_start() -> i32 {
    1
}

fn default_frame_end() -> i32 {
    250
}

impl SceneContext {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self {
            objects,
            active_object: None,
            active_collection: SceneCollection::default(),
            frame_start: default_frame_start(),
            frame_end: default_frame_end(),
        }
    }

    /// Parse a scene snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn active(&self) -> Option<&SceneObject> {
        self.active_object.as_deref().and_then(|name| self.object(name))
    }

    /// The active object, if it is part of the selection.
    ///
    /// Deliveries draw from the selection only in this case, and fall back
    /// to the active collection otherwise.
    pub fn active_selection(&self) -> Option<&SceneObject> {
        self.active().filter(|o| o.selected)
    }

    pub fn selected_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.selected)
    }

    /// Objects of the active collection, skipping names not in the scene.
    pub fn collection_objects(&self) -> Vec<&SceneObject> {
        self.active_collection
            .objects
            .iter()
            .filter_map(|name| {
                let object = self.object(name);
                if object.is_none() {
                    log::warn!(
                        "Collection '{}' lists unknown object '{}'",
                        self.active_collection.name,
                        name
                    );
                }
                object
            })
            .collect()
    }

    /// Frames covered by the scene's frame range.
    pub fn frames(&self) -> std::ops::RangeInclusive<i32> {
        self.frame_start..=self.frame_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn key(frame: i32, x: f32) -> TransformKey {
        TransformKey {
            frame,
            world: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
            local: None,
        }
    }

    #[test]
    fn test_matrix_at_step_holds() {
        let mut object = SceneObject::new("Cube", ObjectKind::Mesh);
        object.transforms = vec![key(10, 2.0), key(1, 1.0)];

        let x = |frame| object.matrix_at(frame, CsvSpace::World).w_axis.x;
        assert_eq!(x(-5), 1.0);
        assert_eq!(x(1), 1.0);
        assert_eq!(x(9), 1.0);
        assert_eq!(x(10), 2.0);
        assert_eq!(x(100), 2.0);
        // Local falls back to world.
        assert_eq!(object.matrix_at(10, CsvSpace::Local).w_axis.x, 2.0);
    }

    #[test]
    fn test_matrix_without_keys_is_identity() {
        let object = SceneObject::new("Cube", ObjectKind::Mesh);
        assert_eq!(object.matrix_at(1, CsvSpace::Local), Mat4::IDENTITY);
    }

    #[test]
    fn test_active_selection() {
        let mut scene = SceneContext::new(vec![
            SceneObject::new("Cube", ObjectKind::Mesh).selected(),
            SceneObject::new("Lamp", ObjectKind::Light),
        ]);
        assert!(scene.active_selection().is_none());
        scene.active_object = Some("Lamp".into());
        assert!(scene.active_selection().is_none());
        scene.active_object = Some("Cube".into());
        assert_eq!(scene.active_selection().map(|o| o.name.as_str()), Some("Cube"));
        assert_eq!(scene.selected_objects().count(), 1);
    }

    #[test]
    fn test_scene_from_json() {
        let scene = SceneContext::from_json(
            r#"{
                "objects": [
                    {"name": "Field", "kind": "MESH", "selected": true,
                     "volume": {"size": [1, 1, 2], "records": [{"value": 0.5}, {"value": 1.5}]}},
                    {"name": "Rig", "kind": "GPENCIL"}
                ],
                "active_object": "Field",
                "active_collection": {"name": "Collection", "objects": ["Field", "Rig", "Ghost"]}
            }"#,
        )
        .unwrap();

        assert_eq!(scene.frames(), 1..=250);
        assert_eq!(scene.objects[1].kind, ObjectKind::Other);
        assert_eq!(scene.collection_objects().len(), 2);
        let field = scene.objects[0].volume.as_ref().unwrap().to_field().unwrap();
        assert_eq!(field.grid.dims(), [1, 1, 2]);
    }
}
