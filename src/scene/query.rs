use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::model::{AnimatedProperty, PropertyBinding},
};

/// Resolves authored object/property references against the host scene.
pub trait SceneQuery {
    /// `true` if `binding` names an existing object and property.
    fn resolves(&self, binding: &PropertyBinding) -> bool;
}

/// Scene query that resolves everything; used when no scene description is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl SceneQuery for AcceptAll {
    fn resolves(&self, _binding: &PropertyBinding) -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub blend_shapes: BTreeSet<String>,
    #[serde(default)]
    pub material_properties: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Static description of scene objects keyed by path.
pub struct SceneIndex {
    #[serde(default)]
    pub objects: BTreeMap<String, SceneObject>,
}

impl SceneIndex {
    pub fn from_reader<R: std::io::Read>(r: R) -> MenuGraphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse scene index JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Register an object (idempotent) and return it for further setup.
    pub fn object(&mut self, path: impl Into<String>) -> &mut SceneObject {
        self.objects.entry(path.into()).or_default()
    }
}

impl SceneQuery for SceneIndex {
    fn resolves(&self, binding: &PropertyBinding) -> bool {
        let Some(obj) = self.objects.get(&binding.object) else {
            return false;
        };
        match &binding.property {
            AnimatedProperty::Active => true,
            AnimatedProperty::BlendShape(s) => obj.blend_shapes.contains(s),
            AnimatedProperty::Material(p) => obj.material_properties.contains(p),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/query.rs"]
mod tests;
