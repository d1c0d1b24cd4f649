use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    foundation::config::GeneratorConfig,
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::model::{Layer, ParameterDecl, ProximityComponent},
};

/// Target graph the generator emits into.
///
/// Implementations wrap the host runtime's animator asset. The generator only ever touches items
/// it owns (see [`GeneratorConfig::owns_layer`] / [`GeneratorConfig::owns_parameter`]) and always
/// calls [`GraphBackend::remove_owned`] before adding the output of a run.
pub trait GraphBackend {
    /// Remove every generator-owned layer, parameter and remoting component.
    fn remove_owned(&mut self, config: &GeneratorConfig);

    /// Declare a parameter, or override the default of an already declared one.
    fn declare_parameter(&mut self, decl: ParameterDecl);

    /// Add a layer. Layer names are unique.
    fn add_layer(&mut self, layer: Layer) -> MenuGraphResult<()>;

    /// Add a proximity sender or receiver.
    fn add_component(&mut self, component: ProximityComponent);
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// In-memory animator graph.
///
/// Used both as the staging area of a run and as the default [`GraphBackend`] (the CLI reads and
/// writes it as JSON).
pub struct AnimatorGraph {
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub components: Vec<ProximityComponent>,
}

impl AnimatorGraph {
    /// Parse a graph from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MenuGraphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse animator graph JSON: {e}")))
    }

    /// Parse a graph from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!("open graph JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDecl> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Number of layers owned by the generator.
    pub fn owned_layer_count(&self, config: &GeneratorConfig) -> usize {
        self.layers
            .iter()
            .filter(|l| config.owns_layer(&l.name))
            .count()
    }

    /// Replay this graph into `backend`: owned items are removed first, then everything here is
    /// added.
    pub fn commit_into(
        self,
        backend: &mut dyn GraphBackend,
        config: &GeneratorConfig,
    ) -> MenuGraphResult<()> {
        backend.remove_owned(config);
        for decl in self.parameters {
            backend.declare_parameter(decl);
        }
        for layer in self.layers {
            backend.add_layer(layer)?;
        }
        for component in self.components {
            backend.add_component(component);
        }
        Ok(())
    }
}

impl GraphBackend for AnimatorGraph {
    fn remove_owned(&mut self, config: &GeneratorConfig) {
        self.layers.retain(|l| !config.owns_layer(&l.name));
        self.parameters.retain(|p| !config.owns_parameter(&p.name));
        self.components
            .retain(|c| !c.object().starts_with(config.remoting_root.as_str()));
    }

    fn declare_parameter(&mut self, decl: ParameterDecl) {
        match self.parameters.iter_mut().find(|p| p.name == decl.name) {
            Some(existing) => *existing = decl,
            None => self.parameters.push(decl),
        }
    }

    fn add_layer(&mut self, layer: Layer) -> MenuGraphResult<()> {
        if self.layer(&layer.name).is_some() {
            return Err(MenuGraphError::identity(format!(
                "layer '{}' emitted twice",
                layer.name
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    fn add_component(&mut self, component: ProximityComponent) {
        self.components.push(component);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/backend.rs"]
mod tests;
