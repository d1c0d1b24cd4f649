use std::collections::{BTreeSet, HashMap};

use crate::{
    compile::blend::{BlendMerger, DoubleDrivenRegistry},
    compile::params::{ParameterEntry, ParameterSession},
    foundation::config::GeneratorConfig,
    foundation::error::{MenuGraphError, MenuGraphResult},
    foundation::ident::ItemId,
    graph::backend::{AnimatorGraph, GraphBackend},
    graph::model::{Layer, ParamHandle, ParamKind, ParameterDecl, ProximityComponent},
    menu::model::{MenuItem, Toggle},
    scene::query::SceneQuery,
};

/// State of one generation run, threaded through every pass and dropped at the end.
///
/// Nothing here outlives the run: two contexts never share caches.
pub struct CompilationContext<'a> {
    config: &'a GeneratorConfig,
    scene: &'a dyn SceneQuery,
    pub(crate) params: ParameterSession<'a>,
    pub(crate) blend: BlendMerger,
    pub(crate) double_driven: DoubleDrivenRegistry,
    /// Output staged until every pass succeeded.
    pub(crate) staged: AnimatorGraph,
    pub(crate) sender_tags: BTreeSet<String>,
    pub(crate) arbitration_layers: usize,
    pub(crate) remote_receivers: usize,
    toggles: HashMap<ItemId, ParamHandle>,
    warnings: Vec<String>,
}

impl<'a> CompilationContext<'a> {
    pub(crate) fn new(
        config: &'a GeneratorConfig,
        scene: &'a dyn SceneQuery,
        params: ParameterSession<'a>,
    ) -> Self {
        Self {
            config,
            scene,
            params,
            blend: BlendMerger::default(),
            double_driven: DoubleDrivenRegistry::default(),
            staged: AnimatorGraph::default(),
            sender_tags: BTreeSet::new(),
            arbitration_layers: 0,
            remote_receivers: 0,
            toggles: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    pub fn scene(&self) -> &dyn SceneQuery {
        self.scene
    }

    /// Request a parameter of the shared table for this run.
    ///
    /// The name must carry the parameter prefix; anything else would never be pruned.
    pub fn acquire(
        &mut self,
        name: impl Into<String>,
        kind: ParamKind,
        saved: bool,
        default: f32,
    ) -> MenuGraphResult<ParamHandle> {
        let name = name.into();
        if !name.starts_with(&self.config.param_prefix) {
            return Err(MenuGraphError::identity(format!(
                "parameter '{name}' is outside the '{}' namespace",
                self.config.param_prefix
            )));
        }
        self.params.acquire(ParameterEntry::new(name, kind, saved, default))
    }

    /// Parameter of an authored toggle, named after its identity token.
    pub(crate) fn acquire_toggle(
        &mut self,
        item: &MenuItem,
        toggle: &Toggle,
    ) -> MenuGraphResult<ParamHandle> {
        let name = self.config.parameter_name(item.token());
        self.acquire(
            name,
            toggle.parameter_kind(),
            toggle.saved,
            if toggle.default { 1.0 } else { 0.0 },
        )
    }

    /// Stage a layer; a name already staged in this run, or one the next run would not remove, is
    /// an identity error.
    pub fn stage_layer(&mut self, layer: Layer) -> MenuGraphResult<()> {
        if !self.config.owns_layer(&layer.name) {
            return Err(MenuGraphError::identity(format!(
                "layer '{}' is outside the '{}' namespace",
                layer.name, self.config.layer_prefix
            )));
        }
        tracing::debug!(layer = %layer.name, states = layer.states.len(), "layer staged");
        self.staged.add_layer(layer)
    }

    /// Declare a graph-only parameter (one that has no parameter table entry).
    pub fn declare(&mut self, decl: ParameterDecl) -> MenuGraphResult<()> {
        if !self.config.owns_parameter(&decl.name) {
            return Err(MenuGraphError::identity(format!(
                "graph parameter '{}' is outside the generator namespaces",
                decl.name
            )));
        }
        self.staged.declare_parameter(decl);
        Ok(())
    }

    pub(crate) fn add_component(&mut self, component: ProximityComponent) {
        self.staged.add_component(component);
    }

    /// Record a non-fatal problem.
    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!("{msg}");
        self.warnings.push(msg);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Remember the parameter handle a toggle will use, so drives can target it.
    pub(crate) fn index_toggle(&mut self, item: &MenuItem, toggle: &Toggle) {
        let handle = ParamHandle::new(
            self.config.parameter_name(item.token()),
            toggle.parameter_kind(),
        );
        self.toggles.insert(item.id(), handle);
    }

    pub(crate) fn toggle_handle(&self, id: ItemId) -> Option<&ParamHandle> {
        self.toggles.get(&id)
    }

    pub(crate) fn into_parts(self) -> (ParameterSession<'a>, AnimatorGraph, Vec<String>) {
        (self.params, self.staged, self.warnings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/context.rs"]
mod tests;
