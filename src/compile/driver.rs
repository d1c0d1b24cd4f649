use std::time::Instant;

use crate::{
    compile::blend::{Contributor, arbitration_layer},
    compile::context::CompilationContext,
    compile::hook::GeneratorHook,
    compile::layer::{register_blend_toggle, slider_layer, toggle_layer},
    compile::params::{ParameterSession, ParameterTable},
    compile::status::{RunStatus, StatusBoard},
    foundation::config::GeneratorConfig,
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::backend::GraphBackend,
    graph::fingerprint::{GraphFingerprint, fingerprint_graph},
    graph::model::{Layer, ParamHandle, ParameterDecl},
    menu::model::{ItemKind, MenuItem, Toggle},
    menu::project::MenuProject,
    mirror::asset::MenuStore,
    mirror::builder::rebuild_menu,
    remoting::compiler::{compile_receivers, compile_remote_control, compile_remote_tree},
    scene::query::SceneQuery,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Phase of a generation run.
pub enum RunPhase {
    Idle,
    /// Fresh run-scoped caches.
    PrePass1,
    /// Property registry seeding and conflict detection.
    PrePass2,
    MainPass,
    /// Arbitration layers.
    PostPass1,
    /// Shared blend layer, hooks and commit.
    PostPass2,
    MenuMirror,
    Done,
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Statistics of a successful run.
pub struct RunStats {
    /// Toggles folded into the shared blend layer.
    pub blend_motions: usize,
    /// Parameter-table entries requested by the run.
    pub parameters_used: usize,
    pub parameters_created: usize,
    pub parameters_redefined: usize,
    pub parameters_pruned: usize,
    /// Layers emitted, all kinds included.
    pub layers: usize,
    pub arbitration_layers: usize,
    pub remote_senders: usize,
    pub remote_receivers: usize,
    pub menu_controls: usize,
    pub warnings: Vec<String>,
    pub fingerprint: Option<GraphFingerprint>,
}

/// Orchestrates generation runs over a [`MenuProject`].
///
/// One run at a time; the run state lives in a [`CompilationContext`] created per run.
pub struct Generator {
    config: GeneratorConfig,
    hooks: Vec<Box<dyn GeneratorHook>>,
    phase: RunPhase,
    status: StatusBoard,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> MenuGraphResult<Self> {
        config.validate()?;
        let status = StatusBoard::new(config.status_window());
        Ok(Self {
            config,
            hooks: Vec::new(),
            phase: RunPhase::Idle,
            status,
        })
    }

    pub fn with_hook(mut self, hook: impl GeneratorHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Last run status, if still inside the display window at `now`.
    pub fn status(&self, now: Instant) -> Option<&RunStatus> {
        self.status.current(now)
    }

    /// Run one generation.
    ///
    /// On success the parameter table is pruned, compiler-owned graph items are replaced and the
    /// mirrored menu is rebuilt. On failure nothing is committed to `graph` or `menu`; parameter
    /// table entries created before the failure stay.
    #[tracing::instrument(
        skip(self, project, scene, table, graph, menu),
        fields(project = %project.name)
    )]
    pub fn generate(
        &mut self,
        project: &MenuProject,
        scene: &dyn SceneQuery,
        table: &mut ParameterTable,
        graph: &mut dyn GraphBackend,
        menu: &mut dyn MenuStore,
    ) -> MenuGraphResult<RunStats> {
        if !matches!(
            self.phase,
            RunPhase::Idle | RunPhase::Done | RunPhase::Failed
        ) {
            return Err(MenuGraphError::Busy);
        }
        let result = self.run(project, scene, table, graph, menu);
        let status = match &result {
            Ok(stats) => {
                self.enter(RunPhase::Done);
                tracing::info!(
                    blend_motions = stats.blend_motions,
                    parameters = stats.parameters_used,
                    layers = stats.layers,
                    warnings = stats.warnings.len(),
                    "generation finished"
                );
                RunStatus::Succeeded(stats.clone())
            }
            Err(e) => {
                self.enter(RunPhase::Failed);
                tracing::warn!(error = %e, "generation failed");
                RunStatus::Failed(e.to_string())
            }
        };
        self.status.record(status, Instant::now());
        result
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(?phase, "run phase");
        self.phase = phase;
    }

    fn run(
        &mut self,
        project: &MenuProject,
        scene: &dyn SceneQuery,
        table: &mut ParameterTable,
        graph: &mut dyn GraphBackend,
        menu: &mut dyn MenuStore,
    ) -> MenuGraphResult<RunStats> {
        let config = self.config.clone();

        self.enter(RunPhase::PrePass1);
        project.validate(config.max_menu_controls)?;
        let session = ParameterSession::new(table, config.param_prefix.clone());
        let mut ctx = CompilationContext::new(&config, scene, session);

        self.enter(RunPhase::PrePass2);
        let active = project.active_items();
        let toggles: Vec<(&MenuItem, &Toggle)> = active
            .iter()
            .filter_map(|i| i.as_toggle().map(|t| (*i, t)))
            .collect();
        for (item, toggle) in &toggles {
            ctx.index_toggle(item, toggle);
            record_contributions(&mut ctx, item, toggle);
        }
        ctx.double_driven.check_conflicts()?;

        self.enter(RunPhase::MainPass);
        for item in &active {
            compile_item(&mut ctx, item)?;
        }
        compile_receivers(&mut ctx, &toggles)?;

        self.enter(RunPhase::PostPass1);
        let arbitration: Vec<Layer> = ctx
            .double_driven
            .arbitrated()
            .map(|(binding, contributors)| arbitration_layer(&config, binding, contributors))
            .collect();
        for layer in arbitration {
            ctx.stage_layer(layer)?;
            ctx.arbitration_layers += 1;
        }

        self.enter(RunPhase::PostPass2);
        if let Some((layer, weight)) = ctx.blend.finalize(&config) {
            ctx.declare(weight)?;
            ctx.stage_layer(layer)?;
        }
        for hook in &mut self.hooks {
            tracing::debug!(hook = hook.name(), "running generator hook");
            hook.after_passes(&mut ctx)?;
        }

        let mut stats = RunStats {
            blend_motions: ctx.blend.len(),
            arbitration_layers: ctx.arbitration_layers,
            remote_senders: ctx.sender_tags.len(),
            remote_receivers: ctx.remote_receivers,
            ..RunStats::default()
        };
        let (session, mut staged, warnings) = ctx.into_parts();
        let mut decls: Vec<ParameterDecl> = session.used().map(|e| e.declaration()).collect();
        decls.append(&mut staged.parameters);
        staged.parameters = decls;
        stats.layers = staged.layers.len();
        stats.fingerprint = Some(fingerprint_graph(&staged));
        staged.commit_into(graph, &config)?;

        let summary = session.finish();
        stats.parameters_used = summary.used;
        stats.parameters_created = summary.created;
        stats.parameters_redefined = summary.redefined;
        stats.parameters_pruned = summary.pruned.len();
        stats.warnings = warnings;

        self.enter(RunPhase::MenuMirror);
        stats.menu_controls = rebuild_menu(menu, project, &config);
        Ok(stats)
    }
}

/// Seed the property registry with every property a toggle drives.
fn record_contributions(ctx: &mut CompilationContext<'_>, item: &MenuItem, toggle: &Toggle) {
    let param = ParamHandle::new(
        ctx.config().parameter_name(item.token()),
        toggle.parameter_kind(),
    );
    for c in toggle.contributions() {
        if !ctx.scene().resolves(&c.binding) {
            continue;
        }
        ctx.double_driven.record(
            c.binding,
            Contributor {
                item: item.name.clone(),
                token: item.token().to_string(),
                param: param.clone(),
                on: c.on,
                off: c.off,
            },
        );
    }
}

fn compile_item(ctx: &mut CompilationContext<'_>, item: &MenuItem) -> MenuGraphResult<()> {
    match &item.kind {
        // Children are visited on their own; raw entries only exist in the menu.
        ItemKind::Submenu(_) | ItemKind::Raw(_) => Ok(()),
        ItemKind::Toggle(t) if t.can_use_blend_tree() => register_blend_toggle(ctx, item, t),
        ItemKind::Toggle(t) => {
            let layer = toggle_layer(ctx, item, t)?;
            ctx.stage_layer(layer)
        }
        ItemKind::Slider(s) => {
            let layer = slider_layer(ctx, item, s)?;
            ctx.stage_layer(layer)
        }
        ItemKind::RemoteControl(rc) => compile_remote_control(ctx, item, rc),
        ItemKind::RemoteTree(tree) => compile_remote_tree(ctx, item, tree),
        ItemKind::Unresolved => {
            ctx.warn(format!(
                "item '{}' has no kind selected and was skipped",
                item.name
            ));
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/driver.rs"]
mod tests;
