use super::*;
use crate::graph::backend::AnimatorGraph;
use crate::graph::model::{Layer, ParamKind};
use crate::menu::dsl::{ToggleBuilder, unresolved};
use crate::mirror::asset::MenuAsset;
use crate::scene::query::AcceptAll;

struct ExtraLayer {
    fail: bool,
}

impl GeneratorHook for ExtraLayer {
    fn name(&self) -> &str {
        "extra"
    }

    fn after_passes(&mut self, ctx: &mut CompilationContext<'_>) -> MenuGraphResult<()> {
        if self.fail {
            return Err(MenuGraphError::validation("hook refused"));
        }
        let p = ctx.acquire("MGHook", ParamKind::Bool, false, 0.0)?;
        let mut layer = Layer::new("MG-Hook");
        layer.add_state(crate::graph::model::State::new("Only"));
        ctx.stage_layer(layer)?;
        ctx.warn(format!("hook used {}", p.name));
        Ok(())
    }
}

/// Hook that stages whatever names it is given.
struct NamedHook {
    layer: &'static str,
    param: &'static str,
}

impl GeneratorHook for NamedHook {
    fn name(&self) -> &str {
        "named"
    }

    fn after_passes(&mut self, ctx: &mut CompilationContext<'_>) -> MenuGraphResult<()> {
        ctx.acquire(self.param, ParamKind::Bool, false, 0.0)?;
        ctx.stage_layer(Layer::new(self.layer))
    }
}

fn project() -> MenuProject {
    let mut p = MenuProject::new("Avatar");
    p.items.push(ToggleBuilder::new("Hat").object("Hat").build());
    p
}

#[test]
fn successful_run_ends_done_and_records_status() {
    let mut g = Generator::new(GeneratorConfig::default()).unwrap();
    assert_eq!(g.phase(), RunPhase::Idle);
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let stats = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    assert_eq!(g.phase(), RunPhase::Done);
    assert_eq!(stats.blend_motions, 1);
    assert_eq!(stats.layers, 1);
    assert_eq!(stats.menu_controls, 1);
    assert!(stats.fingerprint.is_some());
    assert!(matches!(
        g.status(Instant::now()),
        Some(RunStatus::Succeeded(_))
    ));
}

#[test]
fn run_in_progress_is_busy() {
    let mut g = Generator::new(GeneratorConfig::default()).unwrap();
    g.phase = RunPhase::MainPass;
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let err = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap_err();
    assert!(matches!(err, MenuGraphError::Busy));
    assert_eq!(g.phase(), RunPhase::MainPass);
}

#[test]
fn hooks_can_add_parameters_and_layers() {
    let mut g = Generator::new(GeneratorConfig::default())
        .unwrap()
        .with_hook(ExtraLayer { fail: false });
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let stats = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    assert_eq!(stats.layers, 2);
    assert!(graph.layer("MG-Hook").is_some());
    assert!(table.get("MGHook").is_some());
    assert_eq!(stats.warnings, vec!["hook used MGHook".to_string()]);
}

#[test]
fn failed_run_commits_nothing_and_reports_status() {
    let mut g = Generator::new(GeneratorConfig::default())
        .unwrap()
        .with_hook(ExtraLayer { fail: true });
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let err = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap_err();
    assert!(matches!(err, MenuGraphError::Validation(_)));
    assert_eq!(g.phase(), RunPhase::Failed);
    assert!(graph.layers.is_empty());
    assert!(menu.controls.is_empty());
    match g.status(Instant::now()) {
        Some(RunStatus::Failed(msg)) => assert!(msg.contains("hook refused")),
        other => panic!("unexpected status {other:?}"),
    }
    // The generator accepts a new run after a failure.
    g.hooks.clear();
    g.generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
}

#[test]
fn unresolved_items_warn_and_compile_to_nothing() {
    let mut g = Generator::new(GeneratorConfig::default()).unwrap();
    let mut p = MenuProject::new("Avatar");
    p.items.push(unresolved("Pending"));
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let stats = g
        .generate(&p, &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    assert_eq!(stats.layers, 0);
    assert_eq!(stats.parameters_used, 0);
    assert_eq!(stats.warnings.len(), 1);
    assert!(menu.controls.is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = GeneratorConfig {
        max_menu_controls: 0,
        ..GeneratorConfig::default()
    };
    assert!(Generator::new(cfg).is_err());
}

#[test]
fn hook_output_regenerates_identically() {
    let mut g = Generator::new(GeneratorConfig::default())
        .unwrap()
        .with_hook(ExtraLayer { fail: false });
    let mut table = ParameterTable::default();
    let mut graph = AnimatorGraph::default();
    let mut menu = MenuAsset::default();
    let first = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    let snapshot = (table.clone(), graph.clone());
    let second = g
        .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(second.parameters_created, 0);
    assert_eq!((table.clone(), graph.clone()), snapshot);

    // Dropping the hook prunes what it owned.
    g.hooks.clear();
    g.generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
        .unwrap();
    assert!(table.get("MGHook").is_none());
    assert!(graph.layer("MG-Hook").is_none());
}

#[test]
fn hook_names_outside_the_namespaces_fail_the_run() {
    for (layer, param) in [("HookLayer", "MGHookParam"), ("MG-HookLayer", "HookParam")] {
        let mut g = Generator::new(GeneratorConfig::default())
            .unwrap()
            .with_hook(NamedHook { layer, param });
        let mut table = ParameterTable::default();
        let mut graph = AnimatorGraph::default();
        let mut menu = MenuAsset::default();
        for _ in 0..2 {
            let err = g
                .generate(&project(), &AcceptAll, &mut table, &mut graph, &mut menu)
                .unwrap_err();
            assert!(matches!(err, MenuGraphError::Identity(_)), "{err}");
        }
        assert!(graph.layers.is_empty());
        assert!(table.get("HookParam").is_none());
    }
}
