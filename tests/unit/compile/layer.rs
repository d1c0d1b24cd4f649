use super::*;
use crate::compile::blend::Contributor;
use crate::compile::params::{ParameterSession, ParameterTable};
use crate::foundation::config::GeneratorConfig;
use crate::graph::model::{Condition, CurveValue, ParamKind, ParamValue};
use crate::menu::dsl::{SliderBuilder, ToggleBuilder};
use crate::menu::model::ItemKind;
use crate::scene::query::{AcceptAll, SceneIndex};

fn state<'l>(layer: &'l Layer, name: &str) -> &'l State {
    layer.state(layer.state_id(name).unwrap()).unwrap()
}

#[test]
fn fsm_toggle_has_two_states_and_guarded_transitions() {
    let cfg = GeneratorConfig::default();
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &AcceptAll, session);

    let item = ToggleBuilder::new("Coat")
        .object("Coat")
        .transition(0.3)
        .build();
    let layer = toggle_layer(&mut ctx, &item, item.as_toggle().unwrap()).unwrap();
    let param = format!("MG{}", item.token());

    assert_eq!(layer.name, format!("MG-{}", item.token()));
    assert_eq!(layer.states.len(), 2);
    // Default off: the disabled state is the entry state.
    assert_eq!(layer.states[0].name, DISABLED);
    assert_eq!(layer.transitions.len(), 2);
    for t in &layer.transitions {
        assert_eq!(t.duration_s, 0.3);
        assert_eq!(t.guard.alternatives.len(), 1);
        assert_eq!(t.guard.alternatives[0][0].param(), Some(param.as_str()));
    }
    let enabled = layer.state_id(ENABLED).unwrap();
    let to_disabled: Vec<_> = layer.transitions_from(enabled).collect();
    assert_eq!(
        to_disabled[0].guard.alternatives[0][0],
        Condition::IsFalse { param }
    );
}

#[test]
fn default_on_toggle_enters_enabled() {
    let cfg = GeneratorConfig::default();
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &AcceptAll, session);
    let item = ToggleBuilder::new("Coat").default_on(true).disable_mouth().build();
    let layer = toggle_layer(&mut ctx, &item, item.as_toggle().unwrap()).unwrap();
    assert_eq!(layer.states[0].name, ENABLED);
    assert_eq!(
        state(&layer, ENABLED).tracking[0].mode,
        crate::graph::model::TrackingMode::Animation
    );
    assert_eq!(
        state(&layer, DISABLED).tracking[0].mode,
        crate::graph::model::TrackingMode::Tracking
    );
}

#[test]
fn drives_follow_the_when_rule() {
    let cfg = GeneratorConfig::default();
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &AcceptAll, session);

    let blend_target = ToggleBuilder::new("Hat").object("Hat").build();
    let fsm_target = ToggleBuilder::new("Coat").transition(0.5).build();
    let missing = ToggleBuilder::new("Gone").build();
    ctx.index_toggle(&blend_target, blend_target.as_toggle().unwrap());
    ctx.index_toggle(&fsm_target, fsm_target.as_toggle().unwrap());

    let item = ToggleBuilder::new("Driver")
        .drive(blend_target.id(), DriveWhen::OnActivate, DriveTo::TurnOn)
        .drive(fsm_target.id(), DriveWhen::Always, DriveTo::TurnOff)
        .drive(missing.id(), DriveWhen::OnDeactivate, DriveTo::TurnOn)
        .build();
    let layer = toggle_layer(&mut ctx, &item, item.as_toggle().unwrap()).unwrap();

    let enabled = &state(&layer, ENABLED).drives;
    let disabled = &state(&layer, DISABLED).drives;
    assert_eq!(enabled.len(), 2);
    assert_eq!(enabled[0].value, ParamValue::Float(1.0));
    assert_eq!(enabled[1].value, ParamValue::Bool(false));
    assert_eq!(disabled.len(), 1);
    assert_eq!(disabled[0].param, format!("MG{}", fsm_target.token()));
    assert_eq!(ctx.warnings().len(), 1);
}

#[test]
fn arbitrated_and_unresolved_properties_are_left_out_of_clips() {
    let cfg = GeneratorConfig::default();
    let mut scene = SceneIndex::default();
    scene.object("Body").blend_shapes.insert("X".to_string());
    scene.object("Body").blend_shapes.insert("Y".to_string());
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &scene, session);

    let item = ToggleBuilder::new("A")
        .blend_shape("Body", "X", 100.0, 0.0)
        .blend_shape("Body", "Y", 100.0, 0.0)
        .object("Missing")
        .build();
    let shared = PropertyBinding::blend_shape("Body", "X");
    for who in ["A", "B"] {
        ctx.double_driven.record(
            shared.clone(),
            Contributor {
                item: who.to_string(),
                token: who.to_string(),
                param: ParamHandle::new(who, ParamKind::Float),
                on: CurveValue::Scalar(100.0),
                off: CurveValue::Scalar(0.0),
            },
        );
    }

    let (on, off) = toggle_clips(&mut ctx, &item, item.as_toggle().unwrap());
    assert_eq!(on.curves.len(), 1);
    assert_eq!(off.curves.len(), 1);
    assert!(on.animates(&PropertyBinding::blend_shape("Body", "Y")));
    assert!(!on.animates(&shared));
    assert_eq!(ctx.warnings().len(), 1);
}

#[test]
fn toggle_without_targets_emits_empty_motions() {
    let cfg = GeneratorConfig::default();
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &AcceptAll, session);
    let item = ToggleBuilder::new("Nothing").build();
    register_blend_toggle(&mut ctx, &item, item.as_toggle().unwrap()).unwrap();
    let m = &ctx.blend.motions()[0];
    assert_eq!(m.on, Motion::Empty);
    assert_eq!(m.off, Motion::Empty);
    assert_eq!(m.param.kind, ParamKind::Float);
}

#[test]
fn slider_is_one_state_driven_by_motion_time() {
    let cfg = GeneratorConfig::default();
    let mut table = ParameterTable::default();
    let session = ParameterSession::new(&mut table, "MG");
    let mut ctx = CompilationContext::new(&cfg, &AcceptAll, session);
    let item = SliderBuilder::new("Size")
        .default_value(0.25)
        .blend_shape("Body", "Big", 0.0, 100.0)
        .material("Body", "_Glow", 0.2, 0.8)
        .build();
    let ItemKind::Slider(slider) = &item.kind else {
        unreachable!()
    };
    let layer = slider_layer(&mut ctx, &item, slider).unwrap();
    assert_eq!(layer.states.len(), 1);
    assert!(layer.transitions.is_empty());
    let s = &layer.states[0];
    assert_eq!(s.name, SLIDER_STATE);
    let param = format!("MG{}", item.token());
    assert_eq!(s.motion_time.as_deref(), Some(param.as_str()));
    let Motion::Clip(clip) = &s.motion else {
        panic!("expected clip");
    };
    assert_eq!(
        clip.curves[1].keys,
        CurveKeys::Linear {
            at_zero: 0.2,
            at_one: 0.8
        }
    );
    drop(ctx);
    let entry = table.get(&param).unwrap();
    assert_eq!(entry.kind, ParamKind::Float);
    assert_eq!(entry.default, 0.25);
}
