use super::*;
use crate::graph::model::{Condition, CurveKeys, StateId};

fn contributor(item: &str, kind: ParamKind, on: f32, off: f32) -> Contributor {
    Contributor {
        item: item.to_string(),
        token: format!("{item}-tok"),
        param: ParamHandle::new(format!("MG{item}-tok"), kind),
        on: CurveValue::Scalar(on),
        off: CurveValue::Scalar(off),
    }
}

#[test]
fn empty_merger_emits_nothing() {
    let m = BlendMerger::default();
    assert!(m.finalize(&GeneratorConfig::default()).is_none());
}

#[test]
fn finalize_builds_one_direct_blend_with_two_point_children() {
    let cfg = GeneratorConfig::default();
    let mut m = BlendMerger::default();
    let clip = |v: f32| {
        Motion::Clip(Clip::named("c").set(PropertyBinding::active("Hat"), CurveValue::Scalar(v)))
    };
    m.register(clip(1.0), clip(0.0), ParamHandle::new("MGa", ParamKind::Float));
    m.register(Motion::Empty, Motion::Empty, ParamHandle::new("MGb", ParamKind::Float));

    let (layer, weight) = m.finalize(&cfg).unwrap();
    assert_eq!(layer.name, cfg.shared_layer_name());
    assert_eq!(layer.states.len(), 1);
    assert!(layer.transitions.is_empty());
    assert!(layer.states[0].write_defaults);
    assert_eq!(weight.name, cfg.blend_weight_parameter());
    assert_eq!(weight.default, ParamValue::Float(1.0));

    let Motion::Direct(direct) = &layer.states[0].motion else {
        panic!("expected a direct blend");
    };
    assert_eq!(direct.children.len(), 2);
    assert!(direct.children.iter().all(|c| c.weight_param == weight.name));
    let Motion::Blend1D(first) = &direct.children[0].motion else {
        panic!("expected a 1D blend");
    };
    assert_eq!(first.param, "MGa");
    assert_eq!(first.children[0].threshold, 0.0);
    assert_eq!(first.children[0].motion, clip(0.0));
    assert_eq!(first.children[1].threshold, 1.0);
    assert_eq!(first.children[1].motion, clip(1.0));
}

#[test]
fn registry_counts_each_toggle_once() {
    let mut r = DoubleDrivenRegistry::default();
    let key = PropertyBinding::blend_shape("R", "X");
    r.record(key.clone(), contributor("A", ParamKind::Float, 100.0, 0.0));
    r.record(key.clone(), contributor("A", ParamKind::Float, 100.0, 0.0));
    assert!(!r.is_arbitrated(&key));
    r.record(key.clone(), contributor("B", ParamKind::Bool, 100.0, 0.0));
    assert!(r.is_arbitrated(&key));
    assert_eq!(r.arbitrated().count(), 1);
    r.check_conflicts().unwrap();
}

#[test]
fn disagreeing_values_are_authoring_conflicts() {
    let mut r = DoubleDrivenRegistry::default();
    let key = PropertyBinding::blend_shape("R", "X");
    r.record(key.clone(), contributor("A", ParamKind::Float, 100.0, 0.0));
    r.record(key.clone(), contributor("B", ParamKind::Float, 50.0, 0.0));
    let err = r.check_conflicts().unwrap_err();
    match err {
        MenuGraphError::AuthoringConflict {
            property,
            first,
            second,
            detail,
        } => {
            assert_eq!(property, "R:blendShape.X");
            assert_eq!(first, "A");
            assert_eq!(second, "B");
            assert!(detail.starts_with("on"));
        }
        other => panic!("unexpected error {other}"),
    }

    let mut r = DoubleDrivenRegistry::default();
    r.record(key.clone(), contributor("A", ParamKind::Float, 100.0, 0.0));
    r.record(key, contributor("B", ParamKind::Float, 100.0, 10.0));
    assert!(r.check_conflicts().unwrap_err().is_conflict());
}

#[test]
fn arbitration_layer_is_and_off_or_on() {
    let cfg = GeneratorConfig::default();
    let key = PropertyBinding::blend_shape("R", "X");
    let cs = vec![
        contributor("A", ParamKind::Float, 100.0, 0.0),
        contributor("B", ParamKind::Bool, 100.0, 0.0),
        contributor("C", ParamKind::Bool, 100.0, 0.0),
    ];
    let layer = arbitration_layer(&cfg, &key, &cs);
    assert_eq!(layer.name, cfg.arbitration_layer_name("R:blendShape.X"));
    assert_eq!(layer.states[0].name, "Off");
    assert_eq!(layer.default_state, StateId(0));
    assert_eq!(layer.states[1].name, "On");

    let on = layer.state_id("On").unwrap();
    let off = layer.state_id("Off").unwrap();
    let to_off: Vec<_> = layer.transitions_from(on).collect();
    assert_eq!(to_off.len(), 1);
    assert_eq!(to_off[0].to, off);
    assert_eq!(to_off[0].guard.alternatives.len(), 1);
    assert_eq!(
        to_off[0].guard.alternatives[0].as_slice(),
        &[
            Condition::Less {
                param: "MGA-tok".to_string(),
                threshold: 0.5
            },
            Condition::IsFalse {
                param: "MGB-tok".to_string()
            },
            Condition::IsFalse {
                param: "MGC-tok".to_string()
            },
        ]
    );

    let to_on: Vec<_> = layer.transitions_from(off).collect();
    assert_eq!(to_on.len(), 1);
    assert_eq!(to_on[0].guard.alternatives.len(), 3);
    assert!(to_on[0].guard.alternatives.iter().all(|a| a.len() == 1));

    let Motion::Clip(on_clip) = &layer.states[1].motion else {
        panic!("expected clip");
    };
    assert_eq!(
        on_clip.curves[0].keys,
        CurveKeys::Constant(CurveValue::Scalar(100.0))
    );
}
