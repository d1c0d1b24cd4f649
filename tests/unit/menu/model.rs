use super::*;
use crate::graph::model::AnimatedProperty;

#[test]
fn blend_eligibility_requires_all_three_conditions() {
    let mut t = Toggle::default();
    assert!(t.can_use_blend_tree());
    assert_eq!(t.parameter_kind(), ParamKind::Float);

    t.transition_duration_s = 0.3;
    assert!(!t.can_use_blend_tree());
    assert_eq!(t.parameter_kind(), ParamKind::Bool);

    t.transition_duration_s = 0.0;
    t.disable_mouth = true;
    assert!(!t.can_use_blend_tree());

    t.disable_mouth = false;
    t.drives.push(ToggleDrive {
        target: MenuItem::new("other", ItemKind::Unresolved).id(),
        when: DriveWhen::Always,
        to: DriveTo::TurnOff,
    });
    assert!(!t.can_use_blend_tree());
}

#[test]
fn contributions_cover_all_property_kinds() {
    let t = Toggle {
        objects: vec![ObjectToggle {
            object: "Hat".to_string(),
            invert: true,
        }],
        blend_shapes: vec![BlendShapeToggle {
            renderer: "Body".to_string(),
            shape: "X".to_string(),
            on: 100.0,
            off: 0.0,
        }],
        material_params: vec![MaterialParamToggle {
            renderer: "Body".to_string(),
            property: "_Tint".to_string(),
            value: MaterialValue::Color {
                on: [1.0, 0.0, 0.0, 1.0],
                off: [0.0, 0.0, 0.0, 1.0],
            },
        }],
        ..Toggle::default()
    };
    let c = t.contributions();
    assert_eq!(c.len(), 3);
    assert_eq!(c[0].binding.property, AnimatedProperty::Active);
    assert_eq!(c[0].on, CurveValue::Scalar(0.0));
    assert_eq!(c[0].off, CurveValue::Scalar(1.0));
    assert_eq!(c[1].binding, PropertyBinding::blend_shape("Body", "X"));
    assert_eq!(c[2].on, CurveValue::Color([1.0, 0.0, 0.0, 1.0]));
}

#[test]
fn json_defaults_fill_optional_fields() {
    let json = r#"{
        "name": "Hat",
        "identity": { "id": "6f0c5b8e-6b1f-4c57-9a43-6f54f1a0a1b2", "token": "Hat-abc" },
        "kind": { "toggle": { "objects": [ { "object": "Hat" } ] } }
    }"#;
    let item: MenuItem = serde_json::from_str(json).unwrap();
    assert!(item.enabled);
    assert_eq!(item.token(), "Hat-abc");
    let t = item.as_toggle().unwrap();
    assert!(t.saved);
    assert!(!t.default);
    assert!(t.can_use_blend_tree());
}

#[test]
fn unresolved_round_trips_as_plain_string() {
    let item = MenuItem::new("pending", ItemKind::Unresolved);
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["kind"], serde_json::json!("unresolved"));
    assert_eq!(item.kind.label(), "unresolved");
}
