use super::*;

#[test]
fn accept_all_resolves_anything() {
    assert!(AcceptAll.resolves(&PropertyBinding::blend_shape("Nowhere", "X")));
}

#[test]
fn index_checks_object_and_property() {
    let mut scene = SceneIndex::default();
    scene.object("Body").blend_shapes.insert("Smile".to_string());
    scene
        .object("Body")
        .material_properties
        .insert("_Glow".to_string());

    assert!(scene.resolves(&PropertyBinding::active("Body")));
    assert!(scene.resolves(&PropertyBinding::blend_shape("Body", "Smile")));
    assert!(scene.resolves(&PropertyBinding::material("Body", "_Glow")));
    assert!(!scene.resolves(&PropertyBinding::blend_shape("Body", "Frown")));
    assert!(!scene.resolves(&PropertyBinding::active("Hat")));
}

#[test]
fn index_parses_json() {
    let json = r#"{ "objects": { "Hat": {}, "Body": { "blend_shapes": ["X"] } } }"#;
    let scene = SceneIndex::from_reader(json.as_bytes()).unwrap();
    assert!(scene.resolves(&PropertyBinding::active("Hat")));
    assert!(scene.resolves(&PropertyBinding::blend_shape("Body", "X")));
}
