use super::*;
use crate::menu::dsl::{
    SliderBuilder, ToggleBuilder, hidden_submenu, raw, remote_control, remote_tree, submenu,
    unresolved,
};
use crate::menu::model::RawEntry;
use crate::mirror::asset::{ControlLabel, MenuAsset};

#[test]
fn mirror_preserves_order_and_skips_absent_items() {
    let cfg = GeneratorConfig::default();
    let hat = ToggleBuilder::new("Hat").icon("hat.png").build();
    let size = SliderBuilder::new("Size").build();
    let mut disabled = ToggleBuilder::new("Off").build();
    disabled.enabled = false;
    let mut p = MenuProject::new("Avatar");
    p.items.push(hat.clone());
    p.items.push(unresolved("Pending"));
    p.items.push(disabled);
    p.items.push(hidden_submenu("Hidden", vec![ToggleBuilder::new("X").build()]));
    p.items.push(remote_tree("Friend", None));
    p.items.push(size.clone());

    let mut asset = MenuAsset::default();
    let written = rebuild_menu(&mut asset, &p, &cfg);
    assert_eq!(written, 2);
    let names: Vec<_> = asset.controls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Hat", "Size"]);
    assert!(asset.sub_menus.is_empty());

    let t = &asset.controls[0];
    assert_eq!(t.control_type, ControlType::Toggle);
    assert_eq!(t.icon.as_deref(), Some("hat.png"));
    assert_eq!(t.parameter, Some(format!("MG{}", hat.token())));
    let s = &asset.controls[1];
    assert_eq!(s.control_type, ControlType::RadialPuppet);
    assert_eq!(s.sub_parameters, vec![format!("MG{}", size.token())]);
}

#[test]
fn submenus_become_generated_sub_menus_and_old_ones_are_destroyed() {
    let cfg = GeneratorConfig::default();
    let mut p = MenuProject::new("Avatar");
    p.items.push(submenu(
        "Clothes",
        vec![submenu("Hats", vec![ToggleBuilder::new("Cap").build()])],
    ));

    let mut asset = MenuAsset::default();
    rebuild_menu(&mut asset, &p, &cfg);
    rebuild_menu(&mut asset, &p, &cfg);
    assert_eq!(asset.sub_menus.len(), 2);
    let cap = asset.control_at(&["Clothes", "Hats", "Cap"]).unwrap();
    assert_eq!(cap.control_type, ControlType::Toggle);
}

#[test]
fn raw_entries_pass_through() {
    let cfg = GeneratorConfig::default();
    let entry = RawEntry {
        control_type: ControlType::FourAxisPuppet,
        parameter: Some("Custom".to_string()),
        value: 0.5,
        sub_menu: Some("menus/extra".to_string()),
        sub_parameters: vec!["A".to_string(), "B".to_string()],
        labels: vec![ControlLabel {
            name: "Up".to_string(),
            icon: None,
        }],
    };
    let mut p = MenuProject::new("Avatar");
    p.items.push(raw("Puppet", entry));
    let mut asset = MenuAsset::default();
    rebuild_menu(&mut asset, &p, &cfg);
    let c = &asset.controls[0];
    assert_eq!(c.control_type, ControlType::FourAxisPuppet);
    assert_eq!(c.parameter.as_deref(), Some("Custom"));
    assert_eq!(c.value, 0.5);
    assert_eq!(
        c.sub_menu,
        Some(SubMenuRef::External("menus/extra".to_string()))
    );
    assert_eq!(c.labels.len(), 1);
}

#[test]
fn remote_items_become_trigger_buttons() {
    let cfg = GeneratorConfig::default();
    let address = RemotingAddress::folder(
        "Friend",
        vec![
            RemotingAddress::leaf("Hat", "Hat-1"),
            RemotingAddress::folder("Clothes", vec![RemotingAddress::leaf("Coat", "Coat-2")]),
        ],
    );
    let mut p = MenuProject::new("Avatar");
    p.items.push(remote_control("Their hat", "Hat-1"));
    p.items.push(remote_control("Nothing", ""));
    p.items.push(remote_tree("Friend", Some(address)));

    let mut asset = MenuAsset::default();
    rebuild_menu(&mut asset, &p, &cfg);
    assert_eq!(asset.controls.len(), 2);
    let b = &asset.controls[0];
    assert_eq!(b.control_type, ControlType::Button);
    assert_eq!(b.parameter.as_deref(), Some("MGRemoteTrigger-Hat-1"));

    let coat = asset.control_at(&["Friend", "Clothes", "Coat"]).unwrap();
    assert_eq!(coat.control_type, ControlType::Button);
    assert_eq!(coat.parameter.as_deref(), Some("MGRemoteTrigger-Coat-2"));
}
