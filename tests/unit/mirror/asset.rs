use super::*;

fn button(name: &str) -> MenuControl {
    MenuControl::new(name, None, ControlType::Button)
}

#[test]
fn sub_menu_ids_are_sequential_and_cleared() {
    let mut asset = MenuAsset::default();
    let a = asset.add_sub_menu(ExpressionMenu::default());
    let b = asset.add_sub_menu(ExpressionMenu::default());
    assert_eq!((a, b), (SubMenuId(0), SubMenuId(1)));
    asset.destroy_sub_menus();
    assert!(asset.sub_menus.is_empty());
    assert!(asset.sub_menu(a).is_none());
}

#[test]
fn control_at_follows_generated_sub_menus() {
    let mut asset = MenuAsset::default();
    let inner = asset.add_sub_menu(ExpressionMenu {
        name: "Clothes".to_string(),
        controls: vec![button("Hat").with_parameter("MGhat")],
    });
    let mut folder = MenuControl::new("Clothes", None, ControlType::SubMenu);
    folder.sub_menu = Some(SubMenuRef::Generated(inner));
    let mut external = MenuControl::new("Extra", None, ControlType::SubMenu);
    external.sub_menu = Some(SubMenuRef::External("menus/extra".to_string()));
    asset.set_root_controls(vec![folder, external]);

    let hat = asset.control_at(&["Clothes", "Hat"]).unwrap();
    assert_eq!(hat.parameter.as_deref(), Some("MGhat"));
    assert!(asset.control_at(&["Extra", "Anything"]).is_none());
    assert!(asset.control_at(&[]).is_none());
}
