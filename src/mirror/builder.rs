use crate::{
    foundation::config::GeneratorConfig,
    menu::model::{ItemKind, MenuItem},
    menu::project::MenuProject,
    mirror::asset::{ControlType, ExpressionMenu, MenuControl, MenuStore, SubMenuRef},
    remoting::address::RemotingAddress,
};

/// Rebuild the consumer-facing menu from the authored tree.
///
/// Every generated sub-menu is destroyed first. Disabled items, excluded submenus and items
/// without a menu entry are skipped; child order is preserved. Returns the number of controls
/// written.
pub fn rebuild_menu(
    store: &mut dyn MenuStore,
    project: &MenuProject,
    config: &GeneratorConfig,
) -> usize {
    store.destroy_sub_menus();
    let mut written = 0;
    let controls = page(store, &project.items, config, &mut written);
    store.set_root_controls(controls);
    written
}

fn page(
    store: &mut dyn MenuStore,
    items: &[MenuItem],
    config: &GeneratorConfig,
    written: &mut usize,
) -> Vec<MenuControl> {
    let controls: Vec<MenuControl> = items
        .iter()
        .filter(|i| i.enabled)
        .filter_map(|i| control_for(store, i, config, written))
        .collect();
    *written += controls.len();
    controls
}

fn control_for(
    store: &mut dyn MenuStore,
    item: &MenuItem,
    config: &GeneratorConfig,
    written: &mut usize,
) -> Option<MenuControl> {
    let icon = item.icon.clone();
    match &item.kind {
        ItemKind::Submenu(sub) => {
            if sub.exclude_from_menu {
                return None;
            }
            let controls = page(store, &sub.items, config, written);
            Some(sub_menu_control(store, &item.name, icon, controls))
        }
        ItemKind::Toggle(_) => {
            let mut c = MenuControl::new(item.name.clone(), icon, ControlType::Toggle)
                .with_parameter(config.parameter_name(item.token()));
            c.value = 1.0;
            Some(c)
        }
        ItemKind::Slider(_) => {
            let mut c = MenuControl::new(item.name.clone(), icon, ControlType::RadialPuppet);
            c.sub_parameters = vec![config.parameter_name(item.token())];
            Some(c)
        }
        ItemKind::Raw(raw) => Some(MenuControl {
            name: item.name.clone(),
            icon,
            control_type: raw.control_type,
            parameter: raw.parameter.clone(),
            value: raw.value,
            sub_menu: raw.sub_menu.clone().map(SubMenuRef::External),
            sub_parameters: raw.sub_parameters.clone(),
            labels: raw.labels.clone(),
        }),
        ItemKind::RemoteControl(rc) => {
            if rc.target.trim().is_empty() {
                return None;
            }
            Some(trigger_button(item.name.clone(), icon, &rc.target, config))
        }
        ItemKind::RemoteTree(tree) => {
            let address = tree.address.as_ref()?;
            Some(address_control(store, &item.name, icon, address, config, written))
        }
        ItemKind::Unresolved => None,
    }
}

fn sub_menu_control(
    store: &mut dyn MenuStore,
    name: &str,
    icon: Option<String>,
    controls: Vec<MenuControl>,
) -> MenuControl {
    let id = store.add_sub_menu(ExpressionMenu {
        name: name.to_string(),
        controls,
    });
    let mut c = MenuControl::new(name, icon, ControlType::SubMenu);
    c.sub_menu = Some(SubMenuRef::Generated(id));
    c
}

fn trigger_button(
    name: String,
    icon: Option<String>,
    target: &str,
    config: &GeneratorConfig,
) -> MenuControl {
    let mut c = MenuControl::new(name, icon, ControlType::Button)
        .with_parameter(config.parameter_name(&config.trigger_suffix(target)));
    c.value = 1.0;
    c
}

fn address_control(
    store: &mut dyn MenuStore,
    name: &str,
    icon: Option<String>,
    address: &RemotingAddress,
    config: &GeneratorConfig,
    written: &mut usize,
) -> MenuControl {
    if !address.is_folder {
        let target = address.parameter_identity.as_deref().unwrap_or_default();
        return trigger_button(name.to_string(), icon, target, config);
    }
    let controls: Vec<MenuControl> = address
        .children
        .iter()
        .map(|child| address_control(store, &child.name, None, child, config, written))
        .collect();
    *written += controls.len();
    sub_menu_control(store, name, icon, controls)
}

#[cfg(test)]
#[path = "../../tests/unit/mirror/builder.rs"]
mod tests;
