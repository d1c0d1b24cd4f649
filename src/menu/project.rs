use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::{
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::model::CurveValue,
    menu::model::{ItemKind, MenuItem, RemoteControl, Submenu},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Long-lived authored state: the root of the menu tree.
pub struct MenuProject {
    pub name: String,
    /// Top-level items in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Parse a project from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MenuGraphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse menu project JSON: {e}")))
    }

    /// Parse a project from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_writer<W: std::io::Write>(&self, w: W) -> MenuGraphResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| MenuGraphError::serde(format!("serialize menu project: {e}")))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> MenuGraphResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| {
            MenuGraphError::validation(format!("create project JSON '{}': {e}", path.display()))
        })?;
        self.to_writer(BufWriter::new(f))
    }

    /// Validate the authored tree.
    ///
    /// Disabled subtrees are checked too: enabling an item must never turn a valid project into an
    /// invalid one.
    pub fn validate(&self, max_controls: usize) -> MenuGraphResult<()> {
        let mut tokens = HashSet::new();
        validate_items(&self.items, "<root>", max_controls, &mut tokens)
    }

    /// Enabled items in pre-order, skipping disabled subtrees.
    pub fn active_items(&self) -> Vec<&MenuItem> {
        let mut out = Vec::new();
        collect_active(&self.items, &mut out);
        out
    }

    pub fn find(&self, token: &str) -> Option<&MenuItem> {
        find_in(&self.items, token)
    }

    pub fn find_mut(&mut self, token: &str) -> Option<&mut MenuItem> {
        find_in_mut(&mut self.items, token)
    }

    /// Insert a remoting clone of the submenu `token` right after it.
    ///
    /// Returns the token of the clone. Fails without touching the project when the page holding
    /// the submenu has no room left under `max_controls`.
    pub fn add_remoting_clone(
        &mut self,
        token: &str,
        max_controls: usize,
    ) -> MenuGraphResult<String> {
        let Some(list) = parent_list_mut(&mut self.items, token) else {
            return Err(MenuGraphError::validation(format!(
                "no item with identity '{token}'"
            )));
        };
        let Some(pos) = list.iter().position(|i| i.token() == token) else {
            return Err(MenuGraphError::validation(format!(
                "no item with identity '{token}'"
            )));
        };
        if list.len() + 1 > max_controls {
            return Err(MenuGraphError::validation(format!(
                "no room for a remoting clone of '{}': page has {} items (max {max_controls})",
                list[pos].name,
                list.len()
            )));
        }
        let clone = remoting_clone(&list[pos])?;
        let clone_token = clone.token().to_string();
        list.insert(pos + 1, clone);
        Ok(clone_token)
    }
}

/// Copy of a submenu where every toggle becomes a remote control targeting the original.
///
/// Nested submenus are kept, every other item kind is dropped. All copied items get fresh
/// identities.
pub fn remoting_clone(item: &MenuItem) -> MenuGraphResult<MenuItem> {
    if item.as_submenu().is_none() {
        return Err(MenuGraphError::validation(format!(
            "'{}' is a {}, only submenus can be cloned for remoting",
            item.name,
            item.kind.label()
        )));
    }
    let mut clone = clone_node(item).ok_or_else(|| {
        MenuGraphError::validation(format!("'{}' produced an empty remoting clone", item.name))
    })?;
    clone.name = format!("{} (Remote)", item.name);
    Ok(clone)
}

fn clone_node(item: &MenuItem) -> Option<MenuItem> {
    let kind = match &item.kind {
        ItemKind::Submenu(sub) => ItemKind::Submenu(Submenu {
            items: sub.items.iter().filter_map(clone_node).collect(),
            exclude_from_menu: sub.exclude_from_menu,
        }),
        ItemKind::Toggle(_) => ItemKind::RemoteControl(RemoteControl {
            target: item.token().to_string(),
        }),
        _ => return None,
    };
    let mut out = MenuItem::new(item.name.clone(), kind);
    out.icon = item.icon.clone();
    out.enabled = item.enabled;
    Some(out)
}

fn validate_items(
    items: &[MenuItem],
    parent: &str,
    max_controls: usize,
    tokens: &mut HashSet<String>,
) -> MenuGraphResult<()> {
    if items.len() > max_controls {
        return Err(MenuGraphError::validation(format!(
            "submenu '{parent}' has {} items (max {max_controls})",
            items.len()
        )));
    }
    for item in items {
        if item.name.trim().is_empty() {
            return Err(MenuGraphError::validation(format!(
                "item '{}' has an empty name",
                item.token()
            )));
        }
        item.identity.validate()?;
        if !tokens.insert(item.token().to_string()) {
            return Err(MenuGraphError::identity(format!(
                "identity token '{}' is used by more than one item",
                item.token()
            )));
        }
        validate_kind(item, max_controls)?;
        if let ItemKind::Submenu(sub) = &item.kind {
            validate_items(&sub.items, &item.name, max_controls, tokens)?;
        }
    }
    Ok(())
}

fn validate_kind(item: &MenuItem, max_controls: usize) -> MenuGraphResult<()> {
    let bad = |what: &str| -> MenuGraphResult<()> {
        Err(MenuGraphError::validation(format!(
            "{} '{}': {what}",
            item.kind.label(),
            item.name
        )))
    };
    match &item.kind {
        ItemKind::Toggle(t) => {
            if !t.transition_duration_s.is_finite() || t.transition_duration_s < 0.0 {
                return bad("transition duration must be finite and >= 0");
            }
            let finite = t.contributions().iter().all(|c| {
                [c.on, c.off].iter().all(|v| match v {
                    CurveValue::Scalar(s) => s.is_finite(),
                    CurveValue::Color(rgba) => {
                        rgba.iter().all(|x| x.is_finite())
                    }
                })
            });
            if !finite {
                return bad("property values must be finite");
            }
        }
        ItemKind::Slider(s) => {
            if !s.default.is_finite() || !(0.0..=1.0).contains(&s.default) {
                return bad("default must be in [0, 1]");
            }
            let finite = s
                .blend_shapes
                .iter()
                .all(|r| r.low.is_finite() && r.high.is_finite())
                && s.material_params
                    .iter()
                    .all(|r| r.low.is_finite() && r.high.is_finite());
            if !finite {
                return bad("range bounds must be finite");
            }
        }
        ItemKind::Raw(r) => {
            if !r.value.is_finite() {
                return bad("value must be finite");
            }
        }
        ItemKind::RemoteTree(tree) => {
            if let Some(address) = &tree.address {
                address.validate(max_controls)?;
            }
        }
        ItemKind::Submenu(_) | ItemKind::RemoteControl(_) | ItemKind::Unresolved => {}
    }
    Ok(())
}

fn collect_active<'a>(items: &'a [MenuItem], out: &mut Vec<&'a MenuItem>) {
    for item in items.iter().filter(|i| i.enabled) {
        out.push(item);
        if let ItemKind::Submenu(sub) = &item.kind {
            collect_active(&sub.items, out);
        }
    }
}

fn find_in<'a>(items: &'a [MenuItem], token: &str) -> Option<&'a MenuItem> {
    for item in items {
        if item.token() == token {
            return Some(item);
        }
        if let ItemKind::Submenu(sub) = &item.kind
            && let Some(found) = find_in(&sub.items, token)
        {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(items: &'a mut [MenuItem], token: &str) -> Option<&'a mut MenuItem> {
    for item in items {
        if item.token() == token {
            return Some(item);
        }
        if let ItemKind::Submenu(sub) = &mut item.kind
            && let Some(found) = find_in_mut(&mut sub.items, token)
        {
            return Some(found);
        }
    }
    None
}

fn parent_list_mut<'a>(
    items: &'a mut Vec<MenuItem>,
    token: &str,
) -> Option<&'a mut Vec<MenuItem>> {
    if items.iter().any(|i| i.token() == token) {
        return Some(items);
    }
    for item in items.iter_mut() {
        if let ItemKind::Submenu(sub) = &mut item.kind
            && let Some(found) = parent_list_mut(&mut sub.items, token)
        {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/menu/project.rs"]
mod tests;
