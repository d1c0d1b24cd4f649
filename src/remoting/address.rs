use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    foundation::error::{MenuGraphError, MenuGraphResult},
    menu::model::{ItemKind, MenuItem},
    menu::project::MenuProject,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Remotely-toggleable surface of an instance.
///
/// Exported by the owning side, imported wholesale into a remote-tree item on the controlling side.
pub struct RemotingAddress {
    pub name: String,
    pub is_folder: bool,
    /// Identity token of the target toggle (leaves only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RemotingAddress>,
}

impl RemotingAddress {
    pub fn folder(name: impl Into<String>, children: Vec<RemotingAddress>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            parameter_identity: None,
            children,
        }
    }

    pub fn leaf(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            parameter_identity: Some(identity.into()),
            children: Vec::new(),
        }
    }

    /// Parse and validate an address tree from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R, max_controls: usize) -> MenuGraphResult<Self> {
        let addr: Self = serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse remoting address JSON: {e}")))?;
        addr.validate(max_controls)?;
        Ok(addr)
    }

    /// Parse and validate an address tree from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>, max_controls: usize) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!("open address JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f), max_controls)
    }

    pub fn to_json_pretty(&self) -> MenuGraphResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MenuGraphError::serde(format!("serialize remoting address: {e}")))
    }

    /// Check folder fan-out and leaf targets.
    pub fn validate(&self, max_controls: usize) -> MenuGraphResult<()> {
        if self.is_folder {
            if self.children.len() > max_controls {
                return Err(MenuGraphError::validation(format!(
                    "remoting folder '{}' has {} entries (max {max_controls})",
                    self.name,
                    self.children.len()
                )));
            }
            for c in &self.children {
                c.validate(max_controls)?;
            }
            return Ok(());
        }
        if !self.children.is_empty() {
            return Err(MenuGraphError::validation(format!(
                "remoting leaf '{}' must not have children",
                self.name
            )));
        }
        match self.parameter_identity.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(()),
            _ => Err(MenuGraphError::validation(format!(
                "remoting leaf '{}' has no parameter identity",
                self.name
            ))),
        }
    }

    /// Leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&RemotingAddress> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a RemotingAddress, out: &mut Vec<&'a RemotingAddress>) {
    if !node.is_folder {
        out.push(node);
        return;
    }
    for c in &node.children {
        collect_leaves(c, out);
    }
}

/// Build the address tree of `project`'s remotely-toggleable toggles.
///
/// Returns `None` when nothing is remotable.
pub fn export_address(project: &MenuProject) -> Option<RemotingAddress> {
    let mut root = export_folder(&project.items, &project.name)?;
    // The root is always named after the project, even when it collapsed into a folder.
    root.name = project.name.clone();
    Some(root)
}

fn export_folder(items: &[MenuItem], name: &str) -> Option<RemotingAddress> {
    let mut children = Vec::new();
    for item in items.iter().filter(|i| i.enabled) {
        match &item.kind {
            ItemKind::Submenu(sub) => {
                if let Some(folder) = export_folder(&sub.items, &item.name) {
                    children.push(folder);
                }
            }
            ItemKind::Toggle(t) if t.allow_remote => {
                children.push(RemotingAddress::leaf(item.name.clone(), item.token()));
            }
            _ => {}
        }
    }
    // A folder that only wraps one folder collapses into it.
    if children.len() == 1 && children[0].is_folder {
        return children.pop();
    }
    if children.is_empty() {
        return None;
    }
    Some(RemotingAddress::folder(name, children))
}

#[cfg(test)]
#[path = "../../tests/unit/remoting/address.rs"]
mod tests;
