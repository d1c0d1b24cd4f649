#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Control kinds understood by the consumer-facing radial menu.
pub enum ControlType {
    Button,
    Toggle,
    SubMenu,
    TwoAxisPuppet,
    FourAxisPuppet,
    RadialPuppet,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Index of a generated sub-menu inside its [`MenuAsset`].
pub struct SubMenuId(pub u32);

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubMenuRef {
    /// Sub-menu generated in this run.
    Generated(SubMenuId),
    /// Externally managed menu asset (raw entries).
    External(String),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One control of a mirrored menu page.
pub struct MenuControl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub control_type: ControlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default)]
    pub value: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_menu: Option<SubMenuRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ControlLabel>,
}

impl MenuControl {
    pub fn new(name: impl Into<String>, icon: Option<String>, control_type: ControlType) -> Self {
        Self {
            name: name.into(),
            icon,
            control_type,
            parameter: None,
            value: 0.0,
            sub_menu: None,
            sub_parameters: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One page of the mirrored menu.
pub struct ExpressionMenu {
    pub name: String,
    pub controls: Vec<MenuControl>,
}

/// Persistence of the mirrored menu asset.
///
/// Generated sub-menus are sub-objects of the menu asset: a run destroys all of them and rebuilds
/// the tree from scratch.
pub trait MenuStore {
    /// Destroy every generated sub-menu.
    fn destroy_sub_menus(&mut self);

    /// Store a sub-menu and return its handle.
    fn add_sub_menu(&mut self, menu: ExpressionMenu) -> SubMenuId;

    /// Replace the top-level controls.
    fn set_root_controls(&mut self, controls: Vec<MenuControl>);
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// In-memory mirrored menu asset.
pub struct MenuAsset {
    pub controls: Vec<MenuControl>,
    #[serde(default)]
    pub sub_menus: Vec<ExpressionMenu>,
}

impl MenuAsset {
    pub fn sub_menu(&self, id: SubMenuId) -> Option<&ExpressionMenu> {
        self.sub_menus.get(id.0 as usize)
    }

    /// Follow control names from the root page, descending through generated sub-menus.
    pub fn control_at(&self, path: &[&str]) -> Option<&MenuControl> {
        let (last, parents) = path.split_last()?;
        let mut page = &self.controls;
        for name in parents {
            let ctrl = page.iter().find(|c| c.name == *name)?;
            match &ctrl.sub_menu {
                Some(SubMenuRef::Generated(id)) => page = &self.sub_menu(*id)?.controls,
                _ => return None,
            }
        }
        page.iter().find(|c| c.name == *last)
    }
}

impl MenuStore for MenuAsset {
    fn destroy_sub_menus(&mut self) {
        self.sub_menus.clear();
    }

    fn add_sub_menu(&mut self, menu: ExpressionMenu) -> SubMenuId {
        self.sub_menus.push(menu);
        SubMenuId((self.sub_menus.len() - 1) as u32)
    }

    fn set_root_controls(&mut self, controls: Vec<MenuControl>) {
        self.controls = controls;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mirror/asset.rs"]
mod tests;
