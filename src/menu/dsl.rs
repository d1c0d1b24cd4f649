use crate::{
    foundation::error::MenuGraphResult,
    foundation::ident::ItemId,
    menu::model::{
        BlendShapeToggle, DriveTo, DriveWhen, ItemKind, MaterialParamToggle, MaterialRange,
        MaterialValue, MenuItem, ObjectToggle, RawEntry, RemoteControl, RemoteTree, ShapeRange,
        Slider, Submenu, Toggle, ToggleDrive,
    },
    menu::project::MenuProject,
    remoting::address::RemotingAddress,
};

/// Builder for [`MenuProject`](crate::MenuProject).
pub struct ProjectBuilder {
    name: String,
    items: Vec<MenuItem>,
}

impl ProjectBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Append a top-level item.
    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    /// Build and validate the project against a fan-out cap.
    pub fn build(self, max_controls: usize) -> MenuGraphResult<MenuProject> {
        let project = MenuProject {
            name: self.name,
            items: self.items,
        };
        project.validate(max_controls)?;
        Ok(project)
    }
}

/// Builder for toggle items.
pub struct ToggleBuilder {
    name: String,
    icon: Option<String>,
    toggle: Toggle,
}

impl ToggleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            toggle: Toggle::default(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn default_on(mut self, on: bool) -> Self {
        self.toggle.default = on;
        self
    }

    pub fn saved(mut self, saved: bool) -> Self {
        self.toggle.saved = saved;
        self
    }

    /// Show `object` while the toggle is on.
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.toggle.objects.push(ObjectToggle {
            object: object.into(),
            invert: false,
        });
        self
    }

    /// Hide `object` while the toggle is on.
    pub fn object_inverted(mut self, object: impl Into<String>) -> Self {
        self.toggle.objects.push(ObjectToggle {
            object: object.into(),
            invert: true,
        });
        self
    }

    pub fn blend_shape(
        mut self,
        renderer: impl Into<String>,
        shape: impl Into<String>,
        on: f32,
        off: f32,
    ) -> Self {
        self.toggle.blend_shapes.push(BlendShapeToggle {
            renderer: renderer.into(),
            shape: shape.into(),
            on,
            off,
        });
        self
    }

    pub fn material_float(
        mut self,
        renderer: impl Into<String>,
        property: impl Into<String>,
        on: f32,
        off: f32,
    ) -> Self {
        self.toggle.material_params.push(MaterialParamToggle {
            renderer: renderer.into(),
            property: property.into(),
            value: MaterialValue::Float { on, off },
        });
        self
    }

    pub fn material_color(
        mut self,
        renderer: impl Into<String>,
        property: impl Into<String>,
        on: [f32; 4],
        off: [f32; 4],
    ) -> Self {
        self.toggle.material_params.push(MaterialParamToggle {
            renderer: renderer.into(),
            property: property.into(),
            value: MaterialValue::Color { on, off },
        });
        self
    }

    pub fn disable_mouth(mut self) -> Self {
        self.toggle.disable_mouth = true;
        self
    }

    pub fn transition(mut self, secs: f32) -> Self {
        self.toggle.transition_duration_s = secs;
        self
    }

    pub fn drive(mut self, target: ItemId, when: DriveWhen, to: DriveTo) -> Self {
        self.toggle.drives.push(ToggleDrive { target, when, to });
        self
    }

    pub fn allow_remote(mut self) -> Self {
        self.toggle.allow_remote = true;
        self
    }

    pub fn build(self) -> MenuItem {
        with_icon(MenuItem::new(self.name, ItemKind::Toggle(self.toggle)), self.icon)
    }
}

/// Builder for slider items.
pub struct SliderBuilder {
    name: String,
    icon: Option<String>,
    slider: Slider,
}

impl SliderBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            slider: Slider::default(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn default_value(mut self, v: f32) -> Self {
        self.slider.default = v;
        self
    }

    pub fn saved(mut self, saved: bool) -> Self {
        self.slider.saved = saved;
        self
    }

    pub fn blend_shape(
        mut self,
        renderer: impl Into<String>,
        shape: impl Into<String>,
        low: f32,
        high: f32,
    ) -> Self {
        self.slider.blend_shapes.push(ShapeRange {
            renderer: renderer.into(),
            shape: shape.into(),
            low,
            high,
        });
        self
    }

    pub fn material(
        mut self,
        renderer: impl Into<String>,
        property: impl Into<String>,
        low: f32,
        high: f32,
    ) -> Self {
        self.slider.material_params.push(MaterialRange {
            renderer: renderer.into(),
            property: property.into(),
            low,
            high,
        });
        self
    }

    pub fn build(self) -> MenuItem {
        with_icon(MenuItem::new(self.name, ItemKind::Slider(self.slider)), self.icon)
    }
}

fn with_icon(mut item: MenuItem, icon: Option<String>) -> MenuItem {
    item.icon = icon;
    item
}

/// Submenu holding `items` in display order.
pub fn submenu(name: impl Into<String>, items: Vec<MenuItem>) -> MenuItem {
    MenuItem::new(
        name,
        ItemKind::Submenu(Submenu {
            items,
            exclude_from_menu: false,
        }),
    )
}

/// Submenu that compiles its children but is absent from the mirrored menu.
pub fn hidden_submenu(name: impl Into<String>, items: Vec<MenuItem>) -> MenuItem {
    MenuItem::new(
        name,
        ItemKind::Submenu(Submenu {
            items,
            exclude_from_menu: true,
        }),
    )
}

pub fn raw(name: impl Into<String>, entry: RawEntry) -> MenuItem {
    MenuItem::new(name, ItemKind::Raw(entry))
}

/// Remote control targeting the toggle with identity token `target`.
pub fn remote_control(name: impl Into<String>, target: impl Into<String>) -> MenuItem {
    MenuItem::new(
        name,
        ItemKind::RemoteControl(RemoteControl {
            target: target.into(),
        }),
    )
}

pub fn remote_tree(name: impl Into<String>, address: Option<RemotingAddress>) -> MenuItem {
    MenuItem::new(name, ItemKind::RemoteTree(RemoteTree { address }))
}

/// Item whose kind has not been chosen yet.
pub fn unresolved(name: impl Into<String>) -> MenuItem {
    MenuItem::new(name, ItemKind::Unresolved)
}

#[cfg(test)]
#[path = "../../tests/unit/menu/dsl.rs"]
mod tests;
