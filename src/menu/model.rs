use crate::{
    foundation::ident::{ItemId, NodeIdentity},
    graph::model::{CurveValue, ParamKind, PropertyBinding},
    mirror::asset::{ControlLabel, ControlType},
    remoting::address::RemotingAddress,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One authored menu item.
///
/// The item kinds form a closed set; the generator matches on [`ItemKind`] exhaustively.
pub struct MenuItem {
    /// Display name shown in the mirrored menu. Renaming never changes generated identities.
    pub name: String,
    /// Icon asset reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Identity assigned at creation.
    pub identity: NodeIdentity,
    /// Disabled items (and everything below them) are treated as absent.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Kind-specific payload.
    pub kind: ItemKind,
}

impl MenuItem {
    /// Create an item with a freshly minted identity.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        let name = name.into();
        Self {
            identity: NodeIdentity::new(&name),
            name,
            icon: None,
            enabled: true,
            kind,
        }
    }

    pub fn id(&self) -> ItemId {
        self.identity.id
    }

    pub fn token(&self) -> &str {
        self.identity.token()
    }

    pub fn as_toggle(&self) -> Option<&Toggle> {
        match &self.kind {
            ItemKind::Toggle(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_submenu(&self) -> Option<&Submenu> {
        match &self.kind {
            ItemKind::Submenu(s) => Some(s),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Kind-specific payload of a [`MenuItem`].
pub enum ItemKind {
    Submenu(Submenu),
    Toggle(Toggle),
    Slider(Slider),
    /// Passthrough consumer-menu control without a generated layer.
    Raw(RawEntry),
    /// Sender for one remote toggle.
    RemoteControl(RemoteControl),
    /// Senders for an imported address tree of another instance.
    RemoteTree(RemoteTree),
    /// Placeholder whose kind has not been chosen yet. Compiles to nothing.
    Unresolved,
}

impl ItemKind {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu(_) => "submenu",
            Self::Toggle(_) => "toggle",
            Self::Slider(_) => "slider",
            Self::Raw(_) => "raw",
            Self::RemoteControl(_) => "remote control",
            Self::RemoteTree(_) => "remote tree",
            Self::Unresolved => "unresolved",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Submenu {
    /// Children in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
    /// Hide from the mirrored menu; children still compile.
    #[serde(default)]
    pub exclude_from_menu: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Two-state item.
pub struct Toggle {
    #[serde(default)]
    pub default: bool,
    /// Persist the value across sessions.
    #[serde(default = "default_true")]
    pub saved: bool,
    #[serde(default)]
    pub objects: Vec<ObjectToggle>,
    #[serde(default)]
    pub blend_shapes: Vec<BlendShapeToggle>,
    #[serde(default)]
    pub material_params: Vec<MaterialParamToggle>,
    /// Take the mouth over from face tracking while enabled.
    #[serde(default)]
    pub disable_mouth: bool,
    #[serde(default)]
    pub transition_duration_s: f32,
    #[serde(default)]
    pub drives: Vec<ToggleDrive>,
    /// Expose the toggle to remote instances.
    #[serde(default)]
    pub allow_remote: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self {
            default: false,
            saved: true,
            objects: Vec::new(),
            blend_shapes: Vec::new(),
            material_params: Vec::new(),
            disable_mouth: false,
            transition_duration_s: 0.0,
            drives: Vec::new(),
            allow_remote: false,
        }
    }
}

impl Toggle {
    /// Eligible for the shared blend layer: no mouth override, no transition time and no drives.
    pub fn can_use_blend_tree(&self) -> bool {
        !self.disable_mouth && self.transition_duration_s == 0.0 && self.drives.is_empty()
    }

    /// Kind of the toggle's parameter. Blend-eligible toggles need a numeric blend weight.
    pub fn parameter_kind(&self) -> ParamKind {
        if self.can_use_blend_tree() {
            ParamKind::Float
        } else {
            ParamKind::Bool
        }
    }

    /// Every animated property with its on/off values, in authoring order.
    pub fn contributions(&self) -> Vec<PropertyContribution> {
        let mut out = Vec::with_capacity(
            self.objects.len() + self.blend_shapes.len() + self.material_params.len(),
        );
        for o in &self.objects {
            let (on, off) = if o.invert { (0.0, 1.0) } else { (1.0, 0.0) };
            out.push(PropertyContribution {
                binding: PropertyBinding::active(o.object.clone()),
                on: CurveValue::Scalar(on),
                off: CurveValue::Scalar(off),
            });
        }
        for b in &self.blend_shapes {
            out.push(PropertyContribution {
                binding: PropertyBinding::blend_shape(b.renderer.clone(), b.shape.clone()),
                on: CurveValue::Scalar(b.on),
                off: CurveValue::Scalar(b.off),
            });
        }
        for m in &self.material_params {
            let (on, off) = match m.value {
                MaterialValue::Float { on, off } => {
                    (CurveValue::Scalar(on), CurveValue::Scalar(off))
                }
                MaterialValue::Color { on, off } => (CurveValue::Color(on), CurveValue::Color(off)),
            };
            out.push(PropertyContribution {
                binding: PropertyBinding::material(m.renderer.clone(), m.property.clone()),
                on,
                off,
            });
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One `(target, property)` driven by a toggle.
pub struct PropertyContribution {
    pub binding: PropertyBinding,
    pub on: CurveValue,
    pub off: CurveValue,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectToggle {
    /// Scene path of the object.
    pub object: String,
    /// Hide the object while the toggle is on.
    #[serde(default)]
    pub invert: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendShapeToggle {
    pub renderer: String,
    pub shape: String,
    #[serde(default = "default_shape_on")]
    pub on: f32,
    #[serde(default)]
    pub off: f32,
}

fn default_shape_on() -> f32 {
    100.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialParamToggle {
    pub renderer: String,
    pub property: String,
    pub value: MaterialValue,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialValue {
    Float { on: f32, off: f32 },
    Color { on: [f32; 4], off: [f32; 4] },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Set another toggle when this one changes state.
pub struct ToggleDrive {
    pub target: ItemId,
    pub when: DriveWhen,
    pub to: DriveTo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveWhen {
    Always,
    OnActivate,
    OnDeactivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveTo {
    TurnOn,
    TurnOff,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Continuous item in `[0, 1]`.
pub struct Slider {
    #[serde(default = "default_slider")]
    pub default: f32,
    #[serde(default = "default_true")]
    pub saved: bool,
    #[serde(default)]
    pub blend_shapes: Vec<ShapeRange>,
    #[serde(default)]
    pub material_params: Vec<MaterialRange>,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            default: default_slider(),
            saved: true,
            blend_shapes: Vec::new(),
            material_params: Vec::new(),
        }
    }
}

fn default_slider() -> f32 {
    0.5
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Blend shape weight at slider 0 (`low`) and slider 1 (`high`).
pub struct ShapeRange {
    pub renderer: String,
    pub shape: String,
    #[serde(default)]
    pub low: f32,
    #[serde(default = "default_shape_on")]
    pub high: f32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Material scalar at slider 0 (`low`) and slider 1 (`high`).
pub struct MaterialRange {
    pub renderer: String,
    pub property: String,
    pub low: f32,
    pub high: f32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Fully specified consumer-menu control.
pub struct RawEntry {
    pub control_type: ControlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default)]
    pub value: f32,
    /// Reference to an externally managed sub-menu asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_menu: Option<String>,
    #[serde(default)]
    pub sub_parameters: Vec<String>,
    #[serde(default)]
    pub labels: Vec<ControlLabel>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteControl {
    /// Identity token of the targeted toggle.
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteTree {
    /// Imported address tree; `None` until one is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<RemotingAddress>,
}

#[cfg(test)]
#[path = "../../tests/unit/menu/model.rs"]
mod tests;
