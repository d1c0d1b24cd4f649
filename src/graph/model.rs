use smallvec::{SmallVec, smallvec};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Value kind of a parameter.
pub enum ParamKind {
    Bool,
    Int,
    Float,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
/// A typed parameter value.
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    pub fn kind(self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Int(_) => ParamKind::Int,
            Self::Float(_) => ParamKind::Float,
        }
    }

    /// Numeric view used by the parameter table (`bool` maps to 0/1).
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Bool(b) => f32::from(u8::from(b)),
            Self::Int(i) => i as f32,
            Self::Float(f) => f,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Typed reference to a parameter, used to build guards and drives.
pub struct ParamHandle {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamHandle {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Condition that holds while the parameter reads as "on".
    pub fn is_active(&self) -> Condition {
        let param = self.name.clone();
        match self.kind {
            ParamKind::Bool => Condition::IsTrue { param },
            ParamKind::Float => Condition::Greater {
                param,
                threshold: 0.5,
            },
            ParamKind::Int => Condition::NotEqual { param, value: 0 },
        }
    }

    /// Condition that holds while the parameter reads as "off".
    pub fn is_inactive(&self) -> Condition {
        let param = self.name.clone();
        match self.kind {
            ParamKind::Bool => Condition::IsFalse { param },
            ParamKind::Float => Condition::Less {
                param,
                threshold: 0.5,
            },
            ParamKind::Int => Condition::Equals { param, value: 0 },
        }
    }

    /// Value that switches the parameter on or off, in its own kind.
    pub fn switch_value(&self, on: bool) -> ParamValue {
        match self.kind {
            ParamKind::Bool => ParamValue::Bool(on),
            ParamKind::Int => ParamValue::Int(i32::from(on)),
            ParamKind::Float => ParamValue::Float(if on { 1.0 } else { 0.0 }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// One test inside a transition guard.
pub enum Condition {
    IsTrue { param: String },
    IsFalse { param: String },
    Greater { param: String, threshold: f32 },
    Less { param: String, threshold: f32 },
    Equals { param: String, value: i32 },
    NotEqual { param: String, value: i32 },
    /// Holds only on the instance that owns (is authoritative for) the graph.
    IsLocal,
}

impl Condition {
    /// Referenced parameter, if any.
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::IsTrue { param }
            | Self::IsFalse { param }
            | Self::Greater { param, .. }
            | Self::Less { param, .. }
            | Self::Equals { param, .. }
            | Self::NotEqual { param, .. } => Some(param),
            Self::IsLocal => None,
        }
    }
}

/// Conditions that must all hold.
pub type Conjunction = SmallVec<[Condition; 4]>;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Disjunction of conjunctions: the guard passes when any alternative passes.
pub struct Guard {
    pub alternatives: Vec<Conjunction>,
}

impl Guard {
    /// A guard without alternatives never passes.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Index of a state within its [`Layer`].
pub struct StateId(pub u32);

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Guarded edge between two states of one layer.
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    /// Blend time in seconds; zero is an instantaneous cut.
    pub duration_s: f32,
    pub guard: Guard,
}

impl Transition {
    pub fn between(from: StateId, to: StateId) -> Self {
        Self {
            from,
            to,
            duration_s: 0.0,
            guard: Guard::default(),
        }
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_s = secs;
        self
    }

    /// Add a condition to the current alternative (opening the first one if needed).
    pub fn when(mut self, cond: Condition) -> Self {
        match self.guard.alternatives.last_mut() {
            Some(last) => last.push(cond),
            None => self.guard.alternatives.push(smallvec![cond]),
        }
        self
    }

    pub fn and(self, cond: Condition) -> Self {
        self.when(cond)
    }

    /// Open a new alternative starting with `cond`.
    pub fn or_when(mut self, cond: Condition) -> Self {
        self.guard.alternatives.push(smallvec![cond]);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
/// Animatable property of a scene object.
pub enum AnimatedProperty {
    /// Object visibility.
    Active,
    BlendShape(String),
    /// Material scalar or colour property.
    Material(String),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
/// `(target object, target property)` pair.
pub struct PropertyBinding {
    /// Scene path of the animated object.
    pub object: String,
    pub property: AnimatedProperty,
}

impl PropertyBinding {
    pub fn active(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            property: AnimatedProperty::Active,
        }
    }

    pub fn blend_shape(renderer: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            object: renderer.into(),
            property: AnimatedProperty::BlendShape(shape.into()),
        }
    }

    pub fn material(renderer: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            object: renderer.into(),
            property: AnimatedProperty::Material(property.into()),
        }
    }
}

impl std::fmt::Display for PropertyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property {
            AnimatedProperty::Active => write!(f, "{}:active", self.object),
            AnimatedProperty::BlendShape(s) => write!(f, "{}:blendShape.{s}", self.object),
            AnimatedProperty::Material(p) => write!(f, "{}:material.{p}", self.object),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveValue {
    Scalar(f32),
    /// Linear RGBA.
    Color([f32; 4]),
}

impl CurveValue {
    /// Equality with a small tolerance; authored values round-trip through editors.
    pub fn approx_eq(self, other: Self) -> bool {
        const EPS: f32 = 1e-4;
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => (a - b).abs() <= EPS,
            (Self::Color(a), Self::Color(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= EPS)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for CurveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Color([r, g, b, a]) => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKeys {
    /// Single-frame constant.
    Constant(CurveValue),
    /// Linear ramp over normalized time `[0, 1]`.
    Linear { at_zero: f32, at_one: f32 },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub binding: PropertyBinding,
    pub keys: CurveKeys,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Generated animation clip.
pub struct Clip {
    pub name: String,
    pub curves: Vec<Curve>,
}

impl Clip {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// Set a constant value for `binding`.
    pub fn set(mut self, binding: PropertyBinding, value: CurveValue) -> Self {
        self.curves.push(Curve {
            binding,
            keys: CurveKeys::Constant(value),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn animates(&self, binding: &PropertyBinding) -> bool {
        self.curves.iter().any(|c| &c.binding == binding)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What a state plays.
pub enum Motion {
    Empty,
    Clip(Clip),
    Blend1D(Blend1D),
    Direct(DirectBlend),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Simple 1D blend keyed by one float parameter.
pub struct Blend1D {
    pub name: String,
    pub param: String,
    pub children: Vec<BlendChild>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendChild {
    pub threshold: f32,
    pub motion: Motion,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Direct blend: every child is summed, each weighted by its own parameter.
pub struct DirectBlend {
    pub name: String,
    pub children: Vec<DirectChild>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DirectChild {
    pub weight_param: String,
    pub motion: Motion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingElement {
    Mouth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    Tracking,
    Animation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackingOverride {
    pub element: TrackingElement,
    pub mode: TrackingMode,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Parameter write performed when a state is entered.
pub struct ParamDrive {
    pub param: String,
    pub value: ParamValue,
    /// Only the authoritative instance performs the write.
    pub local_only: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub name: String,
    pub motion: Motion,
    /// Float parameter driving normalized motion time (continuous states).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drives: Vec<ParamDrive>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracking: Vec<TrackingOverride>,
    pub write_defaults: bool,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            motion: Motion::Empty,
            motion_time: None,
            drives: Vec::new(),
            tracking: Vec::new(),
            write_defaults: false,
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_clip(self, clip: Clip) -> Self {
        self.with_motion(Motion::Clip(clip))
    }

    pub fn with_write_defaults(mut self, on: bool) -> Self {
        self.write_defaults = on;
        self
    }

    pub fn motion_time(mut self, param: &ParamHandle) -> Self {
        self.motion_time = Some(param.name.clone());
        self
    }

    pub fn drives(mut self, param: &ParamHandle, value: ParamValue) -> Self {
        self.drives.push(ParamDrive {
            param: param.name.clone(),
            value,
            local_only: false,
        });
        self
    }

    pub fn drives_locally(mut self, param: &ParamHandle, value: ParamValue) -> Self {
        self.drives.push(ParamDrive {
            param: param.name.clone(),
            value,
            local_only: true,
        });
        self
    }

    pub fn tracking_sets(mut self, element: TrackingElement, mode: TrackingMode) -> Self {
        self.tracking.push(TrackingOverride { element, mode });
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One independent state machine of the compiled output.
pub struct Layer {
    pub name: String,
    pub states: Vec<State>,
    pub default_state: StateId,
    pub transitions: Vec<Transition>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            default_state: StateId(0),
            transitions: Vec::new(),
        }
    }

    /// Append a state. The first state added becomes the default state.
    pub fn add_state(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(state);
        id
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0 as usize)
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .map(|i| StateId(i as u32))
    }

    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == id)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Graph-level parameter declaration with its default ("override") value.
pub struct ParameterDecl {
    pub name: String,
    pub kind: ParamKind,
    pub default: ParamValue,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Proximity broadcast primitives placed under the remoting root.
pub enum ProximityComponent {
    /// Broadcasts `tag` while its object is active.
    Sender {
        object: String,
        tag: String,
        radius: f32,
        active_by_default: bool,
    },
    /// Writes `value` into `parameter` while any matching sender is in range.
    Receiver {
        object: String,
        tag: String,
        parameter: String,
        radius: f32,
        allow_self: bool,
        allow_others: bool,
        local_only: bool,
        value: f32,
    },
}

impl ProximityComponent {
    pub fn object(&self) -> &str {
        match self {
            Self::Sender { object, .. } | Self::Receiver { object, .. } => object,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Sender { tag, .. } | Self::Receiver { tag, .. } => tag,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
