//! menugraph compiles an authored tree of menu items into a layered animator graph.
//!
//! One generation run produces:
//!
//! - a set of state-machine layers and one shared blend layer in a [`GraphBackend`]
//! - a pruned [`ParameterTable`] holding every parameter the graph reads
//! - a mirrored consumer menu in a [`MenuStore`]
//!
//! Remoting extends the parameter space across instances: [`RemotingAddress`] trees exported by
//! one instance drive proximity senders on another, and every remote-enabled toggle gets an
//! edge-detecting receiver.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod compile;
pub(crate) mod graph;
pub(crate) mod menu;
pub(crate) mod mirror;
pub(crate) mod remoting;
pub(crate) mod scene;

pub use crate::foundation::config::GeneratorConfig;
pub use crate::foundation::error::{MenuGraphError, MenuGraphResult};
pub use crate::foundation::ident::{ItemId, NodeIdentity};

pub use crate::compile::blend::{BlendMerger, BlendMotion, Contributor, DoubleDrivenRegistry};
pub use crate::compile::context::CompilationContext;
pub use crate::compile::driver::{Generator, RunPhase, RunStats};
pub use crate::compile::hook::GeneratorHook;
pub use crate::compile::params::{
    DefineOutcome, ParameterEntry, ParameterSession, ParameterTable, SessionSummary,
};
pub use crate::compile::status::{RunStatus, StatusBoard};

pub use crate::graph::backend::{AnimatorGraph, GraphBackend};
pub use crate::graph::fingerprint::{GraphFingerprint, fingerprint_graph};
pub use crate::graph::model::{
    AnimatedProperty, Blend1D, BlendChild, Clip, Condition, Conjunction, Curve, CurveKeys,
    CurveValue, DirectBlend, DirectChild, Guard, Layer, Motion, ParamDrive, ParamHandle,
    ParamKind, ParamValue, ParameterDecl, PropertyBinding, ProximityComponent, State, StateId,
    TrackingElement, TrackingMode, TrackingOverride, Transition,
};

pub use crate::menu::dsl::{
    ProjectBuilder, SliderBuilder, ToggleBuilder, hidden_submenu, raw, remote_control,
    remote_tree, submenu, unresolved,
};
pub use crate::menu::model::{
    BlendShapeToggle, DriveTo, DriveWhen, ItemKind, MaterialParamToggle, MaterialRange,
    MaterialValue, MenuItem, ObjectToggle, PropertyContribution, RawEntry, RemoteControl,
    RemoteTree, ShapeRange, Slider, Submenu, Toggle, ToggleDrive,
};
pub use crate::menu::project::{MenuProject, remoting_clone};

pub use crate::mirror::asset::{
    ControlLabel, ControlType, ExpressionMenu, MenuAsset, MenuControl, MenuStore, SubMenuId,
    SubMenuRef,
};
pub use crate::mirror::builder::rebuild_menu;

pub use crate::remoting::address::{RemotingAddress, export_address};

pub use crate::scene::query::{AcceptAll, SceneIndex, SceneObject, SceneQuery};
