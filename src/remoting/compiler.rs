//! Proximity-broadcast remoting.
//!
//! The medium only carries a boolean "in range" signal per tag. Senders broadcast a tag derived
//! from the target toggle's identity for as long as their trigger is held; receivers turn the
//! level into a single flip of the target parameter per contact.

use crate::{
    compile::context::CompilationContext,
    foundation::error::MenuGraphResult,
    graph::model::{
        Clip, Condition, CurveValue, Layer, ParamHandle, ParamKind, ParamValue, ParameterDecl,
        PropertyBinding, ProximityComponent, State, Transition,
    },
    menu::model::{MenuItem, RemoteControl, RemoteTree, Toggle},
};

pub const IDLE: &str = "Idle";
pub const ARMED: &str = "Armed";
pub const DETECT_LOCAL: &str = "DetectLocal";
pub const EMPTY: &str = "Empty";

const SENDER_RADIUS: f32 = 1_000_000.0;
const RECEIVER_RADIUS: f32 = 0.01;

/// Sender for a single remote toggle.
pub(crate) fn compile_remote_control(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    rc: &RemoteControl,
) -> MenuGraphResult<()> {
    if rc.target.trim().is_empty() {
        ctx.warn(format!("remote control '{}' has no target", item.name));
        return Ok(());
    }
    sender_for(ctx, &rc.target)?;
    Ok(())
}

/// Senders for every leaf of an imported address tree.
pub(crate) fn compile_remote_tree(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    tree: &RemoteTree,
) -> MenuGraphResult<()> {
    let Some(address) = &tree.address else {
        ctx.warn(format!(
            "remote tree '{}' has no imported address, nothing generated",
            item.name
        ));
        return Ok(());
    };
    for leaf in address.leaves() {
        if let Some(target) = leaf.parameter_identity.as_deref() {
            sender_for(ctx, target)?;
        }
    }
    Ok(())
}

/// Trigger parameter and (once per tag) the sender layer and component for `target`.
pub(crate) fn sender_for(
    ctx: &mut CompilationContext<'_>,
    target: &str,
) -> MenuGraphResult<ParamHandle> {
    let cfg = ctx.config();
    let trigger_name = cfg.parameter_name(&cfg.trigger_suffix(target));
    let tag = cfg.contact_tag(target);
    let object = cfg.sender_object(&tag);
    let layer_name = cfg.sender_layer_name(target);

    let trigger = ctx.acquire(trigger_name, ParamKind::Bool, false, 0.0)?;
    if !ctx.sender_tags.insert(tag.clone()) {
        return Ok(trigger);
    }

    let wd = ctx.config().write_defaults;
    let binding = PropertyBinding::active(object.clone());
    let mut layer = Layer::new(layer_name);
    let idle = layer.add_state(
        State::new(IDLE)
            .with_clip(
                Clip::named(format!("{tag} Idle")).set(binding.clone(), CurveValue::Scalar(0.0)),
            )
            .with_write_defaults(wd),
    );
    let armed = layer.add_state(
        State::new(ARMED)
            .with_clip(Clip::named(format!("{tag} Armed")).set(binding, CurveValue::Scalar(1.0)))
            .with_write_defaults(wd),
    );
    layer.add_transition(Transition::between(idle, armed).when(trigger.is_active()));
    layer.add_transition(Transition::between(armed, idle).when(trigger.is_inactive()));
    ctx.stage_layer(layer)?;
    ctx.add_component(ProximityComponent::Sender {
        object,
        tag,
        radius: SENDER_RADIUS,
        active_by_default: false,
    });
    Ok(trigger)
}

/// Edge-detecting receiver layer for every remotely toggleable toggle.
///
/// `DetectLocal` is left only on the authoritative instance. From `Empty`, a rising receiver
/// signal flips the target once; the layer then waits in a `Received*` state until the signal
/// drops, so a held contact never flips twice.
pub(crate) fn compile_receivers(
    ctx: &mut CompilationContext<'_>,
    toggles: &[(&MenuItem, &Toggle)],
) -> MenuGraphResult<()> {
    let remote: Vec<_> = toggles.iter().filter(|(_, t)| t.allow_remote).collect();
    if remote.is_empty() {
        return Ok(());
    }
    let wd = ctx.config().write_defaults;
    let mut layer = Layer::new(ctx.config().receiver_layer_name());
    let detect = layer.add_state(State::new(DETECT_LOCAL).with_write_defaults(wd));
    let empty = layer.add_state(State::new(EMPTY).with_write_defaults(wd));
    layer.add_transition(Transition::between(detect, empty).when(Condition::IsLocal));

    for (item, toggle) in remote {
        let cfg = ctx.config();
        let token = item.token();
        let rcv_name = cfg.receiver_parameter(token);
        let tag = cfg.contact_tag(token);
        let root = cfg.remoting_root.clone();
        let target = ParamHandle::new(cfg.parameter_name(token), toggle.parameter_kind());
        let rcv = ParamHandle::new(rcv_name.clone(), ParamKind::Float);

        let while_off = layer.add_state(
            State::new(format!("ReceivedWhileOff-{token}"))
                .drives_locally(&target, target.switch_value(true))
                .with_write_defaults(wd),
        );
        let while_on = layer.add_state(
            State::new(format!("ReceivedWhileOn-{token}"))
                .drives_locally(&target, target.switch_value(false))
                .with_write_defaults(wd),
        );
        layer.add_transition(
            Transition::between(empty, while_off)
                .when(rcv.is_active())
                .and(target.is_inactive()),
        );
        layer.add_transition(
            Transition::between(empty, while_on)
                .when(rcv.is_active())
                .and(target.is_active()),
        );
        layer.add_transition(Transition::between(while_off, empty).when(rcv.is_inactive()));
        layer.add_transition(Transition::between(while_on, empty).when(rcv.is_inactive()));

        ctx.declare(ParameterDecl {
            name: rcv_name.clone(),
            kind: ParamKind::Float,
            default: ParamValue::Float(0.0),
        })?;
        ctx.add_component(ProximityComponent::Receiver {
            object: root,
            tag,
            parameter: rcv_name,
            radius: RECEIVER_RADIUS,
            allow_self: true,
            allow_others: true,
            local_only: true,
            value: 1.0,
        });
        ctx.remote_receivers += 1;
    }
    ctx.stage_layer(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/remoting/compiler.rs"]
mod tests;
