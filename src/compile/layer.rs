use crate::{
    compile::context::CompilationContext,
    foundation::error::MenuGraphResult,
    graph::model::{
        Clip, Curve, CurveKeys, Layer, Motion, ParamHandle, ParamKind, PropertyBinding, State,
        TrackingElement, TrackingMode, Transition,
    },
    menu::model::{DriveTo, DriveWhen, MenuItem, Slider, Toggle},
};

pub const ENABLED: &str = "Enabled";
pub const DISABLED: &str = "Disabled";
pub const SLIDER_STATE: &str = "Updating";

/// On and off clips of a toggle.
///
/// Bindings the scene cannot resolve are dropped with a warning; bindings owned by an arbitration
/// layer are left out silently.
pub(crate) fn toggle_clips(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    toggle: &Toggle,
) -> (Clip, Clip) {
    let mut on = Clip::named(format!("{} On", item.token()));
    let mut off = Clip::named(format!("{} Off", item.token()));
    for c in toggle.contributions() {
        if !resolves(ctx, item, &c.binding) || ctx.double_driven.is_arbitrated(&c.binding) {
            continue;
        }
        on = on.set(c.binding.clone(), c.on);
        off = off.set(c.binding, c.off);
    }
    (on, off)
}

fn resolves(ctx: &mut CompilationContext<'_>, item: &MenuItem, binding: &PropertyBinding) -> bool {
    if ctx.scene().resolves(binding) {
        return true;
    }
    ctx.warn(format!(
        "{} '{}': cannot resolve {binding}, property skipped",
        item.kind.label(),
        item.name
    ));
    false
}

fn clip_motion(clip: Clip) -> Motion {
    if clip.is_empty() {
        Motion::Empty
    } else {
        Motion::Clip(clip)
    }
}

/// Blend path: register the toggle's two motions with the shared merger.
pub(crate) fn register_blend_toggle(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    toggle: &Toggle,
) -> MenuGraphResult<()> {
    let param = ctx.acquire_toggle(item, toggle)?;
    let (on, off) = toggle_clips(ctx, item, toggle);
    ctx.blend.register(clip_motion(on), clip_motion(off), param);
    Ok(())
}

/// Exclusive-state path: one two-state layer for the toggle.
pub(crate) fn toggle_layer(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    toggle: &Toggle,
) -> MenuGraphResult<Layer> {
    let param = ctx.acquire_toggle(item, toggle)?;
    let (on_clip, off_clip) = toggle_clips(ctx, item, toggle);
    let wd = ctx.config().write_defaults;

    let mut enabled = State::new(ENABLED)
        .with_motion(clip_motion(on_clip))
        .with_write_defaults(wd);
    let mut disabled = State::new(DISABLED)
        .with_motion(clip_motion(off_clip))
        .with_write_defaults(wd);
    if toggle.disable_mouth {
        enabled = enabled.tracking_sets(TrackingElement::Mouth, TrackingMode::Animation);
        disabled = disabled.tracking_sets(TrackingElement::Mouth, TrackingMode::Tracking);
    }
    for drive in &toggle.drives {
        let Some(target) = ctx.toggle_handle(drive.target).cloned() else {
            ctx.warn(format!(
                "toggle '{}': drive target {} is not an active toggle, drive skipped",
                item.name, drive.target
            ));
            continue;
        };
        let value = target.switch_value(drive.to == DriveTo::TurnOn);
        if matches!(drive.when, DriveWhen::Always | DriveWhen::OnActivate) {
            enabled = enabled.drives(&target, value);
        }
        if matches!(drive.when, DriveWhen::Always | DriveWhen::OnDeactivate) {
            disabled = disabled.drives(&target, value);
        }
    }

    let mut layer = Layer::new(ctx.config().item_layer_name(item.token()));
    // The state matching the default comes first and is the entry state.
    let (enabled_id, disabled_id) = if toggle.default {
        let e = layer.add_state(enabled);
        (e, layer.add_state(disabled))
    } else {
        let d = layer.add_state(disabled);
        (layer.add_state(enabled), d)
    };
    layer.add_transition(
        Transition::between(enabled_id, disabled_id)
            .with_duration(toggle.transition_duration_s)
            .when(param.is_inactive()),
    );
    layer.add_transition(
        Transition::between(disabled_id, enabled_id)
            .with_duration(toggle.transition_duration_s)
            .when(param.is_active()),
    );
    Ok(layer)
}

/// Continuous single-state layer whose motion time follows the slider parameter.
pub(crate) fn slider_layer(
    ctx: &mut CompilationContext<'_>,
    item: &MenuItem,
    slider: &Slider,
) -> MenuGraphResult<Layer> {
    let name = ctx.config().parameter_name(item.token());
    let param: ParamHandle = ctx.acquire(
        name,
        ParamKind::Float,
        slider.saved,
        slider.default,
    )?;

    let mut clip = Clip::named(format!("{} Range", item.token()));
    let ranges = slider
        .blend_shapes
        .iter()
        .map(|r| {
            (
                PropertyBinding::blend_shape(r.renderer.clone(), r.shape.clone()),
                r.low,
                r.high,
            )
        })
        .chain(slider.material_params.iter().map(|r| {
            (
                PropertyBinding::material(r.renderer.clone(), r.property.clone()),
                r.low,
                r.high,
            )
        }));
    for (binding, low, high) in ranges {
        if !resolves(ctx, item, &binding) {
            continue;
        }
        clip.curves.push(Curve {
            binding,
            keys: CurveKeys::Linear {
                at_zero: low,
                at_one: high,
            },
        });
    }

    let mut layer = Layer::new(ctx.config().item_layer_name(item.token()));
    layer.add_state(
        State::new(SLIDER_STATE)
            .with_motion(clip_motion(clip))
            .motion_time(&param)
            .with_write_defaults(ctx.config().write_defaults),
    );
    Ok(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/layer.rs"]
mod tests;
