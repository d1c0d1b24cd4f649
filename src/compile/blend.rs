use std::collections::BTreeMap;

use crate::{
    foundation::config::GeneratorConfig,
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::model::{
        Blend1D, BlendChild, Clip, CurveValue, DirectBlend, DirectChild, Layer, Motion,
        ParamHandle, ParamKind, ParamValue, ParameterDecl, PropertyBinding, State, Transition,
    },
};

/// Name of the single state of the shared blend layer.
pub const SHARED_STATE: &str = "BlendTree (WD On)";

#[derive(Clone, Debug, PartialEq)]
/// Two-point motion driven by one float parameter.
pub struct BlendMotion {
    pub on: Motion,
    pub off: Motion,
    pub param: ParamHandle,
}

#[derive(Clone, Debug, Default)]
/// Collects blend-eligible toggles and folds them into one shared layer.
pub struct BlendMerger {
    motions: Vec<BlendMotion>,
}

impl BlendMerger {
    pub fn register(&mut self, on: Motion, off: Motion, param: ParamHandle) {
        self.motions.push(BlendMotion { on, off, param });
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    pub fn motions(&self) -> &[BlendMotion] {
        &self.motions
    }

    /// Build the shared layer and its constant weight parameter.
    ///
    /// Returns `None` when nothing was registered: no placeholder layer is ever emitted.
    pub fn finalize(&self, config: &GeneratorConfig) -> Option<(Layer, ParameterDecl)> {
        if self.motions.is_empty() {
            return None;
        }
        let weight = config.blend_weight_parameter();
        let children = self
            .motions
            .iter()
            .map(|m| DirectChild {
                weight_param: weight.clone(),
                motion: Motion::Blend1D(Blend1D {
                    name: m.param.name.clone(),
                    param: m.param.name.clone(),
                    children: vec![
                        BlendChild {
                            threshold: 0.0,
                            motion: m.off.clone(),
                        },
                        BlendChild {
                            threshold: 1.0,
                            motion: m.on.clone(),
                        },
                    ],
                }),
            })
            .collect();

        let mut layer = Layer::new(config.shared_layer_name());
        layer.add_state(
            State::new(SHARED_STATE)
                .with_motion(Motion::Direct(DirectBlend {
                    name: config.system_name.clone(),
                    children,
                }))
                .with_write_defaults(true),
        );
        let decl = ParameterDecl {
            name: weight,
            kind: ParamKind::Float,
            default: ParamValue::Float(1.0),
        };
        Some((layer, decl))
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One toggle driving a property.
pub struct Contributor {
    /// Display name, for error messages.
    pub item: String,
    pub token: String,
    pub param: ParamHandle,
    pub on: CurveValue,
    pub off: CurveValue,
}

#[derive(Clone, Debug, Default)]
/// Which toggles drive which `(object, property)` pair.
pub struct DoubleDrivenRegistry {
    entries: BTreeMap<PropertyBinding, Vec<Contributor>>,
}

impl DoubleDrivenRegistry {
    /// Record a contribution. A toggle counts once per property; repeats keep the first values.
    pub fn record(&mut self, binding: PropertyBinding, contributor: Contributor) {
        let list = self.entries.entry(binding).or_default();
        if list.iter().all(|c| c.token != contributor.token) {
            list.push(contributor);
        }
    }

    /// `true` if two or more toggles drive `binding`.
    pub fn is_arbitrated(&self, binding: &PropertyBinding) -> bool {
        self.entries.get(binding).is_some_and(|l| l.len() >= 2)
    }

    /// Properties with two or more contributors, ordered by binding.
    pub fn arbitrated(&self) -> impl Iterator<Item = (&PropertyBinding, &[Contributor])> {
        self.entries
            .iter()
            .filter(|(_, l)| l.len() >= 2)
            .map(|(b, l)| (b, l.as_slice()))
    }

    /// Fail on the first property whose contributors disagree on the on or off value.
    pub fn check_conflicts(&self) -> MenuGraphResult<()> {
        for (binding, list) in self.arbitrated() {
            let first = &list[0];
            for other in &list[1..] {
                let detail = if !first.on.approx_eq(other.on) {
                    format!("on {} vs {}", first.on, other.on)
                } else if !first.off.approx_eq(other.off) {
                    format!("off {} vs {}", first.off, other.off)
                } else {
                    continue;
                };
                return Err(MenuGraphError::conflict(
                    binding.to_string(),
                    first.item.clone(),
                    other.item.clone(),
                    detail,
                ));
            }
        }
        Ok(())
    }
}

/// Two-state layer owning one shared property.
///
/// "On" while any contributor is on, "Off" once all of them are off.
pub fn arbitration_layer(
    config: &GeneratorConfig,
    binding: &PropertyBinding,
    contributors: &[Contributor],
) -> Layer {
    let key = binding.to_string();
    let (on, off) = contributors
        .first()
        .map(|c| (c.on, c.off))
        .unwrap_or((CurveValue::Scalar(1.0), CurveValue::Scalar(0.0)));

    let mut layer = Layer::new(config.arbitration_layer_name(&key));
    let off_id = layer.add_state(
        State::new("Off")
            .with_clip(Clip::named(format!("{key} Off")).set(binding.clone(), off))
            .with_write_defaults(config.write_defaults),
    );
    let on_id = layer.add_state(
        State::new("On")
            .with_clip(Clip::named(format!("{key} On")).set(binding.clone(), on))
            .with_write_defaults(config.write_defaults),
    );

    let mut to_off = Transition::between(on_id, off_id);
    for c in contributors {
        to_off = to_off.and(c.param.is_inactive());
    }
    let mut to_on = Transition::between(off_id, on_id);
    for c in contributors {
        to_on = to_on.or_when(c.param.is_active());
    }
    layer.add_transition(to_off);
    layer.add_transition(to_on);
    layer
}

#[cfg(test)]
#[path = "../../tests/unit/compile/blend.rs"]
mod tests;
