use xxhash_rust::xxh3::Xxh3;

use crate::graph::backend::AnimatorGraph;
use crate::graph::model::{
    AnimatedProperty, Condition, CurveKeys, CurveValue, Layer, Motion, ParamKind, ParamValue,
    ProximityComponent, State,
};

const XXH3_SEED: u64 = 0x3c6e_f372_fe94_f82b;

/// Stable 128-bit fingerprint of a compiled graph.
///
/// Two runs over unchanged authored data produce the same fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GraphFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Compute the fingerprint of `graph`. Item order is significant.
pub fn fingerprint_graph(graph: &AnimatorGraph) -> GraphFingerprint {
    let mut h = StableHasher::new();
    write_graph(&mut h, graph);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    // Length-prefixed so that adjacent strings cannot alias.
    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> GraphFingerprint {
        let v = self.inner.digest128();
        GraphFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_graph(h: &mut StableHasher, graph: &AnimatorGraph) {
    h.write_u32(graph.parameters.len() as u32);
    for p in &graph.parameters {
        h.write_str(&p.name);
        write_kind(h, p.kind);
        write_value(h, p.default);
    }

    h.write_u32(graph.layers.len() as u32);
    for l in &graph.layers {
        write_layer(h, l);
    }

    h.write_u32(graph.components.len() as u32);
    for c in &graph.components {
        write_component(h, c);
    }
}

fn write_kind(h: &mut StableHasher, k: ParamKind) {
    h.write_u8(match k {
        ParamKind::Bool => 0,
        ParamKind::Int => 1,
        ParamKind::Float => 2,
    });
}

fn write_value(h: &mut StableHasher, v: ParamValue) {
    match v {
        ParamValue::Bool(b) => {
            h.write_u8(0);
            h.write_bool(b);
        }
        ParamValue::Int(i) => {
            h.write_u8(1);
            h.write_i32(i);
        }
        ParamValue::Float(f) => {
            h.write_u8(2);
            h.write_f32(f);
        }
    }
}

fn write_layer(h: &mut StableHasher, l: &Layer) {
    h.write_str(&l.name);
    h.write_u32(l.default_state.0);
    h.write_u32(l.states.len() as u32);
    for s in &l.states {
        write_state(h, s);
    }
    h.write_u32(l.transitions.len() as u32);
    for t in &l.transitions {
        h.write_u32(t.from.0);
        h.write_u32(t.to.0);
        h.write_f32(t.duration_s);
        h.write_u32(t.guard.alternatives.len() as u32);
        for alt in &t.guard.alternatives {
            h.write_u32(alt.len() as u32);
            for c in alt {
                write_condition(h, c);
            }
        }
    }
}

fn write_state(h: &mut StableHasher, s: &State) {
    h.write_str(&s.name);
    write_motion(h, &s.motion);
    match &s.motion_time {
        Some(p) => {
            h.write_u8(1);
            h.write_str(p);
        }
        None => h.write_u8(0),
    }
    h.write_u32(s.drives.len() as u32);
    for d in &s.drives {
        h.write_str(&d.param);
        write_value(h, d.value);
        h.write_bool(d.local_only);
    }
    h.write_u32(s.tracking.len() as u32);
    for t in &s.tracking {
        h.write_u8(t.element as u8);
        h.write_u8(t.mode as u8);
    }
    h.write_bool(s.write_defaults);
}

fn write_motion(h: &mut StableHasher, m: &Motion) {
    match m {
        Motion::Empty => h.write_u8(0),
        Motion::Clip(c) => {
            h.write_u8(1);
            h.write_str(&c.name);
            h.write_u32(c.curves.len() as u32);
            for curve in &c.curves {
                h.write_str(&curve.binding.object);
                match &curve.binding.property {
                    AnimatedProperty::Active => h.write_u8(0),
                    AnimatedProperty::BlendShape(s) => {
                        h.write_u8(1);
                        h.write_str(s);
                    }
                    AnimatedProperty::Material(p) => {
                        h.write_u8(2);
                        h.write_str(p);
                    }
                }
                match curve.keys {
                    CurveKeys::Constant(CurveValue::Scalar(v)) => {
                        h.write_u8(0);
                        h.write_f32(v);
                    }
                    CurveKeys::Constant(CurveValue::Color(rgba)) => {
                        h.write_u8(1);
                        for c in rgba {
                            h.write_f32(c);
                        }
                    }
                    CurveKeys::Linear { at_zero, at_one } => {
                        h.write_u8(2);
                        h.write_f32(at_zero);
                        h.write_f32(at_one);
                    }
                }
            }
        }
        Motion::Blend1D(b) => {
            h.write_u8(2);
            h.write_str(&b.name);
            h.write_str(&b.param);
            h.write_u32(b.children.len() as u32);
            for c in &b.children {
                h.write_f32(c.threshold);
                write_motion(h, &c.motion);
            }
        }
        Motion::Direct(d) => {
            h.write_u8(3);
            h.write_str(&d.name);
            h.write_u32(d.children.len() as u32);
            for c in &d.children {
                h.write_str(&c.weight_param);
                write_motion(h, &c.motion);
            }
        }
    }
}

fn write_condition(h: &mut StableHasher, c: &Condition) {
    match c {
        Condition::IsTrue { param } => {
            h.write_u8(0);
            h.write_str(param);
        }
        Condition::IsFalse { param } => {
            h.write_u8(1);
            h.write_str(param);
        }
        Condition::Greater { param, threshold } => {
            h.write_u8(2);
            h.write_str(param);
            h.write_f32(*threshold);
        }
        Condition::Less { param, threshold } => {
            h.write_u8(3);
            h.write_str(param);
            h.write_f32(*threshold);
        }
        Condition::Equals { param, value } => {
            h.write_u8(4);
            h.write_str(param);
            h.write_i32(*value);
        }
        Condition::NotEqual { param, value } => {
            h.write_u8(5);
            h.write_str(param);
            h.write_i32(*value);
        }
        Condition::IsLocal => h.write_u8(6),
    }
}

fn write_component(h: &mut StableHasher, c: &ProximityComponent) {
    match c {
        ProximityComponent::Sender {
            object,
            tag,
            radius,
            active_by_default,
        } => {
            h.write_u8(0);
            h.write_str(object);
            h.write_str(tag);
            h.write_f32(*radius);
            h.write_bool(*active_by_default);
        }
        ProximityComponent::Receiver {
            object,
            tag,
            parameter,
            radius,
            allow_self,
            allow_others,
            local_only,
            value,
        } => {
            h.write_u8(1);
            h.write_str(object);
            h.write_str(tag);
            h.write_str(parameter);
            h.write_f32(*radius);
            h.write_bool(*allow_self);
            h.write_bool(*allow_others);
            h.write_bool(*local_only);
            h.write_f32(*value);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/fingerprint.rs"]
mod tests;
