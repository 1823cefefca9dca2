use crate::{ensure_interval, error::Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Multiplying by `r` once per time step and flooring at `v_f`.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Geometric {
    /// **Errors** if `rate` is not in `[0,1]` or if `vf` is negative or greater than `vi`
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        ensure_interval!(rate, 0.0, 1.0);
        ensure_interval!(vf, 0.0, vi);
        Ok(Self { rate, vi, vf })
    }

    /// The floor this schedule never drops below
    pub fn floor(&self) -> f32 {
        self.vf
    }
}

impl Default for Geometric {
    /// Starts fully exploratory and shrinks by `0.9997` per episode down to `0.01`
    fn default() -> Self {
        Self {
            rate: 0.9997,
            vi: 1.0,
            vf: 0.01,
        }
    }
}

impl Decay for Geometric {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}
