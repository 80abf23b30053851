//! Easing curves
//!
//! Named after their GSAP counterparts: `power1` is quadratic, `power2`
//! cubic, `power3` quartic and `power4` quintic.

use serde::{Deserialize, Serialize};

/// Easing function applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Decelerating `powerN.out`
    PowerOut(u8),
    /// Symmetric `powerN.inOut`
    PowerInOut(u8),
    /// Overshooting `back.out(overshoot)`
    BackOut(f32),
    /// Springy `elastic.out(1, period)`
    ElasticOut(f32),
}

impl Default for Ease {
    /// GSAP's default, `power1.out`
    fn default() -> Self {
        Ease::PowerOut(1)
    }
}

impl Ease {
    /// Map progress `t` in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerOut(n) => {
                let exp = n as i32 + 1;
                1.0 - (1.0 - t).powi(exp)
            }
            Ease::PowerInOut(n) => {
                let exp = n as i32 + 1;
                if t < 0.5 {
                    (2.0 * t).powi(exp) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(exp) / 2.0
                }
            }
            Ease::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
            Ease::ElasticOut(period) => {
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                let period = period.max(0.01);
                let shift = period / 4.0;
                2.0_f32.powf(-10.0 * t) * ((t - shift) * std::f32::consts::TAU / period).sin()
                    + 1.0
            }
        }
    }
}
