//! Easing curves.
//!
//! Built-in curves are cubic-bezier timing functions with the usual material
//! control points. `Custom` wraps a caller closure; those are treated as
//! untrusted and may fail, which the driver absorbs per tick. A panicking
//! closure is reported as `EasingError::Failed` like any other failure.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EasingError};

type EasingFn = dyn Fn(f32) -> Result<f32, EasingError> + Send + Sync;

/// Caller-supplied easing closure.
#[derive(Clone)]
pub struct CustomEasing(Arc<EasingFn>);

impl CustomEasing {
    fn call(&self, t: f32) -> Result<f32, EasingError> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.0)(t))).unwrap_or_else(|payload| {
            Err(EasingError::Failed {
                t,
                message: panic_message(payload.as_ref()),
            })
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

impl fmt::Debug for CustomEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomEasing(..)")
    }
}

impl PartialEq for CustomEasing {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Maps normalized time progress in `[0,1]` to eased progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    FastOutSlowIn,
    LinearOutSlowIn,
    FastOutLinearIn,
    CubicBezier {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    #[serde(skip)]
    Custom(CustomEasing),
}

impl Easing {
    /// Wrap an infallible closure. Non-finite outputs still count as failures.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Easing::Custom(CustomEasing(Arc::new(move |t| Ok(f(t)))))
    }

    /// Wrap a closure that may reject some inputs.
    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: Fn(f32) -> Result<f32, EasingError> + Send + Sync + 'static,
    {
        Easing::Custom(CustomEasing(Arc::new(f)))
    }

    /// Control points `(x1, y1, x2, y2)` for the bezier-backed curves.
    pub fn control_points(&self) -> Option<[f32; 4]> {
        match self {
            Easing::Linear => Some([0.0, 0.0, 1.0, 1.0]),
            Easing::EaseIn => Some([0.42, 0.0, 1.0, 1.0]),
            Easing::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            Easing::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            Easing::FastOutSlowIn => Some([0.4, 0.0, 0.2, 1.0]),
            Easing::LinearOutSlowIn => Some([0.0, 0.0, 0.2, 1.0]),
            Easing::FastOutLinearIn => Some([0.4, 0.0, 1.0, 1.0]),
            Easing::CubicBezier { x1, y1, x2, y2 } => Some([*x1, *y1, *x2, *y2]),
            Easing::Custom(_) => None,
        }
    }

    /// Evaluate the curve at `t` (clamped into `[0,1]`).
    pub fn evaluate(&self, t: f32) -> Result<f32, EasingError> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let eased = match self {
            Easing::Linear => t,
            Easing::Custom(f) => f.call(t)?,
            other => match other.control_points() {
                Some([x1, y1, x2, y2]) => bezier_ease(t, x1, y1, x2, y2),
                None => t,
            },
        };
        if eased.is_finite() {
            Ok(eased)
        } else {
            Err(EasingError::NonFinite { t })
        }
    }

    /// Bezier x control points must stay in `[0,1]` so the time axis is monotonic.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Easing::CubicBezier { x1, y1, x2, y2 } = self {
            for v in [x1, y1, x2, y2] {
                if !v.is_finite() {
                    return Err(ConfigError::invalid(
                        "easing",
                        "cubic bezier control points must be finite",
                    ));
                }
            }
            if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                return Err(ConfigError::invalid(
                    "easing",
                    format!("cubic bezier x control points must be in [0, 1], got x1 = {x1}, x2 = {x2}"),
                ));
            }
        }
        Ok(())
    }
}

/// Cubic Bezier basis with p0 = 0 and p3 = 1.
#[inline]
fn cubic_bezier(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Invert the x curve by bisection, then read y.
fn bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    if x1 == y1 && x2 == y2 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..32 {
        let x = cubic_bezier(x1, x2, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(y1, y2, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILT_INS: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowIn,
        Easing::LinearOutSlowIn,
        Easing::FastOutLinearIn,
    ];

    #[test]
    fn built_in_curves_hit_endpoints_exactly() {
        for easing in BUILT_INS.iter() {
            assert_eq!(easing.evaluate(0.0).unwrap(), 0.0, "{easing:?}");
            assert_eq!(easing.evaluate(1.0).unwrap(), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn built_in_curves_are_monotonic() {
        for easing in BUILT_INS.iter() {
            let mut prev = 0.0;
            for i in 1..=50 {
                let v = easing.evaluate(i as f32 / 50.0).unwrap();
                assert!(v + 1e-4 >= prev, "{easing:?} not monotonic at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn linear_is_identity_and_clamps() {
        assert_eq!(Easing::Linear.evaluate(0.25).unwrap(), 0.25);
        assert_eq!(Easing::Linear.evaluate(-1.0).unwrap(), 0.0);
        assert_eq!(Easing::Linear.evaluate(3.0).unwrap(), 1.0);
    }

    #[test]
    fn fast_out_slow_in_leads_linear_at_midpoint() {
        let v = Easing::FastOutSlowIn.evaluate(0.5).unwrap();
        assert!(v > 0.5, "expected decelerating curve, got {v}");
    }

    #[test]
    fn custom_non_finite_output_is_an_error() {
        let easing = Easing::from_fn(|_| f32::NAN);
        assert_eq!(
            easing.evaluate(0.5),
            Err(EasingError::NonFinite { t: 0.5 })
        );
    }

    #[test]
    fn custom_failure_passes_through() {
        let easing = Easing::try_from_fn(|t| {
            Err(EasingError::Failed {
                t,
                message: "nope".into(),
            })
        });
        let err = easing.evaluate(0.3).unwrap_err();
        assert_eq!(err.progress(), 0.3);
    }

    #[test]
    fn custom_panic_becomes_a_failure() {
        let easing = Easing::from_fn(|t| {
            if t > 0.5 {
                panic!("curve exploded");
            }
            t
        });
        assert_eq!(easing.evaluate(0.25), Ok(0.25));
        match easing.evaluate(0.75) {
            Err(EasingError::Failed { t, message }) => {
                assert_eq!(t, 0.75);
                assert!(message.contains("curve exploded"), "{message}");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[test]
    fn bezier_x_out_of_range_is_rejected() {
        let easing = Easing::CubicBezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0,
        };
        assert!(easing.validate().is_err());
        // y may overshoot
        let overshoot = Easing::CubicBezier {
            x1: 0.3,
            y1: -0.5,
            x2: 0.7,
            y2: 1.5,
        };
        assert!(overshoot.validate().is_ok());
    }

    #[test]
    fn easing_json_names() {
        let e: Easing = serde_json::from_str("\"fastOutSlowIn\"").unwrap();
        assert_eq!(e, Easing::FastOutSlowIn);
        let b: Easing =
            serde_json::from_str(r#"{"cubicBezier":{"x1":0.1,"y1":0.2,"x2":0.3,"y2":0.4}}"#)
                .unwrap();
        assert_eq!(b.control_points(), Some([0.1, 0.2, 0.3, 0.4]));
    }
}
