//! Property adapters: the same driver routed into different rendered properties.
//!
//! Adapters only convert the driven scalar into a property value; the
//! lifecycle is identical for all of them.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::driver::{Driver, Phase};
use crate::outputs::{DriverEvent, TickOutput};

/// Converts the driven scalar into a property value.
pub trait PropertyAdapter {
    type Output: Copy + std::fmt::Debug + PartialEq;

    fn apply(&self, value: f32) -> Self::Output;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationAxis {
    X,
    Y,
    #[default]
    Z,
}

/// Rotation in degrees about one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation {
    pub axis: RotationAxis,
    pub degrees: f32,
}

impl Rotation {
    #[inline]
    pub fn radians(&self) -> f32 {
        self.degrees.to_radians()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RotationAdapter {
    pub axis: RotationAxis,
}

impl PropertyAdapter for RotationAdapter {
    type Output = Rotation;

    fn apply(&self, value: f32) -> Rotation {
        Rotation {
            axis: self.axis,
            degrees: value,
        }
    }
}

/// Which way content is pushed; the distance pads the opposite edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveDirection {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

/// Edge padding produced by a move. Exactly one edge is non-zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Padding {
    pub start: f32,
    pub end: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    /// Signed `(x, y)` displacement with y pointing up.
    pub fn offset(&self) -> (f32, f32) {
        (self.start - self.end, self.bottom - self.top)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveAdapter {
    pub direction: MoveDirection,
}

impl PropertyAdapter for MoveAdapter {
    type Output = Padding;

    fn apply(&self, value: f32) -> Padding {
        let mut padding = Padding::default();
        match self.direction {
            MoveDirection::Right => padding.start = value,
            MoveDirection::Left => padding.end = value,
            MoveDirection::Up => padding.bottom = value,
            MoveDirection::Down => padding.top = value,
        }
        padding
    }
}

/// Rendered size; never negative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Size(pub f32);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ExpandAdapter;

impl PropertyAdapter for ExpandAdapter {
    type Output = Size;

    fn apply(&self, value: f32) -> Size {
        Size(value.max(0.0))
    }
}

/// Unitless opacity in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Opacity(pub f32);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AlphaAdapter;

impl PropertyAdapter for AlphaAdapter {
    type Output = Opacity;

    fn apply(&self, value: f32) -> Opacity {
        Opacity(value.clamp(0.0, 1.0))
    }
}

/// Property value for one tick, plus the driver's events.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub output: T,
    pub phase: Phase,
    pub events: Vec<DriverEvent>,
}

/// A driver bound to one rendered property.
#[derive(Clone, Debug)]
pub struct Animated<P: PropertyAdapter> {
    driver: Driver,
    adapter: P,
}

impl<P: PropertyAdapter> Animated<P> {
    pub fn new(config: &AnimationConfig, adapter: P) -> Self {
        Self {
            driver: Driver::new(config),
            adapter,
        }
    }

    pub fn tick(&mut self, config: &AnimationConfig, drive: bool, now_ms: f64) -> Frame<P::Output> {
        let TickOutput {
            value,
            phase,
            events,
        } = self.driver.tick(config, drive, now_ms);
        Frame {
            output: self.adapter.apply(value),
            phase,
            events,
        }
    }

    /// Current property value.
    pub fn output(&self) -> P::Output {
        self.adapter.apply(self.driver.value())
    }

    /// Hand the current property value to a render callback.
    pub fn render<R>(&self, content: impl FnOnce(P::Output) -> R) -> R {
        content(self.output())
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn cancel(&mut self) -> bool {
        self.driver.cancel()
    }
}

impl Animated<RotationAdapter> {
    pub fn rotation(config: &AnimationConfig, axis: RotationAxis) -> Self {
        Self::new(config, RotationAdapter { axis })
    }
}

impl Animated<MoveAdapter> {
    pub fn movement(config: &AnimationConfig, direction: MoveDirection) -> Self {
        Self::new(config, MoveAdapter { direction })
    }
}

impl Animated<ExpandAdapter> {
    pub fn expand(config: &AnimationConfig) -> Self {
        Self::new(config, ExpandAdapter)
    }
}

impl Animated<AlphaAdapter> {
    pub fn alpha(config: &AnimationConfig) -> Self {
        Self::new(config, AlphaAdapter)
    }
}

/// Simultaneous X and Y rotation in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct XyRotation {
    pub x_degrees: f32,
    pub y_degrees: f32,
}

/// Two independent drivers, one per axis, composed after ticking.
#[derive(Clone, Debug)]
pub struct XyRotationDriver {
    x: Driver,
    y: Driver,
}

/// Events from both axes of an `XyRotationDriver` tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XyFrame {
    pub output: XyRotation,
    pub x_events: Vec<DriverEvent>,
    pub y_events: Vec<DriverEvent>,
}

impl XyRotationDriver {
    pub fn new(x_config: &AnimationConfig, y_config: &AnimationConfig) -> Self {
        Self {
            x: Driver::new(x_config),
            y: Driver::new(y_config),
        }
    }

    pub fn tick(
        &mut self,
        x: (&AnimationConfig, bool),
        y: (&AnimationConfig, bool),
        now_ms: f64,
    ) -> XyFrame {
        let x_out = self.x.tick(x.0, x.1, now_ms);
        let y_out = self.y.tick(y.0, y.1, now_ms);
        XyFrame {
            output: XyRotation {
                x_degrees: x_out.value,
                y_degrees: y_out.value,
            },
            x_events: x_out.events,
            y_events: y_out.events,
        }
    }

    pub fn output(&self) -> XyRotation {
        XyRotation {
            x_degrees: self.x.value(),
            y_degrees: self.y.value(),
        }
    }

    /// Cancels both axes; `true` if either was still live.
    pub fn cancel(&mut self) -> bool {
        let x = self.x.cancel();
        let y = self.y.cancel();
        x || y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_pads_the_edge_opposite_the_direction() {
        let right = MoveAdapter {
            direction: MoveDirection::Right,
        }
        .apply(16.0);
        assert_eq!(right.start, 16.0);
        assert_eq!(right.offset(), (16.0, 0.0));

        let down = MoveAdapter {
            direction: MoveDirection::Down,
        }
        .apply(8.0);
        assert_eq!(down.top, 8.0);
        assert_eq!(down.offset(), (0.0, -8.0));
    }

    #[test]
    fn alpha_and_size_are_clamped() {
        assert_eq!(AlphaAdapter.apply(1.5), Opacity(1.0));
        assert_eq!(AlphaAdapter.apply(-0.5), Opacity(0.0));
        assert_eq!(ExpandAdapter.apply(-3.0), Size(0.0));
    }

    #[test]
    fn rotation_reports_radians() {
        let r = RotationAdapter::default().apply(180.0);
        assert_eq!(r.axis, RotationAxis::Z);
        assert!((r.radians() - std::f32::consts::PI).abs() < 1e-6);
    }
}
