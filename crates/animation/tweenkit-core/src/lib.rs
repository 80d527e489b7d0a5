//! tweenkit core (engine-agnostic)
//!
//! Declarative tween lifecycles for UI properties: a validated configuration,
//! a per-instance driver state machine ticked by the host clock, property
//! adapters that route the driven value into rotation, movement, size or
//! opacity, and sequences that chain several drives across channels.
//!
//! Hosts own the clock and the drive flag; the driver reports requested flag
//! flips and completions as events returned from each tick.

pub mod adapters;
pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod outputs;
pub mod sequence;
pub mod stored_tween;

// Re-exports for consumers (adapters)
pub use adapters::{
    AlphaAdapter, Animated, ExpandAdapter, Frame, MoveAdapter, MoveDirection, Opacity, Padding,
    PropertyAdapter, Rotation, RotationAdapter, RotationAxis, Size, XyFrame, XyRotation,
    XyRotationDriver,
};
pub use config::{AnimationConfig, AnimationConfigBuilder, AnimationSpec, Preset, Variant};
pub use driver::{lerp, Driver, LegKind, Phase};
pub use easing::Easing;
pub use error::{ConfigError, EasingError};
pub use outputs::{DriverEvent, TickOutput};
pub use sequence::{
    HalfTurns, Sequence, SequenceEvent, SequenceOutput, SequencePlayer, SequenceStep, X_CHANNEL,
    Y_CHANNEL,
};
pub use stored_tween::{parse_stored_tween_json, PropertyKind, StoredTween};
