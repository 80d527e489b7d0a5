use bevy::prelude::*;
use tweenkit_core::{
    AnimationConfig, Driver, MoveDirection, PropertyKind, RotationAxis, Sequence, SequencePlayer,
    StoredTween, TickOutput,
};

/// Caller-owned drive flag. `true` runs the tween toward its end value,
/// `false` back toward its start value. Come-back tweens flip it themselves
/// through `TweenEvent`s mirrored by the plugin.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drive(pub bool);

/// Opacity written by alpha tweens; renderers read it however they like.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// What property on the entity a tween writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TweenTarget {
    Rotation(RotationAxis),
    /// Translation relative to where the entity stood on the first tick.
    Move(MoveDirection),
    /// Uniform scale.
    Expand,
    Alpha,
}

impl From<PropertyKind> for TweenTarget {
    fn from(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Rotation { axis } => TweenTarget::Rotation(axis),
            PropertyKind::Move { direction } => TweenTarget::Move(direction),
            PropertyKind::Expand => TweenTarget::Expand,
            PropertyKind::Alpha => TweenTarget::Alpha,
        }
    }
}

/// One tween instance. Removing the component (or despawning) drops the
/// driver, after which no further events are sent for it.
#[derive(Component, Debug)]
pub struct Tween {
    pub config: AnimationConfig,
    pub target: TweenTarget,
    driver: Driver,
    value: f32,
    pub(crate) origin: Option<Vec3>,
}

impl Tween {
    pub fn new(config: AnimationConfig, target: TweenTarget) -> Self {
        let driver = Driver::new(&config);
        let value = driver.value();
        Self {
            config,
            target,
            driver,
            value,
            origin: None,
        }
    }

    pub fn from_stored(stored: &StoredTween) -> Self {
        Self::new(stored.config.clone(), stored.property.into())
    }

    /// Last driven scalar, before the target's adapter is applied.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub(crate) fn tick(&mut self, drive: bool, now_ms: f64) -> TickOutput {
        let out = self.driver.tick(&self.config, drive, now_ms);
        self.value = out.value;
        out
    }
}

/// A sequence of rotation drives on the entity's X and Y axes.
#[derive(Component, Debug)]
pub struct SequenceTween {
    pub sequence: Sequence,
    player: SequencePlayer,
}

impl SequenceTween {
    pub fn new(sequence: Sequence) -> Self {
        let player = SequencePlayer::new(&sequence);
        Self { sequence, player }
    }

    pub fn player(&self) -> &SequencePlayer {
        &self.player
    }

    pub(crate) fn player_mut(&mut self) -> (&Sequence, &mut SequencePlayer) {
        (&self.sequence, &mut self.player)
    }
}
