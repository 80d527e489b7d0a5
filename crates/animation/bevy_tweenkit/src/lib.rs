//! Bevy plugin for tweenkit.
//!
//! Each entity with a [`Tween`] gets its own core driver, ticked once per
//! frame against [`TweenClock`]. Driver events are re-sent as [`TweenEvent`]s;
//! drive requests from come-back tweens and finished sequences are written
//! into the entity's [`Drive`] component before values are applied to
//! `Transform` / [`Opacity`]. A [`SequenceTween`] plays while its `Drive` is set.

use bevy::prelude::*;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{Drive, Opacity, SequenceTween, Tween, TweenTarget};
pub use resources::{ClockSource, TweenClock};

use tweenkit_core::{DriverEvent, SequenceEvent};

/// A core driver event, tagged with the entity whose tween produced it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TweenEvent {
    pub entity: Entity,
    pub event: DriverEvent,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SequenceTweenEvent {
    pub entity: Entity,
    pub event: SequenceEvent,
}

/// Ordering handle for the plugin's systems (all in `Update`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TweenkitSet;

pub struct TweenkitPlugin;

impl Plugin for TweenkitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TweenClock>()
            .add_event::<TweenEvent>()
            .add_event::<SequenceTweenEvent>()
            .add_systems(
                Update,
                (
                    systems::advance_clock_system,
                    systems::tick_tweens_system,
                    systems::tick_sequences_system,
                    systems::apply_drive_requests_system,
                    systems::apply_tween_values_system,
                    systems::apply_sequence_values_system,
                )
                    .chain()
                    .in_set(TweenkitSet),
            );
    }
}
