use bevy::prelude::*;
use log::debug;
use tweenkit_core::{
    AlphaAdapter, DriverEvent, ExpandAdapter, MoveAdapter, PropertyAdapter, RotationAdapter,
    RotationAxis, SequenceEvent, X_CHANNEL, Y_CHANNEL,
};

use crate::components::{Drive, Opacity, SequenceTween, Tween, TweenTarget};
use crate::resources::{ClockSource, TweenClock};
use crate::{SequenceTweenEvent, TweenEvent};

/// Accumulates Bevy's frame delta unless the clock is driven manually.
pub fn advance_clock_system(time: Res<Time>, mut clock: ResMut<TweenClock>) {
    if clock.source == ClockSource::Time {
        clock.now_ms += time.delta_seconds_f64() * 1000.0;
    }
}

/// Ticks every tween against the clock and re-broadcasts its events.
pub fn tick_tweens_system(
    clock: Res<TweenClock>,
    mut tweens: Query<(Entity, &mut Tween, Option<&Drive>)>,
    mut writer: EventWriter<TweenEvent>,
) {
    for (entity, mut tween, drive) in tweens.iter_mut() {
        let drive = drive.copied().unwrap_or_default();
        let out = tween.tick(drive.0, clock.now_ms);
        for event in out.events {
            writer.send(TweenEvent { entity, event });
        }
    }
}

/// Sequences play while their entity's `Drive` is set.
pub fn tick_sequences_system(
    clock: Res<TweenClock>,
    mut sequences: Query<(Entity, &mut SequenceTween, Option<&Drive>)>,
    mut writer: EventWriter<SequenceTweenEvent>,
) {
    for (entity, mut seq, drive) in sequences.iter_mut() {
        let drive = drive.copied().unwrap_or_default();
        let (sequence, player) = seq.player_mut();
        let out = player.tick(sequence, drive.0, clock.now_ms);
        for event in out.events {
            writer.send(SequenceTweenEvent { entity, event });
        }
    }
}

/// Writes requested flag flips into the entity's `Drive` component so the
/// next tick observes them.
pub fn apply_drive_requests_system(
    mut tween_events: EventReader<TweenEvent>,
    mut sequence_events: EventReader<SequenceTweenEvent>,
    mut drives: Query<&mut Drive>,
) {
    let tween_requests = tween_events
        .read()
        .filter_map(|TweenEvent { entity, event }| match event {
            DriverEvent::DriveRequested { drive, .. } => Some((*entity, *drive)),
            _ => None,
        });
    let sequence_requests =
        sequence_events
            .read()
            .filter_map(|SequenceTweenEvent { entity, event }| match event {
                SequenceEvent::DriveRequested { drive, .. } => Some((*entity, *drive)),
                _ => None,
            });
    for (entity, drive) in tween_requests.chain(sequence_requests) {
        match drives.get_mut(entity) {
            Ok(mut flag) => flag.0 = drive,
            Err(_) => debug!("{entity:?} requested drive={drive} but has no Drive component"),
        }
    }
}

fn axis_rotation(axis: RotationAxis, radians: f32) -> Quat {
    match axis {
        RotationAxis::X => Quat::from_rotation_x(radians),
        RotationAxis::Y => Quat::from_rotation_y(radians),
        RotationAxis::Z => Quat::from_rotation_z(radians),
    }
}

/// Routes each tween's value through its target adapter into components.
pub fn apply_tween_values_system(
    mut tweens: Query<(&mut Tween, Option<&mut Transform>, Option<&mut Opacity>)>,
) {
    for (mut tween, transform, opacity) in tweens.iter_mut() {
        let value = tween.value();
        let target = tween.target;
        match target {
            TweenTarget::Rotation(axis) => {
                if let Some(mut tf) = transform {
                    let rotation = RotationAdapter { axis }.apply(value);
                    tf.rotation = axis_rotation(rotation.axis, rotation.radians());
                }
            }
            TweenTarget::Move(direction) => {
                if let Some(mut tf) = transform {
                    let origin = *tween.origin.get_or_insert(tf.translation);
                    let (dx, dy) = MoveAdapter { direction }.apply(value).offset();
                    tf.translation = origin + Vec3::new(dx, dy, 0.0);
                }
            }
            TweenTarget::Expand => {
                if let Some(mut tf) = transform {
                    tf.scale = Vec3::splat(ExpandAdapter.apply(value).0);
                }
            }
            TweenTarget::Alpha => {
                if let Some(mut alpha) = opacity {
                    alpha.0 = AlphaAdapter.apply(value).0;
                }
            }
        }
    }
}

/// X channel rotates about X, Y channel about Y, composed X then Y.
pub fn apply_sequence_values_system(mut sequences: Query<(&SequenceTween, &mut Transform)>) {
    for (seq, mut tf) in sequences.iter_mut() {
        let player = seq.player();
        let x = player.value(X_CHANNEL).unwrap_or(0.0).to_radians();
        let y = player.value(Y_CHANNEL).unwrap_or(0.0).to_radians();
        tf.rotation = Quat::from_rotation_x(x) * Quat::from_rotation_y(y);
    }
}
