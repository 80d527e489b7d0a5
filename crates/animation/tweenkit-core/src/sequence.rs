//! Sequences: several single-use drives played one after another across
//! value channels (e.g. spin Y, then spin X), optionally looping with a pause
//! between cycles.
//!
//! Each step runs on its own `Driver`; the next step is anchored at the exact
//! completion time of the previous one.
//!
//! Playback follows the caller's drive flag like a single tween: `true` starts
//! a run from the first step, `false` stops it where it stands. A finished
//! non-looping run requests `drive = false`, and a new run only starts once
//! the caller has acknowledged that request and raised the flag again.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, Variant};
use crate::driver::{Driver, Phase};
use crate::error::ConfigError;

/// Channel index for X rotation in the rotation presets.
pub const X_CHANNEL: usize = 0;
/// Channel index for Y rotation in the rotation presets.
pub const Y_CHANNEL: usize = 1;

const MAX_STEPS_PER_TICK: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceStep {
    pub channel: usize,
    pub config: AnimationConfig,
}

/// Validated, immutable sequence description.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    steps: Vec<SequenceStep>,
    channels: usize,
    looping: bool,
    inter_cycle_delay_ms: u32,
}

impl Sequence {
    pub fn new(
        steps: Vec<SequenceStep>,
        channels: usize,
        looping: bool,
        inter_cycle_delay_ms: i64,
    ) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::invalid("steps", "a sequence needs at least one step"));
        }
        if inter_cycle_delay_ms < 0 {
            return Err(ConfigError::invalid(
                "interCycleDelayMs",
                format!("must be non-negative, got {inter_cycle_delay_ms}"),
            ));
        }
        let inter_cycle_delay_ms = u32::try_from(inter_cycle_delay_ms).map_err(|_| {
            ConfigError::invalid("interCycleDelayMs", format!("must not exceed {} ms", u32::MAX))
        })?;
        for (i, step) in steps.iter().enumerate() {
            if step.channel >= channels {
                return Err(ConfigError::invalid(
                    "channel",
                    format!("step {i} targets channel {} of {channels}", step.channel),
                ));
            }
            if step.config.looping() {
                return Err(ConfigError::invalid(
                    "loop",
                    format!("step {i} loops; loop the sequence instead"),
                ));
            }
        }
        Ok(Self {
            steps,
            channels,
            looping,
            inter_cycle_delay_ms,
        })
    }

    /// Spin each axis 0 → 360 degrees in turn; Y first when `first_horizontal`.
    ///
    /// Timing (duration, delay, easing) comes from `base`; so do looping and
    /// the pause between cycles.
    pub fn axis_xy_spin(base: &AnimationConfig, first_horizontal: bool) -> Result<Self, ConfigError> {
        let mut spec = base.to_spec();
        spec.start_value = 0.0;
        spec.end_value = 360.0;
        spec.looping = false;
        spec.variant = Variant::Single;
        let spin = spec.validate()?;
        let order = if first_horizontal {
            [Y_CHANNEL, X_CHANNEL]
        } else {
            [X_CHANNEL, Y_CHANNEL]
        };
        let steps = order
            .into_iter()
            .map(|channel| SequenceStep {
                channel,
                config: spin.clone(),
            })
            .collect();
        Self::new(
            steps,
            2,
            base.looping(),
            i64::from(base.inter_cycle_delay_ms()),
        )
    }

    /// Half-turn rotations (first half then second half per axis).
    pub fn half_turns(turns: &HalfTurns) -> Result<Self, ConfigError> {
        let (primary, secondary) = if turns.first_horizontal {
            ((Y_CHANNEL, turns.horizontal), (X_CHANNEL, turns.vertical))
        } else {
            ((X_CHANNEL, turns.vertical), (Y_CHANNEL, turns.horizontal))
        };
        let axes: Vec<usize> = [primary, secondary]
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(channel, _)| channel)
            .collect();
        let halves = [&turns.first_half, &turns.second_half];

        let mut steps = Vec::with_capacity(axes.len() * 2);
        if turns.interleaved {
            for half in halves {
                for &channel in &axes {
                    steps.push(SequenceStep {
                        channel,
                        config: half.clone(),
                    });
                }
            }
        } else {
            for &channel in &axes {
                for half in halves {
                    steps.push(SequenceStep {
                        channel,
                        config: half.clone(),
                    });
                }
            }
        }
        Self::new(steps, 2, turns.looping, turns.inter_cycle_delay_ms)
    }

    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn inter_cycle_delay_ms(&self) -> u32 {
        self.inter_cycle_delay_ms
    }

    /// Start value of the first step on each channel (0 for unused channels).
    pub fn initial_values(&self) -> Vec<f32> {
        let mut values = vec![None; self.channels];
        for step in &self.steps {
            let slot = &mut values[step.channel];
            if slot.is_none() {
                *slot = Some(step.config.start_value());
            }
        }
        values.into_iter().map(|v| v.unwrap_or(0.0)).collect()
    }
}

/// Parameters for `Sequence::half_turns`.
#[derive(Clone, Debug)]
pub struct HalfTurns {
    /// Timing and values of the first half (typically 0 → 180).
    pub first_half: AnimationConfig,
    /// Timing and values of the second half (typically 180 → 360).
    pub second_half: AnimationConfig,
    pub horizontal: bool,
    pub vertical: bool,
    pub first_horizontal: bool,
    /// Alternate axes per half instead of finishing one axis first.
    pub interleaved: bool,
    pub looping: bool,
    pub inter_cycle_delay_ms: i64,
}

impl HalfTurns {
    /// Both axes, 1 s per half, linear, horizontal first, axis by axis.
    pub fn standard() -> Result<Self, ConfigError> {
        Ok(Self {
            first_half: AnimationConfig::builder(0.0, 180.0).build()?,
            second_half: AnimationConfig::builder(180.0, 360.0).build()?,
            horizontal: true,
            vertical: true,
            first_horizontal: true,
            interleaved: false,
            looping: false,
            inter_cycle_delay_ms: 0,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SequenceEvent {
    StepCompleted {
        step: usize,
        channel: usize,
        at_ms: f64,
    },
    CycleCompleted {
        cycle: u32,
        at_ms: f64,
    },
    /// The caller should set its drive flag to `drive`.
    DriveRequested { drive: bool, at_ms: f64 },
    /// A non-looping sequence played its last step.
    Finished { at_ms: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceOutput {
    pub values: Vec<f32>,
    pub events: Vec<SequenceEvent>,
}

/// Per-instance playback state for a `Sequence`.
#[derive(Clone, Debug)]
pub struct SequencePlayer {
    values: Vec<f32>,
    index: usize,
    driver: Option<Driver>,
    anchor_ms: Option<f64>,
    resume_at_ms: Option<f64>,
    cycles: u32,
    running: bool,
    pending_drive: Option<bool>,
    finished: bool,
    cancelled: bool,
    last_now_ms: Option<f64>,
}

impl SequencePlayer {
    pub fn new(sequence: &Sequence) -> Self {
        Self {
            values: sequence.initial_values(),
            index: 0,
            driver: None,
            anchor_ms: None,
            resume_at_ms: None,
            cycles: 0,
            running: false,
            pending_drive: None,
            finished: false,
            cancelled: false,
            last_now_ms: None,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn value(&self, channel: usize) -> Option<f32> {
        self.values.get(channel).copied()
    }

    pub fn current_step(&self) -> usize {
        self.index
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drive flag requested from the caller and not yet observed.
    #[inline]
    pub fn pending_drive(&self) -> Option<bool> {
        self.pending_drive
    }

    /// Stop playback for good. Returns `true` only on the first call.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        if let Some(driver) = self.driver.as_mut() {
            driver.cancel();
        }
        self.driver = None;
        self.resume_at_ms = None;
        self.pending_drive = None;
        self.running = false;
        self.cancelled = true;
        true
    }

    /// Advance to `now_ms` under the caller's drive flag.
    pub fn tick(&mut self, sequence: &Sequence, drive: bool, now_ms: f64) -> SequenceOutput {
        let mut events = Vec::new();
        if self.cancelled || !now_ms.is_finite() {
            return self.output(events);
        }
        let now = match self.last_now_ms {
            Some(prev) if now_ms < prev => prev,
            _ => now_ms,
        };
        self.last_now_ms = Some(now);

        if self.observe_drive(drive) {
            if drive {
                self.start_run(sequence, now);
            } else {
                self.stop_run(now);
            }
        }
        if !self.running {
            return self.output(events);
        }

        let mut completed_steps = 0;
        loop {
            if let Some(resume) = self.resume_at_ms {
                if now < resume {
                    break;
                }
                self.resume_at_ms = None;
                self.begin_step(sequence, 0, resume);
            }
            let Some(step) = sequence.steps.get(self.index) else {
                break;
            };
            let Some(driver) = self.driver.as_mut() else {
                break;
            };
            let out = match self.anchor_ms.take() {
                Some(at) => {
                    let first = driver.tick(&step.config, true, at);
                    if first.cycle_completed().is_some() {
                        first
                    } else {
                        driver.tick(&step.config, true, now)
                    }
                }
                None => driver.tick(&step.config, true, now),
            };
            if out.phase != Phase::Hold {
                self.values[step.channel] = out.value;
            }
            let Some(done_at) = out.cycle_completed() else {
                break;
            };

            events.push(SequenceEvent::StepCompleted {
                step: self.index,
                channel: step.channel,
                at_ms: done_at,
            });
            let next = self.index + 1;
            if next < sequence.steps.len() {
                self.begin_step(sequence, next, done_at);
            } else {
                self.cycles += 1;
                self.driver = None;
                events.push(SequenceEvent::CycleCompleted {
                    cycle: self.cycles,
                    at_ms: done_at,
                });
                if sequence.looping {
                    self.resume_at_ms = Some(done_at + f64::from(sequence.inter_cycle_delay_ms));
                } else {
                    self.finished = true;
                    self.running = false;
                    self.pending_drive = Some(false);
                    events.push(SequenceEvent::DriveRequested {
                        drive: false,
                        at_ms: done_at,
                    });
                    events.push(SequenceEvent::Finished { at_ms: done_at });
                    break;
                }
            }

            completed_steps += 1;
            if completed_steps >= MAX_STEPS_PER_TICK {
                debug!("sequence step cap reached at {now} ms");
                break;
            }
        }

        self.output(events)
    }

    /// Returns `true` when the caller's flag asks to start or stop a run.
    fn observe_drive(&mut self, drive: bool) -> bool {
        if let Some(requested) = self.pending_drive {
            if drive != requested {
                return false;
            }
            self.pending_drive = None;
        }
        drive != self.running
    }

    fn start_run(&mut self, sequence: &Sequence, now: f64) {
        debug!("sequence run starts at {now} ms");
        self.running = true;
        self.finished = false;
        self.resume_at_ms = None;
        self.values = sequence.initial_values();
        self.begin_step(sequence, 0, now);
    }

    fn stop_run(&mut self, now: f64) {
        debug!("sequence stopped at step {} ({now} ms)", self.index);
        self.running = false;
        self.driver = None;
        self.anchor_ms = None;
        self.resume_at_ms = None;
    }

    fn begin_step(&mut self, sequence: &Sequence, index: usize, at_ms: f64) {
        self.index = index;
        self.anchor_ms = Some(at_ms);
        self.driver = sequence
            .steps
            .get(index)
            .map(|step| Driver::new(&step.config));
    }

    fn output(&self, events: Vec<SequenceEvent>) -> SequenceOutput {
        SequenceOutput {
            values: self.values.clone(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(duration: i64) -> AnimationConfig {
        AnimationConfig::builder(0.0, 360.0)
            .total_duration_ms(duration)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(Sequence::new(vec![], 1, false, 0).is_err());
    }

    #[test]
    fn out_of_range_channel_is_rejected() {
        let step = SequenceStep {
            channel: 2,
            config: spin(100),
        };
        assert!(Sequence::new(vec![step], 2, false, 0).is_err());
    }

    #[test]
    fn looping_step_is_rejected() {
        let cfg = AnimationConfig::builder(0.0, 1.0)
            .looping(true)
            .build()
            .unwrap();
        let step = SequenceStep {
            channel: 0,
            config: cfg,
        };
        assert!(Sequence::new(vec![step], 1, true, 0).is_err());
    }

    #[test]
    fn axis_xy_spin_orders_horizontal_first() {
        let seq = Sequence::axis_xy_spin(&spin(1000), true).unwrap();
        let channels: Vec<usize> = seq.steps().iter().map(|s| s.channel).collect();
        assert_eq!(channels, vec![Y_CHANNEL, X_CHANNEL]);

        let seq = Sequence::axis_xy_spin(&spin(1000), false).unwrap();
        let channels: Vec<usize> = seq.steps().iter().map(|s| s.channel).collect();
        assert_eq!(channels, vec![X_CHANNEL, Y_CHANNEL]);
    }

    #[test]
    fn half_turns_interleave_axes() {
        let mut turns = HalfTurns::standard().unwrap();
        turns.interleaved = true;
        let seq = Sequence::half_turns(&turns).unwrap();
        let order: Vec<(usize, f32)> = seq
            .steps()
            .iter()
            .map(|s| (s.channel, s.config.start_value()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Y_CHANNEL, 0.0),
                (X_CHANNEL, 0.0),
                (Y_CHANNEL, 180.0),
                (X_CHANNEL, 180.0)
            ]
        );
    }

    #[test]
    fn half_turns_without_axes_is_rejected() {
        let mut turns = HalfTurns::standard().unwrap();
        turns.horizontal = false;
        turns.vertical = false;
        assert!(Sequence::half_turns(&turns).is_err());
    }
}
