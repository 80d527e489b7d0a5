//! Lifecycle driver: the per-instance state machine behind every tween.
//!
//! The driver is ticked by the host with the current configuration, the
//! caller-owned drive flag and a monotonic timestamp in milliseconds. Each tick
//! recomputes the value from the active leg; nothing is precomputed. Phase
//! boundaries crossed between two ticks are replayed at their exact boundary
//! times so looping cycles do not drift with frame timing.
//!
//! Instead of calling back into the caller, the driver reports
//! `DriverEvent::DriveRequested` when it wants the drive flag flipped and
//! `DriverEvent::CycleCompleted` when a non-looping animation is done. A
//! requested flip stays pending until the caller's flag matches it, so a flag
//! that has not caught up yet is not read as an interrupt.
//!
//! Configurations may be rebuilt every frame. A settled driver follows the
//! endpoint it is resting on: before the first drive it snaps to the current
//! start value, afterwards it glides to the new endpoint with a settle leg
//! that completes no cycle. A come-back returned before its forward leg moved
//! (e.g. flipped back during the initial delay) completes no cycle either.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, Variant};
use crate::outputs::{DriverEvent, TickOutput};

/// Bound on boundary replays per tick (zero-length looping cycles).
const MAX_TRANSITIONS_PER_TICK: usize = 64;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No leg in flight; the value rests where the last leg left it.
    #[default]
    Idle,
    /// Moving toward the end value.
    Forward,
    /// Waiting out an initial or inter-cycle delay.
    Hold,
    /// Moving back toward the start value.
    Reverse,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegKind {
    Forward,
    Reverse,
}

impl LegKind {
    #[inline]
    fn phase(self) -> Phase {
        match self {
            LegKind::Forward => Phase::Forward,
            LegKind::Reverse => Phase::Reverse,
        }
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One monotonic interpolation, anchored at `anchor_ms`.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Leg {
    kind: LegKind,
    from: f32,
    to: f32,
    /// Value shown while the delay runs.
    hold: f32,
    anchor_ms: f64,
    delay_ms: f64,
    duration_ms: f64,
    /// Follows a changed endpoint; finishing it never chains or completes.
    settle: bool,
}

impl Leg {
    #[inline]
    fn motion_start_ms(&self) -> f64 {
        self.anchor_ms + self.delay_ms
    }

    #[inline]
    fn end_ms(&self) -> f64 {
        self.motion_start_ms() + self.duration_ms
    }
}

/// Per-instance driver state. Never shared between instances.
#[derive(Clone, Debug)]
pub struct Driver {
    value: f32,
    phase: Phase,
    reached_start: bool,
    leg: Option<Leg>,
    heading_to_end: bool,
    pending_drive: Option<bool>,
    forward_taken: bool,
    /// A forward leg of the current cycle has started moving.
    cycle_moved: bool,
    last_now_ms: Option<f64>,
    cancelled: bool,
}

impl Driver {
    /// Mount a driver resting at the configuration's start value.
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            value: config.start_value(),
            phase: Phase::Idle,
            reached_start: false,
            leg: None,
            heading_to_end: false,
            pending_drive: None,
            forward_taken: false,
            cycle_moved: false,
            last_now_ms: None,
            cancelled: false,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn reached_start(&self) -> bool {
        self.reached_start
    }

    /// Drive flag requested from the caller and not yet observed.
    #[inline]
    pub fn pending_drive(&self) -> Option<bool> {
        self.pending_drive
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stop the driver for good. Returns `true` only on the first call.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        self.leg = None;
        self.pending_drive = None;
        self.phase = Phase::Idle;
        debug!("driver cancelled at value {}", self.value);
        true
    }

    /// Advance to `now_ms` and return the value to render.
    pub fn tick(&mut self, config: &AnimationConfig, drive: bool, now_ms: f64) -> TickOutput {
        let mut out = TickOutput::default();
        if self.cancelled {
            return self.snapshot(out);
        }
        if !now_ms.is_finite() {
            warn!("ignoring non-finite tick timestamp {now_ms}");
            return self.snapshot(out);
        }
        let now = match self.last_now_ms {
            Some(prev) if now_ms < prev => {
                debug!("clock went backwards ({now_ms} < {prev}); holding at {prev}");
                prev
            }
            _ => now_ms,
        };
        self.last_now_ms = Some(now);

        self.advance(config, now, &mut out);
        self.sample(config, now, &mut out);

        let started = if self.observe_drive(drive) {
            self.turn(config, drive, now, &mut out);
            true
        } else {
            self.follow_endpoint(config, now, &mut out)
        };
        if started {
            self.advance(config, now, &mut out);
            self.sample(config, now, &mut out);
        }

        self.snapshot(out)
    }

    fn snapshot(&self, mut out: TickOutput) -> TickOutput {
        out.value = self.value;
        out.phase = self.phase;
        out
    }

    /// Returns `true` when the caller's flag asks for a direction change.
    fn observe_drive(&mut self, drive: bool) -> bool {
        if let Some(requested) = self.pending_drive {
            if drive == requested {
                self.pending_drive = None;
            }
            return false;
        }
        drive != self.heading_to_end
    }

    /// Start a leg from the current instantaneous value.
    fn turn(&mut self, config: &AnimationConfig, to_end: bool, now: f64, out: &mut TickOutput) {
        let from = self.value;
        self.heading_to_end = to_end;
        let leg = if to_end {
            let delay = if self.forward_taken {
                0
            } else {
                config.initial_delay_ms()
            };
            self.forward_taken = true;
            Leg {
                kind: LegKind::Forward,
                from,
                to: config.end_value(),
                hold: from,
                anchor_ms: now,
                delay_ms: f64::from(delay),
                duration_ms: f64::from(config.forward_duration_ms()),
                settle: false,
            }
        } else {
            Leg {
                kind: LegKind::Reverse,
                from,
                to: config.start_value(),
                hold: from,
                anchor_ms: now,
                delay_ms: 0.0,
                duration_ms: f64::from(config.reverse_duration_ms()),
                settle: false,
            }
        };
        self.start_leg(leg, out);
    }

    /// Idle with a stale value: rest on (or glide to) the endpoint being driven toward.
    fn follow_endpoint(&mut self, config: &AnimationConfig, now: f64, out: &mut TickOutput) -> bool {
        if self.leg.is_some() {
            return false;
        }
        let target = if self.heading_to_end {
            config.end_value()
        } else {
            config.start_value()
        };
        if self.value == target {
            return false;
        }
        if !self.forward_taken {
            debug!("idle driver snaps to start value {target}");
            self.value = target;
            return false;
        }
        let (kind, duration) = if self.heading_to_end {
            (LegKind::Forward, config.forward_duration_ms())
        } else {
            (LegKind::Reverse, config.reverse_duration_ms())
        };
        self.start_leg(
            Leg {
                kind,
                from: self.value,
                to: target,
                hold: self.value,
                anchor_ms: now,
                delay_ms: 0.0,
                duration_ms: f64::from(duration),
                settle: true,
            },
            out,
        );
        true
    }

    fn start_leg(&mut self, leg: Leg, out: &mut TickOutput) {
        debug!(
            "{:?} leg {} -> {} starts at {} ms",
            leg.kind,
            leg.from,
            leg.to,
            leg.motion_start_ms()
        );
        self.phase = if leg.delay_ms > 0.0 {
            Phase::Hold
        } else {
            leg.kind.phase()
        };
        self.leg = Some(leg);
        out.push_event(DriverEvent::LegStarted {
            leg: leg.kind,
            from: leg.from,
            to: leg.to,
            starts_at_ms: leg.motion_start_ms(),
        });
    }

    fn request_drive(&mut self, drive: bool, at_ms: f64, out: &mut TickOutput) {
        self.pending_drive = Some(drive);
        out.push_event(DriverEvent::DriveRequested { drive, at_ms });
    }

    /// Complete every leg that ended at or before `now`.
    fn advance(&mut self, config: &AnimationConfig, now: f64, out: &mut TickOutput) {
        let mut transitions = 0;
        while let Some(leg) = self.leg {
            let end = leg.end_ms();
            if now < end {
                break;
            }
            self.finish_leg(config, leg, end, out);
            transitions += 1;
            if transitions >= MAX_TRANSITIONS_PER_TICK {
                if let Some(next) = self.leg.as_mut() {
                    if next.anchor_ms < now {
                        next.anchor_ms = now;
                    }
                }
                debug!("transition cap reached at {now} ms; re-anchoring pending leg");
                break;
            }
        }
    }

    fn finish_leg(&mut self, config: &AnimationConfig, leg: Leg, at: f64, out: &mut TickOutput) {
        self.leg = None;
        self.value = leg.to;
        out.push_event(DriverEvent::LegFinished {
            leg: leg.kind,
            value: leg.to,
            at_ms: at,
        });
        if leg.settle {
            self.phase = Phase::Idle;
            return;
        }
        if leg.kind == LegKind::Forward {
            self.cycle_moved = true;
        }

        let start = config.start_value();
        let end = config.end_value();
        let forward_ms = f64::from(config.forward_duration_ms());
        let pause_ms = f64::from(config.inter_cycle_delay_ms());

        match (config.variant(), leg.kind) {
            (Variant::Single, LegKind::Forward) => {
                self.reached_start = false;
                if config.looping() {
                    // Hold at the end value, then restart from the start value.
                    self.start_leg(
                        Leg {
                            kind: LegKind::Forward,
                            from: start,
                            to: end,
                            hold: leg.to,
                            anchor_ms: at,
                            delay_ms: pause_ms,
                            duration_ms: forward_ms,
                            settle: false,
                        },
                        out,
                    );
                } else {
                    self.phase = Phase::Idle;
                    self.cycle_moved = false;
                    out.push_event(DriverEvent::CycleCompleted { at_ms: at });
                }
            }
            (Variant::ComeBack, LegKind::Forward) => {
                self.reached_start = false;
                self.heading_to_end = false;
                self.request_drive(false, at, out);
                self.start_leg(
                    Leg {
                        kind: LegKind::Reverse,
                        from: leg.to,
                        to: start,
                        hold: leg.to,
                        anchor_ms: at,
                        delay_ms: 0.0,
                        duration_ms: f64::from(config.reverse_duration_ms()),
                        settle: false,
                    },
                    out,
                );
            }
            (Variant::ComeBack, LegKind::Reverse) if config.looping() => {
                self.reached_start = true;
                self.heading_to_end = true;
                self.forward_taken = true;
                self.cycle_moved = false;
                self.request_drive(true, at, out);
                self.start_leg(
                    Leg {
                        kind: LegKind::Forward,
                        from: start,
                        to: end,
                        hold: leg.to,
                        anchor_ms: at,
                        delay_ms: pause_ms,
                        duration_ms: forward_ms,
                        settle: false,
                    },
                    out,
                );
            }
            (Variant::ComeBack, LegKind::Reverse) => {
                self.reached_start = true;
                self.phase = Phase::Idle;
                if self.cycle_moved {
                    self.cycle_moved = false;
                    out.push_event(DriverEvent::CycleCompleted { at_ms: at });
                } else {
                    debug!("returned at {at} ms before the forward leg moved; no cycle");
                }
            }
            (Variant::Single, LegKind::Reverse) => {
                // Caller-driven return leg; not a cycle of its own.
                self.reached_start = true;
                self.cycle_moved = false;
                self.phase = Phase::Idle;
            }
        }
    }

    /// Recompute the value of the active leg at `now`.
    fn sample(&mut self, config: &AnimationConfig, now: f64, out: &mut TickOutput) {
        let Some(leg) = self.leg else {
            return;
        };
        let motion_start = leg.motion_start_ms();
        if now < motion_start {
            self.value = leg.hold;
            self.phase = Phase::Hold;
            return;
        }
        self.phase = leg.kind.phase();
        if leg.kind == LegKind::Forward && !leg.settle {
            self.cycle_moved = true;
        }
        if leg.duration_ms <= 0.0 {
            self.value = leg.to;
            return;
        }
        let t = ((now - motion_start) / leg.duration_ms).clamp(0.0, 1.0) as f32;
        if t <= 0.0 {
            self.value = leg.from;
        } else if t >= 1.0 {
            self.value = leg.to;
        } else {
            match config.easing().evaluate(t) {
                Ok(eased) => self.value = lerp(leg.from, leg.to, eased),
                Err(err) => {
                    warn!("easing failed: {err}; keeping value {}", self.value);
                    out.push_event(DriverEvent::EasingFailed {
                        t,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}
