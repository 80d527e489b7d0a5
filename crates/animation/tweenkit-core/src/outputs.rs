//! Output contracts from the driver.
//!
//! A tick yields the value to render plus the discrete events that happened
//! since the previous tick, in timestamp order. Hosts apply the value and
//! consume the events in their own state-update cycle.

use serde::{Deserialize, Serialize};

use crate::driver::{LegKind, Phase};

/// Discrete signals emitted while ticking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DriverEvent {
    /// A leg was scheduled; motion begins at `starts_at_ms` (after any delay).
    LegStarted {
        leg: LegKind,
        from: f32,
        to: f32,
        starts_at_ms: f64,
    },
    LegFinished {
        leg: LegKind,
        value: f32,
        at_ms: f64,
    },
    /// The driver asks the caller to set its drive flag to `drive`.
    DriveRequested { drive: bool, at_ms: f64 },
    /// A non-looping animation finished its terminal leg.
    CycleCompleted { at_ms: f64 },
    /// The easing curve failed for this tick; the previous value was kept.
    EasingFailed { t: f32, message: String },
}

/// Result of one driver tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutput {
    pub value: f32,
    pub phase: Phase,
    pub events: Vec<DriverEvent>,
}

impl TickOutput {
    #[inline]
    pub fn push_event(&mut self, event: DriverEvent) {
        self.events.push(event);
    }

    /// Latest drive flag the driver asked for during this tick.
    pub fn requested_drive(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            DriverEvent::DriveRequested { drive, .. } => Some(*drive),
            _ => None,
        })
    }

    pub fn cycle_completed(&self) -> Option<f64> {
        self.events.iter().find_map(|e| match e {
            DriverEvent::CycleCompleted { at_ms } => Some(*at_ms),
            _ => None,
        })
    }
}
