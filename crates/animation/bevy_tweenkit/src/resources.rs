use bevy::prelude::*;

/// Where `TweenClock` takes its time from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClockSource {
    /// Accumulate Bevy's `Time` delta every frame.
    #[default]
    Time,
    /// Only moves when the app sets or advances it (tests, replays).
    Manual,
}

/// Monotonic milliseconds handed to every driver tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct TweenClock {
    pub now_ms: f64,
    pub source: ClockSource,
}

impl TweenClock {
    pub fn manual() -> Self {
        Self {
            now_ms: 0.0,
            source: ClockSource::Manual,
        }
    }

    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms;
    }
}
