//! Animation configuration.
//!
//! `AnimationSpec` is the raw, serde-friendly description (signed millisecond
//! fields, defaults filled in). Validation turns it into an immutable
//! `AnimationConfig`; nothing is deferred to drive time.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::ConfigError;

fn default_total_duration_ms() -> i64 {
    1000
}

/// Whether a drive runs one leg or goes there and back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
    /// start → end over the full duration.
    #[default]
    Single,
    /// start → end → start, each leg taking half the duration.
    ComeBack,
}

/// Unvalidated configuration, as written by callers or stored in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub inter_cycle_delay_ms: i64,
    #[serde(default = "default_total_duration_ms")]
    pub total_duration_ms: i64,
    #[serde(default)]
    pub initial_delay_ms: i64,
    #[serde(default)]
    pub easing: Easing,
    pub start_value: f32,
    pub end_value: f32,
    #[serde(default)]
    pub variant: Variant,
}

impl AnimationSpec {
    pub fn new(start_value: f32, end_value: f32) -> Self {
        Self {
            looping: false,
            inter_cycle_delay_ms: 0,
            total_duration_ms: default_total_duration_ms(),
            initial_delay_ms: 0,
            easing: Easing::Linear,
            start_value,
            end_value,
            variant: Variant::Single,
        }
    }

    pub fn validate(self) -> Result<AnimationConfig, ConfigError> {
        let total_duration_ms = millis("totalDurationMs", self.total_duration_ms)?;
        let initial_delay_ms = millis("initialDelayMs", self.initial_delay_ms)?;
        let inter_cycle_delay_ms = millis("interCycleDelayMs", self.inter_cycle_delay_ms)?;
        if !self.start_value.is_finite() {
            return Err(ConfigError::invalid("startValue", "must be finite"));
        }
        if !self.end_value.is_finite() {
            return Err(ConfigError::invalid("endValue", "must be finite"));
        }
        self.easing.validate()?;
        Ok(AnimationConfig {
            looping: self.looping,
            inter_cycle_delay_ms,
            total_duration_ms,
            initial_delay_ms,
            easing: self.easing,
            start_value: self.start_value,
            end_value: self.end_value,
            variant: self.variant,
        })
    }
}

fn millis(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::invalid(field, format!("must not exceed {} ms", u32::MAX)))
}

/// Validated, immutable animation configuration.
///
/// Cheap to rebuild every frame from caller state; the driver keeps the
/// per-instance state.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    looping: bool,
    inter_cycle_delay_ms: u32,
    total_duration_ms: u32,
    initial_delay_ms: u32,
    easing: Easing,
    start_value: f32,
    end_value: f32,
    variant: Variant,
}

impl TryFrom<AnimationSpec> for AnimationConfig {
    type Error = ConfigError;

    fn try_from(spec: AnimationSpec) -> Result<Self, Self::Error> {
        spec.validate()
    }
}

impl AnimationConfig {
    pub fn builder(start_value: f32, end_value: f32) -> AnimationConfigBuilder {
        AnimationConfigBuilder {
            spec: AnimationSpec::new(start_value, end_value),
        }
    }

    #[inline]
    pub fn looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn inter_cycle_delay_ms(&self) -> u32 {
        self.inter_cycle_delay_ms
    }

    #[inline]
    pub fn total_duration_ms(&self) -> u32 {
        self.total_duration_ms
    }

    #[inline]
    pub fn initial_delay_ms(&self) -> u32 {
        self.initial_delay_ms
    }

    #[inline]
    pub fn easing(&self) -> &Easing {
        &self.easing
    }

    #[inline]
    pub fn start_value(&self) -> f32 {
        self.start_value
    }

    #[inline]
    pub fn end_value(&self) -> f32 {
        self.end_value
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Duration of a start → end leg.
    pub fn forward_duration_ms(&self) -> u32 {
        match self.variant {
            Variant::Single => self.total_duration_ms,
            Variant::ComeBack => self.total_duration_ms / 2,
        }
    }

    /// Duration of an end → start leg.
    pub fn reverse_duration_ms(&self) -> u32 {
        self.forward_duration_ms()
    }

    /// Length of one full looping cycle including the inter-cycle pause.
    pub fn cycle_length_ms(&self) -> u64 {
        let legs = match self.variant {
            Variant::Single => u64::from(self.forward_duration_ms()),
            Variant::ComeBack => {
                u64::from(self.forward_duration_ms()) + u64::from(self.reverse_duration_ms())
            }
        };
        legs + u64::from(self.inter_cycle_delay_ms)
    }

    pub fn to_spec(&self) -> AnimationSpec {
        AnimationSpec {
            looping: self.looping,
            inter_cycle_delay_ms: i64::from(self.inter_cycle_delay_ms),
            total_duration_ms: i64::from(self.total_duration_ms),
            initial_delay_ms: i64::from(self.initial_delay_ms),
            easing: self.easing.clone(),
            start_value: self.start_value,
            end_value: self.end_value,
            variant: self.variant,
        }
    }
}

/// Builder that validates at `build()`.
#[derive(Clone, Debug)]
pub struct AnimationConfigBuilder {
    spec: AnimationSpec,
}

impl AnimationConfigBuilder {
    pub fn looping(mut self, looping: bool) -> Self {
        self.spec.looping = looping;
        self
    }

    pub fn inter_cycle_delay_ms(mut self, ms: i64) -> Self {
        self.spec.inter_cycle_delay_ms = ms;
        self
    }

    pub fn total_duration_ms(mut self, ms: i64) -> Self {
        self.spec.total_duration_ms = ms;
        self
    }

    pub fn initial_delay_ms(mut self, ms: i64) -> Self {
        self.spec.initial_delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.spec.easing = easing;
        self
    }

    pub fn values(mut self, start_value: f32, end_value: f32) -> Self {
        self.spec.start_value = start_value;
        self.spec.end_value = end_value;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.spec.variant = variant;
        self
    }

    pub fn come_back(self) -> Self {
        self.variant(Variant::ComeBack)
    }

    pub fn build(self) -> Result<AnimationConfig, ConfigError> {
        self.spec.validate()
    }
}

/// Per-property defaults.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    Rotation,
    Move,
    MoveComeBack,
    Expand,
    ExpandComeBack,
    Alpha,
    AlphaComeBack,
}

impl Preset {
    /// Default `(start, end)` values; expand sizes are scale factors.
    pub fn default_values(self) -> (f32, f32) {
        match self {
            Preset::Rotation => (0.0, 360.0),
            Preset::Move | Preset::MoveComeBack => (0.0, 16.0),
            Preset::Expand | Preset::ExpandComeBack => (1.0, 2.0),
            Preset::Alpha | Preset::AlphaComeBack => (0.0, 1.0),
        }
    }

    pub fn builder(self) -> AnimationConfigBuilder {
        let (start, end) = self.default_values();
        let builder = AnimationConfig::builder(start, end);
        match self {
            Preset::Rotation => builder.total_duration_ms(1000),
            Preset::Move => builder.total_duration_ms(500).initial_delay_ms(500),
            Preset::MoveComeBack => builder.total_duration_ms(1000).come_back(),
            Preset::Expand => builder.total_duration_ms(250).initial_delay_ms(500),
            Preset::ExpandComeBack => builder
                .total_duration_ms(500)
                .inter_cycle_delay_ms(500)
                .come_back(),
            Preset::Alpha => builder.total_duration_ms(1000),
            Preset::AlphaComeBack => builder.total_duration_ms(1000).come_back(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_linear_single_non_looping() {
        let cfg = AnimationConfig::builder(0.0, 1.0).build().unwrap();
        assert!(!cfg.looping());
        assert_eq!(cfg.inter_cycle_delay_ms(), 0);
        assert_eq!(cfg.initial_delay_ms(), 0);
        assert_eq!(cfg.total_duration_ms(), 1000);
        assert_eq!(cfg.easing(), &Easing::Linear);
        assert_eq!(cfg.variant(), Variant::Single);
    }

    #[test]
    fn negative_duration_is_rejected_at_construction() {
        let err = AnimationConfig::builder(0.0, 1.0)
            .total_duration_ms(-1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidConfig {
                field: "totalDurationMs",
                ..
            }
        ));
    }

    #[test]
    fn negative_delays_are_rejected() {
        assert!(AnimationConfig::builder(0.0, 1.0)
            .initial_delay_ms(-5)
            .build()
            .is_err());
        assert!(AnimationConfig::builder(0.0, 1.0)
            .inter_cycle_delay_ms(-5)
            .build()
            .is_err());
    }

    #[test]
    fn oversized_duration_is_rejected() {
        assert!(AnimationConfig::builder(0.0, 1.0)
            .total_duration_ms(i64::from(u32::MAX) + 1)
            .build()
            .is_err());
    }

    #[test]
    fn equal_endpoints_are_legal() {
        let cfg = AnimationConfig::builder(5.0, 5.0).build().unwrap();
        assert_eq!(cfg.start_value(), cfg.end_value());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(AnimationConfig::builder(f32::NAN, 1.0).build().is_err());
        assert!(AnimationConfig::builder(0.0, f32::INFINITY).build().is_err());
    }

    #[test]
    fn come_back_halves_each_leg() {
        let cfg = AnimationConfig::builder(0.0, 100.0)
            .total_duration_ms(1000)
            .inter_cycle_delay_ms(250)
            .come_back()
            .build()
            .unwrap();
        assert_eq!(cfg.forward_duration_ms(), 500);
        assert_eq!(cfg.reverse_duration_ms(), 500);
        assert_eq!(cfg.cycle_length_ms(), 1250);
    }

    #[test]
    fn presets_fill_per_property_defaults() {
        let mv = Preset::Move.builder().build().unwrap();
        assert_eq!(mv.total_duration_ms(), 500);
        assert_eq!(mv.initial_delay_ms(), 500);
        assert_eq!((mv.start_value(), mv.end_value()), (0.0, 16.0));

        let rot = Preset::Rotation.builder().build().unwrap();
        assert_eq!(rot.total_duration_ms(), 1000);
        assert_eq!(rot.end_value(), 360.0);

        let grow = Preset::Expand.builder().build().unwrap();
        assert_eq!(grow.total_duration_ms(), 250);
        assert_eq!(grow.initial_delay_ms(), 500);
        assert_eq!(grow.variant(), Variant::Single);

        let expand = Preset::ExpandComeBack
            .builder()
            .values(24.0, 48.0)
            .build()
            .unwrap();
        assert_eq!(expand.variant(), Variant::ComeBack);
        assert_eq!(expand.inter_cycle_delay_ms(), 500);
        assert_eq!(expand.start_value(), 24.0);
    }

    #[test]
    fn spec_json_fills_defaults() {
        let spec: AnimationSpec =
            serde_json::from_str(r#"{"startValue": 0, "endValue": 1, "loop": true}"#).unwrap();
        assert!(spec.looping);
        assert_eq!(spec.total_duration_ms, 1000);
        let cfg = AnimationConfig::try_from(spec).unwrap();
        assert!(cfg.looping());
        assert_eq!(cfg.to_spec().total_duration_ms, 1000);
    }
}
