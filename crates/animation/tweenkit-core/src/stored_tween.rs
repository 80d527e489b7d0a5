use serde::{Deserialize, Serialize};

use crate::adapters::{MoveDirection, RotationAxis};
use crate::config::{AnimationConfig, AnimationSpec};
use crate::error::ConfigError;

/// Which rendered property a stored tween drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyKind {
    Rotation {
        #[serde(default)]
        axis: RotationAxis,
    },
    Move {
        #[serde(default)]
        direction: MoveDirection,
    },
    Expand,
    Alpha,
}

/// A named, validated tween loaded from JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredTween {
    pub name: String,
    pub property: PropertyKind,
    pub config: AnimationConfig,
}

#[derive(Deserialize)]
struct RawStoredTween {
    name: String,
    property: PropertyKind,
    animation: AnimationSpec,
}

/// Public API: parse a stored tween document.
///
/// ```json
/// { "name": "pulse",
///   "property": { "kind": "alpha" },
///   "animation": { "startValue": 0.2, "endValue": 1.0, "variant": "comeBack", "loop": true } }
/// ```
///
/// Durations are milliseconds. Validation errors surface here, not at drive time.
pub fn parse_stored_tween_json(s: &str) -> Result<StoredTween, ConfigError> {
    let raw: RawStoredTween =
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let config = raw.animation.validate()?;
    Ok(StoredTween {
        name: raw.name,
        property: raw.property,
        config,
    })
}
