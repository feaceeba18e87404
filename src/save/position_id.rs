//! Position-derived identity for scene objects.
//!
//! Saved objects have no stable ids across scene reloads, so each one is keyed
//! by its 2D position quantised to tenths of a world unit. Two positions within
//! 0.05 units of each other on both axes share an id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::SceneId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(String);

impl PositionId {
    /// `"{rx}-{ry}"` with `rx = round(x * 10)`, `ry = round(y * 10)`.
    pub fn from_xy(x: f32, y: f32) -> Self {
        let (rx, ry) = quantise(x, y);
        Self(format!("{rx}-{ry}"))
    }

    /// z is ignored.
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_xy(translation.x, translation.y)
    }

    /// Wraps an id read back from a snapshot.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Scene-qualified form used in log lines, e.g. `"Far_10_20"`.
    pub fn scoped(scene: SceneId, translation: Vec3) -> String {
        let (rx, ry) = quantise(translation.x, translation.y);
        format!("{}_{rx}_{ry}", scene.abbreviation())
    }
}

fn quantise(x: f32, y: f32) -> (i32, i32) {
    ((x * 10.0).round() as i32, (y * 10.0).round() as i32)
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Vec3> for PositionId {
    fn from(translation: Vec3) -> Self {
        Self::from_translation(translation)
    }
}
