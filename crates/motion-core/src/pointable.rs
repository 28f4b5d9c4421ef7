// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tracked fingers and tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ids::{FrameId, HandId, PointableId};
use crate::math::Vec3;

/// What a pointable is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointableKind {
    /// A finger of a tracked hand.
    #[default]
    Finger,
    /// A thin, straight object such as a pen.
    Tool,
}

/// One frame's snapshot of a tracked finger or tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pointable {
    /// Stable id for as long as the pointable stays in view.
    pub id: PointableId,
    /// The hand holding the pointable; `HandId::INVALID` when unattached.
    pub hand_id: HandId,
    /// The frame that reported this snapshot.
    pub frame_id: FrameId,
    /// Finger or tool.
    pub kind: PointableKind,
    /// Tip position in millimetres.
    pub tip_position: Vec3,
    /// Tip velocity in millimetres per second.
    pub tip_velocity: Vec3,
    /// Unit vector the pointable is pointing in.
    pub direction: Vec3,
    /// Visible length in millimetres.
    pub length: f32,
    /// Average width in millimetres.
    pub width: f32,
    /// Normalized distance to the virtual touch plane, `-1.0..=1.0`.
    pub touch_distance: f32,
}

static INVALID_POINTABLE: Pointable = Pointable {
    id: PointableId::INVALID,
    hand_id: HandId::INVALID,
    frame_id: FrameId::INVALID,
    kind: PointableKind::Finger,
    tip_position: Vec3::ZERO,
    tip_velocity: Vec3::ZERO,
    direction: Vec3::ZERO,
    length: 0.0,
    width: 0.0,
    touch_distance: 0.0,
};

impl Pointable {
    /// Creates a pointable of `kind` at `tip_position` with every other
    /// field zeroed.
    pub fn new(id: PointableId, kind: PointableKind, tip_position: Vec3) -> Self {
        Self {
            id,
            kind,
            tip_position,
            ..INVALID_POINTABLE
        }
    }

    /// The shared invalid pointable returned by sentinel lookups.
    pub fn invalid() -> &'static Pointable {
        &INVALID_POINTABLE
    }

    /// `true` if this snapshot describes a real finger or tool.
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// `true` for fingers.
    pub fn is_finger(&self) -> bool {
        self.kind == PointableKind::Finger
    }

    /// `true` for tools.
    pub fn is_tool(&self) -> bool {
        self.kind == PointableKind::Tool
    }
}

impl PartialEq for Pointable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pointable {}

impl Hash for Pointable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Pointable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("Invalid Pointable");
        }
        let label = if self.is_tool() { "Tool" } else { "Finger" };
        write!(f, "{} Id:{} tip:{}", label, self.id, self.tip_position)
    }
}
