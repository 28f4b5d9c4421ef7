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

//! Tracked hands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ids::{FrameId, HandId, PointableId};
use crate::math::Vec3;

/// One frame's snapshot of a tracked hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    /// Stable id for as long as the hand stays in view.
    pub id: HandId,
    /// The frame that reported this snapshot.
    pub frame_id: FrameId,
    /// Center of the palm, in millimetres.
    pub palm_position: Vec3,
    /// Unit vector pointing out of the palm.
    pub palm_normal: Vec3,
    /// Unit vector from the palm towards the fingers.
    pub direction: Vec3,
    /// Palm velocity in millimetres per second.
    pub palm_velocity: Vec3,
    /// Radius of a sphere fitted to the curvature of the hand.
    pub sphere_radius: f32,
    /// Seconds the hand has been continuously visible.
    pub time_visible: Option<f32>,
    /// Fingers and tools attached to this hand, resolved through the owning frame.
    pub pointable_ids: Vec<PointableId>,
}

static INVALID_HAND: Hand = Hand {
    id: HandId::INVALID,
    frame_id: FrameId::INVALID,
    palm_position: Vec3::ZERO,
    palm_normal: Vec3::ZERO,
    direction: Vec3::ZERO,
    palm_velocity: Vec3::ZERO,
    sphere_radius: 0.0,
    time_visible: None,
    pointable_ids: Vec::new(),
};

impl Hand {
    /// Creates a hand at `palm_position` with every other field zeroed.
    pub fn new(id: HandId, palm_position: Vec3) -> Self {
        Self {
            id,
            palm_position,
            ..INVALID_HAND.clone()
        }
    }

    /// The shared invalid hand returned by sentinel lookups.
    pub fn invalid() -> &'static Hand {
        &INVALID_HAND
    }

    /// `true` if this snapshot describes a real hand.
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// Rotation of the palm around the forward axis, in radians.
    pub fn roll(&self) -> f32 {
        self.palm_normal.roll()
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Hand {}

impl Hash for Hand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("Invalid Hand");
        }
        write!(f, "Hand Id:{} palm:{}", self.id, self.palm_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_hand_is_shared() {
        assert!(std::ptr::eq(Hand::invalid(), Hand::invalid()));
        assert!(!Hand::invalid().is_valid());
        assert_eq!(Hand::invalid().to_string(), "Invalid Hand");
    }

    #[test]
    fn test_hands_compare_by_id() {
        let a = Hand::new(HandId::new(4), Vec3::ZERO);
        let b = Hand::new(HandId::new(4), Vec3::new(10.0, 200.0, 5.0));
        assert_eq!(a, b);
        assert!(a.is_valid());
        assert_eq!(b.to_string(), "Hand Id:4 palm:(10.000, 200.000, 5.000)");
    }
}
