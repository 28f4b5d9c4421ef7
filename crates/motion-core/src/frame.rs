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

//! Frames: the per-interval snapshot container.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::gesture::Gesture;
use crate::hand::Hand;
use crate::ids::{FrameId, GestureId, HandId, PointableId};
use crate::pointable::Pointable;

/// Everything the tracking service reported for one sampling interval.
///
/// The frame owns its hands, pointables and gestures. Gestures and hands
/// refer to each other by id; the `*_of` methods resolve those references
/// against this frame's collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame id. Later frames have larger ids.
    pub id: FrameId,
    /// Capture time in microseconds, on the tracking service's clock.
    pub timestamp: i64,
    /// Hands in view.
    pub hands: Vec<Hand>,
    /// Fingers and tools in view.
    pub pointables: Vec<Pointable>,
    /// Gestures reported in this frame.
    pub gestures: Vec<Gesture>,
}

static INVALID_FRAME: Frame = Frame {
    id: FrameId::INVALID,
    timestamp: 0,
    hands: Vec::new(),
    pointables: Vec::new(),
    gestures: Vec::new(),
};

impl Frame {
    /// Creates an empty frame.
    pub fn new(id: FrameId, timestamp: i64) -> Self {
        Self {
            id,
            timestamp,
            ..Self::default()
        }
    }

    /// The shared invalid frame.
    pub fn invalid() -> &'static Frame {
        &INVALID_FRAME
    }

    /// `true` if this is a real frame.
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// Adds a hand, stamping it with this frame's id.
    pub fn with_hand(mut self, mut hand: Hand) -> Self {
        hand.frame_id = self.id;
        self.hands.push(hand);
        self
    }

    /// Adds a pointable, stamping it with this frame's id.
    pub fn with_pointable(mut self, mut pointable: Pointable) -> Self {
        pointable.frame_id = self.id;
        self.pointables.push(pointable);
        self
    }

    /// Adds a gesture, stamping it with this frame's id.
    pub fn with_gesture(mut self, gesture: Gesture) -> Self {
        let gesture = gesture.with_frame(self.id);
        self.gestures.push(gesture);
        self
    }

    /// Looks up a gesture by id.
    pub fn try_gesture(&self, id: GestureId) -> Option<&Gesture> {
        self.gestures.iter().find(|g| g.id == id)
    }

    /// Looks up a hand by id.
    pub fn try_hand(&self, id: HandId) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }

    /// Looks up a pointable by id.
    pub fn try_pointable(&self, id: PointableId) -> Option<&Pointable> {
        self.pointables.iter().find(|p| p.id == id)
    }

    /// Looks up a gesture by id, returning [`Gesture::invalid`] when absent.
    pub fn gesture(&self, id: GestureId) -> &Gesture {
        self.try_gesture(id).unwrap_or(Gesture::invalid())
    }

    /// Looks up a hand by id, returning [`Hand::invalid`] when absent.
    pub fn hand(&self, id: HandId) -> &Hand {
        self.try_hand(id).unwrap_or(Hand::invalid())
    }

    /// Looks up a pointable by id, returning [`Pointable::invalid`] when absent.
    pub fn pointable(&self, id: PointableId) -> &Pointable {
        self.try_pointable(id).unwrap_or(Pointable::invalid())
    }

    /// The hands a gesture refers to. Ids this frame does not hold are skipped.
    pub fn hands_of<'a>(&'a self, gesture: &'a Gesture) -> impl Iterator<Item = &'a Hand> + 'a {
        gesture.hand_ids.iter().filter_map(move |id| self.try_hand(*id))
    }

    /// The fingers and tools a gesture refers to. Ids this frame does not
    /// hold are skipped.
    pub fn pointables_of<'a>(
        &'a self,
        gesture: &'a Gesture,
    ) -> impl Iterator<Item = &'a Pointable> + 'a {
        gesture
            .pointable_ids
            .iter()
            .filter_map(move |id| self.try_pointable(*id))
    }

    /// The fingers and tools attached to a hand.
    pub fn pointables_of_hand(&self, hand: &Hand) -> impl Iterator<Item = &Pointable> + '_ {
        let hand_id = hand.id;
        self.pointables.iter().filter(move |p| p.hand_id == hand_id)
    }

    /// Gestures in this frame whose ids `previous` did not report.
    pub fn gestures_since<'a>(&'a self, previous: &Frame) -> impl Iterator<Item = &'a Gesture> + 'a {
        let seen: HashSet<GestureId> = previous.gestures.iter().map(|g| g.id).collect();
        self.gestures.iter().filter(move |g| !seen.contains(&g.id))
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Frame {}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("Invalid Frame");
        }
        write!(
            f,
            "Frame Id:{} timestamp:{} hands:{} pointables:{} gestures:{}",
            self.id,
            self.timestamp,
            self.hands.len(),
            self.pointables.len(),
            self.gestures.len()
        )
    }
}
