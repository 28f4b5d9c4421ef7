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

//! Recognized gestures.
//!
//! A [`Gesture`] is one frame's snapshot of a motion the tracking service
//! recognized. A motion spanning many frames is reported as a fresh
//! `Gesture` in each of them, all sharing the same [`GestureId`]; values are
//! never updated in place.
//!
//! The motion-specific data lives in [`GestureKind`], so handling every kind
//! of gesture is an exhaustive `match` rather than a chain of downcasts.

mod circle;
mod swipe;
mod tap;

pub use self::circle::CircleGesture;
pub use self::swipe::SwipeGesture;
pub use self::tap::{KeyTapGesture, ScreenTapGesture};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ids::{FrameId, GestureId, HandId, PointableId};

/// Where a gesture is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum GestureState {
    /// Not a real gesture.
    #[default]
    Invalid,
    /// The motion was just recognized.
    Start,
    /// The motion is continuing.
    Update,
    /// The motion has ended.
    Stop,
}

impl GestureState {
    /// The name the tracking service uses for this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            GestureState::Invalid => "invalid",
            GestureState::Start => "start",
            GestureState::Update => "update",
            GestureState::Stop => "stop",
        }
    }

    /// Parses a wire name. Anything unrecognized is `Invalid`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "start" => GestureState::Start,
            "update" => GestureState::Update,
            "stop" => GestureState::Stop,
            _ => GestureState::Invalid,
        }
    }
}

impl From<String> for GestureState {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<GestureState> for &'static str {
    fn from(state: GestureState) -> Self {
        state.as_str()
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type tag of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum GestureType {
    /// Not a recognized gesture type.
    #[default]
    Invalid,
    /// A straight-line movement.
    Swipe,
    /// A circular movement.
    Circle,
    /// A forward tap.
    ScreenTap,
    /// A downward tap.
    KeyTap,
}

impl GestureType {
    /// The name the tracking service uses for this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            GestureType::Invalid => "invalid",
            GestureType::Swipe => "swipe",
            GestureType::Circle => "circle",
            GestureType::ScreenTap => "screenTap",
            GestureType::KeyTap => "keyTap",
        }
    }

    /// Parses a wire name. Anything unrecognized is `Invalid`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "swipe" => GestureType::Swipe,
            "circle" => GestureType::Circle,
            "screenTap" => GestureType::ScreenTap,
            "keyTap" => GestureType::KeyTap,
            _ => GestureType::Invalid,
        }
    }
}

impl From<String> for GestureType {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<GestureType> for &'static str {
    fn from(kind: GestureType) -> Self {
        kind.as_str()
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The motion-specific payload of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureKind {
    /// A gesture with no motion-specific data.
    #[default]
    Generic,
    /// See [`SwipeGesture`].
    Swipe(SwipeGesture),
    /// See [`CircleGesture`].
    Circle(CircleGesture),
    /// See [`ScreenTapGesture`].
    ScreenTap(ScreenTapGesture),
    /// See [`KeyTapGesture`].
    KeyTap(KeyTapGesture),
}

impl GestureKind {
    /// The type tag matching this payload.
    pub const fn gesture_type(&self) -> GestureType {
        match self {
            GestureKind::Generic => GestureType::Invalid,
            GestureKind::Swipe(_) => GestureType::Swipe,
            GestureKind::Circle(_) => GestureType::Circle,
            GestureKind::ScreenTap(_) => GestureType::ScreenTap,
            GestureKind::KeyTap(_) => GestureType::KeyTap,
        }
    }

    /// The finger or tool performing the motion, if the payload names one.
    pub const fn pointable_id(&self) -> Option<PointableId> {
        match self {
            GestureKind::Generic => None,
            GestureKind::Swipe(g) => Some(g.pointable_id),
            GestureKind::Circle(g) => Some(g.pointable_id),
            GestureKind::ScreenTap(g) => Some(g.pointable_id),
            GestureKind::KeyTap(g) => Some(g.pointable_id),
        }
    }
}

/// One frame's snapshot of a recognized motion.
///
/// Identity is the [`GestureId`] alone: two `Gesture` values compare equal
/// (and hash equally) when their ids match, whatever the rest of their
/// fields hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gesture {
    /// Stable id shared by every snapshot of the same motion.
    pub id: GestureId,
    /// Elapsed time since the motion started, in microseconds. `None` when
    /// the tracking service did not record one.
    pub duration: Option<u64>,
    /// Lifecycle state in the reporting frame.
    pub state: GestureState,
    /// The frame that reported this snapshot.
    pub frame_id: FrameId,
    /// Hands involved in the motion, resolved through the owning frame.
    pub hand_ids: Vec<HandId>,
    /// Fingers and tools involved in the motion, resolved through the owning frame.
    pub pointable_ids: Vec<PointableId>,
    /// The motion-specific payload.
    pub kind: GestureKind,
}

static INVALID_GESTURE: Gesture = Gesture {
    id: GestureId::INVALID,
    duration: None,
    state: GestureState::Invalid,
    frame_id: FrameId::INVALID,
    hand_ids: Vec::new(),
    pointable_ids: Vec::new(),
    kind: GestureKind::Generic,
};

impl Gesture {
    /// Creates a gesture snapshot with no duration, state, frame or
    /// references. Use the `with_*` methods to fill those in.
    pub fn new(id: GestureId, kind: GestureKind) -> Self {
        Self {
            id,
            duration: None,
            state: GestureState::Invalid,
            frame_id: FrameId::INVALID,
            hand_ids: Vec::new(),
            pointable_ids: Vec::new(),
            kind,
        }
    }

    /// The shared invalid gesture.
    ///
    /// Sentinel lookups hand this out instead of an absent value, so callers
    /// check [`Gesture::is_valid`] rather than existence.
    pub fn invalid() -> &'static Gesture {
        &INVALID_GESTURE
    }

    /// Sets the elapsed duration in microseconds.
    pub fn with_duration(mut self, micros: u64) -> Self {
        self.duration = Some(micros);
        self
    }

    /// Sets the lifecycle state.
    pub fn with_state(mut self, state: GestureState) -> Self {
        self.state = state;
        self
    }

    /// Sets the reporting frame.
    pub fn with_frame(mut self, frame_id: FrameId) -> Self {
        self.frame_id = frame_id;
        self
    }

    /// Sets the hands involved in the motion.
    pub fn with_hands(mut self, hands: impl IntoIterator<Item = HandId>) -> Self {
        self.hand_ids = hands.into_iter().collect();
        self
    }

    /// Sets the fingers and tools involved in the motion.
    pub fn with_pointables(mut self, pointables: impl IntoIterator<Item = PointableId>) -> Self {
        self.pointable_ids = pointables.into_iter().collect();
        self
    }

    /// The type tag, derived from the payload.
    pub fn gesture_type(&self) -> GestureType {
        self.kind.gesture_type()
    }

    /// Elapsed duration in seconds.
    pub fn duration_seconds(&self) -> Option<f32> {
        self.duration.map(|micros| micros as f32 / 1_000_000.0)
    }

    /// `true` if a duration was recorded for this snapshot.
    pub fn is_valid(&self) -> bool {
        self.duration.is_some()
    }

    /// Identity comparison: `true` iff both snapshots carry the same id.
    pub fn is_equal_to(&self, other: &Gesture) -> bool {
        self.id == other.id
    }

    /// Returns the swipe payload, if this is a swipe.
    pub fn swipe(&self) -> Option<&SwipeGesture> {
        match &self.kind {
            GestureKind::Swipe(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the circle payload, if this is a circle.
    pub fn circle(&self) -> Option<&CircleGesture> {
        match &self.kind {
            GestureKind::Circle(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the screen-tap payload, if this is a screen tap.
    pub fn screen_tap(&self) -> Option<&ScreenTapGesture> {
        match &self.kind {
            GestureKind::ScreenTap(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the key-tap payload, if this is a key tap.
    pub fn key_tap(&self) -> Option<&KeyTapGesture> {
        match &self.kind {
            GestureKind::KeyTap(g) => Some(g),
            _ => None,
        }
    }
}

impl Default for Gesture {
    fn default() -> Self {
        INVALID_GESTURE.clone()
    }
}

impl PartialEq for Gesture {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_to(other)
    }
}

impl Eq for Gesture {}

impl Hash for Gesture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(seconds) = self.duration_seconds() else {
            return f.write_str("Invalid Gesture");
        };
        write!(
            f,
            "Gesture Id:{} type:{} state:{} duration:{:.3}s",
            self.id,
            self.gesture_type(),
            self.state,
            seconds
        )?;
        match &self.kind {
            GestureKind::Swipe(g) => write!(f, " direction:{} speed:{:.1}", g.direction, g.speed),
            GestureKind::Circle(g) => {
                write!(f, " center:{} radius:{:.1} progress:{:.2}", g.center, g.radius, g.progress)
            }
            GestureKind::ScreenTap(g) => write!(f, " position:{}", g.position),
            GestureKind::KeyTap(g) => write!(f, " position:{}", g.position),
            GestureKind::Generic => Ok(()),
        }
    }
}
