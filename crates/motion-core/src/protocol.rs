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

//! Decoding of the JSON frame documents streamed by the tracking service.
//!
//! The wire shape is flat: every gesture object carries the union of all
//! per-type fields, and hands learn their fingers from each pointable's
//! `handId`. This module maps that shape onto the typed model.

use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::frame::Frame;
use crate::gesture::{
    CircleGesture, Gesture, GestureKind, GestureState, GestureType, KeyTapGesture,
    ScreenTapGesture, SwipeGesture,
};
use crate::hand::Hand;
use crate::ids::{FrameId, GestureId, HandId, PointableId};
use crate::math::Vec3;
use crate::pointable::{Pointable, PointableKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFrame {
    id: Option<i64>,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    hands: Vec<WireHand>,
    #[serde(default)]
    pointables: Vec<WirePointable>,
    #[serde(default)]
    gestures: Vec<WireGesture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireHand {
    id: i32,
    #[serde(default)]
    palm_position: Vec3,
    #[serde(default)]
    palm_normal: Vec3,
    #[serde(default)]
    direction: Vec3,
    #[serde(default)]
    palm_velocity: Vec3,
    #[serde(default)]
    sphere_radius: f32,
    time_visible: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePointable {
    id: i32,
    #[serde(default = "invalid_hand")]
    hand_id: i32,
    #[serde(default)]
    tool: bool,
    #[serde(default)]
    tip_position: Vec3,
    #[serde(default)]
    tip_velocity: Vec3,
    #[serde(default)]
    direction: Vec3,
    #[serde(default)]
    length: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    touch_distance: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGesture {
    id: i32,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    state: String,
    duration: Option<u64>,
    #[serde(default)]
    hand_ids: Vec<i32>,
    #[serde(default)]
    pointable_ids: Vec<i32>,
    #[serde(default)]
    direction: Vec3,
    #[serde(default)]
    position: Vec3,
    #[serde(default)]
    start_position: Vec3,
    #[serde(default)]
    speed: f32,
    #[serde(default)]
    center: Vec3,
    #[serde(default)]
    normal: Vec3,
    #[serde(default)]
    progress: f32,
    #[serde(default)]
    radius: f32,
}

fn invalid_hand() -> i32 {
    HandId::INVALID.get()
}

impl WireGesture {
    fn into_gesture(self) -> Gesture {
        let pointable_id = self
            .pointable_ids
            .first()
            .copied()
            .map(PointableId::new)
            .unwrap_or(PointableId::INVALID);

        let kind = match GestureType::from_wire(&self.kind) {
            GestureType::Swipe => GestureKind::Swipe(SwipeGesture {
                direction: self.direction,
                position: self.position,
                start_position: self.start_position,
                speed: self.speed,
                pointable_id,
            }),
            GestureType::Circle => GestureKind::Circle(CircleGesture {
                center: self.center,
                normal: self.normal,
                progress: self.progress,
                radius: self.radius,
                pointable_id,
            }),
            GestureType::ScreenTap => GestureKind::ScreenTap(ScreenTapGesture {
                position: self.position,
                direction: self.direction,
                progress: self.progress,
                pointable_id,
            }),
            GestureType::KeyTap => GestureKind::KeyTap(KeyTapGesture {
                position: self.position,
                direction: self.direction,
                progress: self.progress,
                pointable_id,
            }),
            GestureType::Invalid => {
                log::warn!(
                    "Gesture {} has unknown type '{}', decoding it as a generic gesture.",
                    self.id,
                    self.kind
                );
                GestureKind::Generic
            }
        };

        let mut gesture = Gesture::new(GestureId::new(self.id), kind)
            .with_state(GestureState::from_wire(&self.state))
            .with_hands(self.hand_ids.into_iter().map(HandId::new))
            .with_pointables(self.pointable_ids.into_iter().map(PointableId::new));
        gesture.duration = self.duration;
        gesture
    }
}

impl Frame {
    /// Decodes a frame from the JSON text sent by the tracking service.
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the text is not JSON, is not a frame
    /// object, or has fields of the wrong type.
    pub fn from_json(text: &str) -> Result<Frame, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Decodes a frame from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Frame, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::Malformed {
                field: "frame",
                reason: "is not a JSON object".to_string(),
            });
        }

        let wire: WireFrame = serde_json::from_value(value)?;
        let id = wire.id.ok_or_else(|| DecodeError::Malformed {
            field: "id",
            reason: "is missing".to_string(),
        })?;

        let mut frame = Frame::new(FrameId::new(id), wire.timestamp);

        for p in wire.pointables {
            let kind = if p.tool {
                PointableKind::Tool
            } else {
                PointableKind::Finger
            };
            frame = frame.with_pointable(Pointable {
                hand_id: HandId::new(p.hand_id),
                tip_velocity: p.tip_velocity,
                direction: p.direction,
                length: p.length,
                width: p.width,
                touch_distance: p.touch_distance,
                ..Pointable::new(PointableId::new(p.id), kind, p.tip_position)
            });
        }

        for h in wire.hands {
            let hand_id = HandId::new(h.id);
            let pointable_ids = frame
                .pointables
                .iter()
                .filter(|p| p.hand_id == hand_id)
                .map(|p| p.id)
                .collect();
            frame = frame.with_hand(Hand {
                palm_normal: h.palm_normal,
                direction: h.direction,
                palm_velocity: h.palm_velocity,
                sphere_radius: h.sphere_radius,
                time_visible: h.time_visible,
                pointable_ids,
                ..Hand::new(hand_id, h.palm_position)
            });
        }

        for g in wire.gestures {
            frame = frame.with_gesture(g.into_gesture());
        }

        log::debug!("Decoded {frame}");
        Ok(frame)
    }
}
