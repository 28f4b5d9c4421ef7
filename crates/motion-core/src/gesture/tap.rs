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

//! Tap gestures. Both carry the same shape; they differ by the surface the
//! tap is aimed at.

use serde::{Deserialize, Serialize};

use crate::ids::PointableId;
use crate::math::Vec3;

/// A forward poke, as if touching a vertical screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTapGesture {
    /// Where the tap happened.
    pub position: Vec3,
    /// Direction of the tapping motion.
    pub direction: Vec3,
    /// Always `1.0` for a completed tap.
    pub progress: f32,
    /// The finger or tool that tapped.
    pub pointable_id: PointableId,
}

/// A downward tap, as if pressing a key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTapGesture {
    /// Where the tap happened.
    pub position: Vec3,
    /// Direction of the tapping motion.
    pub direction: Vec3,
    /// Always `1.0` for a completed tap.
    pub progress: f32,
    /// The finger or tool that tapped.
    pub pointable_id: PointableId,
}
