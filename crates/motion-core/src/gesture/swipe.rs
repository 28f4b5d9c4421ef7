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

use serde::{Deserialize, Serialize};

use crate::ids::PointableId;
use crate::math::Vec3;

/// A straight-line movement of a finger or tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeGesture {
    /// Unit direction of the swipe.
    pub direction: Vec3,
    /// Current position of the swiping pointable.
    pub position: Vec3,
    /// Position where the swipe began.
    pub start_position: Vec3,
    /// Speed of the pointable in millimetres per second.
    pub speed: f32,
    /// The finger or tool performing the swipe.
    pub pointable_id: PointableId,
}

impl SwipeGesture {
    /// Distance travelled since the swipe began.
    pub fn displacement(&self) -> Vec3 {
        self.position - self.start_position
    }
}
