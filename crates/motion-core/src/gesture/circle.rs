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
use crate::math::{Vec3, PI};

/// A finger or tool tracing a circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleGesture {
    /// Center of the circle.
    pub center: Vec3,
    /// Normal of the plane the circle lies in.
    pub normal: Vec3,
    /// Number of turns traced so far; `1.5` is one and a half circles.
    pub progress: f32,
    /// Radius in millimetres.
    pub radius: f32,
    /// The finger or tool tracing the circle.
    pub pointable_id: PointableId,
}

impl CircleGesture {
    /// Whole turns completed so far.
    pub fn completed_turns(&self) -> u32 {
        self.progress.max(0.0).floor() as u32
    }

    /// Whether the circle is traced clockwise, judged against the direction
    /// the tracing pointable is pointing in.
    pub fn is_clockwise(&self, pointable_direction: Vec3) -> bool {
        pointable_direction.angle_to(self.normal) <= PI / 2.0
    }
}
