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

//! # Motion Core
//!
//! Typed object model for the data a motion-tracking device reports each
//! sampling interval: frames, hands, pointables (fingers and tools) and the
//! gestures recognized over them.
//!
//! Every type here is a plain value. The tracking service produces the data;
//! this crate only gives it a static shape, plus a decoder for the JSON the
//! service streams.

#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod gesture;
pub mod hand;
pub mod ids;
pub mod math;
pub mod pointable;
pub mod protocol;

pub use error::DecodeError;
pub use frame::Frame;
pub use gesture::{
    CircleGesture, Gesture, GestureKind, GestureState, GestureType, KeyTapGesture,
    ScreenTapGesture, SwipeGesture,
};
pub use hand::Hand;
pub use ids::{FrameId, GestureId, HandId, PointableId};
pub use math::Vec3;
pub use pointable::{Pointable, PointableKind};
