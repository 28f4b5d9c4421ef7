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

//! Strongly-typed identifiers for tracked entities.
//!
//! The tracking service assigns integer ids. A tracked entity keeps its id
//! for as long as it stays in view, so ids are the only identity key across
//! frames. Negative values mean "no such entity".

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! tracking_id {
    ($(#[$meta:meta])* $name:ident($repr:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($repr);

        impl $name {
            /// The id reported for entities that do not exist.
            pub const INVALID: Self = Self(-1);

            /// Wraps a raw id as reported by the tracking service.
            #[inline]
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// Returns the raw integer value.
            #[inline]
            pub const fn get(self) -> $repr {
                self.0
            }

            /// Returns `true` if the id refers to a real entity.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

tracking_id!(
    /// Identifies a frame. Frame ids increase monotonically.
    FrameId(i64)
);
tracking_id!(
    /// Identifies a tracked hand.
    HandId(i32)
);
tracking_id!(
    /// Identifies a tracked finger or tool.
    PointableId(i32)
);
tracking_id!(
    /// Identifies a gesture for its whole multi-frame lifetime.
    GestureId(i32)
);
