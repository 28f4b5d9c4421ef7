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

//! Errors raised while decoding tracking data.

use thiserror::Error;

/// An error produced when a frame document from the tracking service cannot
/// be turned into the typed model.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not valid JSON, or a field has the wrong JSON type.
    #[error("invalid frame JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is well-formed JSON but not a frame.
    #[error("malformed frame: field '{field}' {reason}")]
    Malformed {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
