// Copyright 2024 The Kubernetes Authors.
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

//! Admission error types.

use crate::field::{Aggregate, ErrorList};
use thiserror::Error;

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents errors that can occur during admission.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// BadRequest indicates a malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// Invalid carries the field errors that rejected an object.
    #[error("{kind} \"{name}\" is invalid: {errors}")]
    Invalid {
        kind: String,
        name: String,
        errors: Aggregate,
    },

    /// Internal represents an internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdmissionError {
    /// Create a new BadRequest error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AdmissionError::BadRequest(msg.into())
    }

    /// Create an Invalid error from the errors of a validation run.
    /// Returns `None` when `errors` is empty.
    pub fn invalid(kind: impl Into<String>, name: impl Into<String>, errors: &ErrorList) -> Option<Self> {
        errors.to_aggregate().map(|errors| AdmissionError::Invalid {
            kind: kind.into(),
            name: name.into(),
            errors,
        })
    }

    /// Create an Internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        AdmissionError::Internal(msg.into())
    }
}
