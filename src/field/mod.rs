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

//! Located validation errors.
//!
//! Every validator receives the [`FieldPath`] of the value it checks, extends
//! it while descending, and reports failures as [`FieldError`]s appended to an
//! [`ErrorList`]. Errors are data; validators keep checking after a failure.

mod errors;
mod path;

pub use errors::{
    duplicate, forbidden, internal, invalid, not_found, not_supported, required, too_long,
    too_many, type_invalid, Aggregate, BadValue, ErrorKind, ErrorList, FieldError,
};
pub use path::FieldPath;
