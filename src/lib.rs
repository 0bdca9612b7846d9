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

//! Admission-time validation for carry API objects.
//!
//! [`validation`] holds the validators: pure functions from an object (and,
//! for updates, its previous version) to an [`ErrorList`] of located field
//! errors. [`plugins::objectvalidation`] wires them into the admission
//! [`Interface`] so a request carrying any known kind can be checked.

pub mod admission;
pub mod api;
pub mod field;
pub mod plugins;
pub mod validation;

pub use admission::{Attributes, Handler, Interface, Operation, ValidationInterface};
pub use field::{ErrorKind, ErrorList, FieldError, FieldPath};
pub use validation::ValidationConfig;
