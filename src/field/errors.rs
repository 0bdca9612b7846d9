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

//! Field-level validation errors.

use super::path::FieldPath;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// ErrorKind is a machine-readable classification of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A requested value could not be found (e.g. an unknown volume name).
    #[serde(rename = "field_value_not_found")]
    NotFound,
    /// A required value was not provided.
    #[serde(rename = "field_value_required")]
    Required,
    /// A value that must be unique collides with another.
    #[serde(rename = "field_value_duplicate")]
    Duplicate,
    /// A value is malformed or out of bounds.
    #[serde(rename = "field_value_invalid")]
    Invalid,
    /// A value is not one of an enumerated set.
    #[serde(rename = "field_value_not_supported")]
    NotSupported,
    /// A well-formed value is not permitted under current conditions.
    #[serde(rename = "field_value_forbidden")]
    Forbidden,
    /// A value is too long. The value itself is never rendered.
    #[serde(rename = "field_value_too_long")]
    TooLong,
    /// A list has too many items.
    #[serde(rename = "field_value_too_many")]
    TooMany,
    /// A failure unrelated to user input.
    #[serde(rename = "internal_error")]
    Internal,
    /// A value did not match the schema type of its field.
    #[serde(rename = "field_value_type_invalid")]
    TypeInvalid,
}

impl ErrorKind {
    /// Returns the machine-readable code of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "field_value_not_found",
            ErrorKind::Required => "field_value_required",
            ErrorKind::Duplicate => "field_value_duplicate",
            ErrorKind::Invalid => "field_value_invalid",
            ErrorKind::NotSupported => "field_value_not_supported",
            ErrorKind::Forbidden => "field_value_forbidden",
            ErrorKind::TooLong => "field_value_too_long",
            ErrorKind::TooMany => "field_value_too_many",
            ErrorKind::Internal => "internal_error",
            ErrorKind::TypeInvalid => "field_value_type_invalid",
        }
    }

    /// Returns the canonical human-readable label of this kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Required => "required value",
            ErrorKind::Duplicate => "duplicate value",
            ErrorKind::Invalid => "invalid value",
            ErrorKind::NotSupported => "unsupported value",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::TooLong => "too long",
            ErrorKind::TooMany => "too many",
            ErrorKind::Internal => "internal error",
            ErrorKind::TypeInvalid => "invalid value",
        }
    }

    /// Returns a predicate matching errors of this kind, for use with [`ErrorList::filter`].
    pub fn matcher(self) -> impl Fn(&FieldError) -> bool {
        move |err| err.kind == self
    }

    fn renders_value(&self) -> bool {
        !matches!(
            self,
            ErrorKind::Required | ErrorKind::Forbidden | ErrorKind::TooLong | ErrorKind::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// BadValue is the offending value carried by a field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadValue {
    /// No value is shown for this error.
    Omitted,
    /// The field was unset.
    Null,
    Int(i64),
    Bool(bool),
    /// A string value, rendered quoted.
    Str(String),
    /// A pre-rendered structured value, shown verbatim.
    Text(String),
}

impl BadValue {
    /// Render a structured value through its `Debug` form.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        BadValue::Text(format!("{:?}", value))
    }
}

impl fmt::Display for BadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadValue::Omitted => Ok(()),
            BadValue::Null => f.write_str("null"),
            BadValue::Int(v) => write!(f, "{}", v),
            BadValue::Bool(v) => write!(f, "{}", v),
            BadValue::Str(v) => write!(f, "{:?}", v),
            BadValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for BadValue {
    fn from(v: &str) -> Self {
        BadValue::Str(v.to_string())
    }
}

impl From<String> for BadValue {
    fn from(v: String) -> Self {
        BadValue::Str(v)
    }
}

impl From<&String> for BadValue {
    fn from(v: &String) -> Self {
        BadValue::Str(v.clone())
    }
}

impl From<i64> for BadValue {
    fn from(v: i64) -> Self {
        BadValue::Int(v)
    }
}

impl From<i32> for BadValue {
    fn from(v: i32) -> Self {
        BadValue::Int(i64::from(v))
    }
}

impl From<usize> for BadValue {
    fn from(v: usize) -> Self {
        BadValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for BadValue {
    fn from(v: bool) -> Self {
        BadValue::Bool(v)
    }
}

impl<T: Into<BadValue>> From<Option<T>> for BadValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => BadValue::Null,
        }
    }
}

/// FieldError is a located, classified validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub field: String,
    #[serde(skip)]
    pub bad_value: BadValue,
    pub detail: String,
}

impl FieldError {
    fn new(kind: ErrorKind, path: &FieldPath, bad_value: BadValue, detail: impl Into<String>) -> Self {
        Self {
            kind,
            field: path.to_string(),
            bad_value,
            detail: detail.into(),
        }
    }

    /// Returns the message without the leading field name.
    pub fn body(&self) -> String {
        let mut s = if !self.kind.renders_value() || self.bad_value == BadValue::Omitted {
            self.kind.label().to_string()
        } else {
            format!("{}: {}", self.kind.label(), self.bad_value)
        };
        if !self.detail.is_empty() {
            s.push_str(": ");
            s.push_str(&self.detail);
        }
        s
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.body())
    }
}

impl std::error::Error for FieldError {}

/// A requested value was not found.
pub fn not_found(path: &FieldPath, value: impl Into<BadValue>) -> FieldError {
    FieldError::new(ErrorKind::NotFound, path, value.into(), "")
}

/// A required value is missing.
pub fn required(path: &FieldPath, detail: &str) -> FieldError {
    FieldError::new(ErrorKind::Required, path, BadValue::Omitted, detail)
}

/// A value collides with another that must be unique.
pub fn duplicate(path: &FieldPath, value: impl Into<BadValue>) -> FieldError {
    FieldError::new(ErrorKind::Duplicate, path, value.into(), "")
}

/// A value is malformed.
pub fn invalid(path: &FieldPath, value: impl Into<BadValue>, detail: &str) -> FieldError {
    FieldError::new(ErrorKind::Invalid, path, value.into(), detail)
}

/// A value is not one of `valid_values`.
pub fn not_supported(path: &FieldPath, value: impl Into<BadValue>, valid_values: &[&str]) -> FieldError {
    let detail = if valid_values.is_empty() {
        String::new()
    } else {
        format!(
            "supported values: {}",
            valid_values
                .iter()
                .map(|v| format!("{:?}", v))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    FieldError::new(ErrorKind::NotSupported, path, value.into(), detail)
}

/// A value is not permitted under current conditions.
pub fn forbidden(path: &FieldPath, detail: &str) -> FieldError {
    FieldError::new(ErrorKind::Forbidden, path, BadValue::Omitted, detail)
}

/// A value exceeds `max_bytes`.
pub fn too_long(path: &FieldPath, value: impl Into<BadValue>, max_bytes: usize) -> FieldError {
    FieldError::new(
        ErrorKind::TooLong,
        path,
        value.into(),
        format!("must have at most {} bytes", max_bytes),
    )
}

/// A list holds more than `max` items. Unknown quantities are passed as `None`.
pub fn too_many(path: &FieldPath, actual: Option<usize>, max: Option<usize>) -> FieldError {
    let detail = match max {
        Some(max) => format!("must have at most {} items", max),
        None => "has too many items".to_string(),
    };
    let value = match actual {
        Some(actual) => BadValue::from(actual),
        None => BadValue::Omitted,
    };
    FieldError::new(ErrorKind::TooMany, path, value, detail)
}

/// A failure not caused by user input.
pub fn internal(path: &FieldPath, err: &dyn std::error::Error) -> FieldError {
    FieldError::new(ErrorKind::Internal, path, BadValue::Null, err.to_string())
}

/// A value does not match the schema type of its field.
pub fn type_invalid(path: &FieldPath, value: impl Into<BadValue>, detail: &str) -> FieldError {
    FieldError::new(ErrorKind::TypeInvalid, path, value.into(), detail)
}

/// ErrorList is an ordered collection of field errors.
///
/// An empty list means the object is admissible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    /// Append every error of `other`, preserving its order.
    pub fn append(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Convert into an aggregate, dropping errors whose rendered message was
    /// already seen. Returns `None` for an empty list.
    pub fn to_aggregate(&self) -> Option<Aggregate> {
        if self.0.is_empty() {
            return None;
        }
        let mut seen = HashSet::new();
        let errors: Vec<FieldError> = self
            .0
            .iter()
            .filter(|err| seen.insert(err.to_string()))
            .cloned()
            .collect();
        Some(Aggregate { errors })
    }

    /// Remove every error matched by any of `matchers`, preserving order.
    pub fn filter(&self, matchers: &[&dyn Fn(&FieldError) -> bool]) -> ErrorList {
        ErrorList(
            self.0
                .iter()
                .filter(|err| !matchers.iter().any(|m| m(err)))
                .cloned()
                .collect(),
        )
    }
}

impl From<Vec<FieldError>> for ErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for ErrorList {
    type Output = FieldError;

    fn index(&self, index: usize) -> &FieldError {
        &self.0[index]
    }
}

/// Aggregate is a de-duplicated, non-empty set of field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    errors: Vec<FieldError>,
}

impl Aggregate {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{}", only);
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", messages.join(", "))
    }
}

impl std::error::Error for Aggregate {}
