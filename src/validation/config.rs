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

//! Validator configuration.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use thiserror::Error;

/// Default cap on the summed size of all annotation keys and values.
pub const TOTAL_ANNOTATION_SIZE_LIMIT_BYTES: usize = 256 * (1 << 10);

/// ConfigError is returned when a configuration document cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read validation config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse validation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid validation config: {0}")]
    Invalid(String),
}

/// ValidationConfig carries the tunable limits used by the validators.
///
/// Every field has a default, so an empty JSON object is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum summed byte length of annotation keys and values.
    pub total_annotation_size_limit_bytes: usize,
    /// Kinds that may not appear in an owner reference, compared case-insensitively.
    pub banned_owner_kinds: BTreeSet<String>,
    /// Resource names accepted in limits, requests and node capacity.
    pub resource_names: Vec<String>,
    /// Lower bound of grace-period and deadline fields.
    pub min_duration_seconds: i64,
    /// Upper bound of grace-period and deadline fields.
    pub max_duration_seconds: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            total_annotation_size_limit_bytes: TOTAL_ANNOTATION_SIZE_LIMIT_BYTES,
            banned_owner_kinds: ["event".to_string()].into_iter().collect(),
            resource_names: vec!["cpu".to_string(), "memory".to_string()],
            min_duration_seconds: 1,
            max_duration_seconds: i64::from(i32::MAX),
        }
    }
}

impl ValidationConfig {
    /// Parse a JSON configuration document.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ConfigError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(&buf)?;
        config.check()?;
        Ok(config)
    }

    /// Returns true if `kind` may not own other objects.
    pub fn is_banned_owner(&self, kind: &str) -> bool {
        let kind = kind.to_lowercase();
        self.banned_owner_kinds
            .iter()
            .any(|banned| banned.to_lowercase() == kind)
    }

    /// Returns true if `name` is an accepted resource name.
    pub fn is_known_resource(&self, name: &str) -> bool {
        self.resource_names.iter().any(|r| r == name)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.min_duration_seconds > self.max_duration_seconds {
            return Err(ConfigError::Invalid(format!(
                "min_duration_seconds ({}) is greater than max_duration_seconds ({})",
                self.min_duration_seconds, self.max_duration_seconds
            )));
        }
        if self.resource_names.iter().any(|r| r.is_empty()) {
            return Err(ConfigError::Invalid(
                "resource_names must not contain an empty name".to_string(),
            ));
        }
        Ok(())
    }
}
