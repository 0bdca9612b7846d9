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

//! Registry of admission plugin factories.

use super::errors::{AdmissionError, AdmissionResult};
use super::interfaces::Interface;
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Factory builds a plugin instance from an optional configuration stream.
pub type Factory = fn(config: Option<&mut dyn Read>) -> AdmissionResult<Arc<dyn Interface>>;

/// Plugins maps plugin names to their factories.
#[derive(Default)]
pub struct Plugins {
    registry: RwLock<BTreeMap<String, Factory>>,
}

impl Plugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any earlier registration.
    pub fn register(&self, name: &str, factory: Factory) {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if registry.insert(name.to_string(), factory).is_some() {
            info!(plugin = name, "replaced admission plugin registration");
        } else {
            info!(plugin = name, "registered admission plugin");
        }
    }

    pub fn get_factory(&self, name: &str) -> Option<Factory> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.keys().cloned().collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.contains_key(name)
    }

    /// Build an instance of the named plugin.
    pub fn new_from_plugins(
        &self,
        name: &str,
        config: Option<&mut dyn Read>,
    ) -> AdmissionResult<Arc<dyn Interface>> {
        let factory = self
            .get_factory(name)
            .ok_or_else(|| AdmissionError::internal_error(format!("unknown admission plugin: {}", name)))?;
        factory(config)
    }
}
