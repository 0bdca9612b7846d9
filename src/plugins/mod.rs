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

//! Admission plugins.

pub mod objectvalidation;

use crate::admission::Plugins;

/// All plugins in execution order.
pub const ALL_ORDERED_PLUGINS: &[&str] = &[objectvalidation::PLUGIN_NAME];

/// Plugins enabled unless switched off.
pub const DEFAULT_ON_PLUGINS: &[&str] = &[objectvalidation::PLUGIN_NAME];

/// Register every plugin of this crate.
pub fn register_all_admission_plugins(plugins: &Plugins) {
    objectvalidation::register(plugins);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_admission_plugins() {
        let plugins = Plugins::new();
        register_all_admission_plugins(&plugins);
        let mut registered = plugins.registered_names();
        registered.sort();
        let mut ordered: Vec<String> = ALL_ORDERED_PLUGINS.iter().map(|s| s.to_string()).collect();
        ordered.sort();
        assert_eq!(registered, ordered);
        assert!(DEFAULT_ON_PLUGINS.iter().all(|name| plugins.is_registered(name)));
    }
}
