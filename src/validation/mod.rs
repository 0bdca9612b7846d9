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

//! Structural and update validation of API objects.
//!
//! Every entry point is a pure function of its inputs and a
//! [`ValidationConfig`]. Create validators take the new object; update
//! validators take the new and the previous object and never modify either.
//! All of them return an [`ErrorList`](crate::field::ErrorList) which is empty
//! when the object is acceptable.

pub mod cluster;
pub mod config;
pub mod container;
pub mod names;
pub mod objectmeta;
pub mod pod;
pub mod selectors;
pub mod volume;
pub mod workloads;

pub use cluster::{
    validate_config_map, validate_config_map_update, validate_namespace,
    validate_namespace_status_update, validate_namespace_update, validate_node,
    validate_node_status_update, validate_node_update, validate_service,
    validate_service_status_update, validate_service_update,
};
pub use config::{ConfigError, ValidationConfig};
pub use objectmeta::{
    validate_object_meta, validate_object_meta_accessor, validate_object_meta_update,
};
pub use pod::{validate_pod, validate_pod_spec, validate_pod_status_update, validate_pod_update};
pub use workloads::{
    validate_daemon_set, validate_daemon_set_status_update, validate_daemon_set_update,
    validate_deployment, validate_deployment_status_update, validate_deployment_update,
    validate_job, validate_job_status_update, validate_job_update, validate_pod_template_spec,
    validate_replica_set, validate_replica_set_status_update, validate_replica_set_update,
    validate_stateful_set, validate_stateful_set_status_update, validate_stateful_set_update,
};

use crate::api::meta::ObjectMeta;
use crate::field::ErrorList;
use tracing::debug;

pub(crate) fn log_validated(kind: &str, meta: &ObjectMeta, operation: &str, errors: &ErrorList) {
    debug!(
        kind,
        name = %meta.name,
        namespace = %meta.namespace,
        errors = errors.len(),
        "validated {}",
        operation
    );
}
