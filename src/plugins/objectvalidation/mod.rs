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

//! ObjectValidation admission controller.
//!
//! Runs the structural validators of [`crate::validation`] on every CREATE
//! and UPDATE of a kind it knows. Writes to the `status` subresource get the
//! status-update rules; other subresources and unknown kinds are admitted
//! without inspection.

use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, Operation, Plugins,
    ValidationInterface,
};
use crate::api::apps::{DaemonSet, Deployment, Job, ReplicaSet, StatefulSet};
use crate::api::core::{ConfigMap, Namespace, Node, Pod, Service};
use crate::api::meta::ApiObject;
use crate::field::ErrorList;
use crate::validation::{self, ValidationConfig};
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Plugin name for the ObjectValidation admission controller.
pub const PLUGIN_NAME: &str = "ObjectValidation";

const STATUS_SUBRESOURCE: &str = "status";

/// Register the ObjectValidation plugin with the plugin registry.
///
/// The optional configuration is a JSON [`ValidationConfig`] document.
pub fn register(plugins: &Plugins) {
    plugins.register(PLUGIN_NAME, |config: Option<&mut dyn Read>| {
        let cfg = match config {
            Some(reader) => ValidationConfig::from_reader(reader).map_err(|err| {
                AdmissionError::bad_request(format!("invalid {} configuration: {}", PLUGIN_NAME, err))
            })?,
            None => ValidationConfig::default(),
        };
        info!(
            plugin = PLUGIN_NAME,
            annotation_limit = cfg.total_annotation_size_limit_bytes,
            max_duration_seconds = cfg.max_duration_seconds,
            "loaded validation configuration"
        );
        Ok(Arc::new(ObjectValidation::new(cfg)) as Arc<dyn Interface>)
    });
}

type CreateFn<T> = fn(&T, &ValidationConfig) -> ErrorList;
type UpdateFn<T> = fn(&T, &T, &ValidationConfig) -> ErrorList;

/// The validators of one kind.
struct KindValidators<T> {
    create: CreateFn<T>,
    update: UpdateFn<T>,
    status_update: UpdateFn<T>,
}

/// ObjectValidation rejects objects that fail structural or update validation.
pub struct ObjectValidation {
    handler: Handler,
    config: ValidationConfig,
}

impl ObjectValidation {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            handler: Handler::new_create_update(),
            config,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run the validators of the request kind. Returns `None` for kinds
    /// without validators.
    fn validate_kind(&self, attributes: &dyn Attributes) -> Option<AdmissionResult<ErrorList>> {
        let result = match attributes.get_kind().kind.as_str() {
            "Pod" => self.run(
                attributes,
                KindValidators::<Pod> {
                    create: validation::validate_pod,
                    update: validation::validate_pod_update,
                    status_update: validation::validate_pod_status_update,
                },
            ),
            "StatefulSet" => self.run(
                attributes,
                KindValidators::<StatefulSet> {
                    create: validation::validate_stateful_set,
                    update: validation::validate_stateful_set_update,
                    status_update: validation::validate_stateful_set_status_update,
                },
            ),
            "Deployment" => self.run(
                attributes,
                KindValidators::<Deployment> {
                    create: validation::validate_deployment,
                    update: validation::validate_deployment_update,
                    status_update: validation::validate_deployment_status_update,
                },
            ),
            "ReplicaSet" => self.run(
                attributes,
                KindValidators::<ReplicaSet> {
                    create: validation::validate_replica_set,
                    update: validation::validate_replica_set_update,
                    status_update: validation::validate_replica_set_status_update,
                },
            ),
            "DaemonSet" => self.run(
                attributes,
                KindValidators::<DaemonSet> {
                    create: validation::validate_daemon_set,
                    update: validation::validate_daemon_set_update,
                    status_update: validation::validate_daemon_set_status_update,
                },
            ),
            "Job" => self.run(
                attributes,
                KindValidators::<Job> {
                    create: validation::validate_job,
                    update: validation::validate_job_update,
                    status_update: validation::validate_job_status_update,
                },
            ),
            "Namespace" => self.run(
                attributes,
                KindValidators::<Namespace> {
                    create: validation::validate_namespace,
                    update: validation::validate_namespace_update,
                    status_update: validation::validate_namespace_status_update,
                },
            ),
            "Node" => self.run(
                attributes,
                KindValidators::<Node> {
                    create: validation::validate_node,
                    update: validation::validate_node_update,
                    status_update: validation::validate_node_status_update,
                },
            ),
            // Config maps have no status.
            "ConfigMap" => self.run(
                attributes,
                KindValidators::<ConfigMap> {
                    create: validation::validate_config_map,
                    update: validation::validate_config_map_update,
                    status_update: validation::validate_config_map_update,
                },
            ),
            "Service" => self.run(
                attributes,
                KindValidators::<Service> {
                    create: validation::validate_service,
                    update: validation::validate_service_update,
                    status_update: validation::validate_service_status_update,
                },
            ),
            _ => return None,
        };
        Some(result)
    }

    fn run<T: 'static>(
        &self,
        attributes: &dyn Attributes,
        validators: KindValidators<T>,
    ) -> AdmissionResult<ErrorList> {
        let kind = attributes.get_kind().kind.as_str();
        let object = downcast::<T>(attributes.get_object(), kind)?;

        match attributes.get_operation() {
            Operation::Update => {
                let old_object = downcast::<T>(attributes.get_old_object(), kind)?;
                if attributes.get_subresource() == STATUS_SUBRESOURCE {
                    Ok((validators.status_update)(object, old_object, &self.config))
                } else {
                    Ok((validators.update)(object, old_object, &self.config))
                }
            }
            _ => Ok((validators.create)(object, &self.config)),
        }
    }
}

impl Default for ObjectValidation {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

fn downcast<'a, T: 'static>(object: Option<&'a dyn ApiObject>, kind: &str) -> AdmissionResult<&'a T> {
    object
        .and_then(|obj| obj.as_any().downcast_ref::<T>())
        .ok_or_else(|| {
            AdmissionError::bad_request(format!(
                "Resource was marked with kind {} but was unable to be converted",
                kind
            ))
        })
}

impl Interface for ObjectValidation {
    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }

    fn validator(&self) -> Option<&dyn ValidationInterface> {
        Some(self)
    }
}

impl ValidationInterface for ObjectValidation {
    fn validate(&self, attributes: &dyn Attributes) -> AdmissionResult<()> {
        let operation = attributes.get_operation();
        let kind = attributes.get_kind().kind.as_str();
        let subresource = attributes.get_subresource();

        if !self.handles(operation) {
            debug!(%operation, kind, "operation not handled, skipping");
            return Ok(());
        }
        if !subresource.is_empty() && subresource != STATUS_SUBRESOURCE {
            debug!(kind, subresource, "subresource not validated, skipping");
            return Ok(());
        }

        let errs = match self.validate_kind(attributes) {
            Some(result) => result?,
            None => {
                debug!(kind, "no validator for kind, skipping");
                return Ok(());
            }
        };

        match AdmissionError::invalid(kind, attributes.get_name(), &errs) {
            Some(err) => {
                warn!(
                    %operation,
                    kind,
                    name = attributes.get_name(),
                    namespace = attributes.get_namespace(),
                    errors = errs.len(),
                    "rejected object"
                );
                Err(err)
            }
            None => Ok(()),
        }
    }
}
