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

//! Validation of Namespace, Node, ConfigMap and Service.

use super::config::ValidationConfig;
use super::container::{validate_protocol, validate_resource_list};
use super::log_validated;
use super::names::{
    is_config_map_key, is_valid_port_num, name_is_dns_label, name_is_dns_subdomain,
    validate_dns1123_label, validate_namespace_name, validate_node_name,
};
use super::objectmeta::{
    validate_annotations, validate_labels, validate_object_meta, validate_object_meta_update,
};
use crate::api::core::{ConfigMap, Namespace, Node, Service, ServiceSpec};
use crate::field::{duplicate, invalid, required, too_long, ErrorList, FieldPath};
use std::collections::BTreeSet;

/// Maximum summed size of the keys and values of a config map.
pub const CONFIG_MAP_MAX_SIZE_BYTES: usize = 1024 * 1024;

fn metadata_path() -> FieldPath {
    FieldPath::new("metadata")
}

// ============================================================================
// Namespace
// ============================================================================

pub fn validate_namespace(namespace: &Namespace, cfg: &ValidationConfig) -> ErrorList {
    let all_errs = validate_object_meta(
        &namespace.metadata,
        false,
        validate_namespace_name,
        &metadata_path(),
        cfg,
    );
    log_validated("Namespace", &namespace.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_namespace_update(
    new_namespace: &Namespace,
    old_namespace: &Namespace,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_object_meta_update(
        &new_namespace.metadata,
        &old_namespace.metadata,
        &metadata_path(),
        cfg,
    );
    log_validated("Namespace", &new_namespace.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_namespace_status_update(
    new_namespace: &Namespace,
    old_namespace: &Namespace,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_object_meta_update(
        &new_namespace.metadata,
        &old_namespace.metadata,
        &metadata_path(),
        cfg,
    );
    log_validated("Namespace", &new_namespace.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// Node
// ============================================================================

/// Nodes are cluster-scoped. Capacity must name known resources.
pub fn validate_node(node: &Node, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs =
        validate_object_meta(&node.metadata, false, validate_node_name, &metadata_path(), cfg);
    all_errs.append(validate_resource_list(
        &node.spec.capacity,
        &FieldPath::new("spec").child("capacity"),
        cfg,
    ));
    log_validated("Node", &node.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_node_update(new_node: &Node, old_node: &Node, cfg: &ValidationConfig) -> ErrorList {
    let all_errs =
        validate_object_meta_update(&new_node.metadata, &old_node.metadata, &metadata_path(), cfg);
    log_validated("Node", &new_node.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_node_status_update(
    new_node: &Node,
    old_node: &Node,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs =
        validate_object_meta_update(&new_node.metadata, &old_node.metadata, &metadata_path(), cfg);
    log_validated("Node", &new_node.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// ConfigMap
// ============================================================================

/// Keys of `data` and `binary_data` must be valid and disjoint, and the whole
/// payload must fit in [`CONFIG_MAP_MAX_SIZE_BYTES`].
pub fn validate_config_map(config_map: &ConfigMap, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_object_meta(
        &config_map.metadata,
        true,
        name_is_dns_subdomain,
        &metadata_path(),
        cfg,
    );

    let data_path = FieldPath::new("data");
    let binary_data_path = FieldPath::new("binary_data");
    let mut total_size = 0usize;

    for (key, value) in &config_map.data {
        for msg in is_config_map_key(key) {
            all_errs.push(invalid(&data_path, key, &msg));
        }
        total_size += key.len() + value.len();
    }
    for (key, value) in &config_map.binary_data {
        for msg in is_config_map_key(key) {
            all_errs.push(invalid(&binary_data_path, key, &msg));
        }
        if config_map.data.contains_key(key) {
            all_errs.push(invalid(&binary_data_path, key, "duplicate of key present in data"));
        }
        total_size += key.len() + value.len();
    }
    if total_size > CONFIG_MAP_MAX_SIZE_BYTES {
        all_errs.push(too_long(&data_path, "", CONFIG_MAP_MAX_SIZE_BYTES));
    }

    log_validated("ConfigMap", &config_map.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_config_map_update(
    new_config_map: &ConfigMap,
    old_config_map: &ConfigMap,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_object_meta_update(
        &new_config_map.metadata,
        &old_config_map.metadata,
        &metadata_path(),
        cfg,
    );
    log_validated("ConfigMap", &new_config_map.metadata, "update", &all_errs);
    all_errs
}

// ============================================================================
// Service
// ============================================================================

/// Validate a service spec. Port names are optional for a single port and
/// required once there are several.
pub fn validate_service_spec(spec: &ServiceSpec, path: &FieldPath, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let ports_path = path.child("ports");
    let require_name = spec.ports.len() > 1;
    let mut port_names = BTreeSet::new();

    for (i, port) in spec.ports.iter().enumerate() {
        let idx_path = ports_path.index(i);
        let name_path = idx_path.child("name");

        if port.name.is_empty() {
            if require_name {
                all_errs.push(required(&name_path, ""));
            }
        } else {
            all_errs.append(validate_dns1123_label(&port.name, &name_path));
            if !port_names.insert(port.name.as_str()) {
                all_errs.push(duplicate(&name_path, &port.name));
            }
        }

        for msg in is_valid_port_num(port.port) {
            all_errs.push(invalid(&idx_path.child("port"), port.port, &msg));
        }
        // Zero leaves the target port unset.
        if port.target_port != 0 {
            for msg in is_valid_port_num(port.target_port) {
                all_errs.push(invalid(&idx_path.child("target_port"), port.target_port, &msg));
            }
        }
        all_errs.append(validate_protocol(&port.protocol, &idx_path.child("protocol")));
        all_errs.append(validate_annotations(&port.annotations, &idx_path.child("annotations"), cfg));
    }

    all_errs.append(validate_labels(&spec.selector, &path.child("selector")));
    all_errs
}

pub fn validate_service(service: &Service, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_object_meta(
        &service.metadata,
        true,
        name_is_dns_label,
        &metadata_path(),
        cfg,
    );
    all_errs.append(validate_service_spec(&service.spec, &FieldPath::new("spec"), cfg));
    log_validated("Service", &service.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_service_update(
    new_service: &Service,
    old_service: &Service,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_object_meta_update(
        &new_service.metadata,
        &old_service.metadata,
        &metadata_path(),
        cfg,
    );
    all_errs.append(validate_service_spec(&new_service.spec, &FieldPath::new("spec"), cfg));
    log_validated("Service", &new_service.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_service_status_update(
    new_service: &Service,
    old_service: &Service,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_object_meta_update(
        &new_service.metadata,
        &old_service.metadata,
        &metadata_path(),
        cfg,
    );
    log_validated("Service", &new_service.metadata, "status update", &all_errs);
    all_errs
}
