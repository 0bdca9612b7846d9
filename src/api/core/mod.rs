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

//! Core API types: pods and the cluster-level kinds.

use crate::api::meta::{ListMeta, ObjectMeta, ObjectReference, TypeMeta};
use crate::api::resource::Quantity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Constants
// ============================================================================

/// Default termination grace period applied by defaulting.
pub const DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS: i64 = 30;

/// Default active deadline applied by defaulting.
pub const DEFAULT_ACTIVE_DEADLINE_SECONDS: i64 = 36000;

/// Default file mode of a projected config map volume.
pub const CONFIG_MAP_VOLUME_SOURCE_DEFAULT_MODE: i64 = 0o644;

pub const DEFAULT_SCHEDULER_NAME: &str = "default-scheduler";

pub const DEPLOYMENT_KEY_PREFIX: &str = "deployment.carry.i/";
pub const SCHEDULER_KEY_PREFIX: &str = "scheduler.carry.i/";

/// Annotation naming the nodes a pod is bound to.
pub const BIND_NODES_ANNOTATION_KEY: &str = "scheduler.carry.i/bind_nodes";

pub const STATEFUL_SET_POD_NAME_LABEL: &str = "statefulset.carry.io/pod-name";
pub const CONTROLLER_REVISION_HASH_LABEL_KEY: &str = "controller-revision-hash";

// ============================================================================
// Shared enums and selectors
// ============================================================================

string_enum! {
    /// ConditionState is the status of a condition.
    pub enum ConditionState {
        True => "true",
        False => "false",
        Unknown => "unknown",
    }
}

string_enum! {
    /// Protocol is a network protocol of a port.
    pub enum Protocol {
        Tcp => "TCP",
        Udp => "UDP",
    }
}

string_enum! {
    /// LabelSelectorOperator relates a label key to a set of values.
    pub enum LabelSelectorOperator {
        In => "in",
        NotIn => "not_in",
        Exists => "exists",
        DoesNotExist => "does_not_exist",
    }
}

/// LabelSelector matches objects by their labels. An empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

impl LabelSelector {
    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }

    /// Returns true if `labels` satisfy every term of the selector.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.match_labels
            .iter()
            .all(|(k, v)| labels.get(k) == Some(v))
            && self.match_expressions.iter().all(|req| req.matches(labels))
    }
}

/// LabelSelectorRequirement is a single key/operator/values term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: LabelSelectorOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl LabelSelectorRequirement {
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            LabelSelectorOperator::In => value.map_or(false, |v| self.values.contains(v)),
            LabelSelectorOperator::NotIn => value.map_or(true, |v| !self.values.contains(v)),
            LabelSelectorOperator::Exists => value.is_some(),
            LabelSelectorOperator::DoesNotExist => value.is_none(),
            _ => false,
        }
    }
}

// ============================================================================
// Resource Types
// ============================================================================

/// Well-known resource names.
pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";

/// ResourceList maps a resource name to an amount.
pub type ResourceList = BTreeMap<String, Quantity>;

/// ResourceRequirements describes the compute resources of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: ResourceList,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: ResourceList,
}

// ============================================================================
// Pod Types
// ============================================================================

string_enum! {
    /// RestartPolicy describes how containers are restarted.
    pub enum RestartPolicy {
        Always => "always",
        OnFailure => "on_failure",
        Never => "never",
    }
}

string_enum! {
    /// PullPolicy describes a policy for if/when to pull a container image.
    pub enum PullPolicy {
        Always => "always",
        Never => "never",
        IfNotPresent => "if_not_present",
    }
}

string_enum! {
    pub enum PodPhase {
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Suspended => "suspended",
        Unknown => "unknown",
    }
}

string_enum! {
    pub enum PodConditionType {
        PodScheduled => "pod_scheduled",
        ContainersReady => "containers_ready",
        Installed => "installed",
        Initialized => "initialized",
        Ready => "ready",
        Unschedulable => "unschedulable",
    }
}

/// Pod is a group of containers scheduled together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pod {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
    pub status: PodStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<Pod>,
}

/// PodTemplateSpec describes the pods a workload creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodTemplateSpec {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

/// PodSpec is the desired state of a pod.
///
/// Containers run in stages: installation, init, main, and finally
/// uninstallation when the pod is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub installation_containers: Vec<Container>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uninstallation_containers: Vec<Container>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<Container>,
    pub containers: Vec<Container>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    pub restart_policy: RestartPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_deadline_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheduler_name: String,
}

impl PodSpec {
    /// Returns every container of every stage.
    pub fn all_containers(&self) -> impl Iterator<Item = &Container> {
        self.installation_containers
            .iter()
            .chain(self.init_containers.iter())
            .chain(self.containers.iter())
            .chain(self.uninstallation_containers.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodSecurityContext {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub run_as_user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub run_as_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
}

/// Container is a single application image run inside a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub image_pull_policy: PullPolicy,
    /// Directory the image is unpacked into on the node.
    pub image_deployment_dir: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub working_dir: String,
    pub command: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub termination_command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVarSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_ref: Option<ObjectFieldSelector>,
}

/// ObjectFieldSelector selects a field of the pod, e.g. `metadata.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectFieldSelector {
    pub field_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityContext {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub run_as_user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerPort {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub container_port: i32,
    pub protocol: Protocol,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sub_path: String,
}

/// Affinity holds pod scheduling constraints relative to other pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Affinity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_affinity: Option<PodAffinity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_anti_affinity: Option<PodAntiAffinity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodAffinity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<PodAffinityTerm>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodAntiAffinity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<PodAffinityTerm>,
}

/// PodAffinityTerm selects the pods a rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodAffinityTerm {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

/// Volume is a named source that containers can mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub name: String,
    #[serde(flatten)]
    pub source: VolumeSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,
}

/// ConfigMapVolumeSource projects the keys of a config map as files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMapVolumeSource {
    /// Name of the config map.
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<KeyToPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// KeyToPath maps a config map key to a relative file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyToPath {
    pub key: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodStatus {
    pub phase: PodPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taint_restarts: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<PodCondition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_statuses: Vec<ContainerStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub init_container_statuses: Vec<ContainerStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub installation_container_statuses: Vec<ContainerStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uninstallation_container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodCondition {
    #[serde(rename = "type")]
    pub condition_type: PodConditionType,
    pub state: ConditionState,
    pub last_probe_time: Option<DateTime<Utc>>,
    pub last_transition_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStatus {
    pub name: String,
    pub pid: Option<i64>,
    pub image: String,
    pub image_id: String,
    pub state: ContainerState,
    pub ready: bool,
    pub restart_count: i64,
}

/// ContainerState holds exactly one of the states when reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerState {
    pub waiting: Option<ContainerStateWaiting>,
    pub running: Option<ContainerStateRunning>,
    pub terminated: Option<ContainerStateTerminated>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStateWaiting {
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStateRunning {
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStateTerminated {
    pub exit_code: i32,
    pub signal: i32,
    pub reason: String,
    pub message: String,
    pub start_time: Option<DateTime<Utc>>,
    pub finish_time: Option<DateTime<Utc>>,
}

api_object!(Pod, "Pod");
api_list!(PodList, "PodList");

// ============================================================================
// Namespace
// ============================================================================

string_enum! {
    pub enum NamespacePhase {
        Active => "active",
        Terminating => "terminating",
    }
}

/// Namespace scopes the names of namespaced objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: NamespaceSpec,
    pub status: NamespaceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSpec {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceStatus {
    pub phase: NamespacePhase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<Namespace>,
}

api_object!(Namespace, "Namespace");
api_list!(NamespaceList, "NamespaceList");

// ============================================================================
// Node
// ============================================================================

string_enum! {
    pub enum NodePhase {
        Pending => "pending",
        Running => "running",
        Terminated => "terminated",
    }
}

string_enum! {
    pub enum NodeAddressType {
        HostName => "hostname",
        InternalIp => "internal_ip",
    }
}

string_enum! {
    pub enum NodeConditionType {
        Ready => "ready",
        MemoryPressure => "memory_pressure",
        DiskPressure => "disk_pressure",
        PidPressure => "pid_pressure",
    }
}

/// Node is a machine that runs pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: NodeSpec,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub unschedulable: bool,
    /// Resources the node offers for scheduling.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub capacity: ResourceList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    pub capacity: ResourceList,
    pub phase: NodePhase,
    pub conditions: Vec<NodeCondition>,
    pub addresses: Vec<NodeAddress>,
    pub node_info: NodeSystemInfo,
    pub images: Vec<ContainerImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerImage {
    pub names: Vec<String>,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub address_type: NodeAddressType,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSystemInfo {
    pub architecture: String,
    pub operating_system: String,
    pub kernel_version: String,
    pub carry_version: String,
    pub os_image: String,
    pub cpu: String,
    pub memory: i64,
    pub disk: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCondition {
    #[serde(rename = "type")]
    pub condition_type: NodeConditionType,
    pub state: ConditionState,
    pub last_probe_time: Option<DateTime<Utc>>,
    pub last_transition_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<Node>,
}

api_object!(Node, "Node");
api_list!(NodeList, "NodeList");

// ============================================================================
// Service
// ============================================================================

string_enum! {
    pub enum ServiceConditionType {
        Available => "available",
    }
}

/// Service exposes a set of pods behind stable ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: ServiceSpec,
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSpec {
    /// Labels of the pods traffic is routed to.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePort {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub address: String,
    pub port: i32,
    pub protocol: Protocol,
    pub target_port: i32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStatus {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ServiceCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCondition {
    #[serde(rename = "type")]
    pub condition_type: ServiceConditionType,
    pub state: ConditionState,
    pub last_probe_time: Option<DateTime<Utc>>,
    pub last_transition_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<Service>,
}

api_object!(Service, "Service");
api_list!(ServiceList, "ServiceList");

// ============================================================================
// ConfigMap
// ============================================================================

/// ConfigMap holds configuration data for pods to consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMap {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub binary_data: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMapList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<ConfigMap>,
}

api_object!(ConfigMap, "ConfigMap");
api_list!(ConfigMapList, "ConfigMapList");

// ============================================================================
// Event
// ============================================================================

/// Event is a report of something that happened to an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub involved_object: ObjectReference,
    pub count: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub reason: String,
    pub message: String,
    pub source: EventSource,
    pub first_time: Option<DateTime<Utc>>,
    pub last_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSource {
    pub component: String,
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<Event>,
}

api_object!(Event, "Event");
api_list!(EventList, "EventList");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::meta::{accessor, list_accessor, ApiObject, HasObjectMeta};

    #[test]
    fn test_string_enums() {
        assert_eq!(RestartPolicy::from_str("on_failure"), RestartPolicy::OnFailure);
        assert_eq!(RestartPolicy::from_str(""), RestartPolicy::Empty);
        assert_eq!(
            RestartPolicy::from_str("sometimes"),
            RestartPolicy::Other("sometimes".to_string())
        );
        assert_eq!(RestartPolicy::Other("sometimes".to_string()).as_str(), "sometimes");
        assert_eq!(PullPolicy::IfNotPresent.to_string(), "if_not_present");
        assert_eq!(Protocol::KNOWN, &["TCP", "UDP"]);
        assert!(PullPolicy::default().is_empty());
    }

    #[test]
    fn test_pod_serde() {
        let pod: Pod = serde_json::from_value(serde_json::json!({
            "kind": "Pod",
            "api_version": "carry.i/v1",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {
                "containers": [{
                    "name": "app",
                    "image": "registry/app:v1",
                    "image_pull_policy": "if_not_present",
                    "image_deployment_dir": "/opt/app",
                    "ports": [{"container_port": 8080, "protocol": "TCP"}],
                    "resources": {"limits": {"cpu": "500m", "memory": "1Gi"}}
                }],
                "volumes": [{"name": "cfg", "config_map": {"name": "app-config"}}],
                "restart_policy": "bogus"
            }
        }))
        .unwrap();

        assert_eq!(pod.type_meta.kind, "Pod");
        let ctr = &pod.spec.containers[0];
        assert_eq!(ctr.image_pull_policy, PullPolicy::IfNotPresent);
        assert_eq!(ctr.ports[0].protocol, Protocol::Tcp);
        assert_eq!(ctr.resources.limits["cpu"], Quantity::from_milli(500));
        assert_eq!(
            pod.spec.volumes[0].source.config_map.as_ref().map(|c| c.name.as_str()),
            Some("app-config")
        );
        assert_eq!(pod.spec.restart_policy, RestartPolicy::Other("bogus".to_string()));

        let value = serde_json::to_value(&pod).unwrap();
        assert_eq!(value["spec"]["restart_policy"], "bogus");
        let back: Pod = serde_json::from_value(value).unwrap();
        assert_eq!(back, pod);
    }

    #[test]
    fn test_label_selector_matches() {
        let labels: BTreeMap<String, String> =
            [("app".to_string(), "web".to_string()), ("tier".to_string(), "fe".to_string())]
                .into_iter()
                .collect();

        let mut selector = LabelSelector::default();
        assert!(selector.is_empty());
        assert!(selector.matches(&labels));

        selector.match_labels.insert("app".to_string(), "web".to_string());
        selector.match_expressions.push(LabelSelectorRequirement {
            key: "tier".to_string(),
            operator: LabelSelectorOperator::In,
            values: vec!["fe".to_string(), "be".to_string()],
        });
        assert!(selector.matches(&labels));

        selector.match_expressions.push(LabelSelectorRequirement {
            key: "canary".to_string(),
            operator: LabelSelectorOperator::Exists,
            values: vec![],
        });
        assert!(!selector.matches(&labels));
    }

    #[test]
    fn test_api_object_views() {
        let mut pod = Pod::default();
        pod.object_meta_mut().name = "web".to_string();
        let obj: &dyn ApiObject = &pod;
        assert_eq!(obj.kind(), "Pod");
        assert_eq!(accessor(obj).unwrap().name, "web");
        assert!(list_accessor(obj).is_err());
        assert!(obj.as_any().downcast_ref::<Pod>().is_some());

        let list = PodList::default();
        assert!(accessor(&list).is_err());
        assert!(list_accessor(&list).is_ok());
    }

    #[test]
    fn test_all_containers_order() {
        let named = |n: &str| Container {
            name: n.to_string(),
            ..Default::default()
        };
        let spec = PodSpec {
            installation_containers: vec![named("install")],
            init_containers: vec![named("init")],
            containers: vec![named("main")],
            uninstallation_containers: vec![named("uninstall")],
            ..Default::default()
        };
        let names: Vec<&str> = spec.all_containers().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["install", "init", "main", "uninstall"]);
    }
}
