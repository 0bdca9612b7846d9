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

//! Pod validation.
//!
//! [`validate_pod`] checks a new pod. [`validate_pod_update`] checks a pod
//! against its previous version: apart from metadata, only container images,
//! a shrinking `active_deadline_seconds` and a legacy grace period fix-up
//! may change. Everything else in the pod spec is compared after copying the
//! permitted fields over from the old spec.

use super::config::ValidationConfig;
use super::log_validated;
use super::container::{
    validate_container_updates, validate_containers, validate_names_unique_across,
    with_images_from,
};
use super::names::{inclusive_range_error, validate_pod_name, validate_node_name};
use super::objectmeta::{validate_labels, validate_object_meta, validate_object_meta_update};
use super::selectors::validate_affinity;
use super::volume::validate_volumes;
use crate::api::core::{Pod, PodSpec, RestartPolicy};
use crate::field::{forbidden, invalid, not_supported, required, BadValue, ErrorList, FieldPath};
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;
use std::fmt::{Debug, Write};
use tracing::trace;

const POD_UPDATE_FORBIDDEN_MSG: &str = "pod updates may not change fields other than \
`spec.containers[*].image`, `spec.init_containers[*].image`, \
`spec.installation_containers[*].image`, `spec.uninstallation_containers[*].image`, \
`spec.active_deadline_seconds` or `spec.termination_grace_period_seconds` \
(allow it to be set to 1 if it was previously negative)";

/// Validate a new pod.
pub fn validate_pod(pod: &Pod, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_object_meta(
        &pod.metadata,
        true,
        validate_pod_name,
        &FieldPath::new("metadata"),
        cfg,
    );
    all_errs.append(validate_pod_spec(&pod.spec, &FieldPath::new("spec"), cfg));

    log_validated("Pod", &pod.metadata, "create", &all_errs);
    all_errs
}

/// Validate a pod spec rooted at `path`.
///
/// Volumes are checked first so that volume mounts can be resolved. The main
/// container list must not be empty; the other three lists are optional.
/// Container names are unique across all four lists.
pub fn validate_pod_spec(spec: &PodSpec, path: &FieldPath, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = ErrorList::new();

    let (volumes, errs) = validate_volumes(&spec.volumes, &path.child("volumes"));
    all_errs.append(errs);

    let containers_path = path.child("containers");
    if spec.containers.is_empty() {
        all_errs.push(required(&containers_path, ""));
    } else {
        all_errs.append(validate_containers(&spec.containers, &volumes, &containers_path, cfg));
    }

    let mut seen: BTreeSet<&str> = spec.containers.iter().map(|c| c.name.as_str()).collect();
    let stages = [
        (&spec.init_containers, "init_containers"),
        (&spec.installation_containers, "installation_containers"),
        (&spec.uninstallation_containers, "uninstallation_containers"),
    ];
    for (containers, field) in stages {
        let stage_path = path.child(field);
        if !containers.is_empty() {
            all_errs.append(validate_containers(containers, &volumes, &stage_path, cfg));
        }
        all_errs.append(validate_names_unique_across(containers, &seen, &stage_path));
        seen.extend(
            containers
                .iter()
                .filter(|c| !c.name.is_empty())
                .map(|c| c.name.as_str()),
        );
    }

    if let Some(affinity) = &spec.affinity {
        all_errs.append(validate_affinity(affinity, &path.child("affinity")));
    }

    if !spec.node_name.is_empty() {
        for msg in validate_node_name(&spec.node_name, false) {
            all_errs.push(invalid(&path.child("node_name"), &spec.node_name, &msg));
        }
    }
    all_errs.append(validate_labels(&spec.node_selector, &path.child("node_selector")));

    all_errs.append(validate_restart_policy(&spec.restart_policy, &path.child("restart_policy")));

    if let Some(seconds) = spec.termination_grace_period_seconds {
        all_errs.append(validate_duration(
            seconds,
            &path.child("termination_grace_period_seconds"),
            cfg,
        ));
    }
    if let Some(seconds) = spec.active_deadline_seconds {
        all_errs.append(validate_duration(seconds, &path.child("active_deadline_seconds"), cfg));
    }

    all_errs
}

fn validate_duration(seconds: i64, path: &FieldPath, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if seconds < cfg.min_duration_seconds || seconds > cfg.max_duration_seconds {
        all_errs.push(invalid(
            path,
            seconds,
            &inclusive_range_error(cfg.min_duration_seconds, cfg.max_duration_seconds),
        ));
    }
    all_errs
}

/// The restart policy is required and must be a known value.
pub fn validate_restart_policy(policy: &RestartPolicy, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    match policy {
        RestartPolicy::Always | RestartPolicy::OnFailure | RestartPolicy::Never => {}
        RestartPolicy::Empty => all_errs.push(required(path, "")),
        RestartPolicy::Other(_) => {
            all_errs.push(not_supported(path, policy, RestartPolicy::KNOWN))
        }
    }
    all_errs
}

/// Validate an update of a pod.
pub fn validate_pod_update(new_pod: &Pod, old_pod: &Pod, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_object_meta_update(
        &new_pod.metadata,
        &old_pod.metadata,
        &FieldPath::new("metadata"),
        cfg,
    );
    all_errs.append(validate_pod_spec_update(&new_pod.spec, &old_pod.spec, cfg));

    log_validated("Pod", &new_pod.metadata, "update", &all_errs);
    all_errs
}

fn validate_pod_spec_update(new_spec: &PodSpec, old_spec: &PodSpec, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let spec_path = FieldPath::new("spec");

    let stages = [
        (&new_spec.containers, &old_spec.containers, "containers"),
        (&new_spec.init_containers, &old_spec.init_containers, "init_containers"),
        (
            &new_spec.installation_containers,
            &old_spec.installation_containers,
            "installation_containers",
        ),
        (
            &new_spec.uninstallation_containers,
            &old_spec.uninstallation_containers,
            "uninstallation_containers",
        ),
    ];
    for (new_containers, old_containers, field) in stages {
        let (errs, stop) =
            validate_container_updates(new_containers, old_containers, &spec_path.child(field));
        all_errs.append(errs);
        if stop {
            return all_errs;
        }
    }

    // active_deadline_seconds may be set, or lowered, but never raised or unset.
    let deadline_path = spec_path.child("active_deadline_seconds");
    match (new_spec.active_deadline_seconds, old_spec.active_deadline_seconds) {
        (Some(new_deadline), old_deadline) => {
            if new_deadline < 0 || new_deadline > cfg.max_duration_seconds {
                all_errs.push(invalid(
                    &deadline_path,
                    new_deadline,
                    &inclusive_range_error(0, cfg.max_duration_seconds),
                ));
                return all_errs;
            }
            if old_deadline.map_or(false, |old| old < new_deadline) {
                all_errs.push(invalid(
                    &deadline_path,
                    new_deadline,
                    "must be less than or equal to previous value",
                ));
                return all_errs;
            }
        }
        (None, Some(_)) => {
            all_errs.push(invalid(
                &deadline_path,
                BadValue::Null,
                "must not update from a positive integer to nil value",
            ));
            return all_errs;
        }
        (None, None) => {}
    }

    if new_spec == old_spec {
        trace!("pod specs are equal, skipping comparison");
        return all_errs;
    }

    let munged = munge_pod_spec(new_spec, old_spec);
    trace!("comparing munged pod spec");
    if munged != *old_spec {
        all_errs.push(forbidden(
            &spec_path,
            &format!("{}\n{}", POD_UPDATE_FORBIDDEN_MSG, debug_diff(old_spec, &munged)),
        ));
    }
    all_errs
}

/// Build a copy of `new_spec` with every updatable field taken from
/// `old_spec`. Neither input is modified.
fn munge_pod_spec(new_spec: &PodSpec, old_spec: &PodSpec) -> PodSpec {
    let mut munged = new_spec.clone();
    munged.containers = with_images_from(&new_spec.containers, &old_spec.containers);
    munged.init_containers = with_images_from(&new_spec.init_containers, &old_spec.init_containers);
    munged.installation_containers =
        with_images_from(&new_spec.installation_containers, &old_spec.installation_containers);
    munged.uninstallation_containers = with_images_from(
        &new_spec.uninstallation_containers,
        &old_spec.uninstallation_containers,
    );
    munged.active_deadline_seconds = old_spec.active_deadline_seconds;

    // A grace period of 1 replaces the negative values older clients sent.
    if let (Some(old_grace), Some(1)) = (
        old_spec.termination_grace_period_seconds,
        munged.termination_grace_period_seconds,
    ) {
        if old_grace < 0 {
            munged.termination_grace_period_seconds = Some(old_grace);
        }
    }
    munged
}

/// Returns the changed lines between the `Debug` renderings of two values,
/// `-` for `old` and `+` for `new`.
pub(crate) fn debug_diff<T: Debug>(old: &T, new: &T) -> String {
    let old_text = format!("{:#?}\n", old);
    let new_text = format!("{:#?}\n", new);
    let diff = TextDiff::from_lines(&old_text, &new_text);

    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => continue,
        };
        let _ = write!(out, "{}{}", sign, change.value());
    }
    out
}

/// Status updates only re-check metadata.
pub fn validate_pod_status_update(new_pod: &Pod, old_pod: &Pod, cfg: &ValidationConfig) -> ErrorList {
    let all_errs = validate_object_meta_update(
        &new_pod.metadata,
        &old_pod.metadata,
        &FieldPath::new("metadata"),
        cfg,
    );
    log_validated("Pod", &new_pod.metadata, "status update", &all_errs);
    all_errs
}
