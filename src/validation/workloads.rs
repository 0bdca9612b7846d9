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

//! Validation of the workload kinds that embed a pod template.

use super::config::ValidationConfig;
use super::container::{validate_container_updates, with_images_from};
use super::log_validated;
use super::names::{inclusive_range_error, name_is_dns_subdomain};
use super::objectmeta::{
    validate_annotations, validate_immutable_field, validate_labels, validate_nonnegative_field,
    validate_object_meta, validate_object_meta_update,
};
use super::pod::validate_pod_spec;
use super::selectors::{validate_label_selector, validate_selector_matches_labels};
use crate::api::apps::{
    DaemonSet, DaemonSetSpec, Deployment, DeploymentSpec, Job, JobSpec, ReplicaSet,
    ReplicaSetSpec, StatefulSet, StatefulSetSpec,
};
use crate::api::core::{LabelSelector, PodTemplateSpec, RestartPolicy};
use crate::api::meta::ObjectMeta;
use crate::field::{forbidden, invalid, not_supported, required, BadValue, ErrorList, FieldPath};

/// Validate the labels, annotations and pod spec of a pod template.
pub fn validate_pod_template_spec(
    template: &PodTemplateSpec,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let meta_path = path.child("metadata");
    let mut all_errs = validate_labels(&template.metadata.labels, &meta_path.child("labels"));
    all_errs.append(validate_annotations(
        &template.metadata.annotations,
        &meta_path.child("annotations"),
        cfg,
    ));
    all_errs.append(validate_pod_spec(&template.spec, &path.child("spec"), cfg));
    all_errs
}

/// Checks shared by every kind that manages pods from a template.
struct TemplateRules<'a> {
    /// Lower-case kind name used in messages.
    kind: &'a str,
    /// A missing or empty selector is an error.
    selector_required: bool,
    /// Restart policies the template may use.
    restart_policies: &'a [RestartPolicy],
}

impl TemplateRules<'_> {
    fn validate(
        &self,
        selector: Option<&LabelSelector>,
        template: &PodTemplateSpec,
        path: &FieldPath,
        cfg: &ValidationConfig,
    ) -> ErrorList {
        let mut all_errs = ErrorList::new();
        let selector_path = path.child("selector");
        let template_path = path.child("template");

        match selector {
            None if self.selector_required => all_errs.push(required(&selector_path, "")),
            None => {}
            Some(selector) => {
                all_errs.append(validate_label_selector(selector, &selector_path));
                if selector.is_empty() {
                    if self.selector_required {
                        all_errs.push(invalid(
                            &selector_path,
                            BadValue::debug(selector),
                            &format!("empty selector is not valid for {}.", self.kind),
                        ));
                    }
                } else {
                    all_errs.append(validate_selector_matches_labels(
                        selector,
                        &template.metadata.labels,
                        &template_path.child("metadata").child("labels"),
                    ));
                }
            }
        }

        all_errs.append(validate_pod_template_spec(template, &template_path, cfg));

        let policy = &template.spec.restart_policy;
        if !policy.is_empty() && !self.restart_policies.contains(policy) {
            let allowed: Vec<&str> = self.restart_policies.iter().map(|p| p.as_str()).collect();
            all_errs.push(not_supported(
                &template_path.child("spec").child("restart_policy"),
                policy,
                &allowed,
            ));
        }
        all_errs
    }
}

fn validate_optional_nonnegative(value: Option<i64>, path: &FieldPath) -> ErrorList {
    value.map_or_else(ErrorList::new, |v| validate_nonnegative_field(v, path))
}

fn metadata_path() -> FieldPath {
    FieldPath::new("metadata")
}

fn spec_path() -> FieldPath {
    FieldPath::new("spec")
}

fn validate_meta(meta: &ObjectMeta, cfg: &ValidationConfig) -> ErrorList {
    validate_object_meta(meta, true, name_is_dns_subdomain, &metadata_path(), cfg)
}

fn validate_meta_update(new_meta: &ObjectMeta, old_meta: &ObjectMeta, cfg: &ValidationConfig) -> ErrorList {
    validate_object_meta_update(new_meta, old_meta, &metadata_path(), cfg)
}

// ============================================================================
// StatefulSet
// ============================================================================

/// Validate a StatefulSet spec.
pub fn validate_stateful_set_spec(
    spec: &StatefulSetSpec,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_optional_nonnegative(spec.replicas, &path.child("replicas"));
    all_errs.append(validate_optional_nonnegative(
        spec.revision_history_limit,
        &path.child("revision_history_limit"),
    ));
    let rules = TemplateRules {
        kind: "statefulset",
        selector_required: true,
        restart_policies: &[RestartPolicy::Always],
    };
    all_errs.append(rules.validate(spec.selector.as_ref(), &spec.template, path, cfg));
    all_errs
}

pub fn validate_stateful_set(set: &StatefulSet, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta(&set.metadata, cfg);
    all_errs.append(validate_stateful_set_spec(&set.spec, &spec_path(), cfg));
    log_validated("StatefulSet", &set.metadata, "create", &all_errs);
    all_errs
}

/// Validate an update of a StatefulSet.
///
/// Only `replicas` and the images of the main containers may change.
pub fn validate_stateful_set_update(
    new_set: &StatefulSet,
    old_set: &StatefulSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);

    let new_containers = &new_set.spec.template.spec.containers;
    let old_containers = &old_set.spec.template.spec.containers;

    let mut munged = new_set.spec.clone();
    munged.replicas = old_set.spec.replicas;
    // A count change is reported by the container check below.
    munged.template.spec.containers = if new_containers.len() == old_containers.len() {
        with_images_from(new_containers, old_containers)
    } else {
        old_containers.clone()
    };
    if munged != old_set.spec {
        all_errs.push(forbidden(
            &spec_path(),
            "updates to statefulset spec for fields other than 'replicas' and 'containers' are forbidden.",
        ));
    }

    all_errs.append(validate_optional_nonnegative(
        new_set.spec.replicas,
        &spec_path().child("replicas"),
    ));
    let (errs, _) = validate_container_updates(
        new_containers,
        old_containers,
        &FieldPath::from_fields(&["spec", "template", "spec", "containers"]),
    );
    all_errs.append(errs);

    log_validated("StatefulSet", &new_set.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_stateful_set_status_update(
    new_set: &StatefulSet,
    old_set: &StatefulSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);
    log_validated("StatefulSet", &new_set.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// Deployment
// ============================================================================

pub fn validate_deployment_spec(
    spec: &DeploymentSpec,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_optional_nonnegative(spec.replicas, &path.child("replicas"));
    all_errs.append(validate_optional_nonnegative(
        spec.revision_history_limit,
        &path.child("revision_history_limit"),
    ));
    all_errs.append(validate_optional_nonnegative(
        spec.progress_deadline_seconds,
        &path.child("progress_deadline_seconds"),
    ));
    let rules = TemplateRules {
        kind: "deployment",
        selector_required: true,
        restart_policies: &[RestartPolicy::Always],
    };
    all_errs.append(rules.validate(spec.selector.as_ref(), &spec.template, path, cfg));
    all_errs
}

pub fn validate_deployment(deployment: &Deployment, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta(&deployment.metadata, cfg);
    all_errs.append(validate_deployment_spec(&deployment.spec, &spec_path(), cfg));
    log_validated("Deployment", &deployment.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_deployment_update(
    new_deployment: &Deployment,
    old_deployment: &Deployment,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_meta_update(&new_deployment.metadata, &old_deployment.metadata, cfg);
    all_errs.append(validate_deployment_spec(&new_deployment.spec, &spec_path(), cfg));
    log_validated("Deployment", &new_deployment.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_deployment_status_update(
    new_deployment: &Deployment,
    old_deployment: &Deployment,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_meta_update(&new_deployment.metadata, &old_deployment.metadata, cfg);
    log_validated("Deployment", &new_deployment.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// ReplicaSet
// ============================================================================

pub fn validate_replica_set_spec(
    spec: &ReplicaSetSpec,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_optional_nonnegative(spec.replicas, &path.child("replicas"));
    all_errs.append(validate_nonnegative_field(
        spec.min_ready_seconds,
        &path.child("min_ready_seconds"),
    ));
    let rules = TemplateRules {
        kind: "replicaset",
        selector_required: true,
        restart_policies: &[RestartPolicy::Always],
    };
    all_errs.append(rules.validate(spec.selector.as_ref(), &spec.template, path, cfg));
    all_errs
}

pub fn validate_replica_set(set: &ReplicaSet, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta(&set.metadata, cfg);
    all_errs.append(validate_replica_set_spec(&set.spec, &spec_path(), cfg));
    log_validated("ReplicaSet", &set.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_replica_set_update(
    new_set: &ReplicaSet,
    old_set: &ReplicaSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);
    all_errs.append(validate_replica_set_spec(&new_set.spec, &spec_path(), cfg));
    log_validated("ReplicaSet", &new_set.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_replica_set_status_update(
    new_set: &ReplicaSet,
    old_set: &ReplicaSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);
    log_validated("ReplicaSet", &new_set.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// DaemonSet
// ============================================================================

pub fn validate_daemon_set_spec(
    spec: &DaemonSetSpec,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_optional_nonnegative(
        spec.revision_history_limit,
        &path.child("revision_history_limit"),
    );
    let rules = TemplateRules {
        kind: "daemonset",
        selector_required: true,
        restart_policies: &[RestartPolicy::Always],
    };
    all_errs.append(rules.validate(spec.selector.as_ref(), &spec.template, path, cfg));
    all_errs
}

pub fn validate_daemon_set(set: &DaemonSet, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta(&set.metadata, cfg);
    all_errs.append(validate_daemon_set_spec(&set.spec, &spec_path(), cfg));
    log_validated("DaemonSet", &set.metadata, "create", &all_errs);
    all_errs
}

pub fn validate_daemon_set_update(
    new_set: &DaemonSet,
    old_set: &DaemonSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);
    all_errs.append(validate_daemon_set_spec(&new_set.spec, &spec_path(), cfg));
    log_validated("DaemonSet", &new_set.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_daemon_set_status_update(
    new_set: &DaemonSet,
    old_set: &DaemonSet,
    cfg: &ValidationConfig,
) -> ErrorList {
    let all_errs = validate_meta_update(&new_set.metadata, &old_set.metadata, cfg);
    log_validated("DaemonSet", &new_set.metadata, "status update", &all_errs);
    all_errs
}

// ============================================================================
// Job
// ============================================================================

/// Validate a Job spec. The selector is optional, but when given it must
/// select the template.
pub fn validate_job_spec(spec: &JobSpec, path: &FieldPath, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (value, field) in [
        (spec.parallelism, "parallelism"),
        (spec.completions, "completions"),
        (spec.backoff_limit, "backoff_limit"),
    ] {
        all_errs.append(validate_optional_nonnegative(value.map(i64::from), &path.child(field)));
    }
    if let Some(seconds) = spec.active_deadline_seconds {
        if seconds < cfg.min_duration_seconds || seconds > cfg.max_duration_seconds {
            all_errs.push(invalid(
                &path.child("active_deadline_seconds"),
                seconds,
                &inclusive_range_error(cfg.min_duration_seconds, cfg.max_duration_seconds),
            ));
        }
    }
    let rules = TemplateRules {
        kind: "job",
        selector_required: false,
        restart_policies: &[RestartPolicy::OnFailure, RestartPolicy::Never],
    };
    all_errs.append(rules.validate(spec.selector.as_ref(), &spec.template, path, cfg));
    all_errs
}

pub fn validate_job(job: &Job, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta(&job.metadata, cfg);
    all_errs.append(validate_job_spec(&job.spec, &spec_path(), cfg));
    log_validated("Job", &job.metadata, "create", &all_errs);
    all_errs
}

/// Validate an update of a Job. The selector and the template are immutable.
pub fn validate_job_update(new_job: &Job, old_job: &Job, cfg: &ValidationConfig) -> ErrorList {
    let mut all_errs = validate_meta_update(&new_job.metadata, &old_job.metadata, cfg);
    all_errs.append(validate_job_spec(&new_job.spec, &spec_path(), cfg));
    all_errs.append(validate_immutable_field(
        &new_job.spec.selector,
        &old_job.spec.selector,
        &spec_path().child("selector"),
    ));
    all_errs.append(validate_immutable_field(
        &new_job.spec.template,
        &old_job.spec.template,
        &spec_path().child("template"),
    ));
    log_validated("Job", &new_job.metadata, "update", &all_errs);
    all_errs
}

pub fn validate_job_status_update(new_job: &Job, old_job: &Job, cfg: &ValidationConfig) -> ErrorList {
    let all_errs = validate_meta_update(&new_job.metadata, &old_job.metadata, cfg);
    log_validated("Job", &new_job.metadata, "status update", &all_errs);
    all_errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::meta::Uid;
    use crate::field::ErrorKind;
    use crate::validation::pod::tests::{container, pod_spec};
    use std::collections::BTreeMap;

    fn labels() -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web".to_string());
        labels
    }

    fn selector() -> LabelSelector {
        LabelSelector {
            match_labels: labels(),
            ..Default::default()
        }
    }

    fn template() -> PodTemplateSpec {
        let mut template = PodTemplateSpec {
            spec: pod_spec(),
            ..Default::default()
        };
        template.metadata.labels = labels();
        template
    }

    fn metadata() -> ObjectMeta {
        let mut meta = ObjectMeta::new("default", "web");
        meta.uid = Uid::new("1234");
        meta.resource_version = "1".to_string();
        meta
    }

    fn stateful_set() -> StatefulSet {
        StatefulSet {
            metadata: metadata(),
            spec: StatefulSetSpec {
                selector: Some(selector()),
                template: template(),
                replicas: Some(3),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn kinds_and_fields(errs: &ErrorList) -> Vec<(ErrorKind, &str)> {
        errs.iter().map(|e| (e.kind, e.field.as_str())).collect()
    }

    #[test]
    fn test_valid_stateful_set() {
        assert!(validate_stateful_set(&stateful_set(), &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn test_stateful_set_errors() {
        struct TestCase {
            name: &'static str,
            mutate: fn(&mut StatefulSet),
            expected: Vec<(ErrorKind, &'static str)>,
        }

        let cases = vec![
            TestCase {
                name: "negative replicas",
                mutate: |set| set.spec.replicas = Some(-1),
                expected: vec![(ErrorKind::Invalid, "spec.replicas")],
            },
            TestCase {
                name: "missing selector",
                mutate: |set| set.spec.selector = None,
                expected: vec![(ErrorKind::Required, "spec.selector")],
            },
            TestCase {
                name: "empty selector",
                mutate: |set| set.spec.selector = Some(LabelSelector::default()),
                expected: vec![(ErrorKind::Invalid, "spec.selector")],
            },
            TestCase {
                name: "selector does not match template",
                mutate: |set| {
                    set.spec.template.metadata.labels.insert("app".to_string(), "db".to_string());
                },
                expected: vec![(ErrorKind::Invalid, "spec.template.metadata.labels")],
            },
            TestCase {
                name: "invalid template annotation",
                mutate: |set| {
                    set.spec
                        .template
                        .metadata
                        .annotations
                        .insert("/bad".to_string(), String::new());
                },
                expected: vec![(ErrorKind::Invalid, "spec.template.metadata.annotations")],
            },
            TestCase {
                name: "template pod spec",
                mutate: |set| set.spec.template.spec.containers[0].image.clear(),
                expected: vec![(ErrorKind::Required, "spec.template.spec.containers[0].image")],
            },
            TestCase {
                name: "restart policy",
                mutate: |set| set.spec.template.spec.restart_policy = RestartPolicy::Never,
                expected: vec![(ErrorKind::NotSupported, "spec.template.spec.restart_policy")],
            },
        ];

        for tc in cases {
            let mut set = stateful_set();
            (tc.mutate)(&mut set);
            let errs = validate_stateful_set(&set, &ValidationConfig::default());
            assert_eq!(kinds_and_fields(&errs), tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn test_stateful_set_update() {
        struct TestCase {
            name: &'static str,
            mutate: fn(&mut StatefulSet),
            expected: Vec<(ErrorKind, &'static str)>,
        }

        let cases = vec![
            TestCase {
                name: "scale",
                mutate: |set| set.spec.replicas = Some(5),
                expected: vec![],
            },
            TestCase {
                name: "new image",
                mutate: |set| set.spec.template.spec.containers[0].image = "app:v2".to_string(),
                expected: vec![],
            },
            TestCase {
                name: "negative replicas",
                mutate: |set| set.spec.replicas = Some(-1),
                expected: vec![(ErrorKind::Invalid, "spec.replicas")],
            },
            TestCase {
                name: "other container field",
                mutate: |set| set.spec.template.spec.containers[0].working_dir = "/srv".to_string(),
                expected: vec![(ErrorKind::Forbidden, "spec")],
            },
            TestCase {
                name: "selector",
                mutate: |set| set.spec.selector = None,
                expected: vec![(ErrorKind::Forbidden, "spec")],
            },
            TestCase {
                name: "added container",
                mutate: |set| set.spec.template.spec.containers.push(container("sidecar")),
                expected: vec![(ErrorKind::Forbidden, "spec.template.spec.containers")],
            },
            TestCase {
                name: "blank image",
                mutate: |set| set.spec.template.spec.containers[0].image.clear(),
                expected: vec![(ErrorKind::Required, "spec.template.spec.containers[0].image")],
            },
        ];

        let old = stateful_set();
        for tc in cases {
            let mut new = old.clone();
            new.metadata.resource_version = "2".to_string();
            (tc.mutate)(&mut new);
            let errs = validate_stateful_set_update(&new, &old, &ValidationConfig::default());
            assert_eq!(kinds_and_fields(&errs), tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn test_stateful_set_status_update() {
        let old = stateful_set();
        let mut new = old.clone();
        new.status.replicas = 3;
        new.spec.replicas = Some(-1);
        assert!(validate_stateful_set_status_update(&new, &old, &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn test_deployment() {
        let cfg = ValidationConfig::default();
        let mut deployment = Deployment {
            metadata: metadata(),
            spec: DeploymentSpec {
                selector: Some(selector()),
                template: template(),
                replicas: Some(2),
                progress_deadline_seconds: Some(600),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_deployment(&deployment, &cfg).is_empty());

        let old = deployment.clone();
        deployment.spec.revision_history_limit = Some(-1);
        deployment.spec.template.spec.containers[0].working_dir = "/srv".to_string();
        let errs = validate_deployment_update(&deployment, &old, &cfg);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![(ErrorKind::Invalid, "spec.revision_history_limit")]
        );
        assert!(validate_deployment_status_update(&deployment, &old, &cfg).is_empty());
    }

    #[test]
    fn test_replica_set() {
        let cfg = ValidationConfig::default();
        let mut set = ReplicaSet {
            metadata: metadata(),
            spec: ReplicaSetSpec {
                selector: Some(selector()),
                template: template(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_replica_set(&set, &cfg).is_empty());

        set.spec.min_ready_seconds = -5;
        set.spec.selector = None;
        let errs = validate_replica_set(&set, &cfg);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![
                (ErrorKind::Invalid, "spec.min_ready_seconds"),
                (ErrorKind::Required, "spec.selector"),
            ]
        );
        assert_eq!(errs, validate_replica_set_update(&set, &set.clone(), &cfg));
        assert!(validate_replica_set_status_update(&set, &set.clone(), &cfg).is_empty());
    }

    #[test]
    fn test_daemon_set() {
        let cfg = ValidationConfig::default();
        let mut set = DaemonSet {
            metadata: metadata(),
            spec: DaemonSetSpec {
                selector: Some(selector()),
                template: template(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_daemon_set(&set, &cfg).is_empty());

        set.spec.template.spec.restart_policy = RestartPolicy::OnFailure;
        let errs = validate_daemon_set_update(&set, &set.clone(), &cfg);
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[0].to_string(),
            "spec.template.spec.restart_policy: unsupported value: \"on_failure\": supported values: \"always\""
        );
        assert!(validate_daemon_set_status_update(&set, &set.clone(), &cfg).is_empty());
    }

    #[test]
    fn test_job() {
        let cfg = ValidationConfig::default();
        let mut job = Job {
            metadata: metadata(),
            spec: JobSpec {
                template: template(),
                backoff_limit: Some(6),
                ..Default::default()
            },
            ..Default::default()
        };
        job.spec.template.spec.restart_policy = RestartPolicy::OnFailure;
        assert!(validate_job(&job, &cfg).is_empty());

        // An empty selector is allowed for jobs.
        job.spec.selector = Some(LabelSelector::default());
        assert!(validate_job(&job, &cfg).is_empty());

        let mut bad = job.clone();
        bad.spec.parallelism = Some(-1);
        bad.spec.active_deadline_seconds = Some(0);
        bad.spec.template.spec.restart_policy = RestartPolicy::Always;
        let errs = validate_job(&bad, &cfg);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![
                (ErrorKind::Invalid, "spec.parallelism"),
                (ErrorKind::Invalid, "spec.active_deadline_seconds"),
                (ErrorKind::NotSupported, "spec.template.spec.restart_policy"),
            ]
        );
    }

    #[test]
    fn test_job_update() {
        let cfg = ValidationConfig::default();
        let mut old = Job {
            metadata: metadata(),
            spec: JobSpec {
                selector: Some(selector()),
                template: template(),
                ..Default::default()
            },
            ..Default::default()
        };
        old.spec.template.spec.restart_policy = RestartPolicy::Never;

        let mut new = old.clone();
        new.spec.parallelism = Some(4);
        assert!(validate_job_update(&new, &old, &cfg).is_empty());

        new.spec.template.spec.containers[0].image = "app:v2".to_string();
        new.spec.selector = None;
        let errs = validate_job_update(&new, &old, &cfg);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![
                (ErrorKind::Invalid, "spec.selector"),
                (ErrorKind::Invalid, "spec.template"),
            ]
        );
        assert!(errs.iter().all(|e| e.detail == "field is immutable"));
        assert!(validate_job_status_update(&new, &old, &cfg).is_empty());
    }
}
