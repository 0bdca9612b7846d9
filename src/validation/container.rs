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

//! Container validation.
//!
//! A pod spec carries four container lists. Each list is validated on its
//! own by [`validate_containers`]; names must additionally be unique across
//! lists, which [`validate_names_unique_across`] checks against the names of
//! the lists validated before.

use super::config::ValidationConfig;
use super::names::{is_env_var_name, is_valid_port_name, is_valid_port_num, validate_dns1123_label};
use super::volume::validate_local_non_reserved_path;
use crate::api::core::{
    Container, ContainerPort, EnvVar, Protocol, PullPolicy, ResourceList, ResourceRequirements,
    SecurityContext, VolumeMount, VolumeSource,
};
use crate::field::{
    duplicate, forbidden, invalid, not_found, not_supported, required, ErrorList, FieldPath,
};
use std::collections::{BTreeMap, BTreeSet};

const WHITESPACE_ERROR_MSG: &str = "must not have leading or trailing whitespace";

/// Validate one container list.
///
/// `volumes` holds the volumes that passed validation; mounts must reference
/// one of them.
pub fn validate_containers(
    containers: &[Container],
    volumes: &BTreeMap<String, VolumeSource>,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut all_names = BTreeSet::new();

    for (i, container) in containers.iter().enumerate() {
        let idx_path = path.index(i);
        let name_path = idx_path.child("name");

        if container.name.is_empty() {
            all_errs.push(required(&name_path, ""));
        } else {
            all_errs.append(validate_dns1123_label(&container.name, &name_path));
        }
        if !all_names.insert(container.name.as_str()) {
            all_errs.push(duplicate(&name_path, &container.name));
        }

        all_errs.append(validate_image(&container.image, &idx_path.child("image")));
        all_errs.append(validate_pull_policy(
            &container.image_pull_policy,
            &idx_path.child("image_pull_policy"),
        ));
        if container.image_deployment_dir.is_empty() {
            all_errs.push(required(&idx_path.child("image_deployment_dir"), ""));
        }
        if let Some(sc) = &container.security_context {
            all_errs.append(validate_security_context(sc, &idx_path.child("security_context")));
        }
        all_errs.append(validate_env(&container.env, &idx_path.child("env")));
        all_errs.append(validate_container_ports(&container.ports, &idx_path.child("ports")));
        all_errs.append(validate_volume_mounts(
            &container.volume_mounts,
            volumes,
            &idx_path.child("volume_mounts"),
        ));
        all_errs.append(validate_resource_requirements(
            &container.resources,
            &idx_path.child("resources"),
            cfg,
        ));
    }

    all_errs.append(check_host_port_conflicts(containers, path));
    all_errs
}

/// Reports every container of `containers` whose name is already used by a
/// container in `others`.
pub fn validate_names_unique_across(
    containers: &[Container],
    others: &BTreeSet<&str>,
    path: &FieldPath,
) -> ErrorList {
    containers
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.name.is_empty() && others.contains(c.name.as_str()))
        .map(|(i, c)| duplicate(&path.index(i).child("name"), &c.name))
        .collect()
}

fn validate_image(image: &str, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if image.is_empty() {
        all_errs.push(required(path, ""));
    }
    if image.trim() != image {
        all_errs.push(invalid(path, image, WHITESPACE_ERROR_MSG));
    }
    all_errs
}

fn validate_pull_policy(policy: &PullPolicy, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    match policy {
        PullPolicy::Always | PullPolicy::Never | PullPolicy::IfNotPresent => {}
        PullPolicy::Empty => all_errs.push(required(path, "")),
        PullPolicy::Other(_) => all_errs.push(not_supported(path, policy, PullPolicy::KNOWN)),
    }
    all_errs
}

fn validate_security_context(sc: &SecurityContext, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if sc.run_as_user.is_empty() {
        all_errs.push(required(&path.child("run_as_user"), ""));
    }
    all_errs
}

/// Validate environment variables.
pub fn validate_env(vars: &[EnvVar], path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (i, var) in vars.iter().enumerate() {
        let idx_path = path.index(i);
        if var.name.is_empty() {
            all_errs.push(required(&idx_path.child("name"), ""));
        } else {
            for msg in is_env_var_name(&var.name) {
                all_errs.push(invalid(&idx_path.child("name"), &var.name, &msg));
            }
        }

        let Some(source) = &var.value_from else {
            continue;
        };
        let source_path = idx_path.child("value_from");
        match &source.field_ref {
            None => all_errs.push(required(&source_path.child("field_ref"), "")),
            Some(selector) if selector.field_path.is_empty() => all_errs.push(required(
                &source_path.child("field_ref").child("field_path"),
                "",
            )),
            Some(_) => {}
        }
    }
    all_errs
}

fn validate_container_ports(ports: &[ContainerPort], path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut all_names = BTreeSet::new();

    for (i, port) in ports.iter().enumerate() {
        let idx_path = path.index(i);
        if !port.name.is_empty() {
            let msgs = is_valid_port_name(&port.name);
            if !msgs.is_empty() {
                for msg in msgs {
                    all_errs.push(invalid(&idx_path.child("name"), &port.name, &msg));
                }
            } else if !all_names.insert(port.name.as_str()) {
                all_errs.push(duplicate(&idx_path.child("name"), &port.name));
            }
        }
        if port.container_port == 0 {
            all_errs.push(required(&idx_path.child("container_port"), ""));
        } else {
            for msg in is_valid_port_num(port.container_port) {
                all_errs.push(invalid(&idx_path.child("container_port"), port.container_port, &msg));
            }
        }
        all_errs.append(validate_protocol(&port.protocol, &idx_path.child("protocol")));
    }
    all_errs
}

/// The protocol is required and must be TCP or UDP.
pub(crate) fn validate_protocol(protocol: &Protocol, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    match protocol {
        Protocol::Tcp | Protocol::Udp => {}
        Protocol::Empty => all_errs.push(required(path, "")),
        Protocol::Other(_) => all_errs.push(not_supported(path, protocol, Protocol::KNOWN)),
    }
    all_errs
}

fn validate_volume_mounts(
    mounts: &[VolumeMount],
    volumes: &BTreeMap<String, VolumeSource>,
    path: &FieldPath,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut mount_points = BTreeSet::new();

    for (i, mount) in mounts.iter().enumerate() {
        let idx_path = path.index(i);
        if mount.name.is_empty() {
            all_errs.push(required(&idx_path.child("name"), ""));
        } else if !volumes.contains_key(&mount.name) {
            all_errs.push(not_found(&idx_path.child("name"), &mount.name));
        }
        if mount.mount_path.is_empty() {
            all_errs.push(required(&idx_path.child("mount_path"), ""));
        }
        if !mount_points.insert(mount.mount_path.as_str()) {
            all_errs.push(invalid(&idx_path.child("mount_path"), &mount.mount_path, "must be unique"));
        }
        if !mount.sub_path.is_empty() {
            all_errs.append(validate_local_non_reserved_path(
                &mount.sub_path,
                &idx_path.child("sub_path"),
            ));
        }
    }
    all_errs
}

/// Resource names must be known and quantities non-negative.
pub fn validate_resource_requirements(
    requirements: &ResourceRequirements,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    all_errs.append(validate_resource_list(&requirements.limits, &path.child("limits"), cfg));
    all_errs.append(validate_resource_list(&requirements.requests, &path.child("requests"), cfg));
    all_errs
}

pub(crate) fn validate_resource_list(
    resources: &ResourceList,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (name, quantity) in resources {
        let key_path = path.key(name);
        if !cfg.is_known_resource(name) {
            let known: Vec<&str> = cfg.resource_names.iter().map(String::as_str).collect();
            all_errs.push(not_supported(&key_path, name, &known));
        }
        if quantity.is_negative() {
            all_errs.push(invalid(&key_path, quantity.value(), "must be a valid resource quantity"));
        }
    }
    all_errs
}

/// Reports every repeated `PROTOCOL/PORT` pair among the containers of one list.
fn check_host_port_conflicts(containers: &[Container], path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut all_ports = BTreeSet::new();

    for (ci, container) in containers.iter().enumerate() {
        let ports_path = path.index(ci).child("ports");
        for (pi, port) in container.ports.iter().enumerate() {
            if port.container_port == 0 {
                continue;
            }
            let key = format!("{}/{}", port.protocol, port.container_port);
            if all_ports.contains(&key) {
                all_errs.push(duplicate(&ports_path.index(pi).child("container_port"), key));
            } else {
                all_ports.insert(key);
            }
        }
    }
    all_errs
}

/// Check a container list of an update against the previous list.
///
/// Containers may not be added or removed; when that happens the returned
/// flag is set and the caller stops checking. Otherwise only images are
/// checked, since they are the one container field that may change.
pub fn validate_container_updates(
    new_containers: &[Container],
    old_containers: &[Container],
    path: &FieldPath,
) -> (ErrorList, bool) {
    let mut all_errs = ErrorList::new();
    if new_containers.len() != old_containers.len() {
        all_errs.push(forbidden(path, "pod updates may not add or remove containers"));
        return (all_errs, true);
    }

    for (i, container) in new_containers.iter().enumerate() {
        all_errs.append(validate_image(&container.image, &path.index(i).child("image")));
    }
    (all_errs, false)
}

/// Returns a copy of `new_containers` carrying the images of `old_containers`.
///
/// Both lists must have the same length; extra containers keep their image.
pub(crate) fn with_images_from(new_containers: &[Container], old_containers: &[Container]) -> Vec<Container> {
    new_containers
        .iter()
        .enumerate()
        .map(|(i, container)| {
            let mut munged = container.clone();
            if let Some(old) = old_containers.get(i) {
                munged.image = old.image.clone();
            }
            munged
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::core::{ConfigMapVolumeSource, EnvVarSource, ObjectFieldSelector};
    use crate::api::Quantity;
    use crate::field::ErrorKind;

    fn container(name: &str) -> Container {
        Container {
            name: name.to_string(),
            image: "registry.local/app:v1".to_string(),
            image_pull_policy: PullPolicy::IfNotPresent,
            image_deployment_dir: "/opt/app".to_string(),
            ..Default::default()
        }
    }

    fn port(name: &str, number: i32, protocol: Protocol) -> ContainerPort {
        ContainerPort {
            name: name.to_string(),
            container_port: number,
            protocol,
        }
    }

    fn volumes() -> BTreeMap<String, VolumeSource> {
        let mut volumes = BTreeMap::new();
        volumes.insert(
            "config".to_string(),
            VolumeSource {
                config_map: Some(ConfigMapVolumeSource {
                    name: "app-config".to_string(),
                    ..Default::default()
                }),
            },
        );
        volumes
    }

    fn validate(containers: &[Container]) -> ErrorList {
        validate_containers(
            containers,
            &volumes(),
            &FieldPath::new("spec").child("containers"),
            &ValidationConfig::default(),
        )
    }

    fn kinds_and_fields(errs: &ErrorList) -> Vec<(ErrorKind, &str)> {
        errs.iter().map(|e| (e.kind, e.field.as_str())).collect()
    }

    #[test]
    fn test_valid_containers() {
        let mut c = container("app");
        c.env.push(EnvVar {
            name: "POD_NAME".to_string(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    field_path: "metadata.name".to_string(),
                }),
            }),
            ..Default::default()
        });
        c.ports.push(port("http", 8080, Protocol::Tcp));
        c.ports.push(port("", 9090, Protocol::Udp));
        c.volume_mounts.push(VolumeMount {
            name: "config".to_string(),
            mount_path: "/etc/app".to_string(),
            sub_path: "conf.d".to_string(),
        });
        c.resources.limits.insert("cpu".to_string(), Quantity::from_milli(500));
        c.resources.requests.insert("memory".to_string(), Quantity::new(1 << 20));
        assert!(validate(&[c, container("sidecar")]).is_empty());
    }

    #[test]
    fn test_env_value_alongside_field_ref() {
        let vars = vec![EnvVar {
            name: "POD_NAME".to_string(),
            value: "fallback".to_string(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    field_path: "metadata.name".to_string(),
                }),
            }),
        }];
        assert!(validate_env(&vars, &FieldPath::new("env")).is_empty());
    }

    #[test]
    fn test_container_field_errors() {
        struct TestCase {
            name: &'static str,
            container: Container,
            expected: Vec<(ErrorKind, &'static str)>,
        }

        let mut missing_image = container("app");
        missing_image.image.clear();
        missing_image.image_deployment_dir.clear();

        let mut padded_image = container("app");
        padded_image.image = " app:v1".to_string();

        let mut bad_policy = container("app");
        bad_policy.image_pull_policy = PullPolicy::from_str("sometimes");

        let mut no_policy = container("app");
        no_policy.image_pull_policy = PullPolicy::Empty;

        let mut bad_env = container("app");
        bad_env.env.push(EnvVar::default());
        bad_env.env.push(EnvVar {
            name: "1ABC".to_string(),
            value_from: Some(EnvVarSource { field_ref: None }),
            ..Default::default()
        });
        bad_env.env.push(EnvVar {
            name: "X".to_string(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector::default()),
            }),
            ..Default::default()
        });

        let mut bad_ports = container("app");
        bad_ports.ports.push(port("http", 0, Protocol::Empty));
        bad_ports.ports.push(port("http", 70000, Protocol::from_str("SCTP")));

        let mut bad_mounts = container("app");
        bad_mounts.volume_mounts.push(VolumeMount {
            name: "missing".to_string(),
            mount_path: "/data".to_string(),
            sub_path: "../escape".to_string(),
        });
        bad_mounts.volume_mounts.push(VolumeMount {
            name: "config".to_string(),
            mount_path: "/data".to_string(),
            sub_path: String::new(),
        });

        let mut bad_resources = container("app");
        bad_resources.resources.limits.insert("gpu".to_string(), Quantity::new(1));
        bad_resources.resources.requests.insert("cpu".to_string(), Quantity::from_milli(-100));

        let mut bad_security_context = container("app");
        bad_security_context.security_context = Some(SecurityContext::default());

        let cases = vec![
            TestCase {
                name: "missing name",
                container: container(""),
                expected: vec![(ErrorKind::Required, "spec.containers[0].name")],
            },
            TestCase {
                name: "invalid name",
                container: container("App"),
                expected: vec![(ErrorKind::Invalid, "spec.containers[0].name")],
            },
            TestCase {
                name: "missing image",
                container: missing_image,
                expected: vec![
                    (ErrorKind::Required, "spec.containers[0].image"),
                    (ErrorKind::Required, "spec.containers[0].image_deployment_dir"),
                ],
            },
            TestCase {
                name: "padded image",
                container: padded_image,
                expected: vec![(ErrorKind::Invalid, "spec.containers[0].image")],
            },
            TestCase {
                name: "unknown pull policy",
                container: bad_policy,
                expected: vec![(ErrorKind::NotSupported, "spec.containers[0].image_pull_policy")],
            },
            TestCase {
                name: "missing pull policy",
                container: no_policy,
                expected: vec![(ErrorKind::Required, "spec.containers[0].image_pull_policy")],
            },
            TestCase {
                name: "bad env",
                container: bad_env,
                expected: vec![
                    (ErrorKind::Required, "spec.containers[0].env[0].name"),
                    (ErrorKind::Invalid, "spec.containers[0].env[1].name"),
                    (ErrorKind::Required, "spec.containers[0].env[1].value_from.field_ref"),
                    (
                        ErrorKind::Required,
                        "spec.containers[0].env[2].value_from.field_ref.field_path",
                    ),
                ],
            },
            TestCase {
                name: "bad ports",
                container: bad_ports,
                expected: vec![
                    (ErrorKind::Required, "spec.containers[0].ports[0].container_port"),
                    (ErrorKind::Required, "spec.containers[0].ports[0].protocol"),
                    (ErrorKind::Duplicate, "spec.containers[0].ports[1].name"),
                    (ErrorKind::Invalid, "spec.containers[0].ports[1].container_port"),
                    (ErrorKind::NotSupported, "spec.containers[0].ports[1].protocol"),
                ],
            },
            TestCase {
                name: "bad mounts",
                container: bad_mounts,
                expected: vec![
                    (ErrorKind::NotFound, "spec.containers[0].volume_mounts[0].name"),
                    (ErrorKind::Invalid, "spec.containers[0].volume_mounts[0].sub_path"),
                    (ErrorKind::Invalid, "spec.containers[0].volume_mounts[0].sub_path"),
                    (ErrorKind::Invalid, "spec.containers[0].volume_mounts[1].mount_path"),
                ],
            },
            TestCase {
                name: "bad resources",
                container: bad_resources,
                expected: vec![
                    (ErrorKind::NotSupported, "spec.containers[0].resources.limits[gpu]"),
                    (ErrorKind::Invalid, "spec.containers[0].resources.requests[cpu]"),
                ],
            },
            TestCase {
                name: "security context without user",
                container: bad_security_context,
                expected: vec![(
                    ErrorKind::Required,
                    "spec.containers[0].security_context.run_as_user",
                )],
            },
        ];

        for tc in cases {
            let errs = validate(&[tc.container]);
            assert_eq!(kinds_and_fields(&errs), tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn test_duplicate_container_names() {
        let errs = validate(&[container("app"), container("app")]);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![(ErrorKind::Duplicate, "spec.containers[1].name")]
        );
    }

    #[test]
    fn test_names_unique_across_lists() {
        let others: BTreeSet<&str> = ["app", "init"].into_iter().collect();
        let errs = validate_names_unique_across(
            &[container("init"), container("setup"), container("")],
            &others,
            &FieldPath::new("spec").child("installation_containers"),
        );
        assert_eq!(
            kinds_and_fields(&errs),
            vec![(ErrorKind::Duplicate, "spec.installation_containers[0].name")]
        );
    }

    #[test]
    fn test_host_port_conflicts() {
        let mut a = container("a");
        a.ports.push(port("", 8080, Protocol::Tcp));
        a.ports.push(port("", 8080, Protocol::Udp));
        let mut b = container("b");
        b.ports.push(port("", 9090, Protocol::Tcp));
        b.ports.push(port("", 8080, Protocol::Tcp));

        let errs = validate(&[a, b]);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Duplicate);
        assert_eq!(errs[0].field, "spec.containers[1].ports[1].container_port");
        assert_eq!(
            errs[0].to_string(),
            "spec.containers[1].ports[1].container_port: duplicate value: \"TCP/8080\""
        );
    }

    #[test]
    fn test_resource_names_are_configurable() {
        let cfg = ValidationConfig {
            resource_names: vec!["cpu".to_string(), "memory".to_string(), "gpu".to_string()],
            ..Default::default()
        };
        let mut requirements = ResourceRequirements::default();
        requirements.limits.insert("gpu".to_string(), Quantity::new(2));
        assert!(validate_resource_requirements(&requirements, &FieldPath::new("resources"), &cfg)
            .is_empty());
        assert_eq!(
            validate_resource_requirements(
                &requirements,
                &FieldPath::new("resources"),
                &ValidationConfig::default()
            )[0]
                .to_string(),
            "resources.limits[gpu]: unsupported value: \"gpu\": supported values: \"cpu\", \"memory\""
        );
    }

    #[test]
    fn test_container_updates() {
        let path = FieldPath::new("spec").child("containers");
        let old = vec![container("a"), container("b")];

        let (errs, stop) = validate_container_updates(&old[..1], &old, &path);
        assert!(stop);
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[0].to_string(),
            "spec.containers: forbidden: pod updates may not add or remove containers"
        );

        let mut new = old.clone();
        new[0].image.clear();
        new[1].image = "app:v2 ".to_string();
        let (errs, stop) = validate_container_updates(&new, &old, &path);
        assert!(!stop);
        assert_eq!(
            kinds_and_fields(&errs),
            vec![
                (ErrorKind::Required, "spec.containers[0].image"),
                (ErrorKind::Invalid, "spec.containers[1].image"),
            ]
        );
    }

    #[test]
    fn test_with_images_from() {
        let old = vec![container("a")];
        let mut new = old.clone();
        new[0].image = "app:v2".to_string();
        new[0].working_dir = "/srv".to_string();

        let munged = with_images_from(&new, &old);
        assert_eq!(munged[0].image, old[0].image);
        assert_eq!(munged[0].working_dir, "/srv");
        // The input is left as it was.
        assert_eq!(new[0].image, "app:v2");
    }
}
