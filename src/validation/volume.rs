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

//! Volume validation.

use super::names::validate_dns1123_label;
use crate::api::core::{ConfigMapVolumeSource, KeyToPath, Volume, VolumeSource};
use crate::field::{duplicate, invalid, required, ErrorList, FieldPath};
use std::collections::BTreeMap;

const FILE_MODE_ERROR_MSG: &str = "must be a number between 0 and 0777 (octal), both inclusive";

const MAX_FILE_MODE: i64 = 0o777;

/// Validate the volumes of a pod spec.
///
/// Returns the sources of the volumes that passed validation, keyed by name,
/// for resolving volume mounts.
pub fn validate_volumes(
    volumes: &[Volume],
    path: &FieldPath,
) -> (BTreeMap<String, VolumeSource>, ErrorList) {
    let mut all_errs = ErrorList::new();
    let mut sources = BTreeMap::new();

    for (i, volume) in volumes.iter().enumerate() {
        let idx_path = path.index(i);
        let name_path = idx_path.child("name");

        let mut errs = validate_volume_source(&volume.source, &idx_path);
        if volume.name.is_empty() {
            errs.push(required(&name_path, ""));
        } else {
            errs.append(validate_dns1123_label(&volume.name, &name_path));
        }
        if sources.contains_key(&volume.name) {
            errs.push(duplicate(&name_path, &volume.name));
        }

        if errs.is_empty() {
            sources.insert(volume.name.clone(), volume.source.clone());
        } else {
            all_errs.append(errs);
        }
    }
    (sources, all_errs)
}

fn validate_volume_source(source: &VolumeSource, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if let Some(config_map) = &source.config_map {
        all_errs.append(validate_config_map_volume_source(config_map, &path.child("config_map")));
    }
    all_errs
}

fn validate_config_map_volume_source(source: &ConfigMapVolumeSource, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if source.name.is_empty() {
        all_errs.push(required(&path.child("name"), ""));
    }
    if let Some(mode) = source.default_mode {
        if !(0..=MAX_FILE_MODE).contains(&mode) {
            all_errs.push(invalid(&path.child("default_mode"), mode, FILE_MODE_ERROR_MSG));
        }
    }
    let items_path = path.child("items");
    for (i, item) in source.items.iter().enumerate() {
        all_errs.append(validate_key_to_path(item, &items_path.index(i)));
    }
    all_errs
}

fn validate_key_to_path(item: &KeyToPath, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if item.key.is_empty() {
        all_errs.push(required(&path.child("key"), ""));
    }
    if item.path.is_empty() {
        all_errs.push(required(&path.child("path"), ""));
    }
    all_errs.append(validate_local_non_reserved_path(&item.path, &path.child("path")));
    if let Some(mode) = item.mode {
        if !(0..=MAX_FILE_MODE).contains(&i64::from(mode)) {
            all_errs.push(invalid(&path.child("mode"), mode, FILE_MODE_ERROR_MSG));
        }
    }
    all_errs
}

/// A local descending path is relative and never steps up with `..`.
pub(crate) fn validate_local_descending_path(target: &str, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if target.starts_with('/') {
        all_errs.push(invalid(path, target, "must be a relative path"));
    }
    if target.split('/').any(|part| part == "..") {
        all_errs.push(invalid(path, target, "must not contain '..'"));
    }
    all_errs
}

/// Like [`validate_local_descending_path`], and additionally rejects names
/// starting with `..`, which are reserved for atomic writers.
pub(crate) fn validate_local_non_reserved_path(target: &str, path: &FieldPath) -> ErrorList {
    let mut all_errs = validate_local_descending_path(target, path);
    if target.len() >= 2 && target.starts_with("..") {
        all_errs.push(invalid(path, target, "must not start with '..'"));
    }
    all_errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ErrorKind;

    fn config_map_volume(name: &str, config_map: &str) -> Volume {
        Volume {
            name: name.to_string(),
            source: VolumeSource {
                config_map: Some(ConfigMapVolumeSource {
                    name: config_map.to_string(),
                    ..Default::default()
                }),
            },
        }
    }

    fn item(key: &str, path: &str, mode: Option<i32>) -> KeyToPath {
        KeyToPath {
            key: key.to_string(),
            path: path.to_string(),
            mode,
        }
    }

    #[test]
    fn test_validate_volumes() {
        let volumes = vec![
            config_map_volume("config", "app-config"),
            Volume {
                name: "scratch".to_string(),
                source: VolumeSource::default(),
            },
        ];
        let (sources, errs) = validate_volumes(&volumes, &FieldPath::new("volumes"));
        assert!(errs.is_empty());
        assert_eq!(sources.len(), 2);
        assert!(sources["config"].config_map.is_some());
    }

    #[test]
    fn test_invalid_volumes_are_not_resolvable() {
        let volumes = vec![
            config_map_volume("config", "app-config"),
            config_map_volume("config", "other"),
            config_map_volume("", "app-config"),
            config_map_volume("Bad_Name", "app-config"),
            config_map_volume("no-source", ""),
        ];
        let (sources, errs) = validate_volumes(&volumes, &FieldPath::new("volumes"));
        let got: Vec<(ErrorKind, &str)> = errs.iter().map(|e| (e.kind, e.field.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (ErrorKind::Duplicate, "volumes[1].name"),
                (ErrorKind::Required, "volumes[2].name"),
                (ErrorKind::Invalid, "volumes[3].name"),
                (ErrorKind::Required, "volumes[4].config_map.name"),
            ]
        );
        assert_eq!(sources.keys().collect::<Vec<_>>(), vec!["config"]);
        assert_eq!(sources["config"].config_map.as_ref().map(|c| c.name.as_str()), Some("app-config"));
    }

    #[test]
    fn test_config_map_modes() {
        let mut volume = config_map_volume("config", "app-config");
        if let Some(source) = volume.source.config_map.as_mut() {
            source.default_mode = Some(0o1000);
            source.items.push(item("a", "a.conf", Some(0o644)));
            source.items.push(item("b", "b.conf", Some(-1)));
        }
        let (_, errs) = validate_volumes(&[volume], &FieldPath::new("volumes"));
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["volumes[0].config_map.default_mode", "volumes[0].config_map.items[1].mode"]
        );
        assert_eq!(
            errs[0].to_string(),
            "volumes[0].config_map.default_mode: invalid value: 512: must be a number between 0 and 0777 (octal), both inclusive"
        );
    }

    #[test]
    fn test_key_to_path() {
        struct TestCase {
            item: KeyToPath,
            expected: Vec<&'static str>,
        }

        let cases = vec![
            TestCase { item: item("a", "conf/a.conf", None), expected: vec![] },
            TestCase { item: item("a", "..a/b", None), expected: vec!["must not start with '..'"] },
            TestCase { item: item("a", "/etc/a", None), expected: vec!["must be a relative path"] },
            TestCase {
                item: item("a", "a/../../b", None),
                expected: vec!["must not contain '..'"],
            },
            TestCase {
                item: item("a", "..", None),
                expected: vec!["must not contain '..'", "must not start with '..'"],
            },
            TestCase { item: item("", "", None), expected: vec!["", ""] },
        ];

        for tc in cases {
            let errs = validate_key_to_path(&tc.item, &FieldPath::new("item"));
            let details: Vec<&str> = errs.iter().map(|e| e.detail.as_str()).collect();
            assert_eq!(details, tc.expected, "{:?}", tc.item);
        }
    }
}
