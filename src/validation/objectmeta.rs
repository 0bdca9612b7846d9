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

//! Validation of the common metadata envelope.

use super::config::ValidationConfig;
use super::names::{is_dns1123_label, is_qualified_name, is_valid_label_value, ValidateNameFn};
use crate::api::meta::{accessor, ApiObject, ObjectMeta, OwnerReference};
use crate::field::{
    forbidden, internal, invalid, required, too_long, BadValue, ErrorList, FieldPath,
};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Detail attached to every changed immutable field.
pub const FIELD_IMMUTABLE_ERROR_MSG: &str = "field is immutable";

const IS_NEGATIVE_ERROR_MSG: &str = "must be greater than or equal to 0";

/// Validate the metadata of a new object.
///
/// `requires_namespace` is true for namespaced kinds. `name_fn` is the naming
/// rule of the kind, applied to `name` strictly and to `generate_name` in
/// prefix mode.
pub fn validate_object_meta(
    meta: &ObjectMeta,
    requires_namespace: bool,
    name_fn: ValidateNameFn,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();

    if !meta.generate_name.is_empty() {
        for msg in name_fn(&meta.generate_name, true) {
            all_errs.push(invalid(&path.child("generate_name"), &meta.generate_name, &msg));
        }
    }

    if meta.name.is_empty() {
        all_errs.push(required(&path.child("name"), "name or generate_name is required"));
    } else {
        for msg in name_fn(&meta.name, false) {
            all_errs.push(invalid(&path.child("name"), &meta.name, &msg));
        }
    }

    if requires_namespace {
        if meta.namespace.is_empty() {
            all_errs.push(required(&path.child("namespace"), ""));
        } else {
            for msg in is_dns1123_label(&meta.namespace) {
                all_errs.push(invalid(&path.child("namespace"), &meta.namespace, &msg));
            }
        }
    } else if !meta.namespace.is_empty() {
        all_errs.push(forbidden(&path.child("namespace"), "not allowed on this type"));
    }

    if let Some(seconds) = meta.deletion_grace_period_seconds {
        all_errs.append(validate_nonnegative_field(
            seconds,
            &path.child("deletion_grace_period_seconds"),
        ));
    }

    all_errs.append(validate_labels(&meta.labels, &path.child("labels")));
    all_errs.append(validate_annotations(&meta.annotations, &path.child("annotations"), cfg));
    all_errs.append(validate_owner_references(
        &meta.owner_references,
        &path.child("owner_references"),
        cfg,
    ));
    all_errs
}

/// Like [`validate_object_meta`] for a value only known through [`ApiObject`].
///
/// A value without object metadata yields a single internal error.
pub fn validate_object_meta_accessor(
    obj: &dyn ApiObject,
    requires_namespace: bool,
    name_fn: ValidateNameFn,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    match accessor(obj) {
        Ok(meta) => validate_object_meta(meta, requires_namespace, name_fn, path, cfg),
        Err(err) => vec![internal(path, &err)].into(),
    }
}

/// Validate the metadata of an object being updated.
pub fn validate_object_meta_update(
    new_meta: &ObjectMeta,
    old_meta: &ObjectMeta,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();

    if new_meta.resource_version.is_empty() {
        all_errs.push(invalid(
            &path.child("resource_version"),
            &new_meta.resource_version,
            "must be specified for an update",
        ));
    }

    all_errs.append(validate_immutable_field(&new_meta.name, &old_meta.name, &path.child("name")));
    all_errs.append(validate_immutable_field(
        &new_meta.namespace,
        &old_meta.namespace,
        &path.child("namespace"),
    ));
    all_errs.append(validate_immutable_field(&new_meta.uid, &old_meta.uid, &path.child("uid")));
    all_errs.append(validate_immutable_field(
        &new_meta.creation_time,
        &old_meta.creation_time,
        &path.child("creation_time"),
    ));
    all_errs.append(validate_immutable_field(
        &new_meta.deletion_time,
        &old_meta.deletion_time,
        &path.child("deletion_time"),
    ));
    all_errs.append(validate_immutable_field(
        &new_meta.deletion_grace_period_seconds,
        &old_meta.deletion_grace_period_seconds,
        &path.child("deletion_grace_period_seconds"),
    ));

    all_errs.append(validate_labels(&new_meta.labels, &path.child("labels")));
    all_errs.append(validate_annotations(&new_meta.annotations, &path.child("annotations"), cfg));
    all_errs.append(validate_owner_references(
        &new_meta.owner_references,
        &path.child("owner_references"),
        cfg,
    ));
    all_errs
}

/// Reports a single `Invalid` error if `new_val` differs from `old_val`.
pub fn validate_immutable_field<T>(new_val: &T, old_val: &T, path: &FieldPath) -> ErrorList
where
    T: PartialEq + Debug + ?Sized,
{
    let mut all_errs = ErrorList::new();
    if new_val != old_val {
        all_errs.push(invalid(path, BadValue::debug(new_val), FIELD_IMMUTABLE_ERROR_MSG));
    }
    all_errs
}

/// Reports `value` if it is negative.
pub fn validate_nonnegative_field(value: i64, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if value < 0 {
        all_errs.push(invalid(path, value, IS_NEGATIVE_ERROR_MSG));
    }
    all_errs
}

/// Keys must be qualified names and values valid label values.
pub fn validate_labels(labels: &BTreeMap<String, String>, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (k, v) in labels {
        for msg in is_qualified_name(k) {
            all_errs.push(invalid(path, k, &msg));
        }
        for msg in is_valid_label_value(v) {
            all_errs.push(invalid(path, v, &msg));
        }
    }
    all_errs
}

/// Keys must be qualified names once lower-cased. The summed size of all keys
/// and values is capped; exceeding it is reported once.
pub fn validate_annotations(
    annotations: &BTreeMap<String, String>,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut total_size = 0usize;
    for (k, v) in annotations {
        for msg in is_qualified_name(&k.to_lowercase()) {
            all_errs.push(invalid(path, k, &msg));
        }
        total_size += k.len() + v.len();
    }
    if total_size > cfg.total_annotation_size_limit_bytes {
        all_errs.push(too_long(path, "", cfg.total_annotation_size_limit_bytes));
    }
    all_errs
}

fn validate_owner_reference(
    owner: &OwnerReference,
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if owner.api_version.is_empty() {
        all_errs.push(invalid(
            &path.child("api_version"),
            &owner.api_version,
            "version must not be empty",
        ));
    }
    if owner.kind.is_empty() {
        all_errs.push(invalid(&path.child("kind"), &owner.kind, "kind must not be empty"));
    }
    if owner.name.is_empty() {
        all_errs.push(invalid(&path.child("name"), &owner.name, "name must not be empty"));
    }
    if owner.uid.is_empty() {
        all_errs.push(invalid(&path.child("uid"), &owner.uid, "uid must not be empty"));
    }
    if cfg.is_banned_owner(&owner.kind) {
        all_errs.push(invalid(
            path,
            BadValue::debug(owner),
            &format!("{} is disallowed from being an owner", owner.kind),
        ));
    }
    all_errs
}

/// Every reference must be complete and at most one may be the controller.
pub fn validate_owner_references(
    owners: &[OwnerReference],
    path: &FieldPath,
    cfg: &ValidationConfig,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    let mut controller: Option<&OwnerReference> = None;
    for (i, owner) in owners.iter().enumerate() {
        all_errs.append(validate_owner_reference(owner, &path.index(i), cfg));
        if !owner.is_controller() {
            continue;
        }
        match controller {
            Some(first) => all_errs.push(forbidden(
                path,
                &format!(
                    "Only one reference can have Controller set to true. Found \"true\" in references for {}/{} and {}/{}",
                    first.kind, first.name, owner.kind, owner.name
                ),
            )),
            None => controller = Some(owner),
        }
    }
    all_errs
}
