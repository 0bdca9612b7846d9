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

//! Label selector and affinity validation.

use super::names::is_qualified_name;
use super::objectmeta::validate_labels;
use crate::api::core::{
    Affinity, LabelSelector, LabelSelectorOperator, LabelSelectorRequirement, PodAffinityTerm,
};
use crate::field::{forbidden, invalid, not_supported, required, ErrorList, FieldPath};
use std::collections::BTreeMap;

/// Validate a label selector.
pub fn validate_label_selector(selector: &LabelSelector, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    all_errs.append(validate_labels(&selector.match_labels, &path.child("match_labels")));
    all_errs.append(validate_label_selector_requirements(
        &selector.match_expressions,
        &path.child("match_expressions"),
    ));
    all_errs
}

fn validate_label_selector_requirements(
    requirements: &[LabelSelectorRequirement],
    path: &FieldPath,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    for (i, requirement) in requirements.iter().enumerate() {
        all_errs.append(validate_label_selector_requirement(requirement, &path.index(i)));
    }
    all_errs
}

/// `in` and `not_in` need values; `exists` and `does_not_exist` take none.
pub fn validate_label_selector_requirement(
    requirement: &LabelSelectorRequirement,
    path: &FieldPath,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    match requirement.operator {
        LabelSelectorOperator::In | LabelSelectorOperator::NotIn => {
            if requirement.values.is_empty() {
                all_errs.push(required(
                    &path.child("values"),
                    "must be specified when `operator` is 'In' or 'NotIn'",
                ));
            }
        }
        LabelSelectorOperator::Exists | LabelSelectorOperator::DoesNotExist => {
            if !requirement.values.is_empty() {
                all_errs.push(forbidden(
                    &path.child("values"),
                    "may not be specified when `operator` is 'Exists' or 'DoesNotExist'",
                ));
            }
        }
        _ => all_errs.push(not_supported(
            &path.child("operator"),
            &requirement.operator,
            LabelSelectorOperator::KNOWN,
        )),
    }
    for msg in is_qualified_name(&requirement.key) {
        all_errs.push(invalid(&path.child("key"), &requirement.key, &msg));
    }
    all_errs
}

/// Only the required terms of pod affinity and anti-affinity are checked.
pub fn validate_affinity(affinity: &Affinity, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if let Some(term) = affinity.pod_affinity.as_ref().and_then(|a| a.required.as_ref()) {
        all_errs.append(validate_pod_affinity_term(
            term,
            &path.child("pod_affinity").child("required"),
        ));
    }
    if let Some(term) = affinity
        .pod_anti_affinity
        .as_ref()
        .and_then(|a| a.required.as_ref())
    {
        all_errs.append(validate_pod_affinity_term(
            term,
            &path.child("pod_anti_affinity").child("required"),
        ));
    }
    all_errs
}

fn validate_pod_affinity_term(term: &PodAffinityTerm, path: &FieldPath) -> ErrorList {
    let mut all_errs = ErrorList::new();
    all_errs.append(validate_labels(&term.match_labels, &path.child("match_labels")));
    all_errs.append(validate_label_selector_requirements(
        &term.match_expressions,
        &path.child("match_expressions"),
    ));
    all_errs
}

/// Reports a selector that would not select the labels of its own template.
pub fn validate_selector_matches_labels(
    selector: &LabelSelector,
    labels: &BTreeMap<String, String>,
    path: &FieldPath,
) -> ErrorList {
    let mut all_errs = ErrorList::new();
    if !selector.is_empty() && !selector.matches(labels) {
        all_errs.push(invalid(
            path,
            crate::field::BadValue::debug(labels),
            "`selector` does not match template `labels`",
        ));
    }
    all_errs
}
