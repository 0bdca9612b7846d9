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

//! Object and list metadata shared by every kind.
//!
//! Each kind implements [`HasObjectMeta`] (or [`HasListMeta`] for collections)
//! statically. The object-safe [`ApiObject`] trait exposes the same views
//! behind `dyn`, which is what the admission layer receives; [`accessor`] and
//! [`list_accessor`] turn a missing view into an [`AccessorError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Capabilities
// ============================================================================

/// ApiObject is an API value that can travel through admission.
pub trait ApiObject: Send + Sync {
    /// Returns the object as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the kind of this object.
    fn kind(&self) -> &str;

    /// Returns the object metadata, if this value has any.
    fn get_object_meta(&self) -> Option<&ObjectMeta> {
        None
    }

    /// Returns the list metadata, if this value is a collection.
    fn get_list_meta(&self) -> Option<&ListMeta> {
        None
    }
}

/// HasObjectMeta is implemented by every single-object kind.
pub trait HasObjectMeta {
    fn object_meta(&self) -> &ObjectMeta;
    fn object_meta_mut(&mut self) -> &mut ObjectMeta;
}

/// HasListMeta is implemented by every collection kind.
pub trait HasListMeta {
    fn list_meta(&self) -> &ListMeta;
    fn list_meta_mut(&mut self) -> &mut ListMeta;
}

/// AccessorError reports a value that lacks the requested metadata view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessorError {
    #[error("object does not implement the Object interfaces")]
    NotObject,

    #[error("object does not implement the List interfaces")]
    NotList,
}

/// Returns the object metadata of `obj`.
pub fn accessor(obj: &dyn ApiObject) -> Result<&ObjectMeta, AccessorError> {
    obj.get_object_meta().ok_or(AccessorError::NotObject)
}

/// Returns the list metadata of `obj`.
pub fn list_accessor(obj: &dyn ApiObject) -> Result<&ListMeta, AccessorError> {
    obj.get_list_meta().ok_or(AccessorError::NotList)
}

// ============================================================================
// Metadata types
// ============================================================================

/// UID identifies an object for its whole lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(uid: &str) -> Self {
        Self(uid.to_string())
    }
}

impl From<&Uid> for crate::field::BadValue {
    fn from(uid: &Uid) -> Self {
        crate::field::BadValue::Str(uid.0.clone())
    }
}

/// TypeMeta names the kind and API version of a serialized object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

/// ListMeta is the metadata of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    /// Token for fetching the next page, empty on the last page.
    #[serde(rename = "continue", skip_serializing_if = "String::is_empty")]
    pub continue_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_item_count: Option<i64>,
}

/// ObjectMeta is the identity and metadata envelope of every object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    /// Prefix used to generate a unique name when `name` is not provided.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generate_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_grace_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(skip_serializing_if = "Uid::is_empty")]
    pub uid: Uid,
}

impl ObjectMeta {
    /// Create metadata for a namespaced object.
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    /// Returns true if the object has been marked for deletion.
    pub fn is_being_deleted(&self) -> bool {
        self.deletion_time.is_some()
    }
}

impl ApiObject for ObjectMeta {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        "ObjectMeta"
    }

    fn get_object_meta(&self) -> Option<&ObjectMeta> {
        Some(self)
    }
}

impl ApiObject for ListMeta {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        "ListMeta"
    }

    fn get_list_meta(&self) -> Option<&ListMeta> {
        Some(self)
    }
}

/// OwnerReference points at the object that owns this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: Uid,
    /// If true, the owner is the managing controller. At most one reference may set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

impl OwnerReference {
    pub fn is_controller(&self) -> bool {
        self.controller == Some(true)
    }
}

/// ObjectReference identifies an arbitrary object, e.g. the subject of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectReference {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub uid: Uid,
    pub api_version: String,
    pub resource_version: String,
    /// Path to a sub-field of the object, e.g. `spec.containers[2]`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field_path: String,
}

// ============================================================================
// Controller references
// ============================================================================

/// Returns the owner reference marked as controller, if any.
pub fn controller_of(meta: &ObjectMeta) -> Option<&OwnerReference> {
    meta.owner_references.iter().find(|r| r.is_controller())
}

/// Returns true if `meta` is controlled by the object described by `owner`.
pub fn is_controlled_by(meta: &ObjectMeta, owner: &ObjectMeta) -> bool {
    controller_of(meta).map_or(false, |r| r.uid == owner.uid)
}

/// Build a controller owner reference pointing at `owner`.
pub fn new_controller_ref(owner: &ObjectMeta, api_version: &str, kind: &str) -> OwnerReference {
    OwnerReference {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        name: owner.name.clone(),
        uid: owner.uid.clone(),
        controller: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl ApiObject for Opaque {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn kind(&self) -> &str {
            "Opaque"
        }
    }

    fn owner() -> ObjectMeta {
        ObjectMeta {
            uid: Uid::new("owner-uid"),
            ..ObjectMeta::new("default", "web")
        }
    }

    #[test]
    fn test_accessor() {
        let meta = ObjectMeta::new("default", "web");
        assert_eq!(accessor(&meta).unwrap().name, "web");
        assert_eq!(accessor(&Opaque), Err(AccessorError::NotObject));
        assert_eq!(
            AccessorError::NotObject.to_string(),
            "object does not implement the Object interfaces"
        );
    }

    #[test]
    fn test_list_accessor() {
        let list = ListMeta {
            resource_version: "7".to_string(),
            ..Default::default()
        };
        assert_eq!(list_accessor(&list).unwrap().resource_version, "7");
        assert_eq!(list_accessor(&Opaque), Err(AccessorError::NotList));
        assert_eq!(
            list_accessor(&ObjectMeta::default()),
            Err(AccessorError::NotList)
        );
    }

    #[test]
    fn test_controller_refs() {
        let owner = owner();
        let mut child = ObjectMeta::new("default", "web-0");
        assert!(controller_of(&child).is_none());
        assert!(!is_controlled_by(&child, &owner));

        child.owner_references.push(OwnerReference {
            api_version: "carry.i/v1".to_string(),
            kind: "configmap".to_string(),
            name: "cfg".to_string(),
            uid: Uid::new("cfg-uid"),
            controller: None,
        });
        child
            .owner_references
            .push(new_controller_ref(&owner, "carry.i/v1", "statefulset"));

        let controller = controller_of(&child).unwrap();
        assert_eq!(controller.name, "web");
        assert_eq!(controller.kind, "statefulset");
        assert!(is_controlled_by(&child, &owner));

        let stranger = ObjectMeta {
            uid: Uid::new("other"),
            ..ObjectMeta::new("default", "web")
        };
        assert!(!is_controlled_by(&child, &stranger));
    }

    #[test]
    fn test_object_meta_serde() {
        let meta: ObjectMeta = serde_json::from_value(serde_json::json!({
            "name": "web",
            "namespace": "default",
            "labels": {"app": "web"},
            "owner_references": [
                {"api_version": "carry.i/v1", "kind": "deployment", "name": "d", "uid": "1", "controller": true}
            ],
            "creation_time": "2024-01-02T03:04:05Z",
            "uid": "abc"
        }))
        .unwrap();

        assert_eq!(meta.labels.get("app").map(String::as_str), Some("web"));
        assert!(meta.owner_references[0].is_controller());
        assert_eq!(meta.uid.as_str(), "abc");
        assert!(meta.creation_time.is_some());
        assert!(!meta.is_being_deleted());
    }
}
