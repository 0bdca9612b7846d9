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

//! Attributes describing an admission request.

use super::interfaces::Operation;
use crate::api::meta::{ApiObject, HasObjectMeta};
use crate::api::API_VERSION;

/// GroupVersionResource identifies a resource collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// GroupVersionKind identifies a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Parse a `group/version` string and pair it with `kind`.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }
}

/// Attributes is what an admission plugin sees of a request.
pub trait Attributes {
    /// Returns the name of the object as presented in the request.
    fn get_name(&self) -> &str;

    /// Returns the namespace of the request, empty for cluster-scoped kinds.
    fn get_namespace(&self) -> &str;

    fn get_resource(&self) -> &GroupVersionResource;

    /// Returns the subresource being written, e.g. `status`.
    fn get_subresource(&self) -> &str;

    fn get_operation(&self) -> Operation;

    /// Returns the object from the incoming request.
    fn get_object(&self) -> Option<&dyn ApiObject>;

    /// Returns the stored object. Only set for UPDATE and DELETE.
    fn get_old_object(&self) -> Option<&dyn ApiObject>;

    fn get_kind(&self) -> &GroupVersionKind;

    fn is_dry_run(&self) -> bool;
}

/// AttributesRecord is the owned implementation of [`Attributes`].
pub struct AttributesRecord {
    pub name: String,
    pub namespace: String,
    pub resource: GroupVersionResource,
    pub subresource: String,
    pub operation: Operation,
    pub object: Option<Box<dyn ApiObject>>,
    pub old_object: Option<Box<dyn ApiObject>>,
    pub kind: GroupVersionKind,
    pub dry_run: bool,
}

impl AttributesRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        namespace: &str,
        resource: GroupVersionResource,
        subresource: &str,
        operation: Operation,
        object: Option<Box<dyn ApiObject>>,
        old_object: Option<Box<dyn ApiObject>>,
        kind: GroupVersionKind,
        dry_run: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            resource,
            subresource: subresource.to_string(),
            operation,
            object,
            old_object,
            kind,
            dry_run,
        }
    }

    /// Build the attributes of a request carrying `object`.
    ///
    /// Name and namespace come from the object metadata, the kind from the
    /// object itself and the resource is its lower-cased plural.
    pub fn for_object<T>(operation: Operation, object: T, old_object: Option<T>) -> Self
    where
        T: ApiObject + HasObjectMeta + 'static,
    {
        let kind = GroupVersionKind::from_api_version(API_VERSION, object.kind());
        let resource = GroupVersionResource::new(
            &kind.group,
            &kind.version,
            &format!("{}s", kind.kind.to_lowercase()),
        );
        let name = object.object_meta().name.clone();
        let namespace = object.object_meta().namespace.clone();
        Self {
            name,
            namespace,
            resource,
            subresource: String::new(),
            operation,
            object: Some(Box::new(object) as Box<dyn ApiObject>),
            old_object: old_object.map(|o| Box::new(o) as Box<dyn ApiObject>),
            kind,
            dry_run: false,
        }
    }

    /// Target a subresource of the object.
    pub fn with_subresource(mut self, subresource: &str) -> Self {
        self.subresource = subresource.to_string();
        self
    }
}

impl Attributes for AttributesRecord {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_namespace(&self) -> &str {
        &self.namespace
    }

    fn get_resource(&self) -> &GroupVersionResource {
        &self.resource
    }

    fn get_subresource(&self) -> &str {
        &self.subresource
    }

    fn get_operation(&self) -> Operation {
        self.operation
    }

    fn get_object(&self) -> Option<&dyn ApiObject> {
        self.object.as_deref()
    }

    fn get_old_object(&self) -> Option<&dyn ApiObject> {
        self.old_object.as_deref()
    }

    fn get_kind(&self) -> &GroupVersionKind {
        &self.kind
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
