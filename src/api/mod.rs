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

//! API object types for carry.i/v1.
//!
//! The types are plain data. All of them derive `Clone` for independent copies
//! and `PartialEq` for structural comparison, and (de)serialize with serde
//! using snake_case field names.

/// Declares a string-backed enum with a fixed set of known values.
///
/// Besides the listed variants every enum gets `Empty` (the unset value, also
/// the default) and `Other(String)` holding any unrecognised value, so that a
/// validator can still report what the client sent.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            /// The value is unset.
            #[default]
            Empty,
            /// A value outside the known set.
            Other(String),
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const KNOWN: &'static [&'static str] = &[$($value),*];

            /// Returns the wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $value,)*
                    $name::Empty => "",
                    $name::Other(s) => s.as_str(),
                }
            }

            /// Parse a wire value. Unknown values are kept in `Other`.
            pub fn from_str(s: &str) -> Self {
                match s {
                    $($value => $name::$variant,)*
                    "" => $name::Empty,
                    other => $name::Other(other.to_string()),
                }
            }

            pub fn is_empty(&self) -> bool {
                matches!(self, $name::Empty)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_str(&s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl From<&$name> for crate::field::BadValue {
            fn from(v: &$name) -> Self {
                crate::field::BadValue::Str(v.as_str().to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Implements the metadata capabilities for a kind carrying `metadata: ObjectMeta`.
macro_rules! api_object {
    ($ty:ty, $kind:literal) => {
        impl crate::api::meta::ApiObject for $ty {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            fn kind(&self) -> &str {
                $kind
            }

            fn get_object_meta(&self) -> Option<&crate::api::meta::ObjectMeta> {
                Some(&self.metadata)
            }
        }

        impl crate::api::meta::HasObjectMeta for $ty {
            fn object_meta(&self) -> &crate::api::meta::ObjectMeta {
                &self.metadata
            }

            fn object_meta_mut(&mut self) -> &mut crate::api::meta::ObjectMeta {
                &mut self.metadata
            }
        }
    };
}

/// Implements the list metadata capabilities for a kind carrying `metadata: ListMeta`.
macro_rules! api_list {
    ($ty:ty, $kind:literal) => {
        impl crate::api::meta::ApiObject for $ty {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            fn kind(&self) -> &str {
                $kind
            }

            fn get_list_meta(&self) -> Option<&crate::api::meta::ListMeta> {
                Some(&self.metadata)
            }
        }

        impl crate::api::meta::HasListMeta for $ty {
            fn list_meta(&self) -> &crate::api::meta::ListMeta {
                &self.metadata
            }

            fn list_meta_mut(&mut self) -> &mut crate::api::meta::ListMeta {
                &mut self.metadata
            }
        }
    };
}

pub mod apps;
pub mod core;
pub mod meta;
pub mod resource;

pub use meta::{accessor, list_accessor, AccessorError, ApiObject, HasListMeta, HasObjectMeta};
pub use resource::Quantity;

/// API version of every kind in this crate.
pub const API_VERSION: &str = "carry.i/v1";
