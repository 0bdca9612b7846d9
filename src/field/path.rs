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

//! Field paths that locate a value inside a nested object.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    Key(String),
}

/// FieldPath is an immutable locator such as `spec.containers[0].resources.limits[cpu]`.
///
/// Extending a path never touches the parent; every call returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Create a root path from a single field name.
    pub fn new(name: &str) -> Self {
        Self {
            segments: vec![Segment::Field(name.to_string())],
        }
    }

    /// Create a path from a chain of field names, e.g. `["spec", "replicas"]`.
    pub fn from_fields(names: &[&str]) -> Self {
        Self {
            segments: names
                .iter()
                .map(|n| Segment::Field((*n).to_string()))
                .collect(),
        }
    }

    /// Returns a new path with a named field appended.
    pub fn child(&self, name: &str) -> Self {
        self.extend(Segment::Field(name.to_string()))
    }

    /// Returns a new path with a list index appended.
    pub fn index(&self, index: usize) -> Self {
        self.extend(Segment::Index(index))
    }

    /// Returns a new path with a map key appended.
    pub fn key(&self, key: &str) -> Self {
        self.extend(Segment::Key(key.to_string()))
    }

    /// Number of segments in the path.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn extend(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Key(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_rendering() {
        let root = FieldPath::new("spec");
        assert_eq!(root.to_string(), "spec");
        assert_eq!(root.child("containers").index(0).child("image").to_string(),
            "spec.containers[0].image");
        assert_eq!(
            root.child("containers")
                .index(2)
                .child("resources")
                .child("limits")
                .key("cpu")
                .to_string(),
            "spec.containers[2].resources.limits[cpu]"
        );
    }

    #[test]
    fn test_path_parent_unchanged() {
        let parent = FieldPath::new("metadata");
        let child = parent.child("labels");
        assert_eq!(parent.to_string(), "metadata");
        assert_eq!(child.to_string(), "metadata.labels");
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_from_fields() {
        let path = FieldPath::from_fields(&["spec", "template", "spec"]);
        assert_eq!(path.to_string(), "spec.template.spec");
        assert_eq!(path, FieldPath::new("spec").child("template").child("spec"));
    }
}
