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

//! Operation filter shared by admission plugins.

use super::interfaces::{Interface, Operation};
use std::collections::BTreeSet;

/// Handler answers [`Interface::handles`] from a fixed set of operations.
/// Plugins embed one and delegate to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    operations: BTreeSet<Operation>,
}

impl Handler {
    pub fn new(operations: &[Operation]) -> Self {
        Self {
            operations: operations.iter().copied().collect(),
        }
    }

    /// Handles CREATE and UPDATE, the operations that carry a new object.
    pub fn new_create_update() -> Self {
        Self::new(&[Operation::Create, Operation::Update])
    }

    pub fn new_all() -> Self {
        Self::new(&[
            Operation::Create,
            Operation::Update,
            Operation::Delete,
            Operation::Connect,
        ])
    }

    /// The handled operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.operations.iter().copied()
    }
}

impl Interface for Handler {
    fn handles(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles() {
        struct TestCase {
            name: &'static str,
            handler: Handler,
            expected: [bool; 4],
        }

        let cases = vec![
            TestCase {
                name: "create only",
                handler: Handler::new(&[Operation::Create]),
                expected: [true, false, false, false],
            },
            TestCase {
                name: "create and update",
                handler: Handler::new_create_update(),
                expected: [true, true, false, false],
            },
            TestCase {
                name: "all",
                handler: Handler::new_all(),
                expected: [true, true, true, true],
            },
            TestCase {
                name: "none",
                handler: Handler::new(&[]),
                expected: [false, false, false, false],
            },
        ];

        let ops = [Operation::Create, Operation::Update, Operation::Delete, Operation::Connect];
        for tc in cases {
            let got: Vec<bool> = ops.iter().map(|op| tc.handler.handles(*op)).collect();
            assert_eq!(got, tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn test_operations_are_ordered() {
        let handler = Handler::new(&[Operation::Update, Operation::Create, Operation::Update]);
        assert_eq!(
            handler.operations().collect::<Vec<_>>(),
            vec![Operation::Create, Operation::Update]
        );
    }
}
