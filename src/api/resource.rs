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

//! Resource quantities.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))(m|k|M|G|T|P|E|Ki|Mi|Gi|Ti|Pi|Ei)?$")
        .expect("quantity pattern compiles")
});

/// QuantityError is returned when a quantity string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity {0:?} must be a number with an optional SI suffix")]
    Format(String),

    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// Quantity is a resource amount such as `500m`, `2` or `1Gi`.
///
/// The amount is held in thousandths of a unit, so `500m` and `0.5` compare
/// equal. Quantities serialize back to their canonical string form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity {
    milli: i64,
}

impl Quantity {
    /// Create a quantity of whole units.
    pub fn new(value: i64) -> Self {
        Self {
            milli: value.saturating_mul(1000),
        }
    }

    /// Create a quantity from thousandths of a unit.
    pub fn from_milli(milli: i64) -> Self {
        Self { milli }
    }

    /// Parse a quantity string like "1Gi", "500m" or "1000".
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let s = s.trim();
        let caps = QUANTITY_RE
            .captures(s)
            .ok_or_else(|| QuantityError::Format(s.to_string()))?;

        let num: f64 = caps[1]
            .parse()
            .map_err(|_| QuantityError::Format(s.to_string()))?;

        let multiplier: f64 = match caps.get(2).map(|m| m.as_str()) {
            None => 1.0,
            Some("m") => 0.001,
            // Decimal SI suffixes
            Some("k") => 1e3,
            Some("M") => 1e6,
            Some("G") => 1e9,
            Some("T") => 1e12,
            Some("P") => 1e15,
            Some("E") => 1e18,
            // Binary SI suffixes
            Some("Ki") => 1024.0,
            Some("Mi") => 1024.0 * 1024.0,
            Some("Gi") => 1024.0 * 1024.0 * 1024.0,
            Some("Ti") => 1024.0 * 1024.0 * 1024.0 * 1024.0,
            Some("Pi") => 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0,
            Some("Ei") => 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0,
            Some(_) => return Err(QuantityError::Format(s.to_string())),
        };

        let milli = (num * multiplier * 1000.0).round();
        if !milli.is_finite() || milli > i64::MAX as f64 || milli < i64::MIN as f64 {
            return Err(QuantityError::OutOfRange(s.to_string()));
        }
        Ok(Self {
            milli: milli as i64,
        })
    }

    /// Returns the amount in whole units, rounded away from zero.
    pub fn value(&self) -> i64 {
        let whole = self.milli / 1000;
        match self.milli % 1000 {
            0 => whole,
            r if r > 0 => whole + 1,
            _ => whole - 1,
        }
    }

    /// Returns the amount in thousandths of a unit.
    pub fn milli_value(&self) -> i64 {
        self.milli
    }

    pub fn is_negative(&self) -> bool {
        self.milli < 0
    }

    pub fn is_zero(&self) -> bool {
        self.milli == 0
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milli % 1000 == 0 {
            write!(f, "{}", self.milli / 1000)
        } else {
            write!(f, "{}m", self.milli)
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Quantity::parse(&s).map_err(serde::de::Error::custom),
            Raw::Int(v) => Ok(Quantity::new(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        struct TestCase {
            input: &'static str,
            milli: i64,
        }

        let cases = vec![
            TestCase { input: "0", milli: 0 },
            TestCase { input: "2", milli: 2000 },
            TestCase { input: "500m", milli: 500 },
            TestCase { input: "0.5", milli: 500 },
            TestCase { input: "1k", milli: 1_000_000 },
            TestCase { input: "1Ki", milli: 1_024_000 },
            TestCase { input: "1Gi", milli: 1_073_741_824_000 },
            TestCase { input: "-1", milli: -1000 },
            TestCase { input: " 3 ", milli: 3000 },
        ];

        for tc in cases {
            let q = Quantity::parse(tc.input).unwrap();
            assert_eq!(q.milli_value(), tc.milli, "input {:?}", tc.input);
        }
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "abc", "1Xi", "1.2.3", "--1"] {
            assert!(
                matches!(Quantity::parse(input), Err(QuantityError::Format(_))),
                "input {:?}",
                input
            );
        }
        assert!(matches!(
            Quantity::parse("100000E"),
            Err(QuantityError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_value_rounds_away_from_zero() {
        assert_eq!(Quantity::parse("1500m").unwrap().value(), 2);
        assert_eq!(Quantity::parse("-1500m").unwrap().value(), -2);
        assert_eq!(Quantity::parse("2").unwrap().value(), 2);
    }

    #[test]
    fn test_equal_amounts_compare_equal() {
        assert_eq!(Quantity::parse("500m").unwrap(), Quantity::parse("0.5").unwrap());
        assert!(Quantity::parse("1Gi").unwrap() > Quantity::parse("1G").unwrap());
        assert!(Quantity::parse("-1").unwrap().is_negative());
    }

    #[test]
    fn test_serde() {
        let q: Quantity = serde_json::from_value(serde_json::json!("250m")).unwrap();
        assert_eq!(q, Quantity::from_milli(250));
        assert_eq!(serde_json::to_value(q).unwrap(), serde_json::json!("250m"));

        let q: Quantity = serde_json::from_value(serde_json::json!(4)).unwrap();
        assert_eq!(q.to_string(), "4");

        assert!(serde_json::from_value::<Quantity>(serde_json::json!("lots")).is_err());
    }
}
