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

//! Name and value grammars.
//!
//! The `is_*` checks return human-readable messages, empty when the value is
//! valid. Callers attach them to a field path as `Invalid` errors.

use crate::field::{invalid, ErrorList, FieldPath};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a DNS-1123 label.
pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

/// Maximum length of a DNS-1123 subdomain.
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Maximum length of the name part of a qualified name.
pub const QUALIFIED_NAME_MAX_LENGTH: usize = 63;

pub const LABEL_VALUE_MAX_LENGTH: usize = 63;

pub const CONFIG_MAP_KEY_MAX_LENGTH: usize = 253;

/// Length of the random suffix appended to a generated name.
pub const GENERATED_NAME_SUFFIX_LENGTH: usize = 5;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";
const QUALIFIED_NAME_FMT: &str = "([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]";
const ENV_VAR_NAME_FMT: &str = "[-._a-zA-Z][-._a-zA-Z0-9]*";
const CONFIG_MAP_KEY_FMT: &str = "[-._a-zA-Z0-9]+";

fn anchored(fmt: &str) -> Regex {
    Regex::new(&format!("^{}$", fmt)).expect("grammar pattern compiles")
}

static DNS1123_LABEL_RE: Lazy<Regex> = Lazy::new(|| anchored(DNS1123_LABEL_FMT));
static DNS1123_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        "{label}(\\.{label})*",
        label = DNS1123_LABEL_FMT
    ))
});
static QUALIFIED_NAME_RE: Lazy<Regex> = Lazy::new(|| anchored(QUALIFIED_NAME_FMT));
static LABEL_VALUE_RE: Lazy<Regex> = Lazy::new(|| anchored(&format!("({})?", QUALIFIED_NAME_FMT)));
static ENV_VAR_NAME_RE: Lazy<Regex> = Lazy::new(|| anchored(ENV_VAR_NAME_FMT));
static CONFIG_MAP_KEY_RE: Lazy<Regex> = Lazy::new(|| anchored(CONFIG_MAP_KEY_FMT));
static PORT_NAME_CHARSET_RE: Lazy<Regex> = Lazy::new(|| anchored("[-a-z0-9]+"));
static PORT_NAME_ONE_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[a-z]").expect("grammar pattern compiles"));

/// Returns the detail used for an out-of-range value.
pub fn inclusive_range_error(lo: i64, hi: i64) -> String {
    format!("must be between {} and {}, inclusive", lo, hi)
}

fn max_len_error(length: usize) -> String {
    format!("must be no more than {} characters", length)
}

fn regex_error(msg: &str, fmt: &str, examples: &[&str]) -> String {
    let mut s = format!("{} (", msg);
    if !examples.is_empty() {
        let quoted: Vec<String> = examples.iter().map(|e| format!("'{}'", e)).collect();
        s.push_str(&format!("e.g. {}, ", quoted.join(" or ")));
    }
    s.push_str(&format!("regex used for validation is '{}')", fmt));
    s
}

fn check_dns1123_label(value: &str, max_length: usize) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > max_length {
        errs.push(max_len_error(max_length));
    }
    if !DNS1123_LABEL_RE.is_match(value) {
        errs.push(regex_error(
            "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character",
            DNS1123_LABEL_FMT,
            &["my-name", "123-abc"],
        ));
    }
    errs
}

fn check_dns1123_subdomain(value: &str, max_length: usize) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > max_length {
        errs.push(max_len_error(max_length));
    }
    if !DNS1123_SUBDOMAIN_RE.is_match(value) {
        errs.push(regex_error(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character",
            DNS1123_SUBDOMAIN_RE.as_str().trim_start_matches('^').trim_end_matches('$'),
            &["example.com"],
        ));
    }
    errs
}

/// Checks that `value` is a DNS-1123 label.
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    check_dns1123_label(value, DNS1123_LABEL_MAX_LENGTH)
}

/// Checks that `value` is a DNS-1123 subdomain.
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    check_dns1123_subdomain(value, DNS1123_SUBDOMAIN_MAX_LENGTH)
}

/// Checks that `value` is a qualified name: an optional DNS subdomain prefix
/// and a slash, followed by a name part.
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    let parts: Vec<&str> = value.split('/').collect();
    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_string());
            } else {
                let prefix = prefix.to_lowercase();
                for msg in is_dns1123_subdomain(&prefix) {
                    errs.push(format!("prefix part {}", msg));
                }
            }
            *name
        }
        _ => {
            errs.push(regex_error(
                "a qualified name must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
                QUALIFIED_NAME_FMT,
                &["MyName", "my.name", "123-abc"],
            ) + " with an optional DNS subdomain prefix and '/' (e.g. 'example.com/MyName')");
            return errs;
        }
    };

    if name.is_empty() {
        errs.push("name part must be non-empty".to_string());
    } else if name.len() > QUALIFIED_NAME_MAX_LENGTH {
        errs.push(format!("name part {}", max_len_error(QUALIFIED_NAME_MAX_LENGTH)));
    }
    if !name.is_empty() && !QUALIFIED_NAME_RE.is_match(name) {
        errs.push(format!(
            "name part {}",
            regex_error(
                "must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
                QUALIFIED_NAME_FMT,
                &["MyName", "my.name", "123-abc"],
            )
        ));
    }
    errs
}

/// Checks that `value` is a valid label value. The empty string is valid.
pub fn is_valid_label_value(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errs.push(max_len_error(LABEL_VALUE_MAX_LENGTH));
    }
    if !LABEL_VALUE_RE.is_match(value) {
        errs.push(regex_error(
            "a valid label must be an empty string or consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
            QUALIFIED_NAME_FMT,
            &["MyValue", "my_value", "12345"],
        ));
    }
    errs
}

/// Checks that `value` can name an environment variable.
pub fn is_env_var_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if !ENV_VAR_NAME_RE.is_match(value) {
        errs.push(regex_error(
            "a valid environment variable name must consist of alphabetic characters, digits, '_', '-', or '.', and must not start with a digit",
            ENV_VAR_NAME_FMT,
            &["my.env-name", "MY_ENV.NAME", "MyEnvName1"],
        ));
    }
    errs
}

/// Checks that `value` is a valid port name (an IANA service name).
pub fn is_valid_port_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > 15 {
        errs.push(max_len_error(15));
    }
    if !PORT_NAME_CHARSET_RE.is_match(value) {
        errs.push("must contain only alpha-numeric characters (a-z, 0-9), and hyphens (-)".to_string());
    }
    if !PORT_NAME_ONE_LETTER_RE.is_match(value) {
        errs.push("must contain at least one letter (a-z)".to_string());
    }
    if value.contains("--") {
        errs.push("must not contain consecutive hyphens".to_string());
    }
    if value.starts_with('-') || value.ends_with('-') {
        errs.push("must not begin or end with a hyphen".to_string());
    }
    errs
}

/// Checks that `port` is a valid port number.
pub fn is_valid_port_num(port: i32) -> Vec<String> {
    if (1..=65535).contains(&port) {
        Vec::new()
    } else {
        vec![inclusive_range_error(1, 65535)]
    }
}

/// Checks that `value` can be used as a config map key.
pub fn is_config_map_key(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > CONFIG_MAP_KEY_MAX_LENGTH {
        errs.push(max_len_error(CONFIG_MAP_KEY_MAX_LENGTH));
    }
    if !CONFIG_MAP_KEY_RE.is_match(value) {
        errs.push(regex_error(
            "a valid config key must consist of alphanumeric characters, '-', '_' or '.'",
            CONFIG_MAP_KEY_FMT,
            &["key.name", "KEY_NAME", "key-name"],
        ));
    }
    if value == "." {
        errs.push("must not be '.'".to_string());
    } else if value == ".." {
        errs.push("must not be '..'".to_string());
    } else if value.starts_with("..") {
        errs.push("must not start with '..'".to_string());
    }
    errs
}

// ============================================================================
// Object name rules
// ============================================================================

/// ValidateNameFn checks an object name. With `prefix` set the value is a
/// `generate_name` prefix that will get a random suffix appended.
pub type ValidateNameFn = fn(name: &str, prefix: bool) -> Vec<String>;

fn mask_trailing_dash(name: &str) -> String {
    match name.strip_suffix('-') {
        Some(rest) if !rest.is_empty() => format!("{}a", rest),
        _ => name.to_string(),
    }
}

/// Name rule for kinds named by a DNS-1123 label.
pub fn name_is_dns_label(name: &str, prefix: bool) -> Vec<String> {
    if prefix {
        check_dns1123_label(
            &mask_trailing_dash(name),
            DNS1123_LABEL_MAX_LENGTH - GENERATED_NAME_SUFFIX_LENGTH,
        )
    } else {
        is_dns1123_label(name)
    }
}

/// Name rule for kinds named by a DNS-1123 subdomain.
pub fn name_is_dns_subdomain(name: &str, prefix: bool) -> Vec<String> {
    if prefix {
        check_dns1123_subdomain(
            &mask_trailing_dash(name),
            DNS1123_SUBDOMAIN_MAX_LENGTH - GENERATED_NAME_SUFFIX_LENGTH,
        )
    } else {
        is_dns1123_subdomain(name)
    }
}

/// Namespaces are named by DNS labels.
pub fn validate_namespace_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_label(name, prefix)
}

pub fn validate_node_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_subdomain(name, prefix)
}

pub fn validate_pod_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_subdomain(name, prefix)
}

/// Report every DNS-label violation of `value` at `path`.
pub fn validate_dns1123_label(value: &str, path: &FieldPath) -> ErrorList {
    is_dns1123_label(value)
        .into_iter()
        .map(|msg| invalid(path, value, &msg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns1123_label() {
        for good in ["a", "abc", "a-1", "0", "a".repeat(63).as_str()] {
            assert!(is_dns1123_label(good).is_empty(), "{:?}", good);
        }
        for bad in ["", "A", "-a", "a-", "a.b", "a_b", "a".repeat(64).as_str()] {
            assert!(!is_dns1123_label(bad).is_empty(), "{:?}", bad);
        }
        assert_eq!(
            is_dns1123_label(&"a".repeat(64)),
            vec!["must be no more than 63 characters".to_string()]
        );
    }

    #[test]
    fn test_dns1123_subdomain() {
        for good in ["a", "a.b", "example.com", "a-b.c-d.e"] {
            assert!(is_dns1123_subdomain(good).is_empty(), "{:?}", good);
        }
        for bad in ["", ".a", "a.", "a..b", "A.com", "a_b.com"] {
            assert!(!is_dns1123_subdomain(bad).is_empty(), "{:?}", bad);
        }
        assert!(!is_dns1123_subdomain(&"a".repeat(254)).is_empty());
    }

    #[test]
    fn test_qualified_name() {
        struct TestCase {
            value: &'static str,
            valid: bool,
        }

        let cases = vec![
            TestCase { value: "app", valid: true },
            TestCase { value: "App_Name.1", valid: true },
            TestCase { value: "carry.i/app", valid: true },
            TestCase { value: "Carry.I/app", valid: true },
            TestCase { value: "/app", valid: false },
            TestCase { value: "carry.i/", valid: false },
            TestCase { value: "a/b/c", valid: false },
            TestCase { value: "-app", valid: false },
            TestCase { value: "app-", valid: false },
            TestCase { value: "bad_prefix/app", valid: false },
            TestCase { value: "", valid: false },
        ];

        for tc in cases {
            assert_eq!(is_qualified_name(tc.value).is_empty(), tc.valid, "{:?}", tc.value);
        }

        let long = "a".repeat(64);
        assert_eq!(
            is_qualified_name(&long),
            vec!["name part must be no more than 63 characters".to_string()]
        );
    }

    #[test]
    fn test_label_value() {
        assert!(is_valid_label_value("").is_empty());
        assert!(is_valid_label_value("v1.2_b-3").is_empty());
        assert!(!is_valid_label_value("-v").is_empty());
        assert!(!is_valid_label_value("a b").is_empty());
        assert!(!is_valid_label_value(&"a".repeat(64)).is_empty());
    }

    #[test]
    fn test_env_var_name() {
        assert!(is_env_var_name("HOME").is_empty());
        assert!(is_env_var_name("my.env-name_1").is_empty());
        assert!(!is_env_var_name("1ABC").is_empty());
        assert!(!is_env_var_name("A=B").is_empty());
    }

    #[test]
    fn test_port_name() {
        assert!(is_valid_port_name("http").is_empty());
        assert!(is_valid_port_name("web-8080").is_empty());
        assert_eq!(
            is_valid_port_name("8080"),
            vec!["must contain at least one letter (a-z)".to_string()]
        );
        assert_eq!(
            is_valid_port_name("a--b"),
            vec!["must not contain consecutive hyphens".to_string()]
        );
        assert_eq!(
            is_valid_port_name("-ab"),
            vec!["must not begin or end with a hyphen".to_string()]
        );
        assert_eq!(is_valid_port_name("abcdefghijklmnop").len(), 1);
        assert!(!is_valid_port_name("HTTP").is_empty());
    }

    #[test]
    fn test_port_num() {
        assert!(is_valid_port_num(1).is_empty());
        assert!(is_valid_port_num(65535).is_empty());
        assert_eq!(
            is_valid_port_num(0),
            vec!["must be between 1 and 65535, inclusive".to_string()]
        );
        assert!(!is_valid_port_num(65536).is_empty());
    }

    #[test]
    fn test_config_map_key() {
        assert!(is_config_map_key("app.properties").is_empty());
        assert!(is_config_map_key(".hidden").is_empty());
        assert_eq!(is_config_map_key("."), vec!["must not be '.'".to_string()]);
        assert_eq!(is_config_map_key(".."), vec!["must not be '..'".to_string()]);
        assert_eq!(
            is_config_map_key("..data"),
            vec!["must not start with '..'".to_string()]
        );
        assert!(!is_config_map_key("a/b").is_empty());
    }

    #[test]
    fn test_name_rules_prefix_mode() {
        // A trailing dash is fine for a prefix but not for a name.
        assert!(name_is_dns_subdomain("web-", true).is_empty());
        assert!(!name_is_dns_subdomain("web-", false).is_empty());
        assert!(name_is_dns_label("web-", true).is_empty());

        // The generated suffix has to fit.
        let prefix = "a".repeat(59);
        assert!(!name_is_dns_label(&prefix, true).is_empty());
        assert!(name_is_dns_label(&prefix, false).is_empty());
        assert!(name_is_dns_label(&"a".repeat(58), true).is_empty());

        assert!(!name_is_dns_subdomain("-", true).is_empty());
    }

    #[test]
    fn test_validate_dns1123_label_errors() {
        let path = FieldPath::new("spec").child("containers").index(0).child("name");
        let errs = validate_dns1123_label("Bad_Name", &path);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "spec.containers[0].name");
        assert!(validate_dns1123_label("good", &path).is_empty());
    }
}
