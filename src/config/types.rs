// Configuration type definitions

use serde::Deserialize;

/// Default minimum query length that triggers a lookup
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 3;

/// Default HTTP timeout for the built-in lookup
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

fn default_min_query_length() -> usize {
    DEFAULT_MIN_QUERY_LENGTH
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Search widget options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this (or blank) never reach the cache or network
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
    /// Quiet period in milliseconds before a typed query is searched
    #[serde(default)]
    pub debounce_rate: u64,
    /// URL used by the default HTTP lookup
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Field the host displays for each result item
    #[serde(default)]
    pub result_key: Option<String>,
    /// Input placeholder (presentation only)
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Dismiss the results panel when clicking outside the widget
    #[serde(default)]
    pub clear_on_outside_click: bool,
    /// Timeout for each HTTP lookup
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_query_length: default_min_query_length(),
            debounce_rate: 0,
            endpoint: None,
            result_key: None,
            placeholder: None,
            clear_on_outside_click: false,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Missing fields always fall back to defaults
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_fields_use_defaults(
            include_min in prop::bool::ANY,
            include_rate in prop::bool::ANY,
            min in 0usize..20,
            rate in 0u64..2000,
        ) {
            let mut toml_content = String::new();
            if include_min {
                toml_content.push_str(&format!("min_query_length = {}\n", min));
            }
            if include_rate {
                toml_content.push_str(&format!("debounce_rate = {}\n", rate));
            }

            let config: SearchConfig = toml::from_str(&toml_content).unwrap();

            let expected_min = if include_min { min } else { DEFAULT_MIN_QUERY_LENGTH };
            let expected_rate = if include_rate { rate } else { 0 };
            prop_assert_eq!(config.min_query_length, expected_min);
            prop_assert_eq!(config.debounce_rate, expected_rate);
            prop_assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        }
    }

    #[test]
    fn test_clear_on_outside_click_parsing() {
        let config: SearchConfig = toml::from_str("clear_on_outside_click = true").unwrap();
        assert!(config.clear_on_outside_click);
    }

    #[test]
    fn test_wrong_type_fails_parse() {
        let result: Result<SearchConfig, _> = toml::from_str("debounce_rate = \"fast\"");
        assert!(result.is_err());
    }
}
