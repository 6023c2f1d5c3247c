//! Export settings
//!
//! Settings are read once per export and passed in explicitly; nothing in
//! the engine reads or mutates global configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Default object limit for a snapshot (5000)
pub const DEFAULT_OBJECT_LIMIT: usize = 5000;

/// Default budget for the overflow probe (2000)
pub const DEFAULT_PROBE_LIMIT: usize = 2000;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensSettings {
    /// Development mode; enables fixture export unless explicitly configured
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub fixtures: FixtureSettings,
}

/// Fixture export settings
///
/// Limit values that are not non-negative integers (or integer strings) fall
/// back to their defaults instead of failing the whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_object_limit: Option<usize>,

    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub excess_probe_limit: Option<usize>,
}

impl LensSettings {
    /// Whether fixture export may run
    pub fn fixtures_enabled(&self) -> bool {
        self.fixtures.enabled.unwrap_or(self.debug)
    }

    pub fn object_limit(&self) -> usize {
        self.fixtures
            .default_object_limit
            .unwrap_or(DEFAULT_OBJECT_LIMIT)
    }

    pub fn probe_limit(&self) -> usize {
        self.fixtures.excess_probe_limit.unwrap_or(DEFAULT_PROBE_LIMIT)
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => usize::try_from(n).ok(),
        Raw::Text(s) => s.trim().parse::<usize>().ok(),
        Raw::Other(_) => None,
    };
    if parsed.is_none() {
        tracing::warn!("Ignoring invalid limit value in settings, using default");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: serde_json::Value) -> LensSettings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let s = LensSettings::default();
        assert!(!s.fixtures_enabled());
        assert_eq!(s.object_limit(), DEFAULT_OBJECT_LIMIT);
        assert_eq!(s.probe_limit(), DEFAULT_PROBE_LIMIT);
    }

    #[test]
    fn test_enabled_falls_back_to_debug() {
        assert!(settings(json!({"debug": true})).fixtures_enabled());
        assert!(!settings(json!({"debug": true, "fixtures": {"enabled": false}})).fixtures_enabled());
        assert!(settings(json!({"fixtures": {"enabled": true}})).fixtures_enabled());
    }

    #[test]
    fn test_limits() {
        let s = settings(json!({"fixtures": {
            "default_object_limit": 100,
            "excess_probe_limit": "25"
        }}));
        assert_eq!(s.object_limit(), 100);
        assert_eq!(s.probe_limit(), 25);
    }

    #[test]
    fn test_invalid_limits_fall_back() {
        let s = settings(json!({"fixtures": {
            "enabled": true,
            "default_object_limit": "oops",
            "excess_probe_limit": -4
        }}));
        assert_eq!(s.object_limit(), DEFAULT_OBJECT_LIMIT);
        assert_eq!(s.probe_limit(), DEFAULT_PROBE_LIMIT);

        let s = settings(json!({"fixtures": {"excess_probe_limit": [1, 2]}}));
        assert_eq!(s.probe_limit(), DEFAULT_PROBE_LIMIT);
    }
}
