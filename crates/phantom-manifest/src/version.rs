//! Dependency version ranges derived from raw version strings
//!
//! Three kinds of dependency get different ranges:
//!
//! | kind              | input    | range           |
//! |-------------------|----------|-----------------|
//! | library           | `0.3`    | `[0.3,1.0)`     |
//! | target runtime    | `1.20.1` | `[1.20.1,1.21)` |
//! | platform runtime  | `47.1.0` | `[47,)`         |
//!
//! A version that cannot be split into the numeric segments a kind needs
//! falls back to the open range `[raw,)` and carries a warning. The
//! fallback never fails the build.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dependency a range is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyRole {
    /// The mod loader itself (Forge, Fabric Loader)
    PlatformRuntime,
    /// The phantom library the generated code links against
    Library,
    /// The game the mod targets
    TargetRuntime,
    /// The Java runtime; always an open lower bound
    Java,
}

/// A half-open version interval `[lower, upper)`; `upper = None` is unbounded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRange {
    pub lower: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
}

/// Outcome of range derivation; `warning` is set when the fallback was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeResult {
    pub range: VersionRange,
    pub warning: Option<String>,
}

impl VersionRange {
    pub fn at_least(lower: impl Into<String>) -> Self {
        VersionRange {
            lower: lower.into(),
            upper: None,
        }
    }

    pub fn between(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        VersionRange {
            lower: lower.into(),
            upper: Some(upper.into()),
        }
    }

    /// Maven interval syntax, as read by Forge (`[a,b)` / `[a,)`)
    pub fn to_maven(&self) -> String {
        match &self.upper {
            Some(upper) => format!("[{},{})", self.lower, upper),
            None => format!("[{},)", self.lower),
        }
    }

    /// Semver predicate syntax, as read by Fabric Loader (`>=a <b` / `>=a`)
    pub fn to_semver_predicate(&self) -> String {
        match &self.upper {
            Some(upper) => format!(">={} <{}", self.lower, upper),
            None => format!(">={}", self.lower),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_maven())
    }
}

/// Derive the range for a dependency of the given role
pub fn derive_range(raw: &str, role: DependencyRole) -> RangeResult {
    let raw = raw.trim();
    let segments: Vec<&str> = raw.split('.').collect();

    let derived = match role {
        DependencyRole::PlatformRuntime => segments
            .first()
            .and_then(|major| parse_segment(major))
            .map(|major| VersionRange::at_least(major.to_string())),
        DependencyRole::Library => major_minor(&segments)
            .and_then(|(major, _)| major.checked_add(1))
            .map(|next| VersionRange::between(raw, format!("{next}.0"))),
        DependencyRole::TargetRuntime => major_minor(&segments).and_then(|(major, minor)| {
            minor
                .checked_add(1)
                .map(|next| VersionRange::between(raw, format!("{major}.{next}")))
        }),
        DependencyRole::Java => {
            return RangeResult {
                range: VersionRange::at_least(raw),
                warning: None,
            }
        }
    };

    match derived {
        Some(range) => RangeResult {
            range,
            warning: None,
        },
        None => RangeResult {
            range: VersionRange::at_least(raw),
            warning: Some(format!(
                "Invalid number format in {raw}, using open range [{raw},)"
            )),
        },
    }
}

fn major_minor(segments: &[&str]) -> Option<(u64, u64)> {
    match segments {
        [major, minor, ..] => Some((parse_segment(major)?, parse_segment(minor)?)),
        _ => None,
    }
}

fn parse_segment(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_range() {
        let result = derive_range("0.3", DependencyRole::Library);
        assert_eq!(result.range.to_maven(), "[0.3,1.0)");
        assert_eq!(result.warning, None);

        let result = derive_range("2.5.1", DependencyRole::Library);
        assert_eq!(result.range.to_maven(), "[2.5.1,3.0)");
    }

    #[test]
    fn test_single_segment_library_version_falls_back() {
        let result = derive_range("7", DependencyRole::Library);
        assert_eq!(result.range.to_maven(), "[7,)");
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_target_runtime_range() {
        let result = derive_range("1.20.1", DependencyRole::TargetRuntime);
        assert_eq!(result.range.to_maven(), "[1.20.1,1.21)");
        assert_eq!(result.range.to_semver_predicate(), ">=1.20.1 <1.21");
    }

    #[test]
    fn test_platform_runtime_keeps_major_only() {
        let result = derive_range("47.1.0", DependencyRole::PlatformRuntime);
        assert_eq!(result.range.to_maven(), "[47,)");
        assert_eq!(result.warning, None);
    }

    #[test]
    fn test_non_numeric_segments_warn() {
        let result = derive_range("1.20-pre1", DependencyRole::TargetRuntime);
        assert_eq!(result.range, VersionRange::at_least("1.20-pre1"));
        assert!(result
            .warning
            .is_some_and(|w| w.contains("1.20-pre1")));

        let result = derive_range("snapshot", DependencyRole::PlatformRuntime);
        assert_eq!(result.range.to_maven(), "[snapshot,)");
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_segment_at_u64_max_falls_back() {
        let result = derive_range("18446744073709551615.0", DependencyRole::Library);
        assert_eq!(result.range.to_maven(), "[18446744073709551615.0,)");
        assert!(result.warning.is_some());

        let result = derive_range("1.18446744073709551615", DependencyRole::TargetRuntime);
        assert_eq!(result.range.to_maven(), "[1.18446744073709551615,)");
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_java_is_open() {
        let result = derive_range("17", DependencyRole::Java);
        assert_eq!(result.range.to_semver_predicate(), ">=17");
        assert_eq!(result.warning, None);
    }
}
