use std::cmp::Ordering;

use semver::Version;
use serde::{Deserialize, Serialize};

/// How the installed version is compared against a section's minimum version.
///
/// `Lexicographic` is the default and compares raw strings, so `"10.0"` sorts
/// before `"9.0"`. Documents written against that ordering keep working;
/// `Numeric` must be opted into explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionComparison {
    #[default]
    Lexicographic,
    Numeric,
}

impl VersionComparison {
    /// Returns `true` when `current` orders strictly before `minimum`.
    #[must_use]
    pub fn is_older(self, current: &str, minimum: &str) -> bool {
        self.compare(current, minimum) == Ordering::Less
    }

    #[must_use]
    pub fn compare(self, current: &str, minimum: &str) -> Ordering {
        match self {
            Self::Lexicographic => current.cmp(minimum),
            Self::Numeric => match (parse_version(current), parse_version(minimum)) {
                (Some(current), Some(minimum)) => current.cmp(&minimum),
                _ => current.cmp(minimum),
            },
        }
    }
}

/// Lexicographic `current < minimum`.
#[must_use]
pub fn is_older(current: &str, minimum: &str) -> bool {
    VersionComparison::Lexicographic.is_older(current, minimum)
}

fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(suffix_idx);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().map(str::parse::<u64>).transpose().ok()?;
    let patch = parts.next().map(str::parse::<u64>).transpose().ok()?;

    if parts.next().is_some() {
        return None;
    }

    let normalized = format!(
        "{major}.{}.{}{suffix}",
        minor.unwrap_or(0),
        patch.unwrap_or(0)
    );
    Version::parse(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_reference_cases() {
        assert!(is_older("1.0.0", "1.2.0"));
        assert!(!is_older("1.2.0", "1.2.0"));
        assert!(!is_older("2.0.0", "1.9.9"));
    }

    #[test]
    fn lexicographic_orders_multi_digit_components_as_text() {
        // '1' < '9', so a two-digit major sorts before a one-digit one.
        assert!(!is_older("9.0.0", "10.0.0"));
        assert!(is_older("10.0.0", "9.0.0"));
        assert!(is_older("1.10", "1.9"));
    }

    #[test]
    fn numeric_orders_components_by_value() {
        let numeric = VersionComparison::Numeric;

        assert!(numeric.is_older("9.0.0", "10.0.0"));
        assert!(!numeric.is_older("10.0.0", "9.0.0"));
        assert!(numeric.is_older("1.0.0", "1.2.0"));
        assert!(!numeric.is_older("1.2.0", "1.2.0"));
        assert!(!numeric.is_older("2.0.0", "1.9.9"));
    }

    #[test]
    fn numeric_normalises_short_and_prefixed_versions() {
        let numeric = VersionComparison::Numeric;

        assert!(!numeric.is_older("1.2", "1.2.0"));
        assert!(numeric.is_older("v1.9", "1.10"));
        assert!(numeric.is_older("1.0.0-beta.2", "1.0.0"));
    }

    #[test]
    fn numeric_falls_back_to_text_order_for_malformed_input() {
        let numeric = VersionComparison::Numeric;

        assert!(numeric.is_older("abc", "abd"));
        assert!(!numeric.is_older("build-7", "1.0"));
        assert_eq!(numeric.compare("", ""), Ordering::Equal);
    }

    #[test]
    fn comparison_strategy_deserializes_from_lowercase_names() {
        let parsed: VersionComparison =
            serde_json::from_str("\"numeric\"").expect("strategy name should parse");
        assert_eq!(parsed, VersionComparison::Numeric);
        assert_eq!(VersionComparison::default(), VersionComparison::Lexicographic);
    }
}
