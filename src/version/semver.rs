use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::TAG_FORMAT;
use crate::version::error::VersionError;
use crate::version::template::{Placeholder, Template};

static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][0-9A-Za-z.]+$").expect("special pattern is a valid regex")
});

/// A `major.minor.patch` triple with an optional special (prerelease) suffix.
///
/// Ordering compares the numeric parts first. For equal triples a version without a
/// special string sorts above one with it, and two special strings compare bytewise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    special: String,
}

impl Version {
    /// Creates a version, validating the special string.
    ///
    /// An empty special means "no prerelease". A non-empty one must start with an ASCII
    /// letter followed by at least one letter, digit or `.`.
    pub fn new(
        major: u64,
        minor: u64,
        patch: u64,
        special: impl Into<String>,
    ) -> Result<Self, VersionError> {
        let special = special.into();
        validate_special(&special)?;
        Ok(Self {
            major,
            minor,
            patch,
            special,
        })
    }

    /// Creates a version from signed components, rejecting negative ones
    pub fn from_signed(
        major: i64,
        minor: i64,
        patch: i64,
        special: impl Into<String>,
    ) -> Result<Self, VersionError> {
        Self::new(
            non_negative(Placeholder::Major, major)?,
            non_negative(Placeholder::Minor, minor)?,
            non_negative(Placeholder::Patch, patch)?,
            special,
        )
    }

    /// Parse a version string against a template.
    ///
    /// Returns `Ok(None)` when the string does not match. When `allow_missing` is false,
    /// a template or input lacking any of major/minor/patch also yields `Ok(None)`;
    /// otherwise missing numbers default to zero. A match of the full template always
    /// wins over a match with omitted components, wherever it sits in the input.
    ///
    /// A template naming the same placeholder twice (e.g. `%M.%M`) cannot be compiled
    /// into a matcher and yields [`VersionError::InvalidTemplate`], although it still
    /// renders fine through [`Version::format`].
    ///
    /// Examples with the default template `v%M.%m.%p%s`:
    /// - "v1.2.3" -> Version(1, 2, 3, "")
    /// - "v1.2.3-rc.1" -> Version(1, 2, 3, "rc.1")
    /// - "v1.2" -> Version(1, 2, 0, "") when missing parts are allowed
    pub fn parse(
        input: &str,
        template: &str,
        allow_missing: bool,
    ) -> Result<Option<Self>, VersionError> {
        let template = Template::compile(template);
        let Some(captures) = template.captures(input, allow_missing)? else {
            return Ok(None);
        };

        let number = |placeholder: Placeholder| -> Result<Option<u64>, VersionError> {
            if !template.contains(placeholder) {
                return Ok(None);
            }
            captures
                .name(placeholder.name())
                .map(|m| parse_component(placeholder, m.as_str()))
                .transpose()
        };

        let major = number(Placeholder::Major)?;
        let minor = number(Placeholder::Minor)?;
        let patch = number(Placeholder::Patch)?;
        let special = captures
            .name(Placeholder::Special.name())
            .map_or("", |m| m.as_str());

        if !allow_missing && (major.is_none() || minor.is_none() || patch.is_none()) {
            return Ok(None);
        }

        Self::new(
            major.unwrap_or(0),
            minor.unwrap_or(0),
            patch.unwrap_or(0),
            special,
        )
        .map(Some)
    }

    /// Render this version through a template
    pub fn format(&self, template: &str) -> String {
        Template::compile(template).format(self)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn special(&self) -> &str {
        &self.special
    }

    pub fn set_major(&mut self, major: u64) {
        self.major = major;
    }

    pub fn set_minor(&mut self, minor: u64) {
        self.minor = minor;
    }

    pub fn set_patch(&mut self, patch: u64) {
        self.patch = patch;
    }

    pub fn set_special(&mut self, special: impl Into<String>) -> Result<(), VersionError> {
        let special = special.into();
        validate_special(&special)?;
        self.special = special;
        Ok(())
    }

    /// Alias of [`Version::special`]: everything after the `-` is prerelease data
    pub fn prerelease(&self) -> &str {
        self.special()
    }

    /// Alias of [`Version::set_special`]
    pub fn set_prerelease(&mut self, prerelease: impl Into<String>) -> Result<(), VersionError> {
        self.set_special(prerelease)
    }

    /// Returns true if the version carries a non-empty special string
    pub fn is_prerelease(&self) -> bool {
        !self.special.is_empty()
    }

    /// Flag consulted by the ordering: set when there is no special string.
    /// A flagged version outranks an unflagged one with the same triple.
    fn is_release(&self) -> bool {
        self.special.is_empty()
    }
}

fn validate_special(special: &str) -> Result<(), VersionError> {
    if special.is_empty() || SPECIAL_RE.is_match(special) {
        Ok(())
    } else {
        Err(VersionError::InvalidArgument(format!(
            "invalid special: {special}"
        )))
    }
}

fn non_negative(placeholder: Placeholder, value: i64) -> Result<u64, VersionError> {
    u64::try_from(value).map_err(|_| {
        VersionError::InvalidArgument(format!("invalid {}: {value}", placeholder.name()))
    })
}

fn parse_component(placeholder: Placeholder, digits: &str) -> Result<u64, VersionError> {
    digits.parse().map_err(|_| {
        VersionError::InvalidArgument(format!("invalid {}: {digits}", placeholder.name()))
    })
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| self.is_release().cmp(&other.is_release()))
            .then_with(|| self.special.cmp(&other.special))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(TAG_FORMAT))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s, TAG_FORMAT, true)?.ok_or_else(|| VersionError::NoMatch(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(major: u64, minor: u64, patch: u64, special: &str) -> Version {
        Version::new(major, minor, patch, special).unwrap()
    }

    #[test]
    fn default_is_zero_without_special() {
        assert_eq!(Version::default(), v(0, 0, 0, ""));
    }

    #[rstest]
    #[case("beta1")]
    #[case("rc.1")]
    #[case("Alpha")]
    #[case("b2")]
    fn new_accepts_valid_special(#[case] special: &str) {
        assert_eq!(Version::new(1, 2, 3, special).unwrap().special(), special);
    }

    #[rstest]
    #[case("1abc")] // cannot start with a digit
    #[case("a")] // too short
    #[case("beta-1")] // '-' not allowed
    #[case(".beta")]
    #[case("beta 1")]
    fn new_rejects_invalid_special(#[case] special: &str) {
        assert_eq!(
            Version::new(1, 2, 3, special),
            Err(VersionError::InvalidArgument(format!(
                "invalid special: {special}"
            )))
        );
    }

    #[rstest]
    #[case(-1, 0, 0, "invalid major: -1")]
    #[case(0, -2, 0, "invalid minor: -2")]
    #[case(0, 0, -3, "invalid patch: -3")]
    fn from_signed_rejects_negative_components(
        #[case] major: i64,
        #[case] minor: i64,
        #[case] patch: i64,
        #[case] message: &str,
    ) {
        assert_eq!(
            Version::from_signed(major, minor, patch, ""),
            Err(VersionError::InvalidArgument(message.to_string()))
        );
    }

    #[rstest]
    #[case(v(1, 2, 3, ""), "v1.2.3")]
    #[case(v(1, 2, 3, "beta1"), "v1.2.3-beta1")]
    #[case(v(0, 0, 0, ""), "v0.0.0")]
    fn display_uses_tag_format(#[case] version: Version, #[case] expected: &str) {
        assert_eq!(version.to_string(), expected);
    }

    #[rstest]
    #[case("v1.2.3", "v%M.%m.%p%s", true, Some(v(1, 2, 3, "")))]
    #[case("v1.2.3-rc.1", "v%M.%m.%p%s", true, Some(v(1, 2, 3, "rc.1")))]
    #[case("v1.2", "v%M.%m.%p", true, Some(v(1, 2, 0, "")))]
    #[case("v1.2", "v%M.%m.%p", false, None)]
    #[case("v1", "v%M.%m.%p%s", true, Some(v(1, 0, 0, "")))]
    #[case("v1.2-beta", "v%M.%m.%p%s", true, Some(v(1, 2, 0, "beta")))]
    #[case("1.2", "%M.%m", true, Some(v(1, 2, 0, "")))]
    #[case("1.2", "%M.%m", false, None)] // template has no patch
    #[case("release 7", "release %p", true, Some(v(0, 0, 7, "")))]
    #[case("not a version", "v%M.%m.%p%s", true, None)]
    #[case("tag: v10.20.30 (HEAD)", "v%M.%m.%p%s", true, Some(v(10, 20, 30, "")))]
    #[case("2-4-8", "%p-%m-%M", false, Some(v(8, 4, 2, "")))]
    #[case("deployed v2 then tagged v1.4.2", "v%M.%m.%p%s", true, Some(v(1, 4, 2, "")))]
    #[case("deployed v2 then tagged v1.4.2", "v%M.%m.%p%s", false, Some(v(1, 4, 2, "")))]
    #[case("v1.2.x v1.2.3", "v%M.%m.%p", true, Some(v(1, 2, 3, "")))]
    #[case("v1.2.x v1.3", "v%M.%m.%p", true, Some(v(1, 2, 0, "")))] // no full match anywhere
    fn parse_returns_expected(
        #[case] input: &str,
        #[case] template: &str,
        #[case] allow_missing: bool,
        #[case] expected: Option<Version>,
    ) {
        assert_eq!(Version::parse(input, template, allow_missing), Ok(expected));
    }

    #[test]
    fn parse_ignores_special_that_does_not_fit_pattern() {
        // "-1x" cannot be a special, the optional group simply does not match
        assert_eq!(
            Version::parse("v1.2.3-1x", TAG_FORMAT, true),
            Ok(Some(v(1, 2, 3, "")))
        );
    }

    #[test]
    fn parse_reports_overflowing_component() {
        let result = Version::parse("v99999999999999999999999.0.0", TAG_FORMAT, true);
        assert!(matches!(result, Err(VersionError::InvalidArgument(_))));
    }

    #[test]
    fn parse_reports_duplicate_placeholder_template() {
        let result = Version::parse("1.1", "%M.%M", true);
        assert!(matches!(result, Err(VersionError::InvalidTemplate(_))));
    }

    #[rstest]
    #[case("v%M.%m.%p%s")]
    #[case("%M.%m.%p%s")]
    #[case("release/%M_%m_%p%s")]
    #[case("%s|%p|%m|%M")]
    fn format_then_parse_round_trips(#[case] template: &str) {
        for version in [v(0, 0, 0, ""), v(1, 10, 100, "beta.2"), v(7, 0, 3, "RC1")] {
            let rendered = version.format(template);
            assert_eq!(
                Version::parse(&rendered, template, false),
                Ok(Some(version.clone())),
                "template {template:?} rendered {rendered:?}"
            );
        }
    }

    #[rstest]
    #[case(v(1, 9, 0, ""), v(1, 10, 0, ""), Ordering::Less)]
    #[case(v(2, 0, 0, ""), v(1, 99, 99, ""), Ordering::Greater)]
    #[case(v(1, 2, 3, ""), v(1, 2, 4, ""), Ordering::Less)]
    #[case(v(1, 2, 3, ""), v(1, 2, 3, ""), Ordering::Equal)]
    #[case(v(1, 0, 0, ""), v(1, 0, 0, "beta"), Ordering::Greater)]
    #[case(v(1, 0, 0, "beta"), v(1, 0, 0, ""), Ordering::Less)]
    #[case(v(1, 0, 0, "alpha"), v(1, 0, 0, "beta"), Ordering::Less)]
    #[case(v(1, 0, 0, "rc.10"), v(1, 0, 0, "rc.2"), Ordering::Less)] // bytewise, not numeric
    #[case(v(1, 0, 1, "alpha"), v(1, 0, 0, ""), Ordering::Greater)]
    fn cmp_returns_expected(
        #[case] a: Version,
        #[case] b: Version,
        #[case] expected: Ordering,
    ) {
        assert_eq!(a.cmp(&b), expected);
        assert_eq!(b.cmp(&a), expected.reverse());
    }

    #[test]
    fn ordering_is_total_and_transitive() {
        let versions = [
            v(0, 0, 0, ""),
            v(0, 0, 1, "alpha"),
            v(0, 0, 1, ""),
            v(1, 0, 0, "RC1"),
            v(1, 0, 0, "alpha"),
            v(1, 0, 0, ""),
            v(1, 10, 0, ""),
        ];

        for a in &versions {
            for b in &versions {
                let relations = [a < b, a == b, a > b];
                assert_eq!(relations.iter().filter(|r| **r).count(), 1, "{a} vs {b}");
                for c in &versions {
                    if a < b && b < c {
                        assert!(a < c, "{a} < {b} < {c}");
                    }
                }
            }
        }

        let mut sorted = versions.to_vec();
        sorted.reverse();
        sorted.sort();
        assert_eq!(
            sorted,
            vec![
                v(0, 0, 0, ""),
                v(0, 0, 1, "alpha"),
                v(0, 0, 1, ""),
                v(1, 0, 0, "RC1"),
                v(1, 0, 0, "alpha"),
                v(1, 0, 0, ""),
                v(1, 10, 0, ""),
            ]
        );
    }

    #[test]
    fn prerelease_aliases_special() {
        let mut version = v(1, 0, 0, "");
        assert_eq!(version.prerelease(), "");
        assert!(!version.is_prerelease());

        version.set_prerelease("beta.3").unwrap();
        assert_eq!(version.special(), "beta.3");
        assert!(version.is_prerelease());

        assert!(version.set_prerelease("3beta").is_err());
        assert_eq!(version.prerelease(), "beta.3");
    }

    #[test]
    fn setters_update_components() {
        let mut version = Version::default();
        version.set_major(3);
        version.set_minor(1);
        version.set_patch(4);
        assert_eq!(version, v(3, 1, 4, ""));
    }

    #[rstest]
    #[case("v3.2.1", Ok(v(3, 2, 1, "")))]
    #[case("v3.2", Ok(v(3, 2, 0, "")))]
    #[case("3.2.1", Err(VersionError::NoMatch("3.2.1".to_string())))]
    fn from_str_uses_tag_format(
        #[case] input: &str,
        #[case] expected: Result<Version, VersionError>,
    ) {
        assert_eq!(input.parse::<Version>(), expected);
    }
}
