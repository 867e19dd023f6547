use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::stability::Stability;

/// First dotted numeric run, e.g. "1.0.0" in "v1.0.0-beta"
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").expect("numeric pattern is valid"));

/// Word directly following the numeric run, optionally after one separator
static ADJACENT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_.+ ]?([A-Za-z][A-Za-z0-9]*)").expect("tag pattern is valid"));

/// Any word, scanned for stability markers anywhere in the input
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9]*").expect("word pattern is valid"));

/// Numeric value used when the input carries no digits at all
const FALLBACK_NUMBER: &str = "0.0";

/// A version parsed from a free-form release name.
///
/// Equality and ordering consider the numeric parts only: "1.0.0" and
/// "1.0.0-beta" compare equal. Missing trailing components count as zero,
/// so "1.2" equals "1.2.0".
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    number: String,
    parts: Vec<u64>,
    tag: Option<String>,
}

impl Version {
    /// Parse a version string. Never fails; input without digits yields "0.0".
    pub fn parse(raw: &str) -> Self {
        let numeric = NUMERIC_RE.find(raw);

        let number = numeric
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| FALLBACK_NUMBER.to_string());

        let parts = number
            .split('.')
            .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
            .collect();

        let adjacent = numeric
            .and_then(|m| ADJACENT_TAG_RE.captures(&raw[m.end()..]))
            .and_then(|caps| caps.get(1))
            .map(|tag| tag.as_str());

        // The adjacent word wins when it is a pre-release tag itself;
        // otherwise any marker word in the name decides.
        let tag = adjacent
            .filter(|tag| Stability::from_tag(Some(*tag)).is_unstable())
            .or_else(|| {
                WORD_RE
                    .find_iter(raw)
                    .map(|word| word.as_str())
                    .find(|word| Stability::from_marker(word).is_unstable())
            })
            .or(adjacent)
            .map(str::to_string);

        Self {
            raw: raw.to_string(),
            number,
            parts,
            tag,
        }
    }

    /// The input this version was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The numeric portion as written, e.g. "1.0.0" for "v1.0.0-B"
    pub fn number(&self) -> &str {
        &self.number
    }

    /// All numeric components, including those past the patch component
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// The stability tag as written, e.g. "B" for "1.0.0-B" or "beta" for
    /// "1.2.0 (beta)"
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    /// Third component. Components after it are ignored here but still take
    /// part in comparison.
    pub fn patch(&self) -> u64 {
        self.component(2)
    }

    pub fn stability(&self) -> Stability {
        Stability::from_tag(self.tag())
    }

    pub fn is_unstable(&self) -> bool {
        self.stability().is_unstable()
    }

    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            f.write_str(&self.number)
        } else {
            f.write_str(&self.raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0.0-B", &[1, 0, 0], Some("B"), true)]
    #[case("1.0.0-alpha", &[1, 0, 0], Some("alpha"), true)]
    #[case("1.0.0-snapshot", &[1, 0, 0], Some("snapshot"), true)]
    #[case("0.9.0rc", &[0, 9, 0], Some("rc"), true)]
    #[case("6.0.1beta-1.0", &[6, 0, 1], Some("beta"), true)]
    #[case("6.0.1.4", &[6, 0, 1, 4], None, false)]
    #[case("9.8.7-whatever+meta+meta", &[9, 8, 7], Some("whatever"), false)]
    #[case("v2.4.1", &[2, 4, 1], None, false)]
    #[case("1.2.3", &[1, 2, 3], None, false)]
    #[case("Release 3.1 SNAPSHOT", &[3, 1], Some("SNAPSHOT"), true)]
    #[case("1.2.0 (beta)", &[1, 2, 0], Some("beta"), true)]
    #[case("v1.2.0 [SNAPSHOT]", &[1, 2, 0], Some("SNAPSHOT"), true)]
    #[case("Beta 1.2.0", &[1, 2, 0], Some("Beta"), true)]
    #[case("2.0.0-pre-beta", &[2, 0, 0], Some("beta"), true)]
    #[case("1.4.0 (RC2)", &[1, 4, 0], Some("RC2"), true)]
    #[case("1.0-build3", &[1, 0], Some("build3"), false)]
    #[case("Build 7", &[7], None, false)]
    #[case("2.1.0 api update", &[2, 1, 0], Some("api"), false)]
    fn parse_extracts_numeric_parts_and_tag(
        #[case] raw: &str,
        #[case] parts: &[u64],
        #[case] tag: Option<&str>,
        #[case] unstable: bool,
    ) {
        let version = Version::parse(raw);

        assert_eq!(version.parts(), parts);
        assert_eq!(version.tag(), tag);
        assert_eq!(version.is_unstable(), unstable);
        assert_eq!(version.raw(), raw);
    }

    #[test]
    fn parse_exposes_numeric_portion_as_written() {
        let version = Version::parse("1.0.0-B");

        assert_eq!(version.number(), "1.0.0");
        assert_eq!(version.stability(), Stability::Beta);
    }

    #[test]
    fn accessors_truncate_to_major_minor_patch() {
        let version = Version::parse("6.0.1.4");

        assert_eq!(version.major(), 6);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.patch(), 1);
        assert_eq!(version.parts().len(), 4);
    }

    #[rstest]
    #[case("")]
    #[case("latest")]
    #[case("no digits here")]
    fn parse_defaults_to_zero_when_no_numeric_run(#[case] raw: &str) {
        let version = Version::parse(raw);

        assert_eq!(version.number(), "0.0");
        assert_eq!(version.parts(), &[0, 0]);
        assert!(!version.is_unstable());
    }

    #[test]
    fn parse_without_digits_still_detects_stability_marker() {
        let version = Version::parse("nightly-snapshot");

        assert_eq!(version.parts(), &[0, 0]);
        assert_eq!(version.tag(), Some("snapshot"));
        assert!(version.is_unstable());
    }

    #[rstest]
    #[case("1.2.0", "1.0.0", Ordering::Greater)]
    #[case("0.9.0", "1.0.0", Ordering::Less)]
    #[case("1.0.0", "1.0.0", Ordering::Equal)]
    #[case("1.0.0-beta", "1.0.0", Ordering::Equal)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2.0.1", "1.2.0", Ordering::Greater)]
    #[case("1.10.0", "1.9.0", Ordering::Greater)]
    #[case("v2.0.0", "1.99.99", Ordering::Greater)]
    fn cmp_uses_numeric_parts_only(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(Version::parse(left).cmp(&Version::parse(right)), expected);
    }

    #[test]
    fn is_newer_than_is_strict() {
        let current = Version::parse("1.0.0");

        assert!(Version::parse("1.0.1").is_newer_than(&current));
        assert!(!Version::parse("1.0.0").is_newer_than(&current));
        assert!(!Version::parse("1.0.0-rc1").is_newer_than(&current));
    }

    #[test]
    fn display_shows_raw_input() {
        assert_eq!(Version::parse("v1.2.3-beta").to_string(), "v1.2.3-beta");
        assert_eq!(Version::parse("").to_string(), "0.0");
    }
}
