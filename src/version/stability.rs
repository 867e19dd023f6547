//! Stability classification of a version tag

/// Release channel a version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Alpha,
    Beta,
    ReleaseCandidate,
    Snapshot,
}

impl Stability {
    /// Classify the tag written next to the version number.
    ///
    /// Marker words match by case-insensitive prefix, so "beta-release" and
    /// "alpha_2" are pre-releases. A bare "a" or "b" (with an optional
    /// counter, as in "B2") also counts. Anything else, "build3" included,
    /// is stable.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Stability::Stable;
        };

        let lowered = tag.to_ascii_lowercase();
        let letter = lowered.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-');

        if lowered.starts_with("snap") {
            Stability::Snapshot
        } else if lowered.starts_with("rc") {
            Stability::ReleaseCandidate
        } else if lowered.starts_with("alpha") || letter == "a" {
            Stability::Alpha
        } else if lowered.starts_with("beta") || letter == "b" {
            Stability::Beta
        } else {
            Stability::Stable
        }
    }

    /// Classify a standalone word found anywhere in a release name.
    ///
    /// Only full marker words count here ("beta", "RC2", "snapshot"), so
    /// ordinary words such as "api" or "bugfix" stay stable.
    pub fn from_marker(word: &str) -> Self {
        let lowered = word.to_ascii_lowercase();
        let marker = lowered.trim_end_matches(|c: char| c.is_ascii_digit());

        match marker {
            "alpha" => Stability::Alpha,
            "beta" => Stability::Beta,
            "rc" => Stability::ReleaseCandidate,
            "snap" | "snapshot" => Stability::Snapshot,
            _ => Stability::Stable,
        }
    }

    pub fn is_unstable(&self) -> bool {
        !matches!(self, Stability::Stable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Stable => "stable",
            Stability::Alpha => "alpha",
            Stability::Beta => "beta",
            Stability::ReleaseCandidate => "rc",
            Stability::Snapshot => "snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Stability::Stable)]
    #[case(Some("B"), Stability::Beta)]
    #[case(Some("beta"), Stability::Beta)]
    #[case(Some("BETA2"), Stability::Beta)]
    #[case(Some("a"), Stability::Alpha)]
    #[case(Some("Alpha.3"), Stability::Alpha)]
    #[case(Some("rc"), Stability::ReleaseCandidate)]
    #[case(Some("RC1"), Stability::ReleaseCandidate)]
    #[case(Some("SNAPSHOT"), Stability::Snapshot)]
    #[case(Some("snap"), Stability::Snapshot)]
    #[case(Some("whatever"), Stability::Stable)]
    #[case(Some("release"), Stability::Stable)]
    #[case(Some("beta-release"), Stability::Beta)]
    #[case(Some("alpha_2"), Stability::Alpha)]
    #[case(Some("Snapshot20240101"), Stability::Snapshot)]
    #[case(Some("build3"), Stability::Stable)]
    #[case(Some("Build"), Stability::Stable)]
    #[case(Some("B2"), Stability::Beta)]
    #[case(Some("api"), Stability::Stable)]
    #[case(Some("bugfix"), Stability::Stable)]
    fn from_tag_classifies_markers(#[case] tag: Option<&str>, #[case] expected: Stability) {
        assert_eq!(Stability::from_tag(tag), expected);
    }

    #[rstest]
    #[case("beta", Stability::Beta)]
    #[case("BETA2", Stability::Beta)]
    #[case("RC1", Stability::ReleaseCandidate)]
    #[case("SNAPSHOT", Stability::Snapshot)]
    #[case("Alpha", Stability::Alpha)]
    #[case("api", Stability::Stable)]
    #[case("bugfix", Stability::Stable)]
    #[case("b", Stability::Stable)]
    #[case("v1", Stability::Stable)]
    fn from_marker_requires_whole_marker_word(#[case] word: &str, #[case] expected: Stability) {
        assert_eq!(Stability::from_marker(word), expected);
    }

    #[test]
    fn only_stable_is_not_unstable() {
        assert!(!Stability::Stable.is_unstable());
        assert!(Stability::Alpha.is_unstable());
        assert!(Stability::Beta.is_unstable());
        assert!(Stability::ReleaseCandidate.is_unstable());
        assert!(Stability::Snapshot.is_unstable());
    }
}
