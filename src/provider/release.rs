//! Release metadata returned by providers

use std::collections::BTreeSet;

use crate::error::Unsupported;
use crate::version::Version;

/// A release attribute as reported by one provider.
///
/// `Unsupported` means the source has no such attribute at all; `Absent`
/// means the source supports it but this release does not carry a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Unsupported,
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Unsupported | Field::Absent => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Field::Unsupported)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Turn an unsupported field into an error naming the provider and field
    pub fn require(
        &self,
        provider: &'static str,
        field: &'static str,
    ) -> Result<Option<&T>, Unsupported> {
        match self {
            Field::Unsupported => Err(Unsupported { provider, field }),
            Field::Absent => Ok(None),
            Field::Present(value) => Ok(Some(value)),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unsupported
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

/// Latest release of an artifact as seen by one provider
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    version: Version,
    download_link: Field<String>,
    changelog_link: Field<String>,
    donation_link: Field<String>,
    price: Field<String>,
    contributors: Field<BTreeSet<String>>,
    download_count: Field<u64>,
    premium: Field<bool>,
}

impl Release {
    /// Create a release where every optional attribute is unsupported
    pub fn new(version: Version) -> Self {
        Self {
            version,
            download_link: Field::Unsupported,
            changelog_link: Field::Unsupported,
            donation_link: Field::Unsupported,
            price: Field::Unsupported,
            contributors: Field::Unsupported,
            download_count: Field::Unsupported,
            premium: Field::Unsupported,
        }
    }

    pub fn with_download_link(mut self, link: impl Into<Field<String>>) -> Self {
        self.download_link = link.into();
        self
    }

    pub fn with_changelog_link(mut self, link: impl Into<Field<String>>) -> Self {
        self.changelog_link = link.into();
        self
    }

    pub fn with_donation_link(mut self, link: impl Into<Field<String>>) -> Self {
        self.donation_link = link.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<Field<String>>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_contributors(mut self, contributors: impl Into<Field<BTreeSet<String>>>) -> Self {
        self.contributors = contributors.into();
        self
    }

    pub fn with_download_count(mut self, count: impl Into<Field<u64>>) -> Self {
        self.download_count = count.into();
        self
    }

    pub fn with_premium(mut self, premium: impl Into<Field<bool>>) -> Self {
        self.premium = premium.into();
        self
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn download_link(&self) -> &Field<String> {
        &self.download_link
    }

    pub fn changelog_link(&self) -> &Field<String> {
        &self.changelog_link
    }

    pub fn donation_link(&self) -> &Field<String> {
        &self.donation_link
    }

    pub fn price(&self) -> &Field<String> {
        &self.price
    }

    pub fn contributors(&self) -> &Field<BTreeSet<String>> {
        &self.contributors
    }

    pub fn download_count(&self) -> &Field<u64> {
        &self.download_count
    }

    pub fn is_premium(&self) -> &Field<bool> {
        &self.premium
    }
}
