//! Identifier types: [`CountryCode`] keys for the country graph and
//! [`JourneyId`] UUID wrappers for in-flight journeys.
//!
//! Country codes are ISO-3166 alpha-2 codes, normalised to upper case on
//! construction so that `"za"` and `"ZA"` name the same node. Journey IDs use
//! UUID v7 (time-ordered) so that a `BTreeMap<JourneyId, _>` iterates in
//! boarding order.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A string could not be interpreted as an ISO-3166 alpha-2 country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code {0:?}: expected two ASCII letters")]
pub struct InvalidCountryCode(pub String);

/// ISO-3166 alpha-2 country code, the unique key of every country.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalise a country code.
    ///
    /// Surrounding whitespace is trimmed and letters are upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCountryCode`] unless the trimmed input is exactly two
    /// ASCII letters.
    pub fn new(raw: &str) -> Result<Self, InvalidCountryCode> {
        let trimmed = raw.trim();
        if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidCountryCode(raw.to_owned()))
        }
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for CountryCode {
    type Err = InvalidCountryCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Unique identifier for a journey (vehicle + path + payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JourneyId(pub Uuid);

impl JourneyId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for JourneyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for JourneyId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_normalised() {
        let code = CountryCode::new(" za ");
        assert_eq!(code.ok().as_ref().map(CountryCode::as_str), Some("ZA"));
    }

    #[test]
    fn country_code_rejects_alpha3_and_digits() {
        assert!(CountryCode::new("ZAF").is_err());
        assert!(CountryCode::new("Z1").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn country_code_deserialize_validates() {
        let ok: Result<CountryCode, _> = serde_json::from_str("\"bw\"");
        assert_eq!(ok.ok().map(|c| c.to_string()), Some(String::from("BW")));

        let bad: Result<CountryCode, _> = serde_json::from_str("\"Botswana\"");
        assert!(bad.is_err());
    }

    #[test]
    fn journey_ids_are_unique() {
        let first = JourneyId::new();
        let second = JourneyId::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }
}
