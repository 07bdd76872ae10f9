//! Enumeration types for the Contagion simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// A per-country scalar quantity tracked by its own ledger.
///
/// Population is not a ledger resource: it is derived from a baseline and a
/// growth rate, see `contagion_world::PopulationModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceKind {
    /// Spreads inside and across borders; carried by passengers.
    Bacon,
    /// Contagious quantity slowed by prophylaxis and cured by apples.
    Sniffles,
    /// Morale; grows with bacon and shrinks with sniffles.
    Smiles,
    /// Produced from annual harvest figures; consumed curing sniffles.
    Apples,
}

impl ResourceKind {
    /// All ledger-backed resource kinds, in tick order.
    pub const ALL: [Self; 4] = [Self::Apples, Self::Bacon, Self::Sniffles, Self::Smiles];

    /// Whether the amount is capped by the country's population.
    pub const fn is_population_capped(self) -> bool {
        !matches!(self, Self::Apples)
    }

    /// Whether vehicles carry this resource between countries.
    pub const fn is_carried(self) -> bool {
        matches!(self, Self::Bacon | Self::Sniffles)
    }

    /// Display name for presentation layers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bacon => "Bacon",
            Self::Sniffles => "Sniffles",
            Self::Smiles => "Smiles",
            Self::Apples => "Apples",
        }
    }

    /// Emoji shown next to the label in legends.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Bacon => "\u{1f953}",
            Self::Sniffles => "\u{1f976}",
            Self::Smiles => "\u{1f60a}",
            Self::Apples => "\u{1f34f}",
        }
    }

    /// Hex colour used by the map legend for this resource.
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Bacon => "#c0392b",
            Self::Sniffles => "#00aeef",
            Self::Smiles => "#ff9500",
            Self::Apples => "#6bc714",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Airport size class as published in the airport reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AirportSize {
    /// Small airfield.
    Small,
    /// Regional airport.
    Medium,
    /// International hub.
    Large,
    /// Size class missing from the source data.
    #[serde(other)]
    Unknown,
}

/// Continent code used to spread the airport selection across the globe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Continent {
    /// Africa.
    #[serde(rename = "AF")]
    Africa,
    /// Asia.
    #[serde(rename = "AS")]
    Asia,
    /// Europe.
    #[serde(rename = "EU")]
    Europe,
    /// North America.
    #[serde(rename = "NA")]
    NorthAmerica,
    /// Oceania.
    #[serde(rename = "OC")]
    Oceania,
    /// South America.
    #[serde(rename = "SA")]
    SouthAmerica,
    /// Antarctica.
    #[serde(rename = "AN")]
    Antarctica,
}

impl Continent {
    /// Continents airports are selected from.
    pub const INHABITED: [Self; 6] = [
        Self::Africa,
        Self::Asia,
        Self::Europe,
        Self::NorthAmerica,
        Self::Oceania,
        Self::SouthAmerica,
    ];
}

// ---------------------------------------------------------------------------
// Journeys
// ---------------------------------------------------------------------------

/// Lifecycle phase of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum JourneyPhase {
    /// Payload computed, origin not yet debited.
    Boarding,
    /// Vehicle moving along its path.
    InFlight,
    /// Destination credited; the journey is about to be retired.
    Arrived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apples_are_the_only_uncapped_resource() {
        let uncapped: Vec<ResourceKind> = ResourceKind::ALL
            .into_iter()
            .filter(|k| !k.is_population_capped())
            .collect();
        assert_eq!(uncapped, vec![ResourceKind::Apples]);
    }

    #[test]
    fn unknown_airport_size_deserializes() {
        let size: Result<AirportSize, _> = serde_json::from_str("\"heliport\"");
        assert_eq!(size.ok(), Some(AirportSize::Unknown));
        let large: Result<AirportSize, _> = serde_json::from_str("\"large\"");
        assert_eq!(large.ok(), Some(AirportSize::Large));
    }

    #[test]
    fn continent_uses_two_letter_codes() {
        let json = serde_json::to_string(&Continent::SouthAmerica).unwrap_or_default();
        assert_eq!(json, "\"SA\"");
    }
}
