//! Country graph: countries as nodes, borders as directed edges.
//!
//! The [`CountryGraph`] is the spatial backbone of the diffusion rules. Every
//! country in the canonical set is a node, possibly with no neighbours at
//! all (islands). Border data is usually symmetric but the graph does not
//! require it: an edge `a -> b` means resources flow from `a` into `b`.
//!
//! Internally an adjacency map indexes neighbours per country:
//! `BTreeMap<CountryCode, Vec<CountryCode>>`, so iteration order is
//! deterministic.

use std::collections::BTreeMap;

use contagion_types::CountryCode;
use tracing::warn;

use crate::error::WorldError;

/// The country graph holding all countries and their borders.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CountryGraph {
    /// Neighbour lists indexed by country code.
    adjacency: BTreeMap<CountryCode, Vec<CountryCode>>,
}

impl CountryGraph {
    /// Build a graph with the given countries and no borders.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCountry`] if a code appears twice.
    pub fn new<I>(codes: I) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = CountryCode>,
    {
        let mut adjacency = BTreeMap::new();
        for code in codes {
            if adjacency.contains_key(&code) {
                return Err(WorldError::DuplicateCountry(code));
            }
            adjacency.insert(code, Vec::new());
        }
        Ok(Self { adjacency })
    }

    /// Build a graph from a country set and a provider border map.
    ///
    /// Countries absent from `borders` get an empty neighbour list.
    /// Self-borders are ignored, and neighbours outside the country set are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCountry`] if `codes` contains a
    /// duplicate.
    pub fn from_borders<I>(
        codes: I,
        borders: &BTreeMap<CountryCode, Vec<CountryCode>>,
    ) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = CountryCode>,
    {
        let mut graph = Self::new(codes)?;
        for (from, neighbours) in borders {
            if !graph.contains(from) {
                warn!(country = %from, "border list for unknown country skipped");
                continue;
            }
            for to in neighbours {
                if !graph.contains(to) {
                    warn!(country = %from, neighbour = %to, "border to unknown country skipped");
                    continue;
                }
                graph.add_border(from, to)?;
            }
        }
        Ok(graph)
    }

    /// Insert a directed border `a -> b`.
    ///
    /// Self-borders and duplicate edges are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if either endpoint is missing.
    pub fn add_border(&mut self, a: &CountryCode, b: &CountryCode) -> Result<(), WorldError> {
        if !self.adjacency.contains_key(b) {
            return Err(WorldError::UnknownCountry(b.clone()));
        }
        let neighbours = self
            .adjacency
            .get_mut(a)
            .ok_or_else(|| WorldError::UnknownCountry(a.clone()))?;
        if a != b && !neighbours.contains(b) {
            neighbours.push(b.clone());
        }
        Ok(())
    }

    /// Neighbours of a country, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the code is not in the graph.
    pub fn neighbors(&self, code: &CountryCode) -> Result<&[CountryCode], WorldError> {
        self.adjacency
            .get(code)
            .map(Vec::as_slice)
            .ok_or_else(|| WorldError::UnknownCountry(code.clone()))
    }

    /// Whether the country is part of the graph.
    pub fn contains(&self, code: &CountryCode) -> bool {
        self.adjacency.contains_key(code)
    }

    /// All country codes, in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &CountryCode> {
        self.adjacency.keys()
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no countries.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of directed borders.
    pub fn border_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether every border `a -> b` has a matching `b -> a`.
    ///
    /// Diagnostic only: asymmetric data is accepted as-is.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(from, neighbours)| {
            neighbours.iter().all(|to| {
                self.adjacency
                    .get(to)
                    .is_some_and(|back| back.contains(from))
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CountryCode {
        CountryCode::new(raw).unwrap()
    }

    #[test]
    fn duplicate_country_rejected() {
        let result = CountryGraph::new(vec![code("ZA"), code("BW"), code("ZA")]);
        assert_eq!(result, Err(WorldError::DuplicateCountry(code("ZA"))));
    }

    #[test]
    fn from_borders_fills_missing_and_skips_unknown() {
        let mut borders = BTreeMap::new();
        borders.insert(code("ZA"), vec![code("BW"), code("ZA"), code("FR")]);
        borders.insert(code("BW"), vec![code("ZA")]);

        let graph =
            CountryGraph::from_borders(vec![code("ZA"), code("BW"), code("MG")], &borders).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.neighbors(&code("ZA")).unwrap(), &[code("BW")]);
        assert!(graph.neighbors(&code("MG")).unwrap().is_empty());
        assert!(graph.is_symmetric());
        assert_eq!(graph.border_count(), 2);
    }

    #[test]
    fn unknown_country_errors() {
        let mut graph = CountryGraph::new(vec![code("ZA")]).unwrap();
        assert!(matches!(
            graph.neighbors(&code("BW")),
            Err(WorldError::UnknownCountry(_))
        ));
        assert!(graph.add_border(&code("ZA"), &code("BW")).is_err());
    }

    #[test]
    fn asymmetric_graph_detected() {
        let mut graph = CountryGraph::new(vec![code("ZA"), code("BW")]).unwrap();
        assert!(graph.add_border(&code("ZA"), &code("BW")).is_ok());
        assert!(!graph.is_symmetric());
        assert!(graph.add_border(&code("BW"), &code("ZA")).is_ok());
        assert!(graph.is_symmetric());
    }
}
