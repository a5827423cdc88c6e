//! Stable, deduplicated ordering of network locations.
//!
//! The ordering rule is fixed: every segment's `from` name in segment order,
//! then every segment's `to` name in segment order, keeping only the first
//! appearance of each name. Position 0 under this rule is the default
//! reference (entry) node and the last position the default exit node, so
//! the rule must never change silently.

use crate::{LocationId, TrafficError, TrafficResult};
use std::collections::HashMap;

/// Reference and exit nodes of a flow computation.
///
/// The reference node is the one whose potential is pinned to zero; demand
/// is injected there and withdrawn at the exit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminals {
    pub reference: LocationId,
    pub exit: LocationId,
}

impl Terminals {
    pub fn new(reference: LocationId, exit: LocationId) -> Self {
        Self { reference, exit }
    }
}

/// Ordered list of location names plus the reverse lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LocationIndex {
    /// Build the index from ordered `(from, to)` endpoint pairs.
    ///
    /// An empty name means the segment references no location at all, which
    /// only happens with malformed input.
    pub fn from_endpoints<'a, I>(pairs: I) -> TrafficResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
        let mut index = LocationIndex::default();

        for (segment, (from, to)) in pairs.iter().enumerate() {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(TrafficError::DataIntegrity(format!(
                    "segment {segment} is missing a location name"
                )));
            }
        }

        for (from, _) in &pairs {
            index.insert(from);
        }
        for (_, to) in &pairs {
            index.insert(to);
        }
        Ok(index)
    }

    fn insert(&mut self, name: &str) {
        if !self.positions.contains_key(name) {
            self.positions.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a location name.
    pub fn id(&self, name: &str) -> Option<LocationId> {
        self.positions.get(name).copied().map(LocationId::new)
    }

    /// Position of a location name, failing on unknown names.
    pub fn resolve(&self, name: &str) -> TrafficResult<LocationId> {
        self.id(name)
            .ok_or_else(|| TrafficError::DataIntegrity(format!("unknown location '{name}'")))
    }

    pub fn name(&self, id: LocationId) -> Option<&str> {
        self.names.get(id.value()).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First location as reference, last location as exit.
    pub fn default_terminals(&self) -> TrafficResult<Terminals> {
        if self.names.len() < 2 {
            return Err(TrafficError::DataIntegrity(format!(
                "network needs at least two locations, found {}",
                self.names.len()
            )));
        }
        Ok(Terminals::new(
            LocationId::new(0),
            LocationId::new(self.names.len() - 1),
        ))
    }

    /// Terminals from explicit names, falling back to the default rule for
    /// whichever side is not given.
    pub fn terminals(&self, entry: Option<&str>, exit: Option<&str>) -> TrafficResult<Terminals> {
        let defaults = self.default_terminals()?;
        let reference = match entry {
            Some(name) => self.resolve(name)?,
            None => defaults.reference,
        };
        let exit = match exit {
            Some(name) => self.resolve(name)?,
            None => defaults.exit,
        };
        Ok(Terminals::new(reference, exit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_come_before_to_names() {
        let pairs = [("A", "B"), ("C", "A"), ("B", "D")];
        let index = LocationIndex::from_endpoints(pairs).unwrap();
        assert_eq!(index.names(), ["A", "C", "B", "D"]);
        assert_eq!(index.id("D"), Some(LocationId::new(3)));
        assert_eq!(index.name(LocationId::new(1)), Some("C"));
    }

    #[test]
    fn every_location_appears_once() {
        let pairs = [("A", "B"), ("A", "B"), ("B", "A")];
        let index = LocationIndex::from_endpoints(pairs).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn default_terminals_are_first_and_last() {
        let index = LocationIndex::from_endpoints([("X", "Y"), ("Y", "Z")]).unwrap();
        let terminals = index.default_terminals().unwrap();
        assert_eq!(terminals.reference, LocationId::new(0));
        assert_eq!(terminals.exit, LocationId::new(2));
        assert_eq!(index.name(terminals.exit), Some("Z"));
    }

    #[test]
    fn named_terminals_override_defaults() {
        let index = LocationIndex::from_endpoints([("X", "Y"), ("Y", "Z")]).unwrap();
        let terminals = index.terminals(Some("Y"), None).unwrap();
        assert_eq!(terminals.reference, LocationId::new(1));
        assert_eq!(terminals.exit, LocationId::new(2));
        assert!(index.terminals(None, Some("nowhere")).is_err());
    }

    #[test]
    fn empty_location_name_is_rejected() {
        let err = LocationIndex::from_endpoints([("A", "B"), ("", "C")]).unwrap_err();
        assert!(matches!(err, TrafficError::DataIntegrity(_)));
    }
}
