// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};

use crate::{planar_distance, Location, RouteError};

/// Represents a set of named [Locations](Location).
///
/// Locations are keyed (and iterated) by their name, in lexicographic order.
/// The registry is never modified by route searches - all search state is kept
/// separately for each run, so a single registry can be shared between
/// any number of (possibly concurrent) searches.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Registry(BTreeMap<String, Location>);

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of locations in the registry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the registry contains no locations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all [Locations](Location), ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.0.values()
    }

    /// Retrieves a [Location] with the provided name.
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.0.get(name)
    }

    /// Retrieves a [Location] with the provided name,
    /// failing with [RouteError::UnknownLocation] if there's no such location.
    pub fn lookup(&self, name: &str) -> Result<&Location, RouteError> {
        self.get(name)
            .ok_or_else(|| RouteError::UnknownLocation(name.to_string()))
    }

    /// Creates or replaces a [Location] with `location.name`.
    ///
    /// Returns the replaced location, if there was one.
    pub fn insert(&mut self, location: Location) -> Option<Location> {
        match self.0.entry(location.name.clone()) {
            Entry::Vacant(e) => {
                e.insert(location);
                None
            }
            Entry::Occupied(mut e) => Some(e.insert(location)),
        }
    }

    /// Deletes a [Location] with the given name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Location> {
        self.0.remove(name)
    }

    /// Finds the closest [Location] to the given position.
    ///
    /// This function requires computing the distance to every [Location] in the registry,
    /// see [KDTree](crate::KDTree) for a faster alternative on large sets.
    pub fn find_nearest_location(&self, lat: f64, lon: f64) -> Option<&Location> {
        self.iter()
            .map(|loc| (planar_distance(lat, lon, loc.lat, loc.lon), loc))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, loc)| loc)
    }
}

impl FromIterator<Location> for Registry {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut r = Self::new();
        r.extend(iter);
        r
    }
}

impl Extend<Location> for Registry {
    fn extend<I: IntoIterator<Item = Location>>(&mut self, iter: I) {
        iter.into_iter().for_each(|loc| {
            self.insert(loc);
        });
    }
}
