// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{travel_cost, KDTree, Location, Registry};

/// Recommended [Options::max_distance]: two locations are adjacent
/// if travelling between them costs less than this value.
pub const DEFAULT_MAX_DISTANCE: f64 = 0.016;

/// Recommended [Options::block_threshold]: locations with more traffic
/// can't be travelled into.
pub const DEFAULT_BLOCK_THRESHOLD: f64 = 0.5;

/// Controls which locations are considered adjacent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Exclusive upper bound on the [travel_cost] between two adjacent locations.
    pub max_distance: f64,

    /// Inclusive upper bound on the traffic of a location which may be travelled into.
    pub block_threshold: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
        }
    }
}

impl Options {
    /// Checks whether `to` may be entered directly from `from`.
    ///
    /// `from` is adjacent to itself, as long as it isn't blocked.
    #[inline]
    pub fn is_adjacent(&self, from: &Location, to: &Location) -> bool {
        travel_cost(from, to) < self.max_distance && to.traffic <= self.block_threshold
    }
}

/// Returns all locations from the registry which can be entered directly from `node`,
/// ordered by name.
///
/// This function requires checking every [Location] in the registry.
pub fn find_neighbors<'a>(
    registry: &'a Registry,
    node: &Location,
    options: &Options,
) -> Vec<&'a Location> {
    registry
        .iter()
        .filter(|&candidate| options.is_adjacent(node, candidate))
        .collect()
}

/// Returns all locations from the k-d tree which can be entered directly from `node`,
/// ordered by name. The result is identical to [find_neighbors] over the same locations.
///
/// As [travel_cost] is never smaller than the straight-line distance, only locations
/// within [Options::max_distance] from `node` need to be checked.
pub fn find_neighbors_indexed<'a>(
    tree: &KDTree<'a>,
    node: &Location,
    options: &Options,
) -> Vec<&'a Location> {
    let mut neighbors = tree.find_within(node.lat, node.lon, options.max_distance);
    neighbors.retain(|&candidate| options.is_adjacent(node, candidate));
    neighbors.sort_by(|a, b| a.name.cmp(&b.name));
    neighbors
}
