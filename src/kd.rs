// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{planar_distance, Location, Registry};

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up spatial queries over large sets of [Locations](Location).
/// [find_neighbors](crate::find_neighbors) needs to check every location in the [Registry],
/// which dominates route search time on bigger registries. A k-d tree
/// can help with that, trading memory usage for CPU time.
///
/// The tree borrows locations from a [Registry], and must be rebuilt
/// after the registry changes.
#[derive(Debug, Clone)]
pub struct KDTree<'a> {
    pivot: &'a Location,
    left: Option<Box<KDTree<'a>>>,
    right: Option<Box<KDTree<'a>>>,
}

impl<'a> KDTree<'a> {
    /// Finds the closest [Location] to the given position.
    pub fn find_nearest_location(&self, lat: f64, lon: f64) -> &'a Location {
        self.find_nearest_location_impl(lat, lon, false).0
    }

    fn find_nearest_location_impl(
        &self,
        lat: f64,
        lon: f64,
        lon_divides: bool,
    ) -> (&'a Location, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = planar_distance(lat, lon, best.lat, best.lon);

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            lon < best.lon
        } else {
            lat < best.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.find_nearest_location_impl(lat, lon, !lon_divides);
            if alt_dist < best_dist {
                best = alt;
                best_dist = alt_dist;
            }
        }

        if let Some(ref branch) = second {
            // A closer location is possible in the second branch if and only if
            // the splitting axis is closer than the current best candidate.
            let dist_to_axis = if lon_divides {
                (lon - self.pivot.lon).abs()
            } else {
                (lat - self.pivot.lat).abs()
            };

            if dist_to_axis < best_dist {
                let (alt, alt_dist) = branch.find_nearest_location_impl(lat, lon, !lon_divides);
                if alt_dist < best_dist {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        return (best, best_dist);
    }

    /// Finds all [Locations](Location) whose [planar_distance] to the given position
    /// doesn't exceed `radius`. The order of returned locations is unspecified.
    pub fn find_within(&self, lat: f64, lon: f64, radius: f64) -> Vec<&'a Location> {
        let mut found = Vec::default();
        self.find_within_impl(lat, lon, radius, false, &mut found);
        found
    }

    fn find_within_impl(
        &self,
        lat: f64,
        lon: f64,
        radius: f64,
        lon_divides: bool,
        found: &mut Vec<&'a Location>,
    ) {
        if planar_distance(lat, lon, self.pivot.lat, self.pivot.lon) <= radius {
            found.push(self.pivot);
        }

        let (coord, pivot_coord) = if lon_divides {
            (lon, self.pivot.lon)
        } else {
            (lat, self.pivot.lat)
        };

        // Equal coordinates may end up on either side of the pivot.
        // Differences are compared (instead of coord ± radius) so that rounding
        // never prunes a location which planar_distance would accept.
        if let Some(ref left) = self.left {
            if coord - pivot_coord <= radius {
                left.find_within_impl(lat, lon, radius, !lon_divides, found);
            }
        }
        if let Some(ref right) = self.right {
            if pivot_coord - coord <= radius {
                right.find_within_impl(lat, lon, radius, !lon_divides, found);
            }
        }
    }

    /// Builds a k-d tree over all [Locations](Location) of a [Registry].
    /// Returns `None` if the registry is empty.
    pub fn build(registry: &'a Registry) -> Option<Self> {
        Self::from_iter(registry.iter())
    }

    /// Builds a k-d tree from an iterable of [Location] references.
    pub fn from_iter<I: IntoIterator<Item = &'a Location>>(locations: I) -> Option<Self> {
        let mut locations = locations.into_iter().collect::<Vec<_>>();
        Self::build_impl(locations.as_mut_slice(), false)
    }

    fn build_impl(locations: &mut [&'a Location], lon_divides: bool) -> Option<Self> {
        match locations.len() {
            0 => None,
            1 => Some(Self {
                pivot: locations[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    locations.sort_by(|a, b| a.lon.total_cmp(&b.lon));
                } else {
                    locations.sort_by(|a, b| a.lat.total_cmp(&b.lat));
                }
                let median = locations.len() / 2;
                let pivot = locations[median];
                let (left, right_and_pivot) = locations.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_registry() -> Registry {
        Registry::from_iter([
            Location::new("1", 0.01, 0.01, 0.0),
            Location::new("2", 0.01, 0.05, 0.0),
            Location::new("3", 0.03, 0.09, 0.0),
            Location::new("4", 0.04, 0.03, 0.0),
            Location::new("5", 0.04, 0.07, 0.0),
            Location::new("6", 0.07, 0.03, 0.0),
            Location::new("7", 0.07, 0.01, 0.0),
            Location::new("8", 0.08, 0.05, 0.0),
            Location::new("9", 0.08, 0.09, 0.0),
        ])
    }

    fn sorted_names(locations: Vec<&Location>) -> Vec<&str> {
        let mut names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
        names.sort();
        names
    }

    #[test]
    fn find_nearest_location() {
        let r = grid_registry();
        let tree = KDTree::build(&r).expect("k-d tree from non-empty registry must not be empty");

        assert_eq!(tree.find_nearest_location(0.02, 0.02).name, "1");
        assert_eq!(tree.find_nearest_location(0.05, 0.03).name, "4");
        assert_eq!(tree.find_nearest_location(0.05, 0.08).name, "5");
        assert_eq!(tree.find_nearest_location(0.09, 0.06).name, "8");
    }

    #[test]
    fn find_within() {
        let r = grid_registry();
        let tree = KDTree::build(&r).unwrap();

        assert_eq!(sorted_names(tree.find_within(0.04, 0.03, 0.031)), ["4", "6"]);
        assert_eq!(sorted_names(tree.find_within(0.05, 0.05, 0.001)), Vec::<&str>::new());
        assert_eq!(sorted_names(tree.find_within(0.05, 0.05, 1.0)).len(), 9);
    }

    #[test]
    fn find_within_matches_linear_scan() {
        let r = grid_registry();
        let tree = KDTree::build(&r).unwrap();

        for center in r.iter() {
            for radius in [0.0, 0.02, 0.04, 0.05] {
                let expected = r
                    .iter()
                    .filter(|l| planar_distance(center.lat, center.lon, l.lat, l.lon) <= radius)
                    .collect::<Vec<_>>();
                assert_eq!(
                    sorted_names(tree.find_within(center.lat, center.lon, radius)),
                    sorted_names(expected),
                );
            }
        }
    }

    #[test]
    fn find_nearest_location_matches_registry() {
        let r = crate::dataset::karachi();
        let tree = KDTree::build(&r).unwrap();

        for (lat, lon) in [
            (24.96, 67.07),
            (24.93, 67.10),
            (24.92, 67.12),
            (24.88, 67.11),
            (25.5, 66.5),
        ] {
            assert_eq!(
                tree.find_nearest_location(lat, lon).name,
                r.find_nearest_location(lat, lon).unwrap().name,
            );
        }
        assert_eq!(tree.find_nearest_location(24.9341, 67.1052).name, "Maskan Chowrangi");
    }

    #[test]
    fn empty_registry() {
        assert!(KDTree::build(&Registry::new()).is_none());
    }
}
