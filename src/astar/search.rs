// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use crate::{
    find_neighbors, find_neighbors_indexed, planar_distance, travel_cost, KDTree, Location,
    Options, Registry, RouteError,
};

/// Shortest route between two [Locations](Location), as returned by [find_route].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Names of visited locations, starting with the start and ending with the end location.
    pub locations: Vec<String>,

    /// Sum of [travel_cost] between all consecutive locations.
    pub cost: f64,
}

impl Route {
    /// Returns the number of locations on the route.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if there are no locations on the route.
    /// Routes returned by [find_route] always contain at least the start location.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locations.join(" -> "))
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueItem<'a> {
    at: &'a Location,
    cost: f64,
    heuristic: f64,
    score: f64,
}

impl QueueItem<'_> {
    /// Expansion order: lowest score first, then lowest heuristic
    /// (closer to the end), then lexicographically smallest name.
    fn priority(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.heuristic.total_cmp(&other.heuristic))
            .then_with(|| self.at.name.cmp(&other.at.name))
    }
}

impl PartialEq for QueueItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.priority(other).is_eq()
    }
}

impl Eq for QueueItem<'_> {}

impl PartialOrd for QueueItem<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as better items should be considered "higher",
        // and Rust's BinaryHeap is a max-heap.
        other.priority(self)
    }
}

/// Best known way to reach a location during a single search.
#[derive(Debug, Clone, Copy)]
struct Visit<'a> {
    cost: f64,
    parent: Option<&'a Location>,
}

fn reconstruct_path<'a>(
    visits: &HashMap<&'a str, Visit<'a>>,
    last: &'a Location,
) -> Vec<String> {
    let mut path = vec![last.name.clone()];
    let mut at = last;

    while let Some(parent) = visits.get(at.name.as_str()).and_then(|v| v.parent) {
        path.push(parent.name.clone());
        at = parent;
    }

    path.reverse();
    return path;
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the cheapest route between two named locations in the provided registry.
///
/// Two locations are connected if [Options::is_adjacent] says so; the cost of every hop
/// is given by [travel_cost]. The remaining distance is estimated with
/// [planar_distance], which never overestimates the true cost, so the returned route is optimal.
///
/// Both names are resolved before the search starts, failing with
/// [RouteError::UnknownLocation]. If the end can't be reached from the start,
/// [RouteError::NoRoute] is returned. A route from a location to itself consists
/// of just that location.
///
/// This function checks every location in the registry when looking for neighbors.
/// For large registries, build a [KDTree] and use [find_route_indexed].
pub fn find_route(
    registry: &Registry,
    from: &str,
    to: &str,
    options: &Options,
) -> Result<Route, RouteError> {
    let from = registry.lookup(from)?;
    let to = registry.lookup(to)?;
    search(from, to, |node| find_neighbors(registry, node, options))
}

/// Like [find_route], but uses a [KDTree] built from the same (or an equal) registry
/// to look for neighbors. Results are identical to [find_route].
pub fn find_route_indexed<'a>(
    registry: &'a Registry,
    tree: &KDTree<'a>,
    from: &str,
    to: &str,
    options: &Options,
) -> Result<Route, RouteError> {
    let from = registry.lookup(from)?;
    let to = registry.lookup(to)?;
    search(from, to, |node| find_neighbors_indexed(tree, node, options))
}

fn search<'a, F>(from: &'a Location, to: &'a Location, neighbors: F) -> Result<Route, RouteError>
where
    F: Fn(&'a Location) -> Vec<&'a Location>,
{
    log::debug!("searching for a route from {:?} to {:?}", from.name, to.name);

    let mut queue: BinaryHeap<QueueItem<'a>> = BinaryHeap::default();
    let mut visits: HashMap<&'a str, Visit<'a>> = HashMap::default();
    let mut closed: HashSet<&'a str> = HashSet::default();

    {
        let heuristic = planar_distance(from.lat, from.lon, to.lat, to.lon);
        queue.push(QueueItem {
            at: from,
            cost: 0.0,
            heuristic,
            score: heuristic,
        });
        visits.insert(
            &from.name,
            Visit {
                cost: 0.0,
                parent: None,
            },
        );
    }

    while let Some(item) = queue.pop() {
        // Improving a location's cost pushes another item instead of updating the
        // existing one; only the first (cheapest) item of every location is expanded.
        if !closed.insert(&item.at.name) {
            continue;
        }

        log::trace!(
            "expanding {:?} (cost {}, score {})",
            item.at.name,
            item.cost,
            item.score
        );

        if item.at.name == to.name {
            let route = Route {
                locations: reconstruct_path(&visits, to),
                cost: item.cost,
            };
            log::debug!(
                "found a route with {} locations after {} expansions",
                route.len(),
                closed.len()
            );
            return Ok(route);
        }

        // `item.at` is already closed, so it's skipped if it's its own neighbor
        for neighbor in neighbors(item.at) {
            if closed.contains(neighbor.name.as_str()) {
                continue;
            }

            let neighbor_cost = item.cost + travel_cost(item.at, neighbor);
            let improved = visits
                .get(neighbor.name.as_str())
                .map_or(true, |v| neighbor_cost < v.cost);
            if !improved {
                continue;
            }

            let heuristic = planar_distance(neighbor.lat, neighbor.lon, to.lat, to.lon);
            visits.insert(
                &neighbor.name,
                Visit {
                    cost: neighbor_cost,
                    parent: Some(item.at),
                },
            );
            queue.push(QueueItem {
                at: neighbor,
                cost: neighbor_cost,
                heuristic,
                score: neighbor_cost + heuristic,
            });
        }
    }

    log::debug!(
        "no route from {:?} to {:?} after {} expansions",
        from.name,
        to.name,
        closed.len()
    );
    Err(RouteError::NoRoute)
}
