// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Traffic-aware shortest routes between named locations.
//!
//! Locations are points with a name, a position and a traffic factor, kept in a [Registry].
//! There are no explicit roads - two locations are connected if they are close enough,
//! and the location being travelled into isn't blocked by traffic (see [Options]).
//! The cost of travelling between locations is their straight-line distance,
//! increased proportionally to the traffic at the destination (see [travel_cost]).
//! Routes are found with A*.
//!
//! # Example
//!
//! ```
//! let mut registry = route_tracker::Registry::new();
//! registry.insert(route_tracker::Location::new("Home", 0.0, 0.0, 0.0));
//! registry.insert(route_tracker::Location::new("Shop", 0.005, 0.005, 0.2));
//! registry.insert(route_tracker::Location::new("Work", 0.01, 0.01, 0.0));
//!
//! let route = route_tracker::find_route(
//!     &registry,
//!     "Home",
//!     "Work",
//!     &route_tracker::Options::default(),
//! ).expect("failed to find route");
//!
//! assert_eq!(route.to_string(), "Home -> Work");
//! ```

mod astar;
pub mod dataset;
mod distance;
mod kd;
pub mod loader;
mod neighbors;
mod registry;

pub use astar::{find_route, find_route_indexed, Route, RouteError};
pub use distance::{planar_distance, travel_cost};
pub use kd::KDTree;
pub use neighbors::{
    find_neighbors, find_neighbors_indexed, Options, DEFAULT_BLOCK_THRESHOLD, DEFAULT_MAX_DISTANCE,
};
pub use registry::Registry;

/// Represents a named point of a [Registry].
///
/// `traffic` is expected to be within `[0, 1]`, with zero meaning clear roads.
/// It makes travelling into the location more expensive (see [travel_cost]),
/// and locations with traffic above [Options::block_threshold] can't be entered at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub traffic: f64,
}

impl Location {
    pub fn new<S: Into<String>>(name: S, lat: f64, lon: f64, traffic: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            traffic,
        }
    }
}
