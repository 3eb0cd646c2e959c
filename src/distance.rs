// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Location;

/// Calculates the straight-line distance between two lat-lon positions,
/// treating both coordinates as a flat, euclidean plane.
///
/// This is only reasonable over short distances (a single city), and is expressed
/// in the same units as the coordinates themselves (degrees).
pub fn planar_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let x = lon1 - lon2;
    let y = lat1 - lat2;
    (x * x + y * y).sqrt()
}

/// Calculates the cost of travelling from one [Location] into another.
///
/// The cost is the [planar_distance] between the two locations, multiplied by
/// `1 + to.traffic`. Only the traffic at the destination matters, so in general
/// `travel_cost(a, b) != travel_cost(b, a)`.
///
/// As traffic can only inflate the cost, `travel_cost(a, b) >= planar_distance(a, b)`.
pub fn travel_cost(from: &Location, to: &Location) -> f64 {
    planar_distance(from.lat, from.lon, to.lat, to.lon) * (1.0 + to.traffic)
}
