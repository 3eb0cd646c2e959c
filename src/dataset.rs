// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Location, Registry};

/// Landmarks of Karachi, as `(name, lat, lon, traffic)`.
///
/// Maskan Chowrangi sits exactly at the [default block threshold](crate::DEFAULT_BLOCK_THRESHOLD),
/// so it is still passable, but at a 50% cost penalty.
pub const KARACHI: &[(&str, f64, f64, f64)] = &[
    ("Nagan Chowrangi", 24.96504, 67.06686, 0.0),
    ("Shafiq Mor", 24.95725, 67.07620, 0.0),
    ("LuckyOne Mall", 24.94521, 67.08630, 0.0),
    ("Gulshan Chowrangi", 24.93438, 67.09156, 0.0),
    ("NIPA", 24.92081, 67.09913, 0.0),
    ("NED University", 24.91276, 67.11323, 0.0),
    ("Maskan Chowrangi", 24.9340, 67.1053, 0.5),
    ("UIT University", 24.92788, 67.10871, 0.0),
    ("Safora", 24.92016, 67.12297, 0.0),
    ("Johar", 24.90566, 67.10178, 0.0),
    ("Millennium Mall", 24.89927, 67.11300, 0.0),
    ("Drig Road", 24.89044, 67.12560, 0.0),
    ("Kalaboard", 24.88219, 67.11272, 0.0),
];

/// Creates a [Registry] with all [KARACHI] landmarks.
pub fn karachi() -> Registry {
    KARACHI
        .iter()
        .map(|&(name, lat, lon, traffic)| Location::new(name, lat, lon, traffic))
        .collect()
}
