// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur during [find_route](crate::find_route) or
/// [find_route_indexed](crate::find_route_indexed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The start or end location doesn't exist in the registry.
    /// No search is attempted in that case.
    #[error("unknown location: {0:?}")]
    UnknownLocation(String),

    /// All locations reachable from the start were expanded
    /// without reaching the end.
    #[error("no route found")]
    NoRoute,
}
