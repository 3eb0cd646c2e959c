// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod error;
mod search;

pub use error::RouteError;
pub use search::{find_route, find_route_indexed, Route};
