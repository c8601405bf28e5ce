//! Starlanes library entry points.
//!
//! This crate exposes the computational core behind starmap routing: a
//! spatial index over 3D star positions, proximity graph construction,
//! shortest-path and k-shortest-path search, transit band classification,
//! and a request/response route-finding service tying the stages together.
//! Higher-level consumers should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod graph;
pub mod path;
pub mod routing;
pub mod spatial;
pub mod star;
pub mod transit;

pub use error::{Error, Result};
pub use graph::{
    build_naive_graph, build_proximity_graph, build_spatial_graph, BuildStrategy, Graph,
};
pub use path::{k_shortest_paths, shortest_path, Path};
pub use routing::{find_routes, RouteRequest, RouteSet};
pub use spatial::SpatialIndex;
pub use star::{Point3, Star, StarId};
pub use transit::{find_transits, RangeBand, Transit};
