//! Route planning over a star snapshot.
//!
//! This module provides:
//! - [`RouteRequest`] - High-level route search request
//! - [`RouteSet`] - Ranked alternative routes for one origin/destination pair
//! - [`find_routes`] - Main entry point for computing routes
//!
//! # Example
//!
//! ```ignore
//! use starlanes_lib::{find_routes, RouteRequest};
//!
//! let request = RouteRequest::new("Altair", "Vega", 10.0).with_route_count(3);
//! let routes = find_routes(&stars, &request)?;
//! println!("best route: {} jumps", routes.best().map_or(0, |path| path.hop_count()));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{build_proximity_graph, BuildStrategy};
use crate::path::{k_shortest_paths, Path};
use crate::star::{Star, StarId};

/// High-level route search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: StarId,
    pub destination: StarId,
    /// Longest single jump the traveller can make, in light-years.
    pub max_jump_distance: f64,
    /// Number of ranked alternatives to return.
    #[serde(default = "default_route_count")]
    pub route_count: usize,
    /// Stars removed from the snapshot before routing.
    #[serde(default)]
    pub excluded_stars: Vec<StarId>,
    /// Graph build strategy; `Auto` picks by star count.
    #[serde(default)]
    pub strategy: BuildStrategy,
}

fn default_route_count() -> usize {
    1
}

impl RouteRequest {
    /// Convenience constructor for a single best route with no exclusions.
    pub fn new(
        origin: impl Into<StarId>,
        destination: impl Into<StarId>,
        max_jump_distance: f64,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            max_jump_distance,
            route_count: default_route_count(),
            excluded_stars: Vec::new(),
            strategy: BuildStrategy::default(),
        }
    }

    /// Request up to `count` ranked alternatives.
    pub fn with_route_count(mut self, count: usize) -> Self {
        self.route_count = count;
        self
    }

    /// Remove the given stars from the snapshot before routing.
    pub fn with_excluded_stars(
        mut self,
        excluded: impl IntoIterator<Item = impl Into<StarId>>,
    ) -> Self {
        self.excluded_stars = excluded.into_iter().map(Into::into).collect();
        self
    }

    /// Force a particular graph build strategy.
    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Ranked routes returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSet {
    pub origin: StarId,
    pub destination: StarId,
    pub max_jump_distance: f64,
    /// Strategy that actually built the graph (never `Auto`).
    pub strategy: BuildStrategy,
    /// Routes sorted by (total distance, star sequence); empty when the
    /// destination cannot be reached.
    pub routes: Vec<Path>,
}

impl RouteSet {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// The best route, when one exists.
    pub fn best(&self) -> Option<&Path> {
        self.routes.first()
    }
}

/// Compute ranked routes between the requested stars.
///
/// This is the main entry point for route search. It:
/// 1. Validates the request
/// 2. Prunes excluded stars from the snapshot
/// 3. Builds the proximity graph with the requested strategy
/// 4. Resolves both endpoints against the pruned snapshot
/// 5. Short-circuits to an empty set when the endpoints are disconnected
/// 6. Runs the k-shortest search
pub fn find_routes(stars: &[Star], request: &RouteRequest) -> Result<RouteSet> {
    // Step 1: Validate the request
    if request.route_count == 0 {
        return Err(Error::invalid_argument(
            "route count must be at least 1, got 0",
        ));
    }
    for endpoint in [&request.origin, &request.destination] {
        if request.excluded_stars.contains(endpoint) {
            return Err(Error::invalid_argument(format!(
                "endpoint {endpoint} is in the exclusion list"
            )));
        }
    }

    // Step 2: Prune excluded stars
    let pruned: Vec<Star>;
    let routable: &[Star] = if request.excluded_stars.is_empty() {
        stars
    } else {
        pruned = stars
            .iter()
            .filter(|star| !request.excluded_stars.contains(&star.id))
            .cloned()
            .collect();
        debug!(excluded = stars.len() - pruned.len(), "pruned excluded stars");
        &pruned
    };

    // Step 3: Build the proximity graph
    let graph = build_proximity_graph(routable, request.max_jump_distance, request.strategy)?;

    // Step 4: Resolve endpoints; an unknown identifier is an input error,
    // distinct from a legitimate "no route exists"
    for endpoint in [&request.origin, &request.destination] {
        if !graph.contains(endpoint) {
            return Err(Error::UnknownStar {
                id: endpoint.clone(),
            });
        }
    }

    // Step 5: Reachability pre-check, skipping the k-shortest machinery
    // entirely when the endpoints sit in different components
    if !graph.is_reachable(&request.origin, &request.destination)? {
        info!(
            origin = %request.origin,
            destination = %request.destination,
            "destination unreachable within jump distance"
        );
        return Ok(RouteSet {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            max_jump_distance: request.max_jump_distance,
            strategy: graph.strategy(),
            routes: Vec::new(),
        });
    }

    // Step 6: Run the k-shortest search
    let routes = k_shortest_paths(
        &graph,
        &request.origin,
        &request.destination,
        request.route_count,
    )?;

    info!(
        origin = %request.origin,
        destination = %request.destination,
        requested = request.route_count,
        found = routes.len(),
        "route search finished"
    );

    Ok(RouteSet {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        max_jump_distance: request.max_jump_distance,
        strategy: graph.strategy(),
        routes,
    })
}
