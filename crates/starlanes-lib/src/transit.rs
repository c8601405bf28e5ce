//! Transit classification: group feasible jumps between stars into distance
//! bands, as shown on banded starmap overlays.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::spatial::SpatialIndex;
use crate::star::{Star, StarId};

/// A `(lower, upper]` distance interval in light-years.
///
/// The lower bound is exclusive so that adjacent bands sharing a boundary
/// never both claim the same pair; the upper bound is inclusive, matching
/// the radius-query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBand {
    lower: f64,
    upper: f64,
}

impl RangeBand {
    /// Create a band covering distances `d` with `lower < d <= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower < 0.0 || lower >= upper {
            return Err(Error::invalid_argument(format!(
                "range band requires finite bounds with 0 <= lower < upper, got ({lower}, {upper}]"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Band membership: `lower < distance <= upper`.
    pub fn contains(&self, distance: f64) -> bool {
        self.lower < distance && distance <= self.upper
    }
}

/// One feasible jump between two stars. `from` holds the lexicographically
/// smaller identifier, the canonical form for an undirected pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transit {
    pub from: StarId,
    pub to: StarId,
    pub distance: f64,
}

/// Classify every star pair within reach into distance bands.
///
/// Builds one spatial index, queries each star at the largest upper bound,
/// and files each unordered pair under the first band (in input order) that
/// contains its separation. Returns one list per input band, each sorted by
/// (distance, from, to). Empty stars or bands yield empty lists, not an
/// error.
pub fn find_transits(stars: &[Star], bands: &[RangeBand]) -> Result<Vec<Vec<Transit>>> {
    if stars.is_empty() || bands.is_empty() {
        return Ok(vec![Vec::new(); bands.len()]);
    }

    let max_upper = bands.iter().map(RangeBand::upper).fold(0.0_f64, f64::max);
    let index = SpatialIndex::build(stars)?;
    let mut transits = vec![Vec::new(); bands.len()];

    for star in stars {
        for (neighbour, distance) in index.within_radius(star.position, max_upper)? {
            // Each unordered pair comes back twice; keep the pass where the
            // query star holds the smaller identifier.
            if neighbour.id <= star.id {
                continue;
            }
            if let Some(slot) = bands.iter().position(|band| band.contains(distance)) {
                transits[slot].push(Transit {
                    from: star.id.clone(),
                    to: neighbour.id.clone(),
                    distance,
                });
            }
        }
    }

    for band_transits in &mut transits {
        band_transits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.from.cmp(&b.from))
                .then_with(|| a.to.cmp(&b.to))
        });
    }

    debug!(
        star_count = stars.len(),
        band_count = bands.len(),
        transit_count = transits.iter().map(Vec::len).sum::<usize>(),
        "classified transits"
    );

    Ok(transits)
}
