//! First-fit online clustering of swing prices into levels.
//!
//! Points are assigned in arrival order to the first cluster whose running
//! mean lies within `tolerance` relative distance. The result depends on
//! the order of points, not only on the set: re-running on the same
//! sequence always gives the same clusters.

use crate::core::types::{Level, Price};

/// Running cluster of swing prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    sum: f64,
    count: usize,
}

impl Cluster {
    fn new(price: Price) -> Self {
        Self { sum: price, count: 1 }
    }

    /// Arithmetic mean of all members.
    #[inline]
    pub fn mean(&self) -> Price {
        self.sum / self.count as f64
    }

    /// Number of members.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    fn accepts(&self, price: Price, tolerance: f64) -> bool {
        let mean = self.mean();
        (price - mean).abs() / mean < tolerance
    }

    fn add(&mut self, price: Price) {
        self.sum += price;
        self.count += 1;
    }
}

/// Incremental first-fit clusterer.
#[derive(Debug, Clone)]
pub struct LevelClusterer {
    tolerance: f64,
    clusters: Vec<Cluster>,
}

impl LevelClusterer {
    /// Create a clusterer with a relative tolerance (0.002 = 0.2%).
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, clusters: Vec::new() }
    }

    /// Assign one price. Non-positive or non-finite prices are ignored.
    pub fn push(&mut self, price: Price) {
        if !price.is_finite() || price <= 0.0 {
            return;
        }
        let tolerance = self.tolerance;
        match self.clusters.iter_mut().find(|c| c.accepts(price, tolerance)) {
            Some(cluster) => cluster.add(price),
            None => self.clusters.push(Cluster::new(price)),
        }
    }

    /// Clusters in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Levels from clusters with at least `min_touches` members, ascending.
    pub fn into_levels(self, min_touches: usize) -> Vec<Level> {
        let mut levels: Vec<Level> = self
            .clusters
            .into_iter()
            .filter(|c| c.count >= min_touches)
            .map(|c| Level::new(c.mean(), c.count))
            .collect();
        levels.sort_by(|a, b| a.price.total_cmp(&b.price));
        levels
    }
}

/// Cluster `points` in order and keep levels with at least `min_touches`.
pub fn cluster_levels(points: &[Price], tolerance: f64, min_touches: usize) -> Vec<Level> {
    let mut clusterer = LevelClusterer::new(tolerance);
    for &p in points {
        clusterer.push(p);
    }
    clusterer.into_levels(min_touches)
}

/// Merge ascending neighbours closer than `tolerance` until none remain.
///
/// Merged levels take the touch-weighted mean price and the summed touches.
/// A merge can pull a level toward its lower neighbour, so passes repeat
/// until a full pass makes no change.
pub fn enforce_separation(mut levels: Vec<Level>, tolerance: f64) -> Vec<Level> {
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));

    loop {
        let mut merged = false;
        let mut out: Vec<Level> = Vec::with_capacity(levels.len());

        for level in levels {
            match out.last_mut() {
                Some(last) if (level.price - last.price) / last.price < tolerance => {
                    let touches = last.touches + level.touches;
                    let weighted = last.price * last.touches as f64
                        + level.price * level.touches as f64;
                    last.price = weighted / touches as f64;
                    last.touches = touches;
                    merged = true;
                }
                _ => out.push(level),
            }
        }

        levels = out;
        if !merged {
            return levels;
        }
    }
}
