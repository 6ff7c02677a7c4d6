//! Island map: generation pipeline and queries

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::IslandParameters;
use crate::error::{MapError, Result};
use crate::generation::{generate_graph, DualGraphProvider, GraphParts, VoronoiceProvider};
use crate::geometry::{Bounds, Point};
use crate::graph::{Canyon, Corner, CornerId, Edge, EdgeId, Lake, Region, RegionId, River};
use crate::terrain::{self, carve, downslope, elevation, lakes, moisture, ordering, water};
use crate::terrain::{IslandShape, PerlinIslandShape};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated island
///
/// Regions, corners and edges live in arenas and refer to each other by
/// index. A map is built once by one of the `generate*` constructors (or
/// loaded from a tag tree) and is read-only afterwards.
///
/// # Examples
///
/// ```
/// use island_mapgen::*;
///
/// let params = IslandParametersBuilder::new()
///     .seed(42)
///     .size(64)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let map = Map::generate(params).unwrap();
/// assert_eq!(map.region_count(), 256);
///
/// let id = map.nearest_region(Point::new(32.0, 32.0)).unwrap();
/// println!("center biome: {:?}", map.regions()[id].biome);
/// ```
#[derive(Debug, Clone)]
pub struct Map {
    pub(crate) params: IslandParameters,
    pub(crate) regions: Vec<Region>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) rivers: Vec<River>,
    pub(crate) lakes: Vec<Lake>,
    pub(crate) canyons: Vec<Canyon>,

    /// Nearest-site index, rebuilt after generation and loading
    #[cfg(feature = "spatial-index")]
    pub(crate) spatial_index: Option<SpatialIndex>,
}

/// Run one pipeline stage and log how long it took
fn timed<T>(stage: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    log::debug!("{} took {:?}", stage, start.elapsed());
    out
}

impl Map {
    /// Generate an island with the default Perlin island shape
    ///
    /// The shape is seeded with `params.shape_seed`.
    pub fn generate(params: IslandParameters) -> Result<Self> {
        let shape = PerlinIslandShape::new(params.shape_seed, f64::from(params.size));
        Self::generate_with_shape(params, &shape)
    }

    /// Generate an island with a custom land mask
    ///
    /// # Example
    ///
    /// ```
    /// use island_mapgen::*;
    ///
    /// let params = IslandParametersBuilder::new().seed(1).size(64).unwrap().build().unwrap();
    /// let disk = |p: Point| p.distance(Point::splat(32.0)) < 20.0;
    /// let map = Map::generate_with_shape(params, &disk).unwrap();
    /// assert!(map.lakes().is_empty());
    /// ```
    pub fn generate_with_shape<S>(params: IslandParameters, shape: &S) -> Result<Self>
    where
        S: IslandShape + ?Sized,
    {
        Self::generate_with(params, shape, &VoronoiceProvider)
    }

    /// Generate an island with a custom land mask and dual graph provider
    ///
    /// Every stochastic stage draws from one random stream seeded with
    /// `params.seed`, so the same inputs always yield the same map.
    pub fn generate_with<S, P>(params: IslandParameters, shape: &S, provider: &P) -> Result<Self>
    where
        S: IslandShape + ?Sized,
        P: DualGraphProvider + ?Sized,
    {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let parts = timed("graph", || generate_graph(&params, provider, &mut rng))?;
        let mut map = Self::from_parts(params, parts);

        timed("corner elevation", || elevation::assign_corner_elevations(&mut map, shape));
        timed("water", || water::assign_ocean_coast_and_land(&mut map));
        timed("redistribution", || elevation::redistribute_elevations(&mut map));
        elevation::flatten_water_corners(&mut map);
        elevation::assign_region_elevations(&mut map);
        timed("lakes", || lakes::build_lakes(&mut map));
        downslope::calculate_downslopes(&mut map);

        timed("volcano", || carve::create_volcano(&mut map, &mut rng));
        timed("valleys", || carve::create_valleys(&mut map, &mut rng));
        let canyons = timed("canyons", || carve::create_canyons(&mut map, &mut rng));
        map.canyons = canyons;
        downslope::calculate_downslopes(&mut map);

        timed("rivers", || carve::create_rivers(&mut map, &mut rng));
        timed("noise", || {
            carve::assign_sloped_noise(&mut map, &mut rng);
            carve::assign_hilly_noise(&mut map, &mut rng);
        });
        downslope::calculate_downslopes(&mut map);

        timed("moisture", || {
            moisture::assign_moisture(&mut map);
            moisture::redistribute_moisture(&mut map);
            moisture::assign_corner_moisture(&mut map);
        });
        ordering::sort_clockwise(&mut map);
        timed("biomes", || terrain::assign_biomes(&mut map, &mut rng));

        map.rebuild_spatial_index();

        log::info!(
            "generated island {} ({} regions, {} rivers, {} lakes, {} canyons) in {:?}",
            map.params.seed,
            map.regions.len(),
            map.rivers.len(),
            map.lakes.len(),
            map.canyons.len(),
            start.elapsed()
        );
        Ok(map)
    }

    /// Wrap linked arenas into a map with no terrain
    pub(crate) fn from_parts(params: IslandParameters, parts: GraphParts) -> Self {
        Self {
            params,
            regions: parts.regions,
            corners: parts.corners,
            edges: parts.edges,
            rivers: Vec::new(),
            lakes: Vec::new(),
            canyons: Vec::new(),
            #[cfg(feature = "spatial-index")]
            spatial_index: None,
        }
    }

    pub(crate) fn rebuild_spatial_index(&mut self) {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index = if self.regions.is_empty() {
                None
            } else {
                let sites: Vec<Point> = self.regions.iter().map(|r| r.point).collect();
                Some(SpatialIndex::new(&sites))
            };
        }
    }

    /// Parameters this map was generated with
    #[inline]
    pub fn params(&self) -> &IslandParameters {
        &self.params
    }

    /// The map square
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(f64::from(self.params.size))
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Rivers in the order they were carved
    #[inline]
    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    /// Lakes in discovery order
    #[inline]
    pub fn lakes(&self) -> &[Lake] {
        &self.lakes
    }

    #[inline]
    pub fn canyons(&self) -> &[Canyon] {
        &self.canyons
    }

    /// Get a region by index, `None` when out of range
    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    #[inline]
    pub fn corner(&self, id: CornerId) -> Option<&Corner> {
        self.corners.get(id)
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Region whose site is nearest to `point`
    ///
    /// Uses the KD-tree when the `spatial-index` feature is enabled, a linear
    /// scan otherwise.
    ///
    /// # Errors
    ///
    /// Returns `EmptyGraph` if the map has no regions.
    pub fn nearest_region(&self, point: Point) -> Result<RegionId> {
        if self.regions.is_empty() {
            return Err(MapError::EmptyGraph);
        }
        #[cfg(feature = "spatial-index")]
        if let Some(index) = &self.spatial_index {
            return Ok(index.find_nearest(point));
        }
        Ok(self.scan_nearest_region(point))
    }

    fn scan_nearest_region(&self, point: Point) -> RegionId {
        let mut best = 0;
        let mut best_distance = f64::MAX;
        for region in &self.regions {
            let d = point.distance_squared(region.point);
            if d < best_distance {
                best_distance = d;
                best = region.index;
            }
        }
        best
    }

    /// Region containing a world point
    ///
    /// The point is first wrapped into the map square. The lattice position
    /// gives a first guess, which is refined over its neighbors and their
    /// neighbors unless the point falls inside the guess's inscribed circle.
    ///
    /// # Errors
    ///
    /// Returns `EmptyGraph` if the map has no regions.
    pub fn containing_region(&self, point: Point) -> Result<RegionId> {
        if self.regions.is_empty() {
            return Err(MapError::EmptyGraph);
        }

        let p = self.bounds().wrap(point);
        let grid = self.params.grid_size();
        let cell = self.params.cell_size();
        let last = grid.saturating_sub(1);
        let col = ((p.x / cell).floor() as usize).min(last);
        let row = ((p.y / cell).floor() as usize).min(last);
        let guess = (grid * col + row).min(self.regions.len() - 1);

        let origin = &self.regions[guess];
        let inradius_sq = origin
            .borders
            .iter()
            .find_map(|&e| self.edges[e].midpoint)
            .map(|m| 0.75 * m.distance_squared(origin.point))
            .unwrap_or(0.0);

        let mut best = guess;
        let mut best_distance = p.distance_squared(origin.point);
        if best_distance < inradius_sq {
            return Ok(best);
        }

        for &n in &origin.neighbors {
            let candidates = std::iter::once(n).chain(self.regions[n].neighbors.iter().copied());
            for c in candidates {
                let d = p.distance_squared(self.regions[c].point);
                if d < best_distance {
                    best_distance = d;
                    best = c;
                    if d < inradius_sq {
                        return Ok(best);
                    }
                }
            }
        }
        Ok(best)
    }

    /// Corner nearest to `point` by linear scan
    ///
    /// # Errors
    ///
    /// Returns `EmptyGraph` if the map has no corners.
    pub fn nearest_corner(&self, point: Point) -> Result<CornerId> {
        let mut best = None;
        let mut best_distance = f64::MAX;
        for corner in &self.corners {
            let d = point.distance_squared(corner.point);
            if d < best_distance {
                best_distance = d;
                best = Some(corner.index);
            }
        }
        best.ok_or(MapError::EmptyGraph)
    }

    /// Edge separating two regions
    pub fn edge_between_regions(&self, a: RegionId, b: RegionId) -> Option<EdgeId> {
        self.regions
            .get(a)?
            .borders
            .iter()
            .copied()
            .find(|&e| self.edges[e].joins_regions(a, b))
    }

    /// Edge running between two corners
    pub fn edge_between_corners(&self, a: CornerId, b: CornerId) -> Option<EdgeId> {
        self.corners
            .get(a)?
            .protrudes
            .iter()
            .copied()
            .find(|&e| self.edges[e].joins_corners(a, b))
    }

    /// Regions at or above an elevation, in index order
    pub fn regions_above(&self, elevation: f64) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|r| r.elevation >= elevation)
            .map(|r| r.index)
            .collect()
    }

    /// Lake a region belongs to
    pub fn lake_containing(&self, region: RegionId) -> Option<&Lake> {
        self.lakes.iter().find(|lake| lake.contains(region))
    }

    pub(crate) fn lake_index_of(&self, region: RegionId) -> Option<usize> {
        self.lakes.iter().position(|lake| lake.contains(region))
    }

    /// Coarse elevation band of a region: `-1` for ocean, else `floor(10 * e)`
    pub fn elevation_bucket(&self, region: RegionId) -> Option<i32> {
        let region = self.regions.get(region)?;
        if region.is_ocean() {
            Some(-1)
        } else {
            Some((region.elevation * 10.0).floor() as i32)
        }
    }

    /// Regions reachable within `hops` neighbor steps, in breadth-first order
    ///
    /// Returns an empty list if `center` is out of range.
    pub fn regions_within_hops(&self, center: RegionId, hops: usize) -> Vec<RegionId> {
        if center >= self.regions.len() {
            return Vec::new();
        }

        let mut visited = vec![false; self.regions.len()];
        let mut found = vec![center];
        let mut frontier = vec![center];
        visited[center] = true;

        for _ in 0..hops {
            let mut next = Vec::new();
            for &id in &frontier {
                for &n in &self.regions[id].neighbors {
                    if !visited[n] {
                        visited[n] = true;
                        next.push(n);
                    }
                }
            }
            found.extend_from_slice(&next);
            frontier = next;
        }

        found
    }
}
