//! Graph construction from raw dual edges
//!
//! Turns the provider's loose segments into the linked region/corner/edge
//! arenas. Voronoi endpoints produced separately for neighboring cells are
//! canonicalized into one shared corner each.

use std::collections::HashMap;

use crate::generation::DualEdge;
use crate::geometry::{interpolate, Bounds, Point, PointKey};
use crate::graph::{push_unique, Corner, CornerFlags, CornerId, Edge, Region, RegionId};

/// Squared distance under which two Voronoi endpoints are the same corner
const CORNER_EPSILON: f64 = 1e-6;

/// Linked arenas produced by [`build_graph`]
#[derive(Debug, Clone, Default)]
pub struct GraphParts {
    pub regions: Vec<Region>,
    pub corners: Vec<Corner>,
    pub edges: Vec<Edge>,
}

/// Corner canonicalization table bucketed by `floor(x)`
struct CornerMap {
    buckets: HashMap<i64, Vec<CornerId>>,
    bounds: Bounds,
}

impl CornerMap {
    fn new(bounds: Bounds) -> Self {
        Self {
            buckets: HashMap::new(),
            bounds,
        }
    }

    /// Find the corner at `point` (within epsilon) or create it
    fn make_corner(&mut self, point: Option<Point>, corners: &mut Vec<Corner>) -> Option<CornerId> {
        let point = point?;
        let bucket = point.x.floor() as i64;

        for b in bucket - 1..=bucket + 1 {
            if let Some(ids) = self.buckets.get(&b) {
                for &id in ids {
                    if corners[id].point.distance_squared(point) < CORNER_EPSILON {
                        return Some(id);
                    }
                }
            }
        }

        let id = corners.len();
        let mut corner = Corner::new(id, point);
        corner.set_flag(CornerFlags::BORDER, self.bounds.on_border(point));
        corners.push(corner);
        self.buckets.entry(bucket).or_default().push(id);
        Some(id)
    }
}

/// Build the linked graph
///
/// # Arguments
///
/// * `sites` - One point per region, in region index order
/// * `dual` - Raw edges from a [`crate::generation::DualGraphProvider`]
/// * `bounds` - Map square, used to flag border corners
///
/// A Delaunay endpoint that matches no site is a provider boundary artifact:
/// the links it would have produced are skipped without error.
pub fn build_graph(sites: &[Point], dual: &[DualEdge], bounds: Bounds) -> GraphParts {
    let mut parts = GraphParts {
        regions: Vec::with_capacity(sites.len()),
        corners: Vec::new(),
        edges: Vec::with_capacity(dual.len()),
    };

    let mut lookup: HashMap<PointKey, RegionId> = HashMap::with_capacity(sites.len());
    for (index, &point) in sites.iter().enumerate() {
        parts.regions.push(Region::new(index, point));
        lookup.insert(PointKey::from(point), index);
    }

    let mut corner_map = CornerMap::new(bounds);
    let mut skipped = 0usize;

    for raw in dual {
        let index = parts.edges.len();
        let mut edge = Edge::new(index);

        if let [Some(p0), Some(p1)] = raw.voronoi {
            edge.midpoint = Some(interpolate(p0, p1, 0.5));
        }
        edge.v0 = corner_map.make_corner(raw.voronoi[0], &mut parts.corners);
        edge.v1 = corner_map.make_corner(raw.voronoi[1], &mut parts.corners);

        let resolve = |p: Option<Point>| p.and_then(|p| lookup.get(&PointKey::from(p)).copied());
        edge.d0 = resolve(raw.delaunay[0]);
        edge.d1 = resolve(raw.delaunay[1]);
        if edge.d0.is_none() || edge.d1.is_none() {
            skipped += 1;
        }

        link_edge(&mut parts, &edge);
        parts.edges.push(edge);
    }

    if skipped > 0 {
        log::trace!("{} dual edges had unresolved Delaunay endpoints", skipped);
    }

    parts
}

/// Wire every bidirectional link implied by one edge
fn link_edge(parts: &mut GraphParts, edge: &Edge) {
    let regions = [edge.d0, edge.d1];
    let corners = [edge.v0, edge.v1];

    for r in regions.iter().flatten() {
        push_unique(&mut parts.regions[*r].borders, edge.index);
    }
    for c in corners.iter().flatten() {
        push_unique(&mut parts.corners[*c].protrudes, edge.index);
    }

    if let (Some(d0), Some(d1)) = (edge.d0, edge.d1) {
        if d0 != d1 {
            push_unique(&mut parts.regions[d0].neighbors, d1);
            push_unique(&mut parts.regions[d1].neighbors, d0);
        }
    }

    if let (Some(v0), Some(v1)) = (edge.v0, edge.v1) {
        if v0 != v1 {
            push_unique(&mut parts.corners[v0].adjacent, v1);
            push_unique(&mut parts.corners[v1].adjacent, v0);
        }
    }

    for r in regions.iter().flatten() {
        for c in corners.iter().flatten() {
            push_unique(&mut parts.regions[*r].corners, *c);
            push_unique(&mut parts.corners[*c].touches, *r);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_hexagon_points, DualGraphProvider, VoronoiceProvider};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_graph() -> GraphParts {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sites = generate_hexagon_points(12, 48.0, &mut rng);
        let bounds = Bounds::new(48.0);
        let dual = VoronoiceProvider.build_dual(&sites, bounds).unwrap();
        build_graph(&sites, &dual, bounds)
    }

    #[test]
    fn test_corner_canonicalization() {
        let bounds = Bounds::new(10.0);
        let mut corners = Vec::new();
        let mut map = CornerMap::new(bounds);

        let a = map.make_corner(Some(Point::new(4.9999, 3.0)), &mut corners);
        let b = map.make_corner(Some(Point::new(5.0001, 3.0)), &mut corners);
        let c = map.make_corner(Some(Point::new(5.1, 3.0)), &mut corners);
        let none = map.make_corner(None, &mut corners);

        assert_eq!(a, Some(0));
        assert_eq!(b, Some(0), "near-duplicate across a bucket boundary must merge");
        assert_eq!(c, Some(1));
        assert_eq!(none, None);
        assert_eq!(corners.len(), 2);
    }

    #[test]
    fn test_border_corner_flag() {
        let bounds = Bounds::new(10.0);
        let mut corners = Vec::new();
        let mut map = CornerMap::new(bounds);

        map.make_corner(Some(Point::new(0.0, 4.0)), &mut corners);
        map.make_corner(Some(Point::new(4.0, 4.0)), &mut corners);
        map.make_corner(Some(Point::new(4.0, 10.0)), &mut corners);

        assert!(corners[0].is_border());
        assert!(!corners[1].is_border());
        assert!(corners[2].is_border());
    }

    #[test]
    fn test_unknown_site_is_skipped() {
        let sites = vec![Point::new(2.0, 2.0), Point::new(6.0, 2.0)];
        let dual = vec![
            DualEdge {
                voronoi: [Some(Point::new(4.0, 0.0)), Some(Point::new(4.0, 5.0))],
                delaunay: [Some(sites[0]), Some(sites[1])],
            },
            DualEdge {
                voronoi: [Some(Point::new(4.0, 5.0)), Some(Point::new(1.0, 8.0))],
                delaunay: [Some(sites[0]), Some(Point::new(99.0, 99.0))],
            },
        ];
        let parts = build_graph(&sites, &dual, Bounds::new(8.0));

        assert_eq!(parts.edges.len(), 2);
        assert_eq!(parts.edges[1].d1, None);
        assert_eq!(parts.regions[0].neighbors, vec![1]);
        assert_eq!(parts.regions[0].borders, vec![0, 1]);
        assert_eq!(parts.corners.len(), 3, "shared endpoint is one corner");
        assert_eq!(parts.corners[1].adjacent, vec![0, 2]);
        assert_eq!(parts.edges[0].midpoint, Some(Point::new(4.0, 2.5)));
    }

    #[test]
    fn test_links_are_symmetric_and_unique() {
        let parts = sample_graph();
        assert_eq!(parts.regions.len(), 144);

        for region in &parts.regions {
            let mut sorted = region.neighbors.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), region.neighbors.len());

            for &n in &region.neighbors {
                assert!(parts.regions[n].neighbors.contains(&region.index));
            }
            for &c in &region.corners {
                assert!(parts.corners[c].touches.contains(&region.index));
            }
            assert!(region.corners.len() >= 3, "region {} is not a polygon", region.index);
        }

        for corner in &parts.corners {
            for &a in &corner.adjacent {
                assert!(parts.corners[a].adjacent.contains(&corner.index));
            }
        }
    }

    #[test]
    fn test_no_duplicate_corners() {
        let parts = sample_graph();
        for (i, a) in parts.corners.iter().enumerate() {
            for b in &parts.corners[i + 1..] {
                assert!(a.point.distance_squared(b.point) >= CORNER_EPSILON);
            }
        }
    }

    #[test]
    fn test_border_corners_exist() {
        let parts = sample_graph();
        assert!(parts.corners.iter().any(|c| c.is_border()));
        assert!(parts.corners.iter().any(|c| !c.is_border()));
    }
}
