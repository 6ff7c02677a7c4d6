//! Voronoi/Delaunay dual graph provider
//!
//! The graph builder consumes raw dual edges through [`DualGraphProvider`]. The
//! default [`VoronoiceProvider`] triangulates the sites with `voronoice` and
//! derives every Voronoi segment from the circumcenters of the two triangles
//! sharing a Delaunay edge, clipped to the map square.

use voronoice::{BoundingBox, VoronoiBuilder};

use crate::error::{MapError, Result};
use crate::geometry::{Bounds, Point};

/// Marker for a hull half-edge without a twin
const EMPTY: usize = usize::MAX;

/// Distance under which a clipped coordinate is snapped onto the square
const SNAP_EPSILON: f64 = 1e-9;

/// One raw edge of the dual graph
///
/// The Voronoi side is absent when the segment lies entirely outside the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualEdge {
    /// Voronoi segment endpoints (future corners)
    pub voronoi: [Option<Point>; 2],
    /// Delaunay segment endpoints (the two sites)
    pub delaunay: [Option<Point>; 2],
}

/// Computes the Voronoi/Delaunay dual of a set of sites
pub trait DualGraphProvider {
    /// Build every dual edge of `sites` clipped to `bounds`
    fn build_dual(&self, sites: &[Point], bounds: Bounds) -> Result<Vec<DualEdge>>;
}

/// Dual graph provider backed by the `voronoice` Delaunay triangulation
#[derive(Debug, Clone, Copy, Default)]
pub struct VoronoiceProvider;

impl DualGraphProvider for VoronoiceProvider {
    fn build_dual(&self, sites: &[Point], bounds: Bounds) -> Result<Vec<DualEdge>> {
        if sites.len() < 3 {
            return Err(MapError::GenerationFailed(format!(
                "need at least 3 sites to triangulate (got {})",
                sites.len()
            )));
        }

        // voronoice works on a box centered at the origin
        let offset = bounds.center();
        let centered: Vec<voronoice::Point> = sites
            .iter()
            .map(|p| voronoice::Point {
                x: p.x - offset.x,
                y: p.y - offset.y,
            })
            .collect();

        let voronoi = VoronoiBuilder::default()
            .set_sites(centered)
            .set_bounding_box(BoundingBox::new_centered(bounds.size, bounds.size))
            .set_lloyd_relaxation_iterations(0)
            .build()
            .ok_or_else(|| {
                MapError::GenerationFailed("sites could not be triangulated".to_string())
            })?;

        let triangulation = voronoi.triangulation();
        let triangles = &triangulation.triangles;
        let halfedges = &triangulation.halfedges;

        let circumcenters: Vec<Option<Point>> = (0..triangles.len() / 3)
            .map(|t| {
                circumcenter(
                    sites[triangles[3 * t]],
                    sites[triangles[3 * t + 1]],
                    sites[triangles[3 * t + 2]],
                )
            })
            .collect();

        let mut edges = Vec::with_capacity(triangles.len() / 2 + 1);
        for e in 0..triangles.len() {
            let twin = halfedges[e];
            if twin != EMPTY && twin < e {
                continue;
            }

            let a = sites[triangles[e]];
            let b = sites[triangles[next_halfedge(e)]];

            let segment = match circumcenters[e / 3] {
                Some(start) if twin != EMPTY => circumcenters[twin / 3]
                    .and_then(|end| clip(start, end - start, 1.0, bounds)),
                Some(start) => {
                    let c = sites[triangles[next_halfedge(next_halfedge(e))]];
                    let mut normal = (b - a).perp();
                    if normal.dot(c - a) > 0.0 {
                        normal = -normal;
                    }
                    // Long enough to leave the square from anywhere inside it
                    let reach = (bounds.size * 4.0 + (start - bounds.center()).length())
                        / normal.length();
                    clip(start, normal, reach, bounds)
                }
                None => None,
            };

            let voronoi = match segment {
                Some((p0, p1)) => [Some(p0), Some(p1)],
                None => [None, None],
            };
            edges.push(DualEdge {
                voronoi,
                delaunay: [Some(a), Some(b)],
            });
        }

        log::trace!(
            "dual graph: {} sites, {} triangles, {} edges",
            sites.len(),
            triangles.len() / 3,
            edges.len()
        );
        Ok(edges)
    }
}

/// Next half-edge within the same triangle
#[inline]
fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Circumcenter of a triangle, `None` for a degenerate one
fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let d = b - a;
    let e = c - a;
    let bl = d.length_squared();
    let cl = e.length_squared();
    let det = d.x * e.y - d.y * e.x;
    if det.abs() < f64::EPSILON {
        return None;
    }
    let k = 0.5 / det;
    let center = Point::new(a.x + (e.y * bl - d.y * cl) * k, a.y + (d.x * cl - e.x * bl) * k);
    center.is_finite().then_some(center)
}

/// Clip `origin + t * dir`, `t ∈ [0, t_max]`, to the map square (Liang–Barsky)
///
/// Returns `None` when no part of the segment is inside the square. Endpoints
/// that land on a side are snapped onto it exactly.
pub(crate) fn clip(origin: Point, dir: Point, t_max: f64, bounds: Bounds) -> Option<(Point, Point)> {
    let mut t0 = 0.0_f64;
    let mut t1 = t_max;
    let checks = [
        (-dir.x, origin.x),
        (dir.x, bounds.size - origin.x),
        (-dir.y, origin.y),
        (dir.y, bounds.size - origin.y),
    ];

    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let p0 = snap(origin + dir * t0, bounds);
    let p1 = snap(origin + dir * t1, bounds);
    Some((p0, p1))
}

fn snap(p: Point, bounds: Bounds) -> Point {
    let snap_axis = |v: f64| {
        if v.abs() < SNAP_EPSILON {
            0.0
        } else if (v - bounds.size).abs() < SNAP_EPSILON {
            bounds.size
        } else {
            v
        }
    };
    Point::new(snap_axis(p.x), snap_axis(p.y))
}
