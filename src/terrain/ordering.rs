//! Angular ordering of region links

use crate::geometry::Point;
use crate::map::Map;

/// Sort every region's neighbors and corners by angle around the site
///
/// Angles are `atan2` measured from the point one unit above the site, in
/// ascending order. The sort is stable so equal angles keep their order.
pub(crate) fn sort_clockwise(map: &mut Map) {
    for id in 0..map.regions.len() {
        let site = map.regions[id].point;
        let zero = Point::new(site.x, site.y + 1.0);

        let mut neighbors = std::mem::take(&mut map.regions[id].neighbors);
        neighbors.sort_by(|&a, &b| {
            angle(zero, map.regions[a].point).total_cmp(&angle(zero, map.regions[b].point))
        });

        let mut corners = std::mem::take(&mut map.regions[id].corners);
        corners.sort_by(|&a, &b| {
            angle(zero, map.corners[a].point).total_cmp(&angle(zero, map.corners[b].point))
        });

        let region = &mut map.regions[id];
        region.neighbors = neighbors;
        region.corners = corners;
    }
}

fn angle(zero: Point, p: Point) -> f64 {
    (p.y - zero.y).atan2(p.x - zero.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::graph_only;

    #[test]
    fn test_links_sorted_by_angle() {
        let mut map = graph_only(64, 42);
        let before: Vec<Vec<usize>> = map.regions.iter().map(|r| r.neighbors.clone()).collect();
        sort_clockwise(&mut map);

        for region in &map.regions {
            let zero = Point::new(region.point.x, region.point.y + 1.0);
            let angles: Vec<f64> = region
                .corners
                .iter()
                .map(|&c| angle(zero, map.corners[c].point))
                .collect();
            assert!(angles.windows(2).all(|w| w[0] <= w[1]));

            let angles: Vec<f64> = region
                .neighbors
                .iter()
                .map(|&n| angle(zero, map.regions[n].point))
                .collect();
            assert!(angles.windows(2).all(|w| w[0] <= w[1]));

            // Same members, new order
            let mut sorted = region.neighbors.clone();
            let mut old = before[region.index].clone();
            sorted.sort_unstable();
            old.sort_unstable();
            assert_eq!(sorted, old);
        }
    }

    #[test]
    fn test_angle_reference() {
        let zero = Point::new(0.0, 1.0);
        assert!(angle(zero, Point::new(1.0, 1.0)).abs() < 1e-12);
        assert!((angle(zero, Point::new(-1.0, 1.0)) - std::f64::consts::PI).abs() < 1e-12);
    }
}
