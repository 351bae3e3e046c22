use crate::Point;

/// Squared segment length below which a segment is treated as a point.
const DEGENERATE_SEGMENT_SQ: f64 = 1e-9;

/// Number of a player's own most recent segments ignored when checking its
/// head. Covers the segment ending at the head and the two before it.
pub const SELF_EXCLUSION_SEGMENTS: u32 = 3;

/// Squared distance from `p` to the segment `a`-`b`.
pub fn point_to_segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < DEGENERATE_SEGMENT_SQ {
        return p.distance_sq(a);
    }

    // Project onto the segment, clamped to its endpoints
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_sq(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Distance from `p` to the segment `a`-`b`.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    point_to_segment_distance_sq(p, a, b).sqrt()
}

/// Whether a position lies outside `[0, width) x [0, height)`.
pub fn out_of_bounds(p: Point, width: f64, height: f64) -> bool {
    p.x < 0.0 || p.x >= width || p.y < 0.0 || p.y >= height
}
