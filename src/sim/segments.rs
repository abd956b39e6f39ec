//! Trail segment filter
//!
//! Picks the segments of the drawn trail that need colliders this frame:
//! those touching the outer region around the root, minus the ones ending
//! inside the exclusion circle (the head already covers those).

use glam::Vec2;

use super::bounds::Aabb;
use super::polyline::{PolylineSource, Segment};

/// Collect relevant segments into `out` (cleared first).
///
/// A segment is kept when at least one endpoint lies inside `outer` and its
/// `to` point is strictly farther than `exclusion_radius` from `root`.
/// Output follows source line order, then point order; the collider pool
/// relies on that for stable indices between frames.
pub fn collect_segments<S: PolylineSource + ?Sized>(
    source: &S,
    root: Vec2,
    exclusion_radius: f32,
    outer: &Aabb,
    out: &mut Vec<Segment>,
) {
    out.clear();
    for line in source.overlapping(outer) {
        out.extend(
            line.segments()
                .filter(|seg| is_relevant(seg, root, exclusion_radius, outer)),
        );
    }
}

#[inline]
fn is_relevant(seg: &Segment, root: Vec2, exclusion_radius: f32, outer: &Aabb) -> bool {
    (outer.contains(seg.from) || outer.contains(seg.to))
        && root.distance(seg.to) > exclusion_radius
}
