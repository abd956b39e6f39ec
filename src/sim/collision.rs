//! Trail colliders
//!
//! Turns the filtered trail segments into oriented boxes. Boxes live in a
//! pool that only grows: each frame the first N entries are rebound to the N
//! segments and the rest are switched off, so a steady trail does not churn
//! allocations.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::polyline::Segment;
use crate::facing_angle;

/// An oriented rectangle covering one trail segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderBox {
    /// World-space center (segment midpoint)
    pub center: Vec2,
    /// (length along the segment, collider width)
    pub size: Vec2,
    /// Rotation of the local X axis (radians, counter-clockwise)
    pub angle: f32,
    pub enabled: bool,
}

impl Default for ColliderBox {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: Vec2::ZERO,
            angle: 0.0,
            enabled: false,
        }
    }
}

impl ColliderBox {
    /// Fit the box onto `segment`
    pub fn bind(&mut self, segment: &Segment, width: f32) {
        self.enabled = true;
        self.center = segment.midpoint();
        self.size = Vec2::new(segment.length(), width);
        self.angle = facing_angle(segment.direction());
    }

    /// Unit vector of the local X (length) axis
    #[inline]
    pub fn axis(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Point expressed in the box's local frame
    #[inline]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        let axis = self.axis();
        let offset = point - self.center;
        Vec2::new(offset.dot(axis), offset.dot(axis.perp()))
    }

    /// Four corners, counter-clockwise from the local (-x, -y) corner
    pub fn corners(&self) -> [Vec2; 4] {
        let axis = self.axis();
        let half = self.size * 0.5;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|local| self.center + axis.rotate(local))
    }

    /// Distance from `point` to the box surface (negative inside)
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        let q = self.to_local(point).abs() - self.size * 0.5;
        q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
    }

    /// Circle overlap test (touching counts)
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.signed_distance(center) <= radius
    }
}

/// Reusable collider storage plus the number of entries in use
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColliderPool {
    boxes: Vec<ColliderBox>,
    active: usize,
}

impl ColliderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one box per segment, in order, and disable the remainder.
    ///
    /// Entry `i` always covers segment `i`; the pool grows when there are more
    /// segments than entries and never shrinks.
    pub fn bind(&mut self, segments: &[Segment], width: f32) {
        if self.boxes.len() < segments.len() {
            self.boxes.resize(segments.len(), ColliderBox::default());
        }
        for (collider, segment) in self.boxes.iter_mut().zip(segments) {
            collider.bind(segment, width);
        }
        for collider in &mut self.boxes[segments.len()..] {
            collider.enabled = false;
        }
        self.active = segments.len();
    }

    /// Number of enabled entries (always a prefix of the pool)
    pub fn active(&self) -> usize {
        self.active
    }

    /// Total entries ever created
    pub fn capacity(&self) -> usize {
        self.boxes.len()
    }

    pub fn all(&self) -> &[ColliderBox] {
        &self.boxes
    }

    /// Enabled boxes only
    pub fn enabled(&self) -> &[ColliderBox] {
        &self.boxes[..self.active]
    }

    /// Index of the first enabled box overlapping the circle
    pub fn hit_test(&self, center: Vec2, radius: f32) -> Option<usize> {
        self.enabled()
            .iter()
            .position(|collider| collider.overlaps_circle(center, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn seg(ax: f32, ay: f32, bx: f32, by: f32) -> Segment {
        Segment::new(Vec2::new(ax, ay), Vec2::new(bx, by))
    }

    #[test]
    fn test_bind_geometry() {
        let mut collider = ColliderBox::default();
        collider.bind(&seg(0.0, 0.0, 4.0, 0.0), 0.5);
        assert!(collider.enabled);
        assert_eq!(collider.center, Vec2::new(2.0, 0.0));
        assert_eq!(collider.size, Vec2::new(4.0, 0.5));
        assert!(collider.angle.abs() < 1e-6);
    }

    #[test]
    fn test_bind_right_to_left_faces_backwards() {
        let mut collider = ColliderBox::default();
        collider.bind(&seg(4.0, 0.0, 0.0, 0.0), 0.5);
        assert!((collider.angle.abs() - PI).abs() < 1e-5);
        // Length axis still spans the segment
        let axis = collider.axis();
        let to = collider.center + axis * collider.size.x * 0.5;
        assert!(to.distance(Vec2::ZERO) < 1e-5);
    }

    #[test]
    fn test_corners_of_diagonal_box() {
        let mut collider = ColliderBox::default();
        collider.bind(&seg(0.0, 0.0, 2.0, 2.0), 0.0);
        let corners = collider.corners();
        assert!(corners[0].distance(Vec2::ZERO) < 1e-5);
        assert!(corners[1].distance(Vec2::new(2.0, 2.0)) < 1e-5);
    }

    #[test]
    fn test_pool_grows_and_disables_tail() {
        let mut pool = ColliderPool::new();
        let three = [seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 2.0, 0.0), seg(2.0, 0.0, 3.0, 0.0)];
        pool.bind(&three, 0.5);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active(), 3);

        pool.bind(&three[..1], 0.5);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active(), 1);
        assert!(pool.all()[0].enabled);
        assert!(!pool.all()[1].enabled);
        assert!(!pool.all()[2].enabled);

        pool.bind(&[], 0.5);
        assert!(pool.all().iter().all(|c| !c.enabled));
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_hit_test_ignores_disabled() {
        let mut pool = ColliderPool::new();
        pool.bind(&[seg(0.0, 0.0, 4.0, 0.0), seg(0.0, 5.0, 4.0, 5.0)], 0.5);
        assert_eq!(pool.hit_test(Vec2::new(2.0, 5.3), 0.1), Some(1));
        assert_eq!(pool.hit_test(Vec2::new(2.0, 2.5), 0.5), None);

        pool.bind(&[seg(0.0, 0.0, 4.0, 0.0)], 0.5);
        assert_eq!(pool.hit_test(Vec2::new(2.0, 5.3), 0.1), None);
        assert_eq!(pool.hit_test(Vec2::new(2.0, 0.0), 0.1), Some(0));
    }

    #[test]
    fn test_signed_distance_rotated() {
        let mut collider = ColliderBox::default();
        collider.bind(&seg(0.0, 0.0, 0.0, 4.0), 1.0);
        assert!(collider.signed_distance(Vec2::new(0.0, 2.0)) < 0.0);
        assert!((collider.signed_distance(Vec2::new(1.5, 2.0)) - 1.0).abs() < 1e-5);
        assert!(collider.overlaps_circle(Vec2::new(1.5, 2.0), 1.01));
        assert!(!collider.overlaps_circle(Vec2::new(1.5, 2.0), 0.9));
    }

    proptest! {
        #[test]
        fn prop_exactly_n_enabled(before in 0usize..12, after in 0usize..12) {
            let segments: Vec<_> = (0..before.max(after))
                .map(|i| seg(i as f32, 0.0, i as f32 + 1.0, 0.5))
                .collect();
            let mut pool = ColliderPool::new();
            pool.bind(&segments[..before], 0.5);
            pool.bind(&segments[..after], 0.5);

            prop_assert_eq!(pool.capacity(), before.max(after));
            prop_assert_eq!(pool.active(), after);
            for (i, collider) in pool.all().iter().enumerate() {
                prop_assert_eq!(collider.enabled, i < after);
            }
        }
    }
}
