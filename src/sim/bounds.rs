//! Axis-aligned bounding regions
//!
//! Trail windows are described as center + size (a square of fixed size
//! around a moving root, or a fraction of the whole drawn area around the same
//! center) but stored as corners, so growing a box sample by sample never
//! drifts away from the points it was grown from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centered on `center`
    pub fn new(center: Vec2, size: Vec2) -> Self {
        let extents = size * 0.5;
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Square box of edge `size` centered on `center`
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::new(center, Vec2::splat(size))
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Degenerate box at a single point
    pub fn from_point(point: Vec2) -> Self {
        Self::from_min_max(point, point)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive containment test (points on the border are inside)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Inclusive overlap test
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Grow to include `point`
    pub fn encapsulate(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Self::from_min_max(self.min.min(other.min), self.max.max(other.max))
    }

    /// Same center, width and height scaled by `fraction`.
    /// A fraction of 1 returns the box unchanged.
    pub fn shrunk(&self, fraction: f32) -> Aabb {
        if fraction >= 1.0 {
            return *self;
        }
        Self::new(self.center(), self.size() * fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let aabb = Aabb::square(Vec2::ZERO, 2.0);
        assert!(aabb.contains(Vec2::new(1.0, 1.0)));
        assert!(aabb.contains(Vec2::new(-1.0, 0.0)));
        assert!(!aabb.contains(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn test_encapsulate() {
        let mut aabb = Aabb::from_point(Vec2::new(1.0, 1.0));
        aabb.encapsulate(Vec2::new(-1.0, 3.0));
        assert_eq!(aabb.min, Vec2::new(-1.0, 1.0));
        assert_eq!(aabb.max, Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::square(Vec2::ZERO, 2.0);
        let b = Aabb::square(Vec2::new(2.0, 0.0), 2.0);
        let c = Aabb::square(Vec2::new(5.0, 0.0), 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_shrunk_keeps_center() {
        let aabb = Aabb::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0));
        let half = aabb.shrunk(0.5);
        assert_eq!(half.center(), aabb.center());
        assert_eq!(half.size(), Vec2::new(5.0, 2.0));
        assert_eq!(aabb.shrunk(0.0).size(), Vec2::ZERO);
        assert_eq!(aabb.shrunk(1.0), aabb);
    }
}
