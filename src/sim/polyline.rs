//! Trail polylines
//!
//! The drawn trail is one or more ordered point sequences. The current line
//! grows as the root moves; a respawn starts a new one. Each line caches its
//! bounds so consumers can skip lines that cannot touch their window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;

/// Two consecutive samples of a polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        self.from.lerp(self.to, 0.5)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.to - self.from
    }
}

/// An ordered sequence of trail samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Vec2>,
    bounds: Option<Aabb>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut line = Self::new();
        for point in points {
            line.push(point);
        }
        line
    }

    /// Append a sample unconditionally
    pub fn push(&mut self, point: Vec2) {
        match &mut self.bounds {
            Some(bounds) => bounds.encapsulate(point),
            None => self.bounds = Some(Aabb::from_point(point)),
        }
        self.points.push(point);
    }

    /// Append a sample if it is at least `interval` away from the last one.
    /// Returns whether the point was recorded.
    pub fn push_sample(&mut self, point: Vec2, interval: f32) -> bool {
        if let Some(last) = self.points.last() {
            if last.distance(point) < interval {
                return false;
            }
        }
        self.push(point);
        true
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounds of all samples (`None` while empty)
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Consecutive point pairs in order
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }
}

/// Read-only view over zero or more polylines
pub trait PolylineSource {
    fn polylines(&self) -> &[Polyline];

    /// Lines whose cached bounds touch `region`, in source order
    fn overlapping<'a>(&'a self, region: &'a Aabb) -> impl Iterator<Item = &'a Polyline> + 'a {
        self.polylines()
            .iter()
            .filter(move |line| line.bounds().is_some_and(|b| b.intersects(region)))
    }

    /// Union of every line's bounds
    fn whole_bounds(&self) -> Option<Aabb> {
        self.polylines()
            .iter()
            .filter_map(Polyline::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl PolylineSource for Polyline {
    fn polylines(&self) -> &[Polyline] {
        std::slice::from_ref(self)
    }
}

impl PolylineSource for [Polyline] {
    fn polylines(&self) -> &[Polyline] {
        self
    }
}

impl PolylineSource for Vec<Polyline> {
    fn polylines(&self) -> &[Polyline] {
        self
    }
}

/// Every line drawn so far; the last one is the line currently growing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineSet {
    lines: Vec<Polyline>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new line at `origin` (on spawn and respawn)
    pub fn begin_line(&mut self, origin: Vec2) {
        self.lines.push(Polyline::from_points([origin]));
    }

    /// Record a root sample on the current line, starting one if needed
    pub fn record(&mut self, point: Vec2, interval: f32) -> bool {
        match self.lines.last_mut() {
            Some(line) => line.push_sample(point, interval),
            None => {
                self.begin_line(point);
                true
            }
        }
    }

    pub fn current(&self) -> Option<&Polyline> {
        self.lines.last()
    }

    pub fn line(&self, index: usize) -> Option<&Polyline> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl PolylineSource for LineSet {
    fn polylines(&self) -> &[Polyline] {
        &self.lines
    }
}
