//! Pixel-space geometry: rectangles and closest-point queries
//!
//! Pure functions only; nothing here knows about ships or platforms.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::vector::Vector2D;

/// Axis-aligned rectangle in pixel coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` with its top-left corner at `position`
    pub const fn at(position: IVec2, size: IVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    /// First column past the right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// First row past the bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Center pixel (integer division, like the sprite it describes)
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Corner pixels in clockwise screen order, starting top-left
    pub fn vertices(&self) -> [IVec2; 4] {
        let (r, b) = (self.x + self.width - 1, self.y + self.height - 1);
        [
            IVec2::new(self.x, self.y),
            IVec2::new(r, self.y),
            IVec2::new(r, b),
            IVec2::new(self.x, b),
        ]
    }
}

/// Euclidean distance between two pixels
#[inline]
pub fn distance(a: IVec2, b: IVec2) -> f64 {
    Vector2D::between(a, b).norm()
}

/// Where a point projects onto a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest pixel on the segment
    pub point: IVec2,
    /// Signed distance along the segment from its start
    pub factor: f64,
    /// Segment length
    pub length: f64,
    /// Unit direction from start to end
    pub direction: Vector2D,
}

impl SegmentProjection {
    /// True when the projection fell outside the segment and was clamped
    /// onto one of its endpoints
    #[inline]
    pub fn at_vertex(&self) -> bool {
        self.factor < 0.0 || self.factor > self.length
    }
}

/// Project `c` onto the segment `p -> q`
///
/// Points strictly inside the segment are truncated to whole pixels.
pub fn project_onto_segment(p: IVec2, q: IVec2, c: IVec2) -> SegmentProjection {
    let pq = Vector2D::between(q, p);
    let length = pq.norm();
    let direction = pq.to_length(1.0);
    let factor = direction.dot(Vector2D::between(c, p));

    let point = if factor < 0.0 {
        p
    } else if factor > length {
        q
    } else {
        p + (direction * factor).truncate_to_pixels()
    };

    SegmentProjection {
        point,
        factor,
        length,
        direction,
    }
}

/// Closest boundary feature of a polygon relative to some point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestFeature {
    /// Closest pixel on the polygon boundary
    pub point: IVec2,
    /// Unit surface normal at that point, pointing away from the polygon
    pub normal: Vector2D,
    /// Distance from the query point to `point`
    pub distance: f64,
}

/// Find the boundary point of a clockwise (screen order) convex polygon
/// closest to `center`.
///
/// On an edge the normal is the outward edge perpendicular; on a vertex it
/// is the direction from the vertex toward `center`. Ties go to the later
/// edge. Returns `None` for an empty polygon.
pub fn closest_feature(vertices: &[IVec2], center: IVec2) -> Option<ClosestFeature> {
    let mut best: Option<ClosestFeature> = None;

    for (k, &p) in vertices.iter().enumerate() {
        let q = vertices[(k + 1) % vertices.len()];
        let projection = project_onto_segment(p, q, center);
        let dist = distance(projection.point, center);

        if best.is_some_and(|b| dist > b.distance) {
            continue;
        }

        let normal = if projection.at_vertex() {
            Vector2D::between(center, projection.point).to_length(1.0)
        } else {
            let d = projection.direction;
            Vector2D::new(d.y(), -d.x())
        };

        best = Some(ClosestFeature {
            point: projection.point,
            normal,
            distance: dist,
        });
    }

    best
}
