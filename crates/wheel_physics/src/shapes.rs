//! Collision shapes for 2D physics
//!
//! Shapes are stored in body-local coordinates and placed in the world
//! through the owning body's transform.

use std::f32::consts::PI;

use wheel_math::{Transform2D, Vec2};

use crate::error::PhysicsError;
use crate::settings::{LINEAR_SLOP, POLYGON_RADIUS};

/// Axis-aligned bounding box in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        let r = Vec2::new(radius, radius);
        Self::new(center - r, center + r)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half widths along each axis
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Check whether two boxes overlap (touching counts)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check whether a point lies inside the box
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Box enclosing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            self.min.min_components(other.min),
            self.max.max_components(other.max),
        )
    }

    /// Box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Aabb {
        let m = Vec2::new(margin, margin);
        Aabb::new(self.min - m, self.max + m)
    }

    /// Corners in counter-clockwise order, starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

/// Mass properties of a shape at a given density
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MassData {
    /// Mass in kilograms
    pub mass: f32,
    /// Centroid in body-local coordinates
    pub center: Vec2,
    /// Rotational inertia about the body origin
    pub inertia: f32,
}

/// A solid circle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleShape {
    /// Center in body-local coordinates
    pub center: Vec2,
    pub radius: f32,
}

impl CircleShape {
    /// Circle centered on the body origin
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            radius,
        }
    }

    /// Circle with a local offset
    pub fn at(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn compute_mass(&self, density: f32) -> MassData {
        let mass = density * PI * self.radius * self.radius;
        MassData {
            mass,
            center: self.center,
            // Disc inertia about its center plus the parallel-axis term
            inertia: mass * (0.5 * self.radius * self.radius + self.center.length_squared()),
        }
    }

    pub fn compute_aabb(&self, xf: &Transform2D) -> Aabb {
        Aabb::around_circle(xf.apply(self.center), self.radius)
    }

    /// Check whether a world point lies inside the circle
    pub fn test_point(&self, xf: &Transform2D, p: Vec2) -> bool {
        xf.apply(self.center).distance(p) <= self.radius
    }
}

/// A single line segment, one child of a chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeShape {
    pub v1: Vec2,
    pub v2: Vec2,
    /// Vertex before `v1`, if the chain continues that way
    pub prev: Option<Vec2>,
    /// Vertex after `v2`, if the chain continues that way
    pub next: Option<Vec2>,
}

impl EdgeShape {
    /// A lone segment with no neighbours
    pub fn new(v1: Vec2, v2: Vec2) -> Self {
        Self {
            v1,
            v2,
            prev: None,
            next: None,
        }
    }

    /// Closest point on the segment to `p`, with the barycentric weights `(u, v)`
    ///
    /// `u` weighs `v1` and `v` weighs `v2`. A non-positive `v` means the
    /// closest point is `v1`; a non-positive `u` means it is `v2`.
    pub fn closest_point(&self, p: Vec2) -> (Vec2, f32, f32) {
        let e = self.v2 - self.v1;
        let u = e.dot(self.v2 - p);
        let v = e.dot(p - self.v1);
        if v <= 0.0 {
            return (self.v1, u, v);
        }
        if u <= 0.0 {
            return (self.v2, u, v);
        }
        let len_sq = e.length_squared();
        (self.v1 + e * (v / len_sq), u, v)
    }

    pub fn compute_aabb(&self, xf: &Transform2D) -> Aabb {
        let a = xf.apply(self.v1);
        let b = xf.apply(self.v2);
        Aabb::new(a.min_components(b), a.max_components(b)).expanded(POLYGON_RADIUS)
    }
}

/// A free-form sequence of line segments
///
/// Chains are massless collision boundaries that collide on both sides.
/// A chain whose last vertex equals its first forms a closed loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainShape {
    vertices: Vec<Vec2>,
}

impl ChainShape {
    /// Create a chain, checking that it has at least two vertices and no
    /// adjacent pair closer than the linear slop
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, PhysicsError> {
        if vertices.len() < 2 {
            return Err(PhysicsError::InvalidShape(format!(
                "chain needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidShape(format!(
                "chain vertex {} is not finite",
                i
            )));
        }
        for (i, pair) in vertices.windows(2).enumerate() {
            if pair[0].distance(pair[1]) <= LINEAR_SLOP {
                return Err(PhysicsError::InvalidShape(format!(
                    "chain vertices {} and {} are too close",
                    i,
                    i + 1
                )));
            }
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// True when the last vertex repeats the first
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 2 && self.vertices.first() == self.vertices.last()
    }

    /// Number of segments (one fewer than the vertex count)
    pub fn edge_count(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Segment `index` with its neighbouring vertices filled in
    pub fn edge(&self, index: usize) -> EdgeShape {
        let n = self.vertices.len();
        let closed = self.is_closed();
        let prev = if index > 0 {
            Some(self.vertices[index - 1])
        } else if closed {
            Some(self.vertices[n - 2])
        } else {
            None
        };
        let next = if index + 2 < n {
            Some(self.vertices[index + 2])
        } else if closed {
            Some(self.vertices[1])
        } else {
            None
        };
        EdgeShape {
            v1: self.vertices[index],
            v2: self.vertices[index + 1],
            prev,
            next,
        }
    }

    /// Iterate over every segment
    pub fn edges(&self) -> impl Iterator<Item = EdgeShape> + '_ {
        (0..self.edge_count()).map(move |i| self.edge(i))
    }

    pub fn compute_aabb(&self, xf: &Transform2D) -> Aabb {
        let first = xf.apply(self.vertices[0]);
        let mut aabb = Aabb::new(first, first);
        for v in &self.vertices[1..] {
            let p = xf.apply(*v);
            aabb.min = aabb.min.min_components(p);
            aabb.max = aabb.max.max_components(p);
        }
        aabb.expanded(POLYGON_RADIUS)
    }
}

/// Collision shape attached to a fixture
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle(CircleShape),
    Chain(ChainShape),
}

impl Shape {
    /// Skin radius used by the narrow phase
    pub fn radius(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.radius,
            Shape::Chain(_) => POLYGON_RADIUS,
        }
    }

    /// Number of child shapes (segments for a chain)
    pub fn child_count(&self) -> usize {
        match self {
            Shape::Circle(_) => 1,
            Shape::Chain(c) => c.edge_count(),
        }
    }

    pub fn compute_mass(&self, density: f32) -> MassData {
        match self {
            Shape::Circle(c) => c.compute_mass(density),
            Shape::Chain(_) => MassData::default(),
        }
    }

    pub fn compute_aabb(&self, xf: &Transform2D) -> Aabb {
        match self {
            Shape::Circle(c) => c.compute_aabb(xf),
            Shape::Chain(c) => c.compute_aabb(xf),
        }
    }

    /// Largest distance from `local_center` to any point of the shape
    pub fn extent_from(&self, local_center: Vec2) -> f32 {
        match self {
            Shape::Circle(c) => c.center.distance(local_center) + c.radius,
            Shape::Chain(c) => {
                c.vertices()
                    .iter()
                    .map(|v| v.distance(local_center))
                    .fold(0.0, f32::max)
                    + POLYGON_RADIUS
            }
        }
    }

    /// Reject degenerate shapes
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match self {
            Shape::Circle(c) => {
                if !(c.radius.is_finite() && c.radius > 0.0) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "circle radius must be positive, got {}",
                        c.radius
                    )));
                }
                if !c.center.is_finite() {
                    return Err(PhysicsError::InvalidShape(
                        "circle center is not finite".to_string(),
                    ));
                }
                Ok(())
            }
            // Chains are validated on construction
            Shape::Chain(_) => Ok(()),
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Chain(_) => "chain",
        }
    }
}

impl From<CircleShape> for Shape {
    fn from(circle: CircleShape) -> Self {
        Shape::Circle(circle)
    }
}

impl From<ChainShape> for Shape {
    fn from(chain: ChainShape) -> Self {
        Shape::Chain(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_loop() -> Vec<Vec2> {
        vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(-1.0, -1.0),
        ]
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));
        let c = Aabb::new(Vec2::new(3.0, 3.0), Vec2::new(4.0, 4.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.union(&c).max, Vec2::new(4.0, 4.0));
        assert_eq!(a.center(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_circle_mass() {
        let circle = CircleShape::new(2.5);
        let md = circle.compute_mass(1.0);
        assert!((md.mass - PI * 6.25).abs() < 0.0001);
        assert_eq!(md.center, Vec2::ZERO);
        assert!((md.inertia - md.mass * 0.5 * 6.25).abs() < 0.001);
    }

    #[test]
    fn test_offset_circle_inertia_uses_parallel_axis() {
        let circle = CircleShape::at(Vec2::new(2.0, 0.0), 1.0);
        let md = circle.compute_mass(1.0);
        assert!((md.inertia - md.mass * (0.5 + 4.0)).abs() < 0.001);
    }

    #[test]
    fn test_circle_aabb_follows_transform() {
        let circle = CircleShape::at(Vec2::new(1.0, 0.0), 0.5);
        let xf = Transform2D::new(Vec2::new(0.0, 2.0), std::f32::consts::FRAC_PI_2);
        let aabb = circle.compute_aabb(&xf);
        assert!((aabb.center() - Vec2::new(0.0, 3.0)).length() < 0.0001);
        assert!((aabb.extents() - Vec2::new(0.5, 0.5)).length() < 0.0001);
    }

    #[test]
    fn test_chain_rejects_short_input() {
        assert!(ChainShape::new(vec![Vec2::ZERO]).is_err());
        assert!(ChainShape::new(Vec::new()).is_err());
    }

    #[test]
    fn test_chain_rejects_close_vertices() {
        let result = ChainShape::new(vec![Vec2::ZERO, Vec2::new(0.001, 0.0), Vec2::X]);
        assert!(matches!(result, Err(PhysicsError::InvalidShape(_))));
    }

    #[test]
    fn test_closed_chain_wraps_neighbours() {
        let chain = ChainShape::new(square_loop()).unwrap();
        assert!(chain.is_closed());
        assert_eq!(chain.edge_count(), 4);

        let first = chain.edge(0);
        assert_eq!(first.prev, Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(first.next, Some(Vec2::new(1.0, 1.0)));

        let last = chain.edge(3);
        assert_eq!(last.v2, Vec2::new(-1.0, -1.0));
        assert_eq!(last.next, Some(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn test_open_chain_has_no_ghosts_at_ends() {
        let chain = ChainShape::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]).unwrap();
        assert!(!chain.is_closed());
        assert_eq!(chain.edge(0).prev, None);
        assert_eq!(chain.edge(1).next, None);
        assert_eq!(chain.edge(0).next, Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_chain_is_massless() {
        let shape = Shape::Chain(ChainShape::new(square_loop()).unwrap());
        assert_eq!(shape.compute_mass(1.0), MassData::default());
        assert_eq!(shape.child_count(), 4);
        assert_eq!(shape.radius(), POLYGON_RADIUS);
    }

    #[test]
    fn test_edge_closest_point() {
        let edge = EdgeShape::new(Vec2::ZERO, Vec2::new(2.0, 0.0));
        let (p, _, _) = edge.closest_point(Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(1.0, 0.0));
        let (p, _, v) = edge.closest_point(Vec2::new(-1.0, 1.0));
        assert_eq!(p, Vec2::ZERO);
        assert!(v <= 0.0);
        let (p, u, _) = edge.closest_point(Vec2::new(3.0, -1.0));
        assert_eq!(p, Vec2::new(2.0, 0.0));
        assert!(u <= 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_circle() {
        assert!(Shape::Circle(CircleShape::new(0.0)).validate().is_err());
        assert!(Shape::Circle(CircleShape::new(f32::NAN)).validate().is_err());
        assert!(Shape::Circle(CircleShape::new(0.1)).validate().is_ok());
    }

    #[test]
    fn test_extent_from_center() {
        let shape = Shape::Circle(CircleShape::at(Vec2::new(1.0, 0.0), 0.5));
        assert!((shape.extent_from(Vec2::ZERO) - 1.5).abs() < 0.0001);
    }
}
