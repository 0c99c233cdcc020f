//! Narrow-phase collision detection and collision filtering
//!
//! Provides contact manifolds for circle/circle and chain-edge/circle pairs.
//! Chains never collide with other chains.

use bitflags::bitflags;

use wheel_math::{Transform2D, Vec2};

use crate::shapes::{CircleShape, EdgeShape, Shape};
use crate::settings::POLYGON_RADIUS;

bitflags! {
    /// Collision layers for filtering which fixtures can touch
    ///
    /// Each layer is a bit in a 32-bit mask. A fixture can belong to several
    /// layers and picks the layers it collides with through its mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most fixtures
        const DEFAULT = 1 << 0;
        /// Spinning bodies (wheels, rotors)
        const WHEEL = 1 << 1;
        /// Small projectiles riding on wheels
        const BALL = 1 << 2;
        /// Static scenery
        const STATIC = 1 << 3;
        /// Sensor zones (report overlaps, never push)
        const SENSOR = 1 << 4;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what a fixture collides with
///
/// Two fixtures A and B collide if `(A.layer & B.mask) != 0` and
/// `(B.layer & A.mask) != 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this fixture belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this fixture can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    /// Create a new collision filter with specified layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Filter for a fixture that ignores every other fixture
    pub fn none() -> Self {
        Self {
            layer: CollisionLayer::empty(),
            mask: CollisionLayer::empty(),
        }
    }

    /// Filter for sensor zones that detect `detects`
    pub fn sensor(detects: CollisionLayer) -> Self {
        Self {
            layer: CollisionLayer::SENSOR,
            mask: detects,
        }
    }
}

/// Single-point contact between two shapes, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Manifold {
    /// Unit normal pointing from shape A toward shape B
    pub normal: Vec2,
    /// Point midway between the two surfaces
    pub point: Vec2,
    /// Signed surface distance (negative when overlapping)
    pub separation: f32,
}

impl Manifold {
    fn between_surfaces(
        center_a: Vec2,
        radius_a: f32,
        center_b: Vec2,
        radius_b: f32,
        normal: Vec2,
        distance: f32,
    ) -> Self {
        let surface_a = center_a + normal * radius_a;
        let surface_b = center_b - normal * radius_b;
        Self {
            normal,
            point: (surface_a + surface_b) * 0.5,
            separation: distance - radius_a - radius_b,
        }
    }

    /// Check if the shapes overlap
    pub fn is_penetrating(&self) -> bool {
        self.separation < 0.0
    }
}

/// Circle against circle
pub fn collide_circles(
    a: &CircleShape,
    xf_a: &Transform2D,
    b: &CircleShape,
    xf_b: &Transform2D,
) -> Option<Manifold> {
    let pa = xf_a.apply(a.center);
    let pb = xf_b.apply(b.center);
    let d = pb - pa;
    let dist_sq = d.length_squared();
    let total = a.radius + b.radius;
    if dist_sq > total * total {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON { d / dist } else { Vec2::X };
    Some(Manifold::between_surfaces(pa, a.radius, pb, b.radius, normal, dist))
}

/// Chain segment (on body A) against circle (on body B)
///
/// Contacts at a shared vertex are reported by only one of the two
/// segments that meet there, using the segment's neighbouring vertices.
pub fn collide_edge_and_circle(
    edge: &EdgeShape,
    xf_a: &Transform2D,
    circle: &CircleShape,
    xf_b: &Transform2D,
) -> Option<Manifold> {
    // Circle center in the edge's frame
    let q = xf_a.apply_inverse(xf_b.apply(circle.center));
    let total = POLYGON_RADIUS + circle.radius;

    let (closest, u, v) = edge.closest_point(q);
    let d = q - closest;
    if d.length_squared() > total * total {
        return None;
    }

    if v <= 0.0 {
        if let Some(prev) = edge.prev {
            let e1 = edge.v1 - prev;
            if e1.dot(edge.v1 - q) > 0.0 {
                // The previous segment owns this vertex
                return None;
            }
        }
    } else if u <= 0.0 {
        if let Some(next) = edge.next {
            let e2 = next - edge.v2;
            if e2.dot(q - edge.v2) > 0.0 {
                return None;
            }
        }
    }

    let dist = d.length();
    let local_normal = if dist > f32::EPSILON {
        d / dist
    } else {
        (edge.v2 - edge.v1).perp().normalized()
    };

    let normal = xf_a.rotation.apply(local_normal);
    Some(Manifold::between_surfaces(
        xf_a.apply(closest),
        POLYGON_RADIUS,
        xf_b.apply(circle.center),
        circle.radius,
        normal,
        dist,
    ))
}

/// Collide child `child_a` of `shape_a` with `shape_b`
///
/// Chains must be passed as `shape_a`. Returns `None` for unsupported
/// pairs (chain against chain) and for separated shapes.
pub fn collide(
    shape_a: &Shape,
    child_a: usize,
    xf_a: &Transform2D,
    shape_b: &Shape,
    xf_b: &Transform2D,
) -> Option<Manifold> {
    match (shape_a, shape_b) {
        (Shape::Circle(a), Shape::Circle(b)) => collide_circles(a, xf_a, b, xf_b),
        (Shape::Chain(chain), Shape::Circle(b)) => {
            collide_edge_and_circle(&chain.edge(child_a), xf_a, b, xf_b)
        }
        _ => None,
    }
}

/// Surface distance between two shapes (negative when overlapping)
///
/// Used by continuous collision to advance bodies without tunnelling.
/// Ignores neighbouring segments, so it is conservative at chain corners.
pub fn separation(
    shape_a: &Shape,
    child_a: usize,
    xf_a: &Transform2D,
    shape_b: &Shape,
    xf_b: &Transform2D,
) -> Option<f32> {
    match (shape_a, shape_b) {
        (Shape::Circle(a), Shape::Circle(b)) => {
            let d = xf_a.apply(a.center).distance(xf_b.apply(b.center));
            Some(d - a.radius - b.radius)
        }
        (Shape::Chain(chain), Shape::Circle(b)) => {
            let edge = chain.edge(child_a);
            let q = xf_a.apply_inverse(xf_b.apply(b.center));
            let (closest, _, _) = edge.closest_point(q);
            Some(q.distance(closest) - POLYGON_RADIUS - b.radius)
        }
        _ => None,
    }
}
