//! Shapes that rays may be intersected with.

use crate::math::{Point, Ray, ScenePoint};

/// Intersection of a [`Ray`] with a shape.
///
/// None of these tests use an acceleration structure; each is a constant-time formula.
pub trait Intersect {
    /// What the test reports: whether the shape was hit, or where.
    type Hit;

    /// Tests `ray` against this shape.
    fn intersect(&self, ray: Ray) -> Self::Hit;
}

/// A sphere.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    #[allow(missing_docs)]
    pub center: ScenePoint,
    #[allow(missing_docs)]
    pub radius: f32,
}

impl Sphere {
    #[allow(missing_docs)]
    #[inline]
    pub const fn new(center: ScenePoint, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Reports whether the ray passes through the sphere at or after its origin.
///
/// A ray whose origin is inside the sphere always hits. A zero direction never does.
impl Intersect for Sphere {
    type Hit = bool;

    fn intersect(&self, ray: Ray) -> bool {
        let offset = ray.origin - self.center;
        let a = ray.direction.square_length();
        if a == 0.0 {
            return false;
        }
        let half_b = offset.dot(ray.direction);
        let c = offset.square_length() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return false;
        }
        // The far root is the last point of the line inside the sphere;
        // if even that is behind the origin, the whole chord is.
        let t_far = (-half_b + discriminant.sqrt()) / a;
        t_far >= 0.0
    }
}

/// The infinite plane of constant `z`.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZPlane {
    #[allow(missing_docs)]
    pub z: f32,
}

impl ZPlane {
    #[allow(missing_docs)]
    #[inline]
    pub const fn new(z: f32) -> Self {
        Self { z }
    }
}

/// Reports the point where the line of the ray crosses the plane.
///
/// The ray parameter is not restricted to be positive. If the ray is parallel to the
/// plane (`direction.z == 0`), the point is non-finite.
impl Intersect for ZPlane {
    type Hit = ScenePoint;

    #[inline]
    fn intersect(&self, ray: Ray) -> ScenePoint {
        let t = (self.z - ray.origin.z) / ray.direction.z;
        ray.at(t)
    }
}

/// An axis-aligned rectangle lying in a plane of constant `z`, extending from `(x, y)` to
/// `(x + width, y + height)`.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
    #[allow(missing_docs)]
    pub z: f32,
    #[allow(missing_docs)]
    pub width: f32,
    #[allow(missing_docs)]
    pub height: f32,
}

impl Rectangle {
    #[allow(missing_docs)]
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
        }
    }
}

/// Reports whether the line of the ray crosses the rectangle, edges included.
///
/// A ray parallel to the rectangle's plane is reported as a miss.
impl Intersect for Rectangle {
    type Hit = bool;

    fn intersect(&self, ray: Ray) -> bool {
        if ray.direction.z == 0.0 {
            return false;
        }
        let p = ZPlane::new(self.z).intersect(ray);
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// A [`Rectangle`] whose corners are rounded off by quarter circles of the given radius.
///
/// The radius must not exceed half of the smaller of `width` and `height`
/// (see [`RoundedRectangle::is_well_formed()`]); intersection results for larger radii are
/// not meaningful.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundedRectangle {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
    #[allow(missing_docs)]
    pub z: f32,
    #[allow(missing_docs)]
    pub width: f32,
    #[allow(missing_docs)]
    pub height: f32,
    /// Radius of the corner arcs. Zero gives a plain rectangle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius: f32,
}

impl RoundedRectangle {
    #[allow(missing_docs)]
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, width: f32, height: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            radius,
        }
    }

    /// Returns whether the dimensions are non-negative and the corner radius fits within
    /// both the width and the height.
    pub fn is_well_formed(&self) -> bool {
        self.width >= 0.0
            && self.height >= 0.0
            && self.radius >= 0.0
            && self.radius * 2.0 <= self.width.min(self.height)
    }
}

/// Reports whether the line of the ray crosses the rounded rectangle.
///
/// A ray parallel to the rectangle's plane is reported as a miss.
impl Intersect for RoundedRectangle {
    type Hit = bool;

    fn intersect(&self, ray: Ray) -> bool {
        if ray.direction.z == 0.0 {
            return false;
        }
        let hit = ZPlane::new(self.z).intersect(ray);
        let mut p = Point::new(hit.x - self.x, hit.y - self.y);
        if p.x < 0.0 || p.y < 0.0 {
            return false;
        }
        if p.x > self.width || p.y > self.height {
            return false;
        }

        // Fold the far corners onto the near one, so only one arc needs testing.
        if p.x > self.width - self.radius {
            p.x = self.width - p.x;
        }
        if p.y > self.height - self.radius {
            p.y = self.height - p.y;
        }

        if p.x < self.radius && p.y < self.radius {
            let from_arc_center = p - Point::new(self.radius, self.radius);
            from_arc_center.square_length() <= self.radius * self.radius
        } else {
            true
        }
    }
}

/// The closed set of shapes which may cast shadows.
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Occluder {
    #[allow(missing_docs)]
    Rectangle(Rectangle),
    #[allow(missing_docs)]
    RoundedRectangle(RoundedRectangle),
    #[allow(missing_docs)]
    Sphere(Sphere),
}

impl Intersect for Occluder {
    type Hit = bool;

    #[inline]
    fn intersect(&self, ray: Ray) -> bool {
        match self {
            Occluder::Rectangle(rect) => rect.intersect(ray),
            Occluder::RoundedRectangle(rect) => rect.intersect(ray),
            Occluder::Sphere(sphere) => sphere.intersect(ray),
        }
    }
}

impl From<Rectangle> for Occluder {
    fn from(value: Rectangle) -> Self {
        Occluder::Rectangle(value)
    }
}
impl From<RoundedRectangle> for Occluder {
    fn from(value: RoundedRectangle) -> Self {
        Occluder::RoundedRectangle(value)
    }
}
impl From<Sphere> for Occluder {
    fn from(value: Sphere) -> Self {
        Occluder::Sphere(value)
    }
}
