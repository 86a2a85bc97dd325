//! Mathematical utilities and decisions.

use euclid::{Point3D, Vector2D, Vector3D};

mod color;
pub use color::*;
mod plane;
pub use plane::*;
mod ray;
pub use ray::*;
mod shape;
pub use shape::*;

/// Unit-of-measure type for 2D raster coordinates.
///
/// One unit is one pixel; `x` increases to the right and `y` increases downward,
/// in the same order as pixel rows are stored.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Raster {}

/// Unit-of-measure type for 3D scene coordinates.
///
/// The `x` and `y` axes coincide with [`Raster`] coordinates on the image plane `z = 0`,
/// and positive `z` extends from the image plane towards the occluders.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Scene {}

/// A position on the image plane.
///
/// This is a vector type rather than a point type so that positions may be freely added,
/// negated and scaled, as affine combinations of polygon vertices require.
pub type Point = Vector2D<f32, Raster>;

/// A direction or offset in the 3D scene.
pub type Vector = Vector3D<f32, Scene>;

/// A position in the 3D scene.
pub type ScenePoint = Point3D<f32, Scene>;

/// Returns `min` if `value < min`, `max` if `value > max`, and `value` otherwise.
///
/// Unlike [`f32::clamp`], this never panics: if `min > max` the result is `min` or `max`
/// depending on which test `value` fails first, and NaN passes through unchanged.
#[inline]
#[allow(clippy::manual_clamp)]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if max < value {
        max
    } else {
        value
    }
}

/// Half-open range test: whether `min <= value < max`.
#[inline]
pub fn between(value: f32, min: f32, max: f32) -> bool {
    value >= min && value < max
}
