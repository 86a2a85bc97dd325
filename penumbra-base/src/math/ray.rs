use crate::math::{ScenePoint, Vector};

/// A ray; a half-infinite line in the scene.
///
/// The direction need not be normalized. The intersection tests solve for the ray
/// parameter `t` and only use it to locate the hit point, so they are unaffected by
/// the direction's magnitude (but not by its being zero).
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The sole endpoint of the ray.
    pub origin: ScenePoint,

    /// The direction in which the ray extends infinitely.
    pub direction: Vector,
}

impl Ray {
    /// Constructs a [`Ray`] from convertible types (e.g. tuples or 3-element arrays).
    /// Other than the use of [`Into`], this is equivalent to a struct literal.
    ///
    /// ```
    /// use penumbra_base::euclid::{point3, vec3};
    /// use penumbra_base::math::Ray;
    ///
    /// assert_eq!(
    ///     Ray::new([1., 2., 3.], [4., 5., 6.]),
    ///     Ray {
    ///         origin: point3(1., 2., 3.),
    ///         direction: vec3(4., 5., 6.),
    ///     }
    /// );
    /// ```
    pub fn new(origin: impl Into<ScenePoint>, direction: impl Into<Vector>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// Returns the point `origin + direction * t`.
    #[inline]
    pub fn at(self, t: f32) -> ScenePoint {
        self.origin + self.direction * t
    }
}
