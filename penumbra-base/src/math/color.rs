//! Color data type. This module is private but reexported by its parent.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

/// A floating-point RGBA color value with premultiplied alpha.
///
/// * The `r`, `g` and `b` components have already been multiplied by `a`.
///   Therefore, adding two colors accumulates light and coverage together, and
///   the “over” operator ([`blend()`]) is linear.
/// * Components are not clamped. Sums of many samples may exceed 1 until they are scaled
///   back down, and [`Color::unpremultiply()`] is only meaningful once they have been.
/// * No gamma correction is applied anywhere; components are stored and written as-is.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    #[allow(missing_docs)]
    pub r: f32,
    #[allow(missing_docs)]
    pub g: f32,
    #[allow(missing_docs)]
    pub b: f32,
    /// Alpha (coverage or opacity).
    pub a: f32,
}

impl Color {
    /// Transparent black; the additive identity.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Color = Color::opaque(1.0, 1.0, 1.0);

    /// Constructs a color from premultiplied components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs an opaque color. (Premultiplication by an alpha of 1 changes nothing.)
    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Constructs an opaque color from 8-bit components, mapping 255 to 1.0.
    ///
    /// ```
    /// use penumbra_base::math::Color;
    ///
    /// assert_eq!(Color::rgb8(0xFF, 0xFF, 0x00), Color::opaque(1.0, 1.0, 0.0));
    /// ```
    #[inline]
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::opaque(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Converts this premultiplied color to straight (non-premultiplied) alpha,
    /// for final output.
    ///
    /// A color with zero alpha has no meaningful hue, so it converts to
    /// [`Color::TRANSPARENT`] instead of dividing by zero.
    #[inline]
    #[must_use]
    pub fn unpremultiply(self) -> Self {
        if self.a == 0.0 {
            Self::TRANSPARENT
        } else {
            Self::new(self.r / self.a, self.g / self.a, self.b / self.a, self.a)
        }
    }

    /// Composites `self` over `dst`. Equivalent to `blend(dst, self)`.
    #[inline]
    #[must_use]
    pub fn over(self, dst: Color) -> Self {
        blend(dst, self)
    }

    /// Returns the components in `[r, g, b, a]` order.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Premultiplied-alpha “over” compositing: places `src` on top of `dst`.
///
/// `result = src + dst * (1 - src.a)`.
/// The first argument is the base layer; swapping the arguments changes the result unless
/// both are equally opaque.
///
/// ```
/// use penumbra_base::math::{blend, Color};
///
/// let base = Color::opaque(0.0, 0.0, 1.0);
/// let half_red = Color::new(0.5, 0.0, 0.0, 0.5);
/// assert_eq!(blend(base, half_red), Color::new(0.5, 0.0, 0.5, 1.0));
/// ```
#[inline]
pub fn blend(dst: Color, src: Color) -> Color {
    src + dst * (1.0 - src.a)
}

impl Add for Color {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a + other.a,
        )
    }
}

impl AddAssign for Color {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<f32> for Color {
    type Output = Self;
    /// Scales all components, including alpha.
    #[inline]
    fn mul(self, scale: f32) -> Self {
        Self::new(
            self.r * scale,
            self.g * scale,
            self.b * scale,
            self.a * scale,
        )
    }
}

impl Sum for Color {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Color::TRANSPARENT, Add::add)
    }
}
