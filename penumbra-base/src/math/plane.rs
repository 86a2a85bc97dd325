//! Lines and segments on the image plane, as used by scanline rasterization.

use crate::math::{Point, between};

/// A line on the image plane, parameterized as `x = m * y + x0`.
///
/// The line is solved for `x` as a function of `y` (rather than the other way around)
/// because it is evaluated at scanlines of constant `y`; this way, vertical polygon edges
/// are well-defined and it is horizontal lines that cannot be represented.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// Change in `x` per unit change in `y`.
    pub m: f32,
    /// The value of `x` at `y = 0`.
    pub x0: f32,
}

impl Line {
    /// Constructs the line with slope `m` passing through `point`.
    #[inline]
    pub fn new(m: f32, point: Point) -> Self {
        Self {
            m,
            x0: point.x - m * point.y,
        }
    }

    /// Constructs the line passing through two points.
    ///
    /// The points must have different `y` coordinates. If they do not, the slope is
    /// non-finite and so is every result of [`Line::get_x()`].
    #[inline]
    pub fn through(p0: Point, p1: Point) -> Self {
        Self::new((p1.x - p0.x) / (p1.y - p0.y), p0)
    }

    /// Constructs the vertical line at the given `x`.
    #[inline]
    pub const fn vertical(x: f32) -> Self {
        Self { m: 0.0, x0: x }
    }

    /// Evaluates the line at `y`.
    #[inline]
    pub fn get_x(self, y: f32) -> f32 {
        self.m * y + self.x0
    }
}

/// Returns the `y` coordinate at which two lines cross.
///
/// The lines must not be parallel (have equal slopes); if they are, the result is
/// non-finite.
///
/// ```
/// use penumbra_base::math::{Line, Point, intersect};
///
/// let rising = Line::through(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
/// assert_eq!(intersect(rising, Line::vertical(1.5)), 1.5);
/// ```
#[inline]
pub fn intersect(l0: Line, l1: Line) -> f32 {
    (l1.x0 - l0.x0) / (l0.m - l1.m)
}

/// A [`Line`] restricted to the range of `y` between `y0` and `y1`: one edge of a polygon.
///
/// `y0` and `y1` keep the order of the points the segment was built from, so that
/// [`Segment::winding()`] can tell upward from downward edges.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// `y` coordinate of the starting point.
    pub y0: f32,
    /// `y` coordinate of the ending point.
    pub y1: f32,
    /// Line on which the segment lies.
    pub line: Line,
}

impl Segment {
    /// Constructs the segment from `p0` to `p1`.
    ///
    /// As with [`Line::through()`], the points must have different `y` coordinates.
    #[inline]
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            y0: p0.y,
            y1: p1.y,
            line: Line::through(p0, p1),
        }
    }

    /// Constructs a segment from explicit bounds and line.
    #[inline]
    pub const fn with_line(y0: f32, y1: f32, line: Line) -> Self {
        Self { y0, y1, line }
    }

    /// Returns whether the scanline at `y` crosses this segment.
    ///
    /// The range is half-open, `[min(y0, y1), max(y0, y1))`, so that a scanline passing
    /// exactly through a vertex shared by two consecutive edges of a polygon crosses
    /// exactly one of them when the boundary continues past the vertex, and zero or two
    /// of them when the vertex is a local extremum.
    #[inline]
    pub fn spans(&self, y: f32) -> bool {
        between(y, self.y0.min(self.y1), self.y0.max(self.y1))
    }

    /// Returns the `x` coordinate at which the scanline at `y` crosses the segment's line.
    #[inline]
    pub fn crossing(&self, y: f32) -> f32 {
        self.line.get_x(y)
    }

    /// Returns `1` if the segment goes in the direction of increasing `y`, and `-1`
    /// otherwise.
    #[inline]
    pub fn winding(&self) -> i32 {
        if self.y0 < self.y1 { 1 } else { -1 }
    }
}
