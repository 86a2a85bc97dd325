use core::fmt;

use imgref::ImgVec;

use penumbra_base::math::Color;

/// A grid of accumulated [`Color`]s, `width × height`, stored row-major.
///
/// Every pixel starts out as [`Color::TRANSPARENT`], and is changed only by adding to it;
/// nothing is ever overwritten or normalized. This is the buffer that all rendering in this
/// crate writes into, and which [`quantize()`](crate::quantize) reads to produce an image.
///
/// Pixel coordinates must be within bounds; out-of-range access panics.
#[derive(Clone)]
pub struct Pixmap {
    image: ImgVec<Color>,
}

impl Pixmap {
    /// Constructs a [`Pixmap`] of the given size with every pixel transparent.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: ImgVec::new(vec![Color::TRANSPARENT; width * height], width, height),
        }
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn width(&self) -> usize {
        self.image.width()
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// Returns the accumulated value of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= self.width()` or `y >= self.height()`.
    #[inline]
    #[track_caller]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        self.image.buf()[self.index(x, y)]
    }

    /// Adds `color` to the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= self.width()` or `y >= self.height()`.
    #[inline]
    #[track_caller]
    pub fn add_pixel(&mut self, x: usize, y: usize, color: Color) {
        let index = self.index(x, y);
        self.image.buf_mut()[index] += color;
    }

    /// Adds `color` to every pixel.
    pub fn fill(&mut self, color: Color) {
        for pixel in self.image.buf_mut() {
            *pixel += color;
        }
    }

    /// Returns all pixel values, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.image.buf().iter().copied()
    }

    /// Returns the underlying image, for use with other code that accepts [`imgref`] types.
    pub fn as_img(&self) -> imgref::ImgRef<'_, Color> {
        self.image.as_ref()
    }

    #[track_caller]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) out of bounds of {}×{} pixmap",
            self.width(),
            self.height()
        );
        y * self.image.stride() + x
    }
}

// Manual implementation to avoid printing every pixel.
impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
