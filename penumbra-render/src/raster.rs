//! Scanline filling of polygons into a [`Pixmap`].

use penumbra_base::math::{Color, Point, Segment};

use crate::Pixmap;

/// Rule deciding which regions enclosed by a self-intersecting or multiply-wound polygon
/// boundary count as inside.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum FillRule {
    /// A point is inside if the boundary winds around it a non-zero number of times,
    /// counting direction.
    #[default]
    NonZero,
    /// A point is inside if a ray from it crosses the boundary an odd number of times.
    EvenOdd,
}

impl FillRule {
    /// Given the running winding number and the number of crossings passed on one scanline,
    /// returns whether the span that follows is inside.
    fn is_inside(self, winding: i32, crossings: usize) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => crossings % 2 == 1,
        }
    }
}

/// Adds `color` to every pixel of `pixmap` whose center lies inside the polygon with the
/// given vertices.
///
/// The polygon is closed implicitly: the last vertex connects back to the first.
/// Each row of pixels is sampled along the horizontal line through pixel centers, `y + 0.5`.
/// Along that line, the crossings with the polygon's edges are sorted, and the spans
/// between them are inside or outside according to `rule`. A pixel is covered when its
/// center `x + 0.5` lies in the half-open span `[start, end)`, so that two polygons sharing
/// an edge never both cover a pixel.
///
/// Horizontal edges are skipped, since they never cross a scanline but instead lie along
/// it. The parts of the polygon outside the pixmap are ignored. Fewer than 3 vertices
/// enclose nothing and draw nothing.
///
/// ```
/// use penumbra_base::math::{Color, Point};
/// use penumbra_render::{FillRule, Pixmap, fill_polygon};
///
/// let mut pixmap = Pixmap::new(4, 4);
/// let square = [
///     Point::new(1.0, 1.0),
///     Point::new(3.0, 1.0),
///     Point::new(3.0, 3.0),
///     Point::new(1.0, 3.0),
/// ];
/// fill_polygon(&mut pixmap, &square, Color::WHITE, FillRule::NonZero);
///
/// assert_eq!(pixmap.get_pixel(1, 1), Color::WHITE);
/// assert_eq!(pixmap.get_pixel(2, 2), Color::WHITE);
/// assert_eq!(pixmap.get_pixel(0, 2), Color::TRANSPARENT);
/// assert_eq!(pixmap.get_pixel(3, 2), Color::TRANSPARENT);
/// ```
pub fn fill_polygon(pixmap: &mut Pixmap, vertices: &[Point], color: Color, rule: FillRule) {
    if vertices.len() < 3 {
        return;
    }

    let segments: Vec<Segment> = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .filter(|(p0, p1)| p0.y != p1.y)
        .map(|(&p0, &p1)| Segment::new(p0, p1))
        .collect();

    let width = pixmap.width();
    let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(segments.len());
    let mut covered: usize = 0;
    for row in 0..pixmap.height() {
        let y = row as f32 + 0.5;

        crossings.clear();
        crossings.extend(
            segments
                .iter()
                .filter(|segment| segment.spans(y))
                .map(|segment| (segment.crossing(y), segment.winding())),
        );
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for (passed, pair) in crossings.windows(2).enumerate() {
            let (start, entering) = pair[0];
            let end = pair[1].0;
            winding += entering;
            if !rule.is_inside(winding, passed + 1) {
                continue;
            }
            for x in pixel_span(start, end, width) {
                pixmap.add_pixel(x, row, color);
                covered += 1;
            }
        }
    }

    log::trace!(
        "filled polygon of {} vertices ({} edges) covering {covered} pixels with {rule:?}",
        vertices.len(),
        segments.len(),
    );
}

/// Returns the columns whose centers lie within `[start, end)`, clipped to `0..width`.
fn pixel_span(start: f32, end: f32, width: usize) -> core::ops::Range<usize> {
    // Saturating float-to-int conversion takes care of clipping on the left and NaN.
    let first = (start - 0.5).ceil().max(0.0) as usize;
    let last = ((end - 0.5).ceil().max(0.0) as usize).min(width);
    first.min(last)..last
}
