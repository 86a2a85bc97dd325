use rand::RngCore;

use penumbra_base::math::Color;
use penumbra_base::random::dither;

use crate::Pixmap;

/// How the alpha channel of quantized pixels is to be interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum AlphaMode {
    /// Color components are divided by alpha (see [`Color::unpremultiply()`]).
    /// This is what most image file formats expect.
    #[default]
    Straight,
    /// Color components are written as accumulated, already multiplied by alpha.
    Premultiplied,
}

/// Converts the accumulated contents of `pixmap` to 8-bit RGBA, row by row.
///
/// Each component is quantized by [`dither()`], which consumes one draw from `random` per
/// component, in the order r, g, b, a, pixel by pixel. Components outside `[0, 1]` are
/// clamped.
pub fn quantize<R: RngCore + ?Sized>(
    pixmap: &Pixmap,
    mode: AlphaMode,
    random: &mut R,
) -> Vec<[u8; 4]> {
    pixmap
        .as_img()
        .rows()
        .flatten()
        .map(|&color| {
            let color = match mode {
                AlphaMode::Straight => color.unpremultiply(),
                AlphaMode::Premultiplied => color,
            };
            color_to_rgba8(color, random)
        })
        .collect()
}

fn color_to_rgba8<R: RngCore + ?Sized>(color: Color, random: &mut R) -> [u8; 4] {
    let [r, g, b, a] = color.to_array();
    // Evaluated in order, so draws are consumed r, g, b, a.
    [
        dither(random, r),
        dither(random, g),
        dither(random, b),
        dither(random, a),
    ]
}
