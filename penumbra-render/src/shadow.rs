//! Monte Carlo estimation of the soft shadow cast by one occluder.

use core::fmt;
use core::num::NonZeroU32;
use core::ops;
use std::time::Instant;

use rand::RngCore;

use penumbra_base::math::{
    Color, Intersect as _, Occluder, Ray, RoundedRectangle, ScenePoint, blend,
};
use penumbra_base::random::{next_float, random_vector};

use crate::{Pixmap, SceneError};

#[cfg(feature = "auto-threads")]
use rayon::iter::{IntoParallelIterator as _, ParallelIterator as _};

/// A scene consisting of an occluder floating above the image plane, lit from every
/// direction of the upper hemisphere, and the parameters for estimating its shadow.
///
/// Each pixel of the image lies at `z = 0`. Its value is the fraction of rays, leaving
/// random points of the pixel in random upward directions, that are blocked by the
/// occluder, applied as the opacity of [`Self::shadow`] laid over [`Self::background`].
///
/// The [`Default`] scene is a rounded square at `z = 10`, casting a white shadow onto
/// black.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoftShadow {
    /// The shape casting the shadow.
    pub occluder: Occluder,
    /// Color of unoccluded pixels.
    pub background: Color,
    /// Color contributed by each occluded ray, averaged over all rays of a pixel.
    pub shadow: Color,
    /// Number of rays traced per pixel.
    ///
    /// The error of the estimate decreases as the square root of this number,
    /// while the running time increases linearly.
    pub iterations: NonZeroU32,
}

const DEFAULT_ITERATIONS: NonZeroU32 = NonZeroU32::new(1024).unwrap();

impl Default for SoftShadow {
    fn default() -> Self {
        Self {
            occluder: RoundedRectangle::new(50.0, 50.0, 10.0, 100.0, 100.0, 10.0).into(),
            background: Color::rgb8(0x00, 0x00, 0x00),
            shadow: Color::rgb8(0xFF, 0xFF, 0xFF),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SoftShadow {
    /// Checks that the occluder's dimensions are finite and non-negative, and that a
    /// rounded rectangle's corners fit within it. Rendering an invalid scene does not fail,
    /// but its results are not meaningful.
    pub fn validate(&self) -> Result<(), SceneError> {
        let occluder = self.occluder;
        // Shapes with fewer than three sizes pad with zero.
        let (position, sizes): ([f32; 3], [f32; 3]) = match occluder {
            Occluder::Rectangle(r) => ([r.x, r.y, r.z], [r.width, r.height, 0.0]),
            Occluder::RoundedRectangle(r) => ([r.x, r.y, r.z], [r.width, r.height, r.radius]),
            Occluder::Sphere(s) => (s.center.to_array(), [s.radius, 0.0, 0.0]),
        };

        if !position.iter().chain(&sizes).all(|c| c.is_finite()) {
            return Err(SceneError::NonFinite(occluder));
        }
        if sizes.iter().any(|&s| s < 0.0) {
            return Err(SceneError::NegativeSize(occluder));
        }
        if let Occluder::RoundedRectangle(r) = occluder {
            if !r.is_well_formed() {
                return Err(SceneError::RadiusTooLarge {
                    radius: r.radius,
                    side: r.width.min(r.height),
                });
            }
        }
        Ok(())
    }

    /// Estimates the color of the pixel at `(x, y)`, without writing it anywhere.
    ///
    /// For each of [`Self::iterations`], this draws from `random`, in order:
    ///
    /// 1. two [`next_float()`]s, offsetting the ray origin within the pixel in `x` and `y`;
    /// 2. one [`random_vector()`], which is the ray direction, reflected to point upward
    ///    (`z >= 0`) if necessary.
    ///
    /// Every ray that hits the occluder adds [`Self::shadow`]; the mean over all rays is
    /// then composited over [`Self::background`].
    pub fn estimate_pixel<R: RngCore + ?Sized>(
        &self,
        x: usize,
        y: usize,
        random: &mut R,
    ) -> (Color, ShadowInfo) {
        let iterations = self.iterations.get();
        let mut sum = Color::TRANSPARENT;
        let mut hits: u64 = 0;
        for _ in 0..iterations {
            let origin = ScenePoint::new(
                x as f32 + next_float(random),
                y as f32 + next_float(random),
                0.0,
            );
            let mut direction = random_vector(random);
            if direction.z < 0.0 {
                direction.z = -direction.z;
            }
            if self.occluder.intersect(Ray::new(origin, direction)) {
                sum += self.shadow;
                hits += 1;
            }
        }

        let color = blend(self.background, sum * (1.0 / iterations as f32));
        let info = ShadowInfo {
            pixels: 1,
            samples: u64::from(iterations),
            hits,
        };
        (color, info)
    }

    /// Estimates every pixel of `pixmap` using one generator, and adds the estimates to
    /// the pixmap.
    ///
    /// Pixels are visited column by column (`x` outer, `y` inner), so the output for a
    /// given scene, pixmap size, and generator state is always the same.
    pub fn render<R: RngCore + ?Sized>(&self, pixmap: &mut Pixmap, random: &mut R) -> ShadowInfo {
        let start_time = Instant::now();
        let mut info = ShadowInfo::default();
        for x in 0..pixmap.width() {
            for y in 0..pixmap.height() {
                let (color, pixel_info) = self.estimate_pixel(x, y, random);
                pixmap.add_pixel(x, y, color);
                info += pixel_info;
            }
        }
        log::debug!(
            "soft shadow rendered in {:.3} s: {info}",
            start_time.elapsed().as_secs_f32()
        );
        info
    }

    /// Like [`Self::render()`], but estimates columns in parallel on the [`rayon`] global
    /// thread pool.
    ///
    /// Each column `x` gets its own [`Random`](penumbra_base::random::Random) seeded from
    /// `x`, so the result is deterministic regardless of the number of threads, but it is
    /// not the same as the result of [`Self::render()`].
    #[cfg(feature = "auto-threads")]
    pub fn render_parallel(&self, pixmap: &mut Pixmap) -> ShadowInfo {
        use penumbra_base::random::Random;
        use rand::SeedableRng as _;

        let start_time = Instant::now();
        let height = pixmap.height();
        let columns: Vec<Vec<(Color, ShadowInfo)>> = (0..pixmap.width())
            .into_par_iter()
            .map(|x| {
                let mut random = Random::seed_from_u64(x as u64);
                (0..height)
                    .map(|y| self.estimate_pixel(x, y, &mut random))
                    .collect()
            })
            .collect();

        let mut info = ShadowInfo::default();
        for (x, column) in columns.into_iter().enumerate() {
            for (y, (color, pixel_info)) in column.into_iter().enumerate() {
                pixmap.add_pixel(x, y, color);
                info += pixel_info;
            }
        }
        log::debug!(
            "soft shadow rendered in parallel in {:.3} s: {info}",
            start_time.elapsed().as_secs_f32()
        );
        info
    }
}

/// Statistics from [`SoftShadow`] rendering.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct ShadowInfo {
    /// Number of pixels estimated.
    pub pixels: usize,
    /// Number of rays traced.
    pub samples: u64,
    /// Number of rays which hit the occluder.
    pub hits: u64,
}

impl ShadowInfo {
    /// Fraction of rays which hit the occluder, or zero if none were traced.
    pub fn hit_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.hits as f64 / self.samples as f64
        }
    }
}

impl ops::Add for ShadowInfo {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}
impl ops::AddAssign for ShadowInfo {
    fn add_assign(&mut self, other: Self) {
        let Self {
            pixels,
            samples,
            hits,
        } = other;
        self.pixels += pixels;
        self.samples += samples;
        self.hits += hits;
    }
}
impl core::iter::Sum for ShadowInfo {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        let mut sum = Self::default();
        for part in iter {
            sum += part;
        }
        sum
    }
}

impl fmt::Display for ShadowInfo {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let &Self {
            pixels,
            samples,
            hits,
        } = self;
        write!(
            fmt,
            "{pixels} pixels, {samples} rays, {hits} hits ({:.1}%)",
            self.hit_ratio() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_base::euclid::point3;
    use penumbra_base::math::{Rectangle, Sphere};
    use penumbra_base::random::Random;
    use pretty_assertions::assert_eq;

    /// An [`RngCore`] that yields a predetermined sequence of `u64`s, then panics.
    #[derive(Debug)]
    struct Scripted {
        values: Vec<u64>,
        next: usize,
    }

    impl Scripted {
        fn new(values: &[u64]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            let value = self.values[self.next];
            self.next += 1;
            value
        }
        fn fill_bytes(&mut self, _: &mut [u8]) {
            unimplemented!()
        }
    }

    const HALF: u64 = 1 << 63;
    const QUARTER: u64 = 1 << 62;
    const THREE_QUARTERS: u64 = 3 << 62;

    /// Draws for one sample from the center of the pixel, straight up.
    const STRAIGHT_UP: [u64; 5] = [HALF, HALF, HALF, HALF, THREE_QUARTERS];
    /// Draws for one sample from the center of the pixel, straight down, which is then
    /// reflected to straight up.
    const STRAIGHT_DOWN: [u64; 5] = [HALF, HALF, HALF, HALF, QUARTER];
    /// Draws for one sample from the center of the pixel, at 45° toward +x.
    const SLANTED: [u64; 5] = [HALF, HALF, THREE_QUARTERS, HALF, THREE_QUARTERS];

    fn test_scene(occluder: impl Into<Occluder>, iterations: u32) -> SoftShadow {
        SoftShadow {
            occluder: occluder.into(),
            background: Color::BLACK,
            shadow: Color::WHITE,
            iterations: NonZeroU32::new(iterations).unwrap(),
        }
    }

    /// Covers only the center of pixel (0, 0), at height 10.
    const OVER_ORIGIN: Rectangle = Rectangle::new(0.0, 0.0, 10.0, 1.0, 1.0);

    #[test]
    fn single_sample_hit() {
        let scene = test_scene(OVER_ORIGIN, 1);
        let mut pixmap = Pixmap::new(1, 1);
        let info = scene.render(&mut pixmap, &mut Scripted::new(&STRAIGHT_UP));
        assert_eq!(pixmap.get_pixel(0, 0), blend(Color::BLACK, Color::WHITE));
        assert_eq!(
            info,
            ShadowInfo {
                pixels: 1,
                samples: 1,
                hits: 1
            }
        );
    }

    #[test]
    fn single_sample_miss() {
        let scene = test_scene(RoundedRectangle::new(50.0, 50.0, 10.0, 100.0, 100.0, 10.0), 1);
        let mut pixmap = Pixmap::new(1, 1);
        let info = scene.render(&mut pixmap, &mut Scripted::new(&STRAIGHT_UP));
        assert_eq!(pixmap.get_pixel(0, 0).unpremultiply(), Color::BLACK);
        assert_eq!(info.hits, 0);
    }

    #[test]
    fn downward_directions_are_reflected() {
        let scene = test_scene(OVER_ORIGIN, 1);
        let (color, info) = scene.estimate_pixel(0, 0, &mut Scripted::new(&STRAIGHT_DOWN));
        assert_eq!(color, Color::WHITE);
        assert_eq!(info.hits, 1);
    }

    #[test]
    fn mean_of_samples() {
        let scene = test_scene(OVER_ORIGIN, 2);
        let draws = [STRAIGHT_DOWN, SLANTED].concat();
        let (color, info) = scene.estimate_pixel(0, 0, &mut Scripted::new(&draws));
        // half coverage of white over opaque black
        assert_eq!(color, Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(
            info,
            ShadowInfo {
                pixels: 1,
                samples: 2,
                hits: 1
            }
        );
        assert_eq!(info.hit_ratio(), 0.5);
    }

    #[test]
    fn translucent_shadow_over_transparent() {
        let scene = SoftShadow {
            background: Color::TRANSPARENT,
            shadow: Color::new(0.0, 0.0, 0.5, 0.5),
            ..test_scene(OVER_ORIGIN, 2)
        };
        let draws = [STRAIGHT_UP, SLANTED].concat();
        let (color, _) = scene.estimate_pixel(0, 0, &mut Scripted::new(&draws));
        assert_eq!(color, Color::new(0.0, 0.0, 0.25, 0.25));
    }

    #[test]
    fn pixel_position_offsets_origin() {
        // The same draws from pixel (1, 0) land outside the occluder.
        let scene = test_scene(OVER_ORIGIN, 1);
        let (color, _) = scene.estimate_pixel(1, 0, &mut Scripted::new(&STRAIGHT_UP));
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn render_visits_columns_first() {
        let scene = test_scene(OVER_ORIGIN, 3);
        let mut pixmap = Pixmap::new(3, 2);
        let info = scene.render(&mut pixmap, &mut Random::new());

        let mut random = Random::new();
        for x in 0..3 {
            for y in 0..2 {
                let (expected, _) = scene.estimate_pixel(x, y, &mut random);
                assert_eq!(pixmap.get_pixel(x, y), expected, "({x}, {y})");
            }
        }
        assert_eq!((info.pixels, info.samples), (6, 18));
    }

    #[test]
    fn render_is_deterministic() {
        let scene = SoftShadow {
            iterations: NonZeroU32::new(16).unwrap(),
            ..SoftShadow::default()
        };
        let mut a = Pixmap::new(8, 8);
        let mut b = Pixmap::new(8, 8);
        let info_a = scene.render(&mut a, &mut Random::new());
        let info_b = scene.render(&mut b, &mut Random::new());
        assert_eq!(info_a, info_b);
        assert!(a.pixels().eq(b.pixels()));
    }

    #[test]
    fn default_scene_is_darker_away_from_occluder() {
        let scene = SoftShadow::default();
        let mut random = Random::new();
        let (center, _) = scene.estimate_pixel(100, 100, &mut random);
        let (near_corner, _) = scene.estimate_pixel(10, 10, &mut random);
        let (far_corner, _) = scene.estimate_pixel(199, 199, &mut random);
        assert_eq!(center.a, 1.0);
        assert!(center.r > 0.75, "{center:?}");
        assert!(near_corner.r < 0.3, "{near_corner:?}");
        assert!(far_corner.r < 0.3, "{far_corner:?}");
        assert!(center.r > near_corner.r);
    }

    #[test]
    fn sphere_occluder() {
        let scene = test_scene(Sphere::new(point3(0.5, 0.5, 10.0), 1.0), 1);
        let (color, _) = scene.estimate_pixel(0, 0, &mut Scripted::new(&STRAIGHT_UP));
        assert_eq!(color, Color::WHITE);
    }

    #[test]
    fn info_sum() {
        let one = ShadowInfo {
            pixels: 1,
            samples: 4,
            hits: 3,
        };
        assert_eq!(
            [one, one, one].into_iter().sum::<ShadowInfo>(),
            ShadowInfo {
                pixels: 3,
                samples: 12,
                hits: 9
            }
        );
        assert_eq!(one + ShadowInfo::default(), one);
        assert_eq!(ShadowInfo::default().hit_ratio(), 0.0);
        assert_eq!(one.to_string(), "1 pixels, 4 rays, 3 hits (75.0%)");
    }

    #[test]
    fn validate_ok() {
        assert_eq!(SoftShadow::default().validate(), Ok(()));
        assert_eq!(test_scene(OVER_ORIGIN, 1).validate(), Ok(()));
        assert_eq!(
            test_scene(Sphere::new(point3(0.0, 0.0, 5.0), 1.0), 1).validate(),
            Ok(())
        );
    }

    #[test]
    fn validate_radius() {
        let rect = RoundedRectangle::new(0.0, 0.0, 10.0, 20.0, 8.0, 5.0);
        assert_eq!(
            test_scene(rect, 1).validate(),
            Err(SceneError::RadiusTooLarge {
                radius: 5.0,
                side: 8.0
            })
        );
    }

    #[test]
    fn validate_negative() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, -20.0, 8.0);
        assert_eq!(
            test_scene(rect, 1).validate(),
            Err(SceneError::NegativeSize(rect.into()))
        );
        let sphere = Sphere::new(point3(0.0, 0.0, 5.0), -1.0);
        assert_eq!(
            test_scene(sphere, 1).validate(),
            Err(SceneError::NegativeSize(sphere.into()))
        );
    }

    #[test]
    fn validate_non_finite() {
        let rect = RoundedRectangle::new(0.0, f32::NAN, 10.0, 20.0, 8.0, 1.0);
        let error = test_scene(rect, 1).validate().unwrap_err();
        assert!(matches!(error, SceneError::NonFinite(_)), "{error:?}");
        let sphere = Sphere::new(point3(0.0, 0.0, f32::INFINITY), 1.0);
        let error = test_scene(sphere, 1).validate().unwrap_err();
        assert!(matches!(error, SceneError::NonFinite(_)), "{error:?}");
    }

    #[cfg(feature = "auto-threads")]
    #[test]
    fn parallel_is_deterministic() {
        let scene = SoftShadow {
            iterations: NonZeroU32::new(16).unwrap(),
            ..SoftShadow::default()
        };
        let mut a = Pixmap::new(16, 4);
        let mut b = Pixmap::new(16, 4);
        let info_a = scene.render_parallel(&mut a);
        let info_b = scene.render_parallel(&mut b);
        assert_eq!(info_a, info_b);
        assert_eq!((info_a.pixels, info_a.samples), (64, 1024));
        assert!(a.pixels().eq(b.pixels()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scene_from_json() {
        let json = r#"{
            "occluder": { "kind": "rounded_rectangle", "x": 1, "y": 2, "z": 3, "width": 40, "height": 50 },
            "iterations": 8
        }"#;
        let scene: SoftShadow = serde_json::from_str(json).unwrap();
        assert_eq!(
            scene,
            SoftShadow {
                occluder: RoundedRectangle::new(1.0, 2.0, 3.0, 40.0, 50.0, 0.0).into(),
                iterations: NonZeroU32::new(8).unwrap(),
                ..SoftShadow::default()
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scene_rejects_zero_iterations() {
        serde_json::from_str::<SoftShadow>(r#"{ "iterations": 0 }"#).unwrap_err();
    }
}
