//! Command line option parsing.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use penumbra_base::math::{Color, Point};
use penumbra_desktop::logging::LoggingArgs;
use penumbra_render::{AlphaMode, FillRule};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "penumbra", author, about, version,
    help_template = "\
{name} {version}
{about-with-newline}
{usage-heading}
    {usage}

{all-args}{after-help}",
)]
pub(crate) struct PenumbraArgs {
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// Fill the image, or a polygon within it, with a solid color.
    Fill(FillArgs),
    /// Render the soft shadow of an occluder by Monte Carlo ray sampling.
    Shadow(ShadowArgs),
}

#[derive(Clone, Debug, clap::Args)]
pub(crate) struct FillArgs {
    /// Image size in pixels.
    #[arg(long = "size", value_name = "W×H", default_value = "100x100")]
    pub(crate) size: SizeArg,

    /// Fill color, as hexadecimal RRGGBB or RRGGBBAA.
    #[arg(long = "color", value_name = "HEX", default_value = "ffff00")]
    pub(crate) color: ColorArg,

    /// Vertices of a polygon to fill, as space-separated “x,y” pairs in pixel coordinates.
    /// If omitted, the entire image is filled.
    #[arg(long = "polygon", value_name = "POINTS")]
    pub(crate) polygon: Option<PolygonArg>,

    /// Rule for deciding which parts of a self-intersecting polygon are inside.
    #[arg(long = "fill-rule", value_enum, default_value_t = FillRuleArg::NonZero)]
    pub(crate) fill_rule: FillRuleArg,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Clone, Debug, clap::Args)]
pub(crate) struct ShadowArgs {
    /// Image size in pixels.
    #[arg(long = "size", value_name = "W×H", default_value = "200x200")]
    pub(crate) size: SizeArg,

    /// Number of rays to trace per pixel.
    /// Overrides the scene file; if neither specifies it, 1024 is used.
    #[arg(long = "iterations", value_name = "N")]
    pub(crate) iterations: Option<NonZeroU32>,

    /// JSON file describing the occluder and colors.
    /// If omitted, a rounded square casting a white shadow on black is used.
    #[arg(long = "scene", value_name = "FILE")]
    pub(crate) scene: Option<PathBuf>,

    /// Render on all available CPU cores. The result is different from (but statistically
    /// equivalent to) the single-threaded result.
    #[arg(long = "parallel")]
    pub(crate) parallel: bool,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Clone, Debug, clap::Args)]
pub(crate) struct OutputArgs {
    /// Output PNG file name.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub(crate) output_file: PathBuf,

    /// Whether the output file's color is divided by its alpha.
    #[arg(long = "alpha", value_enum, default_value_t = AlphaArg::Straight)]
    pub(crate) alpha: AlphaArg,
}

/// Image size in pixels, parseable in a variety of formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SizeArg {
    pub width: usize,
    pub height: usize,
}

impl FromStr for SizeArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [width, height]: [u32; 2] = s
            .split(&['×', 'x', ',', ';', ' '][..])
            .map(|s| match s.parse::<u32>() {
                Ok(i) if i > 0 => Ok(i),
                _ => Err(format!("{s:?} not a positive 32-bit integer")),
            })
            .collect::<Result<Vec<u32>, String>>()?
            .try_into()
            .map_err(|_| String::from("must be two integers"))?;
        let too_large = || format!("{width}×{height} is too large an image");
        let width = usize::try_from(width).map_err(|_| too_large())?;
        let height = usize::try_from(height).map_err(|_| too_large())?;
        // The pixmap must be addressable, both in pixels and in bytes.
        match width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(size_of::<Color>()))
        {
            Some(bytes) if isize::try_from(bytes).is_ok() => Ok(SizeArg { width, height }),
            _ => Err(too_large()),
        }
    }
}

/// Color in hexadecimal notation, with optional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorArg(pub Color);

impl FromStr for ColorArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(format!("{s:?} is not 6 or 8 hexadecimal digits"));
        }
        let components = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| format!("{s:?} is not hexadecimal: {e}"))?;
        let Color { r, g, b, .. } = Color::rgb8(components[0], components[1], components[2]);
        let a = components.get(3).map_or(1.0, |&a| f32::from(a) / 255.0);
        Ok(ColorArg(Color::new(r * a, g * a, b * a, a)))
    }
}

/// List of polygon vertices.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PolygonArg(pub Vec<Point>);

impl FromStr for PolygonArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vertices = s
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair
                    .split_once(',')
                    .ok_or_else(|| format!("{pair:?} is not of the form x,y"))?;
                let coordinate = |c: &str| {
                    c.parse::<f32>()
                        .ok()
                        .filter(|c| c.is_finite())
                        .ok_or_else(|| format!("{c:?} in {pair:?} is not a number"))
                };
                Ok(Point::new(coordinate(x)?, coordinate(y)?))
            })
            .collect::<Result<Vec<Point>, String>>()?;
        if vertices.len() < 3 {
            return Err(String::from("a polygon needs at least 3 vertices"));
        }
        Ok(PolygonArg(vertices))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub(crate) enum FillRuleArg {
    /// Inside where the boundary winds around a nonzero number of times.
    #[value(name = "nonzero")]
    NonZero,
    /// Inside where the boundary is crossed an odd number of times.
    EvenOdd,
}

impl From<FillRuleArg> for FillRule {
    fn from(value: FillRuleArg) -> Self {
        match value {
            FillRuleArg::NonZero => FillRule::NonZero,
            FillRuleArg::EvenOdd => FillRule::EvenOdd,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub(crate) enum AlphaArg {
    /// Color is divided by alpha, as most image viewers expect.
    Straight,
    /// Color is left multiplied by alpha.
    Premultiplied,
}

impl From<AlphaArg> for AlphaMode {
    fn from(value: AlphaArg) -> Self {
        match value {
            AlphaArg::Straight => AlphaMode::Straight,
            AlphaArg::Premultiplied => AlphaMode::Premultiplied,
        }
    }
}
