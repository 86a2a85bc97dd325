//! Rendering for the penumbra toolkit: a [`Pixmap`] that accumulates color, scanline
//! polygon filling, and the Monte Carlo [`SoftShadow`] estimator.
//!
//! The finished [`Pixmap`] is converted to 8-bit samples by [`quantize()`]; writing those
//! to a file is left to the caller.
//!
//! ## Package features
//!
//! This package, `penumbra-render`, defines the following feature flags:
//!
//! * `"auto-threads"`:
//!   Adds `SoftShadow::render_parallel()`, which uses `rayon`’s global thread pool.
//! * `"serde"`:
//!   Adds `Serialize` and `Deserialize` implementations for [`SoftShadow`] and the types it
//!   contains, so that scenes may be loaded from files.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

// -------------------------------------------------------------------------------------------------

mod pixmap;
pub use pixmap::Pixmap;

mod quantize;
pub use quantize::{AlphaMode, quantize};

mod raster;
pub use raster::{FillRule, fill_polygon};

mod shadow;
pub use shadow::{ShadowInfo, SoftShadow};

// -------------------------------------------------------------------------------------------------

/// An error indicating that a [`SoftShadow`] scene description cannot be rendered
/// meaningfully.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SceneError {
    /// A coordinate or size of the occluder is NaN or infinite.
    #[error("occluder has a non-finite coordinate: {0:?}")]
    NonFinite(penumbra_base::math::Occluder),

    /// The occluder has a negative width, height, or radius.
    #[error("occluder has a negative size: {0:?}")]
    NegativeSize(penumbra_base::math::Occluder),

    /// The corner radius of a rounded rectangle is more than half its width or height.
    #[error(
        "rounded rectangle radius {radius} is more than half of its smaller side {side}"
    )]
    RadiusTooLarge {
        /// The radius given.
        radius: f32,
        /// The smaller of the width and height.
        side: f32,
    },
}
