//! Core mathematical types and functions of the penumbra soft-shadow renderer:
//!
//! * [`math`]: scalar helpers, premultiplied-alpha [`Color`](math::Color),
//!   planar lines and segments for scanline rasterization,
//!   and 3D rays with the shapes they may be intersected with.
//! * [`random`]: the deterministic pseudo-random source used for sampling and dithering.
//!
//! Every type here is a plain `Copy` value except [`random::Random`], whose state is
//! mutated by each draw and must be passed around explicitly.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

pub mod math;

pub mod random;

// reexport for convenience of dependents and our tests
#[doc(hidden)]
pub use euclid;
