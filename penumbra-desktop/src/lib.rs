//! Components of the `penumbra` command-line program: logging setup, scene files, and
//! PNG output.
//!
//! This exists as a library primarily so that the binary's parts can be tested separately;
//! it is not intended as a general-purpose API.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

pub mod logging;
pub mod record;
mod scene_file;

pub use scene_file::load_scene;
