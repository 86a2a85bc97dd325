use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use penumbra_render::SoftShadow;

/// Reads a [`SoftShadow`] scene description from a JSON file, and checks that it is valid.
///
/// Fields missing from the file take their values from [`SoftShadow::default()`].
pub fn load_scene(path: &Path) -> Result<SoftShadow, anyhow::Error> {
    let file = File::open(path)
        .with_context(|| format!("failed to open scene file {}", path.display()))?;
    let scene: SoftShadow = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse scene file {}", path.display()))?;
    scene
        .validate()
        .with_context(|| format!("invalid scene in {}", path.display()))?;
    log::trace!("loaded scene from {}: {scene:?}", path.display());
    Ok(scene)
}
