//! Binary for the penumbra renderer.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use clap::Parser as _;

use penumbra_base::random::Random;
use penumbra_desktop::record::write_pixmap;
use penumbra_desktop::{load_scene, logging};
use penumbra_render::{Pixmap, SoftShadow, fill_polygon};

mod command_options;
use command_options::{
    ColorArg, Command, FillArgs, OutputArgs, PenumbraArgs, PolygonArg, ShadowArgs, SizeArg,
};

fn main() -> Result<(), anyhow::Error> {
    let PenumbraArgs { logging, command } = PenumbraArgs::parse();
    logging::install(&logging)?;

    match command {
        Command::Fill(args) => fill_main(args),
        Command::Shadow(args) => shadow_main(args),
    }
}

fn fill_main(args: FillArgs) -> Result<(), anyhow::Error> {
    let FillArgs {
        size: SizeArg { width, height },
        color: ColorArg(color),
        polygon,
        fill_rule,
        output: OutputArgs { output_file, alpha },
    } = args;

    let mut pixmap = Pixmap::new(width, height);
    match polygon {
        Some(PolygonArg(vertices)) => {
            fill_polygon(&mut pixmap, &vertices, color, fill_rule.into());
        }
        None => pixmap.fill(color),
    }

    write_pixmap(&output_file, &pixmap, alpha.into())
}

fn shadow_main(args: ShadowArgs) -> Result<(), anyhow::Error> {
    let ShadowArgs {
        size: SizeArg { width, height },
        iterations,
        scene,
        parallel,
        output: OutputArgs { output_file, alpha },
    } = args;

    let mut scene = match scene {
        Some(path) => load_scene(&path)?,
        None => SoftShadow::default(),
    };
    if let Some(iterations) = iterations {
        scene.iterations = iterations;
    }
    log::debug!("rendering {scene:?}");

    let mut pixmap = Pixmap::new(width, height);
    let info = if parallel {
        scene.render_parallel(&mut pixmap)
    } else {
        scene.render(&mut pixmap, &mut Random::new())
    };
    log::info!("traced {info}");

    write_pixmap(&output_file, &pixmap, alpha.into())
}
