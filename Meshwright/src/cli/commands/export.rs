//! CLI interface for scene export

use std::path::Path;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::cli::progress::{CUBE, DISK, LOOKING_GLASS, print_done, print_step, simple_spinner};
use crate::exporter::{ExportProgress, export_scene_with_progress};
use crate::options::{AnimationMode, ExportOptions, ResourceFormat};
use crate::scene::SceneDescription;

/// Export settings taken from the command line.
pub struct ExportArgs<'a> {
    pub resource_format: ResourceFormat,
    pub animation: AnimationMode,
    pub flip_v: bool,
    pub pretty: bool,
    pub option_string: Option<&'a str>,
}

pub fn execute(source: &Path, output: &Path, args: &ExportArgs, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    let mut options = ExportOptions::new(output)
        .with_resource_format(args.resource_format)
        .with_animation(args.animation)
        .with_flip_v(args.flip_v)
        .with_pretty(args.pretty);
    if let Some(option_string) = args.option_string {
        options.apply_option_string(option_string)?;
    }
    options.validate()?;

    if !quiet {
        print_step(1, 3, LOOKING_GLASS, &format!("Reading {}", source.display()));
    }
    let scene = SceneDescription::load(source)?;

    if !quiet {
        print_step(2, 3, CUBE, "Building glTF document...");
    }
    let spinner = if quiet { ProgressBar::hidden() } else { simple_spinner("Collecting scene") };
    let report = |p: &ExportProgress| match p {
        ExportProgress::RootCollected { index, total, name } => {
            spinner.set_message(format!("{} [{index}/{total}] {name}", p.phase().as_str()));
        }
        ExportProgress::Writing { main, .. } => {
            spinner.set_message(format!("{} {main}", p.phase().as_str()));
        }
        _ => spinner.set_message(p.phase().as_str()),
    };
    let result = export_scene_with_progress(&scene, &options, &report);
    spinner.finish_and_clear();
    let summary = result?;

    if !quiet {
        print_step(3, 3, DISK, &format!("Wrote {}", summary.output.display()));
        for path in summary.written.iter().filter(|p| **p != summary.output) {
            println!("      {}", path.display());
        }
        let stats = summary.stats;
        println!(
            "      {} nodes, {} meshes, {} materials, {} cameras, {} images, {} animation channels ({} buffer bytes)",
            stats.nodes,
            stats.meshes,
            stats.materials,
            stats.cameras,
            stats.images,
            stats.animation_channels,
            stats.buffer_bytes
        );
        print_done(started.elapsed());
    }

    Ok(())
}
