use clap::Subcommand;
use std::path::PathBuf;

use crate::options::{AnimationMode, ResourceFormat};

pub mod export;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Export a scene description to .gltf or .glb
    Export {
        /// Scene description (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Output file (.gltf or .glb)
        #[arg(short, long)]
        output: PathBuf,

        /// Resource storage: embedded, source or bin
        #[arg(long, default_value = "bin")]
        resource_format: ResourceFormat,

        /// Animation export: none or keyed
        #[arg(long, default_value = "keyed")]
        animation: AnimationMode,

        /// Keep UV V coordinates as authored
        #[arg(long)]
        no_flip_v: bool,

        /// Indent the .gltf JSON
        #[arg(long)]
        pretty: bool,

        /// Translator option string, e.g. "resFormat=embedded;anim=keyed;vFlip=1;"
        /// (applied after the flags above)
        #[arg(long)]
        options: Option<String>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Summarize a scene description without exporting it
    InspectScene {
        /// Scene description (JSON)
        source: PathBuf,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Export {
                source,
                output,
                resource_format,
                animation,
                no_flip_v,
                pretty,
                options,
                quiet,
            } => export::execute(
                source,
                output,
                &export::ExportArgs {
                    resource_format: *resource_format,
                    animation: *animation,
                    flip_v: !*no_flip_v,
                    pretty: *pretty,
                    option_string: options.as_deref(),
                },
                *quiet,
            ),
            Commands::InspectScene { source } => inspect::execute(source),
        }
    }
}
