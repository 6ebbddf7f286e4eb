//! # Meshwright
//!
//! A pure-Rust glTF 2.0 exporter for scene graphs.
//!
//! ## Pipeline
//!
//! - **Scene** - the host is queried through [`scene::SceneSource`]
//! - **Deduplication** - per-corner face-vertex streams become indexed vertex arrays
//! - **Packing** - all geometry, keyframes and embedded images share one aligned buffer
//! - **Materials** - lambert/phong/blinn, `aiStandardSurface` and Stingray PBS shaders
//! - **Output** - `.gltf` with `.bin`, data URIs or copied images, or a `.glb` container
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshwright::prelude::*;
//!
//! let scene = SceneDescription::load("scene.json".as_ref())?;
//! let options = ExportOptions::new("out/scene.glb").with_animation(AnimationMode::Keyed);
//! let summary = export_scene(&scene, &options)?;
//! println!("Wrote {} ({} meshes)", summary.output.display(), summary.stats.meshes);
//! # Ok::<(), meshwright::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `meshwright` command-line binary

pub mod error;
pub mod exporter;
pub mod options;
pub mod scene;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::exporter::{
        ExportArtifacts, ExportPhase, ExportProgress, ExportStats, ExportSummary, GltfBuilder,
        export_scene, export_scene_to_artifacts, export_scene_with_progress,
    };
    pub use crate::options::{AnimationMode, ExportOptions, OutputFormat, ResourceFormat};
    pub use crate::scene::{
        MeshDescription, NodeDescription, SceneDescription, SceneSource, ShadingModel,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
