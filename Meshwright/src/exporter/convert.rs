//! Scene export entry points.

use std::path::PathBuf;

use crate::error::Result;
use crate::options::ExportOptions;
use crate::scene::SceneSource;

use super::gltf::{ExportArtifacts, ExportStats, GltfBuilder};
use super::types::{ExportProgress, ExportProgressCallback};

/// Result of an export written to disk.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// The main `.gltf` or `.glb` file.
    pub output: PathBuf,
    /// Every file written, side files first.
    pub written: Vec<PathBuf>,
    pub stats: ExportStats,
}

/// Export a scene to the file named by `options.output`.
///
/// # Errors
/// Returns an error if the options are invalid, the scene is empty, or any
/// file cannot be read or written. Nothing is written when an error occurs
/// before the output stage.
pub fn export_scene<S: SceneSource + ?Sized>(
    source: &S,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    export_scene_with_progress(source, options, &|_| {})
}

/// Export a scene with progress callback.
///
/// # Errors
/// See [`export_scene`].
pub fn export_scene_with_progress<S: SceneSource + ?Sized>(
    source: &S,
    options: &ExportOptions,
    progress: ExportProgressCallback,
) -> Result<ExportSummary> {
    let artifacts = export_scene_to_artifacts(source, options, progress)?;

    progress(&ExportProgress::Writing {
        main: artifacts.main.file_name.clone(),
        files: artifacts.side_files.len() + 1,
    });
    let written = artifacts.commit(options.output_dir())?;

    progress(&ExportProgress::Finished {
        stats: artifacts.stats,
    });
    Ok(ExportSummary {
        output: options.output_dir().join(&artifacts.main.file_name),
        written,
        stats: artifacts.stats,
    })
}

/// Run an export without touching the filesystem beyond reading textures.
///
/// # Errors
/// See [`export_scene`].
pub fn export_scene_to_artifacts<S: SceneSource + ?Sized>(
    source: &S,
    options: &ExportOptions,
    progress: ExportProgressCallback,
) -> Result<ExportArtifacts> {
    let mut builder = GltfBuilder::new(options)?;
    progress(&ExportProgress::Started {
        output: options.output.clone(),
        format: builder.format,
    });
    tracing::debug!(
        "Exporting {} (resources: {}, animation: {})",
        options.output.display(),
        options.resource_format.as_str(),
        options.animation.as_str()
    );

    builder.collect_scene(source, progress)?;

    progress(&ExportProgress::Serializing {
        format: builder.format,
        buffer_bytes: builder.buffer_len(),
    });
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::exporter::types::ExportPhase;
    use crate::scene::SceneDescription;
    use std::sync::Mutex;

    #[test]
    fn test_empty_scene_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("empty.glb");
        let result = export_scene(&SceneDescription::default(), &ExportOptions::new(&output));
        assert!(matches!(result, Err(Error::EmptyScene)));
        assert!(!output.exists());
    }

    #[test]
    fn test_progress_phases() {
        let mut scene = SceneDescription::default();
        scene.push_node(crate::scene::NodeDescription::new("locator"));

        let phases = Mutex::new(Vec::new());
        let record = |p: &ExportProgress| {
            if let Ok(mut phases) = phases.lock() {
                phases.push(p.phase());
            }
        };
        let artifacts =
            export_scene_to_artifacts(&scene, &ExportOptions::new("scene.gltf"), &record).unwrap();
        assert_eq!(artifacts.stats.nodes, 1);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec![
                ExportPhase::Preparing,
                ExportPhase::CollectingScene,
                ExportPhase::BuildingDocument
            ]
        );
    }
}
