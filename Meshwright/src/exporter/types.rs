//! Progress events reported during an export
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::PathBuf;

use crate::options::OutputFormat;

use super::gltf::ExportStats;

/// Progress callback type for export operations
pub type ExportProgressCallback<'a> = &'a (dyn Fn(&ExportProgress) + Sync + Send);

/// One step of an export, carrying what that step knows.
#[derive(Debug, Clone)]
pub enum ExportProgress {
    /// Options accepted and a session opened for `output`.
    Started {
        output: PathBuf,
        format: OutputFormat,
    },
    /// A top-level node and its whole subtree have been packed.
    RootCollected {
        /// 1-based position among the top-level nodes.
        index: usize,
        total: usize,
        name: String,
    },
    /// Collected tables are being turned into the output container.
    Serializing {
        format: OutputFormat,
        buffer_bytes: usize,
    },
    /// Files are about to be committed next to `main`.
    Writing { main: String, files: usize },
    Finished { stats: ExportStats },
}

impl ExportProgress {
    #[must_use]
    pub fn phase(&self) -> ExportPhase {
        match self {
            Self::Started { .. } => ExportPhase::Preparing,
            Self::RootCollected { .. } => ExportPhase::CollectingScene,
            Self::Serializing { .. } => ExportPhase::BuildingDocument,
            Self::Writing { .. } => ExportPhase::WritingOutput,
            Self::Finished { .. } => ExportPhase::Complete,
        }
    }

    /// Share of top-level nodes collected so far, when collecting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn collected_fraction(&self) -> Option<f32> {
        match self {
            Self::RootCollected { index, total, .. } if *total > 0 => {
                Some(*index as f32 / *total as f32)
            }
            _ => None,
        }
    }
}

/// Coarse phase of an export, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Preparing,
    /// Walking the node hierarchy (meshes, cameras, materials, animation)
    CollectingScene,
    BuildingDocument,
    /// Writing .gltf/.bin/.glb and side files
    WritingOutput,
    Complete,
}

impl ExportPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::CollectingScene => "Collecting scene",
            Self::BuildingDocument => "Building document",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_and_fraction() {
        let collected = ExportProgress::RootCollected {
            index: 1,
            total: 4,
            name: "rig".to_string(),
        };
        assert_eq!(collected.phase(), ExportPhase::CollectingScene);
        assert_eq!(collected.collected_fraction(), Some(0.25));

        let serializing = ExportProgress::Serializing {
            format: OutputFormat::Glb,
            buffer_bytes: 64,
        };
        assert_eq!(serializing.phase().as_str(), "Building document");
        assert_eq!(serializing.collected_fraction(), None);

        let finished = ExportProgress::Finished {
            stats: ExportStats::default(),
        };
        assert_eq!(finished.phase(), ExportPhase::Complete);
    }
}
