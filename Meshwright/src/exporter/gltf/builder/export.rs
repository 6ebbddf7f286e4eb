//! Document assembly and output for `GltfBuilder`

use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::options::{OutputFormat, ResourceFormat};

use super::super::accessors::AccessorRegistry;
use super::super::buffer::TypedBuffer;
use super::super::glb::write_glb;
use super::super::table::EntityTable;
use super::super::types::{GltfAsset, GltfBuffer, GltfDocument, GltfScene};
use super::material_methods::data_uri;
use super::{ExportState, GltfBuilder};

const DEFAULT_SCENE_NAME: &str = "defaultScene";
const BUFFER_MIME_TYPE: &str = "application/octet-stream";

/// A file produced by an export, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// File name relative to the output directory.
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl PendingFile {
    fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&self.contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&path)?;
        Ok(path)
    }
}

/// Entity counts of a finished export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub nodes: usize,
    pub meshes: usize,
    pub materials: usize,
    pub cameras: usize,
    pub images: usize,
    pub animation_channels: usize,
    pub buffer_bytes: usize,
}

/// Everything an export writes: the main `.gltf`/`.glb` file and any
/// `.bin` buffer or copied images beside it.
#[derive(Debug, Clone)]
pub struct ExportArtifacts {
    pub main: PendingFile,
    pub side_files: Vec<PendingFile>,
    pub stats: ExportStats,
}

impl ExportArtifacts {
    /// Write all files into `dir`, side files first and the main file last.
    /// Each file is written to a temporary file in `dir` and renamed over
    /// its destination, so an existing output is replaced only once its new
    /// contents are complete.
    ///
    /// # Errors
    /// Returns an IO error if the directory or any file cannot be written.
    pub fn commit(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.side_files.len() + 1);
        for file in &self.side_files {
            written.push(file.write_to(dir)?);
            tracing::debug!("Wrote {}", file.file_name);
        }
        written.push(self.main.write_to(dir)?);
        tracing::info!("Wrote {} ({} bytes)", self.main.file_name, self.main.contents.len());
        Ok(written)
    }
}

impl GltfBuilder {
    /// Assemble the document and serialize it in the output format.
    ///
    /// The session moves to [`ExportState::Done`] on success and
    /// [`ExportState::Failed`] on error; either way its tables are consumed
    /// and [`GltfBuilder::reset`] is needed before the next export.
    ///
    /// # Errors
    /// Returns [`Error::InvalidExportState`] if called outside
    /// [`ExportState::Collecting`], or any serialization error.
    pub fn finish(&mut self) -> Result<ExportArtifacts> {
        if self.state != ExportState::Collecting {
            return Err(Error::InvalidExportState {
                state: self.state.as_str(),
                expected: ExportState::Collecting.as_str(),
            });
        }

        self.state = match self.format {
            OutputFormat::Gltf => ExportState::EmittingGltf,
            OutputFormat::Glb => ExportState::EmittingGlb,
        };

        let result = match self.format {
            OutputFormat::Gltf => self.emit_gltf(),
            OutputFormat::Glb => self.emit_glb(),
        };
        self.state = if result.is_ok() { ExportState::Done } else { ExportState::Failed };
        result
    }

    fn emit_gltf(&mut self) -> Result<ExportArtifacts> {
        let buffer = self.buffer.take();
        let mut side_files = mem::take(&mut self.side_files);

        let buffer_entry = match &buffer {
            Some(buffer) if !buffer.is_empty() => {
                let uri = match self.options.resource_format {
                    ResourceFormat::Bin => {
                        let file_name = self.options.bin_file_name()?;
                        side_files.push(PendingFile {
                            file_name: file_name.clone(),
                            contents: buffer.as_bytes().to_vec(),
                        });
                        file_name
                    }
                    ResourceFormat::Embedded | ResourceFormat::Source => {
                        data_uri(BUFFER_MIME_TYPE, buffer.as_bytes())
                    }
                };
                Some(buffer_json(buffer, Some(uri)))
            }
            _ => None,
        };

        let (document, stats) = self.build_document(buffer_entry);
        let json = if self.options.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };

        Ok(ExportArtifacts {
            main: self.main_file(json)?,
            side_files,
            stats,
        })
    }

    fn emit_glb(&mut self) -> Result<ExportArtifacts> {
        let buffer = self.buffer.take().filter(|b| !b.is_empty());
        let side_files = mem::take(&mut self.side_files);

        let buffer_entry = buffer.as_ref().map(|b| buffer_json(b, None));
        let (document, stats) = self.build_document(buffer_entry);
        let glb = write_glb(&document, buffer.as_ref().map(TypedBuffer::as_bytes))?;

        Ok(ExportArtifacts {
            main: self.main_file(glb)?,
            side_files,
            stats,
        })
    }

    fn main_file(&self, contents: Vec<u8>) -> Result<PendingFile> {
        let output = &self.options.output;
        let file_name = output
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidPath(output.display().to_string()))?;
        Ok(PendingFile {
            file_name: file_name.to_string(),
            contents,
        })
    }

    /// Move the collected tables into a document.
    fn build_document(&mut self, buffer: Option<GltfBuffer>) -> (GltfDocument, ExportStats) {
        let (buffer_views, accessors) = mem::replace(&mut self.registry, AccessorRegistry::new())
            .into_parts();
        let animations: Vec<_> = self
            .animation
            .take()
            .and_then(super::AnimationBuilder::build)
            .into_iter()
            .collect();

        let stats = ExportStats {
            nodes: self.nodes.len(),
            meshes: self.meshes.len(),
            materials: self.materials.len(),
            cameras: self.cameras.len(),
            images: self.images.len(),
            animation_channels: animations.iter().map(|a| a.channels.len()).sum(),
            buffer_bytes: buffer.as_ref().map_or(0, |b| b.byte_length),
        };

        let document = GltfDocument {
            asset: GltfAsset {
                version: "2.0".to_string(),
                generator: Some(format!("Meshwright {}", crate::VERSION)),
            },
            scene: 0,
            scenes: vec![GltfScene {
                name: Some(DEFAULT_SCENE_NAME.to_string()),
                nodes: mem::take(&mut self.scene_nodes),
            }],
            nodes: mem::replace(&mut self.nodes, EntityTable::new()).into_vec(),
            meshes: mem::replace(&mut self.meshes, EntityTable::new()).into_vec(),
            cameras: mem::replace(&mut self.cameras, EntityTable::new()).into_vec(),
            materials: mem::replace(&mut self.materials, EntityTable::new()).into_vec(),
            textures: mem::replace(&mut self.textures, EntityTable::new()).into_vec(),
            images: mem::replace(&mut self.images, EntityTable::new()).into_vec(),
            animations,
            accessors,
            buffer_views,
            buffers: buffer.into_iter().collect(),
        };
        (document, stats)
    }
}

fn buffer_json(buffer: &TypedBuffer, uri: Option<String>) -> GltfBuffer {
    GltfBuffer {
        byte_length: buffer.len(),
        uri,
        name: Some(buffer.name().to_string()),
    }
}
