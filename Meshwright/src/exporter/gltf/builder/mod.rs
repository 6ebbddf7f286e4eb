//! glTF 2.0 document builder.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! One [`GltfBuilder`] is one export session: it owns the primary buffer,
//! the accessor registry and every per-kind entity table. Nothing survives
//! between exports; [`GltfBuilder::reset`] returns a session to empty.

mod animation;
mod camera;
mod export;
mod material_methods;
mod mesh;
mod node;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::Result;
use crate::options::{ExportOptions, OutputFormat};
use crate::scene::{CameraId, MeshId};

use super::accessors::{AccessorLayout, AccessorRegistry};
use super::buffer::{AccessorData, TypedBuffer};
use super::materials::{GltfImage, GltfMaterial, GltfTexture};
use super::table::EntityTable;
use super::types::{GltfCamera, GltfMesh, GltfNode};

pub use animation::{AnimationBuilder, Interpolation};
pub use export::{ExportArtifacts, ExportStats, PendingFile};

/// Name of the single buffer every accessor lives in.
pub const PRIMARY_BUFFER_NAME: &str = "primary_buffer";

/// Serializer state of an export session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    /// Scene data is being packed.
    Collecting,
    /// Writing `.gltf` JSON and side files.
    EmittingGltf,
    /// Writing the `.glb` container.
    EmittingGlb,
    Done,
    Failed,
}

impl ExportState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::EmittingGltf => "emitting glTF",
            Self::EmittingGlb => "emitting GLB",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where image bytes end up for the current options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImagePlacement {
    /// A buffer view into the primary buffer.
    Buffer,
    /// A file written next to the output, referenced by name.
    SideFile,
    /// A base64 data URI.
    DataUri,
}

/// Builder for constructing glTF documents.
pub struct GltfBuilder {
    pub(crate) options: ExportOptions,
    pub(crate) format: OutputFormat,
    pub(crate) state: ExportState,
    pub(crate) buffer: Option<TypedBuffer>,
    pub(crate) registry: AccessorRegistry,
    pub(crate) scene_nodes: Vec<usize>,
    pub(crate) nodes: EntityTable<GltfNode>,
    pub(crate) meshes: EntityTable<GltfMesh>,
    pub(crate) cameras: EntityTable<GltfCamera>,
    pub(crate) materials: EntityTable<GltfMaterial>,
    pub(crate) images: EntityTable<GltfImage>,
    pub(crate) textures: EntityTable<GltfTexture>,
    pub(crate) animation: Option<AnimationBuilder>,
    pub(crate) side_files: Vec<PendingFile>,
    /// Lowercased names of image side files, for collision checks.
    side_file_names: HashSet<String>,
    mesh_indices: HashMap<MeshId, Option<usize>>,
    camera_indices: HashMap<CameraId, usize>,
    texture_alpha: HashMap<usize, bool>,
    default_material: Option<usize>,
}

impl GltfBuilder {
    /// Start a session for `options`.
    ///
    /// # Errors
    /// Returns a configuration error if the options are invalid.
    pub fn new(options: &ExportOptions) -> Result<Self> {
        let format = options.validate()?;
        Ok(Self {
            options: options.clone(),
            format,
            state: ExportState::Collecting,
            buffer: None,
            registry: AccessorRegistry::new(),
            scene_nodes: Vec::new(),
            nodes: EntityTable::new(),
            meshes: EntityTable::new(),
            cameras: EntityTable::new(),
            materials: EntityTable::new(),
            images: EntityTable::new(),
            textures: EntityTable::new(),
            animation: None,
            side_files: Vec::new(),
            side_file_names: HashSet::new(),
            mesh_indices: HashMap::new(),
            camera_indices: HashMap::new(),
            texture_alpha: HashMap::new(),
            default_material: None,
        })
    }

    /// Drop everything collected so far and return to [`ExportState::Collecting`].
    pub fn reset(&mut self) {
        self.state = ExportState::Collecting;
        self.buffer = None;
        self.registry.clear();
        self.scene_nodes.clear();
        self.nodes.clear();
        self.meshes.clear();
        self.cameras.clear();
        self.materials.clear();
        self.images.clear();
        self.textures.clear();
        self.animation = None;
        self.side_files.clear();
        self.side_file_names.clear();
        self.mesh_indices.clear();
        self.camera_indices.clear();
        self.texture_alpha.clear();
        self.default_material = None;
    }

    #[must_use]
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Current length of the primary buffer (0 before anything is packed).
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.as_ref().map_or(0, TypedBuffer::len)
    }

    pub(crate) fn create_accessor(
        &mut self,
        data: AccessorData<'_>,
        layout: AccessorLayout,
        name: String,
    ) -> Result<usize> {
        let buffer = self
            .buffer
            .get_or_insert_with(|| TypedBuffer::new(PRIMARY_BUFFER_NAME));
        self.registry
            .create_accessor(buffer, 0, data, layout, Some(name))
    }

    pub(crate) fn create_image_view(&mut self, bytes: &[u8]) -> usize {
        let buffer = self
            .buffer
            .get_or_insert_with(|| TypedBuffer::new(PRIMARY_BUFFER_NAME));
        self.registry.create_image_view(buffer, 0, bytes)
    }

    pub(crate) fn image_placement(&self) -> ImagePlacement {
        use crate::options::ResourceFormat;

        match (self.format, self.options.resource_format) {
            (_, ResourceFormat::Source) => ImagePlacement::SideFile,
            (OutputFormat::Gltf, ResourceFormat::Embedded) => ImagePlacement::DataUri,
            (OutputFormat::Glb, _) | (OutputFormat::Gltf, ResourceFormat::Bin) => {
                ImagePlacement::Buffer
            }
        }
    }
}
