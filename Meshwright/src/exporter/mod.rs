//! Scene to glTF export
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! [`export_scene`] drives one complete export: it walks a [`SceneSource`],
//! packs geometry, materials, cameras and animation into a single binary
//! buffer, and writes `.gltf` (plus `.bin` or side images) or `.glb`.
//!
//! [`SceneSource`]: crate::scene::SceneSource

mod convert;
pub mod dedup;
pub mod gltf;
pub mod shading;
pub mod texture_packing;
mod types;

pub use convert::{ExportSummary, export_scene, export_scene_to_artifacts, export_scene_with_progress};
pub use dedup::{MeshGeometry, deduplicate, flip_v_coordinate};
pub use gltf::{ExportArtifacts, ExportState, ExportStats, GltfBuilder, PendingFile};
pub use shading::{DEFAULT_MATERIAL_NAME, MaterialParams};
pub use types::{ExportPhase, ExportProgress, ExportProgressCallback};
