//! glTF 2.0 document model, binary packing and serialization.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod accessors;
mod buffer;
mod builder;
mod glb;
mod materials;
mod table;
mod types;

pub use accessors::{AccessorLayout, AccessorRegistry};
pub use buffer::{
    AccessorData, AccessorType, BUFFER_ALIGNMENT, BufferTarget, ComponentType, TypedBuffer,
};
pub use builder::{
    AnimationBuilder, ExportArtifacts, ExportState, ExportStats, GltfBuilder, Interpolation,
    PRIMARY_BUFFER_NAME, PendingFile,
};
pub use glb::{CHUNK_BIN, CHUNK_JSON, GLB_MAGIC, GLB_VERSION, sort_keys, write_glb};
pub use materials::{
    AlphaMode, GltfImage, GltfMaterial, GltfPbrMetallicRoughness, GltfTexture, GltfTextureInfo,
};
pub use table::EntityTable;
pub use types::{
    AccessorBounds, GltfAccessor, GltfAnimation, GltfAnimationSampler, GltfAsset, GltfBuffer,
    GltfBufferView, GltfCamera, GltfChannel, GltfChannelTarget, GltfDocument, GltfMesh, GltfNode,
    GltfOrthographic, GltfPerspective, GltfPrimitive, GltfScene, PRIMITIVE_MODE_TRIANGLES,
};
