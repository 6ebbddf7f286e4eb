//! Core glTF 2.0 structure types.

use std::collections::BTreeMap;

use serde::Serialize;

use super::materials::{GltfImage, GltfMaterial, GltfTexture};

/// Asset metadata
#[derive(Debug, Clone, Serialize)]
pub struct GltfAsset {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

/// Scene definition
#[derive(Debug, Clone, Serialize)]
pub struct GltfScene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

/// Node in the scene graph. TRS is always written.
#[derive(Debug, Clone, Serialize)]
pub struct GltfNode {
    pub name: String,
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
    pub scale: [f64; 3],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<usize>,
}

/// Mesh definition
#[derive(Debug, Clone, Serialize)]
pub struct GltfMesh {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub primitives: Vec<GltfPrimitive>,
}

/// Triangle list primitive mode.
pub const PRIMITIVE_MODE_TRIANGLES: u32 = 4;

/// Mesh primitive (geometry + material)
#[derive(Debug, Clone, Serialize)]
pub struct GltfPrimitive {
    pub attributes: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,
    pub mode: u32,
}

/// Accessor `min`/`max`, written as integers for index accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccessorBounds {
    Float(Vec<f32>),
    Integer(Vec<u64>),
}

/// Accessor for typed buffer data
#[derive(Debug, Clone, Serialize)]
pub struct GltfAccessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: usize,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub accessor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<AccessorBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<AccessorBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Buffer view (slice of a buffer)
#[derive(Debug, Clone, Serialize)]
pub struct GltfBufferView {
    pub buffer: usize,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// Binary buffer. GLB buffers carry no `uri`.
#[derive(Debug, Clone, Serialize)]
pub struct GltfBuffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GltfPerspective {
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: f64,
    /// Vertical field of view in radians.
    pub yfov: f64,
    pub znear: f64,
    pub zfar: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GltfOrthographic {
    pub xmag: f64,
    pub ymag: f64,
    pub znear: f64,
    pub zfar: f64,
}

/// Camera with exactly one of `perspective` / `orthographic` set.
#[derive(Debug, Clone, Serialize)]
pub struct GltfCamera {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub camera_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<GltfPerspective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthographic: Option<GltfOrthographic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GltfChannelTarget {
    pub node: usize,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GltfChannel {
    pub sampler: usize,
    pub target: GltfChannelTarget,
}

#[derive(Debug, Clone, Serialize)]
pub struct GltfAnimationSampler {
    pub input: usize,
    pub output: usize,
    pub interpolation: String,
}

/// Animation; channel and sampler indices are local to it.
#[derive(Debug, Clone, Serialize)]
pub struct GltfAnimation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub channels: Vec<GltfChannel>,
    pub samplers: Vec<GltfAnimationSampler>,
}

/// Complete glTF document. Empty per-kind arrays are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct GltfDocument {
    pub asset: GltfAsset,
    pub scene: usize,
    pub scenes: Vec<GltfScene>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<GltfNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<GltfMesh>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cameras: Vec<GltfCamera>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<GltfMaterial>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<GltfTexture>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<GltfImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<GltfAnimation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<GltfAccessor>,
    #[serde(rename = "bufferViews")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<GltfBufferView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<GltfBuffer>,
}
