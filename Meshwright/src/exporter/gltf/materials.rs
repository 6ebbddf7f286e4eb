//! glTF 2.0 material, texture and image types.

use serde::Serialize;

/// Image stored as a URI (file name or data URI) or in a buffer view.
#[derive(Debug, Clone, Serialize)]
pub struct GltfImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "bufferView")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    #[serde(rename = "mimeType")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Texture referencing an image
#[derive(Debug, Clone, Serialize)]
pub struct GltfTexture {
    pub source: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Texture info used in materials
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GltfTextureInfo {
    pub index: usize,
}

impl GltfTextureInfo {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

/// PBR metallic-roughness block. Factors and textures are mutually
/// exclusive per channel; absent fields fall back to glTF defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GltfPbrMetallicRoughness {
    #[serde(rename = "baseColorFactor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f64; 4]>,
    #[serde(rename = "baseColorTexture")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<GltfTextureInfo>,
    #[serde(rename = "metallicFactor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic_factor: Option<f64>,
    #[serde(rename = "roughnessFactor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness_factor: Option<f64>,
    #[serde(rename = "metallicRoughnessTexture")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<GltfTextureInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    Opaque,
    Blend,
}

/// Material definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GltfMaterial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: GltfPbrMetallicRoughness,
    #[serde(rename = "normalTexture")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<GltfTextureInfo>,
    #[serde(rename = "occlusionTexture")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<GltfTextureInfo>,
    #[serde(rename = "emissiveTexture")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<GltfTextureInfo>,
    #[serde(rename = "emissiveFactor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_factor: Option<[f64; 3]>,
    #[serde(rename = "alphaMode")]
    pub alpha_mode: AlphaMode,
}
