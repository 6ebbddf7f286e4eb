//! Image, texture, and material methods for `GltfBuilder`

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};
use crate::exporter::shading::{BaseColor, Emissive, MaterialParams, MetallicRoughness};
use crate::exporter::texture_packing::{has_alpha_channel, pack_metallic_roughness};
use crate::scene::{SceneSource, ShaderId, TextureRef};

use super::super::materials::{
    AlphaMode, GltfImage, GltfMaterial, GltfPbrMetallicRoughness, GltfTexture, GltfTextureInfo,
};
use super::export::PendingFile;
use super::{GltfBuilder, ImagePlacement};

/// Table key prefix for generated images, kept apart from source paths.
const GENERATED_KEY_PREFIX: &str = "generated:";

impl GltfBuilder {
    /// Resolve the material of a mesh. Shaders are deduplicated by name;
    /// unsupported shaders and meshes without a shader share the default
    /// material.
    pub(crate) fn material_for_shader<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        shader: Option<ShaderId>,
    ) -> Result<usize> {
        let Some(id) = shader else {
            return self.default_material();
        };

        let shader = source.shader(id)?;
        if let Some(index) = self.materials.index_of(&shader.name) {
            return Ok(index);
        }

        match MaterialParams::from_shader(&shader) {
            Some(params) => {
                let material = self.build_material(&params)?;
                Ok(self.materials.push_keyed(shader.name, material))
            }
            None => {
                tracing::warn!(
                    "Shader {} is not a supported shader type: {}",
                    shader.name,
                    shader.model.type_name()
                );
                self.default_material()
            }
        }
    }

    /// The shared fallback material, created on first use.
    pub(crate) fn default_material(&mut self) -> Result<usize> {
        if let Some(index) = self.default_material {
            return Ok(index);
        }
        let material = self.build_material(&MaterialParams::default_material())?;
        let index = self.materials.push(material);
        self.default_material = Some(index);
        Ok(index)
    }

    fn build_material(&mut self, params: &MaterialParams) -> Result<GltfMaterial> {
        let mut pbr = GltfPbrMetallicRoughness::default();

        let alpha_mode = match &params.base_color {
            BaseColor::Texture(texture) => {
                let (index, has_alpha) = self.base_color_texture(texture)?;
                pbr.base_color_texture = Some(GltfTextureInfo::new(index));
                if has_alpha { AlphaMode::Blend } else { AlphaMode::Opaque }
            }
            BaseColor::Factor(factor) => {
                pbr.base_color_factor = Some(*factor);
                if factor[3] < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque }
            }
        };

        match &params.metallic_roughness {
            MetallicRoughness::Factors {
                metallic,
                roughness,
            } => {
                pbr.metallic_factor = Some(*metallic);
                pbr.roughness_factor = Some(*roughness);
            }
            MetallicRoughness::PackedTexture {
                metallic,
                roughness,
            } => {
                let packed = pack_metallic_roughness(&params.name, &metallic.path, &roughness.path)?;
                let index = self.texture_from_bytes(&packed.file_name, packed.png);
                pbr.metallic_roughness_texture = Some(GltfTextureInfo::new(index));
            }
        }

        let normal_texture = self.optional_texture(params.normal.as_ref())?;
        let occlusion_texture = self.optional_texture(params.occlusion.as_ref())?;

        let (emissive_texture, emissive_factor) = match &params.emissive {
            Emissive::None => (None, None),
            Emissive::Factor(factor) => (None, Some(*factor)),
            Emissive::Texture { texture, intensity } => {
                let index = self.texture_from_file(&texture.path)?;
                (
                    Some(GltfTextureInfo::new(index)),
                    Some([*intensity, *intensity, *intensity]),
                )
            }
        };

        Ok(GltfMaterial {
            name: Some(params.name.clone()),
            pbr_metallic_roughness: pbr,
            normal_texture,
            occlusion_texture,
            emissive_texture,
            emissive_factor,
            alpha_mode,
        })
    }

    fn optional_texture(&mut self, texture: Option<&TextureRef>) -> Result<Option<GltfTextureInfo>> {
        texture
            .map(|t| self.texture_from_file(&t.path).map(GltfTextureInfo::new))
            .transpose()
    }

    /// Texture for a base color map, plus whether its image has alpha.
    /// Images that cannot be decoded are treated as opaque.
    fn base_color_texture(&mut self, texture: &TextureRef) -> Result<(usize, bool)> {
        let index = self.texture_from_file(&texture.path)?;
        if let Some(&has_alpha) = self.texture_alpha.get(&index) {
            return Ok((index, has_alpha));
        }

        let bytes = std::fs::read(&texture.path)?;
        let has_alpha = match has_alpha_channel(&bytes, &texture.path) {
            Ok(has_alpha) => has_alpha,
            Err(e) => {
                tracing::warn!("Cannot probe alpha, assuming opaque: {}", e);
                false
            }
        };
        self.texture_alpha.insert(index, has_alpha);
        Ok((index, has_alpha))
    }

    /// Texture for an image file. Each source path yields one image and one
    /// texture, however many materials use it.
    pub(crate) fn texture_from_file(&mut self, path: &Path) -> Result<usize> {
        let key = path.to_string_lossy().into_owned();
        if let Some(index) = self.textures.index_of(&key) {
            return Ok(index);
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(self.add_image_texture(key, file_name, bytes))
    }

    /// Texture for generated image bytes, keyed by file name.
    pub(crate) fn texture_from_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> usize {
        let key = format!("{GENERATED_KEY_PREFIX}{file_name}");
        if let Some(index) = self.textures.index_of(&key) {
            return index;
        }
        self.add_image_texture(key, file_name.to_string(), bytes)
    }

    /// `file_name`, or `<stem>_<n>.<ext>` if an earlier image already took it.
    fn unique_side_file_name(&mut self, file_name: &str) -> String {
        let path = Path::new(file_name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
        let ext = path.extension().and_then(|e| e.to_str());

        let mut candidate = file_name.to_string();
        let mut n = 1;
        while self.side_file_names.contains(&candidate.to_lowercase()) {
            candidate = match ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            n += 1;
        }
        self.side_file_names.insert(candidate.to_lowercase());
        candidate
    }

    fn add_image_texture(&mut self, key: String, file_name: String, bytes: Vec<u8>) -> usize {
        let mime_type = mime_type_for(&file_name);
        let mut image = GltfImage {
            uri: None,
            buffer_view: None,
            mime_type: Some(mime_type.clone()),
            name: Some(file_name.clone()),
        };

        match self.image_placement() {
            ImagePlacement::Buffer => {
                image.buffer_view = Some(self.create_image_view(&bytes));
            }
            ImagePlacement::DataUri => {
                image.uri = Some(data_uri(&mime_type, &bytes));
            }
            ImagePlacement::SideFile => {
                let side_name = self.unique_side_file_name(&file_name);
                if side_name != file_name {
                    tracing::warn!("Image {} renamed to {} to avoid a collision", file_name, side_name);
                }
                image.uri = Some(side_name.clone());
                self.side_files.push(PendingFile {
                    file_name: side_name,
                    contents: bytes,
                });
            }
        }

        let source = self.images.push_keyed(key.clone(), image);
        tracing::debug!("Added image {} ({})", file_name, mime_type);
        self.textures.push_keyed(
            key,
            GltfTexture {
                source,
                name: Some(file_name),
            },
        )
    }
}

/// `image/<ext>` from a file name, with `jpg` spelled `jpeg`.
pub(crate) fn mime_type_for(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" => "image/jpeg".to_string(),
        _ => format!("image/{ext}"),
    }
}

/// Base64 data URI.
pub(crate) fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ExportOptions, ResourceFormat};

    fn source_builder() -> GltfBuilder {
        let options = ExportOptions::new("scene.gltf").with_resource_format(ResourceFormat::Source);
        GltfBuilder::new(&options).unwrap()
    }

    #[test]
    fn test_side_file_names_are_unique() {
        let mut builder = source_builder();
        assert_eq!(builder.unique_side_file_name("tex.png"), "tex.png");
        assert_eq!(builder.unique_side_file_name("tex.png"), "tex_1.png");
        assert_eq!(builder.unique_side_file_name("TEX.png"), "TEX_2.png");
        assert_eq!(builder.unique_side_file_name("readme"), "readme");
        assert_eq!(builder.unique_side_file_name("readme"), "readme_1");

        builder.reset();
        assert_eq!(builder.unique_side_file_name("tex.png"), "tex.png");
    }

    #[test]
    fn test_generated_textures_keyed_apart_from_paths() {
        let mut builder = source_builder();
        let first = builder.texture_from_bytes("pbs_metalRough.png", vec![1, 2, 3]);
        let again = builder.texture_from_bytes("pbs_metalRough.png", vec![1, 2, 3]);
        assert_eq!(first, again);
        assert_eq!(builder.side_files.len(), 1);
        assert!(builder.textures.index_of("pbs_metalRough.png").is_none());
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("albedo.PNG"), "image/png");
        assert_eq!(mime_type_for("albedo.jpg"), "image/jpeg");
        assert_eq!(mime_type_for("albedo.jpeg"), "image/jpeg");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(
            data_uri("application/octet-stream", b"glTF"),
            "data:application/octet-stream;base64,Z2xURg=="
        );
    }
}
