//! Metallic/roughness texture packing and image probing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::error::{Error, Result};

/// A generated PNG texture.
#[derive(Debug, Clone)]
pub struct PackedTexture {
    /// File name, `<material>_metalRough.png`.
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Read and decode an image file.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| Error::ImageProcessingFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Whether encoded image bytes carry an alpha channel.
///
/// # Errors
/// Returns an error if the bytes cannot be decoded.
pub fn has_alpha_channel(bytes: &[u8], path: &Path) -> Result<bool> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::ImageProcessingFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(img.color().has_alpha())
}

/// Pack separate metallic and roughness maps into one glTF
/// metallic-roughness texture: roughness in green, metallic in blue.
///
/// # Errors
/// Returns [`Error::TextureDimensionMismatch`] if the maps differ in size.
pub fn pack_metallic_roughness_images(
    material: &str,
    metallic: &DynamicImage,
    roughness: &DynamicImage,
) -> Result<RgbImage> {
    let (metallic_width, metallic_height) = metallic.dimensions();
    let (roughness_width, roughness_height) = roughness.dimensions();
    if (metallic_width, metallic_height) != (roughness_width, roughness_height) {
        return Err(Error::TextureDimensionMismatch {
            material: material.to_string(),
            metallic_width,
            metallic_height,
            roughness_width,
            roughness_height,
        });
    }

    let metallic = metallic.to_rgb8();
    let roughness = roughness.to_rgb8();
    Ok(RgbImage::from_fn(metallic_width, metallic_height, |x, y| {
        let Rgb([_, _, metal_b]) = *metallic.get_pixel(x, y);
        let Rgb([_, rough_g, _]) = *roughness.get_pixel(x, y);
        Rgb([0, rough_g, metal_b])
    }))
}

/// Load both maps from disk, pack them and encode the result as PNG.
///
/// # Errors
/// Returns an error if either map cannot be decoded, the dimensions
/// differ, or PNG encoding fails.
pub fn pack_metallic_roughness(
    material: &str,
    metallic_path: &Path,
    roughness_path: &Path,
) -> Result<PackedTexture> {
    let metallic = open_image(metallic_path)?;
    let roughness = open_image(roughness_path)?;
    let packed = pack_metallic_roughness_images(material, &metallic, &roughness)?;

    let file_name = format!("{material}_metalRough.png");
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    packed
        .write_with_encoder(encoder)
        .map_err(|e| Error::ImageProcessingFailed {
            path: file_name.clone().into(),
            message: format!("Failed to encode PNG: {e}"),
        })?;

    tracing::debug!(
        "Packed metallic-roughness texture {} ({}x{})",
        file_name,
        packed.width(),
        packed.height()
    );
    Ok(PackedTexture { file_name, png })
}
