//! Shading-model extraction
//!
//! Each supported host shading model is reduced to a [`MaterialParams`]
//! describing a glTF metallic-roughness material. Unsupported models yield
//! `None`; the caller substitutes the shared default material.

use crate::scene::{
    AiStandardSurfaceAttributes, LambertKind, LambertLikeAttributes, ShaderSource, ShadingModel,
    StingrayMap, StingrayPbsAttributes, TextureRef,
};

/// Name of the material shared by all unsupported shaders.
pub const DEFAULT_MATERIAL_NAME: &str = "glTFDefaultMaterial";

/// `cosinePower` at which a phong surface counts as perfectly smooth.
const PHONG_MAX_COSINE_POWER: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum BaseColor {
    Texture(TextureRef),
    /// RGBA; alpha below 1 makes the material blended.
    Factor([f64; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetallicRoughness {
    Factors { metallic: f64, roughness: f64 },
    /// Separate maps, packed into one texture at export time.
    PackedTexture {
        metallic: TextureRef,
        roughness: TextureRef,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Emissive {
    None,
    Factor([f64; 3]),
    Texture { texture: TextureRef, intensity: f64 },
}

/// Normalized parameters of one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub name: String,
    pub base_color: BaseColor,
    pub metallic_roughness: MetallicRoughness,
    pub normal: Option<TextureRef>,
    pub occlusion: Option<TextureRef>,
    pub emissive: Emissive,
}

impl MaterialParams {
    /// The neutral grey stand-in for unsupported shaders.
    #[must_use]
    pub fn default_material() -> Self {
        Self {
            name: DEFAULT_MATERIAL_NAME.to_string(),
            base_color: BaseColor::Factor([0.5, 0.5, 0.5, 1.0]),
            metallic_roughness: MetallicRoughness::Factors {
                metallic: 0.0,
                roughness: 1.0,
            },
            normal: None,
            occlusion: None,
            emissive: Emissive::None,
        }
    }

    /// Extract parameters from a host shader, or `None` if its shading model
    /// is not supported.
    #[must_use]
    pub fn from_shader(shader: &ShaderSource) -> Option<Self> {
        let name = shader.name.clone();
        let params = match &shader.model {
            ShadingModel::LambertLike(attrs) => lambert_like(name, attrs),
            ShadingModel::AiStandardSurface(attrs) => ai_standard_surface(name, attrs),
            ShadingModel::StingrayPbs(attrs) => stingray_pbs(name, attrs),
            ShadingModel::Unsupported { .. } => return None,
        };
        Some(params)
    }
}

fn average(values: &[f64; 3]) -> f64 {
    values.iter().sum::<f64>() / 3.0
}

fn factor_with_alpha(color: [f64; 3], alpha: f64) -> [f64; 4] {
    [color[0], color[1], color[2], alpha]
}

fn lambert_like(name: String, attrs: &LambertLikeAttributes) -> MaterialParams {
    let base_color = match &attrs.color_texture {
        Some(texture) => BaseColor::Texture(texture.clone()),
        None => BaseColor::Factor(factor_with_alpha(
            attrs.color,
            1.0 - average(&attrs.transparency),
        )),
    };

    let (metallic, roughness) = match attrs.kind {
        LambertKind::Lambert => (0.0, 1.0),
        LambertKind::Blinn => (attrs.specular_roll_off, attrs.eccentricity),
        LambertKind::Phong => (
            1.0,
            1.0 - (attrs.cosine_power / PHONG_MAX_COSINE_POWER).min(1.0),
        ),
    };

    MaterialParams {
        name,
        base_color,
        metallic_roughness: MetallicRoughness::Factors {
            metallic,
            roughness,
        },
        normal: None,
        occlusion: None,
        emissive: Emissive::None,
    }
}

fn ai_standard_surface(name: String, attrs: &AiStandardSurfaceAttributes) -> MaterialParams {
    let base_color = match &attrs.base_color_texture {
        Some(texture) => BaseColor::Texture(texture.clone()),
        None => BaseColor::Factor(factor_with_alpha(attrs.base_color, average(&attrs.opacity))),
    };

    MaterialParams {
        name,
        base_color,
        metallic_roughness: MetallicRoughness::Factors {
            metallic: attrs.metalness,
            roughness: attrs.specular_roughness,
        },
        normal: None,
        occlusion: None,
        emissive: Emissive::None,
    }
}

fn stingray_pbs(name: String, attrs: &StingrayPbsAttributes) -> MaterialParams {
    let active = |map: Option<&StingrayMap>| map.and_then(StingrayMap::active).cloned();

    let base_color = match active(attrs.color_map.as_ref()) {
        Some(texture) => BaseColor::Texture(texture),
        None => BaseColor::Factor(factor_with_alpha(attrs.base_color, 1.0)),
    };

    let metallic_map = active(attrs.metallic_map.as_ref());
    let roughness_map = active(attrs.roughness_map.as_ref());
    let metallic_roughness = match (metallic_map, roughness_map) {
        (Some(metallic), Some(roughness)) => MetallicRoughness::PackedTexture {
            metallic,
            roughness,
        },
        _ => MetallicRoughness::Factors {
            metallic: attrs.metallic,
            roughness: attrs.roughness,
        },
    };

    let emissive = match active(attrs.emissive_map.as_ref()) {
        Some(texture) => Emissive::Texture {
            texture,
            intensity: attrs.emissive_intensity,
        },
        None => Emissive::Factor(attrs.emissive),
    };

    MaterialParams {
        name,
        base_color,
        metallic_roughness,
        normal: active(attrs.normal_map.as_ref()),
        occlusion: active(attrs.ao_map.as_ref()),
        emissive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lambert(kind: LambertKind) -> LambertLikeAttributes {
        LambertLikeAttributes {
            kind,
            color: [0.2, 0.4, 0.6],
            color_texture: None,
            transparency: [0.25, 0.25, 0.25],
            specular_roll_off: 0.7,
            eccentricity: 0.3,
            cosine_power: 500.0,
        }
    }

    fn shader(model: ShadingModel) -> ShaderSource {
        ShaderSource {
            name: "mat".to_string(),
            model,
        }
    }

    fn factors(params: &MaterialParams) -> (f64, f64) {
        match params.metallic_roughness {
            MetallicRoughness::Factors {
                metallic,
                roughness,
            } => (metallic, roughness),
            MetallicRoughness::PackedTexture { .. } => panic!("expected factors"),
        }
    }

    #[test]
    fn test_lambert_family() {
        let params =
            MaterialParams::from_shader(&shader(ShadingModel::LambertLike(lambert(LambertKind::Lambert))))
                .unwrap();
        assert_eq!(params.base_color, BaseColor::Factor([0.2, 0.4, 0.6, 0.75]));
        assert_eq!(factors(&params), (0.0, 1.0));

        let params =
            MaterialParams::from_shader(&shader(ShadingModel::LambertLike(lambert(LambertKind::Blinn))))
                .unwrap();
        assert_eq!(factors(&params), (0.7, 0.3));

        let params =
            MaterialParams::from_shader(&shader(ShadingModel::LambertLike(lambert(LambertKind::Phong))))
                .unwrap();
        assert_eq!(factors(&params), (1.0, 0.75));

        let mut glossy = lambert(LambertKind::Phong);
        glossy.cosine_power = 5000.0;
        let params = MaterialParams::from_shader(&shader(ShadingModel::LambertLike(glossy))).unwrap();
        assert_eq!(factors(&params), (1.0, 0.0));
    }

    #[test]
    fn test_ai_standard_surface() {
        let attrs = AiStandardSurfaceAttributes {
            base_color: [1.0, 0.0, 0.0],
            base_color_texture: None,
            opacity: [0.5, 0.5, 0.5],
            metalness: 0.9,
            specular_roughness: 0.2,
        };
        let params = MaterialParams::from_shader(&shader(ShadingModel::AiStandardSurface(attrs))).unwrap();
        assert_eq!(params.base_color, BaseColor::Factor([1.0, 0.0, 0.0, 0.5]));
        assert_eq!(factors(&params), (0.9, 0.2));
    }

    #[test]
    fn test_stingray_maps_respect_toggles() {
        let map = |path: &str, enabled: bool| {
            Some(StingrayMap {
                texture: Some(TextureRef { path: path.into() }),
                enabled,
            })
        };
        let attrs = StingrayPbsAttributes {
            base_color: [0.1, 0.1, 0.1],
            color_map: map("color.png", false),
            metallic: 0.4,
            metallic_map: map("metal.png", true),
            roughness: 0.6,
            roughness_map: map("rough.png", true),
            normal_map: map("normal.png", true),
            ao_map: None,
            emissive: [0.0, 0.0, 0.0],
            emissive_map: map("glow.png", true),
            emissive_intensity: 2.0,
        };

        let params = MaterialParams::from_shader(&shader(ShadingModel::StingrayPbs(attrs.clone()))).unwrap();
        assert_eq!(params.base_color, BaseColor::Factor([0.1, 0.1, 0.1, 1.0]));
        assert!(matches!(params.metallic_roughness, MetallicRoughness::PackedTexture { .. }));
        assert_eq!(params.normal.unwrap().path, std::path::PathBuf::from("normal.png"));
        assert!(params.occlusion.is_none());
        assert!(matches!(params.emissive, Emissive::Texture { intensity, .. } if intensity == 2.0));

        let mut unpacked = attrs;
        unpacked.roughness_map = map("rough.png", false);
        unpacked.emissive_map = None;
        let params = MaterialParams::from_shader(&shader(ShadingModel::StingrayPbs(unpacked))).unwrap();
        assert_eq!(factors(&params), (0.4, 0.6));
        assert_eq!(params.emissive, Emissive::Factor([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_unsupported() {
        let model = ShadingModel::Unsupported {
            type_name: "surfaceShader".to_string(),
        };
        assert!(MaterialParams::from_shader(&shader(model)).is_none());
        assert_eq!(MaterialParams::default_material().name, DEFAULT_MATERIAL_NAME);
    }
}
