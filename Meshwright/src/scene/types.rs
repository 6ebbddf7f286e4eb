//! Read-only snapshot types returned by a [`SceneSource`](super::SceneSource).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host node handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Host mesh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshId(pub usize);

/// Host camera handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(pub usize);

/// Host shader (material) handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderId(pub usize);

/// Decomposed local transform. The rotation quaternion is `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Decompose a column-major 4x4 matrix into translation/rotation/scale.
    #[must_use]
    pub fn from_matrix(matrix: &[f64; 16]) -> Self {
        let mat = glam::DMat4::from_cols_array(matrix);
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        Self {
            translation: translation.to_array(),
            rotation: rotation.to_array(),
            scale: scale.to_array(),
        }
    }

    /// Rotation re-normalized for glTF, which requires unit quaternions.
    /// A degenerate (zero-length) quaternion becomes identity.
    #[must_use]
    pub fn normalized_rotation(&self) -> [f64; 4] {
        normalize_quaternion(self.rotation)
    }
}

/// Unit-length copy of an `[x, y, z, w]` quaternion. A degenerate
/// (zero-length) quaternion becomes identity.
#[must_use]
pub fn normalize_quaternion(rotation: [f64; 4]) -> [f64; 4] {
    let q = glam::DQuat::from_array(rotation);
    if q.length_squared() <= f64::EPSILON {
        return [0.0, 0.0, 0.0, 1.0];
    }
    q.normalize().to_array()
}

/// Snapshot of one host transform node.
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    pub name: String,
    pub transform: Transform,
    /// Transform children in host order.
    pub children: Vec<NodeId>,
    pub mesh: Option<MeshId>,
    pub camera: Option<CameraId>,
}

/// One triangle corner as visited by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceVertex {
    /// Index of the shared source vertex this corner belongs to.
    pub vertex: u32,
    pub position: [f64; 3],
    pub normal: [f64; 3],
    pub uv: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f64; 3]>,
}

/// Axis-aligned bounding box reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Bounding box of a set of points. Empty input yields a zero box.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 3]>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        points.fold(
            Self {
                min: *first,
                max: *first,
            },
            |mut bbox, p| {
                for i in 0..3 {
                    bbox.min[i] = bbox.min[i].min(p[i]);
                    bbox.max[i] = bbox.max[i].max(p[i]);
                }
                bbox
            },
        )
    }
}

/// Triangulated face-vertex stream of one mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshSource {
    pub name: String,
    /// Number of shared source vertices (upper bound for `FaceVertex::vertex`).
    pub vertex_count: usize,
    /// Triangles in stable visitation order.
    pub triangles: Vec<[FaceVertex; 3]>,
    /// Whether the mesh has a vertex color set.
    pub has_colors: bool,
    /// Authoritative bounds of the source geometry.
    pub bounds: BoundingBox,
    pub shader: Option<ShaderId>,
}

/// Camera projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CameraProjection {
    Perspective {
        #[serde(rename = "aspectRatio")]
        aspect_ratio: f64,
        /// Vertical field of view in degrees.
        #[serde(rename = "verticalFovDegrees")]
        vertical_fov_degrees: f64,
    },
    Orthographic {
        /// Orthographic width, used for both `xmag` and `ymag`.
        #[serde(rename = "orthographicWidth")]
        orthographic_width: f64,
    },
}

/// Snapshot of one host camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSource {
    pub projection: CameraProjection,
    #[serde(rename = "nearClip")]
    pub near_clip: f64,
    #[serde(rename = "farClip")]
    pub far_clip: f64,
}

/// A file texture connected to a shader attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub path: PathBuf,
}

/// Flavor of the classic lambert-derived shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LambertKind {
    Lambert,
    Phong,
    Blinn,
}

/// Attributes of lambert, phong and blinn shaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambertLikeAttributes {
    pub kind: LambertKind,
    pub color: [f64; 3],
    #[serde(default)]
    pub color_texture: Option<TextureRef>,
    #[serde(default)]
    pub transparency: [f64; 3],
    /// Blinn only.
    #[serde(default)]
    pub specular_roll_off: f64,
    /// Blinn only.
    #[serde(default)]
    pub eccentricity: f64,
    /// Phong only.
    #[serde(default)]
    pub cosine_power: f64,
}

/// Attributes of an `aiStandardSurface` shader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStandardSurfaceAttributes {
    pub base_color: [f64; 3],
    #[serde(default)]
    pub base_color_texture: Option<TextureRef>,
    #[serde(default = "opaque")]
    pub opacity: [f64; 3],
    #[serde(default)]
    pub metalness: f64,
    #[serde(default = "half")]
    pub specular_roughness: f64,
}

/// A texture slot of a `StingrayPBS` shader with its `use_*_map` toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StingrayMap {
    pub texture: Option<TextureRef>,
    #[serde(default)]
    pub enabled: bool,
}

impl StingrayMap {
    /// The connected texture, if the map is switched on.
    #[must_use]
    pub fn active(&self) -> Option<&TextureRef> {
        if self.enabled { self.texture.as_ref() } else { None }
    }
}

/// Attributes of a `StingrayPBS` shader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StingrayPbsAttributes {
    pub base_color: [f64; 3],
    #[serde(default)]
    pub color_map: Option<StingrayMap>,
    #[serde(default)]
    pub metallic: f64,
    #[serde(default)]
    pub metallic_map: Option<StingrayMap>,
    #[serde(default)]
    pub roughness: f64,
    #[serde(default)]
    pub roughness_map: Option<StingrayMap>,
    #[serde(default)]
    pub normal_map: Option<StingrayMap>,
    /// Not every Stingray preset has an AO slot.
    #[serde(default)]
    pub ao_map: Option<StingrayMap>,
    #[serde(default)]
    pub emissive: [f64; 3],
    #[serde(default)]
    pub emissive_map: Option<StingrayMap>,
    #[serde(default = "one")]
    pub emissive_intensity: f64,
}

/// Shading model of a host shader, a closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum ShadingModel {
    LambertLike(LambertLikeAttributes),
    AiStandardSurface(AiStandardSurfaceAttributes),
    #[serde(rename = "stingrayPBS")]
    StingrayPbs(StingrayPbsAttributes),
    /// Any other host shader type.
    #[serde(rename_all = "camelCase")]
    Unsupported { type_name: String },
}

impl ShadingModel {
    /// Host type name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::LambertLike(attrs) => match attrs.kind {
                LambertKind::Lambert => "lambert",
                LambertKind::Phong => "phong",
                LambertKind::Blinn => "blinn",
            },
            Self::AiStandardSurface(_) => "aiStandardSurface",
            Self::StingrayPbs(_) => "StingrayPBS",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

/// Snapshot of one host shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    /// Source identity used for material deduplication.
    pub name: String,
    pub model: ShadingModel,
}

/// Animated transform property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelPath {
    Translation,
    Rotation,
    Scale,
}

impl ChannelPath {
    pub const ALL: [ChannelPath; 3] = [Self::Translation, Self::Rotation, Self::Scale];

    /// glTF `target.path` value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }

    /// Components per keyframe value (VEC3, or VEC4 for quaternions).
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Rotation => 4,
            Self::Translation | Self::Scale => 3,
        }
    }
}

/// Host out-tangent type of a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TangentType {
    Spline,
    Linear,
    Auto,
    Fast,
    Slow,
    Step,
    StepNext,
    Fixed,
    Clamped,
    Plateau,
}

/// Keyframes of one channel. `values` hold 3 (or 4 for rotation) components
/// per key, sampled at the matching entry of `times`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    /// Key times in host time units.
    pub times: Vec<f64>,
    pub values: Vec<Vec<f64>>,
    /// Out-tangent type of the first key.
    #[serde(rename = "tangent")]
    pub first_tangent: TangentType,
}

/// Host time unit, used to convert key times to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Game,
    #[default]
    Film,
    Pal,
    Ntsc,
    Show,
    Palf,
    Ntscf,
}

impl TimeUnit {
    /// Frames per second.
    #[must_use]
    pub fn fps(self) -> f64 {
        match self {
            Self::Game => 15.0,
            Self::Film => 24.0,
            Self::Pal => 25.0,
            Self::Ntsc => 30.0,
            Self::Show => 48.0,
            Self::Palf => 50.0,
            Self::Ntscf => 60.0,
        }
    }
}

fn opaque() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn half() -> f64 {
    0.5
}

fn one() -> f64 {
    1.0
}
