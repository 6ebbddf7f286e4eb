//! JSON scene description
//!
//! A file-backed [`SceneSource`] for exporting scenes captured outside the
//! host application. Relative texture paths are resolved against the
//! directory of the description file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SceneSource;
use super::types::{
    BoundingBox, CameraId, CameraSource, ChannelPath, FaceVertex, KeyframeTrack, MeshId,
    MeshSource, NodeId, NodeInfo, ShaderId, ShaderSource, ShadingModel, StingrayMap, TextureRef,
    TimeUnit, Transform,
};
use crate::error::{Error, Result};

/// Cameras are stored exactly as the host reports them.
pub type CameraDescription = CameraSource;

/// Whole-scene description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    #[serde(default)]
    pub time_unit: TimeUnit,
    /// Explicit top-level nodes. When absent, every node that is nobody's
    /// child is a root, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roots: Option<Vec<NodeId>>,
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub meshes: Vec<MeshDescription>,
    #[serde(default)]
    pub cameras: Vec<CameraDescription>,
    #[serde(default)]
    pub shaders: Vec<ShaderDescription>,
}

/// Keyed channels of a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<KeyframeTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<KeyframeTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<KeyframeTrack>,
}

/// One transform node. Either TRS fields or a column-major `matrix`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f64; 16]>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraId>,
    #[serde(default)]
    pub animation: AnimationDescription,
}

impl NodeDescription {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn transform(&self) -> Transform {
        if let Some(matrix) = &self.matrix {
            return Transform::from_matrix(matrix);
        }
        let defaults = Transform::default();
        Transform {
            translation: self.translation.unwrap_or(defaults.translation),
            rotation: self.rotation.unwrap_or(defaults.rotation),
            scale: self.scale.unwrap_or(defaults.scale),
        }
    }
}

/// One mesh as a list of triangles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDescription {
    pub name: String,
    /// Shared source vertex count. Derived from the triangles when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_count: Option<usize>,
    pub triangles: Vec<[FaceVertex; 3]>,
    /// Authoritative bounds. Derived from the triangles when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader: Option<ShaderId>,
}

/// One shader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderDescription {
    pub name: String,
    pub shading: ShadingModel,
}

impl SceneDescription {
    /// Load a description from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid description.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut description = Self::from_json_str(&text).map_err(|e| match e {
            Error::JsonError(json) => Error::SceneDescriptionFailed {
                path: path.to_path_buf(),
                message: json.to_string(),
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            description.resolve_texture_paths(base);
        }
        tracing::debug!(
            "Loaded scene description {}: {} nodes, {} meshes",
            path.display(),
            description.nodes.len(),
            description.meshes.len()
        );
        Ok(description)
    }

    /// Parse a description from JSON text.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid description.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rebase relative texture paths onto `base`.
    pub fn resolve_texture_paths(&mut self, base: &Path) {
        for shader in &mut self.shaders {
            for texture in texture_refs_mut(&mut shader.shading) {
                if texture.path.is_relative() {
                    texture.path = base.join(&texture.path);
                }
            }
        }
    }

    pub fn push_node(&mut self, node: NodeDescription) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn push_mesh(&mut self, mesh: MeshDescription) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn push_camera(&mut self, camera: CameraDescription) -> CameraId {
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn push_shader(&mut self, name: impl Into<String>, shading: ShadingModel) -> ShaderId {
        self.shaders.push(ShaderDescription {
            name: name.into(),
            shading,
        });
        ShaderId(self.shaders.len() - 1)
    }

    fn node_description(&self, id: NodeId) -> Result<&NodeDescription> {
        self.nodes.get(id.0).ok_or(Error::UnknownEntity {
            kind: "node",
            id: id.0,
        })
    }
}

impl SceneSource for SceneDescription {
    fn top_level_nodes(&self) -> Result<Vec<NodeId>> {
        if let Some(roots) = &self.roots {
            return Ok(roots.clone());
        }

        let mut is_child = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for child in &node.children {
                if let Some(flag) = is_child.get_mut(child.0) {
                    *flag = true;
                }
            }
        }
        Ok(is_child
            .iter()
            .enumerate()
            .filter(|&(_, &child)| !child)
            .map(|(i, _)| NodeId(i))
            .collect())
    }

    fn node(&self, id: NodeId) -> Result<NodeInfo> {
        let node = self.node_description(id)?;
        Ok(NodeInfo {
            name: node.name.clone(),
            transform: node.transform(),
            children: node.children.clone(),
            mesh: node.mesh,
            camera: node.camera,
        })
    }

    fn mesh(&self, id: MeshId) -> Result<MeshSource> {
        let mesh = self.meshes.get(id.0).ok_or(Error::UnknownEntity {
            kind: "mesh",
            id: id.0,
        })?;

        let corners = || mesh.triangles.iter().flatten();
        let vertex_count = mesh.vertex_count.unwrap_or_else(|| {
            corners().map(|fv| fv.vertex as usize + 1).max().unwrap_or(0)
        });
        let bounds = mesh
            .bounds
            .unwrap_or_else(|| BoundingBox::from_points(corners().map(|fv| &fv.position)));

        Ok(MeshSource {
            name: mesh.name.clone(),
            vertex_count,
            triangles: mesh.triangles.clone(),
            has_colors: corners().any(|fv| fv.color.is_some()),
            bounds,
            shader: mesh.shader,
        })
    }

    fn camera(&self, id: CameraId) -> Result<CameraSource> {
        self.cameras.get(id.0).copied().ok_or(Error::UnknownEntity {
            kind: "camera",
            id: id.0,
        })
    }

    fn shader(&self, id: ShaderId) -> Result<ShaderSource> {
        let shader = self.shaders.get(id.0).ok_or(Error::UnknownEntity {
            kind: "shader",
            id: id.0,
        })?;
        Ok(ShaderSource {
            name: shader.name.clone(),
            model: shader.shading.clone(),
        })
    }

    fn keyframes(&self, node: NodeId, path: ChannelPath) -> Result<Option<KeyframeTrack>> {
        let animation = &self.node_description(node)?.animation;
        let track = match path {
            ChannelPath::Translation => &animation.translation,
            ChannelPath::Rotation => &animation.rotation,
            ChannelPath::Scale => &animation.scale,
        };
        Ok(track.clone().filter(|t| !t.times.is_empty()))
    }

    fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }
}

fn texture_refs_mut(model: &mut ShadingModel) -> Vec<&mut TextureRef> {
    fn map_texture(map: Option<&mut StingrayMap>) -> Option<&mut TextureRef> {
        map.and_then(|m| m.texture.as_mut())
    }

    match model {
        ShadingModel::LambertLike(attrs) => attrs.color_texture.iter_mut().collect(),
        ShadingModel::AiStandardSurface(attrs) => attrs.base_color_texture.iter_mut().collect(),
        ShadingModel::StingrayPbs(attrs) => [
            map_texture(attrs.color_map.as_mut()),
            map_texture(attrs.metallic_map.as_mut()),
            map_texture(attrs.roughness_map.as_mut()),
            map_texture(attrs.normal_map.as_mut()),
            map_texture(attrs.ao_map.as_mut()),
            map_texture(attrs.emissive_map.as_mut()),
        ]
        .into_iter()
        .flatten()
        .collect(),
        ShadingModel::Unsupported { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SCENE: &str = r#"{
        "timeUnit": "ntsc",
        "nodes": [
            { "name": "root", "children": [1], "translation": [1, 2, 3] },
            { "name": "child", "mesh": 0,
              "animation": { "scale": { "times": [1, 2], "values": [[1,1,1],[2,2,2]], "tangent": "linear" } } }
        ],
        "meshes": [
            { "name": "tri", "shader": 0, "triangles": [[
                { "vertex": 0, "position": [0,0,0], "normal": [0,0,1], "uv": [0,0] },
                { "vertex": 1, "position": [1,0,0], "normal": [0,0,1], "uv": [1,0] },
                { "vertex": 2, "position": [0,2,0], "normal": [0,0,1], "uv": [0,1] }
            ]] }
        ],
        "shaders": [
            { "name": "lambert1", "shading": { "model": "lambertLike", "kind": "lambert",
              "color": [0.5, 0.5, 0.5], "colorTexture": { "path": "tex/albedo.png" } } }
        ]
    }"#;

    #[test]
    fn test_parse_and_query() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();
        assert_eq!(scene.time_unit(), TimeUnit::Ntsc);
        assert_eq!(scene.top_level_nodes().unwrap(), vec![NodeId(0)]);

        let root = scene.node(NodeId(0)).unwrap();
        assert_eq!(root.transform.translation, [1.0, 2.0, 3.0]);
        assert_eq!(root.transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(root.children, vec![NodeId(1)]);

        let mesh = scene.mesh(MeshId(0)).unwrap();
        assert_eq!(mesh.vertex_count, 3);
        assert!(!mesh.has_colors);
        assert_eq!(mesh.bounds.max, [1.0, 2.0, 0.0]);

        assert!(scene.keyframes(NodeId(1), ChannelPath::Scale).unwrap().is_some());
        assert!(scene.keyframes(NodeId(1), ChannelPath::Rotation).unwrap().is_none());
    }

    #[test]
    fn test_unknown_ids() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();
        assert!(matches!(
            scene.node(NodeId(9)),
            Err(Error::UnknownEntity { kind: "node", id: 9 })
        ));
        assert!(scene.shader(ShaderId(3)).is_err());
    }

    #[test]
    fn test_resolve_texture_paths() {
        let mut scene = SceneDescription::from_json_str(SCENE).unwrap();
        scene.resolve_texture_paths(Path::new("/assets"));
        let ShadingModel::LambertLike(attrs) = &scene.shaders[0].shading else {
            panic!("expected lambert");
        };
        assert_eq!(
            attrs.color_texture.as_ref().unwrap().path,
            PathBuf::from("/assets/tex/albedo.png")
        );
    }
}
