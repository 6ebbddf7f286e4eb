//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Host scene collaborator interface
//!
//! The exporter never owns scene data. Everything it needs (hierarchy,
//! transforms, face-vertex streams, shader attributes, keyframes) is queried
//! through [`SceneSource`], which returns owned, read-only snapshots.
//!
//! [`SceneDescription`] is a JSON-backed implementation used by the CLI and
//! the tests.

mod description;
mod types;

pub use description::{
    AnimationDescription, CameraDescription, MeshDescription, NodeDescription, SceneDescription,
    ShaderDescription,
};
pub use types::{
    AiStandardSurfaceAttributes, BoundingBox, CameraId, CameraProjection, CameraSource,
    ChannelPath, FaceVertex, KeyframeTrack, LambertKind, LambertLikeAttributes, MeshId,
    MeshSource, NodeId, NodeInfo, ShaderId, ShaderSource, ShadingModel, StingrayMap,
    StingrayPbsAttributes, TangentType, TextureRef, TimeUnit, Transform, normalize_quaternion,
};

use crate::error::Result;

/// Read-only queries the exporter issues against the host scene.
pub trait SceneSource {
    /// Top-level nodes of the scene, in host order. Host default cameras and
    /// other non-exportable roots must already be filtered out.
    fn top_level_nodes(&self) -> Result<Vec<NodeId>>;

    /// Name, local transform, children and attachments of a node.
    fn node(&self, id: NodeId) -> Result<NodeInfo>;

    /// Triangulated face-vertex stream and bounds of a mesh.
    fn mesh(&self, id: MeshId) -> Result<MeshSource>;

    /// Projection parameters of a camera.
    fn camera(&self, id: CameraId) -> Result<CameraSource>;

    /// Name and shading-model attributes of a shader.
    fn shader(&self, id: ShaderId) -> Result<ShaderSource>;

    /// Keyframes of a transform channel, or `None` if the channel is not keyed.
    fn keyframes(&self, node: NodeId, path: ChannelPath) -> Result<Option<KeyframeTrack>>;

    /// Scene time unit used to convert key times to seconds.
    fn time_unit(&self) -> TimeUnit;
}
