//! Scene traversal for `GltfBuilder`

use crate::error::{Error, Result};
use crate::exporter::types::{ExportProgress, ExportProgressCallback};
use crate::options::AnimationMode;
use crate::scene::{NodeId, SceneSource};

use super::super::types::GltfNode;
use super::{AnimationBuilder, ExportState, GltfBuilder};

/// Name of the single exported animation.
const DEFAULT_ANIMATION_NAME: &str = "defaultAnimation";

impl GltfBuilder {
    /// Walk the host hierarchy from its top-level nodes and pack everything
    /// reachable: nodes, meshes, materials, cameras and keyed animation.
    ///
    /// # Errors
    /// Returns [`Error::EmptyScene`] if there is nothing to export, or any
    /// error raised while querying the host or packing data. The session is
    /// left in [`ExportState::Failed`] on error.
    pub fn collect_scene<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        progress: ExportProgressCallback,
    ) -> Result<()> {
        if self.state != ExportState::Collecting {
            return Err(Error::InvalidExportState {
                state: self.state.as_str(),
                expected: ExportState::Collecting.as_str(),
            });
        }

        let result = self.collect_roots(source, progress);
        if result.is_err() {
            self.state = ExportState::Failed;
        }
        result
    }

    fn collect_roots<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        progress: ExportProgressCallback,
    ) -> Result<()> {
        let roots = source.top_level_nodes()?;
        if roots.is_empty() {
            return Err(Error::EmptyScene);
        }

        if self.options.animation == AnimationMode::Keyed {
            self.animation = Some(AnimationBuilder::new(DEFAULT_ANIMATION_NAME));
        }

        let total = roots.len();
        for (i, root) in roots.into_iter().enumerate() {
            let mut ancestors = Vec::new();
            let index = self.add_node(source, root, &mut ancestors)?;
            progress(&ExportProgress::RootCollected {
                index: i + 1,
                total,
                name: self.nodes.get(index).map(|n| n.name.clone()).unwrap_or_default(),
            });
            self.scene_nodes.push(index);
        }

        tracing::debug!(
            "Collected {} nodes, {} meshes, {} materials, {} cameras",
            self.nodes.len(),
            self.meshes.len(),
            self.materials.len(),
            self.cameras.len()
        );
        Ok(())
    }

    /// Register one node and recurse into its children. The node's index is
    /// taken before any of its descendants are visited.
    fn add_node<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        id: NodeId,
        ancestors: &mut Vec<NodeId>,
    ) -> Result<usize> {
        let info = source.node(id)?;
        if ancestors.contains(&id) {
            return Err(Error::HierarchyCycle { node: info.name });
        }

        let index = self.nodes.push(GltfNode {
            name: info.name.clone(),
            translation: info.transform.translation,
            rotation: info.transform.normalized_rotation(),
            scale: info.transform.scale,
            children: Vec::new(),
            mesh: None,
            camera: None,
        });

        if self.animation.is_some() {
            self.add_node_animation(source, id, index, &info.name)?;
        }

        let mesh = match info.mesh {
            Some(mesh_id) => self.add_mesh(source, mesh_id)?,
            None => None,
        };
        let camera = match info.camera {
            Some(camera_id) => Some(self.add_camera(source, camera_id, &info.name)?),
            None => None,
        };

        ancestors.push(id);
        let mut children = Vec::with_capacity(info.children.len());
        for child in &info.children {
            children.push(self.add_node(source, *child, ancestors)?);
        }
        ancestors.pop();

        if let Some(node) = self.nodes.get_mut(index) {
            node.mesh = mesh;
            node.camera = camera;
            node.children = children;
        }
        Ok(index)
    }
}
