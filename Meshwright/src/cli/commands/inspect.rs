//! Scene description summary

use std::path::Path;

use crate::scene::{CameraProjection, NodeId, SceneDescription, SceneSource};

/// Print the node tree, meshes, shaders and cameras of a description.
pub fn execute(path: &Path) -> anyhow::Result<()> {
    println!("Inspecting scene description: {}", path.display());
    println!();

    let scene = SceneDescription::load(path)?;

    println!("Scene Information");
    println!("=================");
    println!("Time unit:   {:?} ({} fps)", scene.time_unit, scene.time_unit.fps());
    println!("Nodes:       {}", scene.nodes.len());
    println!("Meshes:      {}", scene.meshes.len());
    println!("Shaders:     {}", scene.shaders.len());
    println!("Cameras:     {}", scene.cameras.len());
    println!();

    println!("Hierarchy:");
    println!("----------");
    let roots = scene.top_level_nodes()?;
    if roots.is_empty() {
        println!("  (empty, nothing would be exported)");
    }
    for root in roots {
        print_node(&scene, root, 1, &mut Vec::new())?;
    }

    if !scene.meshes.is_empty() {
        println!();
        println!("Meshes:");
        for (i, _) in scene.meshes.iter().enumerate() {
            let mesh = scene.mesh(crate::scene::MeshId(i))?;
            let shader = match mesh.shader {
                Some(id) => scene.shader(id)?.name,
                None => "(default)".to_string(),
            };
            println!(
                "  [{:2}] {} ({} vertices, {} triangles, shader {})",
                i,
                mesh.name,
                mesh.vertex_count,
                mesh.triangles.len(),
                shader
            );
        }
    }

    if !scene.shaders.is_empty() {
        println!();
        println!("Shaders:");
        for (i, shader) in scene.shaders.iter().enumerate() {
            println!("  [{:2}] {} ({})", i, shader.name, shader.shading.type_name());
        }
    }

    if !scene.cameras.is_empty() {
        println!();
        println!("Cameras:");
        for (i, camera) in scene.cameras.iter().enumerate() {
            let projection = match camera.projection {
                CameraProjection::Perspective {
                    aspect_ratio,
                    vertical_fov_degrees,
                } => format!("perspective, aspect {aspect_ratio:.3}, fov {vertical_fov_degrees:.1} deg"),
                CameraProjection::Orthographic { orthographic_width } => {
                    format!("orthographic, width {orthographic_width}")
                }
            };
            println!(
                "  [{:2}] {} (clip {} .. {})",
                i, projection, camera.near_clip, camera.far_clip
            );
        }
    }

    Ok(())
}

fn print_node(
    scene: &SceneDescription,
    id: NodeId,
    depth: usize,
    ancestors: &mut Vec<NodeId>,
) -> anyhow::Result<()> {
    let node = scene.node(id)?;
    if ancestors.contains(&id) {
        anyhow::bail!("node {} is part of a hierarchy cycle", node.name);
    }

    let mut tags = Vec::new();
    if let Some(mesh) = node.mesh {
        tags.push(format!("mesh {}", mesh.0));
    }
    if let Some(camera) = node.camera {
        tags.push(format!("camera {}", camera.0));
    }
    let animation = &scene.nodes[id.0].animation;
    let keyed = [
        ("t", animation.translation.is_some()),
        ("r", animation.rotation.is_some()),
        ("s", animation.scale.is_some()),
    ]
    .iter()
    .filter(|(_, keyed)| *keyed)
    .map(|(c, _)| *c)
    .collect::<String>();
    if !keyed.is_empty() {
        tags.push(format!("keyed {keyed}"));
    }

    let suffix = if tags.is_empty() { String::new() } else { format!(" [{}]", tags.join(", ")) };
    println!("{}- {}{}", "  ".repeat(depth), node.name, suffix);

    ancestors.push(id);
    for child in node.children {
        print_node(scene, child, depth + 1, ancestors)?;
    }
    ancestors.pop();
    Ok(())
}
