use std::path::{Path, PathBuf};

use meshwright::exporter::{DEFAULT_MATERIAL_NAME, export_scene_to_artifacts};
use meshwright::prelude::*;
use meshwright::scene::{
    AiStandardSurfaceAttributes, CameraProjection, CameraSource, FaceVertex, KeyframeTrack,
    LambertKind, LambertLikeAttributes, StingrayMap, StingrayPbsAttributes, TangentType,
    TextureRef, TimeUnit,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

// ============================================================================
// Fixtures
// ============================================================================

fn corner(vertex: u32, position: [f64; 3], uv: [f64; 2]) -> FaceVertex {
    FaceVertex {
        vertex,
        position,
        normal: [0.0, 0.0, 1.0],
        uv,
        color: None,
    }
}

/// A unit quad: 4 shared vertices, 2 triangles.
fn quad(name: &str) -> MeshDescription {
    let a = corner(0, [0.0, 0.0, 0.0], [0.0, 0.25]);
    let b = corner(1, [1.0, 0.0, 0.0], [0.5, 0.25]);
    let c = corner(2, [1.0, 1.0, 0.0], [0.5, 0.75]);
    let d = corner(3, [0.0, 1.0, 0.0], [0.0, 0.75]);
    MeshDescription {
        name: name.to_string(),
        triangles: vec![[a, b, c], [a, c, d]],
        ..MeshDescription::default()
    }
}

fn quad_scene() -> SceneDescription {
    let mut scene = SceneDescription::default();
    let mesh = scene.push_mesh(quad("quadShape"));
    let mut node = NodeDescription::new("quad");
    node.mesh = Some(mesh);
    node.translation = Some([1.0, 2.0, 3.0]);
    scene.push_node(node);
    scene
}

fn write_png(path: &Path, alpha: bool) {
    if alpha {
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 128]))
            .save(path)
            .unwrap();
    } else {
        image::RgbImage::from_pixel(2, 2, image::Rgb([0, 255, 0]))
            .save(path)
            .unwrap();
    }
}

fn lambert_textured(texture: &Path) -> ShadingModel {
    ShadingModel::LambertLike(LambertLikeAttributes {
        kind: LambertKind::Lambert,
        color: [0.5, 0.5, 0.5],
        color_texture: Some(TextureRef {
            path: texture.to_path_buf(),
        }),
        transparency: [0.0; 3],
        specular_roll_off: 0.0,
        eccentricity: 0.0,
        cosine_power: 0.0,
    })
}

/// Two quads whose shaders both sample `texture`.
fn textured_scene(texture: &Path) -> SceneDescription {
    let mut scene = SceneDescription::default();
    for i in 0..2 {
        let shader = scene.push_shader(format!("lambert{i}"), lambert_textured(texture));
        let mut mesh = quad(&format!("quadShape{i}"));
        mesh.shader = Some(shader);
        let mesh = scene.push_mesh(mesh);
        let mut node = NodeDescription::new(format!("quad{i}"));
        node.mesh = Some(mesh);
        scene.push_node(node);
    }
    scene
}

fn export(scene: &SceneDescription, output: PathBuf, format: ResourceFormat) -> ExportSummary {
    let options = ExportOptions::new(output).with_resource_format(format);
    export_scene(scene, &options).unwrap()
}

fn json_chunk(glb: &[u8]) -> serde_json::Value {
    let len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    serde_json::from_slice(&glb[20..20 + len]).unwrap()
}

fn assert_keys_sorted(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            let keys: Vec<&String> = map.keys().collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
            map.values().for_each(assert_keys_sorted);
        }
        serde_json::Value::Array(items) => items.iter().for_each(assert_keys_sorted),
        _ => {}
    }
}

// ============================================================================
// Output formats
// ============================================================================

#[test]
fn test_gltf_with_bin() {
    let dir = tempdir().unwrap();
    let summary = export(&quad_scene(), dir.path().join("quad.gltf"), ResourceFormat::Bin);

    assert_eq!(summary.written.len(), 2);
    assert!(dir.path().join("quad.bin").exists());

    let (document, buffers, _) = gltf::import(dir.path().join("quad.gltf")).unwrap();
    assert_eq!(document.buffers().next().unwrap().name(), Some("primary_buffer"));

    let node = document.nodes().next().unwrap();
    assert_eq!(node.name(), Some("quad"));
    let (translation, rotation, scale) = node.transform().decomposed();
    assert_eq!(translation, [1.0, 2.0, 3.0]);
    assert_eq!(rotation, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(scale, [1.0, 1.0, 1.0]);

    let mesh = node.mesh().unwrap();
    let primitive = mesh.primitives().next().unwrap();
    assert_eq!(primitive.mode(), gltf::mesh::Mode::Triangles);
    let reader = primitive.reader(|b| Some(&buffers[b.index()]));

    let positions: Vec<[f32; 3]> = reader.read_positions().unwrap().collect();
    assert_eq!(positions.len(), 4);
    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);

    // V is flipped by default
    let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
    assert_eq!(uvs[0], [0.0, 0.75]);
    assert_eq!(uvs[2], [0.5, 0.25]);
    assert!(reader.read_colors(0).is_none());

    let bounds = primitive.bounding_box();
    assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
    assert_eq!(bounds.max, [1.0, 1.0, 0.0]);

    let material = primitive.material();
    assert_eq!(material.name(), Some(DEFAULT_MATERIAL_NAME));
}

#[test]
fn test_gltf_embedded() {
    let dir = tempdir().unwrap();
    let summary = export(&quad_scene(), dir.path().join("quad.gltf"), ResourceFormat::Embedded);
    assert_eq!(summary.written.len(), 1);

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&summary.output).unwrap()).unwrap();
    let uri = json["buffers"][0]["uri"].as_str().unwrap();
    assert!(uri.starts_with("data:application/octet-stream;base64,"));

    let (document, _, _) = gltf::import(&summary.output).unwrap();
    assert_eq!(document.meshes().count(), 1);
}

#[test]
fn test_glb_container() {
    let dir = tempdir().unwrap();
    let summary = export(&quad_scene(), dir.path().join("quad.glb"), ResourceFormat::Embedded);
    assert_eq!(summary.written, vec![dir.path().join("quad.glb")]);

    let bytes = std::fs::read(&summary.output).unwrap();
    assert_eq!(&bytes[0..4], b"glTF");
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize, bytes.len());
    assert_eq!(bytes.len() % 4, 0);

    let json = json_chunk(&bytes);
    assert!(json["buffers"][0].get("uri").is_none());
    assert_keys_sorted(&json);

    let (document, buffers, _) = gltf::import_slice(&bytes).unwrap();
    assert_eq!(document.accessors().count(), 4);
    assert_eq!(buffers[0].len() % 4, 0);
}

#[test]
fn test_uppercase_extension_and_no_flip() {
    let dir = tempdir().unwrap();
    let options = ExportOptions::new(dir.path().join("quad.GLB")).with_flip_v(false);
    let artifacts = export_scene_to_artifacts(&quad_scene(), &options, &|_| {}).unwrap();
    assert_eq!(artifacts.main.file_name, "quad.GLB");

    let (document, buffers, _) = gltf::import_slice(&artifacts.main.contents).unwrap();
    let primitive = document.meshes().next().unwrap().primitives().next().unwrap();
    let reader = primitive.reader(|b| Some(&buffers[b.index()]));
    let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
    assert_eq!(uvs[0], [0.0, 0.25]);
}

// ============================================================================
// Images and materials
// ============================================================================

#[test]
fn test_images_deduplicated_by_path() {
    let dir = tempdir().unwrap();
    let texture = dir.path().join("albedo.png");
    write_png(&texture, false);

    let artifacts = export_scene_to_artifacts(
        &textured_scene(&texture),
        &ExportOptions::new(dir.path().join("out.glb")),
        &|_| {},
    )
    .unwrap();
    assert_eq!(artifacts.stats.images, 1);
    assert_eq!(artifacts.stats.materials, 2);

    let json = json_chunk(&artifacts.main.contents);
    assert_eq!(json["textures"].as_array().unwrap().len(), 1);
    assert_eq!(json["images"][0]["mimeType"], "image/png");
    assert!(json["images"][0]["bufferView"].is_u64());
    for material in json["materials"].as_array().unwrap() {
        assert_eq!(material["pbrMetallicRoughness"]["baseColorTexture"]["index"], 0);
        assert_eq!(material["alphaMode"], "OPAQUE");
    }
}

#[test]
fn test_source_mode_copies_images() {
    let dir = tempdir().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    let texture = assets.join("albedo.png");
    write_png(&texture, true);

    let out = dir.path().join("out");
    let summary = export(&textured_scene(&texture), out.join("scene.gltf"), ResourceFormat::Source);
    assert!(out.join("albedo.png").exists());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&summary.output).unwrap()).unwrap();
    assert_eq!(json["images"][0]["uri"], "albedo.png");
    assert_eq!(json["materials"][0]["alphaMode"], "BLEND");

    let (document, _, images) = gltf::import(&summary.output).unwrap();
    assert_eq!(document.images().count(), 1);
    assert_eq!(images[0].width, 2);
}

#[test]
fn test_embedded_images_use_data_uris() {
    let dir = tempdir().unwrap();
    let texture = dir.path().join("albedo.png");
    write_png(&texture, false);

    let summary = export(
        &textured_scene(&texture),
        dir.path().join("scene.gltf"),
        ResourceFormat::Embedded,
    );
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&summary.output).unwrap()).unwrap();
    assert!(json["images"][0]["uri"].as_str().unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn test_undecodable_base_color_is_opaque() {
    let dir = tempdir().unwrap();
    let texture = dir.path().join("albedo.tga");
    std::fs::write(&texture, b"not an image the exporter can decode").unwrap();

    let artifacts = export_scene_to_artifacts(
        &textured_scene(&texture),
        &ExportOptions::new(dir.path().join("out.glb")),
        &|_| {},
    )
    .unwrap();

    let json = json_chunk(&artifacts.main.contents);
    assert_eq!(json["images"][0]["mimeType"], "image/tga");
    for material in json["materials"].as_array().unwrap() {
        assert_eq!(material["alphaMode"], "OPAQUE");
    }
}

#[test]
fn test_source_mode_renames_colliding_images() {
    let dir = tempdir().unwrap();
    let mut scene = SceneDescription::default();
    for (i, folder) in ["wood", "stone"].iter().enumerate() {
        let assets = dir.path().join(folder);
        std::fs::create_dir_all(&assets).unwrap();
        let texture = assets.join("albedo.png");
        write_png(&texture, i == 1);

        let shader = scene.push_shader(format!("{folder}Mat"), lambert_textured(&texture));
        let mut mesh = quad(&format!("{folder}Shape"));
        mesh.shader = Some(shader);
        let mesh = scene.push_mesh(mesh);
        let mut node = NodeDescription::new(*folder);
        node.mesh = Some(mesh);
        scene.push_node(node);
    }

    let out = dir.path().join("out");
    let summary = export(&scene, out.join("scene.gltf"), ResourceFormat::Source);
    assert_eq!(summary.stats.images, 2);

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&summary.output).unwrap()).unwrap();
    assert_eq!(json["images"][0]["uri"], "albedo.png");
    assert_eq!(json["images"][1]["uri"], "albedo_1.png");
    assert_eq!(json["materials"][0]["alphaMode"], "OPAQUE");
    assert_eq!(json["materials"][1]["alphaMode"], "BLEND");

    let (_, _, images) = gltf::import(&summary.output).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].format, gltf::image::Format::R8G8B8);
    assert_eq!(images[1].format, gltf::image::Format::R8G8B8A8);
}

#[test]
fn test_default_material_shared() {
    let mut scene = SceneDescription::default();
    let unsupported = |name: &str| ShadingModel::Unsupported {
        type_name: name.to_string(),
    };
    let shaders = [
        Some(scene.push_shader("toon1", unsupported("toonShader"))),
        Some(scene.push_shader("hair1", unsupported("aiHair"))),
        None,
    ];
    for (i, shader) in shaders.into_iter().enumerate() {
        let mut mesh = quad(&format!("mesh{i}"));
        mesh.shader = shader;
        let mesh = scene.push_mesh(mesh);
        let mut node = NodeDescription::new(format!("node{i}"));
        node.mesh = Some(mesh);
        scene.push_node(node);
    }

    let artifacts =
        export_scene_to_artifacts(&scene, &ExportOptions::new("scene.gltf"), &|_| {}).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&artifacts.main.contents).unwrap();
    let materials = json["materials"].as_array().unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0]["name"], DEFAULT_MATERIAL_NAME);
    for mesh in json["meshes"].as_array().unwrap() {
        assert_eq!(mesh["primitives"][0]["material"], 0);
    }
}

#[test]
fn test_materials_deduplicated_by_shader_name() {
    let mut scene = SceneDescription::default();
    let shader = scene.push_shader(
        "aiStandardSurface1",
        ShadingModel::AiStandardSurface(AiStandardSurfaceAttributes {
            base_color: [0.8, 0.1, 0.1],
            base_color_texture: None,
            opacity: [1.0; 3],
            metalness: 1.0,
            specular_roughness: 0.2,
        }),
    );
    let mut mesh = quad("shared");
    mesh.shader = Some(shader);
    let mesh = scene.push_mesh(mesh);
    for name in ["a", "b"] {
        let mut node = NodeDescription::new(name);
        node.mesh = Some(mesh);
        scene.push_node(node);
    }

    let artifacts =
        export_scene_to_artifacts(&scene, &ExportOptions::new("scene.glb"), &|_| {}).unwrap();
    assert_eq!(artifacts.stats.meshes, 1);
    assert_eq!(artifacts.stats.materials, 1);
    let json = json_chunk(&artifacts.main.contents);
    assert_eq!(json["nodes"][0]["mesh"], 0);
    assert_eq!(json["nodes"][1]["mesh"], 0);
    assert_eq!(json["materials"][0]["pbrMetallicRoughness"]["metallicFactor"], 1.0);
    assert_eq!(json["materials"][0]["pbrMetallicRoughness"]["roughnessFactor"], 0.2);
}

fn stingray_scene(metallic: &Path, roughness: &Path) -> SceneDescription {
    let map = |path: &Path| {
        Some(StingrayMap {
            texture: Some(TextureRef {
                path: path.to_path_buf(),
            }),
            enabled: true,
        })
    };
    let mut scene = SceneDescription::default();
    let shader = scene.push_shader(
        "pbs1",
        ShadingModel::StingrayPbs(StingrayPbsAttributes {
            base_color: [1.0, 1.0, 1.0],
            color_map: None,
            metallic: 0.0,
            metallic_map: map(metallic),
            roughness: 0.0,
            roughness_map: map(roughness),
            normal_map: None,
            ao_map: None,
            emissive: [0.0; 3],
            emissive_map: None,
            emissive_intensity: 1.0,
        }),
    );
    let mut mesh = quad("pbsQuad");
    mesh.shader = Some(shader);
    let mesh = scene.push_mesh(mesh);
    let mut node = NodeDescription::new("pbs");
    node.mesh = Some(mesh);
    scene.push_node(node);
    scene
}

#[test]
fn test_stingray_packed_metal_rough() {
    let dir = tempdir().unwrap();
    let metallic = dir.path().join("metal.png");
    let roughness = dir.path().join("rough.png");
    write_png(&metallic, false);
    write_png(&roughness, false);

    let out = dir.path().join("out");
    let summary = export(
        &stingray_scene(&metallic, &roughness),
        out.join("pbs.gltf"),
        ResourceFormat::Source,
    );
    assert!(out.join("pbs1_metalRough.png").exists());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&summary.output).unwrap()).unwrap();
    let pbr = &json["materials"][0]["pbrMetallicRoughness"];
    assert!(pbr["metallicRoughnessTexture"]["index"].is_u64());
    assert_eq!(json["images"][0]["uri"], "pbs1_metalRough.png");
}

#[test]
fn test_failed_export_leaves_output_untouched() {
    let dir = tempdir().unwrap();
    let metallic = dir.path().join("metal.png");
    let roughness = dir.path().join("rough.png");
    write_png(&metallic, false);
    image::RgbImage::new(4, 4).save(&roughness).unwrap();

    let output = dir.path().join("pbs.glb");
    std::fs::write(&output, b"previous export").unwrap();

    let result = export_scene(&stingray_scene(&metallic, &roughness), &ExportOptions::new(&output));
    assert!(matches!(result, Err(Error::TextureDimensionMismatch { .. })));

    let result = export_scene(&SceneDescription::default(), &ExportOptions::new(&output));
    assert!(matches!(result, Err(Error::EmptyScene)));

    assert_eq!(std::fs::read(&output).unwrap(), b"previous export");
}

#[test]
fn test_invalid_extension_rejected() {
    let result = export_scene(&quad_scene(), &ExportOptions::new("scene.fbx"));
    assert!(matches!(result, Err(Error::InvalidOutputExtension { .. })));
}

// ============================================================================
// Buffer layout
// ============================================================================

/// A strip of degenerate triangles with exactly `vertex_count` distinct vertices.
fn strip(vertex_count: u32) -> MeshDescription {
    let last = vertex_count - 1;
    let triangles = (0..vertex_count.div_ceil(3))
        .map(|t| {
            [0, 1, 2].map(|k| {
                let v = (t * 3 + k).min(last);
                corner(v, [f64::from(v), 0.0, 0.0], [0.0, 0.0])
            })
        })
        .collect();
    MeshDescription {
        name: format!("strip{vertex_count}"),
        triangles,
        ..MeshDescription::default()
    }
}

#[test]
fn test_index_width_follows_vertex_count() {
    let mut scene = SceneDescription::default();
    for count in [65534, 65535] {
        let mesh = scene.push_mesh(strip(count));
        let mut node = NodeDescription::new(format!("strip{count}"));
        node.mesh = Some(mesh);
        scene.push_node(node);
    }

    let artifacts =
        export_scene_to_artifacts(&scene, &ExportOptions::new("strips.glb"), &|_| {}).unwrap();
    let json = json_chunk(&artifacts.main.contents);

    let index_accessor = |mesh: usize| {
        let accessor = json["meshes"][mesh]["primitives"][0]["indices"].as_u64().unwrap() as usize;
        json["accessors"][accessor].clone()
    };
    let short = index_accessor(0);
    assert_eq!(short["componentType"], 5123);
    assert_eq!(short["max"][0], 65533);
    let long = index_accessor(1);
    assert_eq!(long["componentType"], 5125);
    assert_eq!(long["max"][0], 65534);
}

#[test]
fn test_buffer_views_tile_the_buffer() {
    let dir = tempdir().unwrap();
    let texture = dir.path().join("albedo.png");
    write_png(&texture, true);

    let mut scene = textured_scene(&texture);
    scene.nodes[1].animation.translation = Some(KeyframeTrack {
        times: vec![0.0, 10.0, 20.0],
        values: vec![vec![0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 3.0, 0.0]],
        first_tangent: TangentType::Linear,
    });

    let artifacts =
        export_scene_to_artifacts(&scene, &ExportOptions::new("layout.glb"), &|_| {}).unwrap();
    let json = json_chunk(&artifacts.main.contents);
    let views = json["bufferViews"].as_array().unwrap();
    assert!(views.len() > 8);

    let span = |view: &serde_json::Value| {
        let offset = view["byteOffset"].as_u64().unwrap();
        (offset, offset + view["byteLength"].as_u64().unwrap())
    };
    for pair in views.windows(2) {
        let (_, end) = span(&pair[0]);
        let (next_offset, _) = span(&pair[1]);
        assert!(end <= next_offset, "views overlap: {pair:?}");
        assert_eq!(next_offset % 4, 0);
    }
    let (_, last_end) = span(views.last().unwrap());
    assert_eq!(Some(last_end), json["buffers"][0]["byteLength"].as_u64());
}

// ============================================================================
// Hierarchy, cameras and animation
// ============================================================================

#[test]
fn test_hierarchy_and_camera() {
    let mut scene = SceneDescription::default();
    let camera = scene.push_camera(CameraSource {
        projection: CameraProjection::Perspective {
            aspect_ratio: 1.5,
            vertical_fov_degrees: 60.0,
        },
        near_clip: 0.1,
        far_clip: 100.0,
    });
    let mut camera_node = NodeDescription::new("camera1");
    camera_node.camera = Some(camera);
    camera_node.rotation = Some([0.0, 0.0, 0.0, 2.0]);
    let camera_node = scene.push_node(camera_node);
    let mut rig = NodeDescription::new("rig");
    rig.children = vec![camera_node];
    scene.push_node(rig);

    let artifacts =
        export_scene_to_artifacts(&scene, &ExportOptions::new("rig.glb"), &|_| {}).unwrap();
    let (document, _, _) = gltf::import_slice(&artifacts.main.contents).unwrap();

    let root = document.default_scene().unwrap().nodes().next().unwrap();
    assert_eq!(root.name(), Some("rig"));
    let child = root.children().next().unwrap();
    assert_eq!(child.name(), Some("camera1"));
    assert_eq!(child.transform().decomposed().1, [0.0, 0.0, 0.0, 1.0]);

    let camera = child.camera().unwrap();
    assert_eq!(camera.name(), Some("camera1"));
    let gltf::camera::Projection::Perspective(perspective) = camera.projection() else {
        panic!("expected a perspective camera");
    };
    assert!((perspective.yfov() - 60f32.to_radians()).abs() < 1e-6);
    assert_eq!(perspective.aspect_ratio(), Some(1.5));
}

fn animated_scene() -> SceneDescription {
    let mut scene = quad_scene();
    scene.time_unit = TimeUnit::Film;
    scene.nodes[0].animation.translation = Some(KeyframeTrack {
        times: vec![0.0, 24.0, 48.0],
        values: vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0], vec![2.0, 0.0, 0.0]],
        first_tangent: TangentType::Linear,
    });
    scene.nodes[0].animation.rotation = Some(KeyframeTrack {
        times: vec![0.0, 12.0],
        values: vec![vec![0.0, 0.0, 0.0, 1.0], vec![0.0, 0.0, 0.0, 1.0]],
        first_tangent: TangentType::Step,
    });
    scene
}

#[test]
fn test_keyed_animation() {
    let artifacts =
        export_scene_to_artifacts(&animated_scene(), &ExportOptions::new("anim.glb"), &|_| {})
            .unwrap();
    assert_eq!(artifacts.stats.animation_channels, 2);

    let (document, buffers, _) = gltf::import_slice(&artifacts.main.contents).unwrap();
    let animation = document.animations().next().unwrap();
    assert_eq!(animation.name(), Some("defaultAnimation"));

    let channels: Vec<_> = animation.channels().collect();
    assert_eq!(channels[0].target().property(), gltf::animation::Property::Translation);
    assert_eq!(channels[0].sampler().interpolation(), gltf::animation::Interpolation::Linear);
    assert_eq!(channels[1].target().property(), gltf::animation::Property::Rotation);
    assert_eq!(channels[1].sampler().interpolation(), gltf::animation::Interpolation::Step);

    let reader = channels[0].reader(|b| Some(&buffers[b.index()]));
    let times: Vec<f32> = reader.read_inputs().unwrap().collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    let Some(gltf::animation::util::ReadOutputs::Translations(values)) = reader.read_outputs()
    else {
        panic!("expected translations");
    };
    assert_eq!(values.last(), Some([2.0, 0.0, 0.0]));
}

#[test]
fn test_animation_disabled() {
    let options = ExportOptions::new("anim.glb").with_animation(AnimationMode::None);
    let artifacts = export_scene_to_artifacts(&animated_scene(), &options, &|_| {}).unwrap();
    assert_eq!(artifacts.stats.animation_channels, 0);
    assert!(json_chunk(&artifacts.main.contents).get("animations").is_none());
}

// ============================================================================
// Sessions and scene descriptions
// ============================================================================

#[test]
fn test_builder_reset_between_exports() {
    let mut builder = GltfBuilder::new(&ExportOptions::new("scene.gltf")).unwrap();
    builder.collect_scene(&animated_scene(), &|_| {}).unwrap();
    let first = builder.finish().unwrap();

    builder.reset();
    assert_eq!(builder.buffer_len(), 0);
    builder.collect_scene(&quad_scene(), &|_| {}).unwrap();
    let second = builder.finish().unwrap();

    assert_eq!(first.stats.animation_channels, 2);
    assert_eq!(second.stats.animation_channels, 0);
    assert_eq!(second.stats.nodes, 1);
    assert!(second.stats.buffer_bytes < first.stats.buffer_bytes);
}

#[test]
fn test_load_description_with_relative_textures() {
    let dir = tempdir().unwrap();
    write_png(&dir.path().join("albedo.png"), false);
    let description = r#"{
        "nodes": [
            { "name": "tri", "mesh": 0, "scale": [2, 2, 2] }
        ],
        "meshes": [
            { "name": "triShape", "shader": 0, "triangles": [[
                { "vertex": 0, "position": [0,0,0], "normal": [0,0,1], "uv": [0,0], "color": [1,0,0] },
                { "vertex": 1, "position": [1,0,0], "normal": [0,0,1], "uv": [1,0], "color": [0,1,0] },
                { "vertex": 2, "position": [0,1,0], "normal": [0,0,1], "uv": [0,1], "color": [0,0,1] }
            ]] }
        ],
        "shaders": [
            { "name": "blinn1", "shading": { "model": "lambertLike", "kind": "blinn",
              "color": [1, 1, 1], "colorTexture": { "path": "albedo.png" },
              "specularRollOff": 0.7, "eccentricity": 0.3 } }
        ]
    }"#;
    let path = dir.path().join("scene.json");
    std::fs::write(&path, description).unwrap();

    let scene = SceneDescription::load(&path).unwrap();
    let summary = export(&scene, dir.path().join("tri.glb"), ResourceFormat::Bin);
    assert_eq!(summary.stats.images, 1);

    let (document, buffers, _) = gltf::import(&summary.output).unwrap();
    let primitive = document.meshes().next().unwrap().primitives().next().unwrap();
    let reader = primitive.reader(|b| Some(&buffers[b.index()]));
    let colors: Vec<[f32; 3]> = reader.read_colors(0).unwrap().into_rgb_f32().collect();
    assert_eq!(colors, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    let pbr = primitive.material().pbr_metallic_roughness();
    assert!((pbr.metallic_factor() - 0.7).abs() < 1e-6);
    assert!((pbr.roughness_factor() - 0.3).abs() < 1e-6);
}

#[test]
fn test_bad_description_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"nodes\": [ { } ] }").unwrap();
    assert!(matches!(
        SceneDescription::load(&path),
        Err(Error::SceneDescriptionFailed { .. })
    ));
}
