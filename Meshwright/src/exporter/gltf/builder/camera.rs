//! Camera methods for `GltfBuilder`

use crate::error::Result;
use crate::scene::{CameraId, CameraProjection, CameraSource, SceneSource};

use super::super::types::{GltfCamera, GltfOrthographic, GltfPerspective};
use super::GltfBuilder;

impl GltfBuilder {
    /// Register a host camera, named after the node it hangs under.
    pub(crate) fn add_camera<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        id: CameraId,
        name: &str,
    ) -> Result<usize> {
        if let Some(&index) = self.camera_indices.get(&id) {
            return Ok(index);
        }
        let camera = source.camera(id)?;
        let index = self.cameras.push(camera_json(name, &camera));
        self.camera_indices.insert(id, index);
        Ok(index)
    }
}

fn camera_json(name: &str, camera: &CameraSource) -> GltfCamera {
    let (perspective, orthographic) = match camera.projection {
        CameraProjection::Perspective {
            aspect_ratio,
            vertical_fov_degrees,
        } => (
            Some(GltfPerspective {
                aspect_ratio,
                yfov: vertical_fov_degrees.to_radians(),
                znear: camera.near_clip,
                zfar: camera.far_clip,
            }),
            None,
        ),
        CameraProjection::Orthographic { orthographic_width } => (
            None,
            Some(GltfOrthographic {
                xmag: orthographic_width,
                ymag: orthographic_width,
                znear: camera.near_clip,
                zfar: camera.far_clip,
            }),
        ),
    };

    GltfCamera {
        name: Some(name.to_string()),
        camera_type: if perspective.is_some() { "perspective" } else { "orthographic" }.to_string(),
        perspective,
        orthographic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_camera() {
        let camera = camera_json(
            "persp1",
            &CameraSource {
                projection: CameraProjection::Perspective {
                    aspect_ratio: 1.5,
                    vertical_fov_degrees: 90.0,
                },
                near_clip: 0.1,
                far_clip: 1000.0,
            },
        );
        assert_eq!(camera.camera_type, "perspective");
        let p = camera.perspective.unwrap();
        assert!((p.yfov - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(p.aspect_ratio, 1.5);
        assert!(camera.orthographic.is_none());
    }

    #[test]
    fn test_orthographic_camera() {
        let camera = camera_json(
            "top",
            &CameraSource {
                projection: CameraProjection::Orthographic {
                    orthographic_width: 30.0,
                },
                near_clip: 0.1,
                far_clip: 100.0,
            },
        );
        assert_eq!(camera.camera_type, "orthographic");
        let o = camera.orthographic.unwrap();
        assert_eq!((o.xmag, o.ymag), (30.0, 30.0));
    }
}
