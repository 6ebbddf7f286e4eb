//! Keyframe animation for `GltfBuilder`

use crate::error::{Error, Result};
use crate::scene::{
    ChannelPath, KeyframeTrack, NodeId, SceneSource, TangentType, normalize_quaternion,
};

use super::super::accessors::AccessorLayout;
use super::super::buffer::{AccessorData, AccessorType};
use super::super::types::{
    AccessorBounds, GltfAnimation, GltfAnimationSampler, GltfChannel, GltfChannelTarget,
};
use super::GltfBuilder;

/// glTF sampler interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

impl Interpolation {
    /// Interpolation implied by a host out-tangent type.
    #[must_use]
    pub fn from_tangent(tangent: TangentType) -> Self {
        match tangent {
            TangentType::Step | TangentType::StepNext => Self::Step,
            TangentType::Linear | TangentType::Auto => Self::Linear,
            TangentType::Spline
            | TangentType::Fast
            | TangentType::Slow
            | TangentType::Fixed
            | TangentType::Clamped
            | TangentType::Plateau => Self::CubicSpline,
        }
    }

    /// Interpolation actually written. Cubic samplers need in/out tangents
    /// per key, which are not sampled, so they are written as linear.
    #[must_use]
    pub fn exported(self) -> Self {
        match self {
            Self::CubicSpline => Self::Linear,
            other => other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "LINEAR",
            Self::Step => "STEP",
            Self::CubicSpline => "CUBICSPLINE",
        }
    }
}

/// Channels and samplers of the one exported animation.
#[derive(Debug, Clone)]
pub struct AnimationBuilder {
    name: String,
    channels: Vec<GltfChannel>,
    samplers: Vec<GltfAnimationSampler>,
}

impl AnimationBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
            samplers: Vec::new(),
        }
    }

    fn add_channel(&mut self, node: usize, path: ChannelPath, sampler: GltfAnimationSampler) {
        self.samplers.push(sampler);
        self.channels.push(GltfChannel {
            sampler: self.samplers.len() - 1,
            target: GltfChannelTarget {
                node,
                path: path.as_str().to_string(),
            },
        });
    }

    /// The animation, or `None` if nothing was keyed.
    #[must_use]
    pub fn build(self) -> Option<GltfAnimation> {
        if self.channels.is_empty() {
            return None;
        }
        Some(GltfAnimation {
            name: Some(self.name),
            channels: self.channels,
            samplers: self.samplers,
        })
    }
}

impl GltfBuilder {
    /// Add a channel for every keyed transform property of a node.
    pub(crate) fn add_node_animation<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        node: NodeId,
        node_index: usize,
        node_name: &str,
    ) -> Result<()> {
        let fps = source.time_unit().fps();
        for path in ChannelPath::ALL {
            if let Some(track) = source.keyframes(node, path)? {
                self.add_animation_channel(node_index, node_name, path, &track, fps)?;
            }
        }
        Ok(())
    }

    fn add_animation_channel(
        &mut self,
        node_index: usize,
        node_name: &str,
        path: ChannelPath,
        track: &KeyframeTrack,
        fps: f64,
    ) -> Result<()> {
        let (times, values) = prepare_track(node_name, path, track, fps)?;
        let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
            return Ok(());
        };

        let prefix = format!("{node_name}_{}_sampler", path.as_str());
        let input = self.create_accessor(
            AccessorData::Float(&times),
            AccessorLayout::KEY_TIMES,
            format!("{prefix}_tTime"),
        )?;
        #[allow(clippy::cast_possible_truncation)]
        self.registry.set_bounds(
            input,
            AccessorBounds::Float(vec![first as f32]),
            AccessorBounds::Float(vec![last as f32]),
        );

        let value_type = match path {
            ChannelPath::Rotation => AccessorType::Vec4,
            ChannelPath::Translation | ChannelPath::Scale => AccessorType::Vec3,
        };
        let output = self.create_accessor(
            AccessorData::Float(&values),
            AccessorLayout::animation(value_type),
            format!("{prefix}_tVal"),
        )?;

        let interpolation = Interpolation::from_tangent(track.first_tangent);
        if interpolation == Interpolation::CubicSpline {
            tracing::debug!(
                "{}.{}: spline tangents are not sampled, writing LINEAR",
                node_name,
                path.as_str()
            );
        }

        if let Some(animation) = self.animation.as_mut() {
            animation.add_channel(
                node_index,
                path,
                GltfAnimationSampler {
                    input,
                    output,
                    interpolation: interpolation.exported().as_str().to_string(),
                },
            );
        }
        Ok(())
    }
}

/// Sort keys by time, drop repeated times, convert to seconds and flatten
/// the values. Rotation keys are re-normalized.
fn prepare_track(
    node: &str,
    path: ChannelPath,
    track: &KeyframeTrack,
    fps: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let invalid = |message: String| Error::InvalidKeyframes {
        node: node.to_string(),
        channel: path.as_str(),
        message,
    };

    if track.times.len() != track.values.len() {
        return Err(invalid(format!(
            "{} key times but {} values",
            track.times.len(),
            track.values.len()
        )));
    }
    let arity = path.arity();
    if let Some(value) = track.values.iter().find(|v| v.len() != arity) {
        return Err(invalid(format!(
            "expected {arity} components per key, got {}",
            value.len()
        )));
    }

    let mut keys: Vec<(f64, &[f64])> = track
        .times
        .iter()
        .copied()
        .zip(track.values.iter().map(Vec::as_slice))
        .collect();
    keys.sort_by(|a, b| a.0.total_cmp(&b.0));
    keys.dedup_by(|later, earlier| later.0 == earlier.0);

    let times = keys.iter().map(|(t, _)| t / fps).collect();
    let values = keys
        .iter()
        .flat_map(|&(_, v)| match path {
            ChannelPath::Rotation => normalize_quaternion([v[0], v[1], v[2], v[3]]).to_vec(),
            ChannelPath::Translation | ChannelPath::Scale => v.to_vec(),
        })
        .collect();

    Ok((times, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_map() {
        assert_eq!(Interpolation::from_tangent(TangentType::Step), Interpolation::Step);
        assert_eq!(Interpolation::from_tangent(TangentType::StepNext), Interpolation::Step);
        assert_eq!(Interpolation::from_tangent(TangentType::Auto), Interpolation::Linear);
        assert_eq!(Interpolation::from_tangent(TangentType::Plateau), Interpolation::CubicSpline);
        assert_eq!(Interpolation::CubicSpline.exported(), Interpolation::Linear);
        assert_eq!(Interpolation::Step.exported().as_str(), "STEP");
    }

    #[test]
    fn test_prepare_track_sorts_and_dedups() {
        let track = KeyframeTrack {
            times: vec![48.0, 24.0, 24.0, 0.0],
            values: vec![vec![3.0; 3], vec![2.0; 3], vec![9.0; 3], vec![1.0; 3]],
            first_tangent: TangentType::Linear,
        };
        let (times, values) = prepare_track("cube", ChannelPath::Translation, &track, 24.0).unwrap();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert_eq!(values, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_prepare_track_normalizes_rotation() {
        let track = KeyframeTrack {
            times: vec![0.0],
            values: vec![vec![0.0, 0.0, 0.0, 2.0]],
            first_tangent: TangentType::Step,
        };
        let (_, values) = prepare_track("cube", ChannelPath::Rotation, &track, 30.0).unwrap();
        assert_eq!(values, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_prepare_track_rejects_bad_arity() {
        let track = KeyframeTrack {
            times: vec![0.0, 1.0],
            values: vec![vec![0.0; 3], vec![0.0; 3]],
            first_tangent: TangentType::Linear,
        };
        assert!(matches!(
            prepare_track("cube", ChannelPath::Rotation, &track, 24.0),
            Err(Error::InvalidKeyframes { channel: "rotation", .. })
        ));

        let short = KeyframeTrack {
            times: vec![0.0, 1.0],
            values: vec![vec![0.0; 3]],
            first_tangent: TangentType::Linear,
        };
        assert!(prepare_track("cube", ChannelPath::Scale, &short, 24.0).is_err());
    }

    #[test]
    fn test_empty_animation_builds_nothing() {
        assert!(AnimationBuilder::new("defaultAnimation").build().is_none());
    }
}
