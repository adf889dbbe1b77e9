use glam::{Quat, Vec3};
use skirmish_core::{Result, SkirmishError};

use crate::pose::LocalPose;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFrame<T> {
    pub time: f32,
    pub value: T,
}

impl<T> KeyFrame<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Keyframe tracks for one bone. An empty track leaves that component of the
/// bone at its rest value.
#[derive(Clone, Debug, Default)]
pub struct AnimationChannel {
    pub bone_index: usize,
    pub position_keys: Vec<KeyFrame<Vec3>>,
    pub rotation_keys: Vec<KeyFrame<Quat>>,
    pub scale_keys: Vec<KeyFrame<Vec3>>,
}

impl AnimationChannel {
    pub fn new(bone_index: usize) -> Self {
        Self {
            bone_index,
            ..Default::default()
        }
    }
}

/// A looping skeletal clip. Immutable once loaded; actors share it behind an
/// `Arc` (see [`crate::Clip`]).
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<AnimationChannel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            channels: Vec::new(),
        }
    }

    pub fn with_channel(mut self, channel: AnimationChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Maps any playback time into `[0, duration)`.
    pub fn wrap_time(&self, time: f32) -> f32 {
        if !time.is_finite() {
            return 0.0;
        }
        let wrapped = time.rem_euclid(self.duration);
        // rem_euclid can round up to the divisor for tiny negative inputs.
        if wrapped >= self.duration {
            0.0
        } else {
            wrapped
        }
    }

    /// Checks the clip on its own and against a skeleton of `bone_count` bones.
    pub fn validate(&self, bone_count: usize) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SkirmishError::clip(
                &self.name,
                format!("duration must be positive, got {}", self.duration),
            ));
        }
        for channel in &self.channels {
            if channel.bone_index >= bone_count {
                return Err(SkirmishError::clip(
                    &self.name,
                    format!(
                        "channel targets bone {} but the skeleton has {bone_count}",
                        channel.bone_index
                    ),
                ));
            }
            let times = channel
                .position_keys
                .iter()
                .map(|k| k.time)
                .chain(channel.rotation_keys.iter().map(|k| k.time))
                .chain(channel.scale_keys.iter().map(|k| k.time));
            for t in times {
                if !t.is_finite() || t < 0.0 || t > self.duration {
                    return Err(SkirmishError::clip(
                        &self.name,
                        format!("key time {t} outside [0, {}]", self.duration),
                    ));
                }
            }
            if !is_sorted(&channel.position_keys)
                || !is_sorted(&channel.rotation_keys)
                || !is_sorted(&channel.scale_keys)
            {
                return Err(SkirmishError::clip(&self.name, "keys out of order"));
            }
        }
        Ok(())
    }

    /// Samples the clip at `time` (wrapped) on top of `pose`, which should
    /// already hold the rest pose for bones the clip does not animate.
    pub fn sample_into(&self, time: f32, pose: &mut LocalPose) {
        let t = self.wrap_time(time);

        for channel in &self.channels {
            if channel.bone_index >= pose.len() {
                continue;
            }
            let bone = pose.bone_mut(channel.bone_index);
            if let Some(position) = sample_keys(&channel.position_keys, t) {
                bone.position = position;
            }
            if let Some(rotation) = sample_keys(&channel.rotation_keys, t) {
                bone.rotation = rotation;
            }
            if let Some(scale) = sample_keys(&channel.scale_keys, t) {
                bone.scale = scale;
            }
        }
    }
}

trait Interpolate: Copy {
    fn interpolate(self, other: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.slerp(other, t)
    }
}

fn sample_keys<T: Interpolate>(keys: &[KeyFrame<T>], time: f32) -> Option<T> {
    let first = keys.first()?;
    let last = keys[keys.len() - 1];

    if keys.len() == 1 || time <= first.time {
        return Some(first.value);
    }
    if time >= last.time {
        return Some(last.value);
    }

    let next = keys.partition_point(|k| k.time <= time);
    let (a, b) = (keys[next - 1], keys[next]);
    let span = b.time - a.time;
    if span <= f32::EPSILON {
        return Some(b.value);
    }
    Some(a.value.interpolate(b.value, (time - a.time) / span))
}

fn is_sorted<T>(keys: &[KeyFrame<T>]) -> bool {
    keys.windows(2).all(|w| w[0].time <= w[1].time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Skeleton;
    use skirmish_core::Transform;

    fn one_bone() -> Skeleton {
        let mut skeleton = Skeleton::new();
        skeleton.add_bone("root", None, Transform::IDENTITY).unwrap();
        skeleton
    }

    fn slide(duration: f32) -> AnimationClip {
        let mut channel = AnimationChannel::new(0);
        channel.position_keys = vec![
            KeyFrame::new(0.0, Vec3::ZERO),
            KeyFrame::new(duration, Vec3::new(2.0, 0.0, 0.0)),
        ];
        AnimationClip::new("slide", duration).with_channel(channel)
    }

    #[test]
    fn samples_between_keys() {
        let skeleton = one_bone();
        let clip = slide(2.0);
        let mut pose = LocalPose::rest(&skeleton);
        clip.sample_into(0.5, &mut pose);
        assert!(pose.bone(0).position.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn wraps_long_and_negative_times() {
        let clip = slide(2.0);
        assert!((clip.wrap_time(5.0) - 1.0).abs() < 1e-6);
        assert!((clip.wrap_time(-0.5) - 1.5).abs() < 1e-6);
        assert_eq!(clip.wrap_time(f32::NAN), 0.0);
        let tiny = clip.wrap_time(-1e-9);
        assert!((0.0..2.0).contains(&tiny));
    }

    #[test]
    fn untouched_components_keep_rest() {
        let mut skeleton = Skeleton::new();
        skeleton
            .add_bone("root", None, Transform::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let mut channel = AnimationChannel::new(0);
        channel.rotation_keys = vec![KeyFrame::new(0.0, Quat::from_rotation_x(0.5))];
        let clip = AnimationClip::new("tilt", 1.0).with_channel(channel);

        let mut pose = LocalPose::rest(&skeleton);
        clip.sample_into(0.3, &mut pose);
        assert_eq!(pose.bone(0).position, Vec3::new(0.0, 3.0, 0.0));
        assert!(pose.bone(0).rotation.abs_diff_eq(Quat::from_rotation_x(0.5), 1e-6));
    }

    #[test]
    fn validation_catches_bad_clips() {
        assert!(slide(2.0).validate(1).is_ok());
        assert!(slide(2.0).validate(0).is_err());
        assert!(AnimationClip::new("empty", 0.0).validate(1).is_err());

        let mut channel = AnimationChannel::new(0);
        channel.scale_keys = vec![KeyFrame::new(0.8, Vec3::ONE), KeyFrame::new(0.2, Vec3::ONE)];
        let unordered = AnimationClip::new("unordered", 1.0).with_channel(channel);
        assert!(matches!(
            unordered.validate(1),
            Err(SkirmishError::InvalidClip { .. })
        ));
    }
}
