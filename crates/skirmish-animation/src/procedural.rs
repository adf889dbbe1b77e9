//! Stand-in rigs and clips for headless runs and tests, used when no asset
//! loader is attached.

use glam::{Quat, Vec3};
use skirmish_core::{Result, Transform};

use crate::animation_clip::{AnimationChannel, AnimationClip, KeyFrame};
use crate::skeleton::Skeleton;

/// A seven-bone biped: hips, spine, head, two arms and two legs.
pub fn biped_skeleton() -> Result<Skeleton> {
    let mut skeleton = Skeleton::new();
    let hips = skeleton.add_bone("hips", None, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))?;
    let spine = skeleton.add_bone("spine", Some(hips), Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))?;
    skeleton.add_bone("head", Some(spine), Transform::from_position(Vec3::new(0.0, 0.6, 0.0)))?;
    skeleton.add_bone("arm_l", Some(spine), Transform::from_position(Vec3::new(-0.4, 0.4, 0.0)))?;
    skeleton.add_bone("arm_r", Some(spine), Transform::from_position(Vec3::new(0.4, 0.4, 0.0)))?;
    skeleton.add_bone("leg_l", Some(hips), Transform::from_position(Vec3::new(-0.2, -0.1, 0.0)))?;
    skeleton.add_bone("leg_r", Some(hips), Transform::from_position(Vec3::new(0.2, -0.1, 0.0)))?;
    Ok(skeleton)
}

/// A looping clip that swings every non-root bone about its local X axis by
/// `amplitude_degrees`, alternating sides, and bobs the root.
pub fn swing_clip(name: &str, duration: f32, skeleton: &Skeleton, amplitude_degrees: f32) -> AnimationClip {
    let amplitude = amplitude_degrees.to_radians();
    let half = duration * 0.5;
    let mut clip = AnimationClip::new(name, duration);

    for (index, bone) in skeleton.bones().iter().enumerate() {
        let mut channel = AnimationChannel::new(index);
        match bone.parent {
            None => {
                let base = bone.rest.position;
                channel.position_keys = vec![
                    KeyFrame::new(0.0, base),
                    KeyFrame::new(half, base + Vec3::new(0.0, 0.05, 0.0)),
                    KeyFrame::new(duration, base),
                ];
            }
            Some(_) => {
                let side = if index % 2 == 0 { 1.0 } else { -1.0 };
                let swing = Quat::from_rotation_x(amplitude * side);
                channel.rotation_keys = vec![
                    KeyFrame::new(0.0, bone.rest.rotation),
                    KeyFrame::new(half, bone.rest.rotation * swing),
                    KeyFrame::new(duration, bone.rest.rotation),
                ];
            }
        }
        clip.channels.push(channel);
    }

    clip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stand_in_clip_is_valid_for_its_rig() {
        let skeleton = biped_skeleton().unwrap();
        assert_eq!(skeleton.bone_count(), 7);
        let clip = swing_clip("walk", 2.06, &skeleton, 25.0);
        assert!(clip.validate(skeleton.bone_count()).is_ok());
        assert_eq!(clip.channels.len(), 7);
    }
}
