use std::sync::Arc;

use glam::Mat4;

use crate::animation_clip::AnimationClip;
use crate::pose::LocalPose;
use crate::skeleton::Skeleton;

/// Shared, immutable clip handle.
pub type Clip = Arc<AnimationClip>;

/// Everything the animator plays for the next advance. The two clocks are
/// named so callers cannot swap them by position.
#[derive(Clone, Debug)]
pub struct BlendTargets {
    pub primary: Clip,
    pub secondary: Option<Clip>,
    pub primary_time: f32,
    pub secondary_time: f32,
    /// 0 plays only `primary`, 1 only `secondary`.
    pub weight: f32,
}

impl BlendTargets {
    pub fn single(clip: Clip, time: f32) -> Self {
        Self {
            primary: clip,
            secondary: None,
            primary_time: time,
            secondary_time: 0.0,
            weight: 0.0,
        }
    }
}

/// Two-clip blend controller.
///
/// Holds a primary clip and an optional secondary clip with independent
/// looping clocks. Each [`Animator::advance`] moves both clocks forward,
/// samples the clip(s) and refreshes the final bone matrices.
pub struct Animator {
    skeleton: Arc<Skeleton>,
    primary: Clip,
    secondary: Option<Clip>,
    primary_time: f32,
    secondary_time: f32,
    blend_weight: f32,

    primary_pose: LocalPose,
    secondary_pose: LocalPose,
    blended_pose: LocalPose,
    final_bone_matrices: Vec<Mat4>,
}

impl Animator {
    pub fn new(skeleton: Arc<Skeleton>, clip: Clip) -> Self {
        let rest = LocalPose::rest(&skeleton);
        let mut animator = Self {
            primary: clip,
            secondary: None,
            primary_time: 0.0,
            secondary_time: 0.0,
            blend_weight: 0.0,
            primary_pose: rest.clone(),
            secondary_pose: rest.clone(),
            blended_pose: rest,
            final_bone_matrices: Vec::with_capacity(skeleton.bone_count()),
            skeleton,
        };
        animator.refresh_pose();
        animator
    }

    /// Replaces the playback targets. Takes effect on the next advance; no
    /// smoothing beyond the supplied weight.
    pub fn set_targets(&mut self, targets: BlendTargets) {
        self.primary_time = targets.primary.wrap_time(targets.primary_time);
        self.secondary_time = match &targets.secondary {
            Some(clip) => clip.wrap_time(targets.secondary_time),
            None => 0.0,
        };
        self.blend_weight = if targets.weight.is_nan() {
            0.0
        } else {
            targets.weight.clamp(0.0, 1.0)
        };
        self.primary = targets.primary;
        self.secondary = targets.secondary;
    }

    pub fn play_single(&mut self, clip: Clip, time: f32) {
        self.set_targets(BlendTargets::single(clip, time));
    }

    pub fn cross_fade(&mut self, from: Clip, to: Clip, from_time: f32, to_time: f32, weight: f32) {
        self.set_targets(BlendTargets {
            primary: from,
            secondary: Some(to),
            primary_time: from_time,
            secondary_time: to_time,
            weight,
        });
    }

    /// Moves every live clock forward by `dt` seconds (wrapping each by its
    /// own clip's duration) and recomputes the output pose.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.primary_time = self.primary.wrap_time(self.primary_time + dt);
        if let Some(secondary) = &self.secondary {
            self.secondary_time = secondary.wrap_time(self.secondary_time + dt);
        }

        self.refresh_pose();
    }

    pub fn primary_clip(&self) -> &Clip {
        &self.primary
    }

    pub fn secondary_clip(&self) -> Option<&Clip> {
        self.secondary.as_ref()
    }

    pub fn primary_time(&self) -> f32 {
        self.primary_time
    }

    pub fn secondary_time(&self) -> f32 {
        self.secondary_time
    }

    /// Only meaningful while a secondary clip is set.
    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn pose(&self) -> &LocalPose {
        &self.blended_pose
    }

    pub fn final_bone_matrices(&self) -> &[Mat4] {
        &self.final_bone_matrices
    }

    /// Column-major bone matrices as raw bytes, ready for a buffer upload.
    pub fn bone_matrix_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.final_bone_matrices)
    }

    fn refresh_pose(&mut self) {
        let skeleton = &self.skeleton;

        self.primary_pose.reset_to_rest(skeleton);
        self.primary.sample_into(self.primary_time, &mut self.primary_pose);

        match &self.secondary {
            Some(secondary) => {
                self.secondary_pose.reset_to_rest(skeleton);
                secondary.sample_into(self.secondary_time, &mut self.secondary_pose);
                self.blended_pose
                    .blend(&self.primary_pose, &self.secondary_pose, self.blend_weight);
            }
            None => self.blended_pose.clone_from(&self.primary_pose),
        }

        skeleton.compute_bone_matrices(&self.blended_pose, &mut self.final_bone_matrices);
    }
}
