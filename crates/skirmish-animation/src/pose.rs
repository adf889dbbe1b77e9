use skirmish_core::Transform;

use crate::skeleton::Skeleton;

/// Per-bone local transforms for one instant, indexed like the skeleton.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalPose {
    bones: Vec<Transform>,
}

impl LocalPose {
    pub fn rest(skeleton: &Skeleton) -> Self {
        Self {
            bones: skeleton.bones().iter().map(|b| b.rest).collect(),
        }
    }

    pub fn reset_to_rest(&mut self, skeleton: &Skeleton) {
        self.bones.clear();
        self.bones.extend(skeleton.bones().iter().map(|b| b.rest));
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, index: usize) -> &Transform {
        &self.bones[index]
    }

    pub fn bone_mut(&mut self, index: usize) -> &mut Transform {
        &mut self.bones[index]
    }

    pub fn bones(&self) -> &[Transform] {
        &self.bones
    }

    /// Overwrites `self` with the per-bone interpolation of `from` towards
    /// `to` by `weight`.
    pub fn blend(&mut self, from: &LocalPose, to: &LocalPose, weight: f32) {
        debug_assert_eq!(from.len(), to.len());
        self.bones.clear();
        self.bones.extend(
            from.bones
                .iter()
                .zip(&to.bones)
                .map(|(a, b)| a.interpolate(b, weight)),
        );
    }
}
