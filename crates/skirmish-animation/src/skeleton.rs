use std::collections::HashMap;

use glam::Mat4;
use skirmish_core::{Result, SkirmishError, Transform};

use crate::pose::LocalPose;

pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Rest-pose transform relative to the parent bone.
    pub rest: Transform,
    pub inverse_bind_pose: Mat4,
}

/// Bone hierarchy. Parents are always stored before their children, so a
/// single forward pass resolves global transforms.
pub struct Skeleton {
    bones: Vec<Bone>,
    bone_names: HashMap<String, usize>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            bone_names: HashMap::new(),
        }
    }

    /// Adds a bone whose inverse bind matrix is derived from the rest pose,
    /// so sampling the rest pose yields identity skinning matrices.
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>, rest: Transform) -> Result<usize> {
        let parent_global = match parent {
            Some(p) => self.rest_global(p)?,
            None => Mat4::IDENTITY,
        };
        let inverse_bind_pose = (parent_global * rest.to_matrix()).inverse();
        self.add_bone_with_bind(name, parent, rest, inverse_bind_pose)
    }

    pub fn add_bone_with_bind(
        &mut self,
        name: &str,
        parent: Option<usize>,
        rest: Transform,
        inverse_bind_pose: Mat4,
    ) -> Result<usize> {
        let index = self.bones.len();
        if let Some(p) = parent {
            if p >= index {
                return Err(SkirmishError::InvalidSkeleton(format!(
                    "bone '{name}' references parent {p} which is not defined before it"
                )));
            }
        }
        if self.bone_names.contains_key(name) {
            return Err(SkirmishError::InvalidSkeleton(format!(
                "duplicate bone name '{name}'"
            )));
        }

        self.bone_names.insert(name.to_string(), index);
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            rest,
            inverse_bind_pose,
        });
        Ok(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_names.get(name).copied()
    }

    /// Writes `global * inverse_bind` for every bone of `pose` into `out`.
    pub fn compute_bone_matrices(&self, pose: &LocalPose, out: &mut Vec<Mat4>) {
        out.clear();
        out.resize(self.bones.len(), Mat4::IDENTITY);

        // Globals first, then fold in the bind pose in place.
        for (i, bone) in self.bones.iter().enumerate() {
            let parent_matrix = bone.parent.map(|p| out[p]).unwrap_or(Mat4::IDENTITY);
            out[i] = parent_matrix * pose.bone(i).to_matrix();
        }
        for (matrix, bone) in out.iter_mut().zip(&self.bones) {
            *matrix *= bone.inverse_bind_pose;
        }
    }

    fn rest_global(&self, index: usize) -> Result<Mat4> {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let bone = self.bones.get(i).ok_or_else(|| {
                SkirmishError::InvalidSkeleton(format!("unknown parent bone {i}"))
            })?;
            matrix = bone.rest.to_matrix() * matrix;
            cursor = bone.parent;
        }
        Ok(matrix)
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}
