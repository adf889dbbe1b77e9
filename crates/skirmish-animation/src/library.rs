use std::collections::HashMap;
use std::sync::Arc;

use skirmish_core::{Result, SkirmishError};

use crate::animation_clip::AnimationClip;
use crate::blend_controller::Clip;
use crate::skeleton::Skeleton;

/// Named skeletons and clips handed over by the asset loader.
///
/// Every clip is validated against its skeleton on insert, so a handle pulled
/// out of the library is always playable on that skeleton.
#[derive(Default)]
pub struct ClipLibrary {
    skeletons: HashMap<String, Arc<Skeleton>>,
    clips: HashMap<String, (Clip, String)>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skeleton(&mut self, name: &str, skeleton: Skeleton) -> Arc<Skeleton> {
        let skeleton = Arc::new(skeleton);
        if self
            .skeletons
            .insert(name.to_string(), skeleton.clone())
            .is_some()
        {
            log::warn!("Replacing skeleton '{}'", name);
        }
        skeleton
    }

    pub fn add_clip(&mut self, skeleton: &str, clip: AnimationClip) -> Result<Clip> {
        let rig = self.skeleton(skeleton)?;
        clip.validate(rig.bone_count())?;

        let clip = Arc::new(clip);
        log::debug!(
            "Registered clip '{}' ({:.2}s) on '{}'",
            clip.name,
            clip.duration,
            skeleton
        );
        self.clips
            .insert(clip.name.clone(), (clip.clone(), skeleton.to_string()));
        Ok(clip)
    }

    pub fn skeleton(&self, name: &str) -> Result<Arc<Skeleton>> {
        self.skeletons
            .get(name)
            .cloned()
            .ok_or_else(|| SkirmishError::MissingSkeleton(name.to_string()))
    }

    pub fn clip(&self, name: &str) -> Result<Clip> {
        self.clips
            .get(name)
            .map(|(clip, _)| clip.clone())
            .ok_or_else(|| SkirmishError::MissingClip(name.to_string()))
    }

    /// Looks up a clip and checks it was registered for `skeleton`.
    pub fn clip_for(&self, skeleton: &str, name: &str) -> Result<Clip> {
        let (clip, owner) = self
            .clips
            .get(name)
            .ok_or_else(|| SkirmishError::MissingClip(name.to_string()))?;
        if owner != skeleton {
            return Err(SkirmishError::clip(
                name,
                format!("registered for skeleton '{owner}', not '{skeleton}'"),
            ));
        }
        Ok(clip.clone())
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}
