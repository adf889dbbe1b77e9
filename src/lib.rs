//! Skirmish - skeletal animation blending and melee combat for a three-actor arena
//!
//! A player, an enemy and a merchant each run the same four-phase combat state
//! machine over a two-clip blend controller. Strikes land only inside a window
//! of their clip's playback time, and health, death and render suppression
//! follow from those hits.

pub use skirmish_animation as animation;
pub use skirmish_combat as combat;
pub use skirmish_core as core;

pub use skirmish_core::{Result, SkirmishError};

pub mod prelude {
    pub use crate::animation::{AnimationClip, Animator, BlendTargets, Clip, ClipLibrary, LocalPose, Skeleton};
    pub use crate::combat::assets::stand_in_library;
    pub use crate::combat::{
        ActionKind, Actions, Actor, ActorConfig, ActorRole, Arena, ArenaConfig, BlendClock, CombatEvent,
        CombatState, FrameInput, FrameReport, RenderPacket,
    };
    pub use crate::core::{Aabb, OrientedBox, Transform};
    pub use glam;
}
