//! Combat layer: per-actor state machines driving the animator, melee hit
//! resolution, and the arena that steps player, enemy and merchant together.

pub mod actor;
pub mod arena;
pub mod assets;
pub mod config;
pub mod hitbox;
pub mod input;
pub mod locomotion;
pub mod state_machine;
pub mod vitality;

pub use actor::{Actor, ActorRole, PoseOverride};
pub use arena::{Arena, CombatEvent, FrameReport, RenderPacket};
pub use config::{ActionConfig, ActorConfig, ArenaConfig, BlendClock, DyingConfig, PoseOverrideConfig};
pub use hitbox::{check_melee_hit, HitResolver, HitWindow, StrikeHit, StrikeProfile, STRIKE_REARM_TIME, STRIKE_WINDOW};
pub use input::{Actions, FrameInput};
pub use locomotion::{Kinematics, Locomotion};
pub use state_machine::{
    ActionKind, ActionSlot, CombatState, CombatStateMachine, DyingProfile, ExitRule, Transition,
    BLEND_SNAP_THRESHOLD,
};
pub use vitality::{DamageOutcome, Vitality};
