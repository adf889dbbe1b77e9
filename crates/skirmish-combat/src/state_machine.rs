//! Per-actor combat state machine.
//!
//! Every action follows the same four-phase cycle: `Resting` cross-fades into
//! `Entering(n)`, snaps into `Acting(n)`, then cross-fades back through
//! `Leaving(n)` to `Resting`. Actors differ only in their action table, blend
//! rates and exit rules. Player and enemy additionally carry a one-way
//! `Dying` → `Dead` branch.

use std::fmt;

use skirmish_animation::{Animator, Clip};

use crate::input::Actions;
use crate::vitality::Vitality;

/// Blend weight above which a cross-fade snaps to its target clip.
pub const BLEND_SNAP_THRESHOLD: f32 = 0.9;
/// Clip time after which an attack or turn is allowed to blend back out.
pub const ATTACK_EXIT_TIME: f32 = 0.7;
pub const TURN_EXIT_TIME: f32 = 0.7;
pub const KICK_EXIT_TIME: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Walk,
    WalkBack,
    Turn,
    Attack,
    Kick,
    Talk,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Walk => "walk",
            ActionKind::WalkBack => "walk-back",
            ActionKind::Turn => "turn",
            ActionKind::Attack => "attack",
            ActionKind::Kick => "kick",
            ActionKind::Talk => "talk",
        };
        f.write_str(name)
    }
}

/// When an actor in `Acting(n)` may start blending back to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitRule {
    /// Looping locomotion: leave as soon as the trigger is released.
    OnRelease,
    /// One-shot: committed until the clip's local time passes this many seconds.
    AfterClipTime(f32),
    /// Conversation: leave when the trigger is pressed again or the
    /// conversation flag is cleared from outside.
    OnToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatState {
    Resting,
    Entering(ActionKind),
    Acting(ActionKind),
    Leaving(ActionKind),
    Dying,
    Dead,
}

impl CombatState {
    pub fn action(&self) -> Option<ActionKind> {
        match self {
            CombatState::Entering(kind) | CombatState::Acting(kind) | CombatState::Leaving(kind) => {
                Some(*kind)
            }
            _ => None,
        }
    }

    pub fn is_blending(&self) -> bool {
        matches!(
            self,
            CombatState::Entering(_) | CombatState::Leaving(_) | CombatState::Dying
        )
    }
}

impl fmt::Display for CombatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatState::Resting => f.write_str("resting"),
            CombatState::Entering(kind) => write!(f, "resting->{kind}"),
            CombatState::Acting(kind) => write!(f, "{kind}"),
            CombatState::Leaving(kind) => write!(f, "{kind}->resting"),
            CombatState::Dying => f.write_str("resting->dying"),
            CombatState::Dead => f.write_str("dead"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionSlot {
    pub kind: ActionKind,
    pub clip: Clip,
    /// Any of these held while resting starts the action.
    pub trigger: Actions,
    pub exit: ExitRule,
}

#[derive(Debug, Clone)]
pub struct DyingProfile {
    pub clip: Clip,
    pub blend_rate: f32,
    /// Debug input that forces the dying blend without any damage.
    pub trigger: Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CombatState,
    pub to: CombatState,
}

pub struct CombatStateMachine {
    state: CombatState,
    blend_weight: f32,
    blend_rate: f32,
    rest_clip: Clip,
    actions: Vec<ActionSlot>,
    dying: Option<DyingProfile>,
    conversation_active: bool,
}

impl CombatStateMachine {
    pub fn new(rest_clip: Clip, blend_rate: f32) -> Self {
        Self {
            state: CombatState::Resting,
            blend_weight: 0.0,
            blend_rate,
            rest_clip,
            actions: Vec::new(),
            dying: None,
            conversation_active: false,
        }
    }

    /// Appends an action. Table order is trigger priority when resting; every
    /// action trigger outranks the dying branch.
    pub fn with_action(mut self, slot: ActionSlot) -> Self {
        self.actions.push(slot);
        self
    }

    pub fn with_dying(mut self, profile: DyingProfile) -> Self {
        self.dying = Some(profile);
        self
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    pub fn blend_rate(&self) -> f32 {
        self.blend_rate
    }

    pub fn rest_clip(&self) -> &Clip {
        &self.rest_clip
    }

    pub fn actions(&self) -> &[ActionSlot] {
        &self.actions
    }

    pub fn slot(&self, kind: ActionKind) -> Option<&ActionSlot> {
        self.actions.iter().find(|slot| slot.kind == kind)
    }

    pub fn conversation_active(&self) -> bool {
        self.conversation_active
    }

    /// Clearing the flag while talking makes the next step leave `Acting(Talk)`.
    pub fn set_conversation_active(&mut self, active: bool) {
        self.conversation_active = active;
    }

    /// Runs one update: evaluates the current state, feeds the animator its
    /// new targets and returns the transition taken, if any.
    ///
    /// `frames` scales the per-update blend rates (1.0 for one update).
    pub fn step(
        &mut self,
        animator: &mut Animator,
        vitality: &mut Vitality,
        held: Actions,
        frames: f32,
    ) -> Option<Transition> {
        let from = self.state;
        let to = match from {
            CombatState::Resting => self.step_resting(animator, vitality, held),
            CombatState::Entering(kind) => self.step_entering(kind, animator, frames),
            CombatState::Acting(kind) => self.step_acting(kind, animator, held),
            CombatState::Leaving(kind) => self.step_leaving(kind, animator, frames),
            CombatState::Dying => self.step_dying(animator, vitality, frames),
            CombatState::Dead => None,
        }?;

        self.state = to;
        Some(Transition { from, to })
    }

    fn step_resting(
        &mut self,
        animator: &mut Animator,
        vitality: &Vitality,
        held: Actions,
    ) -> Option<CombatState> {
        if let Some(slot) = self.actions.iter().find(|slot| held.intersects(slot.trigger)) {
            let kind = slot.kind;
            animator.cross_fade(
                self.rest_clip.clone(),
                slot.clip.clone(),
                animator.primary_time(),
                0.0,
                0.0,
            );
            if slot.exit == ExitRule::OnToggle {
                self.conversation_active = true;
            }
            self.blend_weight = 0.0;
            return Some(CombatState::Entering(kind));
        }

        // Checked after every action trigger: a held action defers a pending death.
        let dying = self.dying.as_ref()?;
        if !vitality.death_pending() && !held.intersects(dying.trigger) {
            return None;
        }
        self.blend_weight = 0.0;
        animator.cross_fade(self.rest_clip.clone(), dying.clip.clone(), animator.primary_time(), 0.0, 0.0);
        Some(CombatState::Dying)
    }

    fn step_entering(&mut self, kind: ActionKind, animator: &mut Animator, frames: f32) -> Option<CombatState> {
        let clip = self.action_clip(kind)?;
        let weight = self.raise_weight(self.blend_rate, frames);
        animator.cross_fade(
            self.rest_clip.clone(),
            clip.clone(),
            animator.primary_time(),
            animator.secondary_time(),
            weight,
        );

        if weight > BLEND_SNAP_THRESHOLD {
            self.blend_weight = 0.0;
            animator.play_single(clip, animator.secondary_time());
            return Some(CombatState::Acting(kind));
        }
        None
    }

    fn step_acting(&mut self, kind: ActionKind, animator: &mut Animator, held: Actions) -> Option<CombatState> {
        let (clip, trigger, exit) = {
            let slot = self.slot(kind)?;
            (slot.clip.clone(), slot.trigger, slot.exit)
        };
        let leave = match exit {
            ExitRule::OnRelease => !held.intersects(trigger),
            ExitRule::AfterClipTime(threshold) => animator.primary_time() > threshold,
            ExitRule::OnToggle => held.intersects(trigger) || !self.conversation_active,
        };
        if !leave {
            return None;
        }

        if exit == ExitRule::OnToggle {
            self.conversation_active = false;
        }
        self.blend_weight = 0.0;
        animator.cross_fade(clip, self.rest_clip.clone(), animator.primary_time(), 0.0, 0.0);
        Some(CombatState::Leaving(kind))
    }

    fn step_leaving(&mut self, kind: ActionKind, animator: &mut Animator, frames: f32) -> Option<CombatState> {
        let clip = self.action_clip(kind)?;
        let weight = self.raise_weight(self.blend_rate, frames);
        animator.cross_fade(
            clip,
            self.rest_clip.clone(),
            animator.primary_time(),
            animator.secondary_time(),
            weight,
        );

        if weight > BLEND_SNAP_THRESHOLD {
            self.blend_weight = 0.0;
            animator.play_single(self.rest_clip.clone(), animator.secondary_time());
            return Some(CombatState::Resting);
        }
        None
    }

    fn step_dying(&mut self, animator: &mut Animator, vitality: &mut Vitality, frames: f32) -> Option<CombatState> {
        let (clip, rate) = match &self.dying {
            Some(dying) => (dying.clip.clone(), dying.blend_rate),
            None => return None,
        };
        let weight = self.raise_weight(rate, frames);
        animator.cross_fade(
            self.rest_clip.clone(),
            clip.clone(),
            animator.primary_time(),
            animator.secondary_time(),
            weight,
        );

        if weight > BLEND_SNAP_THRESHOLD {
            self.blend_weight = 0.0;
            animator.play_single(clip, animator.secondary_time());
            vitality.mark_dead();
            return Some(CombatState::Dead);
        }
        None
    }

    fn action_clip(&self, kind: ActionKind) -> Option<Clip> {
        self.slot(kind).map(|slot| slot.clip.clone())
    }

    // Clamped rather than wrapped, so a long frame cannot roll the weight back
    // towards zero and skip the snap.
    fn raise_weight(&mut self, rate: f32, frames: f32) -> f32 {
        self.blend_weight = (self.blend_weight + rate * frames.max(0.0)).clamp(0.0, 1.0);
        self.blend_weight
    }
}
