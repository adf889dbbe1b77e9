use std::fmt;

use glam::{Mat4, Vec3};
use skirmish_animation::{Animator, Clip, ClipLibrary};
use skirmish_core::{Aabb, Result, SkirmishError, Transform};

use crate::config::ActorConfig;
use crate::hitbox::{HitResolver, StrikeHit};
use crate::input::Actions;
use crate::locomotion::{Kinematics, Locomotion};
use crate::state_machine::{ActionSlot, CombatState, CombatStateMachine, DyingProfile, ExitRule, Transition};
use crate::vitality::Vitality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Player,
    Enemy,
    Merchant,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Player => f.write_str("player"),
            ActorRole::Enemy => f.write_str("enemy"),
            ActorRole::Merchant => f.write_str("merchant"),
        }
    }
}

/// While `trigger` is held the clip is forced onto the animator from time
/// zero, bypassing the state machine's choice of clip.
#[derive(Debug, Clone)]
pub struct PoseOverride {
    pub trigger: Actions,
    pub clip: Clip,
}

/// One animated, possibly fighting, character.
pub struct Actor {
    role: ActorRole,
    name: String,
    kinematics: Kinematics,
    model_scale: f32,
    yaw_offset: f32,
    hurt_scale: f32,
    vitality: Vitality,
    machine: CombatStateMachine,
    animator: Animator,
    resolver: HitResolver,
    locomotion: Option<Locomotion>,
    pose_overrides: Vec<PoseOverride>,
}

impl Actor {
    /// Resolves every clip the config names against `library` and wires up
    /// the state machine, animator and strikes.
    pub fn build(config: &ActorConfig, library: &ClipLibrary) -> Result<Self> {
        config.validate()?;

        let skeleton = library.skeleton(&config.skeleton)?;
        let clip = |name: &str| library.clip_for(&config.skeleton, name);
        let rest = clip(&config.rest_clip)?;

        let mut machine = CombatStateMachine::new(rest.clone(), config.blend_rate);
        for action in &config.actions {
            let action_clip = clip(&action.clip)?;
            if let ExitRule::AfterClipTime(threshold) = action.exit {
                if threshold >= action_clip.duration {
                    return Err(SkirmishError::clip(
                        &action_clip.name,
                        format!(
                            "{} exit time {threshold}s is not inside the {:.2}s clip",
                            action.kind, action_clip.duration
                        ),
                    ));
                }
            }
            machine = machine.with_action(ActionSlot {
                kind: action.kind,
                clip: action_clip,
                trigger: action.trigger,
                exit: action.exit,
            });
        }

        if let Some(dying) = &config.dying {
            machine = machine.with_dying(DyingProfile {
                clip: clip(&dying.clip)?,
                blend_rate: dying.blend_rate,
                trigger: dying.trigger,
            });
        }

        let mut resolver = HitResolver::new(config.hitbox);
        for strike in &config.strikes {
            let duration = machine
                .slot(strike.kind)
                .map(|slot| slot.clip.duration)
                .ok_or_else(|| SkirmishError::config(format!("{}: no action for strike '{}'", config.name, strike.kind)))?;
            if strike.rearm_after >= duration {
                return Err(SkirmishError::config(format!(
                    "{}: strike '{}' re-arms at {}s, past its {:.2}s clip",
                    config.name, strike.kind, strike.rearm_after, duration
                )));
            }
            resolver = resolver.with_strike(*strike);
        }

        let pose_overrides = config
            .pose_overrides
            .iter()
            .map(|o| {
                Ok(PoseOverride {
                    trigger: o.trigger,
                    clip: clip(&o.clip)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Built {} '{}' with {} actions and {} strikes",
            config.role,
            config.name,
            config.actions.len(),
            config.strikes.len()
        );

        Ok(Self {
            role: config.role,
            name: config.name.clone(),
            kinematics: Kinematics::new(config.position, config.yaw),
            model_scale: config.model_scale,
            yaw_offset: config.yaw_offset,
            hurt_scale: config.hurt_scale,
            vitality: Vitality::new(config.max_health)?,
            machine,
            animator: Animator::new(skeleton, rest),
            resolver,
            locomotion: config.locomotion,
            pose_overrides,
        })
    }

    /// Moves, picks the next state and advances the animation by `dt`.
    /// `frames` is the number of blend-rate steps this update is worth.
    pub fn update(&mut self, held: Actions, dt: f32, frames: f32) -> Option<Transition> {
        if self.vitality.is_alive() {
            if let Some(locomotion) = &self.locomotion {
                locomotion.integrate(&mut self.kinematics, held, dt);
            }
        }

        // Later overrides win.
        if let Some(o) = self.pose_overrides.iter().rev().find(|o| held.intersects(o.trigger)) {
            self.animator.play_single(o.clip.clone(), 0.0);
        }

        let transition = self.machine.step(&mut self.animator, &mut self.vitality, held, frames);
        if let Some(t) = transition {
            log::debug!("{} '{}': {} -> {}", self.role, self.name, t.from, t.to);
        }

        self.animator.advance(dt);
        transition
    }

    /// Tests this actor's strikes against `defender` using the current pose.
    pub fn strike(&mut self, defender: &mut Actor) -> Option<StrikeHit> {
        let model = self.model_matrix();
        self.resolver.resolve(
            &model,
            self.machine.state(),
            self.animator.primary_time(),
            defender.kinematics.position,
            defender.hurt_scale,
            &mut defender.vitality,
        )
    }

    /// Weapon box model while a strike window is open.
    pub fn active_hitbox(&self) -> Option<Mat4> {
        self.resolver
            .active_hitbox_model(&self.model_matrix(), self.machine.state(), self.animator.primary_time())
    }

    /// translate · scale · rotate-about-Y by `yaw_offset + yaw`.
    pub fn model_matrix(&self) -> Mat4 {
        Transform::from_yaw(
            self.kinematics.position,
            self.yaw_offset + self.kinematics.yaw,
            self.model_scale,
        )
        .to_matrix()
    }

    pub fn hurt_volume(&self) -> Aabb {
        Aabb::standing(self.kinematics.position, self.hurt_scale)
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CombatState {
        self.machine.state()
    }

    pub fn machine(&self) -> &CombatStateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut CombatStateMachine {
        &mut self.machine
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn vitality(&self) -> &Vitality {
        &self.vitality
    }

    pub fn vitality_mut(&mut self) -> &mut Vitality {
        &mut self.vitality
    }

    pub fn resolver(&self) -> &HitResolver {
        &self.resolver
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn position(&self) -> Vec3 {
        self.kinematics.position
    }

    /// Teleports the actor; facing is kept.
    pub fn set_position(&mut self, position: Vec3) {
        self.kinematics.position = position;
    }

    pub fn is_alive(&self) -> bool {
        self.vitality.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{self, stand_in_library};

    #[test]
    fn player_model_faces_forward() {
        let library = stand_in_library().unwrap();
        let player = Actor::build(&ActorConfig::player(), &library).unwrap();

        // The mesh's +Z side is turned onto the forward vector by the 180 degree offset.
        let ahead = player.model_matrix().transform_point3(Vec3::new(0.0, 0.0, 1.0));
        let expected = player.position() + player.kinematics().forward * 0.5;
        assert!(ahead.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn build_rejects_foreign_or_missing_clips() {
        let library = stand_in_library().unwrap();
        let mut config = ActorConfig::enemy();
        config.rest_clip = assets::KNIGHT_IDLE.to_string();
        assert!(Actor::build(&config, &library).is_err());

        let mut config = ActorConfig::merchant();
        config.actions[0].clip = "merchant/haggle".to_string();
        assert!(matches!(
            Actor::build(&config, &library),
            Err(SkirmishError::MissingClip(name)) if name == "merchant/haggle"
        ));
    }

    #[test]
    fn exit_time_must_fit_clip() {
        let library = stand_in_library().unwrap();
        let mut config = ActorConfig::player();
        config.actions[2].exit = ExitRule::AfterClipTime(2.0);
        assert!(matches!(
            Actor::build(&config, &library),
            Err(SkirmishError::InvalidClip { .. })
        ));
    }

    #[test]
    fn pose_override_does_not_change_state() {
        let library = stand_in_library().unwrap();
        let mut player = Actor::build(&ActorConfig::player(), &library).unwrap();
        player.update(Actions::POSE_KICK, 1.0 / 60.0, 1.0);
        assert_eq!(player.state(), CombatState::Resting);
        assert_eq!(player.animator().primary_clip().name, assets::KNIGHT_KICK);
        assert!((player.animator().primary_time() - 1.0 / 60.0).abs() < 1e-6);

        player.update(Actions::POSE_IDLE | Actions::POSE_TURN, 1.0 / 60.0, 1.0);
        assert_eq!(player.animator().primary_clip().name, assets::KNIGHT_TURN);
    }

    #[test]
    fn dead_actor_stays_put() {
        let library = stand_in_library().unwrap();
        let mut player = Actor::build(&ActorConfig::player(), &library).unwrap();
        let start = player.position();
        player.vitality_mut().mark_dead();
        player.update(Actions::MOVE_FORWARD, 0.5, 1.0);
        assert_eq!(player.position(), start);
    }

    #[test]
    fn forced_death_runs_the_dying_blend() {
        let library = stand_in_library().unwrap();
        let mut player = Actor::build(&ActorConfig::player(), &library).unwrap();
        player.update(Actions::FORCE_DEATH_PLAYER, 1.0 / 60.0, 1.0);
        assert_eq!(player.state(), CombatState::Dying);
        assert_eq!(player.vitality().health(), 100.0);

        while player.state() == CombatState::Dying {
            player.update(Actions::empty(), 1.0 / 60.0, 1.0);
        }
        assert_eq!(player.state(), CombatState::Dead);
        assert!(!player.is_alive());
        assert_eq!(player.animator().primary_clip().name, assets::KNIGHT_DEATH);
    }
}
