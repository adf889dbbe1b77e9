//! Tuning for the three arena actors.
//!
//! Defaults reproduce the demo's feel; every value can be overridden through
//! the `with_*` builders and is checked by `validate` before an arena is built.

use glam::{Mat4, Vec3};
use skirmish_core::{OrientedBox, Result, SkirmishError};

use crate::actor::ActorRole;
use crate::assets;
use crate::hitbox::{default_hitbox, StrikeProfile};
use crate::input::Actions;
use crate::locomotion::Locomotion;
use crate::state_machine::{ActionKind, ExitRule, ATTACK_EXIT_TIME, KICK_EXIT_TIME, TURN_EXIT_TIME};

/// How per-update blend rates relate to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BlendClock {
    /// Each update advances a blend by exactly one rate step, whatever `dt` is.
    #[default]
    PerUpdate,
    /// Rates are per update at `hz` updates per second and scale with `dt`.
    ReferenceRate { hz: f32 },
}

impl BlendClock {
    /// Rate steps to apply for an update of `dt` seconds.
    pub fn frames(&self, dt: f32) -> f32 {
        match *self {
            BlendClock::PerUpdate => 1.0,
            BlendClock::ReferenceRate { hz } => (dt * hz).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionConfig {
    pub kind: ActionKind,
    pub clip: String,
    pub trigger: Actions,
    pub exit: ExitRule,
}

impl ActionConfig {
    pub fn new(kind: ActionKind, clip: &str, trigger: Actions, exit: ExitRule) -> Self {
        Self {
            kind,
            clip: clip.to_string(),
            trigger,
            exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DyingConfig {
    pub clip: String,
    pub blend_rate: f32,
    pub trigger: Actions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseOverrideConfig {
    pub trigger: Actions,
    pub clip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorConfig {
    pub role: ActorRole,
    pub name: String,
    pub skeleton: String,
    pub rest_clip: String,
    pub position: Vec3,
    pub yaw: f32,
    /// Added to `yaw` when building the model matrix, so the mesh faces along
    /// the actor's forward vector.
    pub yaw_offset: f32,
    pub model_scale: f32,
    /// Half size of the standing volume other actors' strikes are tested against.
    pub hurt_scale: f32,
    pub max_health: f32,
    pub blend_rate: f32,
    /// Trigger priority follows this order.
    pub actions: Vec<ActionConfig>,
    pub dying: Option<DyingConfig>,
    pub strikes: Vec<StrikeProfile>,
    pub hitbox: OrientedBox,
    pub locomotion: Option<Locomotion>,
    pub pose_overrides: Vec<PoseOverrideConfig>,
}

impl ActorConfig {
    fn base(role: ActorRole, skeleton: &str, rest_clip: &str, position: Vec3, yaw_offset: f32, blend_rate: f32) -> Self {
        Self {
            role,
            name: role.to_string(),
            skeleton: skeleton.to_string(),
            rest_clip: rest_clip.to_string(),
            position,
            yaw: 0.0,
            yaw_offset,
            model_scale: 0.5,
            hurt_scale: 0.5,
            max_health: 100.0,
            blend_rate,
            actions: Vec::new(),
            dying: None,
            strikes: Vec::new(),
            hitbox: default_hitbox(),
            locomotion: None,
            pose_overrides: Vec::new(),
        }
    }

    pub fn player() -> Self {
        let mut config = Self::base(
            ActorRole::Player,
            assets::KNIGHT,
            assets::KNIGHT_IDLE,
            Vec3::new(0.4, 1.1, -0.4),
            180.0,
            0.055,
        );
        config.actions = vec![
            ActionConfig::new(ActionKind::Walk, assets::KNIGHT_WALK, Actions::PLAYER_WALK, ExitRule::OnRelease),
            ActionConfig::new(ActionKind::WalkBack, assets::KNIGHT_WALK_BACK, Actions::MOVE_BACK, ExitRule::OnRelease),
            ActionConfig::new(
                ActionKind::Attack,
                assets::KNIGHT_SLASH,
                Actions::ATTACK,
                ExitRule::AfterClipTime(ATTACK_EXIT_TIME),
            ),
            ActionConfig::new(
                ActionKind::Kick,
                assets::KNIGHT_KICK,
                Actions::KICK,
                ExitRule::AfterClipTime(KICK_EXIT_TIME),
            ),
            ActionConfig::new(
                ActionKind::Turn,
                assets::KNIGHT_TURN,
                Actions::TURN_CLIP,
                ExitRule::AfterClipTime(TURN_EXIT_TIME),
            ),
        ];
        config.dying = Some(DyingConfig {
            clip: assets::KNIGHT_DEATH.to_string(),
            blend_rate: 0.003,
            trigger: Actions::FORCE_DEATH_PLAYER,
        });
        config.strikes = vec![
            StrikeProfile::new(ActionKind::Attack, 40.0),
            StrikeProfile::new(ActionKind::Kick, 20.0),
        ];
        config.locomotion = Some(Locomotion::default());
        config.pose_overrides = [
            (Actions::POSE_IDLE, assets::KNIGHT_IDLE),
            (Actions::POSE_WALK, assets::KNIGHT_WALK),
            (Actions::POSE_ATTACK, assets::KNIGHT_SLASH),
            (Actions::POSE_KICK, assets::KNIGHT_KICK),
            (Actions::POSE_TURN, assets::KNIGHT_TURN),
        ]
        .into_iter()
        .map(|(trigger, clip)| PoseOverrideConfig {
            trigger,
            clip: clip.to_string(),
        })
        .collect();
        config
    }

    pub fn enemy() -> Self {
        let mut config = Self::base(
            ActorRole::Enemy,
            assets::MONSTER,
            assets::MONSTER_IDLE,
            Vec3::new(0.0, 1.1, -14.0),
            0.0,
            0.005,
        );
        config.actions = vec![
            ActionConfig::new(ActionKind::Walk, assets::MONSTER_WALK, Actions::ENEMY_WALK, ExitRule::OnRelease),
            ActionConfig::new(
                ActionKind::Attack,
                assets::MONSTER_ATTACK,
                Actions::ENEMY_ATTACK,
                ExitRule::AfterClipTime(ATTACK_EXIT_TIME),
            ),
        ];
        config.dying = Some(DyingConfig {
            clip: assets::MONSTER_DYING.to_string(),
            blend_rate: 0.005,
            trigger: Actions::FORCE_DEATH_ENEMY,
        });
        config.strikes = vec![StrikeProfile::new(ActionKind::Attack, 150.0)];
        config
    }

    pub fn merchant() -> Self {
        let mut config = Self::base(
            ActorRole::Merchant,
            assets::MERCHANT,
            assets::MERCHANT_IDLE,
            Vec3::new(-1.9, 1.1, -3.1),
            90.0,
            0.03,
        );
        config.actions = vec![ActionConfig::new(
            ActionKind::Talk,
            assets::MERCHANT_TALKING,
            Actions::TALK_TOGGLE,
            ExitRule::OnToggle,
        )];
        config
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_blend_rate(mut self, blend_rate: f32) -> Self {
        self.blend_rate = blend_rate;
        self
    }

    pub fn with_action(mut self, action: ActionConfig) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_dying(mut self, dying: Option<DyingConfig>) -> Self {
        self.dying = dying;
        self
    }

    pub fn with_strike(mut self, strike: StrikeProfile) -> Self {
        self.strikes.retain(|s| s.kind != strike.kind);
        self.strikes.push(strike);
        self
    }

    pub fn with_locomotion(mut self, locomotion: Option<Locomotion>) -> Self {
        self.locomotion = locomotion;
        self
    }

    pub fn with_hurt_scale(mut self, hurt_scale: f32) -> Self {
        self.hurt_scale = hurt_scale;
        self
    }

    /// Checks everything that does not need the clip library.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SkirmishError::config(format!("{} has an empty name", self.role)));
        }
        positive(&self.name, "model scale", self.model_scale)?;
        positive(&self.name, "hurt scale", self.hurt_scale)?;
        positive(&self.name, "max health", self.max_health)?;
        blend_rate(&self.name, "blend rate", self.blend_rate)?;
        if !self.position.is_finite() || !self.yaw.is_finite() || !self.yaw_offset.is_finite() {
            return Err(SkirmishError::config(format!("{}: placement must be finite", self.name)));
        }
        if self.hitbox.half_extents.cmple(Vec3::ZERO).any() || !self.hitbox.half_extents.is_finite() {
            return Err(SkirmishError::config(format!("{}: hitbox extents must be positive", self.name)));
        }

        for (i, action) in self.actions.iter().enumerate() {
            if self.actions[..i].iter().any(|a| a.kind == action.kind) {
                return Err(SkirmishError::config(format!(
                    "{}: action '{}' listed twice",
                    self.name, action.kind
                )));
            }
            if let ExitRule::AfterClipTime(threshold) = action.exit {
                positive(&self.name, "exit time", threshold)?;
            }
            if action.trigger.is_empty() {
                log::warn!("{}: action '{}' has no trigger and can never start", self.name, action.kind);
            }
        }

        if let Some(dying) = &self.dying {
            blend_rate(&self.name, "dying blend rate", dying.blend_rate)?;
        }

        for strike in &self.strikes {
            if !self.actions.iter().any(|a| a.kind == strike.kind) {
                return Err(SkirmishError::config(format!(
                    "{}: strike '{}' has no matching action",
                    self.name, strike.kind
                )));
            }
            let window = strike.window;
            if !(0.0..).contains(&window.open) || window.close <= window.open || !window.close.is_finite() {
                return Err(SkirmishError::config(format!(
                    "{}: strike '{}' window ({}, {}) is empty",
                    self.name, strike.kind, window.open, window.close
                )));
            }
            if strike.rearm_after < window.close {
                return Err(SkirmishError::config(format!(
                    "{}: strike '{}' re-arms at {} inside its own window",
                    self.name, strike.kind, strike.rearm_after
                )));
            }
            if !strike.damage.is_finite() || strike.damage < 0.0 {
                return Err(SkirmishError::config(format!(
                    "{}: strike '{}' damage must be non-negative",
                    self.name, strike.kind
                )));
            }
        }
        if !self.strikes.is_empty() && self.dying.is_none() {
            log::warn!("{} can strike but has no dying profile", self.name);
        }

        if let Some(locomotion) = &self.locomotion {
            positive(&self.name, "move speed", locomotion.move_speed)?;
            positive(&self.name, "yaw speed", locomotion.yaw_speed)?;
            if !locomotion.quick_turn_speed.is_finite() {
                return Err(SkirmishError::config(format!("{}: quick turn speed must be finite", self.name)));
            }
        }

        Ok(())
    }
}

fn positive(owner: &str, what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SkirmishError::config(format!("{owner}: {what} must be positive, got {value}")))
    }
}

fn blend_rate(owner: &str, what: &str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SkirmishError::config(format!("{owner}: {what} must be in (0, 1], got {value}")))
    }
}

/// Model matrix of the merchant's close-up while a conversation is open.
pub fn default_talk_overlay() -> Mat4 {
    Mat4::from_translation(Vec3::new(-2.5, -1.75, -0.55))
        * Mat4::from_scale(Vec3::splat(4.5))
        * Mat4::from_rotation_y(25.0_f32.to_radians())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    pub player: ActorConfig,
    pub enemy: ActorConfig,
    pub merchant: ActorConfig,
    pub blend_clock: BlendClock,
    pub talk_overlay: Mat4,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player: ActorConfig::player(),
            enemy: ActorConfig::enemy(),
            merchant: ActorConfig::merchant(),
            blend_clock: BlendClock::default(),
            talk_overlay: default_talk_overlay(),
        }
    }
}

impl ArenaConfig {
    pub fn with_player(mut self, player: ActorConfig) -> Self {
        self.player = player;
        self
    }

    pub fn with_enemy(mut self, enemy: ActorConfig) -> Self {
        self.enemy = enemy;
        self
    }

    pub fn with_merchant(mut self, merchant: ActorConfig) -> Self {
        self.merchant = merchant;
        self
    }

    pub fn with_blend_clock(mut self, blend_clock: BlendClock) -> Self {
        self.blend_clock = blend_clock;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (expected, actor) in [
            (ActorRole::Player, &self.player),
            (ActorRole::Enemy, &self.enemy),
            (ActorRole::Merchant, &self.merchant),
        ] {
            if actor.role != expected {
                return Err(SkirmishError::config(format!(
                    "{} configured in the {expected} slot",
                    actor.role
                )));
            }
            actor.validate()?;
        }
        if let BlendClock::ReferenceRate { hz } = self.blend_clock {
            positive("arena", "blend clock rate", hz)?;
        }
        Ok(())
    }
}
