//! Melee hit detection gated on clip time.

use glam::{Mat4, Vec3};
use skirmish_core::{Aabb, OrientedBox};

use crate::state_machine::{ActionKind, CombatState};
use crate::vitality::{DamageOutcome, Vitality};

/// Clip-local seconds, exclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub open: f32,
    pub close: f32,
}

impl HitWindow {
    pub const fn new(open: f32, close: f32) -> Self {
        Self { open, close }
    }

    pub fn contains(&self, clip_time: f32) -> bool {
        clip_time > self.open && clip_time < self.close
    }
}

pub const STRIKE_WINDOW: HitWindow = HitWindow::new(0.3, 0.6);
/// Clip time past which a spent strike may land again.
pub const STRIKE_REARM_TIME: f32 = 0.7;

/// Full size of the weapon box in model space, before the model scale.
pub const HITBOX_SIZE: Vec3 = Vec3::new(1.0, 1.5, 1.0);
pub const HITBOX_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 1.0);

pub fn default_hitbox() -> OrientedBox {
    OrientedBox::from_size(HITBOX_SIZE, HITBOX_OFFSET)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeProfile {
    pub kind: ActionKind,
    pub window: HitWindow,
    pub rearm_after: f32,
    pub damage: f32,
}

impl StrikeProfile {
    pub fn new(kind: ActionKind, damage: f32) -> Self {
        Self {
            kind,
            window: STRIKE_WINDOW,
            rearm_after: STRIKE_REARM_TIME,
            damage,
        }
    }

    /// A strike only counts once the actor is past its blend-in and still
    /// holds the strike clip as primary.
    pub fn is_committed(&self, state: CombatState) -> bool {
        matches!(state, CombatState::Acting(kind) | CombatState::Leaving(kind) if kind == self.kind)
    }
}

/// Stateless test: committed phase, open window, and any weapon corner inside
/// the defender's standing volume.
pub fn check_melee_hit(
    attacker_model: &Mat4,
    state: CombatState,
    clip_time: f32,
    strike: &StrikeProfile,
    hitbox: &OrientedBox,
    defender_position: Vec3,
    defender_half_scale: f32,
) -> bool {
    if !strike.is_committed(state) || !strike.window.contains(clip_time) {
        return false;
    }
    let target = Aabb::standing(defender_position, defender_half_scale);
    hitbox.any_corner_inside(attacker_model, &target)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeHit {
    pub kind: ActionKind,
    pub damage: f32,
    pub outcome: DamageOutcome,
}

/// Applies an attacker's strikes to one defender, at most once per swing.
#[derive(Debug, Clone)]
pub struct HitResolver {
    hitbox: OrientedBox,
    strikes: Vec<StrikeProfile>,
    latched: Vec<bool>,
}

impl HitResolver {
    pub fn new(hitbox: OrientedBox) -> Self {
        Self {
            hitbox,
            strikes: Vec::new(),
            latched: Vec::new(),
        }
    }

    pub fn with_strike(mut self, strike: StrikeProfile) -> Self {
        self.strikes.push(strike);
        self.latched.push(false);
        self
    }

    pub fn hitbox(&self) -> &OrientedBox {
        &self.hitbox
    }

    pub fn strikes(&self) -> &[StrikeProfile] {
        &self.strikes
    }

    pub fn is_latched(&self, kind: ActionKind) -> bool {
        self.strikes
            .iter()
            .zip(&self.latched)
            .any(|(strike, &latched)| strike.kind == kind && latched)
    }

    /// Checks every strike against the defender and applies the first hit.
    pub fn resolve(
        &mut self,
        attacker_model: &Mat4,
        state: CombatState,
        clip_time: f32,
        defender_position: Vec3,
        defender_half_scale: f32,
        defender: &mut Vitality,
    ) -> Option<StrikeHit> {
        for (strike, latched) in self.strikes.iter().zip(self.latched.iter_mut()) {
            if !strike.is_committed(state) {
                continue;
            }
            if clip_time > strike.rearm_after {
                *latched = false;
                continue;
            }
            if *latched || !defender.is_alive() || defender.death_pending() {
                continue;
            }
            if !check_melee_hit(
                attacker_model,
                state,
                clip_time,
                strike,
                &self.hitbox,
                defender_position,
                defender_half_scale,
            ) {
                continue;
            }

            *latched = true;
            let outcome = defender.apply_damage(strike.damage);
            return Some(StrikeHit {
                kind: strike.kind,
                damage: strike.damage,
                outcome,
            });
        }
        None
    }

    /// Model matrix of the weapon box while a strike window is open, for debug
    /// drawing with [`OrientedBox::WIREFRAME_INDICES`].
    pub fn active_hitbox_model(&self, attacker_model: &Mat4, state: CombatState, clip_time: f32) -> Option<Mat4> {
        self.strikes
            .iter()
            .any(|strike| strike.is_committed(state) && strike.window.contains(clip_time))
            .then(|| self.hitbox.model_matrix(attacker_model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::Transform;

    // Player facing -Z at the demo's start position.
    fn attacker_model() -> Mat4 {
        Transform::from_yaw(Vec3::new(0.4, 1.1, -0.4), 180.0, 0.5).to_matrix()
    }

    const IN_REACH: Vec3 = Vec3::new(0.4, 1.1, -1.4);
    const ACTING: CombatState = CombatState::Acting(ActionKind::Attack);

    #[test]
    fn window_is_exclusive() {
        assert!(!STRIKE_WINDOW.contains(0.3));
        assert!(STRIKE_WINDOW.contains(0.31));
        assert!(STRIKE_WINDOW.contains(0.59));
        assert!(!STRIKE_WINDOW.contains(0.6));
    }

    #[test]
    fn hit_needs_committed_phase_window_and_reach() {
        let strike = StrikeProfile::new(ActionKind::Attack, 40.0);
        let hitbox = default_hitbox();
        let model = attacker_model();

        assert!(check_melee_hit(&model, ACTING, 0.45, &strike, &hitbox, IN_REACH, 0.5));
        assert!(check_melee_hit(
            &model,
            CombatState::Leaving(ActionKind::Attack),
            0.45,
            &strike,
            &hitbox,
            IN_REACH,
            0.5
        ));
        assert!(!check_melee_hit(
            &model,
            CombatState::Entering(ActionKind::Attack),
            0.45,
            &strike,
            &hitbox,
            IN_REACH,
            0.5
        ));
        assert!(!check_melee_hit(
            &model,
            CombatState::Acting(ActionKind::Kick),
            0.45,
            &strike,
            &hitbox,
            IN_REACH,
            0.5
        ));
        assert!(!check_melee_hit(&model, ACTING, 0.65, &strike, &hitbox, IN_REACH, 0.5));
        // Behind the attacker.
        assert!(!check_melee_hit(&model, ACTING, 0.45, &strike, &hitbox, Vec3::new(0.4, 1.1, 0.8), 0.5));
    }

    #[test]
    fn resolver_latches_until_rearm() {
        let mut resolver = HitResolver::new(default_hitbox()).with_strike(StrikeProfile::new(ActionKind::Attack, 40.0));
        let mut defender = Vitality::new(100.0).unwrap();
        let model = attacker_model();

        let mut hits = 0;
        for step in 0..20 {
            let t = 0.31 + step as f32 * 0.01;
            if resolver.resolve(&model, ACTING, t, IN_REACH, 0.5, &mut defender).is_some() {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
        assert_eq!(defender.health(), 60.0);
        assert!(resolver.is_latched(ActionKind::Attack));

        assert!(resolver
            .resolve(&model, CombatState::Leaving(ActionKind::Attack), 0.75, IN_REACH, 0.5, &mut defender)
            .is_none());
        assert!(!resolver.is_latched(ActionKind::Attack));

        let hit = resolver
            .resolve(&model, ACTING, 0.4, IN_REACH, 0.5, &mut defender)
            .expect("re-armed strike lands");
        assert_eq!(hit.outcome, DamageOutcome::Wounded { remaining: 20.0 });
    }

    #[test]
    fn latch_survives_outside_committed_phase() {
        let mut resolver = HitResolver::new(default_hitbox()).with_strike(StrikeProfile::new(ActionKind::Attack, 40.0));
        let mut defender = Vitality::new(100.0).unwrap();
        let model = attacker_model();

        resolver.resolve(&model, ACTING, 0.4, IN_REACH, 0.5, &mut defender);
        resolver.resolve(&model, CombatState::Resting, 0.9, IN_REACH, 0.5, &mut defender);
        assert!(resolver.is_latched(ActionKind::Attack));
    }

    #[test]
    fn dying_defender_takes_no_damage() {
        let mut resolver = HitResolver::new(default_hitbox()).with_strike(StrikeProfile::new(ActionKind::Attack, 150.0));
        let mut defender = Vitality::new(100.0).unwrap();
        let model = attacker_model();

        let hit = resolver.resolve(&model, ACTING, 0.4, IN_REACH, 0.5, &mut defender);
        assert_eq!(hit.map(|h| h.outcome), Some(DamageOutcome::Defeated));

        resolver.resolve(&model, ACTING, 0.8, IN_REACH, 0.5, &mut defender);
        assert!(resolver.resolve(&model, ACTING, 0.4, IN_REACH, 0.5, &mut defender).is_none());
    }

    #[test]
    fn debug_box_only_while_window_open() {
        let resolver = HitResolver::new(default_hitbox()).with_strike(StrikeProfile::new(ActionKind::Kick, 20.0));
        let model = attacker_model();
        let kicking = CombatState::Acting(ActionKind::Kick);

        let shown = resolver.active_hitbox_model(&model, kicking, 0.5).expect("window open");
        assert!(shown
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(model.transform_point3(HITBOX_OFFSET), 1e-5));
        assert!(resolver.active_hitbox_model(&model, kicking, 0.2).is_none());
        assert!(resolver.active_hitbox_model(&model, ACTING, 0.5).is_none());
    }
}
