//! The three-actor world and its fixed per-frame update order.

use glam::Mat4;
use skirmish_animation::ClipLibrary;
use skirmish_core::Result;

use crate::actor::{Actor, ActorRole};
use crate::config::{ArenaConfig, BlendClock};
use crate::hitbox::StrikeHit;
use crate::input::FrameInput;
use crate::state_machine::{CombatState, Transition};
use crate::vitality::DamageOutcome;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    StateChanged { role: ActorRole, transition: Transition },
    Hit { attacker: ActorRole, defender: ActorRole, hit: StrikeHit },
    /// The defender's health reached zero; its dying blend starts from rest.
    Defeated { role: ActorRole },
    /// The dying blend finished.
    Died { role: ActorRole },
}

/// What happened during one [`Arena::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub events: Vec<CombatEvent>,
    /// Weapon boxes with an open strike window, for debug drawing.
    pub hitboxes: Vec<(ActorRole, Mat4)>,
}

impl FrameReport {
    pub fn hits(&self) -> impl Iterator<Item = (ActorRole, ActorRole, StrikeHit)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            CombatEvent::Hit { attacker, defender, hit } => Some((attacker, defender, hit)),
            _ => None,
        })
    }

    pub fn transition_of(&self, role: ActorRole) -> Option<Transition> {
        self.events.iter().find_map(|event| match *event {
            CombatEvent::StateChanged { role: r, transition } if r == role => Some(transition),
            _ => None,
        })
    }
}

/// Everything the renderer needs to draw one actor.
#[derive(Debug, Clone, Copy)]
pub struct RenderPacket<'a> {
    pub role: ActorRole,
    pub model: Mat4,
    pub bones: &'a [Mat4],
    /// The merchant's conversation close-up rather than its world placement.
    pub overlay: bool,
}

pub struct Arena {
    player: Actor,
    enemy: Actor,
    merchant: Actor,
    blend_clock: BlendClock,
    talk_overlay: Mat4,
    frame: u64,
}

impl Arena {
    pub fn new(config: &ArenaConfig, library: &ClipLibrary) -> Result<Self> {
        config.validate()?;
        let arena = Self {
            player: Actor::build(&config.player, library)?,
            enemy: Actor::build(&config.enemy, library)?,
            merchant: Actor::build(&config.merchant, library)?,
            blend_clock: config.blend_clock,
            talk_overlay: config.talk_overlay,
            frame: 0,
        };
        log::info!("Arena ready ({:?})", arena.blend_clock);
        Ok(arena)
    }

    /// Advances the world by `dt` seconds.
    ///
    /// Order: player, player strikes on the enemy, enemy, enemy strikes on the
    /// player, merchant. The player's strikes meet the enemy as it stood after
    /// the previous frame; the enemy's strikes meet the player as updated now.
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        self.frame += 1;
        let frames = self.blend_clock.frames(dt);
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        record_update(&mut report, &mut self.player, input, dt, frames);
        record_strike(&mut report, &mut self.player, &mut self.enemy);

        record_update(&mut report, &mut self.enemy, input, dt, frames);
        record_strike(&mut report, &mut self.enemy, &mut self.player);

        record_update(&mut report, &mut self.merchant, input, dt, frames);

        for actor in [&self.player, &self.enemy] {
            if let Some(model) = actor.active_hitbox() {
                report.hitboxes.push((actor.role(), model));
            }
        }

        report
    }

    /// Living actors plus the merchant, and the conversation close-up when
    /// one is open.
    pub fn render_packets(&self) -> Vec<RenderPacket<'_>> {
        let mut packets: Vec<RenderPacket<'_>> = [&self.player, &self.enemy, &self.merchant]
            .into_iter()
            .filter(|actor| actor.is_alive())
            .map(|actor| RenderPacket {
                role: actor.role(),
                model: actor.model_matrix(),
                bones: actor.animator().final_bone_matrices(),
                overlay: false,
            })
            .collect();

        if self.merchant.machine().conversation_active() {
            packets.push(RenderPacket {
                role: ActorRole::Merchant,
                model: self.talk_overlay,
                bones: self.merchant.animator().final_bone_matrices(),
                overlay: true,
            });
        }
        packets
    }

    pub fn actor(&self, role: ActorRole) -> &Actor {
        match role {
            ActorRole::Player => &self.player,
            ActorRole::Enemy => &self.enemy,
            ActorRole::Merchant => &self.merchant,
        }
    }

    pub fn actor_mut(&mut self, role: ActorRole) -> &mut Actor {
        match role {
            ActorRole::Player => &mut self.player,
            ActorRole::Enemy => &mut self.enemy,
            ActorRole::Merchant => &mut self.merchant,
        }
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn enemy(&self) -> &Actor {
        &self.enemy
    }

    pub fn merchant(&self) -> &Actor {
        &self.merchant
    }

    /// Opening or closing the conversation from outside, e.g. a dialogue UI.
    pub fn set_conversation_active(&mut self, active: bool) {
        self.merchant.machine_mut().set_conversation_active(active);
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

fn record_update(report: &mut FrameReport, actor: &mut Actor, input: &FrameInput, dt: f32, frames: f32) {
    let Some(transition) = actor.update(input.held, dt, frames) else {
        return;
    };
    let role = actor.role();
    report.events.push(CombatEvent::StateChanged { role, transition });
    if transition.to == CombatState::Dead {
        log::info!("{} '{}' died", role, actor.name());
        report.events.push(CombatEvent::Died { role });
    }
}

fn record_strike(report: &mut FrameReport, attacker: &mut Actor, defender: &mut Actor) {
    let Some(hit) = attacker.strike(defender) else {
        return;
    };
    log::info!(
        "{} {} hits {} for {} ({:?})",
        attacker.role(),
        hit.kind,
        defender.role(),
        hit.damage,
        hit.outcome
    );
    report.events.push(CombatEvent::Hit {
        attacker: attacker.role(),
        defender: defender.role(),
        hit,
    });
    if hit.outcome == DamageOutcome::Defeated {
        log::info!("{} '{}' defeated", defender.role(), defender.name());
        report.events.push(CombatEvent::Defeated { role: defender.role() });
    }
}
