use skirmish_core::{Result, SkirmishError};

/// Result of a single [`Vitality::apply_damage`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The actor is dead or already waiting to die; nothing changed.
    Ignored,
    Wounded { remaining: f32 },
    /// Health reached zero with this hit; the death latch is now set.
    Defeated,
}

/// Health, alive flag and death latch of one actor.
///
/// Health only goes down. Reaching zero sets the latch; the alive flag is
/// flipped separately by the state machine once the dying blend completes.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitality {
    health: f32,
    max_health: f32,
    alive: bool,
    death_pending: bool,
}

impl Vitality {
    pub fn new(max_health: f32) -> Result<Self> {
        if !max_health.is_finite() || max_health <= 0.0 {
            return Err(SkirmishError::config(format!(
                "max health must be positive, got {max_health}"
            )));
        }
        Ok(Self {
            health: max_health,
            max_health,
            alive: true,
            death_pending: false,
        })
    }

    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive || self.death_pending {
            return DamageOutcome::Ignored;
        }

        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.health = (self.health - amount).max(0.0);

        if self.health <= 0.0 {
            self.health = 0.0;
            self.death_pending = true;
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Wounded {
                remaining: self.health,
            }
        }
    }

    pub fn mark_dead(&mut self) {
        self.alive = false;
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Death latch: set when health hits zero, consumed by the state machine.
    pub fn death_pending(&self) -> bool {
        self.death_pending
    }
}
