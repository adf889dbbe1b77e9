//! End-to-end runs of the default arena on the stand-in rigs.

use glam::Vec3;
use skirmish_combat::assets::stand_in_library;
use skirmish_combat::{
    ActionKind, ActorRole, Actions, Arena, ArenaConfig, CombatEvent, CombatState, DamageOutcome, FrameInput,
    FrameReport,
};

const DT: f32 = 1.0 / 60.0;

fn arena() -> Arena {
    Arena::new(&ArenaConfig::default(), &stand_in_library().unwrap()).unwrap()
}

/// One step in front of the player, who faces -Z from the start position.
fn enemy_in_reach(arena: &mut Arena) {
    let player = arena.player().position();
    arena
        .actor_mut(ActorRole::Enemy)
        .set_position(player - Vec3::new(0.0, 0.0, 1.0));
}

fn step(arena: &mut Arena, held: Actions) -> FrameReport {
    arena.step(&FrameInput::new(held), DT)
}

fn hits_on(report: &FrameReport, defender: ActorRole) -> Vec<f32> {
    report
        .hits()
        .filter(|(_, d, _)| *d == defender)
        .map(|(_, _, hit)| hit.damage)
        .collect()
}

#[test]
fn attack_blends_in_then_lands_once() {
    let mut arena = arena();
    enemy_in_reach(&mut arena);

    let report = step(&mut arena, Actions::ATTACK);
    assert_eq!(arena.player().state(), CombatState::Entering(ActionKind::Attack));
    assert!(hits_on(&report, ActorRole::Enemy).is_empty());

    let mut damage = Vec::new();
    let mut entering = 0;
    while arena.player().state() == CombatState::Entering(ActionKind::Attack) {
        damage.extend(hits_on(&step(&mut arena, Actions::empty()), ActorRole::Enemy));
        entering += 1;
    }
    assert_eq!(entering, 17);
    assert_eq!(arena.player().state(), CombatState::Acting(ActionKind::Attack));

    let mut saw_hitbox = false;
    while arena.player().state() != CombatState::Resting {
        let report = step(&mut arena, Actions::empty());
        damage.extend(hits_on(&report, ActorRole::Enemy));
        saw_hitbox |= report.hitboxes.iter().any(|(role, _)| *role == ActorRole::Player);
    }
    assert_eq!(damage, vec![40.0]);
    assert!(saw_hitbox);
    assert_eq!(arena.enemy().vitality().health(), 60.0);
}

#[test]
fn three_slashes_defeat_the_enemy() {
    let mut arena = arena();
    enemy_in_reach(&mut arena);

    let mut outcomes = Vec::new();
    let mut defeated_at = None;
    for frame in 0..2000 {
        let held = if arena.player().state() == CombatState::Resting {
            Actions::ATTACK
        } else {
            Actions::empty()
        };
        let report = step(&mut arena, held);
        outcomes.extend(report.hits().map(|(_, _, hit)| hit.outcome));
        if report.events.contains(&CombatEvent::Defeated { role: ActorRole::Enemy }) {
            defeated_at = Some(frame);
            break;
        }
    }

    assert!(defeated_at.is_some());
    assert_eq!(
        outcomes,
        vec![
            DamageOutcome::Wounded { remaining: 60.0 },
            DamageOutcome::Wounded { remaining: 20.0 },
            DamageOutcome::Defeated,
        ]
    );
    let enemy = arena.enemy();
    assert_eq!(enemy.vitality().health(), 0.0);
    assert!(enemy.vitality().death_pending());
    assert!(enemy.is_alive());
    // The enemy was resting, so it starts dying in the same frame.
    assert_eq!(enemy.state(), CombatState::Dying);

    let mut dying = 0;
    let mut died = false;
    while arena.enemy().state() == CombatState::Dying {
        assert!(arena.enemy().is_alive());
        assert_eq!(arena.render_packets().len(), 3);
        let report = step(&mut arena, Actions::empty());
        died |= report.events.contains(&CombatEvent::Died { role: ActorRole::Enemy });
        dying += 1;
    }
    assert!(died);
    assert!((180..=182).contains(&dying), "{dying}");
    assert!(!arena.enemy().is_alive());

    let packets = arena.render_packets();
    assert_eq!(packets.len(), 2);
    assert!(packets.iter().all(|p| p.role != ActorRole::Enemy));

    // Further slashes find nothing to hit.
    for _ in 0..200 {
        let report = step(&mut arena, Actions::ATTACK);
        assert!(hits_on(&report, ActorRole::Enemy).is_empty());
    }
}

#[test]
fn kick_deals_its_own_damage() {
    let mut arena = arena();
    enemy_in_reach(&mut arena);

    step(&mut arena, Actions::KICK);
    let mut damage = Vec::new();
    while arena.player().state() != CombatState::Resting {
        damage.extend(hits_on(&step(&mut arena, Actions::empty()), ActorRole::Enemy));
    }
    assert_eq!(damage, vec![20.0]);
    assert_eq!(arena.enemy().vitality().health(), 80.0);
}

#[test]
fn player_hit_mid_action_dies_only_after_returning_to_rest() {
    let mut arena = arena();
    enemy_in_reach(&mut arena);

    step(&mut arena, Actions::ENEMY_ATTACK);
    let mut player_hits = 0;
    let mut dying_from = None;
    for _ in 0..1500 {
        // The player cycles its turn clip until struck, so the hit lands mid-action.
        // A held trigger would outrank the pending death, so it is released then.
        let held = if arena.player().vitality().death_pending() {
            Actions::empty()
        } else {
            Actions::TURN_CLIP
        };
        let report = step(&mut arena, held);
        player_hits += hits_on(&report, ActorRole::Player).len();
        if let Some(t) = report.transition_of(ActorRole::Player) {
            if t.to == CombatState::Dying {
                dying_from = Some(t.from);
            }
        }
        if arena.player().state() != CombatState::Dead {
            assert!(arena.player().is_alive());
        } else {
            break;
        }
    }

    assert_eq!(player_hits, 1);
    assert_eq!(dying_from, Some(CombatState::Resting));
    assert_eq!(arena.player().state(), CombatState::Dead);
    assert!(!arena.player().is_alive());
    assert!(arena.render_packets().iter().all(|p| p.role != ActorRole::Player));

    // A dead player ignores movement.
    let before = arena.player().position();
    step(&mut arena, Actions::MOVE_FORWARD | Actions::TURN_LEFT);
    assert_eq!(arena.player().position(), before);
}

#[test]
fn toggling_mid_blend_does_not_cancel_the_conversation() {
    let mut arena = arena();
    step(&mut arena, Actions::TALK_TOGGLE);
    assert_eq!(arena.merchant().state(), CombatState::Entering(ActionKind::Talk));
    assert!(arena.render_packets().iter().any(|p| p.overlay));

    step(&mut arena, Actions::empty());
    for _ in 0..5 {
        step(&mut arena, Actions::TALK_TOGGLE);
        assert_eq!(arena.merchant().state(), CombatState::Entering(ActionKind::Talk));
    }
    while arena.merchant().state() == CombatState::Entering(ActionKind::Talk) {
        step(&mut arena, Actions::empty());
    }
    assert_eq!(arena.merchant().state(), CombatState::Acting(ActionKind::Talk));

    for _ in 0..120 {
        step(&mut arena, Actions::empty());
    }
    assert_eq!(arena.merchant().state(), CombatState::Acting(ActionKind::Talk));

    arena.set_conversation_active(false);
    let report = step(&mut arena, Actions::empty());
    assert_eq!(
        report.transition_of(ActorRole::Merchant).map(|t| t.to),
        Some(CombatState::Leaving(ActionKind::Talk))
    );
    assert!(arena.render_packets().iter().all(|p| !p.overlay));
}

#[test]
fn everything_held_at_once_picks_one_transition_per_actor() {
    let mut arena = arena();
    let report = step(&mut arena, Actions::all());

    // Action triggers outrank the forced-death inputs.
    assert_eq!(arena.player().state(), CombatState::Entering(ActionKind::Walk));
    assert_eq!(arena.enemy().state(), CombatState::Entering(ActionKind::Walk));
    assert_eq!(arena.merchant().state(), CombatState::Entering(ActionKind::Talk));

    let changes = report
        .events
        .iter()
        .filter(|e| matches!(e, CombatEvent::StateChanged { .. }))
        .count();
    assert_eq!(changes, 3);
    assert_eq!(arena.player().vitality().health(), 100.0);
    assert_eq!(arena.enemy().vitality().health(), 100.0);
}

#[test]
fn defeated_player_keeps_walking_until_released() {
    let mut arena = arena();
    arena.actor_mut(ActorRole::Player).vitality_mut().apply_damage(500.0);

    let report = step(&mut arena, Actions::MOVE_FORWARD);
    assert_eq!(
        report.transition_of(ActorRole::Player).map(|t| t.to),
        Some(CombatState::Entering(ActionKind::Walk))
    );
    assert!(arena.player().is_alive());

    for _ in 0..30 {
        step(&mut arena, Actions::MOVE_FORWARD);
    }
    let mut frames = 0;
    while arena.player().state() != CombatState::Resting {
        step(&mut arena, Actions::empty());
        frames += 1;
        assert!(frames < 500);
    }
    let report = step(&mut arena, Actions::empty());
    assert_eq!(
        report.transition_of(ActorRole::Player).map(|t| t.to),
        Some(CombatState::Dying)
    );
}

#[test]
fn walking_carries_the_player_forward() {
    let mut arena = arena();
    let start = arena.player().position();
    for _ in 0..60 {
        step(&mut arena, Actions::MOVE_FORWARD);
    }
    let moved = arena.player().position() - start;
    assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -1.2), 1e-3));
    assert_eq!(arena.player().state(), CombatState::Acting(ActionKind::Walk));
}
