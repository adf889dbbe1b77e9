//! Headless scripted session: the knight walks up to the monster, cuts it
//! down with three slashes, then chats with the merchant.
//!
//! Run with `RUST_LOG=debug` to see every state transition.

use skirmish::prelude::*;

const DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u64 = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Approach,
    Fight,
    Talk,
    Done,
}

fn main() -> skirmish::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("=== Skirmish arena demo ===");

    let library = stand_in_library()?;
    let mut arena = Arena::new(&ArenaConfig::default(), &library)?;

    let mut phase = Phase::Approach;
    let mut talk_frames = 0;
    let mut hits = 0;

    while phase != Phase::Done && arena.frame() < MAX_FRAMES {
        let player = arena.player();
        let enemy = arena.enemy();
        let held = match phase {
            Phase::Approach => {
                if player.position().z - enemy.position().z > 1.0 {
                    Actions::MOVE_FORWARD
                } else {
                    log::info!("In reach at {:?} after {} frames", player.position(), arena.frame());
                    phase = Phase::Fight;
                    Actions::empty()
                }
            }
            Phase::Fight => {
                if !enemy.is_alive() {
                    phase = Phase::Talk;
                    Actions::TALK_TOGGLE
                } else if player.state() == CombatState::Resting && !enemy.vitality().death_pending() {
                    Actions::ATTACK
                } else {
                    Actions::empty()
                }
            }
            Phase::Talk => {
                talk_frames += 1;
                if talk_frames == 240 {
                    Actions::TALK_TOGGLE
                } else if talk_frames > 240 && arena.merchant().state() == CombatState::Resting {
                    phase = Phase::Done;
                    Actions::empty()
                } else {
                    Actions::empty()
                }
            }
            Phase::Done => Actions::empty(),
        };

        let report = arena.step(&FrameInput::new(held), DT);
        for event in &report.events {
            match event {
                CombatEvent::Hit { .. } => hits += 1,
                CombatEvent::Died { role } => println!("frame {}: {} died", report.frame, role),
                _ => {}
            }
        }
    }

    let enemy = arena.enemy();
    println!(
        "Finished after {} frames: {} hits, enemy health {:.0}/{:.0}, {} render packets",
        arena.frame(),
        hits,
        enemy.vitality().health(),
        enemy.vitality().max_health(),
        arena.render_packets().len()
    );
    for packet in arena.render_packets() {
        let origin = packet.model.transform_point3(glam::Vec3::ZERO);
        println!(
            "  {:<8} at {:>6.2?} ({} bones, {} bytes)",
            packet.role.to_string(),
            origin.to_array(),
            packet.bones.len(),
            std::mem::size_of_val(packet.bones)
        );
    }

    Ok(())
}
