//! Names of the skeletons and clips the arena expects from the asset loader,
//! plus a procedural stand-in library for headless runs and tests.

use skirmish_animation::procedural::{biped_skeleton, swing_clip};
use skirmish_animation::ClipLibrary;
use skirmish_core::Result;

pub const KNIGHT: &str = "knight";
pub const MONSTER: &str = "monster";
pub const MERCHANT: &str = "merchant";

pub const KNIGHT_IDLE: &str = "knight/idle";
pub const KNIGHT_WALK: &str = "knight/walk";
pub const KNIGHT_WALK_BACK: &str = "knight/walk_back";
pub const KNIGHT_SLASH: &str = "knight/slash";
pub const KNIGHT_KICK: &str = "knight/sword_kick";
pub const KNIGHT_TURN: &str = "knight/turn";
pub const KNIGHT_DEATH: &str = "knight/death";

pub const MONSTER_IDLE: &str = "monster/idle";
pub const MONSTER_WALK: &str = "monster/walk";
pub const MONSTER_ATTACK: &str = "monster/attack";
pub const MONSTER_DYING: &str = "monster/dying";

pub const MERCHANT_IDLE: &str = "merchant/idle";
pub const MERCHANT_TALKING: &str = "merchant/talking";

// (clip, duration in seconds, swing amplitude in degrees)
const KNIGHT_CLIPS: [(&str, f32, f32); 7] = [
    (KNIGHT_IDLE, 3.3, 4.0),
    (KNIGHT_WALK, 2.06, 25.0),
    (KNIGHT_WALK_BACK, 2.06, 20.0),
    (KNIGHT_SLASH, 1.03, 70.0),
    (KNIGHT_KICK, 1.6, 60.0),
    (KNIGHT_TURN, 1.2, 35.0),
    (KNIGHT_DEATH, 2.4, 80.0),
];

const MONSTER_CLIPS: [(&str, f32, f32); 4] = [
    (MONSTER_IDLE, 2.5, 5.0),
    (MONSTER_WALK, 1.8, 30.0),
    (MONSTER_ATTACK, 1.5, 75.0),
    (MONSTER_DYING, 2.8, 85.0),
];

const MERCHANT_CLIPS: [(&str, f32, f32); 2] = [(MERCHANT_IDLE, 4.0, 3.0), (MERCHANT_TALKING, 5.2, 15.0)];

/// Biped rigs with swinging clips under every name the default arena uses.
pub fn stand_in_library() -> Result<ClipLibrary> {
    let mut library = ClipLibrary::new();

    for (skeleton_name, clips) in [
        (KNIGHT, &KNIGHT_CLIPS[..]),
        (MONSTER, &MONSTER_CLIPS[..]),
        (MERCHANT, &MERCHANT_CLIPS[..]),
    ] {
        let skeleton = library.add_skeleton(skeleton_name, biped_skeleton()?);
        for &(name, duration, amplitude) in clips {
            library.add_clip(skeleton_name, swing_clip(name, duration, &skeleton, amplitude))?;
        }
    }

    log::debug!("Built stand-in library with {} clips", library.clip_count());
    Ok(library)
}
