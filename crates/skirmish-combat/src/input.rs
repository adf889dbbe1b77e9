use bitflags::bitflags;

bitflags! {
    /// Actions the input collaborator reports as held for the current frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u32 {
        const MOVE_FORWARD = 1 << 0;
        const MOVE_BACK = 1 << 1;
        const TURN_LEFT = 1 << 2;
        const TURN_RIGHT = 1 << 3;
        const RESET_YAW = 1 << 4;
        const QUICK_TURN = 1 << 5;
        const ATTACK = 1 << 6;
        const KICK = 1 << 7;
        /// Plays the player's turn clip.
        const TURN_CLIP = 1 << 8;
        const TALK_TOGGLE = 1 << 9;
        const FORCE_DEATH_PLAYER = 1 << 10;
        const FORCE_DEATH_ENEMY = 1 << 11;
        const ENEMY_WALK = 1 << 12;
        const ENEMY_ATTACK = 1 << 13;

        // Debug overrides: force single-clip playback from time zero.
        const POSE_IDLE = 1 << 16;
        const POSE_WALK = 1 << 17;
        const POSE_ATTACK = 1 << 18;
        const POSE_KICK = 1 << 19;
        const POSE_TURN = 1 << 20;

        const PLAYER_WALK = Self::MOVE_FORWARD.bits() | Self::TURN_LEFT.bits() | Self::TURN_RIGHT.bits();
    }
}

/// Snapshot of held actions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub held: Actions,
}

impl FrameInput {
    pub fn new(held: Actions) -> Self {
        Self { held }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    /// True when any flag of `mask` is held.
    pub fn holds(&self, mask: Actions) -> bool {
        self.held.intersects(mask)
    }
}

impl From<Actions> for FrameInput {
    fn from(held: Actions) -> Self {
        Self::new(held)
    }
}
