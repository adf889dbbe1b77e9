use glam::{Quat, Vec3};

use crate::input::Actions;

/// Degrees per second added while the quick-turn action is held.
pub const QUICK_TURN_SPEED: f32 = 90.0;

/// Where an actor stands and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    /// Degrees about +Y, zero facing -Z.
    pub yaw: f32,
    pub forward: Vec3,
}

impl Kinematics {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            forward: Self::forward_for_yaw(yaw),
        }
    }

    pub fn forward_for_yaw(yaw: f32) -> Vec3 {
        Quat::from_rotation_y(yaw.to_radians()) * Vec3::NEG_Z
    }
}

/// Keyboard-driven movement for the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locomotion {
    pub move_speed: f32,
    /// Degrees per second.
    pub yaw_speed: f32,
    pub quick_turn_speed: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            move_speed: 1.2,
            yaw_speed: 150.0,
            quick_turn_speed: QUICK_TURN_SPEED,
        }
    }
}

impl Locomotion {
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_yaw_speed(mut self, yaw_speed: f32) -> Self {
        self.yaw_speed = yaw_speed;
        self
    }

    /// Moves along the current forward vector, then turns and recomputes it.
    pub fn integrate(&self, kinematics: &mut Kinematics, held: Actions, dt: f32) {
        let step = self.move_speed * dt;
        if held.contains(Actions::MOVE_FORWARD) {
            kinematics.position += kinematics.forward * step;
        }
        if held.contains(Actions::MOVE_BACK) {
            kinematics.position -= kinematics.forward * step;
        }

        if held.contains(Actions::TURN_LEFT) {
            kinematics.yaw += self.yaw_speed * dt;
        }
        if held.contains(Actions::TURN_RIGHT) {
            kinematics.yaw -= self.yaw_speed * dt;
        }
        if held.contains(Actions::RESET_YAW) {
            kinematics.yaw = 0.0;
        }
        if held.contains(Actions::QUICK_TURN) {
            kinematics.yaw += self.quick_turn_speed * dt;
        }

        kinematics.forward = Kinematics::forward_for_yaw(kinematics.yaw);
    }
}
