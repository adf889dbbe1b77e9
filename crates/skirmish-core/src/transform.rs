use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale. Used both for actor placement and for
/// per-bone local poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Placement of an upright actor: uniform scale, rotation about +Y by
    /// `yaw_degrees`, then translation.
    pub fn from_yaw(position: Vec3, yaw_degrees: f32, uniform_scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw_degrees.to_radians()),
            scale: Vec3::splat(uniform_scale),
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Component-wise interpolation: lerp for translation and scale, slerp
    /// for rotation. `t = 0` returns `self`, `t = 1` returns `other`.
    pub fn interpolate(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t).normalize(),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_placement_matches_translate_scale_rotate() {
        let t = Transform::from_yaw(Vec3::new(1.0, 2.0, 3.0), 90.0, 0.5);
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_scale(Vec3::splat(0.5))
            * Mat4::from_rotation_y(90f32.to_radians());
        assert!(t.to_matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn interpolate_endpoints() {
        let a = Transform::from_position(Vec3::ZERO);
        let b = Transform::new(
            Vec3::new(2.0, 0.0, 0.0),
            Quat::from_rotation_z(1.0),
            Vec3::splat(3.0),
        );
        assert!(a.interpolate(&b, 0.0).position.abs_diff_eq(a.position, 1e-6));
        let end = a.interpolate(&b, 1.0);
        assert!(end.position.abs_diff_eq(b.position, 1e-6));
        assert!(end.rotation.abs_diff_eq(b.rotation, 1e-5));
        let mid = a.interpolate(&b, 0.5);
        assert!(mid.position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(mid.scale.abs_diff_eq(Vec3::splat(2.0), 1e-6));
    }
}
