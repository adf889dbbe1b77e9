use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Volume of a standing actor of half-size `scale` around `center`.
    ///
    /// X and Z extend `scale` to either side; Y reaches `scale` below the
    /// center and twice that above it, roughly the shape of an upright capsule.
    pub fn standing(center: Vec3, scale: f32) -> Self {
        Self {
            min: center - Vec3::splat(scale),
            max: Vec3::new(
                center.x + scale,
                center.y + scale * 2.0,
                center.z + scale,
            ),
        }
    }

    /// Inclusive on every face.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A box fixed in its owner's local space: `offset` from the owner's origin,
/// extending `half_extents` along each local axis. Oriented in world space by
/// whatever model matrix it is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    pub half_extents: Vec3,
    pub offset: Vec3,
}

impl OrientedBox {
    /// Line-list indices over [`OrientedBox::local_corners`]: near face, far
    /// face, then the four connecting edges.
    pub const WIREFRAME_INDICES: [u32; 24] = [
        0, 1, 1, 2, 2, 3, 3, 0, //
        4, 5, 5, 6, 6, 7, 7, 4, //
        0, 4, 1, 5, 2, 6, 3, 7,
    ];

    pub fn new(half_extents: Vec3, offset: Vec3) -> Self {
        Self {
            half_extents,
            offset,
        }
    }

    pub fn from_size(size: Vec3, offset: Vec3) -> Self {
        Self::new(size * 0.5, offset)
    }

    /// Corners relative to the owner origin, near (-Z) face first,
    /// counter-clockwise from the bottom-left.
    pub fn local_corners(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        let o = self.offset;
        [
            Vec3::new(-h.x, -h.y, -h.z) + o,
            Vec3::new(h.x, -h.y, -h.z) + o,
            Vec3::new(h.x, h.y, -h.z) + o,
            Vec3::new(-h.x, h.y, -h.z) + o,
            Vec3::new(-h.x, -h.y, h.z) + o,
            Vec3::new(h.x, -h.y, h.z) + o,
            Vec3::new(h.x, h.y, h.z) + o,
            Vec3::new(-h.x, h.y, h.z) + o,
        ]
    }

    pub fn world_corners(&self, model: &Mat4) -> [Vec3; 8] {
        self.local_corners().map(|corner| model.transform_point3(corner))
    }

    /// Model matrix for drawing a unit-centred box mesh of this size at the
    /// hitbox position.
    pub fn model_matrix(&self, owner_model: &Mat4) -> Mat4 {
        *owner_model * Mat4::from_translation(self.offset)
    }

    /// True when at least one world-space corner lies inside `target`.
    pub fn any_corner_inside(&self, model: &Mat4, target: &Aabb) -> bool {
        self.world_corners(model)
            .iter()
            .any(|&corner| target.contains_point(corner))
    }
}
