//! Kinematic body: velocity, collision box and probe contacts.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::content::MotorSettings;
use crate::physics::probe::{cast_rays, closest_hit};
use crate::physics::{CollisionWorld, ProbeBox, RayHit, RayType, layer_mask};

/// Contacted hitable surface and the ray kind that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub surface: Entity,
    pub ray_type: RayType,
}

/// Moves a box through a [`CollisionWorld`] and keeps its probe rays current.
///
/// `position` is the character origin (feet). The box is described relative to
/// it and mirrored horizontally when the motor flips.
#[derive(Component, Debug, Clone)]
pub struct Motor {
    pub position: Vec2,
    pub velocity: Vec2,
    face_right: bool,
    box_size: Vec2,
    box_center: Vec2,
    scale: Vec2,
    offset: Vec2,
    ray_counts: [usize; 4],
    skin_width: f32,
    probe_distance: f32,
    walkable_normal_y: f32,
    mask: LayerMask,
    ground: Vec<RayHit>,
    head: Vec<RayHit>,
    front: Vec<RayHit>,
    back: Vec<RayHit>,
    touches: Vec<Touch>,
}

impl Motor {
    pub fn new(settings: &MotorSettings, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            face_right: true,
            box_size: settings.box_size,
            box_center: settings.box_center,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            ray_counts: [
                settings.ground_rays,
                settings.head_rays,
                settings.front_rays,
                settings.back_rays,
            ],
            skin_width: settings.skin_width.max(0.0),
            probe_distance: settings.probe_distance.max(0.0),
            walkable_normal_y: settings.max_walkable_slope.clamp(0.0, 90.0).to_radians().cos(),
            mask: layer_mask(&settings.ray_layers),
            ground: Vec::new(),
            head: Vec::new(),
            front: Vec::new(),
            back: Vec::new(),
            touches: Vec::new(),
        }
    }

    // ---- geometry ----

    pub fn face_right(&self) -> bool {
        self.face_right
    }

    /// 1 when facing right, -1 when facing left.
    pub fn facing(&self) -> f32 {
        if self.face_right { 1.0 } else { -1.0 }
    }

    pub fn box_size(&self) -> Vec2 {
        self.box_size
    }

    /// Box center relative to `position`.
    pub fn box_center(&self) -> Vec2 {
        self.box_center
    }

    pub fn set_box(&mut self, size: Vec2, center: Vec2) {
        self.box_size = size.max(Vec2::ZERO);
        self.box_center = center;
    }

    /// Visual scale and offset matching the current box (crouch).
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_scale_offset(&mut self, scale: Vec2, offset: Vec2) {
        self.scale = scale;
        self.offset = offset;
    }

    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// World-space box the rays are laid out from.
    pub fn probe_box(&self) -> ProbeBox {
        ProbeBox {
            center: self.position + self.box_center,
            half_size: self.box_size * 0.5,
            facing: self.facing(),
            skin_width: self.skin_width,
        }
    }

    /// Mirror facing and the box horizontally.
    pub fn flip(&mut self) {
        self.face_right = !self.face_right;
        self.box_center.x = -self.box_center.x;
        self.offset.x = -self.offset.x;
        std::mem::swap(&mut self.front, &mut self.back);
    }

    // ---- contacts ----

    pub fn rays(&self, ray_type: RayType) -> &[RayHit] {
        match ray_type {
            RayType::Ground => &self.ground,
            RayType::Head => &self.head,
            RayType::Front => &self.front,
            RayType::Back => &self.back,
        }
    }

    pub fn touch_ground(&self) -> bool {
        self.ground.iter().any(RayHit::hit)
    }

    pub fn touch_head(&self) -> bool {
        self.head.iter().any(RayHit::hit)
    }

    pub fn touch_front(&self) -> bool {
        self.front.iter().any(RayHit::hit)
    }

    pub fn touch_back(&self) -> bool {
        self.back.iter().any(RayHit::hit)
    }

    /// Normal of the closest ground contact, up when not touching.
    pub fn ground_normal(&self) -> Vec2 {
        closest_hit(&self.ground).map_or(Vec2::Y, |r| r.normal)
    }

    /// Gap between the box bottom and the closest ground, 0 when not touching.
    pub fn distance_to_ground(&self) -> f32 {
        closest_hit(&self.ground).map_or(0.0, |r| r.distance)
    }

    /// Hitable surfaces found by the last refresh, once per surface and ray kind.
    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }

    /// Velocity projected on the ground plane.
    pub fn velocity_on_ground(&self) -> Vec2 {
        let normal = self.ground_normal();
        self.velocity - normal * self.velocity.dot(normal)
    }

    /// Re-cast every probe ray from the current position.
    pub fn refresh_contacts(&mut self, world: &dyn CollisionWorld) {
        let probe = self.probe_box();
        let (reach, mask) = (self.probe_distance, self.mask);
        let counts = self.ray_counts;
        let cast = |ray_type: RayType, count: usize| cast_rays(world, &probe, ray_type, count, reach, mask);

        self.ground = cast(RayType::Ground, counts[0]);
        self.head = cast(RayType::Head, counts[1]);
        self.front = cast(RayType::Front, counts[2]);
        self.back = cast(RayType::Back, counts[3]);

        let mut touches = Vec::new();
        for ray_type in [RayType::Ground, RayType::Head, RayType::Front, RayType::Back] {
            for surface in self.rays(ray_type).iter().filter_map(|r| r.surface) {
                let touch = Touch { surface, ray_type };
                if world.is_hitable(surface) && !touches.contains(&touch) {
                    touches.push(touch);
                }
            }
        }
        self.touches = touches;
    }

    // ---- movement ----

    /// Integrate velocity over `dt`, stopping at walls, floors and ceilings,
    /// then refresh contacts.
    pub fn move_by(&mut self, world: &dyn CollisionWorld, dt: f32) {
        let delta = self.velocity * dt;

        let dx = self.sweep_horizontal(world, delta.x);
        self.position.x += dx;

        let dy = self.sweep_vertical(world, delta.y);
        self.position.y += dy;

        self.refresh_contacts(world);
    }

    fn sweep_horizontal(&mut self, world: &dyn CollisionWorld, dx: f32) -> f32 {
        if dx == 0.0 {
            return 0.0;
        }

        let count = self.ray_counts[2].max(self.ray_counts[3]);
        let probe = ProbeBox {
            facing: dx.signum(),
            ..self.probe_box()
        };
        let rays = cast_rays(world, &probe, RayType::Front, count, dx.abs(), self.mask);

        let blocking = rays
            .iter()
            .filter(|r| r.hit() && r.normal.y < self.walkable_normal_y)
            .map(|r| r.distance)
            .min_by(f32::total_cmp);

        match blocking {
            Some(distance) if distance < dx.abs() => {
                self.velocity.x = 0.0;
                distance.max(0.0) * dx.signum()
            }
            _ => dx,
        }
    }

    fn sweep_vertical(&mut self, world: &dyn CollisionWorld, dy: f32) -> f32 {
        let probe = self.probe_box();
        let down = (-dy).max(0.0);
        let ground = cast_rays(world, &probe, RayType::Ground, self.ray_counts[0], down, self.mask);

        let mut dy = dy;
        if let Some(hit) = closest_hit(&ground) {
            if hit.distance < 0.0 {
                // penetrating: push out
                dy = dy.max(-hit.distance);
            } else if dy <= 0.0 && hit.distance <= down {
                dy = -hit.distance;
            }
        }

        if dy > 0.0 {
            let head = cast_rays(world, &probe, RayType::Head, self.ray_counts[1], dy, self.mask);
            if let Some(hit) = closest_hit(&head)
                && hit.distance < dy
            {
                dy = hit.distance.max(0.0);
                self.velocity.y = self.velocity.y.min(0.0);
            }
        }

        dy
    }

    /// Drop onto the ground when a contact is within probe range.
    pub fn snap_to_ground(&mut self) {
        let distance = self.distance_to_ground();
        self.position.y -= distance;
        for ray in self.ground.iter_mut().filter(|r| r.hit()) {
            ray.distance -= distance;
        }
    }
}
