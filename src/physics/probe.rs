//! Ground, wall and ceiling probing with fixed sets of parallel rays.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use super::world::{CollisionWorld, WallJumpOverride};

/// Max velocity along the ground normal that still counts as grounded.
pub const GROUND_SNAP_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayType {
    Ground,
    Head,
    Front,
    Back,
}

/// Result of one probe ray for the current physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub index: usize,
    pub origin: Vec2,
    pub direction: Vec2,
    /// Distance between the ray origin and the box face it probes from.
    pub face_offset: f32,
    /// Contacted surface, `None` when nothing is in range.
    pub surface: Option<Entity>,
    /// Distance from the box face to the surface. Negative when penetrating.
    pub distance: f32,
    pub normal: Vec2,
}

impl RayHit {
    pub fn hit(&self) -> bool {
        self.surface.is_some()
    }
}

/// Box geometry rays are laid out from, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeBox {
    pub center: Vec2,
    pub half_size: Vec2,
    pub facing: f32,
    pub skin_width: f32,
}

impl ProbeBox {
    /// Direction, origins and face offset for `count` rays of `ray_type`.
    pub fn layout(&self, ray_type: RayType, count: usize) -> (Vec2, Vec<Vec2>, f32) {
        let c = self.center;
        let h = self.half_size;
        let inset_x = (h.x - self.skin_width).max(0.0);
        let inset_y = (h.y - self.skin_width).max(0.0);

        match ray_type {
            RayType::Ground | RayType::Head => {
                let direction = if ray_type == RayType::Ground { Vec2::NEG_Y } else { Vec2::Y };
                let origins = spread(count, c - Vec2::new(inset_x, 0.0), c + Vec2::new(inset_x, 0.0));
                (direction, origins, h.y)
            }
            RayType::Front | RayType::Back => {
                let sign = if ray_type == RayType::Front { self.facing } else { -self.facing };
                let origins = spread(count, c - Vec2::new(0.0, inset_y), c + Vec2::new(0.0, inset_y));
                (Vec2::new(sign, 0.0), origins, h.x)
            }
        }
    }
}

/// `count` points evenly spaced from `from` to `to`; a single point sits in the middle.
fn spread(count: usize, from: Vec2, to: Vec2) -> Vec<Vec2> {
    match count {
        0 => Vec::new(),
        1 => vec![(from + to) * 0.5],
        _ => (0..count)
            .map(|i| from.lerp(to, i as f32 / (count - 1) as f32))
            .collect(),
    }
}

/// Cast `count` rays of `ray_type`, detecting contacts up to `reach` beyond the box face.
pub fn cast_rays(
    world: &dyn CollisionWorld,
    probe: &ProbeBox,
    ray_type: RayType,
    count: usize,
    reach: f32,
    mask: LayerMask,
) -> Vec<RayHit> {
    let (direction, origins, face_offset) = probe.layout(ray_type, count);

    origins
        .into_iter()
        .enumerate()
        .map(|(index, origin)| {
            let hit = world.cast_ray(origin, direction, face_offset + reach, mask);
            RayHit {
                index,
                origin,
                direction,
                face_offset,
                surface: hit.map(|h| h.surface),
                distance: hit.map_or(reach, |h| h.distance - face_offset),
                normal: hit.map_or(Vec2::ZERO, |h| h.normal),
            }
        })
        .collect()
}

/// The hit with the smallest distance.
pub fn closest_hit(rays: &[RayHit]) -> Option<&RayHit> {
    rays.iter()
        .filter(|r| r.hit())
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Ground contact only counts while not moving away from the ground.
pub fn is_grounded(touch_ground: bool, velocity: Vec2, ground_normal: Vec2) -> bool {
    touch_ground && velocity.dot(ground_normal) < GROUND_SNAP_THRESHOLD
}

/// Dynamic and static friction under the ground rays.
///
/// The highest override wins when several overriding surfaces are touched.
pub fn ground_frictions(
    world: &dyn CollisionWorld,
    ground_rays: &[RayHit],
    default_dynamic: f32,
    default_static: f32,
) -> (f32, f32) {
    let mut overridden = false;
    let mut dynamic = 0.0f32;
    let mut stat = 0.0f32;

    for surface in ground_rays.iter().filter_map(|r| r.surface) {
        if let Some(material) = world.material(surface)
            && material.override_friction
        {
            overridden = true;
            dynamic = dynamic.max(material.dynamic_friction);
            stat = stat.max(material.static_friction);
        }
    }

    if overridden {
        (dynamic, stat)
    } else {
        (default_dynamic, default_static)
    }
}

/// Whether the front rays allow a wall jump.
///
/// Every selected ray (all rays when `ray_indexes` is empty) must hit. A
/// surface set to `Allow` wins over `Deny`, which wins over `enabled`.
pub fn wall_jump_allowed(
    world: &dyn CollisionWorld,
    front_rays: &[RayHit],
    ray_indexes: &[usize],
    enabled: bool,
) -> bool {
    let selected: Vec<&RayHit> = if ray_indexes.is_empty() {
        front_rays.iter().collect()
    } else {
        front_rays
            .iter()
            .filter(|r| ray_indexes.contains(&r.index))
            .collect()
    };

    let expected = if ray_indexes.is_empty() {
        front_rays.len()
    } else {
        ray_indexes.len()
    };

    let mut hit_count = 0;
    let mut material_override = WallJumpOverride::Default;
    for ray in selected {
        let Some(surface) = ray.surface else {
            continue;
        };
        hit_count += 1;

        match world.material(surface).map(|m| m.wall_jump) {
            Some(WallJumpOverride::Allow) => material_override = WallJumpOverride::Allow,
            Some(WallJumpOverride::Deny) if material_override != WallJumpOverride::Allow => {
                material_override = WallJumpOverride::Deny;
            }
            _ => {}
        }
    }

    let touching = expected > 0 && hit_count == expected;
    touching
        && material_override != WallJumpOverride::Deny
        && (material_override == WallJumpOverride::Allow || enabled)
}
