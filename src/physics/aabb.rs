//! In-memory level made of axis-aligned boxes.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use super::layers::mask_matches;
use super::world::{CollisionWorld, SurfaceHit, SurfaceMaterial};

#[derive(Debug, Clone)]
pub struct AabbCollider {
    pub entity: Entity,
    pub min: Vec2,
    pub max: Vec2,
    pub layers: LayerMask,
    pub material: Option<SurfaceMaterial>,
    pub carrier_velocity: Option<Vec2>,
    pub hitable: bool,
}

impl AabbCollider {
    pub fn new(entity: Entity, center: Vec2, size: Vec2, layers: impl Into<LayerMask>) -> Self {
        let half = size * 0.5;
        Self {
            entity,
            min: center - half,
            max: center + half,
            layers: layers.into(),
            material: None,
            carrier_velocity: None,
            hitable: false,
        }
    }

    pub fn with_material(mut self, material: SurfaceMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_carrier_velocity(mut self, velocity: Vec2) -> Self {
        self.carrier_velocity = Some(velocity);
        self
    }

    pub fn hitable(mut self) -> Self {
        self.hitable = true;
        self
    }

    fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Slab test. A ray starting inside reports distance 0 facing back along the ray.
    fn ray_hit(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<(f32, Vec2)> {
        if self.contains(origin) {
            return Some((0.0, -direction));
        }

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec2::ZERO;

        for axis in 0..2 {
            let (o, d, lo, hi) = if axis == 0 {
                (origin.x, direction.x, self.min.x, self.max.x)
            } else {
                (origin.y, direction.y, self.min.y, self.max.y)
            };

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let (near, far, face_normal) = if d > 0.0 {
                ((lo - o) / d, (hi - o) / d, -1.0)
            } else {
                ((hi - o) / d, (lo - o) / d, 1.0)
            };

            if near > t_enter {
                t_enter = near;
                normal = if axis == 0 {
                    Vec2::new(face_normal, 0.0)
                } else {
                    Vec2::new(0.0, face_normal)
                };
            }
            t_exit = t_exit.min(far);
        }

        if t_enter > t_exit || t_exit < 0.0 || t_enter < 0.0 || t_enter > max_distance {
            return None;
        }
        Some((t_enter, normal))
    }

    fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    fn overlaps_area(&self, min: Vec2, max: Vec2) -> bool {
        self.min.x < max.x && self.max.x > min.x && self.min.y < max.y && self.max.y > min.y
    }
}

/// A list of boxes queried in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AabbWorld {
    pub colliders: Vec<AabbCollider>,
}

impl AabbWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: AabbCollider) -> &mut Self {
        self.colliders.push(collider);
        self
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut AabbCollider> {
        self.colliders.iter_mut().find(|c| c.entity == entity)
    }

    pub fn remove(&mut self, entity: Entity) {
        self.colliders.retain(|c| c.entity != entity);
    }

    fn find(&self, entity: Entity) -> Option<&AabbCollider> {
        self.colliders.iter().find(|c| c.entity == entity)
    }
}

impl CollisionWorld for AabbWorld {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        self.colliders
            .iter()
            .filter(|c| mask_matches(mask, c.layers))
            .filter_map(|c| {
                c.ray_hit(origin, direction, max_distance)
                    .map(|(distance, normal)| SurfaceHit {
                        surface: c.entity,
                        distance,
                        normal,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Entity> {
        self.colliders
            .iter()
            .filter(|c| mask_matches(mask, c.layers) && c.overlaps_circle(center, radius))
            .map(|c| c.entity)
            .collect()
    }

    fn overlap_area(&self, a: Vec2, b: Vec2, mask: LayerMask) -> bool {
        let (min, max) = (a.min(b), a.max(b));
        self.colliders
            .iter()
            .any(|c| mask_matches(mask, c.layers) && c.overlaps_area(min, max))
    }

    fn material(&self, surface: Entity) -> Option<SurfaceMaterial> {
        self.find(surface).and_then(|c| c.material)
    }

    fn carrier_velocity(&self, surface: Entity) -> Option<Vec2> {
        self.find(surface).and_then(|c| c.carrier_velocity)
    }

    fn is_hitable(&self, surface: Entity) -> bool {
        self.find(surface).is_some_and(|c| c.hitable)
    }
}
