//! `CollisionWorld` backed by avian2d spatial queries.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::world::{CollisionWorld, SurfaceHit, SurfaceMaterial};
use crate::carrier::Carrier;
use crate::combat::HitTarget;

/// Everything the character core needs to query the physics scene.
#[derive(SystemParam)]
pub struct PhysicsWorld<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    materials: Query<'w, 's, &'static SurfaceMaterial>,
    carriers: Query<'w, 's, &'static Carrier>,
    hit_targets: Query<'w, 's, (), With<HitTarget>>,
}

impl<'w, 's> PhysicsWorld<'w, 's> {
    /// A view of the scene that ignores `exclude` (the querying character).
    pub fn view(&self, exclude: Entity) -> PhysicsView<'_, 'w, 's> {
        PhysicsView { world: self, exclude }
    }
}

pub struct PhysicsView<'a, 'w, 's> {
    world: &'a PhysicsWorld<'w, 's>,
    exclude: Entity,
}

impl PhysicsView<'_, '_, '_> {
    fn filter(&self, mask: LayerMask) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(mask).with_excluded_entities([self.exclude])
    }

    fn intersections(&self, shape: &Collider, position: Vec2, mask: LayerMask) -> Vec<Entity> {
        let mut entities = self
            .world
            .spatial
            .shape_intersections(shape, position, 0.0, &self.filter(mask));
        // Query pipeline order is not guaranteed between runs
        entities.sort();
        entities
    }
}

impl CollisionWorld for PhysicsView<'_, '_, '_> {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<SurfaceHit> {
        let Ok(direction) = Dir2::new(direction) else {
            return None;
        };

        self.world
            .spatial
            .cast_ray(origin, direction, max_distance, true, &self.filter(mask))
            .map(|hit| SurfaceHit {
                surface: hit.entity,
                distance: hit.distance,
                normal: hit.normal,
            })
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Entity> {
        if radius <= 0.0 {
            return Vec::new();
        }
        self.intersections(&Collider::circle(radius), center, mask)
    }

    fn overlap_area(&self, a: Vec2, b: Vec2, mask: LayerMask) -> bool {
        let size = (b - a).abs();
        if size.x <= 0.0 || size.y <= 0.0 {
            return false;
        }
        let center = (a + b) * 0.5;
        !self
            .intersections(&Collider::rectangle(size.x, size.y), center, mask)
            .is_empty()
    }

    fn material(&self, surface: Entity) -> Option<SurfaceMaterial> {
        self.world.materials.get(surface).ok().copied()
    }

    fn carrier_velocity(&self, surface: Entity) -> Option<Vec2> {
        self.world.carriers.get(surface).ok().map(Carrier::velocity)
    }

    fn is_hitable(&self, surface: Entity) -> bool {
        self.world.hit_targets.contains(surface)
    }
}
