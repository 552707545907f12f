//! Physics domain: tests for the box world, ray layout and contact predicates.

use avian2d::prelude::LayerMask;
use bevy::prelude::{Entity, Vec2, World};

use super::probe::{cast_rays, closest_hit, ground_frictions, is_grounded, wall_jump_allowed};
use super::{
    AabbCollider, AabbWorld, CollisionWorld, GameLayer, ProbeBox, RayHit, RayType,
    SurfaceMaterial, WallJumpOverride, layer_mask,
};

fn entities(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
}

fn ground_mask() -> LayerMask {
    layer_mask(&[GameLayer::Ground])
}

fn ray(index: usize, surface: Option<Entity>) -> RayHit {
    RayHit {
        index,
        origin: Vec2::ZERO,
        direction: Vec2::X,
        face_offset: 0.4,
        surface,
        distance: 0.05,
        normal: Vec2::NEG_X,
    }
}

// -----------------------------------------------------------------------------
// AabbWorld tests
// -----------------------------------------------------------------------------

#[test]
fn test_ray_hits_top_face_with_up_normal() {
    let e = entities(1);
    let mut world = AabbWorld::new();
    world.insert(AabbCollider::new(e[0], Vec2::new(0.0, -0.5), Vec2::new(10.0, 1.0), GameLayer::Ground));

    let hit = world
        .cast_ray(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0, ground_mask())
        .expect("ray should hit the floor");
    assert_eq!(hit.surface, e[0]);
    assert!((hit.distance - 2.0).abs() < 1e-5);
    assert_eq!(hit.normal, Vec2::Y);
}

#[test]
fn test_ray_respects_max_distance_and_mask() {
    let e = entities(1);
    let mut world = AabbWorld::new();
    world.insert(AabbCollider::new(e[0], Vec2::new(0.0, -0.5), Vec2::new(10.0, 1.0), GameLayer::Ground));

    assert!(world.cast_ray(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 1.5, ground_mask()).is_none());
    assert!(
        world
            .cast_ray(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0, layer_mask(&[GameLayer::Prop]))
            .is_none()
    );
}

#[test]
fn test_ray_returns_closest_of_several_boxes() {
    let e = entities(2);
    let mut world = AabbWorld::new();
    world
        .insert(AabbCollider::new(e[0], Vec2::new(5.0, 0.0), Vec2::ONE, GameLayer::Ground))
        .insert(AabbCollider::new(e[1], Vec2::new(3.0, 0.0), Vec2::ONE, GameLayer::Ground));

    let hit = world.cast_ray(Vec2::ZERO, Vec2::X, 10.0, ground_mask()).expect("should hit");
    assert_eq!(hit.surface, e[1]);
    assert!((hit.distance - 2.5).abs() < 1e-5);
    assert_eq!(hit.normal, Vec2::NEG_X);
}

#[test]
fn test_overlap_circle_keeps_insertion_order() {
    let e = entities(3);
    let mut world = AabbWorld::new();
    world
        .insert(AabbCollider::new(e[2], Vec2::new(0.5, 0.0), Vec2::splat(0.5), GameLayer::Prop))
        .insert(AabbCollider::new(e[0], Vec2::new(-0.5, 0.0), Vec2::splat(0.5), GameLayer::Prop))
        .insert(AabbCollider::new(e[1], Vec2::new(9.0, 0.0), Vec2::splat(0.5), GameLayer::Prop));

    let found = world.overlap_circle(Vec2::ZERO, 0.5, layer_mask(&[GameLayer::Prop]));
    assert_eq!(found, vec![e[2], e[0]]);
}

#[test]
fn test_overlap_area_ignores_touching_edges() {
    let e = entities(1);
    let mut world = AabbWorld::new();
    world.insert(AabbCollider::new(e[0], Vec2::new(0.0, 2.5), Vec2::new(4.0, 1.0), GameLayer::Ground));

    assert!(!world.overlap_area(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 2.0), ground_mask()));
    assert!(world.overlap_area(Vec2::new(1.0, 2.1), Vec2::new(-1.0, 0.0), ground_mask()));
}

// -----------------------------------------------------------------------------
// Probe tests
// -----------------------------------------------------------------------------

#[test]
fn test_layout_spreads_rays_inside_skin() {
    let probe = ProbeBox {
        center: Vec2::new(0.0, 1.0),
        half_size: Vec2::new(0.5, 1.0),
        facing: 1.0,
        skin_width: 0.1,
    };

    let (direction, origins, face) = probe.layout(RayType::Ground, 3);
    assert_eq!(direction, Vec2::NEG_Y);
    assert_eq!(face, 1.0);
    assert_eq!(origins.len(), 3);
    assert!((origins[0].x + 0.4).abs() < 1e-6);
    assert!(origins[1].x.abs() < 1e-6);
    assert!((origins[2].x - 0.4).abs() < 1e-6);

    let (front, _, face) = probe.layout(RayType::Front, 2);
    assert_eq!(front, Vec2::X);
    assert_eq!(face, 0.5);

    let flipped = ProbeBox { facing: -1.0, ..probe };
    let (front, _, _) = flipped.layout(RayType::Front, 2);
    let (back, _, _) = flipped.layout(RayType::Back, 2);
    assert_eq!(front, Vec2::NEG_X);
    assert_eq!(back, Vec2::X);
}

#[test]
fn test_cast_rays_reports_distance_from_box_face() {
    let e = entities(1);
    let mut world = AabbWorld::new();
    world.insert(AabbCollider::new(e[0], Vec2::new(0.0, -0.5), Vec2::new(10.0, 1.0), GameLayer::Ground));

    let probe = ProbeBox {
        center: Vec2::new(0.0, 1.05),
        half_size: Vec2::new(0.4, 1.0),
        facing: 1.0,
        skin_width: 0.02,
    };

    let rays = cast_rays(&world, &probe, RayType::Ground, 3, 0.1, ground_mask());
    assert_eq!(rays.len(), 3);
    for ray in &rays {
        assert_eq!(ray.surface, Some(e[0]));
        assert!((ray.distance - 0.05).abs() < 1e-5);
    }
    assert_eq!(closest_hit(&rays).map(|r| r.normal), Some(Vec2::Y));

    let head = cast_rays(&world, &probe, RayType::Head, 3, 0.1, ground_mask());
    assert!(head.iter().all(|r| !r.hit()));
}

#[test]
fn test_grounded_requires_velocity_toward_ground() {
    assert!(is_grounded(true, Vec2::new(3.0, -2.0), Vec2::Y));
    assert!(is_grounded(true, Vec2::ZERO, Vec2::Y));
    assert!(!is_grounded(true, Vec2::new(0.0, 5.0), Vec2::Y));
    assert!(!is_grounded(false, Vec2::new(0.0, -5.0), Vec2::Y));
}

#[test]
fn test_highest_friction_override_wins() {
    let e = entities(3);
    let mut world = AabbWorld::new();
    world
        .insert(
            AabbCollider::new(e[0], Vec2::ZERO, Vec2::ONE, GameLayer::Ground)
                .with_material(SurfaceMaterial::friction(0.2, 0.3)),
        )
        .insert(
            AabbCollider::new(e[1], Vec2::ZERO, Vec2::ONE, GameLayer::Ground)
                .with_material(SurfaceMaterial::friction(0.6, 0.1)),
        )
        .insert(AabbCollider::new(e[2], Vec2::ZERO, Vec2::ONE, GameLayer::Ground));

    let rays = [ray(0, Some(e[0])), ray(1, Some(e[1])), ray(2, Some(e[2]))];
    assert_eq!(ground_frictions(&world, &rays, 1.0, 1.0), (0.6, 0.3));

    let plain = [ray(0, Some(e[2])), ray(1, None)];
    assert_eq!(ground_frictions(&world, &plain, 1.0, 0.8), (1.0, 0.8));
}

// -----------------------------------------------------------------------------
// Wall jump gating tests
// -----------------------------------------------------------------------------

#[test]
fn test_wall_jump_uses_selected_rays_only() {
    let e = entities(1);
    let mut world = AabbWorld::new();
    world.insert(
        AabbCollider::new(e[0], Vec2::ZERO, Vec2::ONE, GameLayer::Ground)
            .with_material(SurfaceMaterial::wall_jump(WallJumpOverride::Allow)),
    );

    let selected_hit = [ray(0, Some(e[0])), ray(1, Some(e[0])), ray(2, None)];
    assert!(wall_jump_allowed(&world, &selected_hit, &[0, 1], true));

    let only_unselected = [ray(0, None), ray(1, None), ray(2, Some(e[0]))];
    assert!(!wall_jump_allowed(&world, &only_unselected, &[0, 1], true));
}

#[test]
fn test_wall_jump_requires_all_rays_when_no_selection() {
    let e = entities(1);
    let world = AabbWorld::new();

    let partial = [ray(0, Some(e[0])), ray(1, Some(e[0])), ray(2, None)];
    assert!(!wall_jump_allowed(&world, &partial, &[], true));

    let full = [ray(0, Some(e[0])), ray(1, Some(e[0])), ray(2, Some(e[0]))];
    assert!(wall_jump_allowed(&world, &full, &[], true));
    assert!(!wall_jump_allowed(&world, &full, &[], false));
    assert!(!wall_jump_allowed(&world, &[], &[], true));
}

#[test]
fn test_wall_jump_material_priority() {
    let e = entities(3);
    let mut world = AabbWorld::new();
    world
        .insert(
            AabbCollider::new(e[0], Vec2::ZERO, Vec2::ONE, GameLayer::Ground)
                .with_material(SurfaceMaterial::wall_jump(WallJumpOverride::Allow)),
        )
        .insert(
            AabbCollider::new(e[1], Vec2::ZERO, Vec2::ONE, GameLayer::Ground)
                .with_material(SurfaceMaterial::wall_jump(WallJumpOverride::Deny)),
        )
        .insert(AabbCollider::new(e[2], Vec2::ZERO, Vec2::ONE, GameLayer::Ground));

    // Deny beats the character setting
    let denied = [ray(0, Some(e[1])), ray(1, Some(e[2]))];
    assert!(!wall_jump_allowed(&world, &denied, &[], true));

    // Allow beats the character setting
    let allowed = [ray(0, Some(e[0])), ray(1, Some(e[2]))];
    assert!(wall_jump_allowed(&world, &allowed, &[], false));

    // Allow beats Deny regardless of ray order
    let mixed = [ray(0, Some(e[0])), ray(1, Some(e[1]))];
    assert!(wall_jump_allowed(&world, &mixed, &[], false));
    let mixed_rev = [ray(0, Some(e[1])), ray(1, Some(e[0]))];
    assert!(wall_jump_allowed(&world, &mixed_rev, &[], false));
}
