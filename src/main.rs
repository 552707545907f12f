use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use platformer_core::prelude::*;

/// Pixels per world meter.
const PIXELS_PER_METER: f32 = 40.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platformer".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PlatformerPlugin)
        .add_hitable::<Breakable>()
        .add_systems(Startup, (spawn_camera, spawn_level, spawn_player))
        .add_systems(Update, (move_shuttles, break_crates, log_notifications))
        .run();
}

// ---- Demo components ----

/// A crate that breaks after a few hits.
#[derive(Component, Debug)]
struct Breakable {
    health: f32,
}

impl Hitable for Breakable {
    fn on_melee_attack_hit(&mut self, launcher: Entity, hit: &MeleeHit) {
        self.health -= hit.damage;
        info!("{:?} hit a crate for {}, {} left", launcher, hit.damage, self.health);
    }

    fn on_character_touch(&mut self, launcher: Entity, ray_type: RayType) {
        debug!("{:?} touched a crate ({:?})", launcher, ray_type);
    }
}

/// Platform moving back and forth along x.
#[derive(Component, Debug)]
struct Shuttle {
    origin: Vec2,
    amplitude: f32,
    speed: f32,
}

// ---- Setup ----

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: 1.0 / PIXELS_PER_METER,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 4.0, 0.0),
    ));
}

fn block(center: Vec2, size: Vec2, color: Color, layer: GameLayer) -> impl Bundle {
    (
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(layer, [GameLayer::Character]),
    )
}

fn spawn_level(mut commands: Commands) {
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ice_color = Color::srgb(0.7, 0.85, 0.95);

    // Floor, walls, ledges
    commands.spawn(block(Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0), ground_color, GameLayer::Ground));
    commands.spawn(block(Vec2::new(-15.0, 6.0), Vec2::new(1.0, 12.0), wall_color, GameLayer::Ground));
    commands.spawn(block(Vec2::new(15.0, 6.0), Vec2::new(1.0, 12.0), wall_color, GameLayer::Ground));
    commands.spawn(block(Vec2::new(-8.0, 3.0), Vec2::new(4.0, 0.5), ground_color, GameLayer::Ground));

    // Low ceiling to crawl under
    commands.spawn(block(Vec2::new(6.0, 1.75), Vec2::new(3.0, 0.5), ground_color, GameLayer::Ground));

    // Ice patch
    commands.spawn((
        block(Vec2::new(-4.0, 0.05), Vec2::new(4.0, 0.1), ice_color, GameLayer::Ground),
        SurfaceMaterial::friction(0.1, 0.3),
    ));

    // Pillar nobody can wall jump from
    commands.spawn((
        block(Vec2::new(10.0, 2.5), Vec2::new(0.6, 5.0), Color::srgb(0.6, 0.3, 0.3), GameLayer::Ground),
        SurfaceMaterial::wall_jump(WallJumpOverride::Deny),
    ));

    // Moving platform
    let origin = Vec2::new(0.0, 4.5);
    commands.spawn((
        Name::new("Shuttle"),
        Sprite {
            color: Color::srgb(0.5, 0.4, 0.3),
            custom_size: Some(Vec2::new(3.0, 0.4)),
            ..default()
        },
        Transform::from_translation(origin.extend(0.0)),
        RigidBody::Kinematic,
        Collider::rectangle(3.0, 0.4),
        CollisionLayers::new(GameLayer::Platform, [GameLayer::Character]),
        Carrier::new(origin),
        Shuttle {
            origin,
            amplitude: 4.0,
            speed: 0.8,
        },
    ));

    // Crates
    for x in [3.0, 4.0] {
        commands.spawn((
            Name::new("Crate"),
            block(Vec2::new(x, 0.4), Vec2::splat(0.8), Color::srgb(0.6, 0.45, 0.2), GameLayer::Prop),
            Breakable { health: 3.0 },
        ));
    }
}

fn spawn_player(mut commands: Commands, config: Res<CharacterConfig>) {
    let size = config.motor.box_size;
    let center = config.motor.box_center;

    commands
        .spawn((character_bundle(&config, Vec2::new(-2.0, 1.0)), KeyboardControlled))
        .with_child((
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.9),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(center.extend(1.0)),
        ));
}

// ---- Update ----

fn move_shuttles(time: Res<Time>, mut shuttles: Query<(&Shuttle, &mut Transform)>) {
    let t = time.elapsed_secs();
    for (shuttle, mut transform) in &mut shuttles {
        transform.translation.x = shuttle.origin.x + shuttle.amplitude * (t * shuttle.speed).sin();
    }
}

fn break_crates(mut commands: Commands, crates: Query<(Entity, &Breakable)>) {
    for (entity, breakable) in &crates {
        if breakable.health <= 0.0 {
            info!("Crate {:?} broke", entity);
            commands.entity(entity).despawn();
        }
    }
}

fn log_notifications(mut notifications: MessageReader<CharacterNotification>) {
    for n in notifications.read() {
        debug!("{:?}: {:?}", n.character, n.event);
    }
}
