//! Headless симуляция TRACER
//!
//! Турель в центре стреляет залпами (seeded spread) по кольцу мишеней.
//! Печатает, сколько пуль попало, сколько улетело и сколько HP осталось.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::Collider;
use tracer_simulation::*;

const TARGET_COUNT: usize = 8;
const RING_RADIUS: f32 = 120.0;
const VOLLEY_EVERY_TICKS: usize = 30;
const TICKS: usize = 600;

#[derive(Resource, Default)]
struct Tally {
    hits: usize,
    destroyed: usize,
}

fn main() {
    let seed = 42;
    println!("Starting TRACER headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .init_resource::<Tally>()
        .add_systems(Update, count_outcomes);

    let turret = app.world_mut().spawn(Transform::from_xyz(0.0, 1.5, 0.0)).id();
    let targets = spawn_target_ring(app.world_mut());

    // Один update до стрельбы: GlobalTransform мишеней должен быть посчитан
    app.update();

    for tick in 0..TICKS {
        if tick % VOLLEY_EVERY_TICKS == 0 {
            fire_volley(app.world_mut(), turret, &targets);
        }

        app.update();

        if tick % 100 == 0 {
            let tally = app.world().resource::<Tally>();
            println!(
                "Tick {}: {} hits, {} expired",
                tick, tally.hits, tally.destroyed
            );
        }
    }

    let world = app.world_mut();
    let mut health = world.query::<(Entity, &Health)>();
    for (entity, health) in health.iter(world) {
        println!("Target {:?}: {}/{} HP", entity, health.current, health.max);
    }

    println!("Simulation complete!");
}

/// Мишени по кругу: тело (Health) + голова (child hitbox)
fn spawn_target_ring(world: &mut World) -> Vec<Entity> {
    (0..TARGET_COUNT)
        .map(|i| {
            let angle = i as f32 / TARGET_COUNT as f32 * std::f32::consts::TAU;
            let position = Vec3::new(angle.cos() * RING_RADIUS, 1.0, angle.sin() * RING_RADIUS);

            world
                .spawn((
                    Transform::from_translation(position),
                    Collider::cuboid(0.5, 1.0, 0.5),
                    Health::new(300),
                ))
                .with_children(|parent| {
                    parent.spawn((Transform::from_xyz(0.0, 1.3, 0.0), Collider::ball(0.3)));
                })
                .id()
        })
        .collect()
}

/// Залп: по пуле в каждую мишень с разбросом
fn fire_volley(world: &mut World, turret: Entity, targets: &[Entity]) {
    let origin = Vec3::new(0.0, 1.5, 0.0);

    let aims: Vec<Vec3> = targets
        .iter()
        .filter_map(|&target| world.get::<GlobalTransform>(target))
        .map(|transform| (transform.translation() - origin).normalize_or_zero())
        .collect();

    for aim in aims {
        let direction = world
            .resource_mut::<DeterministicRng>()
            .spread_direction(aim, 0.01);

        world.send_event(FireProjectile {
            shooter: Some(turret),
            position: origin,
            direction,
            targets: targets.to_vec(),
            config: None,
        });
    }
}

fn count_outcomes(
    mut tally: ResMut<Tally>,
    mut hits: EventReader<ProjectileHit>,
    mut destroyed: EventReader<ProjectileDestroyed>,
) {
    tally.hits += hits.read().count();
    tally.destroyed += destroyed.read().count();
}
