//! TRACER Simulation Core
//!
//! Headless ECS-симуляция пуль на Bevy 0.16:
//! - projectile: полёт, segment cast, lifecycle (Alive → Collided → Destroyed)
//! - components: Health целей
//! - logger: глобальный sink для хоста
//!
//! Рендер, ассеты и scene management — снаружи (хост читает Transform/events).

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod logger;
pub mod projectile;

// Re-export для удобства
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use projectile::{
    CollidableTargets, CollisionTarget, FireProjectile, Intersection, Projectile, ProjectileCollided,
    ProjectileConfig, ProjectileDestroyed, ProjectileEvent, ProjectileHit, ProjectileOwner,
    ProjectilePlugin, ProjectileState, ProjectileSystems,
};

/// Частота simulation tick (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins(ProjectilePlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Направление с разбросом (weapon spread) внутри конуса `max_angle` радиан
    pub fn spread_direction(&mut self, forward: Vec3, max_angle: f32) -> Vec3 {
        let max_angle = max_angle.abs();
        let yaw = self.rng.gen_range(-max_angle..=max_angle);
        let pitch = self.rng.gen_range(-max_angle..=max_angle);

        (Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch) * forward).normalize_or_zero()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// TransformPlugin нужен для GlobalTransform целей (snapshot для probe).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, bevy::transform::TransformPlugin))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug format — простейшая сериализация
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
