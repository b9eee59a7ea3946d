//! Projectile events
//!
//! - `ProjectileEvent` — результат одного `Projectile::update` (typed return, без listeners)
//! - ECS events — то же самое для owner систем + входной `FireProjectile`

use bevy::prelude::*;

use super::config::ProjectileConfig;
use super::probe::Intersection;

/// Что произошло с пулей за тик
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProjectileEvent {
    /// Ничего (летит дальше)
    #[default]
    None,
    /// Попадание: пересечения отсортированы по дистанции
    Collided(Vec<Intersection>),
    /// Ниже земли или вылетела за дистанцию
    Destroyed,
}

/// Event: запрос выстрела (owner → projectile plugin)
#[derive(Event, Debug, Clone)]
pub struct FireProjectile {
    /// Кто стреляет (None = environment / turret без entity)
    pub shooter: Option<Entity>,
    /// Точка spawn (world space)
    pub position: Vec3,
    /// Направление; нормализуется при spawn, длина не влияет на скорость
    pub direction: Vec3,
    /// Цели для collision probe
    pub targets: Vec<Entity>,
    /// Override параметров (None = `ProjectileConfig` resource)
    pub config: Option<ProjectileConfig>,
}

/// Event: пуля пересекла цели за тик
#[derive(Event, Debug, Clone)]
pub struct ProjectileCollided {
    pub projectile: Entity,
    pub intersections: Vec<Intersection>,
}

/// Event: пуля уничтожена (ниже земли / дистанция)
#[derive(Event, Debug, Clone)]
pub struct ProjectileDestroyed {
    pub projectile: Entity,
}

/// Event: урон от пули применён к цели
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    /// Entity с Health (handle или его ancestor)
    pub target: Entity,
    pub damage: u32,
    pub impact_point: Vec3,
}
