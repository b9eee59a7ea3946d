//! Projectile tuning (дефолты пули)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Высота ground plane: пуля ниже неё уничтожается
pub const GROUND_LEVEL: f32 = 0.0;

/// Параметры пули, фиксируются в момент spawn
///
/// Как Resource задаёт дефолт для `FireProjectile` без override.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct ProjectileConfig {
    /// Максимальная дистанция от точки spawn (единицы мира)
    pub max_travel_distance: f32,
    /// Скорость (единиц/сек)
    pub speed: f32,
    /// Урон при попадании
    pub damage: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            max_travel_distance: 600.0,
            speed: 800.0,
            damage: 60,
        }
    }
}

impl ProjectileConfig {
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_max_travel_distance(mut self, distance: f32) -> Self {
        self.max_travel_distance = distance;
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_config_default() {
        let config = ProjectileConfig::default();
        assert_eq!(config.max_travel_distance, 600.0);
        assert_eq!(config.speed, 800.0);
        assert_eq!(config.damage, 60);
    }

    #[test]
    fn test_projectile_config_overrides() {
        let config = ProjectileConfig::default()
            .with_speed(30.0)
            .with_max_travel_distance(50.0)
            .with_damage(15);

        assert_eq!(config.speed, 30.0);
        assert_eq!(config.max_travel_distance, 50.0);
        assert_eq!(config.damage, 15);
    }
}
