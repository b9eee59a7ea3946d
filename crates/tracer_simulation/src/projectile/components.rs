//! Projectile components — кинематика пули + цели для collision probe
//!
//! Flow одного тика (`Projectile::update`):
//! 1. Base bookkeeping (age)
//! 2. previous_position := position
//! 3. Euler step: position += direction * speed * delta
//! 4. Collision phase → `ProjectileEvent::Collided` (destruction в этом тике пропускается)
//! 5. Destruction phase → `ProjectileEvent::Destroyed`

use bevy::prelude::*;

use super::config::{ProjectileConfig, GROUND_LEVEL};
use super::events::ProjectileEvent;
use super::probe::{cast_segment, CollisionTarget, Intersection};
use super::state::{ProjectileState, ProjectileTransition};

/// Пуля (single projectile entity)
///
/// Не удаляет себя сама: owner смотрит на возвращённый `ProjectileEvent`
/// (или ECS events) и решает, когда despawn.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    position: Vec3,
    previous_position: Vec3,
    origin_position: Vec3,
    direction: Vec3,
    speed: f32,
    max_travel_distance: f32,
    damage: u32,
    state: ProjectileState,
    /// Сколько секунд пуля тикается (base bookkeeping)
    age: f32,
}

impl Projectile {
    /// Пуля с дефолтными параметрами (`ProjectileConfig::default()`)
    ///
    /// `direction` нормализуется: длина вектора не влияет на скорость,
    /// пуля всегда летит со `speed` единиц/сек. Нулевой вектор → пуля стоит.
    pub fn new(spawn_position: Vec3, direction: Vec3) -> Self {
        Self::with_config(spawn_position, direction, &ProjectileConfig::default())
    }

    /// То же, что `new`, с явными параметрами (direction тоже нормализуется)
    pub fn with_config(spawn_position: Vec3, direction: Vec3, config: &ProjectileConfig) -> Self {
        Self {
            position: spawn_position,
            previous_position: spawn_position,
            origin_position: spawn_position,
            // Нулевое направление остаётся нулевым: пуля стоит на месте
            direction: direction.normalize_or_zero(),
            speed: config.speed,
            max_travel_distance: config.max_travel_distance,
            damage: config.damage,
            state: ProjectileState::Alive,
            age: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    pub fn origin_position(&self) -> Vec3 {
        self.origin_position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn max_travel_distance(&self) -> f32 {
        self.max_travel_distance
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn has_collided(&self) -> bool {
        self.state.has_collided()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_destroyed()
    }

    /// Дистанция от точки spawn (не сбрасывается)
    pub fn distance_traveled(&self) -> f32 {
        self.origin_position.distance(self.position)
    }

    /// Ray cast за последний тик: previous_position → position
    ///
    /// Fast path: нет движения или нет целей → пустой результат без cast.
    pub fn query_intersections(
        &self,
        targets: &[CollisionTarget],
        recursive: bool,
    ) -> Vec<Intersection> {
        if self.previous_position == self.position || targets.is_empty() {
            return Vec::new();
        }

        let far = self.previous_position.distance(self.position);
        cast_segment(self.previous_position, self.direction, far, targets, recursive)
    }

    /// Один тик симуляции
    ///
    /// `targets` — snapshot целей на этот тик (пустой = collision отключён,
    /// destruction check продолжает работать).
    pub fn update(&mut self, delta: f32, targets: &[CollisionTarget]) -> ProjectileEvent {
        debug_assert!(delta.is_finite(), "projectile delta must be finite: {}", delta);

        self.tick_base(delta);

        self.previous_position = self.position;
        self.position += self.direction * self.speed * delta;

        if !targets.is_empty() && self.state.can_collide() {
            let intersections = self.query_intersections(targets, true);
            if !intersections.is_empty() {
                self.state = self.state.transition(ProjectileTransition::Collide);
                // Destruction check в тике попадания пропускается
                return ProjectileEvent::Collided(intersections);
            }
        }

        if !self.state.is_destroyed() && self.should_destroy() {
            self.state = self.state.transition(ProjectileTransition::Destroy);
            return ProjectileEvent::Destroyed;
        }

        ProjectileEvent::None
    }

    fn tick_base(&mut self, delta: f32) {
        self.age += delta;
    }

    /// Ниже ground plane или вылетела за max_travel_distance
    fn should_destroy(&self) -> bool {
        self.position.y < GROUND_LEVEL || self.distance_traveled() >= self.max_travel_distance
    }
}

/// Handles целей, которые owner назначил пуле
///
/// Snapshot'ится в `CollisionTarget` перед каждым тиком.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CollidableTargets {
    pub targets: Vec<Entity>,
}

impl CollidableTargets {
    pub fn new(targets: Vec<Entity>) -> Self {
        Self { targets }
    }

    /// Заменить список целей (действует со следующего тика)
    pub fn set(&mut self, targets: impl IntoIterator<Item = Entity>) -> &mut Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Кто выстрелил (damage attribution + защита от self-hit)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ProjectileOwner(pub Entity);
