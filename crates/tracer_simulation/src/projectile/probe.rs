//! Segment cast probe — "прошла ли пуля через цель за этот тик"
//!
//! Архитектура:
//! - Цели = snapshot `CollisionTarget` (entity + world pose + rapier Collider)
//! - Ray из previous_position вдоль direction, far = пройденная за тик дистанция
//! - Тонкие коллайдеры не пропускаются при высокой скорости (нет tunneling)
//!
//! Snapshot строится owner'ом до тика, поэтому probe не зависит от ECS
//! и не видит изменений списка целей посреди вычисления.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

/// Цель для ray cast (handle + геометрия в world space)
///
/// `collider: None` — группа без собственной геометрии,
/// проверяются только `children` (при recursive = true).
#[derive(Debug, Clone)]
pub struct CollisionTarget {
    pub entity: Entity,
    pub translation: Vec3,
    pub rotation: Quat,
    pub collider: Option<Collider>,
    pub children: Vec<CollisionTarget>,
}

impl CollisionTarget {
    /// Цель с собственной геометрией
    pub fn shape(entity: Entity, translation: Vec3, collider: Collider) -> Self {
        Self {
            entity,
            translation,
            rotation: Quat::IDENTITY,
            collider: Some(collider),
            children: Vec::new(),
        }
    }

    /// Группа (только дочерние цели)
    pub fn group(entity: Entity, translation: Vec3) -> Self {
        Self {
            entity,
            translation,
            rotation: Quat::IDENTITY,
            collider: None,
            children: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Дочерняя цель (pose уже в world space)
    pub fn with_child(mut self, child: CollisionTarget) -> Self {
        self.children.push(child);
        self
    }
}

/// Пересечение луча с целью
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Entity, чья геометрия пересечена (может быть child исходного handle)
    pub target: Entity,
    /// Точка попадания (world space)
    pub point: Vec3,
    /// Дистанция от origin вдоль луча
    pub distance: f32,
}

/// Ray cast по списку целей
///
/// `direction` должен быть единичным: дистанция = time of impact.
/// Результат отсортирован по возрастанию дистанции (stable sort:
/// при равенстве порядок обхода — цели по порядку, parent раньше children).
/// Если в `targets` есть и handle, и его потомок, потомок попадёт в результат дважды.
pub fn cast_segment(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    targets: &[CollisionTarget],
    recursive: bool,
) -> Vec<Intersection> {
    if targets.is_empty() || direction == Vec3::ZERO || max_distance <= 0.0 {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for target in targets {
        collect_hits(target, origin, direction, max_distance, recursive, &mut hits);
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn collect_hits(
    target: &CollisionTarget,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    recursive: bool,
    hits: &mut Vec<Intersection>,
) {
    if let Some(collider) = &target.collider {
        // solid = true: старт внутри цели → попадание на дистанции 0
        if let Some(distance) = collider.cast_ray(
            target.translation,
            target.rotation,
            origin,
            direction,
            max_distance,
            true,
        ) {
            hits.push(Intersection {
                target: target.entity,
                point: origin + direction * distance,
                distance,
            });
        }
    }

    if recursive {
        for child in &target.children {
            collect_hits(child, origin, direction, max_distance, recursive, hits);
        }
    }
}
