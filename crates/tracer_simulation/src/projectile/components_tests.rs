//! Tests for Projectile tick logic.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_rapier3d::prelude::Collider;

    use crate::projectile::{
        CollisionTarget, Projectile, ProjectileConfig, ProjectileEvent, ProjectileState,
    };

    const DT: f32 = 1.0 / 60.0;

    fn ball(id: u32, at: Vec3, radius: f32) -> CollisionTarget {
        CollisionTarget::shape(Entity::from_raw(id), at, Collider::ball(radius))
    }

    #[test]
    fn test_projectile_construction() {
        let spawn = Vec3::new(1.0, 2.0, 3.0);
        let projectile = Projectile::new(spawn, Vec3::new(0.0, 0.0, 2.0));

        assert_eq!(projectile.position(), spawn);
        assert_eq!(projectile.previous_position(), spawn);
        assert_eq!(projectile.origin_position(), spawn);
        assert_eq!(projectile.direction(), Vec3::Z);
        assert_eq!(projectile.speed(), 800.0);
        assert_eq!(projectile.max_travel_distance(), 600.0);
        assert_eq!(projectile.damage(), 60);
        assert_eq!(projectile.state(), ProjectileState::Alive);
        assert_eq!(projectile.age(), 0.0);
    }

    #[test]
    fn test_no_intersections_before_motion() {
        let projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        // Цель прямо в точке spawn
        let targets = [ball(1, Vec3::new(0.0, 1.0, 0.0), 2.0)];

        assert!(projectile.query_intersections(&targets, true).is_empty());
    }

    #[test]
    fn test_zero_delta_skips_query() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        let targets = [ball(1, Vec3::new(0.0, 1.0, 0.0), 2.0)];

        let event = projectile.update(0.0, &targets);

        assert_eq!(event, ProjectileEvent::None);
        assert_eq!(projectile.previous_position(), projectile.position());
        assert!(projectile.query_intersections(&targets, true).is_empty());
        assert!(!projectile.has_collided());
    }

    #[test]
    fn test_motion_integration_is_exact() {
        let origin = Vec3::new(0.0, 5.0, 0.0);
        let direction = Vec3::new(1.0, 0.0, 1.0).normalize();
        let mut projectile = Projectile::new(origin, direction);

        const TICKS: usize = 30; // 400 units < 600
        for _ in 0..TICKS {
            assert_eq!(projectile.update(DT, &[]), ProjectileEvent::None);
        }

        let expected = origin + direction * 800.0 * DT * TICKS as f32;
        assert!(
            projectile.position().distance(expected) < 1e-2,
            "position {:?} != expected {:?}",
            projectile.position(),
            expected
        );
        assert!((projectile.age() - DT * TICKS as f32).abs() < 1e-4);
    }

    #[test]
    fn test_direction_length_does_not_change_speed() {
        let origin = Vec3::new(0.0, 5.0, 0.0);
        let mut unit = Projectile::new(origin, Vec3::X);
        let mut long = Projectile::new(origin, Vec3::X * 10.0);

        for _ in 0..10 {
            unit.update(DT, &[]);
            long.update(DT, &[]);
        }

        // Формула N тиков выполняется для нормализованного direction
        let expected = origin + long.direction() * 800.0 * DT * 10.0;
        assert_eq!(long.direction(), Vec3::X);
        assert!(long.position().distance(expected) < 1e-2);
        assert!(long.position().distance(unit.position()) < 1e-4);
    }

    #[test]
    fn test_previous_position_tracks_tick_start() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);

        projectile.update(DT, &[]);
        let after_first = projectile.position();

        projectile.update(DT, &[]);
        assert_eq!(projectile.previous_position(), after_first);
        assert_ne!(projectile.previous_position(), projectile.position());
    }

    #[test]
    fn test_destroyed_below_ground_once() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);

        let destroyed_count = (0..10)
            .map(|_| projectile.update(DT, &[]))
            .filter(|event| *event == ProjectileEvent::Destroyed)
            .count();

        assert_eq!(destroyed_count, 1);
        assert!(projectile.is_destroyed());
        assert!(projectile.position().y < 0.0);
    }

    #[test]
    fn test_destroyed_by_travel_distance_once() {
        let mut projectile = Projectile::new(Vec3::ZERO, Vec3::X);

        let mut destroyed_count = 0;
        for _ in 0..100 {
            let traveled_before = projectile.distance_traveled();
            if projectile.update(DT, &[]) == ProjectileEvent::Destroyed {
                destroyed_count += 1;
                assert!(traveled_before < 600.0);
                assert!(projectile.distance_traveled() >= 600.0);
            }
        }

        assert_eq!(destroyed_count, 1);
    }

    #[test]
    fn test_empty_targets_never_collide() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);

        for _ in 0..100 {
            let event = projectile.update(DT, &[]);
            assert!(!matches!(event, ProjectileEvent::Collided(_)));
        }
        assert!(!projectile.has_collided());
    }

    #[test]
    fn test_segment_catches_thin_target_between_ticks() {
        // 13.3 units за тик, цель толщиной 0.2 посередине шага
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        let wall = CollisionTarget::shape(
            Entity::from_raw(7),
            Vec3::new(6.0, 1.0, 0.0),
            Collider::cuboid(0.1, 5.0, 5.0),
        );

        let ProjectileEvent::Collided(intersections) = projectile.update(DT, &[wall]) else {
            panic!("expected collision with thin wall");
        };

        assert_eq!(intersections[0].target, Entity::from_raw(7));
        assert!((intersections[0].distance - 5.9).abs() < 1e-3);
        assert!(projectile.has_collided());
    }

    #[test]
    fn test_collision_intersections_ordered() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        let targets = [
            ball(1, Vec3::new(9.0, 1.0, 0.0), 0.5),
            ball(2, Vec3::new(4.0, 1.0, 0.0), 0.5),
        ];

        let ProjectileEvent::Collided(intersections) = projectile.update(DT, &targets) else {
            panic!("expected collision");
        };

        assert_eq!(intersections.len(), 2);
        assert_eq!(intersections[0].target, Entity::from_raw(2));
        assert_eq!(intersections[1].target, Entity::from_raw(1));
        assert!(intersections[0].distance <= intersections[1].distance);
    }

    #[test]
    fn test_collision_suppresses_same_tick_destruction() {
        // Дистанция 10 < шаг 13.3: destruction сработал бы в первом же тике
        let config = ProjectileConfig::default().with_max_travel_distance(10.0);
        let mut projectile = Projectile::with_config(Vec3::new(0.0, 1.0, 0.0), Vec3::X, &config);
        let targets = [ball(1, Vec3::new(5.0, 1.0, 0.0), 1.0)];

        let event = projectile.update(DT, &targets);
        assert!(matches!(event, ProjectileEvent::Collided(_)));
        assert_eq!(projectile.state(), ProjectileState::Collided);
        assert!(!projectile.is_destroyed());

        // Следующий тик: collision больше нет, destruction check активен
        let event = projectile.update(DT, &targets);
        assert_eq!(event, ProjectileEvent::Destroyed);
        assert!(projectile.has_collided());
        assert!(projectile.is_destroyed());
    }

    #[test]
    fn test_collision_fires_only_once() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        // Длинная цель вдоль траектории: пересекается каждый тик
        let rail = CollisionTarget::shape(
            Entity::from_raw(1),
            Vec3::new(100.0, 1.0, 0.0),
            Collider::cuboid(100.0, 1.0, 1.0),
        );
        let targets = [rail];

        let collided_count = (0..20)
            .map(|_| projectile.update(DT, &targets))
            .filter(|event| matches!(event, ProjectileEvent::Collided(_)))
            .count();

        assert_eq!(collided_count, 1);
        assert!(projectile.has_collided());
    }

    #[test]
    fn test_destroyed_is_terminal_but_motion_continues() {
        let mut projectile = Projectile::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(projectile.update(DT, &[]), ProjectileEvent::Destroyed);

        let below = projectile.position();
        let targets = [ball(1, below + Vec3::NEG_Y * 5.0, 1.0)];

        // Ни collision, ни повторного destroy
        assert_eq!(projectile.update(DT, &targets), ProjectileEvent::None);
        assert!(!projectile.has_collided());
        assert!(projectile.position().y < below.y);
    }

    #[test]
    fn test_zero_direction_never_moves() {
        let spawn = Vec3::new(0.0, 1.0, 0.0);
        let mut projectile = Projectile::new(spawn, Vec3::ZERO);
        let targets = [ball(1, spawn, 2.0)];

        for _ in 0..10 {
            assert_eq!(projectile.update(DT, &targets), ProjectileEvent::None);
        }
        assert_eq!(projectile.position(), spawn);
    }
}
