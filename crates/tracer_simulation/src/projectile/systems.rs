//! Projectile systems (owner layer, FixedUpdate)
//!
//! Порядок (ProjectileSystems, chained):
//! 1. Spawn — FireProjectile → entity с Projectile
//! 2. Advance — snapshot целей → Projectile::update → ProjectileCollided / ProjectileDestroyed
//! 3. Sync — Transform.translation = projectile.position
//! 4. Resolve — damage по ближайшей цели с Health, despawn завершённых пуль

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use super::components::{CollidableTargets, Projectile, ProjectileOwner};
use super::config::ProjectileConfig;
use super::events::{
    FireProjectile, ProjectileCollided, ProjectileDestroyed, ProjectileEvent, ProjectileHit,
};
use super::probe::CollisionTarget;
use crate::components::Health;

/// Subdivisions для shape без точного scaled варианта (ball при неравномерном scale)
const COLLIDER_SCALE_SUBDIVISIONS: u32 = 10;

/// Геометрия целей: world pose + optional shape + дети
pub type TargetShapeQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static GlobalTransform,
        Option<&'static Collider>,
        Option<&'static Children>,
    ),
>;

/// System: spawn пуль по FireProjectile
///
/// Shooter исключается из целей сразу (пуля стартует внутри его коллайдера).
pub fn spawn_fired_projectiles(
    mut commands: Commands,
    mut fire_events: EventReader<FireProjectile>,
    default_config: Res<ProjectileConfig>,
) {
    for fire in fire_events.read() {
        let config = fire.config.unwrap_or(*default_config);
        let projectile = Projectile::with_config(fire.position, fire.direction, &config);

        let targets: Vec<Entity> = fire
            .targets
            .iter()
            .copied()
            .filter(|target| Some(*target) != fire.shooter)
            .collect();
        let target_count = targets.len();

        let mut entity = commands.spawn((
            projectile,
            Transform::from_translation(fire.position),
            CollidableTargets::new(targets),
        ));
        if let Some(shooter) = fire.shooter {
            entity.insert(ProjectileOwner(shooter));
        }

        crate::log(&format!(
            "Projectile fired: {:?} shooter={:?} pos={:?} dir={:?} speed={} targets={}",
            entity.id(),
            fire.shooter,
            fire.position,
            fire.direction,
            config.speed,
            target_count
        ));
    }
}

/// System: один тик всех пуль
///
/// Handles целей превращаются в `CollisionTarget` snapshot до вызова update,
/// поэтому пуля видит неизменный список в течение тика.
pub fn advance_projectiles(
    mut projectiles: Query<(Entity, &mut Projectile, Option<&CollidableTargets>)>,
    shapes: TargetShapeQuery,
    time: Res<Time<Fixed>>,
    mut collided_events: EventWriter<ProjectileCollided>,
    mut destroyed_events: EventWriter<ProjectileDestroyed>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, targets) in projectiles.iter_mut() {
        // После попадания cast не нужен, snapshot не строим
        let snapshot = match targets {
            Some(targets) if !targets.is_empty() && projectile.state().can_collide() => {
                snapshot_targets(&targets.targets, &shapes)
            }
            _ => Vec::new(),
        };

        match projectile.update(delta, &snapshot) {
            ProjectileEvent::None => {}
            ProjectileEvent::Collided(intersections) => {
                crate::log(&format!(
                    "🎯 Projectile {:?} collided: {} intersection(s), nearest {:?}",
                    entity,
                    intersections.len(),
                    intersections.first().map(|hit| hit.target)
                ));
                collided_events.write(ProjectileCollided {
                    projectile: entity,
                    intersections,
                });
            }
            ProjectileEvent::Destroyed => {
                crate::log(&format!(
                    "💨 Projectile {:?} destroyed at {:?} (traveled {:.1})",
                    entity,
                    projectile.position(),
                    projectile.distance_traveled()
                ));
                destroyed_events.write(ProjectileDestroyed { projectile: entity });
            }
        }
    }
}

/// Handles → world-space snapshot (recursive по Children)
pub fn snapshot_targets(handles: &[Entity], shapes: &TargetShapeQuery) -> Vec<CollisionTarget> {
    handles
        .iter()
        .filter_map(|&handle| snapshot_target(handle, shapes))
        .collect()
}

fn snapshot_target(entity: Entity, shapes: &TargetShapeQuery) -> Option<CollisionTarget> {
    let Ok((global_transform, collider, children)) = shapes.get(entity) else {
        crate::log_warning(&format!(
            "⚠️ Projectile target {:?} not found (despawned or no GlobalTransform)",
            entity
        ));
        return None;
    };

    let (scale, rotation, translation) = global_transform.to_scale_rotation_translation();

    // Collider задан в local space: world размер = shape × scale (включая scale parent'ов)
    let collider = collider.map(|collider| {
        let mut scaled = collider.clone();
        scaled.set_scale(scale, COLLIDER_SCALE_SUBDIVISIONS);
        scaled
    });

    let children = children
        .map(|children| {
            children
                .to_vec()
                .into_iter()
                .filter_map(|child| snapshot_target(child, shapes))
                .collect()
        })
        .unwrap_or_default();

    Some(CollisionTarget {
        entity,
        translation,
        rotation,
        collider,
        children,
    })
}

/// System: Transform следует за projectile.position (для рендера / hierarchy)
pub fn sync_projectile_transforms(
    mut projectiles: Query<(&Projectile, &mut Transform), Changed<Projectile>>,
) {
    for (projectile, mut transform) in projectiles.iter_mut() {
        transform.translation = projectile.position();
    }
}

/// System: ProjectileCollided → урон ближайшей цели с Health
///
/// Пересечение может прийтись на child (hitbox part), урон получает
/// ближайший ancestor с Health. Shooter урон от своей пули не получает.
pub fn apply_projectile_damage(
    mut collided_events: EventReader<ProjectileCollided>,
    projectiles: Query<(&Projectile, Option<&ProjectileOwner>)>,
    parents: Query<&ChildOf>,
    mut targets: Query<&mut Health>,
    mut hit_events: EventWriter<ProjectileHit>,
) {
    for event in collided_events.read() {
        let Ok((projectile, owner)) = projectiles.get(event.projectile) else {
            crate::log_warning(&format!(
                "⚠️ ProjectileCollided for missing projectile {:?}",
                event.projectile
            ));
            continue;
        };
        let shooter = owner.map(|owner| owner.0);

        let receiver = event.intersections.iter().find_map(|hit| {
            let receiver = find_health_receiver(hit.target, &parents, &targets)?;
            (Some(receiver) != shooter).then_some((receiver, hit.point))
        });

        let Some((target, impact_point)) = receiver else {
            crate::log(&format!(
                "Projectile {:?} hit scenery (no Health among intersections)",
                event.projectile
            ));
            continue;
        };

        let Ok(mut health) = targets.get_mut(target) else {
            continue;
        };

        let applied = health.take_damage(projectile.damage());

        hit_events.write(ProjectileHit {
            projectile: event.projectile,
            shooter,
            target,
            damage: applied,
            impact_point,
        });

        crate::log_info(&format!(
            "💥 Projectile {:?} hit {:?} for {} damage (HP: {} → {})",
            event.projectile,
            target,
            applied,
            health.current + applied,
            health.current
        ));
    }
}

/// Идём вверх по ChildOf, пока не найдём entity с Health
fn find_health_receiver(
    entity: Entity,
    parents: &Query<&ChildOf>,
    health: &Query<&mut Health>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if health.contains(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.parent();
    }
}

/// System: owner убирает пули после collided / destroyed
pub fn despawn_finished_projectiles(
    mut commands: Commands,
    mut collided_events: EventReader<ProjectileCollided>,
    mut destroyed_events: EventReader<ProjectileDestroyed>,
) {
    let collided = collided_events.read().map(|event| event.projectile);
    let destroyed = destroyed_events.read().map(|event| event.projectile);

    for projectile in collided.chain(destroyed) {
        commands.entity(projectile).despawn();
    }
}
