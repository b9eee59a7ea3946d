//! Projectile domain — полёт пули, segment cast, lifecycle
//!
//! Содержит:
//! - Projectile (кинематика + FSM, один тик = `update`)
//! - probe (ray cast previous_position → position по snapshot целей)
//! - ProjectileState (Alive → Collided → Destroyed)
//! - ProjectilePlugin (owner layer: spawn, advance, damage, despawn)
//!
//! Пуля только сообщает о событиях; урон и despawn — ответственность owner систем.

use bevy::prelude::*;

pub mod components;
pub mod config;
pub mod events;
pub mod probe;
pub mod state;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod components_tests;

pub use components::{CollidableTargets, Projectile, ProjectileOwner};
pub use config::{ProjectileConfig, GROUND_LEVEL};
pub use events::{
    FireProjectile, ProjectileCollided, ProjectileDestroyed, ProjectileEvent, ProjectileHit,
};
pub use probe::{cast_segment, CollisionTarget, Intersection};
pub use state::{ProjectileState, ProjectileTransition};

/// Фазы тика пуль (FixedUpdate)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectileSystems {
    Spawn,
    Advance,
    Sync,
    Resolve,
}

/// Projectile Plugin
///
/// Регистрирует events и системы в FixedUpdate:
/// 1. spawn_fired_projectiles — FireProjectile → Projectile entity
/// 2. advance_projectiles — движение + collision/destruction
/// 3. sync_projectile_transforms — Transform для рендера
/// 4. apply_projectile_damage → despawn_finished_projectiles
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProjectileConfig>()
            .register_type::<Projectile>()
            .register_type::<CollidableTargets>()
            .register_type::<ProjectileOwner>()
            .register_type::<ProjectileConfig>();

        app.add_event::<FireProjectile>()
            .add_event::<ProjectileCollided>()
            .add_event::<ProjectileDestroyed>()
            .add_event::<ProjectileHit>();

        app.configure_sets(
            FixedUpdate,
            (
                ProjectileSystems::Spawn,
                ProjectileSystems::Advance,
                ProjectileSystems::Sync,
                ProjectileSystems::Resolve,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::spawn_fired_projectiles.in_set(ProjectileSystems::Spawn),
                systems::advance_projectiles.in_set(ProjectileSystems::Advance),
                systems::sync_projectile_transforms.in_set(ProjectileSystems::Sync),
                (
                    systems::apply_projectile_damage,
                    systems::despawn_finished_projectiles,
                )
                    .chain()
                    .in_set(ProjectileSystems::Resolve),
            ),
        );
    }
}
