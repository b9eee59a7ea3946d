//! Lifecycle пули: Alive → Collided → Destroyed

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояние пули (односторонний FSM)
///
/// Переходы только через `transition`:
/// - Alive → Collided (попадание)
/// - Alive → Destroyed (ниже земли / дистанция)
/// - Collided → Destroyed (после попадания пуля продолжает лететь)
///
/// Destroyed — терминальное, обратных переходов нет.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Летит, обе проверки активны
    #[default]
    Alive,

    /// Было попадание: ray cast больше не выполняется, destruction check остаётся
    Collided,

    /// Терминальное состояние (owner должен убрать entity)
    Destroyed {
        /// Было ли попадание до уничтожения
        after_collision: bool,
    },
}

/// Событие, которое двигает FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileTransition {
    Collide,
    Destroy,
}

impl ProjectileState {
    /// Единственная функция перехода
    ///
    /// Недопустимый переход (повторный Collide, что угодно из Destroyed)
    /// возвращает текущее состояние без изменений.
    pub fn transition(self, transition: ProjectileTransition) -> Self {
        match (self, transition) {
            (Self::Alive, ProjectileTransition::Collide) => Self::Collided,
            (Self::Alive, ProjectileTransition::Destroy) => Self::Destroyed {
                after_collision: false,
            },
            (Self::Collided, ProjectileTransition::Destroy) => Self::Destroyed {
                after_collision: true,
            },
            (state, _) => state,
        }
    }

    pub fn has_collided(&self) -> bool {
        matches!(
            self,
            Self::Collided
                | Self::Destroyed {
                    after_collision: true
                }
        )
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed { .. })
    }

    /// Нужен ли ray cast в этом тике
    pub fn can_collide(&self) -> bool {
        matches!(self, Self::Alive)
    }
}
