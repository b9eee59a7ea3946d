//! ECS Components мира вокруг пуль
//!
//! - health: получатель урона (Health)

pub mod health;

pub use health::*;
