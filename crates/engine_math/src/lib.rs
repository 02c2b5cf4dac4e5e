//! # engine_math
//!
//! Spatial component variants for the engine. Re-exports [`glam`] for linear
//! algebra and defines [`Position`], [`Velocity`], and the [`Movement`]
//! system that integrates one into the other.

pub mod movement;
pub mod position;
pub mod velocity;

use engine_component::{ComponentRegistry, RegistryError};

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use movement::Movement;
pub use position::Position;
pub use velocity::Velocity;

/// Register every component variant defined in this crate.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateRegistration`] if another variant already
/// claimed one of the names.
pub fn register_defaults(registry: &mut ComponentRegistry) -> Result<(), RegistryError> {
    registry.register_type::<Position>()?;
    registry.register_type::<Velocity>()?;
    Ok(())
}
