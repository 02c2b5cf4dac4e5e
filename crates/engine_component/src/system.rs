//! The single-hook [`System`] contract.
//!
//! A system is a unit of per-tick logic over a set of entities. Scheduling is
//! up to the caller; the only hook is [`System::update`].

use crate::entity::Entity;

/// Per-tick logic run over a set of entities.
pub trait System {
    /// A human-readable name used in logs.
    fn name(&self) -> &str;

    /// Advance by `dt` seconds.
    fn update(&mut self, entities: &mut [Entity], dt: f32);
}

/// Run `system` over `entities` for `ticks` fixed steps of `dt` seconds.
pub fn run_fixed<S: System + ?Sized>(system: &mut S, entities: &mut [Entity], ticks: u64, dt: f32) {
    for tick in 0..ticks {
        tracing::trace!(system = system.name(), tick, "update");
        system.update(entities, dt);
    }
}
