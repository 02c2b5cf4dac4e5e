//! Movement system — integrates [`Velocity`] into [`Position`].

use engine_component::{Entity, System};

use crate::{Position, Velocity};

/// Moves every entity that has both a [`Position`] and a [`Velocity`].
#[derive(Debug, Default)]
pub struct Movement {
    moved: u64,
}

impl Movement {
    /// Create a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entity moves applied so far.
    #[must_use]
    pub fn moved(&self) -> u64 {
        self.moved
    }
}

impl System for Movement {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(&mut self, entities: &mut [Entity], dt: f32) {
        for entity in entities {
            let Some(velocity) = entity.get::<Velocity>().copied() else {
                continue;
            };
            if let Some(position) = entity.get_mut::<Position>() {
                position.translate(velocity.linear * dt);
                self.moved += 1;
            }
        }
    }
}
