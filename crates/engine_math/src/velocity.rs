//! 2D velocity component.

use std::any::Any;

use engine_component::document::{from_document, to_document};
use engine_component::{Component, ComponentError, Document, Inspector};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A 2D velocity in world units per second.
///
/// Serialised as `{ "type": "Velocity", "linear": [<f32>, <f32>] }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Linear velocity.
    pub linear: Vec2,
}

impl Velocity {
    /// The type identifier written into documents.
    pub const TYPE_NAME: &'static str = "Velocity";

    /// Zero velocity.
    pub const ZERO: Self = Self { linear: Vec2::ZERO };

    /// Create a new velocity.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            linear: Vec2::new(x, y),
        }
    }

    /// Speed (magnitude of the linear velocity).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.linear.length()
    }
}

impl Component for Velocity {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        doc.extend(to_document(Self::TYPE_NAME, self)?);
        Ok(())
    }

    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        *self = from_document(Self::TYPE_NAME, doc)?;
        Ok(())
    }

    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.heading(Self::TYPE_NAME);
        ui.edit_f32("x", &mut self.linear.x);
        ui.edit_f32("y", &mut self.linear.y);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
