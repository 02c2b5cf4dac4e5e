//! 2D position component.

use std::any::Any;

use engine_component::document::{read_field, write_field, write_type};
use engine_component::{Component, ComponentError, Document, Inspector};
use glam::Vec2;

/// A point in 2D world space.
///
/// Serialised as `{ "type": "Position", "x": <f32>, "y": <f32> }`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// The type identifier written into documents.
    pub const TYPE_NAME: &'static str = "Position";

    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The position as a vector.
    #[must_use]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.x += offset.x;
        self.y += offset.y;
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }
}

impl Component for Position {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        write_type(doc, Self::TYPE_NAME);
        write_field(doc, Self::TYPE_NAME, "x", &self.x)?;
        write_field(doc, Self::TYPE_NAME, "y", &self.y)
    }

    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        let x = read_field(doc, Self::TYPE_NAME, "x")?;
        let y = read_field(doc, Self::TYPE_NAME, "y")?;
        *self = Self { x, y };
        Ok(())
    }

    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.heading(Self::TYPE_NAME);
        ui.edit_f32("x", &mut self.x);
        ui.edit_f32("y", &mut self.y);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
