//! Example component definitions for the engine.
//!
//! These demonstrate the shortest way to satisfy the [`Component`] contract:
//! keep the state in a serde struct and let
//! [`to_document`](engine_component::document::to_document) /
//! [`from_document`](engine_component::document::from_document) handle the
//! document layout.

use std::any::Any;

use engine_component::document::{from_document, to_document};
use engine_component::{
    Component, ComponentError, ComponentRegistry, Document, Inspector, RegistryError,
};
use serde::{Deserialize, Serialize};

/// A health component with current and maximum hit points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Create a new health component at full HP.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` if the entity is alive (HP > 0).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Component for Health {
    fn type_name(&self) -> &'static str {
        "Health"
    }

    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        doc.extend(to_document(self.type_name(), self)?);
        Ok(())
    }

    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        *self = from_document(self.type_name(), doc)?;
        Ok(())
    }

    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.heading(self.type_name());
        ui.edit_f32("current", &mut self.current);
        ui.edit_f32("max", &mut self.max);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A simple name tag component for debugging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_name(&self) -> &'static str {
        "Name"
    }

    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        doc.extend(to_document(self.type_name(), self)?);
        Ok(())
    }

    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        *self = from_document(self.type_name(), doc)?;
        Ok(())
    }

    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.heading(self.type_name());
        ui.edit_text("value", &mut self.value);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A simple mesh reference component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshRef {
    /// Path or identifier of the mesh asset.
    pub asset_path: String,
}

impl MeshRef {
    /// Create a new mesh reference.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            asset_path: path.into(),
        }
    }
}

impl Component for MeshRef {
    fn type_name(&self) -> &'static str {
        "MeshRef"
    }

    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        doc.extend(to_document(self.type_name(), self)?);
        Ok(())
    }

    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        *self = from_document(self.type_name(), doc)?;
        Ok(())
    }

    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.heading(self.type_name());
        ui.edit_text("asset_path", &mut self.asset_path);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Register the variants of this crate.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateRegistration`] if another variant already
/// claimed one of the names.
pub fn register_all(registry: &mut ComponentRegistry) -> Result<(), RegistryError> {
    registry.register_type::<Health>()?;
    registry.register_type::<Name>()?;
    registry.register_type::<MeshRef>()?;
    Ok(())
}
