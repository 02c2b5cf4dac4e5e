//! Core [`Component`] trait.
//!
//! Every component variant implements [`Component`]. The trait is object-safe
//! so an [`Entity`](crate::Entity) can hold heterogeneous variants behind
//! `Box<dyn Component>` and drive their persistence without knowing the
//! concrete types.
//!
//! ## Type Identity
//!
//! A variant's type identifier is the string returned by
//! [`Component::type_name`]. It is written into every component document under
//! the `type` key and is the lookup key of the
//! [`ComponentRegistry`](crate::ComponentRegistry). It must be stable across
//! save/load cycles and identical for every instance of the variant.

use std::any::Any;
use std::fmt::Debug;

use crate::document::{self, Document};
use crate::entity::EntityId;
use crate::error::ComponentError;
use crate::inspector::Inspector;

/// The component base contract.
///
/// Variants with state override [`serialize`](Component::serialize) and
/// [`deserialize`](Component::deserialize); the lifecycle and editor hooks are
/// optional.
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use engine_component::{document, Component, ComponentError, Document};
///
/// #[derive(Debug, Default)]
/// struct Health {
///     current: f32,
/// }
///
/// impl Component for Health {
///     fn type_name(&self) -> &'static str {
///         "Health"
///     }
///
///     fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
///         document::write_type(doc, self.type_name());
///         document::write_field(doc, self.type_name(), "current", &self.current)
///     }
///
///     fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
///         self.current = document::read_field(doc, self.type_name(), "current")?;
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
/// ```
pub trait Component: Any + Debug + Send + Sync {
    /// The runtime type identifier of this instance.
    fn type_name(&self) -> &'static str;

    /// Write this component's complete state, including its `type` tag, into
    /// `doc`.
    ///
    /// The default writes only the type tag, which is correct for stateless
    /// marker variants.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Encode`] if a field cannot be represented.
    fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
        document::write_type(doc, self.type_name());
        Ok(())
    }

    /// Replace this component's state with the fields of `doc`.
    ///
    /// Implementations read every field before assigning any of them, so a
    /// failure leaves `self` untouched.
    ///
    /// # Errors
    ///
    /// [`ComponentError::MissingField`] when an expected field is absent,
    /// [`ComponentError::InvalidField`] when a field has the wrong shape.
    fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
        let _ = doc;
        Ok(())
    }

    /// Present this component's fields through an editor surface.
    fn render_editor(&mut self, ui: &mut dyn Inspector) {
        let _ = ui;
    }

    /// Called when the component is attached to `owner`.
    fn init(&mut self, owner: EntityId) {
        let _ = owner;
    }

    /// Called when the component is detached from its entity or the entity is
    /// dropped.
    fn destroy(&mut self) {}

    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Component {
    /// Returns `true` if the concrete variant is `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow as the concrete variant `T`.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow as the concrete variant `T`.
    #[must_use]
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Serialise into a fresh component document.
    ///
    /// # Errors
    ///
    /// Propagates the variant's [`Component::serialize`] error.
    pub fn to_document(&self) -> Result<Document, ComponentError> {
        let mut doc = Document::new();
        self.serialize(&mut doc)?;
        Ok(doc)
    }
}
