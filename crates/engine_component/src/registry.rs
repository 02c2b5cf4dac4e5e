//! Component type registry — maps a type identifier to a factory.
//!
//! The entity loader only sees the `type` string of each component document.
//! The registry turns that string into a blank instance of the right variant,
//! which then populates itself from the document. New variants become loadable
//! by registering a factory; neither the entity nor the registry changes.
//!
//! The registry is an ordinary value built once at startup by enumerating the
//! known variants. There is no process-global instance.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::component::Component;
use crate::error::RegistryError;

/// A zero-argument constructor for a default-initialised component.
pub type Factory = Box<dyn Fn() -> Box<dyn Component> + Send + Sync>;

struct Registration {
    /// Concrete Rust type produced by `factory`, used to tell an idempotent
    /// re-registration apart from a conflicting one.
    type_id: TypeId,
    factory: Factory,
}

/// Registry of all component variants that can be reconstructed from
/// documents.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registrations keyed by type identifier.
    entries: BTreeMap<String, Registration>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `factory` under `name`.
    ///
    /// Registering the same variant under the same name again is a no-op.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TypeNameMismatch`] if the factory builds components
    ///   whose [`Component::type_name`] is not `name`.
    /// - [`RegistryError::DuplicateRegistration`] if a different variant
    ///   already owns `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        let name = name.into();
        let sample = factory();
        if sample.type_name() != name {
            return Err(RegistryError::TypeNameMismatch {
                registered: name,
                produced: sample.type_name().to_string(),
            });
        }
        let type_id = sample.as_any().type_id();

        if let Some(existing) = self.entries.get(&name) {
            if existing.type_id == type_id {
                debug!(component = %name, "component type already registered");
                return Ok(());
            }
            return Err(RegistryError::DuplicateRegistration(name));
        }

        debug!(component = %name, "registered component type");
        self.entries.insert(
            name,
            Registration {
                type_id,
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Register `T` under the name its default instance reports.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentRegistry::register`].
    pub fn register_type<T>(&mut self) -> Result<(), RegistryError>
    where
        T: Component + Default,
    {
        let name = T::default().type_name();
        self.register(name, || Box::new(T::default()))
    }

    /// Register `factory` under `name`, replacing whatever was there.
    ///
    /// This is the last-registration-wins behaviour; no validation is done.
    /// Returns `true` if an existing registration was replaced.
    pub fn register_or_replace<F>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        let name = name.into();
        let type_id = factory().as_any().type_id();
        let replaced = self
            .entries
            .insert(
                name.clone(),
                Registration {
                    type_id,
                    factory: Box::new(factory),
                },
            )
            .is_some();
        if replaced {
            warn!(component = %name, "replaced existing component registration");
        }
        replaced
    }

    /// Construct a default-initialised instance of the variant registered
    /// under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] if nothing is registered under
    /// `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Component>, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))?;
        Ok((entry.factory)())
    }

    /// Returns `true` if a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns all registered type identifiers in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("types", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
