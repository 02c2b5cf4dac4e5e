//! Entity identifiers, allocation, and the [`Entity`] aggregate.
//!
//! An [`Entity`] exclusively owns an ordered sequence of boxed components.
//! Attachment order is serialisation order. Components are freed exactly once:
//! either when handed back by [`Entity::remove_component`] and dropped by the
//! caller, or when the entity itself is dropped.

use std::fmt;

use tracing::{debug, info, warn};

use crate::component::Component;
use crate::document::{self, EntityDocument};
use crate::error::{ComponentError, EntityError};
use crate::inspector::Inspector;
use crate::registry::ComponentRegistry;

/// A unique entity identifier.
///
/// Identifiers are handed out by an [`EntityAllocator`], which guarantees they
/// are unique among the entities it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / invalid entity sentinel.
    pub const INVALID: EntityId = EntityId(0);

    /// Create an entity id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. Ids start at 1 (0 is reserved for
    /// [`EntityId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Allocates a fresh id and wraps it in an empty [`Entity`].
    pub fn spawn(&mut self) -> Entity {
        Entity::new(self.allocate())
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity handle for a component attached to an [`Entity`].
///
/// Keys are never reused within one entity, so a stale key cannot address a
/// different component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(u32);

/// A component document that was skipped during loading because its type is
/// not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComponent {
    /// Position of the document in the `components` sequence.
    pub index: usize,
    /// The unknown type identifier.
    pub type_name: String,
}

/// Outcome of a successful [`Entity::deserialize`].
///
/// A load that dropped components is distinguishable from a complete one via
/// [`LoadReport::is_complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of components reconstructed and attached.
    pub loaded: usize,
    /// Component documents dropped because their type is unknown.
    pub skipped: Vec<SkippedComponent>,
}

impl LoadReport {
    /// Returns `true` if no component was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of skipped component documents.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug)]
struct Slot {
    key: ComponentKey,
    component: Box<dyn Component>,
}

/// An entity: an id plus an ordered, exclusively owned set of components.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    next_key: u32,
    slots: Vec<Slot>,
}

impl Entity {
    /// Create an empty entity.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            next_key: 0,
            slots: Vec::new(),
        }
    }

    /// Create an entity with `id` and populate it from `doc`.
    ///
    /// # Errors
    ///
    /// See [`Entity::deserialize`].
    pub fn load(
        id: EntityId,
        doc: &EntityDocument,
        registry: &ComponentRegistry,
    ) -> Result<(Self, LoadReport), EntityError> {
        let mut entity = Self::new(id);
        let report = entity.deserialize(doc, registry)?;
        Ok((entity, report))
    }

    /// Returns this entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Append `component`, taking ownership, and call its
    /// [`init`](Component::init) hook.
    ///
    /// No duplicate check is made; the same variant may be attached more than
    /// once.
    pub fn add_component(&mut self, mut component: Box<dyn Component>) -> ComponentKey {
        let key = ComponentKey(self.next_key);
        self.next_key += 1;
        component.init(self.id);
        self.slots.push(Slot { key, component });
        key
    }

    /// Detach the component identified by `key` and hand ownership back to
    /// the caller. Its [`destroy`](Component::destroy) hook has already run.
    ///
    /// Returns `None` if `key` does not belong to a component of this entity.
    pub fn remove_component(&mut self, key: ComponentKey) -> Option<Box<dyn Component>> {
        let pos = self.slots.iter().position(|slot| slot.key == key)?;
        let mut slot = self.slots.remove(pos);
        slot.component.destroy();
        Some(slot.component)
    }

    /// Returns the component identified by `key`.
    #[must_use]
    pub fn component(&self, key: ComponentKey) -> Option<&(dyn Component + 'static)> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| slot.component.as_ref())
    }

    /// Returns the first component of variant `T`.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.slots
            .iter()
            .find_map(|slot| slot.component.downcast_ref::<T>())
    }

    /// Returns the first component of variant `T`, mutably.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find_map(|slot| slot.component.downcast_mut::<T>())
    }

    /// Iterates over components in attachment order.
    pub fn components(&self) -> impl Iterator<Item = &(dyn Component + 'static)> {
        self.slots.iter().map(|slot| slot.component.as_ref())
    }

    /// Type identifiers of the attached components in attachment order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .map(|slot| slot.component.type_name())
            .collect()
    }

    /// Number of attached components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no component is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Serialise every component, in attachment order, into a new entity
    /// document.
    ///
    /// # Errors
    ///
    /// Propagates the first component's [`ComponentError`].
    pub fn serialize(&self) -> Result<EntityDocument, ComponentError> {
        let mut doc = EntityDocument::new();
        self.serialize_into(&mut doc)?;
        Ok(doc)
    }

    /// Append every component's document to `doc.components`.
    ///
    /// `doc` is left unchanged if any component fails.
    ///
    /// # Errors
    ///
    /// Propagates the first component's [`ComponentError`].
    pub fn serialize_into(&self, doc: &mut EntityDocument) -> Result<(), ComponentError> {
        let components = self
            .components()
            .map(|component| component.to_document())
            .collect::<Result<Vec<_>, _>>()?;
        doc.components.extend(components);
        Ok(())
    }

    /// Reconstruct components from `doc` and attach them in document order.
    ///
    /// Each component document's `type` is resolved through `registry`.
    /// Unknown types are skipped and listed in the returned [`LoadReport`].
    /// Every known component must load; otherwise nothing is attached and the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// - [`EntityError::Document`] if a component document has no usable
    ///   `type` tag.
    /// - [`EntityError::Component`] if a known component rejects its document.
    pub fn deserialize(
        &mut self,
        doc: &EntityDocument,
        registry: &ComponentRegistry,
    ) -> Result<LoadReport, EntityError> {
        let mut report = LoadReport::default();
        let mut built = Vec::with_capacity(doc.len());

        for (index, component_doc) in doc.components.iter().enumerate() {
            let type_name = document::type_of(component_doc)
                .map_err(|source| EntityError::Document { index, source })?;

            let mut component = match registry.create(type_name) {
                Ok(component) => component,
                Err(err) => {
                    warn!(entity = %self.id, index, component = type_name, %err, "skipping component");
                    report.skipped.push(SkippedComponent {
                        index,
                        type_name: type_name.to_string(),
                    });
                    continue;
                }
            };

            component
                .deserialize(component_doc)
                .map_err(|source| EntityError::Component {
                    index,
                    type_name: type_name.to_string(),
                    source,
                })?;
            debug!(entity = %self.id, index, component = type_name, "component loaded");
            built.push(component);
        }

        report.loaded = built.len();
        for component in built {
            self.add_component(component);
        }

        info!(
            entity = %self.id,
            loaded = report.loaded,
            skipped = report.skipped_count(),
            "entity loaded"
        );
        Ok(report)
    }

    /// Present the entity header and every component through `ui`.
    pub fn render_editor(&mut self, ui: &mut dyn Inspector) {
        ui.label(&format!("Entity {}", self.id.id()));
        ui.separator();
        for slot in &mut self.slots {
            slot.component.render_editor(ui);
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            slot.component.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::document::{Document, read_field, write_field, write_type};
    use crate::inspector::TextInspector;

    #[derive(Debug, Default, PartialEq)]
    struct Score {
        points: i64,
    }

    impl Component for Score {
        fn type_name(&self) -> &'static str {
            "Score"
        }

        fn serialize(&self, doc: &mut Document) -> Result<(), ComponentError> {
            write_type(doc, self.type_name());
            write_field(doc, self.type_name(), "points", &self.points)
        }

        fn deserialize(&mut self, doc: &Document) -> Result<(), ComponentError> {
            self.points = read_field(doc, self.type_name(), "points")?;
            Ok(())
        }

        fn render_editor(&mut self, ui: &mut dyn Inspector) {
            ui.heading(self.type_name());
            ui.label(&format!("points: {}", self.points));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Counts lifecycle hook calls through shared counters.
    #[derive(Debug, Default)]
    struct Tracked {
        owner: Option<EntityId>,
        inits: Arc<AtomicUsize>,
        destroys: Arc<AtomicUsize>,
    }

    impl Component for Tracked {
        fn type_name(&self) -> &'static str {
            "Tracked"
        }

        fn init(&mut self, owner: EntityId) {
            self.owner = Some(owner);
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn destroy(&mut self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register_type::<Score>().unwrap();
        registry
    }

    fn entity_doc(value: Value) -> EntityDocument {
        EntityDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_entity_id_creation() {
        let e = EntityId::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
        assert!(!EntityId::INVALID.is_valid());
        assert_eq!(e.to_string(), "Entity(42)");
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.spawn();
        let e3 = alloc.allocate();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id().id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_add_preserves_order_and_allows_duplicates() {
        let mut entity = Entity::new(EntityId(1));
        entity.add_component(Box::new(Score { points: 1 }));
        entity.add_component(Box::new(Tracked::default()));
        entity.add_component(Box::new(Score { points: 2 }));
        assert_eq!(entity.type_names(), vec!["Score", "Tracked", "Score"]);
        assert_eq!(entity.get::<Score>().unwrap().points, 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut entity = Entity::new(EntityId(1));
        let first = entity.add_component(Box::new(Score { points: 1 }));
        let second = entity.add_component(Box::new(Score { points: 2 }));

        let removed = entity.remove_component(first).unwrap();
        assert_eq!(removed.downcast_ref::<Score>().unwrap().points, 1);
        assert_eq!(entity.len(), 1);
        assert_eq!(
            entity
                .component(second)
                .and_then(|c| c.downcast_ref::<Score>())
                .map(|s| s.points),
            Some(2)
        );
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut entity = Entity::new(EntityId(1));
        let key = entity.add_component(Box::new(Score::default()));
        assert!(entity.remove_component(key).is_some());
        assert!(entity.remove_component(key).is_none());
        assert!(entity.is_empty());
    }

    #[test]
    fn test_lifecycle_hooks_run_once() {
        let inits = Arc::new(AtomicUsize::new(0));
        let destroys = Arc::new(AtomicUsize::new(0));
        let make = || Tracked {
            owner: None,
            inits: Arc::clone(&inits),
            destroys: Arc::clone(&destroys),
        };

        let mut entity = Entity::new(EntityId(7));
        let key = entity.add_component(Box::new(make()));
        entity.add_component(Box::new(make()));
        assert_eq!(entity.get::<Tracked>().unwrap().owner, Some(EntityId(7)));
        assert_eq!(inits.load(Ordering::SeqCst), 2);

        drop(entity.remove_component(key));
        assert_eq!(destroys.load(Ordering::SeqCst), 1);

        drop(entity);
        assert_eq!(destroys.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_serialize_in_attachment_order() {
        let mut entity = Entity::new(EntityId(1));
        entity.add_component(Box::new(Score { points: 3 }));
        entity.add_component(Box::new(Score { points: -4 }));
        let doc = entity.serialize().unwrap();
        assert_eq!(
            doc.into_value(),
            json!({ "components": [
                { "type": "Score", "points": 3 },
                { "type": "Score", "points": -4 }
            ]})
        );
    }

    #[test]
    fn test_serialize_into_appends() {
        let mut entity = Entity::new(EntityId(1));
        entity.add_component(Box::new(Score { points: 3 }));
        let mut doc = entity_doc(json!({ "components": [{ "type": "Other" }] }));
        entity.serialize_into(&mut doc).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(document::type_of(&doc.components[1]).unwrap(), "Score");
    }

    #[test]
    fn test_deserialize_skips_unknown_types() {
        let doc = entity_doc(json!({ "components": [
            { "type": "Score", "points": 1 },
            { "type": "Nonexistent", "points": 2 },
            { "type": "Score", "points": 3 }
        ]}));
        let (entity, report) = Entity::load(EntityId(1), &doc, &registry()).unwrap();
        assert_eq!(entity.len(), 2);
        assert_eq!(report.loaded, 2);
        assert!(!report.is_complete());
        assert_eq!(
            report.skipped,
            vec![SkippedComponent {
                index: 1,
                type_name: "Nonexistent".into()
            }]
        );
    }

    #[test]
    fn test_deserialize_missing_field_aborts_whole_load() {
        let doc = entity_doc(json!({ "components": [
            { "type": "Score", "points": 1 },
            { "type": "Score" }
        ]}));
        let mut entity = Entity::new(EntityId(1));
        let err = entity.deserialize(&doc, &registry()).unwrap_err();
        assert!(matches!(
            err,
            EntityError::Component {
                index: 1,
                source: ComponentError::MissingField { .. },
                ..
            }
        ));
        assert!(entity.is_empty());
    }

    #[test]
    fn test_deserialize_missing_type_tag_is_fatal() {
        let doc = entity_doc(json!({ "components": [{ "points": 1 }] }));
        let err = Entity::load(EntityId(1), &doc, &registry()).unwrap_err();
        assert!(matches!(err, EntityError::Document { index: 0, .. }));
    }

    #[test]
    fn test_round_trip() {
        let mut entity = Entity::new(EntityId(1));
        entity.add_component(Box::new(Score { points: 10 }));
        entity.add_component(Box::new(Score { points: 20 }));
        let doc = entity.serialize().unwrap();

        let (loaded, report) = Entity::load(EntityId(2), &doc, &registry()).unwrap();
        assert!(report.is_complete());
        let points: Vec<_> = loaded
            .components()
            .filter_map(|c| c.downcast_ref::<Score>())
            .map(|s| s.points)
            .collect();
        assert_eq!(points, vec![10, 20]);
    }

    #[test]
    fn test_render_editor() {
        let mut entity = Entity::new(EntityId(5));
        entity.add_component(Box::new(Score { points: 9 }));
        let mut ui = TextInspector::new();
        entity.render_editor(&mut ui);
        assert_eq!(ui.as_str(), "Entity 5\n----\n[Score]\npoints: 9\n");
    }
}
