//! Document nodes exchanged with the storage layer.
//!
//! A component document is a flat JSON object carrying a `type` tag next to
//! the variant's own fields:
//!
//! ```json
//! { "type": "Position", "x": 3.5, "y": -2.0 }
//! ```
//!
//! An entity document wraps an ordered sequence of component documents under
//! `components`. The order is load-bearing and survives a save/load cycle.

use std::fmt;

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ComponentError;

/// A single component's serialised form.
pub type Document = Map<String, Value>;

/// Key holding the component type identifier.
pub const TYPE_KEY: &str = "type";

/// Key holding the component sequence in an entity document.
pub const COMPONENTS_KEY: &str = "components";

/// The serialised form of an [`Entity`](crate::Entity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    /// Component documents in attachment order.
    #[serde(default)]
    pub components: Vec<Document>,
}

impl EntityDocument {
    /// Create an empty entity document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of component documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if there are no component documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append a component document.
    pub fn push(&mut self, doc: Document) {
        self.components.push(doc);
    }

    /// Parse an entity document out of an already-decoded JSON tree.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the tree does not have the entity
    /// document shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert into a JSON tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        let components = self.components.into_iter().map(Value::Object).collect();
        let mut root = Map::new();
        root.insert(COMPONENTS_KEY.to_string(), Value::Array(components));
        Value::Object(root)
    }
}

/// Read the `type` tag of a component document.
///
/// # Errors
///
/// [`ComponentError::MissingField`] if the tag is absent,
/// [`ComponentError::InvalidField`] if it is not a string.
pub fn type_of(doc: &Document) -> Result<&str, ComponentError> {
    match doc.get(TYPE_KEY) {
        None => Err(ComponentError::MissingField {
            component: String::from("<untyped>"),
            field: TYPE_KEY.to_string(),
        }),
        Some(Value::String(name)) => Ok(name.as_str()),
        Some(other) => Err(ComponentError::InvalidField {
            component: String::from("<untyped>"),
            field: TYPE_KEY.to_string(),
            source: <serde_json::Error as serde::de::Error>::custom(format!(
                "expected a string type tag, found {other}"
            )),
        }),
    }
}

/// Write the `type` tag.
pub fn write_type(doc: &mut Document, type_name: &str) {
    doc.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
}

/// Write a single field.
///
/// # Errors
///
/// Returns [`ComponentError::Encode`] if `value` cannot be represented as JSON,
/// including NaN and infinite floats.
pub fn write_field<T: Serialize + ?Sized>(
    doc: &mut Document,
    component: &str,
    key: &str,
    value: &T,
) -> Result<(), ComponentError> {
    ensure_finite(component, value)?;
    let value = serde_json::to_value(value).map_err(|source| ComponentError::Encode {
        component: component.to_string(),
        source,
    })?;
    doc.insert(key.to_string(), value);
    Ok(())
}

/// Read a single required field.
///
/// # Errors
///
/// [`ComponentError::MissingField`] if `key` is absent,
/// [`ComponentError::InvalidField`] if it cannot be converted to `T`.
pub fn read_field<T: DeserializeOwned>(
    doc: &Document,
    component: &str,
    key: &str,
) -> Result<T, ComponentError> {
    let value = doc.get(key).ok_or_else(|| ComponentError::MissingField {
        component: component.to_string(),
        field: key.to_string(),
    })?;
    T::deserialize(value).map_err(|source| ComponentError::InvalidField {
        component: component.to_string(),
        field: key.to_string(),
        source,
    })
}

/// Build a component document from a serde struct, placing its fields next
/// to the `type` tag.
///
/// # Errors
///
/// Returns [`ComponentError::Encode`] if `state` does not serialise to a JSON
/// object or holds a NaN or infinite float.
pub fn to_document<T: Serialize>(type_name: &str, state: &T) -> Result<Document, ComponentError> {
    ensure_finite(type_name, state)?;
    let encode = |source| ComponentError::Encode {
        component: type_name.to_string(),
        source,
    };
    let mut doc = match serde_json::to_value(state).map_err(encode)? {
        Value::Object(fields) => fields,
        other => {
            return Err(encode(<serde_json::Error as serde::ser::Error>::custom(
                format!("component state must be a struct, found {other}"),
            )));
        }
    };
    write_type(&mut doc, type_name);
    Ok(doc)
}

/// Read a serde struct back out of a component document.
///
/// Every field that `T::default()` serialises is required to be present;
/// a missing one is reported as [`ComponentError::MissingField`] rather than
/// silently defaulted. The `type` tag itself is ignored.
///
/// # Errors
///
/// [`ComponentError::MissingField`] for an absent field,
/// [`ComponentError::InvalidField`] if the fields do not convert to `T`.
pub fn from_document<T>(type_name: &str, doc: &Document) -> Result<T, ComponentError>
where
    T: Serialize + DeserializeOwned + Default,
{
    if let Ok(Value::Object(expected)) = serde_json::to_value(T::default())
        && let Some(field) = expected.keys().find(|key| !doc.contains_key(*key))
    {
        return Err(ComponentError::MissingField {
            component: type_name.to_string(),
            field: field.clone(),
        });
    }

    let mut fields = doc.clone();
    fields.remove(TYPE_KEY);
    serde_json::from_value(Value::Object(fields)).map_err(|source| ComponentError::InvalidField {
        component: type_name.to_string(),
        field: String::from("*"),
        source,
    })
}

/// Reject values holding NaN or infinite floats.
///
/// JSON has no literal for them and `serde_json` writes `null` instead, which
/// the component could not read back.
fn ensure_finite<T: Serialize + ?Sized>(component: &str, value: &T) -> Result<(), ComponentError> {
    let encode = |message: String| ComponentError::Encode {
        component: component.to_string(),
        source: <serde_json::Error as serde::ser::Error>::custom(message),
    };
    let bytes = rmp_serde::to_vec_named(value).map_err(|err| encode(err.to_string()))?;
    match rmp_serde::from_slice::<NonFinite>(&bytes) {
        Ok(NonFinite(false)) => Ok(()),
        Ok(NonFinite(true)) => Err(encode(String::from(
            "NaN and infinite floats cannot be stored in a document",
        ))),
        Err(err) => Err(encode(err.to_string())),
    }
}

/// `true` if any float inside the visited value is NaN or infinite.
struct NonFinite(bool);

impl<'de> Deserialize<'de> for NonFinite {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NonFiniteVisitor)
    }
}

struct NonFiniteVisitor;

impl<'de> Visitor<'de> for NonFiniteVisitor {
    type Value = NonFinite;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NonFinite, E> {
        Ok(NonFinite(!v.is_finite()))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_unit<E: de::Error>(self) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_none<E: de::Error>(self) -> Result<NonFinite, E> {
        Ok(NonFinite(false))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<NonFinite, D::Error> {
        NonFinite::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<NonFinite, A::Error> {
        let mut found = false;
        while let Some(NonFinite(element)) = seq.next_element()? {
            found |= element;
        }
        Ok(NonFinite(found))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NonFinite, A::Error> {
        let mut found = false;
        while let Some((IgnoredAny, NonFinite(value))) = map.next_entry()? {
            found |= value;
        }
        Ok(NonFinite(found))
    }
}
