//! Error types for component, registry, entity, and codec operations.

/// Errors raised while a single component writes or reads its document.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// An expected field is absent from the component document.
    #[error("component '{component}' is missing field '{field}'")]
    MissingField {
        /// Type identifier of the component being read.
        component: String,
        /// Name of the absent field.
        field: String,
    },

    /// A field is present but cannot be converted to the expected type.
    #[error("component '{component}' has invalid field '{field}': {source}")]
    InvalidField {
        /// Type identifier of the component being read.
        component: String,
        /// Name of the offending field.
        field: String,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },

    /// Component state could not be converted into a document value.
    #[error("failed to encode component '{component}': {source}")]
    Encode {
        /// Type identifier of the component being written.
        component: String,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the [`ComponentRegistry`](crate::ComponentRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No factory is registered under the requested type identifier.
    #[error("unknown component type '{0}'")]
    UnknownType(String),

    /// A different variant is already registered under this identifier.
    #[error("component type '{0}' is already registered by a different variant")]
    DuplicateRegistration(String),

    /// The factory builds a component that reports a different identifier.
    #[error("factory registered as '{registered}' produces components of type '{produced}'")]
    TypeNameMismatch {
        /// The identifier passed to `register`.
        registered: String,
        /// The identifier reported by the constructed component.
        produced: String,
    },
}

/// Errors raised while loading an [`Entity`](crate::Entity) from a document.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// A component of a known type failed to read its document.
    #[error("component #{index} ('{type_name}') failed to load: {source}")]
    Component {
        /// Position of the component document in the `components` sequence.
        index: usize,
        /// The type identifier found in the document.
        type_name: String,
        /// The component-level failure.
        #[source]
        source: ComponentError,
    },

    /// A component document is malformed before its type can be resolved.
    #[error("component #{index} is malformed: {source}")]
    Document {
        /// Position of the component document in the `components` sequence.
        index: usize,
        /// The underlying failure (usually a missing `type` tag).
        #[source]
        source: ComponentError,
    },
}

/// Errors raised when converting entity documents to and from bytes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON parsing or printing failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode a document to MessagePack.
    #[error("failed to encode MessagePack document: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a document from MessagePack.
    #[error("failed to decode MessagePack document: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}
