//! # engine_component
//!
//! The "C" in ECS — defines what a component is, how heterogeneous components
//! are owned by an entity, and how they are saved to and restored from
//! structured documents without the loader knowing the concrete types.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the base contract every variant implements.
//! - [`ComponentRegistry`] — maps a type identifier to a factory.
//! - [`Entity`] — owns components and drives their (de)serialisation.
//! - [`EntityAllocator`] — monotonically increasing id allocator.
//! - [`Inspector`] — the editor surface components render onto.
//! - [`System`] — the single `update` hook.
//! - [`codec`] — JSON and MessagePack byte codecs for entity documents.

pub mod codec;
pub mod component;
pub mod document;
pub mod entity;
pub mod error;
pub mod inspector;
pub mod registry;
pub mod system;

pub use codec::DocumentFormat;
pub use component::Component;
pub use document::{Document, EntityDocument};
pub use entity::{ComponentKey, Entity, EntityAllocator, EntityId, LoadReport, SkippedComponent};
pub use error::{CodecError, ComponentError, EntityError, RegistryError};
pub use inspector::{Inspector, TextInspector};
pub use registry::{ComponentRegistry, Factory};
pub use system::System;
