//! # Domain Layer
//!
//! Core business logic: entities, value objects, errors, and domain events.

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;
