//! `door-types` — door type descriptors and the type registry.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`descriptor`]  | `TypeDescriptor`, `Dependency`                        |
//! | [`registry`]    | `TypeRegistry` (register, batch resolution, queries)  |
//! | [`loader`]      | `load_descriptors_csv`, `load_descriptors_reader`     |
//! | [`error`]       | `RegistrationError`, `RegistrationResult<T>`          |
//!
//! A type may declare versioned dependencies on other types.  A type is only
//! registered once every dependency is available in a supported version,
//! either already registered or resolvable within the same batch.

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod registry;

#[cfg(test)]
mod tests;

pub use descriptor::{Dependency, TypeDescriptor};
pub use error::{RegistrationError, RegistrationResult};
pub use loader::{load_descriptors_csv, load_descriptors_reader};
pub use registry::TypeRegistry;
