//! Type registration errors.

use thiserror::Error;

/// Why a type could not be registered.  Reported per type; a failure never
/// aborts the rest of a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("type \"{type_name}\" depends on type \"{dependency}\" which isn't available")]
    DependencyUnavailable {
        type_name:  String,
        dependency: String,
    },

    #[error(
        "type \"{type_name}\" requires version {min_version}..={max_version} of type \
         \"{dependency}\", but version {found} was found"
    )]
    DependencyVersionUnsupported {
        type_name:   String,
        dependency:  String,
        found:       u32,
        min_version: u32,
        max_version: u32,
    },

    #[error("a type named \"{0}\" is already registered")]
    AlreadyRegistered(String),

    #[error("type descriptor parse error: {0}")]
    Parse(String),

    #[error("I/O error reading type descriptors: {0}")]
    Io(String),
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;
