//! Engine errors.
//!
//! Toggle requests never fail with an error; they return a
//! [`ToggleOutcome`](crate::ToggleOutcome).  Errors here come from building
//! the engine, loading configuration, registering types and driving ticks.

use thiserror::Error;

use door_activity::ActivityError;
use door_cache::CacheError;
use door_core::CoreError;
use door_types::RegistrationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type EngineResult<T> = Result<T, EngineError>;
