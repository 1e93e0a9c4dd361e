//! Cache construction errors.

use std::time::Duration;

use thiserror::Error;

use crate::Retention;

#[derive(Debug, Error)]
pub enum CacheError {
    /// A zero timeout means "never expires by time".  Without weak retention
    /// and a sweeper nothing would ever leave the cache.
    #[error(
        "a zero timeout requires weak retention and a non-zero cleanup interval \
         (retention: {retention:?}, cleanup interval: {cleanup:?})"
    )]
    UnboundedRetention {
        retention: Retention,
        cleanup:   Option<Duration>,
    },

    #[error("failed to start the cleanup thread: {0}")]
    Sweeper(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
