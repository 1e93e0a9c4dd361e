//! TOML configuration loading.
//!
//! Every key is optional; missing keys take their [`EngineConfig::default`]
//! values.
//!
//! ```toml
//! ticks_per_second = 20
//! cool_down_ticks = 10
//! max_speed = 6.5
//! ```

use std::fs;
use std::path::Path;

use door_core::EngineConfig;

use crate::EngineResult;

/// Read and validate an engine configuration file.
pub fn load_config(path: &Path) -> EngineResult<EngineConfig> {
    let text = fs::read_to_string(path)?;
    config_from_str(&text)
}

/// Parse and validate an engine configuration from TOML text.
pub fn config_from_str(text: &str) -> EngineResult<EngineConfig> {
    let config: EngineConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
