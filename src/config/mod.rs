//! Manager configuration
//!
//! - `ManagerConfig` - where the default store lives and how passes behave
//! - `ManagerConfigBuilder` - fluent construction with sensible defaults

mod types;

pub use types::{DEFAULT_CUSTOM_DATA_PREFIX, DEFAULT_FLOAT_TOLERANCE, ManagerConfig, ManagerConfigBuilder};
