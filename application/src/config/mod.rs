//! Application-level configuration.
//!
//! - [`ExecutionParams`]: tool loop control for execution clients
//! - [`ModelSettings`]: per-call sampling settings passed through to providers

pub mod execution_params;
pub mod model_settings;

pub use execution_params::ExecutionParams;
pub use model_settings::ModelSettings;
